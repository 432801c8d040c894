use std::path::PathBuf;

use crate::error::PipelineError;

/// Runtime configuration for one batch run.
///
/// Built by the CLI layer and validated before any worker starts — a bad
/// directory is fatal for the whole run, not a per-item condition. The worker
/// count is an explicit input; looking up the host CPU count is the caller's
/// business, done once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory scanned (non-recursively) for input images.
    pub input_dir: PathBuf,
    /// Directory receiving one output file per processed input.
    pub output_dir: PathBuf,
    /// Worker count; values below one are clamped to one.
    pub jobs: usize,
}

impl Config {
    pub fn new(input_dir: PathBuf, output_dir: PathBuf, jobs: usize) -> Self {
        Self {
            input_dir,
            output_dir,
            jobs,
        }
    }

    /// The worker count actually used by the executor.
    pub fn effective_jobs(&self) -> usize {
        self.jobs.max(1)
    }

    /// Check both directories up front. Errors here abort the run before any
    /// item is touched.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if !self.input_dir.is_dir() {
            return Err(PipelineError::Configuration(format!(
                "input directory does not exist: {}",
                self.input_dir.display()
            )));
        }
        if !self.output_dir.is_dir() {
            return Err(PipelineError::Configuration(format!(
                "output directory does not exist: {}",
                self.output_dir.display()
            )));
        }
        Ok(())
    }
}
