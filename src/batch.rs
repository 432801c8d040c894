use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::PipelineError;
use crate::pipeline::{self, ImageRecord, ProcessingOutcome};

/// Aggregate result of one batch run.
///
/// `synthesized + copied + failed == discovered` once the run completes;
/// failed items produce no output file and are counted in neither
/// `synthesized` nor `copied`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    pub discovered: usize,
    pub synthesized: usize,
    pub copied: usize,
    pub failed: usize,
}

/// Per-item completion event handed to the batch observer.
///
/// The executor emits exactly one event per discovered item, in completion
/// order (which is unspecified). Progress display belongs to the caller; the
/// core only reports.
#[derive(Debug, Clone, Copy)]
pub enum ItemEvent {
    Copied,
    Synthesized,
    Failed,
}

/// Distribute the records over a bounded worker pool and process each one to
/// a terminal state.
///
/// `parallelism` is the worker count, clamped to at least one; it is supplied
/// by the caller, the executor never consults the host CPU count itself. Each
/// worker runs one item's decode/resolve/encode synchronously to completion
/// before taking the next. A failing item is logged, reported through the
/// observer, and counted as failed; it never aborts siblings.
pub fn run<F>(
    records: &[ImageRecord],
    output_dir: &Path,
    parallelism: usize,
    observer: F,
) -> Result<BatchResult, PipelineError>
where
    F: Fn(&Path, ItemEvent) + Sync,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(parallelism.max(1))
        .build()
        .map_err(|e| PipelineError::Configuration(format!("cannot build worker pool: {e}")))?;

    let synthesized = AtomicUsize::new(0);
    let copied = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);

    pool.install(|| {
        records.par_iter().for_each(|record| {
            let event = match pipeline::process_image(record, output_dir) {
                Ok(ProcessingOutcome::TimestampSynthesized) => {
                    synthesized.fetch_add(1, Ordering::Relaxed);
                    ItemEvent::Synthesized
                }
                Ok(ProcessingOutcome::CopiedUnchanged) => {
                    copied.fetch_add(1, Ordering::Relaxed);
                    ItemEvent::Copied
                }
                Err(e) => {
                    failed.fetch_add(1, Ordering::Relaxed);
                    log::error!("{}: {e}", record.path.display());
                    ItemEvent::Failed
                }
            };
            observer(&record.path, event);
        });
    });

    Ok(BatchResult {
        discovered: records.len(),
        synthesized: synthesized.into_inner(),
        copied: copied.into_inner(),
        failed: failed.into_inner(),
    })
}
