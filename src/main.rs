use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use exif_backfill::{batch, config::Config, pipeline};

#[derive(Parser, Debug)]
#[command(
    name = "exif-backfill",
    version,
    about = "Backfill missing EXIF capture timestamps from file modification times"
)]
struct Cli {
    /// Directory containing the images to process (jpg/jpeg/png, non-recursive)
    #[arg(value_name = "INPUT_DIR")]
    input: PathBuf,

    /// Output directory (created if missing)
    #[arg(short, long, value_name = "DIR")]
    out: PathBuf,

    /// Number of parallel workers (default: host CPU count)
    #[arg(short, long, value_name = "N")]
    jobs: Option<usize>,

    /// Print the batch summary as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // The one place the host CPU count is consulted.
    let jobs = cli.jobs.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    });

    std::fs::create_dir_all(&cli.out)
        .with_context(|| format!("failed to create output directory {}", cli.out.display()))?;

    let config = Config::new(cli.input, cli.out, jobs);
    config.validate()?;

    log::info!("input directory  : {}", config.input_dir.display());
    log::info!("output directory : {}", config.output_dir.display());
    log::info!("workers          : {}", config.effective_jobs());

    let records = pipeline::discover_images(&config.input_dir)?;
    if records.is_empty() {
        log::warn!("no jpg/jpeg/png files found in {}", config.input_dir.display());
    }
    log::info!("found {} image(s)", records.len());

    let total = records.len();
    let done = AtomicUsize::new(0);
    let result = batch::run(
        &records,
        &config.output_dir,
        config.effective_jobs(),
        |path, event| {
            let n = done.fetch_add(1, Ordering::Relaxed) + 1;
            match event {
                batch::ItemEvent::Synthesized => {
                    log::info!("[{n}/{total}] synthesized: {}", path.display())
                }
                batch::ItemEvent::Copied => {
                    log::info!("[{n}/{total}] copied: {}", path.display())
                }
                batch::ItemEvent::Failed => {
                    log::warn!("[{n}/{total}] failed: {}", path.display())
                }
            }
        },
    )?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    log::info!(
        "done: {} synthesized, {} copied, {} failed out of {} images",
        result.synthesized,
        result.copied,
        result.failed,
        result.discovered
    );

    Ok(())
}
