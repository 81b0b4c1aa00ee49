//! Batch pattern generator.
//!
//! Example:
//!   cargo run --release -- --count 12 --out-dir generated_patterns
//!   cargo run -- --only 7 --verbose
//!
//! Settings come from `assets/config/generator.ron` (defaults if missing);
//! flags override the file.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use polymotif::pattern::batch::{palette_catalogue, plan, plan_item, run_items};
use polymotif::GeneratorConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate seeded polygon-motif pattern images", long_about = None)]
struct Args {
    #[arg(long, default_value = "assets/config/generator.ron")] config: PathBuf,
    /// Number of images (overrides batch.count).
    #[arg(long)] count: Option<u32>,
    #[arg(long)] out_dir: Option<PathBuf>,
    /// Render only this zero-based batch index (same seed/palette it gets in a full run).
    #[arg(long)] only: Option<u32>,
    /// Render on the calling thread instead of the rayon pool.
    #[arg(long)] sequential: bool,
    #[arg(long)] no_manifest: bool,
    /// Default the log filter to debug (RUST_LOG still wins).
    #[arg(short, long)] verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "polymotif=debug" } else { "polymotif=info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let (mut cfg, load_err) = GeneratorConfig::load_or_default(&args.config);
    if let Some(e) = load_err {
        warn!(path = %args.config.display(), "{e}; using defaults");
    }
    if let Some(count) = args.count {
        cfg.batch.count = count;
    }
    if let Some(dir) = args.out_dir {
        cfg.batch.output_dir = dir;
    }
    if args.sequential {
        cfg.batch.parallel = false;
    }
    if args.no_manifest {
        cfg.batch.write_manifest = false;
    }
    for w in cfg.validate() {
        warn!("config: {w}");
    }

    let catalogue = palette_catalogue(&cfg);
    let items = match args.only {
        Some(index) => vec![plan_item(&cfg.batch, &catalogue, index).context("no palettes configured")?],
        None => plan(&cfg.batch, &catalogue),
    };
    info!(count = items.len(), dir = %cfg.batch.output_dir.display(), "generating patterns");

    let out_dir = cfg.batch.output_dir.clone();
    let report = run_items(&items, &cfg, &out_dir)
        .with_context(|| format!("write patterns to {}", out_dir.display()))?;
    if let Some(path) = &report.manifest_path {
        info!("manifest: {}", path.display());
    }
    if !report.is_success() {
        bail!("{} of {} patterns failed", report.failed.len(), items.len());
    }
    println!("Done! Saved {} patterns to {}", report.written.len(), out_dir.display());
    Ok(())
}
