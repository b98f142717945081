use anyhow::{Context, Result};
use clap::Parser;
use crime_hotspots::{
    ConvergencePolicy, DEFAULT_CLUSTERS, DEFAULT_MIN_SHARE, Diagnostics, OutputPaths, RunConfig,
    Stage, TracingDiagnostics, clusterer::DEFAULT_MAX_ITERATIONS, clusterer::DEFAULT_SEED,
    read_points, run, write_report,
};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Group crime incident coordinates into hotspots
#[derive(Parser, Debug)]
#[command(name = "crime-hotspots")]
#[command(version)]
#[command(about = "Cluster crime coordinates and summarize each hotspot", long_about = None)]
struct Args {
    /// Path to a JSON array of crime records with `lat` and `lng`
    #[arg(long)]
    file: PathBuf,

    /// Number of clusters
    #[arg(long, default_value_t = DEFAULT_CLUSTERS)]
    clusters: usize,

    /// Iteration cap for k-means
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    max_iterations: usize,

    /// Clusters holding less than this share of all crimes are dissolved
    #[arg(long, default_value_t = DEFAULT_MIN_SHARE)]
    min_share: f64,

    /// Seed for centroid initialization
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Fail instead of warning when k-means does not converge
    #[arg(long)]
    strict_convergence: bool,

    /// Directory for the output files
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let start_time = Instant::now();
    let diagnostics = TracingDiagnostics;

    diagnostics.info(Stage::Input, &format!("Reading {}", args.file.display()));
    let points = read_points(&args.file).context("Failed to load crime records")?;
    let paths = OutputPaths::derive(&args.file, &args.output_dir)
        .context("Failed to derive output file names")?;
    diagnostics.debug(Stage::Input, &format!("{} records loaded", points.len()));

    let policy = if args.strict_convergence {
        ConvergencePolicy::Fail
    } else {
        ConvergencePolicy::Warn
    };
    let config = RunConfig::new(args.clusters)
        .max_iterations(args.max_iterations)
        .min_share(args.min_share)
        .seed(args.seed)
        .convergence(policy);

    let report = run(&points, &config, &diagnostics).context("Clustering failed")?;

    diagnostics.info(Stage::Output, "Saving results in JSON");
    write_report(&report, &paths).context("Failed to write results")?;

    diagnostics.info(
        Stage::Output,
        &format!(
            "Wrote {} and {} [{:.2}s]",
            paths.clusters.display(),
            paths.meta.display(),
            start_time.elapsed().as_secs_f64()
        ),
    );

    Ok(())
}

/// Diagnostics go to stderr only; RUST_LOG overrides the default filter.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        "crime_hotspots=debug,warn"
    } else {
        "crime_hotspots=info,warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
