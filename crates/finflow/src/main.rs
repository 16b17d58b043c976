use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use finflow_core::{ScenarioConfig, simulate};

mod logging;
mod report;

use report::Summary;

#[derive(Parser, Debug)]
#[command(name = "finflow")]
#[command(about = "A Monte Carlo cash-flow scenario simulator")]
struct Args {
    /// Path to the scenario JSON file
    scenario: PathBuf,

    /// Number of draws, overriding the scenario's own `sims`
    #[arg(long)]
    sims: Option<usize>,

    /// Number of parallel workers (default: available CPUs)
    #[arg(long)]
    workers: Option<usize>,

    /// Base seed; reruns with the same seed and worker count reproduce
    /// results exactly
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    logging::init_logging(&args.log_level);

    let raw = std::fs::read_to_string(&args.scenario)
        .wrap_err_with(|| format!("failed to read scenario file {}", args.scenario.display()))?;
    let config: ScenarioConfig = serde_json::from_str(&raw)
        .wrap_err_with(|| format!("failed to parse scenario file {}", args.scenario.display()))?;
    tracing::info!(
        "Loaded scenario '{}' ({} line items, periods {}-{})",
        config.name,
        config.cashflows.len(),
        config.start_period,
        config.end_period
    );

    let templates = config.build_templates()?;
    let draws = args.sims.unwrap_or(config.sims);
    let workers = args.workers.unwrap_or_else(default_workers);
    tracing::info!(
        "Running {draws} draws across {workers} workers (seed {})",
        args.seed
    );

    let started = Instant::now();
    let output = simulate(&templates, draws, workers, args.seed)?;
    tracing::info!("Simulation finished in {:.2?}", started.elapsed());

    println!("Scenario: {} ({draws} draws)", config.name);
    print_summary("net", Summary::from_samples(&output.net));
    print_summary("inflows", Summary::from_samples(&output.inflows));
    print_summary("outflows", Summary::from_samples(&output.outflows));

    Ok(())
}

fn print_summary(label: &str, summary: Option<Summary>) {
    match summary {
        Some(s) => println!(
            "{label:>9}: mean {:>12.2}  sd {:>10.2}  min {:>12.2}  p5 {:>12.2}  p50 {:>12.2}  p95 {:>12.2}  max {:>12.2}",
            s.mean, s.std_dev, s.min, s.p5, s.p50, s.p95, s.max
        ),
        None => println!("{label:>9}: no draws"),
    }
}
