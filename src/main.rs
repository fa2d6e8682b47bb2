use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::time::Instant;

use moonbench::cli::Cli;
use moonbench::config::Config;
use moonbench::domain::{summarize, write_values};
use moonbench::moonraker::MoonrakerClient;
use moonbench::runner::TestRunner;

fn setup_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn print_stats(values: &[f64]) {
    let Some(summary) = summarize(values) else {
        return;
    };

    println!("{}", "Printing stats:".cyan());
    println!("  Range: {:.4}", summary.range());
    println!("  Min: {:.4}", summary.min);
    println!("  Max: {:.4}", summary.max);
    println!("  Median: {:.4}", summary.median);
    if let Some(stdev) = summary.stdev {
        println!("  Standard Deviation: {stdev:.3}");
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    cli.apply_overrides(&mut config)
        .context("Invalid command-line overrides")?;

    info!("starting {} against {}", cli.test_type, cli.printer);
    println!("{}", "Starting test.".green());
    let started = Instant::now();

    let client = MoonrakerClient::new(&cli.printer, &config.http)
        .context("Failed to create Moonraker client")?;
    let runner = TestRunner::new(&client, &config.harness);
    let run = runner
        .run(cli.test_type, cli.iterations)
        .context("Test run failed")?;

    println!("{}", "Test completed.".green());
    println!("Ran {} iterations.", run.results.len());
    println!("Data: {:?}", run.results);

    if cli.stats {
        print_stats(&run.results);
    }

    let total = started.elapsed().as_secs_f64();
    let per_iteration = total / f64::from(cli.iterations.max(1));
    println!("--- {total:.2} seconds total; {per_iteration:.2} per iteration ---");

    if cli.output {
        write_values(&cli.output_path, &run.results).context("Failed to write results")?;
        println!("Wrote results to {}", cli.output_path.display());
    }

    Ok(())
}
