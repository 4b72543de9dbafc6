use std::io::BufRead;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use battery_soc::config::{Cli, Command, OutputFormat};
use battery_soc::protocol::parse_response_line;
use battery_soc::{CalibrationStore, EstimateReport, SocEstimator};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing with colors and stderr output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(true)
                .with_writer(std::io::stderr),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "battery_soc=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let store = cli.load_store()?;

    match &cli.command {
        Command::Estimate(args) => {
            let estimator = SocEstimator::new(&store);
            let mode = args.mode.into();
            let charge = estimator.estimate(mode, args.voltage)?;

            print_report(&EstimateReport::new(mode, args.voltage, charge), cli.format)?;
        }
        Command::Decode(args) => {
            let line = match args.response_line() {
                Some(line) => line,
                None => read_stdin_line()?,
            };

            let report = parse_response_line(&line)?;
            tracing::info!(
                "voltage: {} mV, status: {}",
                report.voltage_mv,
                report.status
            );

            let estimate = SocEstimator::new(&store).estimate_report(&report)?;
            print_report(&estimate, cli.format)?;
        }
        Command::Curves => print_curves(&store, cli.format)?,
    }

    Ok(())
}

/// Read the first line of stdin
fn read_stdin_line() -> std::io::Result<String> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

fn print_report(report: &EstimateReport, format: OutputFormat) -> serde_json::Result<()> {
    match format {
        OutputFormat::Text => println!("{}", report.summary()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
    }
    Ok(())
}

fn print_curves(store: &CalibrationStore, format: OutputFormat) -> serde_json::Result<()> {
    let summaries = store.summaries();

    match format {
        OutputFormat::Text => {
            for summary in summaries {
                println!(
                    "{:<20} {:>3} points, {}-{} mV",
                    summary.mode.as_str(),
                    summary.points,
                    summary.min_voltage_mv,
                    summary.max_voltage_mv
                );
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summaries)?),
    }
    Ok(())
}
