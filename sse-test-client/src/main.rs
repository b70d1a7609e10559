use anyhow::Result;
use clap::Parser;
use colored::*;
use std::time::Duration;

mod output;
mod scenarios;
mod sse_client;

use output::print_test_summary;
use sse_client::Connection;

#[derive(Parser)]
#[command(name = "sse-test-client")]
#[command(about = "Event stream integration testing tool")]
struct Cli {
    /// Base URL of the server (e.g., http://localhost:9001)
    #[arg(long, default_value = "http://localhost:9001")]
    base_url: String,

    /// Test scenario to run
    #[arg(long, value_enum)]
    scenario: ScenarioChoice,

    /// Number of events to collect for scenarios that sample the stream
    #[arg(long, default_value_t = 10)]
    events: usize,

    /// Tick interval the server is configured with, in milliseconds
    #[arg(long, default_value_t = 100)]
    interval_ms: u64,

    /// Enable verbose output
    #[arg(long, short)]
    verbose: bool,
}

#[derive(clap::ValueEnum, Clone)]
enum ScenarioChoice {
    /// Test that a stream connection delivers a first event
    ConnectionTest,
    /// Test that every fragment decodes and targets the feed element
    FragmentFormat,
    /// Test that events arrive at the configured interval
    Cadence,
    /// Test that two concurrent streams carry different values
    Independence,
    /// Run all tests
    All,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    }

    println!("{}", "=== SETUP PHASE ===".bright_white().bold());

    println!("{} Establishing stream connections...", "→".blue());
    let mut stream1 = Connection::establish(&cli.base_url, "Stream 1".to_string()).await?;
    let mut stream2 = Connection::establish(&cli.base_url, "Stream 2".to_string()).await?;
    println!("{} Stream connections established", "✓".green());

    println!("\n{}", "=== TEST PHASE ===".bright_white().bold());

    let interval = Duration::from_millis(cli.interval_ms);
    let mut results = Vec::new();

    match cli.scenario {
        ScenarioChoice::ConnectionTest => {
            results.push(scenarios::test_connection(&mut stream1).await?);
        }
        ScenarioChoice::FragmentFormat => {
            results.push(scenarios::test_fragment_format(&mut stream1, cli.events).await?);
        }
        ScenarioChoice::Cadence => {
            results.push(scenarios::test_cadence(&mut stream1, cli.events, interval).await?);
        }
        ScenarioChoice::Independence => {
            results.push(
                scenarios::test_independence(&mut stream1, &mut stream2, cli.events).await?,
            );
        }
        ScenarioChoice::All => {
            results.push(scenarios::test_connection(&mut stream1).await?);
            results.push(scenarios::test_fragment_format(&mut stream1, cli.events).await?);
            results.push(scenarios::test_cadence(&mut stream1, cli.events, interval).await?);
            results.push(
                scenarios::test_independence(&mut stream1, &mut stream2, cli.events).await?,
            );
        }
    }

    // Print summary
    println!("\n{}", "=== RESULTS ===".bright_white().bold());
    print_test_summary(&results);

    let all_passed = results.iter().all(|r| r.passed);

    if all_passed {
        println!("\n{}", "All tests passed! ✓".bright_green().bold());
    } else {
        println!("\n{}", "Some tests failed! ✗".bright_red().bold());
    }

    std::process::exit(if all_passed { 0 } else { 1 });
}
