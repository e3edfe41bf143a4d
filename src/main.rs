//! valkey-list-bench - list push/pop throughput benchmark
//!
//! Spawns concurrent workers that RPUSH and then LPOP fixed-size payloads
//! against their own list keys, and reports operations per second over
//! one or more runs.

use anyhow::Result;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use valkey_list_bench::benchmark::{format_count, Orchestrator};
use valkey_list_bench::config::{BenchmarkConfig, CliArgs};

fn setup_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

fn print_banner(config: &BenchmarkConfig) {
    if config.quiet {
        return;
    }

    println!("valkey-list-bench v{}", env!("CARGO_PKG_VERSION"));
    println!("====================================");
    println!("Host: {}", config.address);
    println!(
        "Threads: {}, Elements/thread: {}, Payload: {} bytes",
        config.threads,
        format_count(config.num_elems),
        config.packet_size
    );
    println!(
        "Runs: {}, Interval: {}s",
        config.run_count,
        config.interval.as_secs()
    );
    println!("====================================\n");
}

fn run() -> Result<()> {
    let argv: Vec<String> = std::env::args().collect();

    // `-h` alone is a usage request, not a host flag missing its value
    if CliArgs::is_bare_help(&argv) {
        CliArgs::print_usage()?;
        return Ok(());
    }

    let args = CliArgs::parse_args(argv);

    setup_logging(args.verbose, args.quiet);

    let config = BenchmarkConfig::from_cli(&args);

    print_banner(&config);

    let orchestrator = Orchestrator::new(config)
        .map_err(|e| anyhow::anyhow!("Failed to connect to server: {}", e))?;

    let results = orchestrator.run_all();

    info!("Finished {} run(s)", results.len());
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }
}
