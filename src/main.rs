use baseflow_processor::cli::{self, Args};
use clap::Parser;
use std::process;

fn main() {
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    let Some(command) = args.command else {
        show_help_and_commands();
        process::exit(0);
    };

    cli::setup_logging(command.verbosity());

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        tokio::select! {
            result = cli::run(command) => result,
            signal = tokio::signal::ctrl_c() => {
                eprintln!("\nReceived CTRL+C, shutting down...");
                let reason = match signal {
                    Ok(()) => "Processing interrupted by user".to_string(),
                    Err(e) => format!("Failed to listen for CTRL+C: {e}"),
                };
                Err(baseflow_processor::BaseflowError::Interrupted { reason }.into())
            }
        }
    });

    if let Err(error) = result {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Baseflow Processor - streamflow baseflow separation and labeling");
    println!("=================================================================");
    println!();
    println!("Estimate the groundwater-fed baseflow of river discharge records with a");
    println!("bank of recursive digital filters, attach seasonal quantile thresholds");
    println!("and label baseflow-only days.");
    println!();
    println!("USAGE:");
    println!("    baseflow <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    process       Label one or more gauge files (CSV or USGS RDB)");
    println!("    thresholds    Write the seasonal threshold summary for one gauge file");
    println!("    periods       Summarise baseflow-only periods of a labeled CSV table");
    println!("    help          Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    baseflow process data/ --output labeled/ --format parquet");
    println!("    baseflow process 01636500.rdb --tolerance 100 --group-by season");
    println!("    baseflow thresholds 01636500.rdb --quantile 0.9 -o thresholds.csv");
    println!("    baseflow periods labeled/01636500_labeled.csv");
    println!();
    println!("For detailed help on any command, use:");
    println!("    baseflow <COMMAND> --help");
}
