use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use svs_core::history::HistoryConverter;
use svs_core::sort::sort_history;
use svs_core::troop_stats::{self, ParseOptions, SheetSummary};
use svs_render::{
    JsonStyle, read_json_file, render_history_json, render_troop_stats_json, write_json_file,
};
use svs_serve::ServeConfig;
use tracing_subscriber::EnvFilter;

const DEFAULT_HISTORY_OUTPUT: &str = "svs_history_converted.json";

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert the SvS history CSV export into per-state JSON.
    Convert {
        #[arg(short, long, value_name = "CSV")]
        input: PathBuf,
        #[arg(short, long, value_name = "JSON", default_value = DEFAULT_HISTORY_OUTPUT)]
        output: PathBuf,
        /// Wrap the state mapping in {"svs-data-per-state": ...}.
        #[arg(long)]
        envelope: bool,
    },
    /// Sort each state's dates and normalize outcome field order.
    Sort {
        #[arg(long = "input-json", value_name = "JSON")]
        input_json: PathBuf,
        #[arg(long = "output-json", value_name = "JSON")]
        output_json: PathBuf,
    },
    /// Convert a troop stats workbook (ODS/XLSX) into JSON, one array per sheet.
    TroopStats {
        #[arg(short, long, value_name = "ODS")]
        input: PathBuf,
        #[arg(short, long, value_name = "JSON")]
        output: PathBuf,
        /// Print value counts for the first columns of each sheet.
        #[arg(long)]
        debug: bool,
    },
    /// Serve the working directory for local testing.
    Serve {
        #[arg(short, long, env = "SVS_PORT", default_value_t = svs_serve::DEFAULT_PORT)]
        port: u16,
        #[arg(long, env = "SVS_ROOT", default_value = ".")]
        root: PathBuf,
        #[arg(long, default_value = "127.0.0.1")]
        bind: IpAddr,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Convert {
            input,
            output,
            envelope,
        } => run_convert(&input, &output, envelope),
        Command::Sort {
            input_json,
            output_json,
        } => run_sort(&input_json, &output_json),
        Command::TroopStats {
            input,
            output,
            debug,
        } => run_troop_stats(&input, &output, debug),
        Command::Serve { port, root, bind } => run_serve(ServeConfig { bind, port, root }),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run_convert(input: &Path, output: &Path, envelope: bool) -> Result<()> {
    let conversion = HistoryConverter::new()
        .convert_path(input)
        .with_context(|| format!("failed to convert {}", input.display()))?;

    let stats = conversion.stats;
    tracing::debug!(
        rows = stats.rows_read,
        rows_without_state = stats.rows_without_state,
        written = stats.slots_written,
        skipped = stats.slots_skipped(),
        "converted history"
    );

    let style = if envelope {
        JsonStyle::Enveloped
    } else {
        JsonStyle::Flat
    };
    let json = render_history_json(&conversion.document, style)?;
    write_json_file(output, &json)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!(
        "Conversion completed! JSON data saved to {}",
        output.display()
    );
    Ok(())
}

fn run_sort(input: &Path, output: &Path) -> Result<()> {
    let mut json =
        read_json_file(input).with_context(|| format!("failed to read {}", input.display()))?;
    sort_history(&mut json).with_context(|| format!("failed to sort {}", input.display()))?;
    write_json_file(output, &json)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!("Sorted data saved to {}", output.display());
    Ok(())
}

fn run_troop_stats(input: &Path, output: &Path, debug: bool) -> Result<()> {
    let parsed = troop_stats::parse_workbook(input, ParseOptions { summarize: debug })
        .with_context(|| format!("failed to parse {}", input.display()))?;

    for summary in &parsed.summaries {
        print_summary(summary);
    }

    let json = render_troop_stats_json(&parsed.stats)?;
    write_json_file(output, &json)
        .with_context(|| format!("failed to write {}", output.display()))?;

    if debug {
        println!(
            "\nDebug mode completed: Printed value counts for the first {} columns of each sheet.",
            troop_stats::SUMMARY_COLUMNS
        );
    }
    println!("Data successfully parsed to {}", output.display());
    Ok(())
}

fn print_summary(summary: &SheetSummary) {
    println!("\nDebug info for sheet: {}", summary.sheet);
    for column in &summary.columns {
        println!("\nColumn '{}':", column.column);
        for (value, count) in &column.counts {
            println!("Value: {value}, Count: {count}");
        }
    }
}

fn run_serve(config: ServeConfig) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let addr = config.addr();
    runtime
        .block_on(svs_serve::serve(config))
        .with_context(|| format!("server on {addr} failed"))
}
