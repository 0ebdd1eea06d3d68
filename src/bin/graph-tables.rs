use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use graph_tables::execution::{ExtractionEngine, RunOptions};
use graph_tables::ingestion::TableFormat;
use graph_tables::mapping::Config;
use graph_tables::observability::{CompositeObserver, ExtractionObserver, FileObserver, TracingObserver};
use graph_tables::output::{convert_folder_to_csv, folder_stats};
use graph_tables::ExtractionResult;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "graph-tables", version, about, arg_required_else_help = true)]
struct AppArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Extract node and edge tables from a folder of exports
    Extract(ExtractArgs),
    /// Convert every parquet file in a folder to CSV
    ToCsv {
        /// Folder holding the parquet files
        #[arg(long)]
        folder: PathBuf,
    },
}

#[derive(Debug, Args)]
struct ExtractArgs {
    /// Folder containing the source data folders named in the mapping
    #[arg(long)]
    folder: PathBuf,
    /// Mapping configuration (JSON)
    #[arg(long)]
    config: PathBuf,
    /// Output folder for the label tables (default: output_data)
    #[arg(long, default_value = "output_data")]
    output: PathBuf,
    /// Format of the label tables: parquet, csv or json (default: parquet).
    /// CSV label tables are all text, and empty strings are stored as nulls
    #[arg(long, default_value_t = TableFormat::Parquet)]
    format: TableFormat,
    /// Read every source file in this format instead of guessing from its extension
    #[arg(long)]
    input_format: Option<TableFormat>,
    /// Also write a CSV copy of every parquet label table when the run finishes
    #[arg(long)]
    csv: bool,
    /// Append extraction events to this file as well
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() {
    init_tracing();

    if let Err(e) = run(AppArgs::parse()) {
        error!("{e}");
        std::process::exit(1);
    }
}

// Log level comes from LOGLEVEL (an EnvFilter directive), defaulting to info.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("LOGLEVEL").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

fn run(args: AppArgs) -> ExtractionResult<()> {
    match args.command {
        Command::Extract(args) => extract(args),
        Command::ToCsv { folder } => {
            let written = convert_folder_to_csv(&folder)?;
            info!(files = written.len(), folder = %folder.display(), "converted parquet files to csv");
            print_stats(&folder)
        }
    }
}

fn extract(args: ExtractArgs) -> ExtractionResult<()> {
    let config = Config::from_path(&args.config)?;

    let observer: Arc<dyn ExtractionObserver> = match &args.log_file {
        Some(path) => Arc::new(CompositeObserver::new(vec![
            Arc::new(TracingObserver),
            Arc::new(FileObserver::new(path)),
        ])),
        None => Arc::new(TracingObserver),
    };

    let opts = RunOptions {
        output_format: args.format,
        input_format: args.input_format,
        ..RunOptions::default()
    };
    let report = ExtractionEngine::new(opts)
        .with_observer(observer)
        .run(&config, &args.folder, &args.output)?;

    for abandoned in &report.abandoned {
        error!(
            folder = %abandoned.folder,
            pattern = %abandoned.pattern,
            file = %abandoned.file.display(),
            "{}",
            abandoned.error
        );
    }

    if args.csv {
        let written = convert_folder_to_csv(&args.output)?;
        info!(files = written.len(), "converted label tables to csv");
    }

    print_stats(&args.output)
}

fn print_stats(folder: &Path) -> ExtractionResult<()> {
    let stats = folder_stats(folder)?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
