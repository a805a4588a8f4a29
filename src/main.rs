use clap::{Parser, Subcommand, builder::styling};
use eyre::Result;
use owo_colors::OwoColorize;
use stat_ingest::{
    cli::{LoadOptions, extract_dataset, layout_yaml, push_dataset, run_dataset},
    datasets::DatasetKind,
    loader::LoadReport,
};
use std::path::PathBuf;

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// Exit status when a run completed but some rows were not accepted
const PARTIAL_FAILURE: i32 = 2;

/// statin: reshape regional statistics spreadsheets and load them into the dataset API
#[derive(Parser)]
#[command(name = "statin", version, styles = STYLES)]
struct Cli {
    /// The dotenv file to source API settings from
    #[arg(short, long, global = true, default_value = ".env")]
    env: String,

    /// More verbose logging
    #[arg(long, global = true)]
    debug: bool,

    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct LoadArgs {
    /// Resource path relative to DATASET_API_URL (defaults to the dataset's collection)
    #[arg(short, long)]
    resource: Option<String>,

    /// Write the JSON load report to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Submit only the rows that failed in this earlier load report
    #[arg(long)]
    retry_from: Option<PathBuf>,

    /// Exit with status 2 if any row was not accepted
    #[arg(long)]
    strict: bool,
}

impl LoadArgs {
    fn options(&self) -> LoadOptions {
        LoadOptions {
            resource: self.resource.clone(),
            report: self.report.clone(),
            retry_from: self.retry_from.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Reshape a source file into a canonical CSV table
    Extract {
        /// Dataset family of the source file
        dataset: DatasetKind,

        /// Workbook or CSV file to read
        source: PathBuf,

        /// CSV file to write
        output: PathBuf,

        /// Sheet layout YAML replacing the built-in one
        #[arg(short, long)]
        layout: Option<PathBuf>,
    },

    /// Load a canonical CSV table into the dataset API
    Push {
        /// Dataset family of the table
        dataset: DatasetKind,

        /// Canonical CSV table, as written by `extract`
        table: PathBuf,

        #[command(flatten)]
        load: LoadArgs,
    },

    /// Extract a source file and load it in one go
    Run {
        /// Dataset family of the source file
        dataset: DatasetKind,

        /// Workbook or CSV file to read
        source: PathBuf,

        /// Also write the canonical table to this CSV file before loading
        #[arg(short, long)]
        checkpoint: Option<PathBuf>,

        /// Sheet layout YAML replacing the built-in one
        #[arg(short, long)]
        layout: Option<PathBuf>,

        #[command(flatten)]
        load: LoadArgs,
    },

    /// Print a built-in sheet layout as YAML
    Layout {
        /// Layout name (employment, employment-all-sheets, demography)
        name: String,
    },
}

fn print_tally(report: &LoadReport) {
    println!("{} {}", "Accepted:".green(), report.accepted);
    println!("{} {}", "Rejected locally:".yellow(), report.rejected_locally);
    println!("{} {}", "Rejected remotely:".red(), report.rejected_remotely);
    println!("{} {}", "Transport failed:".red(), report.transport_failed);
}

fn finish(report: &LoadReport, strict: bool) {
    print_tally(report);
    if strict && !report.is_complete() {
        log::error!(
            "{} of {} row(s) were not accepted",
            report.failures.len(),
            report.total()
        );
        std::process::exit(PARTIAL_FAILURE);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if std::path::Path::new(&cli.env).exists() {
        dotenvy::from_filename(&cli.env)?;
    }

    let log_level = match cli.debug {
        true => "debug",
        false => "info",
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level);
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();

    match cli.command {
        Commands::Extract {
            dataset,
            source,
            output,
            layout,
        } => {
            log::info!(
                "Extracting {} into {}",
                source.display().bright_black(),
                output.display().bright_black()
            );
            let count = extract_dataset(dataset, &source, &output, layout.as_deref()).await?;
            println!("{} {} row(s)", "Extracted:".green(), count);
        }
        Commands::Push {
            dataset,
            table,
            load,
        } => {
            log::info!(
                "Pushing {} table {}",
                dataset.cyan(),
                table.display().bright_black()
            );
            let report = push_dataset(dataset, &table, &load.options()).await?;
            finish(&report, load.strict);
        }
        Commands::Run {
            dataset,
            source,
            checkpoint,
            layout,
            load,
        } => {
            log::info!(
                "Running {} from {}",
                dataset.cyan(),
                source.display().bright_black()
            );
            let report = run_dataset(
                dataset,
                &source,
                checkpoint.as_deref(),
                layout.as_deref(),
                &load.options(),
            )
            .await?;
            finish(&report, load.strict);
        }
        Commands::Layout { name } => {
            print!("{}", layout_yaml(&name)?);
        }
    }

    Ok(())
}
