use clap::{Parser, Subcommand};
use finsight::cli;
use finsight::config::AnalysisConfig;
use finsight::error::FinsightResult;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "finsight")]
#[command(about = "Financial table analysis: ratios, trends, correlations, forecasts.")]
#[command(long_about = "Finsight - Financial metrics from CSV, Excel and YAML tables

COMMANDS:
  analyze   - Ratios, growth trends and correlation matrix for one table
  forecast  - Linear (OLS) forecast of one column
  compare   - Compare two or more tables against the first
  watch     - Re-run analyze on file changes

EXAMPLES:
  finsight analyze quarterly.csv
  finsight analyze quarterly.xlsx --output report.xlsx
  finsight forecast quarterly.csv --column revenue --periods 4
  finsight compare region_a.csv region_b.csv --output diff.json

LOGGING:
  RUST_LOG=finsight=debug finsight analyze quarterly.csv")]
#[command(version)]
struct Cli {
    /// Analysis settings file (YAML)
    #[arg(short, long, global = true, env = "FINSIGHT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Analyze a single table.

Computes financial ratios (profit margin, gross margin, ROA, ROE, current
ratio, debt-to-equity) from recognised column names, first-vs-last growth
for every numeric column, and the Pearson correlation matrix.

OUTPUT FORMATS:
  --output report.json   Pretty JSON
  --output report.yaml   YAML
  --output report.xlsx   Excel workbook (Financial Ratios, Trends, Correlation)")]
    /// Analyze one table
    Analyze {
        /// Path to a .csv, .xlsx, .xls, .yaml or .yml file
        file: PathBuf,

        /// Write the report to this file (.json, .yaml or .xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show loading details and chart series
        #[arg(short, long)]
        verbose: bool,
    },

    /// Forecast a numeric column with a least-squares line
    Forecast {
        /// Path to the table file
        file: PathBuf,

        /// Column to forecast (exact name)
        #[arg(short = 'C', long)]
        column: String,

        /// Number of periods past the last row [default: from config, 3]
        #[arg(short, long)]
        periods: Option<usize>,

        /// Write the forecast to this file (.json, .yaml or .xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    #[command(long_about = "Compare two or more tables.

The first file is the baseline. Reports summary statistics for columns
shared by every table, percentage differences of each mean against the
baseline mean, and the change in correlation per table.")]
    /// Compare tables against the first one
    Compare {
        /// Table files; the first is the baseline
        #[arg(required = true, num_args = 2..)]
        files: Vec<PathBuf>,

        /// Write the comparison to this file (.json, .yaml or .xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Watch a table file and re-run analyze on every save
    Watch {
        /// Path to the table file
        file: PathBuf,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> FinsightResult<()> {
    // Logs go to stderr so reports on stdout stay clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("finsight=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AnalysisConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze {
            file,
            output,
            verbose,
        } => cli::analyze(file, output, verbose, &config),

        Commands::Forecast {
            file,
            column,
            periods,
            output,
        } => cli::forecast(file, column, periods, output, &config),

        Commands::Compare { files, output } => cli::compare(files, output, &config),

        Commands::Watch { file, verbose } => cli::watch(file, verbose, &config),
    }
}
