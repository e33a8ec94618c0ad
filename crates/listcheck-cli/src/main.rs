mod extract;
mod input;
mod reconcile;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "listcheck")]
#[command(about = "Verify vehicle listing records against live third-party sources")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Parse an authoritative CSV sheet into records (JSON on stdout)
    ParseInput {
        /// CSV file with a header row; Brand and Model columns are required
        csv: PathBuf,

        /// Write the records here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Run the extraction waterfall against one URL
    Extract {
        url: String,

        /// Source key; overrides detection by host
        #[arg(long)]
        source: Option<String>,

        /// Brand hint, required for API extraction
        #[arg(long)]
        brand: Option<String>,

        /// Model hint, required for API extraction
        #[arg(long)]
        model: Option<String>,

        /// Append the result to this JSON array file (created if absent)
        #[arg(long)]
        append: Option<PathBuf>,
    },
    /// Compare records against extraction results (JSON on stdout)
    Compare {
        #[arg(long)]
        records: PathBuf,

        #[arg(long)]
        results: PathBuf,

        /// Only compare the record from this sheet row
        #[arg(long)]
        row: Option<usize>,
    },
    /// Compare every record and write the verification report
    SaveReport {
        #[arg(long)]
        records: PathBuf,

        #[arg(long)]
        results: PathBuf,

        #[arg(long)]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse arguments first so `--help` and usage errors never depend on
    // the environment being valid.
    let cli = Cli::parse();

    let config = listcheck_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(config.env.colored_logs())
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(
        env = %config.env,
        profiles_dir = %config.profiles_dir.display(),
        "configuration loaded"
    );

    match cli.command {
        Commands::ParseInput { csv, out } => input::run_parse_input(&csv, out.as_deref()),
        Commands::Extract {
            url,
            source,
            brand,
            model,
            append,
        } => {
            extract::run_extract(
                &config,
                extract::ExtractArgs {
                    url,
                    source,
                    brand,
                    model,
                    append,
                },
            )
            .await
        }
        Commands::Compare {
            records,
            results,
            row,
        } => reconcile::run_compare(&records, &results, row),
        Commands::SaveReport {
            records,
            results,
            out,
        } => reconcile::run_save_report(&records, &results, &out),
    }
}

#[cfg(test)]
mod tests;
