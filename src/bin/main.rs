//! Salesboard CLI - Sales KPIs and revenue breakdowns from AdventureWorks
//!
//! Usage:
//!   salesboard summary [--from <date>] [--to <date>] [--region <name>]... [--json]
//!   salesboard options
//!   salesboard rows [--limit <n>]
//!   salesboard check
//!
//! Examples:
//!   salesboard summary --from 2013-01-01 --to 2013-12-31 --granularity quarter
//!   salesboard summary --category Bikes --region California --top 5 --json
//!   salesboard rows --region Texas --limit 20
//!   salesboard check --connection cloud

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use salesboard::config::{
    ConnectionConfig, ConnectionError, Deployment, LogFormat, LoggingSettings, ResolvedConnection,
    Settings, SettingsError,
};
use salesboard::dashboard::{AppContext, Session};
use salesboard::filter::DateRange;
use salesboard::model::Granularity;
use salesboard::render::{render_options, render_rows, render_summary};
use salesboard::source::{self, DataError};
use std::env;
use std::process::ExitCode;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "salesboard")]
#[command(about = "Salesboard - Sales KPIs and revenue breakdowns from AdventureWorks")]
#[command(version)]
struct Cli {
    /// Connection profile to use (defaults to the deployment's profile)
    #[arg(short, long, global = true)]
    connection: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show KPIs and revenue by period, product, category and region
    Summary {
        #[command(flatten)]
        filters: FilterArgs,

        /// Time bucket for the revenue trend
        #[arg(short, long)]
        granularity: Option<GranularityArg>,

        /// Number of products in the ranking
        #[arg(short, long)]
        top: Option<usize>,

        /// Emit the full snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the available filter values and the date span
    Options {
        /// Emit as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the filtered rows, newest first
    Rows {
        #[command(flatten)]
        filters: FilterArgs,

        /// Maximum number of rows to print
        #[arg(short, long, default_value_t = 50)]
        limit: usize,
    },

    /// Connect, load the dataset and report its size
    Check,
}

#[derive(Args)]
struct FilterArgs {
    /// First order day to include (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last order day to include (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Product category to include (repeatable; all when omitted)
    #[arg(long = "category")]
    categories: Vec<String>,

    /// Product name to include (repeatable; all when omitted)
    #[arg(long = "product")]
    products: Vec<String>,

    /// Region to include (repeatable; all when omitted)
    #[arg(long = "region")]
    regions: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum GranularityArg {
    Month,
    Quarter,
    Year,
}

impl From<GranularityArg> for Granularity {
    fn from(arg: GranularityArg) -> Self {
        match arg {
            GranularityArg::Month => Granularity::Month,
            GranularityArg::Quarter => Granularity::Quarter,
            GranularityArg::Year => Granularity::Year,
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Configuration error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Connection configuration error: {0}")]
    Connection(#[from] ConnectionError),

    #[error("{0}")]
    Data(#[from] DataError),

    #[error("Failed to encode output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(&settings.logging);

    match run(cli, settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, settings: Settings) -> Result<(), CliError> {
    let connection = select_connection(&settings, cli.connection.as_deref())?;
    let client = source::connect(&connection, &settings.worker).await?;
    let context = AppContext::load(client.as_ref(), settings.dashboard).await?;

    match cli.command {
        Commands::Summary {
            filters,
            granularity,
            top,
            json,
        } => {
            let mut session = context.session();
            apply_filters(&mut session, &context, &filters)?;
            if let Some(granularity) = granularity {
                session.set_granularity(granularity.into());
            }
            if let Some(requested) = top {
                let applied = session.set_top_n(requested);
                if applied != requested {
                    warn!(requested, applied, "product ranking size clamped");
                }
            }

            let snapshot = session.snapshot();
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                print!("{}", render_summary(&snapshot));
            }
        }
        Commands::Options { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(context.options())?);
            } else {
                print!("{}", render_options(context.options()));
            }
        }
        Commands::Rows { filters, limit } => {
            let mut session = context.session();
            apply_filters(&mut session, &context, &filters)?;
            let view = session.view();
            print!("{}", render_rows(view.newest_first(), limit));
            if view.len() > limit {
                println!("... {} more rows", view.len() - limit);
            }
        }
        Commands::Check => {
            println!(
                "OK: {} rows from '{}' ({})",
                context.dataset().len(),
                connection.name,
                connection.driver
            );
        }
    }

    Ok(())
}

/// Environment-only configuration wins over the settings file.
fn select_connection(
    settings: &Settings,
    name: Option<&str>,
) -> Result<ResolvedConnection, CliError> {
    if name.is_none() && env::var("SALESBOARD_DB_DRIVER").is_ok() {
        let config = ConnectionConfig::from_env()?;
        return Ok(ResolvedConnection::from_config("env", &config));
    }

    let deployment = Deployment::detect();
    let connection = settings.resolve_connection(name, deployment)?;
    info!(
        %deployment,
        connection = %connection.name,
        driver = %connection.driver,
        "connection selected"
    );
    Ok(connection)
}

fn apply_filters(
    session: &mut Session,
    context: &AppContext,
    filters: &FilterArgs,
) -> Result<(), CliError> {
    let bounds = context.options().date_bounds;
    if filters.from.is_some() || filters.to.is_some() {
        let start = filters.from.or(bounds.map(|b| b.start));
        let end = filters.to.or(bounds.map(|b| b.end));
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(CliError::InvalidArgument(format!(
                    "--from {} is after --to {}",
                    start, end
                )));
            }
            session.set_date_range(Some(DateRange::new(start, end)));
        }
    }

    let options = context.options();
    check_known("category", &filters.categories, &options.categories);
    check_known("product", &filters.products, &options.products);
    check_known("region", &filters.regions, &options.regions);

    if !filters.categories.is_empty() {
        session.set_categories(filters.categories.iter().cloned());
    }
    if !filters.products.is_empty() {
        session.set_products(filters.products.iter().cloned());
    }
    if !filters.regions.is_empty() {
        session.set_regions(filters.regions.iter().cloned());
    }
    Ok(())
}

fn check_known(kind: &str, requested: &[String], known: &[String]) {
    for value in requested {
        if !known.contains(value) {
            warn!(kind, value = %value, "filter value not present in the data");
        }
    }
}

fn init_logging(logging: &LoggingSettings) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    // stdout carries the report; logs go to stderr
    match logging.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Compact => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}
