use anyhow::{Context, Result};
use clap::Parser;
use jobfetch::config::{DEFAULT_API_URL, DEFAULT_COUNTRY, Settings};
use jobfetch::http::{MAX_RETRIES, RATE_LIMIT_DELAY_MS, RETRY_DELAY_MS, RetryPolicy};
use jobfetch::jobs::{DEFAULT_NUM_RESULTS, JobBoard, SearchQuery, generate_report};
use log::info;
use std::path::PathBuf;
use std::time::Duration;

/// jobfetch - job listing search with retries
///
/// Queries an Adzuna-style job search API and prints a plain-text report.
///
/// Credentials are read from ADZUNA_APP_ID and ADZUNA_API_KEY when not given
/// on the command line.
///
/// Examples:
///   jobfetch search --role "Data Scientist" --location "Los Angeles"
#[derive(Parser, Debug)]
#[command(author, version = env!("JOBFETCH_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Job search API base URL
    #[arg(
        long = "api-url",
        env = "JOBFETCH_API_URL",
        value_name = "URL",
        default_value = DEFAULT_API_URL,
        global = true
    )]
    pub api_url: String,

    /// Country code used in the search path
    #[arg(long, env = "JOBFETCH_COUNTRY", default_value = DEFAULT_COUNTRY, global = true)]
    pub country: String,

    /// Application id for the search API
    #[arg(long = "app-id", env = "ADZUNA_APP_ID", hide_env_values = true, global = true)]
    pub app_id: Option<String>,

    /// Application key for the search API
    #[arg(long = "app-key", env = "ADZUNA_API_KEY", hide_env_values = true, global = true)]
    pub app_key: Option<String>,

    /// Per-attempt timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 30, global = true)]
    pub timeout: u64,

    /// Maximum number of attempts per request
    #[arg(long = "max-retries", value_name = "N", default_value_t = MAX_RETRIES, global = true)]
    pub max_retries: usize,

    /// Base delay between attempts in milliseconds
    #[arg(long = "retry-delay", value_name = "MS", default_value_t = RETRY_DELAY_MS, global = true)]
    pub retry_delay: u64,

    /// Delay after a rate-limited response in milliseconds
    #[arg(long = "rate-limit-delay", value_name = "MS", default_value_t = RATE_LIMIT_DELAY_MS, global = true)]
    pub rate_limit_delay: u64,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Search job listings and print a report
    Search(SearchArgs),
}

#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    /// Job title or role to search for
    #[arg(long)]
    pub role: String,

    /// Location to search in
    #[arg(long)]
    pub location: String,

    /// Number of listings to return (1-50)
    #[arg(long = "num-results", short = 'n', default_value_t = DEFAULT_NUM_RESULTS)]
    pub num_results: u32,

    /// Write the report to a file instead of stdout
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl Cli {
    fn settings(&self) -> Settings {
        Settings {
            api_url: self.api_url.clone(),
            country: self.country.clone(),
            app_id: self.app_id.clone(),
            app_key: self.app_key.clone(),
            timeout: Duration::from_secs(self.timeout),
            retry: RetryPolicy {
                max_attempts: self.max_retries,
                base_delay: Duration::from_millis(self.retry_delay),
                rate_limit_delay: Duration::from_millis(self.rate_limit_delay),
                ..RetryPolicy::default()
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let settings = cli.settings();

    match cli.command {
        Commands::Search(args) => {
            let board = JobBoard::from_settings(&settings)?;
            let query = SearchQuery::new(args.role, args.location, args.num_results);
            let report = generate_report(&board, &query).await?;

            match args.output {
                Some(path) => {
                    std::fs::write(&path, &report)
                        .with_context(|| format!("Failed to write report to {:?}", path))?;
                    info!("Report saved to {:?}", path);
                    println!("Report saved to {}", path.display());
                }
                None => print!("{}", report),
            }
        }
    }
    Ok(())
}
