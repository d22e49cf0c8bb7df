//! SalesDash - sales pipeline dashboard for the terminal
//!
//! A CLI that pulls sales representatives and deals from the dashboard
//! backend, computes pipeline metrics and renders a report. It can also
//! forward a question to the backend's AI assistant.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (connection, config, malformed data, etc.)

mod analysis;
mod api;
mod cli;
mod config;
mod data;
mod error;
mod models;
mod report;

use anyhow::{Context, Result};
use api::{ClientConfig, DashboardClient};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use indicatif::{ProgressBar, ProgressStyle};
use models::{Dashboard, DashboardMetadata, Deal, SalesRep};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // No logging needed to write a config file
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("SalesDash v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args).await {
        error!("Dashboard failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .salesdash.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE_NAME);
        std::process::exit(1);
    }

    std::fs::write(path, Config::default_toml())
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so stdout stays clean for the report.
fn init_logging(args: &Args) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    if let Some(ref question) = args.ask {
        let client = build_client(&config)?;
        let spinner = start_spinner(args.quiet, "Asking AI assistant...");
        let answer = client.ask(question).await;
        finish_spinner(spinner);

        println!("{}", answer?);
        return Ok(());
    }

    let (source, reps, deals) = match config.general.data_file {
        Some(ref path) => {
            let (reps, deals) = load_local(Path::new(path), args.rep)?;
            (path.clone(), reps, deals)
        }
        None => {
            let client = build_client(&config)?;
            let spinner = start_spinner(args.quiet, "Fetching sales data...");
            let fetched = fetch_remote(&client, args.rep).await;
            finish_spinner(spinner);

            let (reps, deals) = fetched?;
            (config.api.base_url.clone(), reps, deals)
        }
    };

    let mut dashboard = build_dashboard(source, reps, deals)?;
    if !config.report.include_deals {
        dashboard.deals.clear();
    }
    if !config.report.include_reps {
        dashboard.reps.clear();
    }

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&dashboard)?,
        OutputFormat::Markdown => report::generate_markdown_report(&dashboard),
    };

    match args.output {
        Some(ref path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            if !args.quiet {
                eprintln!(
                    "📊 Pipeline {} | Won {} | Win rate {}",
                    report::format_currency(dashboard.metrics.total_pipeline_value),
                    report::format_currency(dashboard.metrics.closed_won_value),
                    report::format_percentage(dashboard.metrics.win_rate_percentage)
                );
                eprintln!("✅ Dashboard saved to: {}", path.display());
            }
        }
        None => print!("{}", output),
    }

    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}

fn build_client(config: &Config) -> Result<DashboardClient> {
    DashboardClient::new(ClientConfig {
        base_url: config.api.base_url.clone(),
        timeout_seconds: config.api.timeout_seconds,
    })
}

/// Read reps and deals from a dataset file, optionally narrowed to one rep.
fn load_local(path: &Path, rep_id: Option<u32>) -> Result<(Vec<SalesRep>, Vec<Deal>)> {
    let mut reps = data::load_dataset(path)?;

    if let Some(id) = rep_id {
        let rep = data::find_rep(&reps, id)
            .cloned()
            .with_context(|| format!("Sales representative {} not found", id))?;
        reps = vec![rep];
    }

    let deals = data::flatten_deals(&reps);
    Ok((reps, deals))
}

/// Fetch reps and deals from the API, optionally narrowed to one rep.
async fn fetch_remote(
    client: &DashboardClient,
    rep_id: Option<u32>,
) -> Result<(Vec<SalesRep>, Vec<Deal>)> {
    match rep_id {
        Some(id) => {
            let rep = client.get_sales_rep(id).await?;
            let reps = vec![rep];
            let deals = data::flatten_deals(&reps);
            Ok((reps, deals))
        }
        None => client.fetch_dashboard().await,
    }
}

/// Compute every derived figure the report shows.
fn build_dashboard(source: String, reps: Vec<SalesRep>, deals: Vec<Deal>) -> Result<Dashboard> {
    let metrics = analysis::aggregate_metrics(&deals).context("Cannot compute pipeline metrics")?;
    let rep_summaries =
        analysis::rep_summaries(&reps).context("Cannot compute sales rep summaries")?;

    info!(
        "Pipeline {} across {} deals, win rate {}%",
        metrics.total_pipeline_value,
        deals.len(),
        metrics.win_rate_percentage
    );

    Ok(Dashboard {
        metadata: DashboardMetadata {
            source,
            generated_at: Utc::now(),
            rep_count: reps.len(),
            deal_count: deals.len(),
        },
        metrics,
        status_breakdown: analysis::status_breakdown(&deals),
        regions: analysis::regions(&reps),
        reps: rep_summaries,
        deals,
    })
}

fn start_spinner(quiet: bool, message: &'static str) -> Option<ProgressBar> {
    if quiet {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

fn finish_spinner(spinner: Option<ProgressBar>) {
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
}
