//! SSMS Reports - scholarship sponsorship report aggregator
//!
//! A CLI tool that fetches the five collections of the SSMS record-keeping
//! API, joins them client-side and renders the sponsorship reports and a
//! dashboard summary as Markdown or JSON.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (invalid arguments, config, report writing, etc.)
//!   2 - Every selected report is empty and --fail-on-empty is set

mod analysis;
mod api;
mod cli;
mod config;
mod data;
mod models;
mod report;

use analysis::{DashboardSettings, DashboardSummary, LookupIndex, ReportSession};
use anyhow::{Context, Result};
use api::ApiClient;
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, DEFAULT_CONFIG_FILE};
use data::DataContext;
use indicatif::{ProgressBar, ProgressStyle};
use models::{Report, ReportMetadata, ReportSection};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Load configuration; `general.verbose` feeds the log level
    let (config, source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = config.validate() {
        eprintln!("Error: invalid configuration: {}", e);
        std::process::exit(1);
    }

    // Initialize logging
    init_logging(&args, &config);

    info!("SSMS Reports v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    source.log();

    match run_report(args, config).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Report generation failed: {}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .ssms-reports.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    println!("   Edit it to customize the API URL, endpoints, sections, and more.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args, config: &Config) {
    let level = args.log_level(config.general.verbose);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Fetch, compute and write the report. Returns exit code (0 or 2).
async fn run_report(args: Args, config: Config) -> Result<i32> {
    let start_time = Instant::now();

    // Step 1: Fetch the collections
    let client = ApiClient::new(&config.api).context("Failed to create API client")?;
    println!("📥 Fetching collections from {}", client.base_url());
    println!("   Timeout: {}s per request", config.api.timeout_seconds);

    let data = fetch_collections(&client, !args.quiet).await;
    report_failed_sources(&data);

    // Handle --dry-run: show what was fetched and exit
    if args.dry_run {
        return Ok(handle_dry_run(&data));
    }

    // Step 2: Compute the views
    println!("\n🔬 Computing reports...");
    let session = ReportSession::new(data, args.filters());
    let sections = config.report.sections.clone();

    let dashboard = if sections.contains(&ReportSection::Dashboard) {
        let settings = DashboardSettings::new(&config.report, Utc::now().date_naive());
        debug!("Dashboard settings: {:?}", settings);
        Some(DashboardSummary::compute(
            &LookupIndex::build(session.data()),
            &settings,
        ))
    } else {
        None
    };

    // Step 3: Build the report
    println!("\n📝 Generating report...");

    let report = Report {
        metadata: ReportMetadata {
            api_url: client.base_url().to_string(),
            generated_at: Utc::now(),
            filters: session.filters().clone(),
            sources: session.data().sources(),
        },
        sections,
        filter_options: session.options().clone(),
        views: session.views().clone(),
        dashboard,
    };

    let output = match config.general.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report),
    };

    let output_path = PathBuf::from(&config.general.output);
    report::write_report(&output, &output_path)?;

    // Print summary
    let duration = start_time.elapsed().as_secs_f64();
    let loaded = report.metadata.sources.iter().filter(|s| s.loaded).count();

    println!("\n📊 Report Summary:");
    println!(
        "   Collections loaded: {}/{}",
        loaded,
        report.metadata.sources.len()
    );
    for section in &report.sections {
        match report.views.row_count(*section) {
            Some(rows) => println!("   - {}: {} rows", section.title(), rows),
            None => println!("   - {}: included", section.title()),
        }
    }
    println!("   Duration: {:.1}s", duration);
    println!("\n✅ Report saved to: {}", output_path.display());

    if args.fail_on_empty && report.selected_views_empty() {
        eprintln!("\n⛔ Every selected report is empty. Failing (exit code 2).");
        return Ok(2);
    }

    Ok(0)
}

/// Fetch all collections, with a spinner unless running quietly.
async fn fetch_collections(client: &ApiClient, show_progress: bool) -> DataContext {
    let spinner = if show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Fetching students, sponsors, programs, allocations and payments...");
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let data = data::load_all(client).await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    data
}

/// Tell the user which collections could not be fetched.
fn report_failed_sources(data: &DataContext) {
    if data.is_ready() {
        return;
    }

    warn!("Not all collections could be loaded; affected reports will be incomplete");
    for source in data.sources().iter().filter(|s| !s.loaded) {
        println!(
            "   ⚠️  {}: {}",
            source.collection,
            source.error.as_deref().unwrap_or("not loaded")
        );
    }
}

/// Handle --dry-run: print record counts and filter values, exit.
fn handle_dry_run(data: &DataContext) -> i32 {
    println!("\n🔍 Dry run: collections fetched, no report will be written.\n");

    for source in data.sources() {
        if source.loaded {
            println!("     📄 {}: {} records", source.collection, source.records);
        } else {
            println!("     ❌ {}: not loaded", source.collection);
        }
    }

    let options = analysis::FilterOptions::from_data(data);

    println!("\n   Available filter values:");
    println!("     Universities: {}", join_or_none(&options.universities));
    println!("     Statuses: {}", join_or_none(&options.statuses));
    println!("     Years: {}", options.years.join(", "));
    println!("     Semesters: {}", options.semesters.join(", "));

    let sponsors: Vec<String> = options
        .sponsors
        .iter()
        .map(|s| format!("{} = {}", s.value, s.label))
        .collect();
    println!("     Sponsor ids: {}", join_or_none(&sponsors));
    println!("     Students: {} selectable", options.students.len());

    println!("\n✅ Dry run complete. No report was written.");
    0
}

fn join_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "(none)".to_string()
    } else {
        values.join(", ")
    }
}

/// Load configuration from file or use defaults.
/// Where the effective configuration came from.
enum ConfigSource {
    Explicit(PathBuf),
    DefaultFile,
    Defaults,
    DefaultFileUnreadable(anyhow::Error),
}

impl ConfigSource {
    fn log(&self) {
        match self {
            ConfigSource::Explicit(path) => info!("Loaded config from: {}", path.display()),
            ConfigSource::DefaultFile => {
                info!("Loaded default config from {}", DEFAULT_CONFIG_FILE)
            }
            ConfigSource::Defaults => debug!("No config file found, using defaults"),
            ConfigSource::DefaultFileUnreadable(e) => warn!("Failed to load config: {}", e),
        }
    }
}

/// Load the config file (explicit path, then the default file, then
/// built-in defaults) and apply command-line overrides.
fn load_config(args: &Args) -> Result<(Config, ConfigSource)> {
    let (mut config, source) = if let Some(ref config_path) = args.config {
        (
            Config::load(config_path)?,
            ConfigSource::Explicit(config_path.clone()),
        )
    } else {
        match Config::load_default() {
            Ok(Some(config)) => (config, ConfigSource::DefaultFile),
            Ok(None) => (Config::default(), ConfigSource::Defaults),
            Err(e) => (Config::default(), ConfigSource::DefaultFileUnreadable(e)),
        }
    };

    config.merge_with_args(args);
    Ok((config, source))
}
