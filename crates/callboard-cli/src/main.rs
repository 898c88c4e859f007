//! Callboard CLI - Room-service call logging and daily sales reports
//!
//! Operator console for calling rooms, recording outcomes and orders, and
//! exporting the day's figures.

mod config;
mod export;
mod menu;
mod session;
mod store;

use anyhow::{bail, Context, Result};
use callboard::application::DEFAULT_RESET_HOUR;
use callboard::{
    compute_daily_stats, top_selling_items, CallDesk, Catalog, Clock, RecordLog, ResetController,
    ResetEvent, ResetScheduler, SchedulerConfig, SystemClock, TickOutcome,
};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use dialoguer::Confirm;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast::error::TryRecvError;
use tracing_subscriber::EnvFilter;

use config::Config;
use session::SessionEnd;
use store::JsonFileStore;

#[derive(Parser)]
#[command(name = "callboard")]
#[command(about = "Callboard CLI - Room-service call logging and daily sales reports", long_about = None)]
#[command(version)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log one call interactively
    Call,

    /// Log calls until an empty room number, with the daily reset running
    Console,

    /// List today's records, newest first
    Records {
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Show today's statistics and top sellers
    Report {
        /// Number of top selling items
        #[arg(short, long, default_value_t = callboard::domain::DEFAULT_TOP_LIMIT)]
        top: usize,
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Export today's records
    Export {
        /// Output format
        #[arg(value_enum)]
        format: ExportFormat,
        /// Output file (defaults to sales_report_YYYY-MM-DD.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Clear today's records now
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Turn the automatic daily reset on or off
    AutoReset {
        #[command(subcommand)]
        action: AutoResetAction,
    },

    /// Run one automatic reset check (for cron-style hosts)
    Tick,

    /// List the menu
    Menu {
        /// Only this category
        #[arg(short, long)]
        category: Option<String>,
        /// Case-insensitive search in names and descriptions
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show current configuration
    Config {
        /// Write the effective configuration to the config file if it does not exist
        #[arg(long)]
        init: bool,
    },
}

#[derive(Subcommand)]
enum AutoResetAction {
    /// Enable the automatic reset
    On,
    /// Disable the automatic reset
    Off,
    /// Show the setting and the last reset date
    Status,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Csv,
    Html,
}

impl ExportFormat {
    fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Html => "html",
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Call => cmd_call().await,
        Commands::Console => cmd_console().await,
        Commands::Records { json } => cmd_records(json).await,
        Commands::Report { top, json } => cmd_report(top, json).await,
        Commands::Export { format, output } => cmd_export(format, output).await,
        Commands::Reset { yes } => cmd_reset(yes).await,
        Commands::AutoReset { action } => cmd_auto_reset(action).await,
        Commands::Tick => cmd_tick().await,
        Commands::Menu { category, search } => cmd_menu(category, search),
        Commands::Config { init } => cmd_config(init),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "callboard=warn",
        1 => "callboard=info",
        _ => "callboard=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ============================================
// Wiring
// ============================================

/// Everything a command needs: configuration, the record log and the clock
struct AppState {
    config: Config,
    log: Arc<RecordLog<JsonFileStore>>,
    clock: Arc<dyn Clock>,
    /// Set when the startup check cleared a previous day's records
    startup_reset: Option<ResetEvent>,
}

impl AppState {
    async fn open() -> Result<Self> {
        let config = Config::load()?;
        let store = JsonFileStore::open(config.store_path()?).await?;
        Self::start(config, store, Arc::new(SystemClock)).await
    }

    /// Load the log and run the startup reset check before any command reads
    /// or appends records. A failed check is logged, not fatal.
    async fn start(config: Config, store: JsonFileStore, clock: Arc<dyn Clock>) -> Result<Self> {
        let log = RecordLog::load(Arc::new(store))
            .await
            .context("Failed to load today's records")?;

        let mut app = Self {
            config,
            log: Arc::new(log),
            clock,
            startup_reset: None,
        };

        match app.controller()?.tick().await {
            Ok(TickOutcome::Reset(event)) => app.startup_reset = Some(event),
            Ok(outcome) => tracing::debug!("Startup reset check: {:?}", outcome),
            Err(e) => tracing::warn!("⚠️  Startup reset check failed: {}", e),
        }

        Ok(app)
    }

    fn controller(&self) -> Result<ResetController<JsonFileStore>> {
        Ok(ResetController::new(
            self.log.clone(),
            self.clock.clone(),
            self.config.reset_policy()?,
        ))
    }

    fn desk(&self) -> CallDesk<JsonFileStore> {
        CallDesk::new(self.log.clone(), self.clock.clone())
    }

    fn catalog(&self) -> Result<Catalog> {
        menu::load(self.config.catalog_path.as_deref())
    }
}

// ============================================
// Command Implementations
// ============================================

async fn cmd_call() -> Result<()> {
    let app = AppState::open().await?;
    let catalog = app.catalog()?;
    let mut desk = app.desk();

    println!("{}", app.config.property_name.bold());
    session::run_call(&mut desk, &catalog, &app.config).await?;
    Ok(())
}

async fn cmd_console() -> Result<()> {
    let app = AppState::open().await?;
    let catalog = app.catalog()?;
    let controller = Arc::new(app.controller()?);
    let mut resets = controller.subscribe();

    let scheduler = ResetScheduler::new(
        controller.clone(),
        Some(SchedulerConfig {
            interval: app.config.check_interval(),
        }),
    )
    .start();

    println!(
        "{} {}",
        app.config.property_name.bold(),
        "- call console".dimmed()
    );
    if let Some(event) = &app.startup_reset {
        announce_reset(event);
    }

    let mut desk = app.desk();
    let mut saved = 0usize;
    let mut session_revenue = 0u64;
    loop {
        loop {
            match resets.try_recv() {
                Ok(event) => announce_reset(&event),
                Err(TryRecvError::Lagged(_)) => continue,
                Err(_) => break,
            }
        }

        match session::run_call(&mut desk, &catalog, &app.config).await? {
            SessionEnd::Saved(record) => {
                saved += 1;
                session_revenue += record.total_amount();
            }
            SessionEnd::Quit => break,
            SessionEnd::Unsaved | SessionEnd::Cancelled => {}
        }
        println!();
    }

    scheduler.abort();

    let stats = desk.stats().await;
    println!(
        "{} {} calls saved this session ({}); today: {} calls, {} orders, {}",
        "✓".green(),
        saved,
        app.config.money(session_revenue),
        stats.total_calls,
        stats.total_ordered,
        app.config.money(stats.total_revenue)
    );
    Ok(())
}

fn announce_reset(event: &ResetEvent) {
    println!(
        "{} Daily reset for {}: {} records cleared",
        "↻".cyan(),
        event.date,
        event.cleared
    );
}

async fn cmd_records(json: bool) -> Result<()> {
    let app = AppState::open().await?;
    let mut records = app.log.all().await;
    records.reverse();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&records).context("Failed to serialize records")?
        );
        return Ok(());
    }

    if records.is_empty() {
        println!("No calls logged today.");
        return Ok(());
    }

    println!("{}", format!("Records ({}):", records.len()).bold());
    for record in &records {
        let time = record.created_at().with_timezone(&Local).format("%H:%M");
        let status = match record.order_status() {
            callboard::OrderStatus::Ordered => record.order_status().label().green(),
            callboard::OrderStatus::NotOrdered => record.order_status().label().yellow(),
            callboard::OrderStatus::NoResponse => record.order_status().label().red(),
        };

        println!(
            "  {} {} {} {} {}",
            time.to_string().dimmed(),
            record.room_number().to_string().cyan().bold(),
            record.outcome().label(),
            status,
            app.config.money(record.total_amount())
        );
        for line in record.ordered_lines() {
            println!("      {}x {}", line.quantity, line.name.dimmed());
        }
    }

    Ok(())
}

async fn cmd_report(top: usize, json: bool) -> Result<()> {
    let app = AppState::open().await?;
    let records = app.log.all().await;
    let stats = compute_daily_stats(&records);
    let breakdown = stats.breakdown();
    let top_sellers = top_selling_items(&records, top);

    if json {
        let report = serde_json::json!({
            "stats": stats,
            "breakdown": breakdown,
            "topSellers": top_sellers,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
        return Ok(());
    }

    println!(
        "{}",
        format!(
            "Daily Report - {}",
            app.clock.now_local().date_naive().format("%Y-%m-%d")
        )
        .bold()
    );
    println!("  Total Calls:      {}", stats.total_calls);
    println!("  Picked:           {}", stats.total_picked);
    println!("  Not Picked:       {}", stats.total_missed);
    println!("  Orders:           {}", stats.total_ordered.to_string().green());
    println!("  Picked, No Order: {}", stats.total_picked_not_ordered);
    println!("  Conversion Rate:  {}%", stats.conversion_rate_percent);
    println!(
        "  Revenue:          {}",
        app.config.money(stats.total_revenue).green().bold()
    );

    println!("\n{}", "Outcome breakdown:".bold());
    println!("  Ordered:          {:.1}%", breakdown.ordered);
    println!("  Picked, No Order: {:.1}%", breakdown.picked_not_ordered);
    println!("  Not Picked:       {:.1}%", breakdown.missed);

    println!("\n{}", "Top sellers:".bold());
    if top_sellers.is_empty() {
        println!("  {}", "No orders yet".dimmed());
    }
    for (rank, item) in top_sellers.iter().enumerate() {
        println!("  {}. {} x{}", rank + 1, item.name.cyan(), item.quantity);
    }

    Ok(())
}

async fn cmd_export(format: ExportFormat, output: Option<PathBuf>) -> Result<()> {
    let app = AppState::open().await?;
    let records = app.log.all().await;
    let today = app.clock.now_local().date_naive();

    let content = match format {
        ExportFormat::Csv => export::render_csv(&records, &Local, &app.config.currency),
        ExportFormat::Html => export::render_html(
            &records,
            &Local,
            &export::ReportHeader {
                property_name: &app.config.property_name,
                currency: &app.config.currency,
                date: today,
            },
        ),
    };

    let path = output
        .unwrap_or_else(|| PathBuf::from(export::default_file_name(today, format.extension())));
    fs::write(&path, content).with_context(|| format!("Failed to write report to {:?}", path))?;

    println!(
        "{} Exported {} records to {:?}",
        "✓".green(),
        records.len(),
        path
    );
    Ok(())
}

async fn cmd_reset(yes: bool) -> Result<()> {
    let app = AppState::open().await?;
    let count = app.log.len().await;

    if count == 0 {
        println!("No records to clear.");
        return Ok(());
    }

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Clear all {} records for today?", count))
            .default(false)
            .interact()
            .context("Failed to read confirmation")?;
        if !confirmed {
            println!("Reset aborted.");
            return Ok(());
        }
    }

    let event = app.controller()?.reset_now().await?;
    println!("{} Cleared {} records", "✓".green(), event.cleared);
    Ok(())
}

async fn cmd_auto_reset(action: AutoResetAction) -> Result<()> {
    let app = AppState::open().await?;
    let controller = app.controller()?;

    match action {
        AutoResetAction::On => {
            controller.set_auto_reset_enabled(true).await?;
            println!("{} Automatic reset enabled", "✓".green());
        }
        AutoResetAction::Off => {
            controller.set_auto_reset_enabled(false).await?;
            println!("{} Automatic reset disabled", "✓".yellow());
        }
        AutoResetAction::Status => {
            let enabled = controller.auto_reset_enabled().await?;
            let last = controller.last_reset_date().await?;
            println!("{}", "Automatic reset:".bold());
            println!(
                "  Enabled: {}",
                if enabled { "Yes".green() } else { "No".red() }
            );
            println!(
                "  Reset Hour: {:02}:00",
                controller.policy().reset_hour()
            );
            println!(
                "  Last Reset: {}",
                last.map(|d| d.to_string())
                    .unwrap_or_else(|| "Never".to_string())
                    .cyan()
            );
        }
    }

    Ok(())
}

async fn cmd_tick() -> Result<()> {
    let app = AppState::open().await?;
    if let Some(event) = &app.startup_reset {
        announce_reset(event);
        return Ok(());
    }
    let controller = app.controller()?;

    match controller.tick().await? {
        TickOutcome::Reset(event) => println!(
            "{} Daily reset for {}: {} records cleared",
            "✓".green(),
            event.date,
            event.cleared
        ),
        TickOutcome::Disabled => println!("Automatic reset is disabled."),
        TickOutcome::BeforeResetHour => println!(
            "Not yet: reset runs after {:02}:00.",
            controller.policy().reset_hour()
        ),
        TickOutcome::AlreadyReset(date) => println!("Already reset on {}.", date),
        TickOutcome::Busy => bail!("Another reset check is running"),
    }

    Ok(())
}

fn cmd_menu(category: Option<String>, search: Option<String>) -> Result<()> {
    let config = Config::load()?;
    let catalog = menu::load(config.catalog_path.as_deref())?;

    if let Some(term) = search {
        let items = catalog.search(&term);
        if items.is_empty() {
            println!("No menu items match '{}'", term);
            return Ok(());
        }
        println!("{} results for '{}':", items.len().to_string().green(), term);
        for item in items {
            println!(
                "  {} {} {}",
                item.id.dimmed(),
                session::item_label(item, &config),
                item.category.dimmed()
            );
        }
        return Ok(());
    }

    let categories: Vec<&String> = match &category {
        Some(wanted) => {
            let found: Vec<&String> = catalog
                .categories()
                .iter()
                .filter(|c| c.eq_ignore_ascii_case(wanted))
                .collect();
            if found.is_empty() {
                bail!("Category '{}' not found", wanted);
            }
            found
        }
        None => catalog.categories().iter().collect(),
    };

    for name in categories {
        println!("{}", name.bold());
        for item in catalog.items_in(name) {
            println!(
                "  {} {}",
                item.id.dimmed(),
                session::item_label(item, &config)
            );
            if !item.description.is_empty() {
                println!("      {}", item.description.dimmed());
            }
        }
    }

    Ok(())
}

fn cmd_config(init: bool) -> Result<()> {
    let config = Config::load()?;
    let path = Config::config_path()?;

    if init {
        if path.exists() {
            bail!("Config file {:?} already exists", path);
        }
        config.save()?;
        println!("{} Config written to {:?}", "✓".green(), path);
    }

    println!("{}", "Configuration:".bold());
    println!("  Path: {:?}", path);
    println!("  Property: {}", config.property_name.cyan());
    println!("  Currency: {}", config.currency);
    println!(
        "  Reset Hour: {:02}:00{}",
        config.reset_hour,
        if config.reset_hour == DEFAULT_RESET_HOUR {
            " (default)".dimmed().to_string()
        } else {
            String::new()
        }
    );
    println!(
        "  Reset Check Interval: {}s",
        config.reset_check_interval_secs
    );
    println!("  Data: {:?}", config.store_path()?);
    println!(
        "  Menu: {}",
        match &config.catalog_path {
            Some(path) => format!("{:?}", path),
            None => "built-in".to_string(),
        }
    );

    Ok(())
}
