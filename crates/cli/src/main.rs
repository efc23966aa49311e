//! Bakes n Plates CLI - dashboard data entry, reports and migrations.
//!
//! # Usage
//!
//! ```bash
//! # Create the documents table
//! bnp-cli migrate
//!
//! # Seed an empty store with the starter menu, customers, orders and stock
//! bnp-cli seed
//!
//! # Overview and listings
//! bnp-cli dashboard
//! bnp-cli orders list
//!
//! # Data entry
//! bnp-cli orders add --customer "Ama Serwaa" --product "Bento Cake (x1)" --total "GH₵65.00"
//! bnp-cli orders status <ORDER_ID> completed
//! bnp-cli pos --item "Bento Cake=1" --item "Sobolo Juice=2" --new-customer "Ama Serwaa"
//!
//! # AI reports (needs CLAUDE_API_KEY)
//! bnp-cli report --start 2024-03-01 --end 2024-03-31
//! bnp-cli analytics
//! ```
//!
//! Without `DATABASE_URL` every command runs against a fresh in-memory store.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bakesnplates_admin::DashboardConfig;

mod commands;

use commands::{
    CustomerAction, ExpenseAction, InventoryAction, NotificationAction, OrderAction, PosArgs,
    ProductAction, ReportArgs,
};

#[derive(Parser)]
#[command(name = "bnp-cli")]
#[command(author, version, about = "Bakes n Plates dashboard CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed empty collections with starter data
    Seed,
    /// Show revenue, pending orders and stock alerts
    Dashboard,
    /// Manage products
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Manage customers
    Customers {
        #[command(subcommand)]
        action: CustomerAction,
    },
    /// Manage orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Manage inventory
    Inventory {
        #[command(subcommand)]
        action: InventoryAction,
    },
    /// Manage expenses
    Expenses {
        #[command(subcommand)]
        action: ExpenseAction,
    },
    /// Ring up a point-of-sale order
    Pos(PosArgs),
    /// Generate an AI sales report
    Report(ReportArgs),
    /// Generate an AI analytics summary
    Analytics,
    /// Show or clear a user's notifications
    Notifications {
        #[command(subcommand)]
        action: NotificationAction,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &DashboardConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bakesnplates_admin=info,bnp_cli=info".into());

    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));
    let json_layer = json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Configuration is needed before tracing so Sentry can hook in first
    let config = DashboardConfig::from_env();
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);
    init_tracing();

    let result: Result<(), Box<dyn std::error::Error>> = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: DashboardConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run(&config).await,
        command => dispatch(&commands::Context::connect(config).await?, command).await,
    }
}

async fn dispatch(
    ctx: &commands::Context,
    command: Commands,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Migrate => commands::migrate::run(&ctx.config).await,
        Commands::Seed => commands::seed::run(ctx).await,
        Commands::Dashboard => commands::dashboard::run(ctx).await,
        Commands::Products { action } => commands::products::run(ctx, action).await,
        Commands::Customers { action } => commands::customers::run(ctx, action).await,
        Commands::Orders { action } => commands::orders::run(ctx, action).await,
        Commands::Inventory { action } => commands::inventory::run(ctx, action).await,
        Commands::Expenses { action } => commands::expenses::run(ctx, action).await,
        Commands::Pos(args) => commands::pos::run(ctx, args).await,
        Commands::Report(args) => commands::report::sales(ctx, args).await,
        Commands::Analytics => commands::report::analytics(ctx).await,
        Commands::Notifications { action } => commands::notifications::run(ctx, action).await,
    }
}
