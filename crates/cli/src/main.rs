//! Cyberduck CLI - storefront search, cart and gift cards from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Search every configured product source
//! cyberduck search camiseta
//!
//! # Remember the second match as the selected product, then add it
//! cyberduck select falda --index 1
//! cyberduck cart add-selected
//!
//! # Add a gift card and show the cart
//! cyberduck gift-card 50.000
//! cyberduck cart show
//! ```
//!
//! # Commands
//!
//! - `fetch` - Fetch a JSON resource through the cache
//! - `search` - Debounced product search
//! - `select` - Store a search result as the selected product
//! - `cart` - Show and edit the persisted cart
//! - `gift-card` - Add a gift card to the cart

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cyberduck_core::Price;
use cyberduck_storefront::config::StorefrontConfig;
use cyberduck_storefront::error::AppError;
use cyberduck_storefront::state::AppState;

mod commands;

#[derive(Parser)]
#[command(name = "cyberduck")]
#[command(author, version, about = "Cyberduck storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a JSON resource through the cache and print it
    Fetch {
        /// Resource URL
        url: String,
    },
    /// Search every product source
    Search {
        /// Search text (at least three characters by default)
        query: String,
    },
    /// Search, then store one result as the selected product
    Select {
        /// Search text
        query: String,

        /// Position of the result to select
        #[arg(short, long, default_value_t = 0)]
        index: usize,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Add a gift card to the cart
    GiftCard {
        /// Amount in pesos, e.g. 50.000
        amount: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart and its total
    Show,
    /// Add a line item
    Add {
        /// Product name
        name: String,

        /// Price in pesos, e.g. 12.500
        price: Price,

        /// Image URL
        #[arg(long, default_value = "")]
        image: String,

        /// Description
        #[arg(long, default_value = "")]
        desc: String,
    },
    /// Add the selected product
    AddSelected,
    /// Remove the line item at a position
    Remove {
        /// Position as shown by `cart show`
        index: usize,
    },
    /// Remove every line item
    Clear,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
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

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration from environment (needed for Sentry init)
    let config = StorefrontConfig::from_env();

    // Initialize Sentry (must be done before tracing subscriber).
    // Dropped when `main` returns, which flushes queued events.
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cyberduck=info,cyberduck_storefront=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result: Result<(), Box<dyn std::error::Error>> = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_failure(e.as_ref());
            ExitCode::FAILURE
        }
    }
}

/// Log a failed command once. Internal storefront errors also go to Sentry.
///
/// Returns whether the error was sent to Sentry.
fn report_failure(error: &(dyn std::error::Error + 'static)) -> bool {
    match error.downcast_ref::<AppError>() {
        Some(app_error) if app_error.is_internal() => {
            app_error.report();
            true
        }
        _ => {
            tracing::error!("Command failed: {error}");
            false
        }
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(config)?;

    match cli.command {
        Commands::Fetch { url } => commands::fetch::run(&state, &url).await?,
        Commands::Search { query } => commands::search::run(&state, &query).await?,
        Commands::Select { query, index } => commands::search::select(&state, &query, index).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&state),
            CartAction::Add {
                name,
                price,
                image,
                desc,
            } => commands::cart::add(&state, &name, price, &image, &desc)?,
            CartAction::AddSelected => commands::cart::add_selected(&state)?,
            CartAction::Remove { index } => commands::cart::remove(&state, index)?,
            CartAction::Clear => commands::cart::clear(&state)?,
        },
        Commands::GiftCard { amount } => commands::gift_card::add(&state, &amount)?,
    }
    Ok(())
}
