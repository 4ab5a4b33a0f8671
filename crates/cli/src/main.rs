//! FF storefront CLI - drive the cart from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Add a product (price is parsed from the display string)
//! ff-cli add anta-whirlwind --name "Anta Whirlwind" --price "₱4,000.00"
//!
//! # Inspect and adjust the cart
//! ff-cli show
//! ff-cli show --json
//! ff-cli decrement anta-whirlwind
//! ff-cli remove anta-whirlwind
//! ff-cli clear
//!
//! # Place the order
//! ff-cli token set <token>
//! ff-cli checkout
//! ```
//!
//! Configuration is read from the environment (see `ff_storefront::config`).
//! The process exits with status 1 when a command fails, including a
//! checkout that did not place an order.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use ff_core::{AddToCart, ProductId};
use ff_storefront::{
    CartSession, FileStorage, HttpGateway, Result, SessionOptions, StorefrontConfig,
};
use rust_decimal::Decimal;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "ff-cli")]
#[command(author, version, about = "FF storefront cart tools")]
struct Cli {
    /// Directory holding the persisted cart (overrides `FF_STORAGE_DIR`)
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add one unit of a product to the cart
    Add {
        /// Product id
        id: String,

        /// Product name
        #[arg(short, long, default_value = "")]
        name: String,

        /// Display price, e.g. "₱4,000.00"
        #[arg(short, long, default_value = "")]
        price: String,

        /// Numeric unit price (defaults to the amount in --price)
        #[arg(long)]
        price_value: Option<Decimal>,

        /// Image URL
        #[arg(short, long, default_value = "")]
        image: String,
    },
    /// Remove one unit of a product
    Decrement {
        /// Product id
        id: String,
    },
    /// Remove a product's line
    Remove {
        /// Product id
        id: String,
    },
    /// Show the cart
    Show {
        /// Print the cart view as JSON
        #[arg(long)]
        json: bool,
    },
    /// Empty the cart
    Clear,
    /// Submit the cart as an order
    Checkout,
    /// Manage the stored bearer token
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Store a bearer token for checkout
    Set {
        /// Bearer token
        token: String,
    },
    /// Forget the stored token
    Clear,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
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
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            #[allow(clippy::print_stderr)]
            {
                eprintln!("Failed to load configuration: {e}");
            }
            return ExitCode::FAILURE;
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ff_storefront=info,ff_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    match run(cli, config).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, mut config: StorefrontConfig) -> Result<ExitCode> {
    if let Some(dir) = cli.storage_dir {
        config.storage_dir = dir;
    }

    let storage = FileStorage::open(&config.storage_dir)?;
    let gateway = HttpGateway::new(&config.api)?;
    let session = CartSession::new(storage, gateway, SessionOptions::from(&config));

    match cli.command {
        Commands::Add {
            id,
            name,
            price,
            price_value,
            image,
        } => {
            let mut candidate = AddToCart::from_listing(id, name, price, image);
            if price_value.is_some() {
                candidate.price_value = price_value;
            }
            commands::cart::add(&session, candidate).await?;
        }
        Commands::Decrement { id } => {
            commands::cart::decrement(&session, &ProductId::new(id)).await?;
        }
        Commands::Remove { id } => {
            commands::cart::remove(&session, &ProductId::new(id)).await?;
        }
        Commands::Show { json } => commands::cart::show(&session, json)?,
        Commands::Clear => commands::cart::clear(&session).await?,
        Commands::Checkout => return Ok(commands::checkout::run(&session).await),
        Commands::Token { action } => match action {
            TokenAction::Set { token } => commands::token::set(&session, token)?,
            TokenAction::Clear => commands::token::clear(&session)?,
        },
    }

    Ok(ExitCode::SUCCESS)
}
