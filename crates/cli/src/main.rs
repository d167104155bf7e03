//! Shopfront CLI - a terminal storefront over the Shopify Storefront API.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! shopfront products list --query shirt
//! shopfront products show classic-tee
//!
//! # Fill a cart and check out in the browser
//! shopfront cart add classic-tee --quantity 2
//! shopfront cart checkout
//!
//! # Sign in and track orders
//! shopfront account login -e ada@example.com
//! shopfront orders show 1001
//!
//! # Explain an order status pair
//! shopfront status PAID IN_TRANSIT
//! ```
//!
//! Every command accepts `--json` for machine-readable output.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing::Instrument;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shopfront_storefront::config::{LogFormat, StorefrontConfig};
use shopfront_storefront::error::AppError;
use shopfront_storefront::state::AppState;

mod commands;
mod output;

use commands::{
    AccountAction, CartAction, CollectionsAction, OrdersAction, ProductsAction, WishlistAction,
};
use output::Output;

#[derive(Parser)]
#[command(name = "shopfront")]
#[command(author, version, about = "Shop a Shopify store from the terminal")]
struct Cli {
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse products
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Browse collections
    Collections {
        #[command(subcommand)]
        action: CollectionsAction,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Sign in, sign out or create an account
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
    /// View order history and saved addresses
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Show the progress step for a financial/fulfillment status pair
    Status {
        /// Financial status (e.g., PAID); `-` for none
        financial: String,
        /// Fulfillment status (e.g., IN_TRANSIT); `-` for none
        fulfillment: String,
    },
}

impl Commands {
    const fn name(&self) -> &'static str {
        match self {
            Self::Products { .. } => "products",
            Self::Collections { .. } => "collections",
            Self::Cart { .. } => "cart",
            Self::Wishlist { .. } => "wishlist",
            Self::Account { .. } => "account",
            Self::Orders { .. } => "orders",
            Self::Status { .. } => "status",
        }
    }
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

/// Initialize tracing with `EnvFilter` and Sentry integration.
///
/// Logs go to stderr so `--json` output on stdout stays parseable.
fn init_tracing(format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopfront_storefront=info,shopfront_cli=info".into());

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter));

    match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Configuration is optional for `status`, so a load failure is only
    // surfaced by commands that need it
    let config = StorefrontConfig::from_env();

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);
    init_tracing(
        config
            .as_ref()
            .map(|c| c.log_format)
            .unwrap_or_default(),
    );

    let out = Output::new(cli.json);
    let span = tracing::info_span!(
        "invocation",
        invocation_id = %uuid::Uuid::new_v4(),
        command = cli.command.name(),
    );

    match run(cli.command, config, out).instrument(span).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.report();
            eprintln!("error: {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(
    command: Commands,
    config: Result<StorefrontConfig, shopfront_storefront::config::ConfigError>,
    out: Output,
) -> Result<(), AppError> {
    if let Commands::Status {
        financial,
        fulfillment,
    } = &command
    {
        commands::status::show(financial, fulfillment, out);
        return Ok(());
    }

    let state = AppState::new(&config?)?;

    match command {
        Commands::Products { action } => commands::products::run(&state, action, out).await,
        Commands::Collections { action } => commands::collections::run(&state, action, out).await,
        Commands::Cart { action } => commands::cart::run(&state, action, out).await,
        Commands::Wishlist { action } => commands::wishlist::run(&state, action, out).await,
        Commands::Account { action } => commands::account::run(&state, action, out).await,
        Commands::Orders { action } => commands::orders::run(&state, action, out).await,
        Commands::Status { .. } => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_global_json_flag() {
        let cli = Cli::try_parse_from(["shopfront", "cart", "show", "--json"]);
        assert!(cli.is_ok_and(|c| c.json));
    }

    #[test]
    fn test_parse_status() {
        let cli = Cli::try_parse_from(["shopfront", "status", "PAID", "IN_TRANSIT"]);
        assert!(cli.is_ok_and(|c| c.command.name() == "status"));
    }

    #[test]
    fn test_parse_negative_cart_quantity() {
        let cli = Cli::try_parse_from([
            "shopfront",
            "cart",
            "set",
            "gid://shopify/CartLine/1",
            "-1",
        ]);
        assert!(cli.is_ok_and(|c| matches!(
            c.command,
            Commands::Cart {
                action: CartAction::Set { quantity: -1, .. }
            }
        )));
    }
}
