//! # stockroom: Pricing Calculator CLI
//!
//! Thin command-line front end over `stockroom-core`.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. init_tracing()          logs to stderr, RUST_LOG aware              │
//! │  2. Cli::parse()            clap derive                                 │
//! │  3. PricingConfig::load()   defaults → stockroom.toml → STOCKROOM_*     │
//! │  4. commands::*             pure calculation                            │
//! │  5. JSON on stdout          or `CODE: message` on stderr, exit 1        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod commands;
mod config;
mod error;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use stockroom_core::{ItemType, Platform};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::commands::{BoxRollupArgs, BreakEvenArgs, QuoteArgs, SaleArgs};
use crate::config::PricingConfig;
use crate::error::CliResult;

#[derive(Debug, Parser)]
#[command(name = "stockroom", version, about = "Pricing and profit calculator for collectibles resellers")]
struct Cli {
    /// Path to stockroom.toml (defaults to the platform config directory)
    #[arg(long, global = true, env = "STOCKROOM_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the effective platform fee schedule
    Fees,

    /// Suggest retail, pack and per-platform prices for an item
    Quote {
        #[arg(long)]
        cost: Decimal,

        #[arg(long, default_value = "single")]
        item_type: ItemType,

        #[arg(long)]
        packs_per_box: Option<u32>,

        #[arg(long)]
        market_price: Option<Decimal>,

        /// Category name, e.g. "Trading Cards"
        #[arg(long)]
        category: Option<String>,
    },

    /// Break down a recorded sale: fee, break-even and net profit
    Sale {
        #[arg(long)]
        platform: Platform,

        #[arg(long)]
        sold: Decimal,

        #[arg(long)]
        cost: Decimal,

        #[arg(long, default_value = "0")]
        shipping: Decimal,

        #[arg(long, default_value = "0")]
        materials: Decimal,

        /// Overrides the platform's configured percentage
        #[arg(long)]
        fee_percent: Option<Decimal>,

        /// Overrides the platform's configured flat fee
        #[arg(long)]
        fee_flat: Option<Decimal>,
    },

    /// Lowest listing price that covers all costs and the platform fee
    BreakEven {
        #[arg(long)]
        cost: Decimal,

        #[arg(long, default_value = "0")]
        shipping: Decimal,

        #[arg(long, default_value = "0")]
        materials: Decimal,

        #[arg(long)]
        platform: Platform,
    },

    /// Roll up the pack sales of one sealed box
    BoxRollup {
        #[arg(long)]
        cost: Decimal,

        #[arg(long, default_value_t = 1)]
        quantity: u32,

        #[arg(long)]
        packs_per_box: u32,

        /// Sold price of one pack; repeat per sale
        #[arg(long = "sold")]
        sold: Vec<Decimal>,
    },
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(code = err.code(), "command failed");
            eprintln!("{}: {}", err.code(), err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let config = PricingConfig::load(cli.config)?;
    info!("Pricing config loaded");

    match cli.command {
        Command::Fees => print_json(&commands::fees(&config)),
        Command::Quote {
            cost,
            item_type,
            packs_per_box,
            market_price,
            category,
        } => print_json(&commands::quote(
            &config,
            &QuoteArgs {
                cost,
                item_type,
                packs_per_box,
                market_price,
                category,
            },
        )?),
        Command::Sale {
            platform,
            sold,
            cost,
            shipping,
            materials,
            fee_percent,
            fee_flat,
        } => print_json(&commands::sale(
            &config,
            &SaleArgs {
                platform,
                sold,
                cost,
                shipping,
                materials,
                fee_percent,
                fee_flat,
            },
        )?),
        Command::BreakEven {
            cost,
            shipping,
            materials,
            platform,
        } => print_json(&commands::break_even(
            &config,
            &BreakEvenArgs {
                platform,
                cost,
                shipping,
                materials,
            },
        )?),
        Command::BoxRollup {
            cost,
            quantity,
            packs_per_box,
            sold,
        } => print_json(&commands::box_rollup(&BoxRollupArgs {
            cost,
            quantity,
            packs_per_box,
            sold,
        })?),
    }
}

fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Verbose logging
/// - `RUST_LOG=info` - Normal logging (default)
/// - `RUST_LOG=stockroom_core=trace` - Every fee calculation
///
/// Output goes to stderr so stdout stays valid JSON.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,stockroom=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
