//! Verdant CLI
//!
//! Previews credit exchanges, splits, repayments and issuance using the
//! protocol configuration.

mod config;

use anyhow::Context;
use clap::{Parser, Subcommand};
use config::{LogFormat, ProtocolConfig};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use verdant_core::prelude::*;
use verdant_credits::{CreditIssuer, EnergySource, ProjectId, TokenizationLedger};

#[derive(Parser)]
#[command(name = "verdant")]
#[command(author = "Verdant Energy Finance")]
#[command(version)]
#[command(about = "Verdant - carbon credit exchange and loan repayment calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "verdant.toml", env = "VERDANT_CONFIG")]
    config: PathBuf,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Quote a credit-to-stablecoin exchange
    Quote {
        /// Credits to exchange
        #[arg(long)]
        credits: String,

        /// Override the configured rate
        #[arg(long)]
        rate: Option<String>,
    },

    /// Split an amount with the exchange or repayment policy
    Split {
        /// Amount to split
        #[arg(long)]
        amount: String,

        /// Decimals of the amount
        #[arg(long, default_value_t = STABLECOIN_DECIMALS)]
        decimals: u8,

        /// Use the repayment fee policy instead of the exchange policy
        #[arg(long)]
        repayment: bool,
    },

    /// Break a loan repayment into fee, interest and principal
    Repay {
        /// Amount paid
        #[arg(long)]
        paid: String,

        /// Outstanding principal
        #[arg(long)]
        principal: String,

        /// Accrued interest; accrued from --days when omitted
        #[arg(long)]
        interest: Option<String>,

        /// Days since last repayment
        #[arg(long, default_value_t = 30)]
        days: u32,
    },

    /// Accrue simple interest on a principal
    Accrue {
        /// Outstanding principal
        #[arg(long)]
        principal: String,

        /// Days elapsed
        #[arg(long)]
        days: u32,

        /// Override the configured APR (basis points)
        #[arg(long)]
        apr_bps: Option<u32>,
    },

    /// Preview carbon credits for metered energy output
    Issue {
        /// Project identifier
        #[arg(long, default_value = "preview")]
        project: String,

        /// Output in MWh
        #[arg(long)]
        mwh: String,

        /// Energy source (solar, wind, hydro, geothermal, renewable_mix, ...)
        #[arg(long)]
        source: EnergySource,
    },

    /// Print the effective configuration as TOML
    ShowConfig,
}

fn init_logging(verbose: bool, logging: &config::LoggingConfig) {
    let env_filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level))
    };

    let registry = tracing_subscriber::registry().with(env_filter);
    match logging.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_writer(std::io::stderr))
            .init(),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let protocol = ProtocolConfig::load(&cli.config)?;
    init_logging(cli.verbose, &protocol.logging);

    tracing::debug!("Config: {:?}", cli.config);

    let stable = protocol.tokens.stablecoin_decimals;

    match cli.command {
        Commands::Quote { credits, rate } => {
            let credits = FixedPointAmount::parse(&credits, protocol.tokens.credit_decimals)
                .context("parsing --credits")?;
            let rate = match rate {
                Some(rate) => FixedPointAmount::parse(&rate, stable).context("parsing --rate")?,
                None => protocol.exchange_rate()?,
            };
            let policy = protocol.exchange.policy()?;

            let quote = ExchangeConverter::new(stable).quote(credits, rate, &policy)?;
            if quote.is_disabled() {
                tracing::warn!("Exchange rate is zero; exchange is disabled");
            }
            print_json(&quote)?;
        }

        Commands::Split { amount, decimals, repayment } => {
            let amount = FixedPointAmount::parse(&amount, decimals).context("parsing --amount")?;
            let policy = if repayment {
                protocol.repayment.fee_policy()?
            } else {
                protocol.exchange.policy()?
            };
            print_json(&compute_split(&amount, &policy)?)?;
        }

        Commands::Repay { paid, principal, interest, days } => {
            let paid = FixedPointAmount::parse(&paid, stable).context("parsing --paid")?;
            let principal = FixedPointAmount::parse(&principal, stable).context("parsing --principal")?;
            let interest = match interest {
                Some(interest) => FixedPointAmount::parse(&interest, stable).context("parsing --interest")?,
                None => accrue_simple_interest(&principal, protocol.repayment.apr_bps, days)?,
            };
            let fee_policy = protocol.repayment.fee_policy()?;
            let allocator = RepaymentAllocator::new();

            match allocator.allocate(paid, principal, interest, &fee_policy) {
                Ok(breakdown) => print_json(&breakdown)?,
                Err(err) if err.overpayment_excess().is_some() => {
                    tracing::warn!("{}; showing the absorbed portion", err);
                    print_json(&allocator.allocate_partial(paid, principal, interest, &fee_policy)?)?;
                }
                Err(err) => return Err(err.into()),
            }
        }

        Commands::Accrue { principal, days, apr_bps } => {
            let principal = FixedPointAmount::parse(&principal, stable).context("parsing --principal")?;
            let apr_bps = apr_bps.unwrap_or(protocol.repayment.apr_bps);
            let interest = accrue_simple_interest(&principal, apr_bps, days)?;
            println!("{}", interest);
        }

        Commands::Issue { project, mwh, source } => {
            let output = FixedPointAmount::parse(&mwh, protocol.tokens.credit_decimals)
                .context("parsing --mwh")?;
            let ledger = TokenizationLedger::with_store(
                verdant_credits::MemoryCreditStore::new(),
                protocol.tokens.credit_decimals,
            );
            let issuer = CreditIssuer::with_grid_intensity(&ledger, protocol.issuance.grid_intensity);
            print_json(&issuer.issue(&ProjectId::new(project), output, source)?)?;
        }

        Commands::ShowConfig => {
            print!("{}", toml::to_string_pretty(&protocol)?);
        }
    }

    Ok(())
}
