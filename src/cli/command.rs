//! Command-line interface definitions.
//!
//! One subcommand per research pipeline plus an offline fee estimate and a
//! configuration check.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

use crate::infrastructure::config::selection::CriteriaOverride;

/// Rakuten to Amazon retail arbitrage research
#[derive(Parser, Debug)]
#[command(name = "sedori")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file [default: config.toml]
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Price a candidate list (ASIN + buy price) against Keepa
    Select(PipelineArgs),

    /// Look candidate ASINs up on Rakuten by title
    CrossCheck(PipelineArgs),

    /// Screen every Keepa bestseller export in a directory
    Scan(PipelineArgs),

    /// Walk Rakuten genre rankings and price each item on Amazon
    Research(PipelineArgs),

    /// Hunt Rakuten for items Amazon is out of
    #[command(subcommand)]
    Hunt(HuntCommand),

    /// Price a JAN list with known Amazon prices, counting Rakuten points
    Gap(PipelineArgs),

    /// Estimate fees and profit for one item offline
    Estimate(EstimateArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),
}

/// Subcommands for `sedori hunt`.
#[derive(Subcommand, Debug)]
pub enum HuntCommand {
    /// Keepa product finder export(s) → Rakuten by JAN
    Export(PipelineArgs),
    /// Configured keywords → Keepa → Rakuten
    Keywords(PipelineArgs),
}

/// Subcommands for `sedori check`.
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate configuration file and credentials
    Config,
}

/// Overrides shared by every pipeline command.
#[derive(Args, Debug, Clone, Default)]
pub struct PipelineArgs {
    /// Input file or directory (pipeline default when omitted)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Report path (pipeline default under the output directory when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override minimum profit in yen
    #[arg(long)]
    pub min_profit: Option<Decimal>,

    /// Override minimum ROI as a fraction (0.3 = 30%)
    #[arg(long)]
    pub min_roi: Option<Decimal>,

    /// Override maximum 90-day average sales rank
    #[arg(long)]
    pub max_rank: Option<u64>,

    /// Override log level (debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty
    #[arg(long)]
    pub json_logs: bool,

    /// Ignore fees entirely
    #[arg(long)]
    pub no_fees: bool,
}

impl PipelineArgs {
    /// Threshold flags as an override applied after the config file.
    #[must_use]
    pub fn criteria_override(&self) -> CriteriaOverride {
        CriteriaOverride {
            min_profit: self.min_profit,
            min_roi: self.min_roi,
            max_avg_rank_90d: self.max_rank,
            ..CriteriaOverride::default()
        }
    }
}

/// Arguments for the `estimate` subcommand.
#[derive(Args, Debug, Clone)]
pub struct EstimateArgs {
    /// Expected Amazon sell price in yen
    #[arg(long)]
    pub sell: Decimal,

    /// Purchase price in yen
    #[arg(long, default_value = "0")]
    pub buy: Decimal,

    /// Inbound shipping in yen
    #[arg(long, default_value = "0")]
    pub shipping: Decimal,

    /// Points earned on the purchase in yen
    #[arg(long, default_value = "0")]
    pub points: Decimal,

    /// Package weight in kilograms
    #[arg(long)]
    pub weight: Option<Decimal>,

    /// Package sides in centimetres, e.g. 30x20x10
    #[arg(long, value_parser = parse_dimensions)]
    pub dims: Option<[Decimal; 3]>,

    /// Product category for category-specific base fees
    #[arg(long)]
    pub category: Option<String>,

    /// Ignore fees entirely
    #[arg(long)]
    pub no_fees: bool,
}

fn parse_dimensions(raw: &str) -> Result<[Decimal; 3], String> {
    let sides: Vec<Decimal> = raw
        .split(['x', 'X', '*', ','])
        .map(|side| side.trim().parse::<Decimal>())
        .collect::<Result<_, _>>()
        .map_err(|err| format!("invalid side: {err}"))?;

    match sides.as_slice() {
        [l, w, h] if sides.iter().all(|s| *s > Decimal::ZERO) => Ok([*l, *w, *h]),
        [_, _, _] => Err("sides must be greater than 0".into()),
        _ => Err(format!("expected LxWxH, got {raw:?}")),
    }
}
