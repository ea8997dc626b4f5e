//! Sedori - Rakuten to Amazon retail arbitrage research.
//!
//! Finds products that can be bought on Rakuten Ichiba and resold on
//! Amazon Japan at a profit, using Keepa for Amazon price and sales-rank
//! history.
//!
//! # Architecture
//!
//! - **`domain`** - Marketplace-agnostic rules: ids, fee schedules, profit
//!   and the buy/skip [`domain::Evaluator`]
//! - **`port`** - Traits for the Amazon catalog and the source marketplace
//! - **`adapter`** - Keepa and Rakuten REST clients plus CSV input/output
//! - **`application`** - One pipeline per research workflow
//! - **`infrastructure`** - Configuration loading and logging
//! - **`cli`** - The `sedori` command
//!
//! # Example
//!
//! ```no_run
//! use sedori::application::estimate::{estimate, EstimateInput};
//! use sedori::domain::FeeSchedule;
//! use rust_decimal_macros::dec;
//!
//! let input = EstimateInput {
//!     sell_price: dec!(3980),
//!     buy_price: dec!(2200),
//!     ..EstimateInput::default()
//! };
//! let result = estimate(&input, &FeeSchedule::default());
//! println!("profit: {}", result.profit);
//! ```

pub mod adapter;
pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;
