//! Handler for the `estimate` command.

use std::path::Path;

use rust_decimal::Decimal;
use serde_json::json;

use super::command::EstimateArgs;
use super::output;
use super::session::load_config;
use crate::application::estimate::{estimate, EstimateInput};
use crate::domain::{Dimensions, FeeSchedule};
use crate::error::Result;

fn input(args: &EstimateArgs) -> EstimateInput {
    EstimateInput {
        sell_price: args.sell,
        buy_price: args.buy,
        shipping: args.shipping,
        points: args.points,
        weight_kg: args.weight,
        dimensions_cm: args.dims.map(|[l, w, h]| Dimensions::new(l, w, h)),
        category: args.category.clone(),
    }
}

/// Price one hypothetical item with the configured fee schedule. No network.
pub fn execute(config: Option<&Path>, args: &EstimateArgs) -> Result<()> {
    let config = load_config(config)?;
    config.init_logging();
    let fees = if args.no_fees {
        FeeSchedule::None
    } else {
        config.effective_fees(&config.fees)
    };
    let result = estimate(&input(args), &fees);

    if output::is_json() {
        output::json_output(json!({ "command": "estimate", "estimate": result }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::section("Fees");
    output::field("Model", result.fee_model);
    output::field("Referral", format!("¥{}", result.referral_fee));
    output::field("Fulfillment", format!("¥{}", result.fulfillment_fee));
    if !result.storage_fee.is_zero() {
        output::field("Storage", format!("¥{}", result.storage_fee));
    }
    output::field("Total", format!("¥{}", result.total_fees));

    output::section("Profit");
    output::field("Sell", format!("¥{}", result.sell_price));
    output::field("Cost", format!("¥{}", result.cost_basis));
    output::field("Profit", format!("¥{}", result.profit));
    match result.roi {
        Some(roi) => output::field("ROI", roi),
        None => output::field("ROI", "-"),
    }

    if result.profit < Decimal::ZERO {
        output::warning("This item loses money at the given prices");
    } else {
        output::success("Estimate complete");
    }
    Ok(())
}
