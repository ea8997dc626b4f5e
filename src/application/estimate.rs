//! Offline fee and profit calculator for a single item.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::money::{ratio, whole_yen};
use crate::domain::{Dimensions, FeeSchedule, Parcel, ProfitInput, Yen};

/// One hypothetical resale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EstimateInput {
    pub sell_price: Yen,
    pub buy_price: Yen,
    pub shipping: Yen,
    pub points: Yen,
    pub weight_kg: Option<Decimal>,
    pub dimensions_cm: Option<Dimensions>,
    pub category: Option<String>,
}

impl EstimateInput {
    #[must_use]
    pub fn parcel(&self) -> Parcel {
        Parcel {
            weight_kg: self.weight_kg,
            dimensions_cm: self.dimensions_cm,
            volume_cm3: None,
            category: self.category.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estimate {
    pub fee_model: &'static str,
    pub sell_price: Yen,
    pub referral_fee: Yen,
    pub fulfillment_fee: Yen,
    pub storage_fee: Yen,
    pub total_fees: Yen,
    pub cost_basis: Yen,
    pub profit: Yen,
    pub roi: Option<Decimal>,
}

/// Price `input` under `fees`. Fee lines are rounded to whole yen for
/// display; profit is computed from the exact amounts.
#[must_use]
pub fn estimate(input: &EstimateInput, fees: &FeeSchedule) -> Estimate {
    let breakdown = fees.estimate(input.sell_price, &input.parcel());
    let profit = ProfitInput::new(input.sell_price, input.buy_price, breakdown)
        .with_shipping(input.shipping)
        .with_points(input.points)
        .compute();

    Estimate {
        fee_model: fees.name(),
        sell_price: input.sell_price,
        referral_fee: whole_yen(breakdown.referral),
        fulfillment_fee: whole_yen(breakdown.fulfillment),
        storage_fee: whole_yen(breakdown.storage),
        total_fees: whole_yen(breakdown.total()),
        cost_basis: whole_yen(profit.cost_basis),
        profit: whole_yen(profit.profit),
        roi: profit.roi.map(ratio),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fee::FlatFees;
    use rust_decimal_macros::dec;

    #[test]
    fn flat_schedule_estimate() {
        let input = EstimateInput {
            sell_price: dec!(3000),
            buy_price: dec!(1500),
            shipping: dec!(500),
            ..EstimateInput::default()
        };
        let result = estimate(&input, &FeeSchedule::Flat(FlatFees::new(dec!(0.10), dec!(450))));

        assert_eq!(result.fee_model, "flat");
        assert_eq!(result.referral_fee, dec!(300));
        assert_eq!(result.total_fees, dec!(750));
        assert_eq!(result.cost_basis, dec!(2000));
        assert_eq!(result.profit, dec!(250));
        assert_eq!(result.roi, Some(dec!(0.12)));
    }

    #[test]
    fn free_item_has_no_roi() {
        let input = EstimateInput {
            sell_price: dec!(1000),
            ..EstimateInput::default()
        };
        let result = estimate(&input, &FeeSchedule::None);
        assert_eq!(result.profit, dec!(1000));
        assert_eq!(result.roi, None);
    }
}
