//! Profit and ROI arithmetic.

use rust_decimal::Decimal;

use super::fee::FeeBreakdown;
use super::money::{floor_yen, Yen};

/// Everything needed to price one resale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfitInput {
    pub sell_price: Yen,
    pub buy_price: Yen,
    pub shipping: Yen,
    /// Loyalty points earned on the purchase, treated as a discount.
    pub points: Yen,
    pub fees: FeeBreakdown,
}

/// Outcome of the profit calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Profit {
    /// Cash out of pocket: buy price plus shipping minus points.
    pub cost_basis: Yen,
    pub profit: Yen,
    /// Profit over cost basis; undefined when nothing was paid.
    pub roi: Option<Decimal>,
}

impl ProfitInput {
    #[must_use]
    pub fn new(sell_price: Yen, buy_price: Yen, fees: FeeBreakdown) -> Self {
        Self {
            sell_price,
            buy_price,
            shipping: Decimal::ZERO,
            points: Decimal::ZERO,
            fees,
        }
    }

    #[must_use]
    pub fn with_shipping(mut self, shipping: Yen) -> Self {
        self.shipping = shipping;
        self
    }

    #[must_use]
    pub fn with_points(mut self, points: Yen) -> Self {
        self.points = points;
        self
    }

    #[must_use]
    pub fn compute(&self) -> Profit {
        let cost_basis = self.buy_price + self.shipping - self.points;
        let profit = self.sell_price - cost_basis - self.fees.total();
        let roi = (cost_basis > Decimal::ZERO).then(|| profit / cost_basis);
        Profit {
            cost_basis,
            profit,
            roi,
        }
    }
}

/// Points earned at `rate` (0.10 = 10%) on a purchase, whole points only.
#[must_use]
pub fn points_for(price: Yen, rate: Decimal) -> Yen {
    floor_yen(price * rate)
}
