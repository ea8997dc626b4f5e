//! Purchase decision rules.
//!
//! A product passes through a fixed sequence of gates: Amazon presence,
//! sales rank, price availability, and finally profit/ROI thresholds. The
//! first gate that fails decides the rejection reason.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::fee::{FeeBreakdown, FeeSchedule, Parcel};
use super::money::{ratio, whole_yen, Yen};
use super::product::ProductStats;
use super::profit::{Profit, ProfitInput};

/// How the profit and ROI thresholds combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdMode {
    /// Both profit and ROI must clear their minimums.
    #[default]
    All,
    /// Either one is enough.
    Any,
}

/// Thresholds a candidate must meet.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionCriteria {
    pub min_profit: Yen,
    /// Minimum ROI as a fraction (0.3 = 30%).
    pub min_roi: Decimal,
    pub max_avg_rank_90d: u64,
    pub block_amazon_current_buybox: bool,
    pub skip_when_amazon_in_stock: bool,
    pub max_amazon_presence_ratio: Option<Decimal>,
    /// Reject products without rank data instead of letting them through.
    pub require_rank: bool,
    pub threshold_mode: ThresholdMode,
}

impl Default for SelectionCriteria {
    fn default() -> Self {
        Self {
            min_profit: dec!(500),
            min_roi: dec!(0.3),
            max_avg_rank_90d: 100_000,
            block_amazon_current_buybox: true,
            skip_when_amazon_in_stock: false,
            max_amazon_presence_ratio: None,
            require_rank: true,
            threshold_mode: ThresholdMode::All,
        }
    }
}

/// What we would pay for the item on the source marketplace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuyOffer {
    pub price: Yen,
    pub shipping: Yen,
    pub points: Yen,
}

impl BuyOffer {
    #[must_use]
    pub const fn new(price: Yen) -> Self {
        Self {
            price,
            shipping: Decimal::ZERO,
            points: Decimal::ZERO,
        }
    }

    #[must_use]
    pub const fn with_shipping(mut self, shipping: Yen) -> Self {
        self.shipping = shipping;
        self
    }

    #[must_use]
    pub const fn with_points(mut self, points: Yen) -> Self {
        self.points = points;
        self
    }
}

/// Why a candidate was not selected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Rejection {
    #[error("Amazon currently has the buy box")]
    AmazonHoldsBuyBox,

    #[error("Amazon is selling it itself (current: {price})")]
    AmazonInStock { price: Yen },

    #[error("Amazon presence too high: {ratio} > {max}")]
    AmazonPresence { ratio: Decimal, max: Decimal },

    #[error("No avg_rank_90d")]
    NoRank,

    #[error("Rank too low: {rank}")]
    RankTooLow { rank: u64 },

    #[error("No expected sell price (buy box data missing)")]
    NoSellPrice,

    #[error("Profit too small: {profit}")]
    ProfitTooSmall { profit: Yen },

    #[error("ROI too low: {}", .roi.map_or_else(|| "n/a".to_string(), |r| r.to_string()))]
    RoiTooLow { roi: Option<Decimal> },
}

impl Rejection {
    /// Stable key for counting rejections by kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::AmazonHoldsBuyBox => "amazon_buybox",
            Self::AmazonInStock { .. } => "amazon_in_stock",
            Self::AmazonPresence { .. } => "amazon_presence",
            Self::NoRank => "no_rank",
            Self::RankTooLow { .. } => "rank_too_low",
            Self::NoSellPrice => "no_sell_price",
            Self::ProfitTooSmall { .. } => "profit_too_small",
            Self::RoiTooLow { .. } => "roi_too_low",
        }
    }
}

/// Priced result for an accepted candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Appraisal {
    pub sell_price: Yen,
    pub avg_rank_90d: Option<u64>,
    pub offer: Option<BuyOffer>,
    pub fees: FeeBreakdown,
    /// `None` when no buy price was known (market gates only).
    pub profit: Option<Profit>,
}

impl Appraisal {
    /// Profit rounded to whole yen.
    #[must_use]
    pub fn profit_yen(&self) -> Option<Yen> {
        self.profit.map(|p| whole_yen(p.profit))
    }

    /// ROI rounded to two places.
    #[must_use]
    pub fn roi(&self) -> Option<Decimal> {
        self.profit.and_then(|p| p.roi).map(ratio)
    }
}

/// Result of evaluating one candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Accepted(Appraisal),
    Rejected {
        reason: Rejection,
        /// Pricing computed before the rejection, when it got that far.
        appraisal: Option<Appraisal>,
    },
}

impl Verdict {
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    #[must_use]
    pub const fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Accepted(_) => None,
            Self::Rejected { reason, .. } => Some(reason),
        }
    }

    /// The appraisal, accepted or not.
    #[must_use]
    pub const fn appraisal(&self) -> Option<&Appraisal> {
        match self {
            Self::Accepted(appraisal) => Some(appraisal),
            Self::Rejected { appraisal, .. } => appraisal.as_ref(),
        }
    }

    fn set_rank(&mut self, rank: Option<u64>) {
        match self {
            Self::Accepted(appraisal)
            | Self::Rejected {
                appraisal: Some(appraisal),
                ..
            } => appraisal.avg_rank_90d = rank,
            Self::Rejected { appraisal: None, .. } => {}
        }
    }

    fn reject(reason: Rejection) -> Self {
        Self::Rejected {
            reason,
            appraisal: None,
        }
    }
}

/// Applies [`SelectionCriteria`] with a fee schedule.
#[derive(Debug, Clone)]
pub struct Evaluator {
    criteria: SelectionCriteria,
    fees: FeeSchedule,
}

impl Evaluator {
    #[must_use]
    pub const fn new(criteria: SelectionCriteria, fees: FeeSchedule) -> Self {
        Self { criteria, fees }
    }

    #[must_use]
    pub const fn criteria(&self) -> &SelectionCriteria {
        &self.criteria
    }

    #[must_use]
    pub const fn fees(&self) -> &FeeSchedule {
        &self.fees
    }

    /// Run every gate against `product`.
    ///
    /// Without an `offer` only the market gates apply and the candidate is
    /// accepted once a sell price is known.
    #[must_use]
    pub fn evaluate(&self, product: &ProductStats, offer: Option<BuyOffer>) -> Verdict {
        if let Err(reason) = self.check_market(product) {
            debug!(asin = %product.asin, reason = %reason, "Market gate failed");
            return Verdict::reject(reason);
        }

        let Some(sell_price) = product.expected_sell_price else {
            return Verdict::reject(Rejection::NoSellPrice);
        };

        let parcel = product.parcel();
        let Some(offer) = offer else {
            return Verdict::Accepted(Appraisal {
                sell_price,
                avg_rank_90d: product.avg_rank_90d,
                offer: None,
                fees: self.fees.estimate(sell_price, &parcel),
                profit: None,
            });
        };

        let mut verdict = self.appraise(sell_price, &parcel, offer);
        verdict.set_rank(product.avg_rank_90d);
        verdict
    }

    /// Price `offer` against `sell_price` and apply the profit/ROI
    /// thresholds only.
    ///
    /// For inputs that carry no market history, such as exports and JAN
    /// lists.
    #[must_use]
    pub fn appraise(&self, sell_price: Yen, parcel: &Parcel, offer: BuyOffer) -> Verdict {
        let fees = self.fees.estimate(sell_price, parcel);
        let profit = ProfitInput::new(sell_price, offer.price, fees)
            .with_shipping(offer.shipping)
            .with_points(offer.points)
            .compute();
        let appraisal = Appraisal {
            sell_price,
            avg_rank_90d: None,
            offer: Some(offer),
            fees,
            profit: Some(profit),
        };

        match self.check_thresholds(&profit) {
            Ok(()) => Verdict::Accepted(appraisal),
            Err(reason) => Verdict::Rejected {
                reason,
                appraisal: Some(appraisal),
            },
        }
    }

    fn check_market(&self, product: &ProductStats) -> Result<(), Rejection> {
        let c = &self.criteria;

        if c.block_amazon_current_buybox && product.buybox_is_amazon {
            return Err(Rejection::AmazonHoldsBuyBox);
        }
        if c.skip_when_amazon_in_stock {
            if let Some(price) = product.amazon_current {
                return Err(Rejection::AmazonInStock { price });
            }
        }
        if let (Some(max), Some(ratio)) = (c.max_amazon_presence_ratio, product.amazon_presence_ratio)
        {
            if ratio > max {
                return Err(Rejection::AmazonPresence { ratio, max });
            }
        }

        match product.avg_rank_90d {
            None if c.require_rank => Err(Rejection::NoRank),
            Some(rank) if rank > c.max_avg_rank_90d => Err(Rejection::RankTooLow { rank }),
            _ => Ok(()),
        }
    }

    fn check_thresholds(&self, profit: &Profit) -> Result<(), Rejection> {
        let c = &self.criteria;
        let profit_ok = profit.profit >= c.min_profit;
        let roi_ok = profit.roi.is_some_and(|r| r >= c.min_roi);

        let passed = match c.threshold_mode {
            ThresholdMode::All => profit_ok && roi_ok,
            ThresholdMode::Any => profit_ok || roi_ok,
        };
        if passed {
            return Ok(());
        }
        if !profit_ok {
            return Err(Rejection::ProfitTooSmall {
                profit: whole_yen(profit.profit),
            });
        }
        Err(Rejection::RoiTooLow {
            roi: profit.roi.map(ratio),
        })
    }
}
