//! Selection threshold configuration.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::{SelectionCriteria, ThresholdMode};

/// `[selection]`: the baseline buy rules every pipeline starts from.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectionConfig {
    /// Minimum profit in yen.
    #[serde(default = "default_min_profit")]
    pub min_profit: Decimal,
    /// Minimum ROI as a fraction (0.3 = 30%).
    #[serde(default = "default_min_roi")]
    pub min_roi: Decimal,
    /// Upper bound on the 90-day average sales rank.
    #[serde(default = "default_max_avg_rank_90d")]
    pub max_avg_rank_90d: u64,
    /// Reject while Amazon itself holds the buy box.
    #[serde(default = "default_true")]
    pub block_amazon_current_buybox: bool,
    /// Reject whenever Amazon has its own offer, buy box or not.
    #[serde(default)]
    pub skip_when_amazon_in_stock: bool,
    /// Reject when Amazon was in stock for more of the window than this.
    #[serde(default)]
    pub max_amazon_presence_ratio: Option<Decimal>,
    /// Reject products without rank data.
    #[serde(default = "default_true")]
    pub require_rank: bool,
    /// `all` (profit and ROI) or `any` (profit or ROI).
    #[serde(default)]
    pub threshold_mode: ThresholdMode,
    /// Ignore fees entirely; useful to inspect raw price gaps.
    #[serde(default)]
    pub debug_no_fees: bool,
}

fn default_min_profit() -> Decimal {
    Decimal::from(500)
}

fn default_min_roi() -> Decimal {
    Decimal::new(3, 1) // 30%
}

const fn default_max_avg_rank_90d() -> u64 {
    100_000
}

const fn default_true() -> bool {
    true
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            min_profit: default_min_profit(),
            min_roi: default_min_roi(),
            max_avg_rank_90d: default_max_avg_rank_90d(),
            block_amazon_current_buybox: true,
            skip_when_amazon_in_stock: false,
            max_amazon_presence_ratio: None,
            require_rank: true,
            threshold_mode: ThresholdMode::All,
            debug_no_fees: false,
        }
    }
}

impl SelectionConfig {
    /// Baseline criteria.
    #[must_use]
    pub fn criteria(&self) -> SelectionCriteria {
        SelectionCriteria {
            min_profit: self.min_profit,
            min_roi: self.min_roi,
            max_avg_rank_90d: self.max_avg_rank_90d,
            block_amazon_current_buybox: self.block_amazon_current_buybox,
            skip_when_amazon_in_stock: self.skip_when_amazon_in_stock,
            max_amazon_presence_ratio: self.max_amazon_presence_ratio,
            require_rank: self.require_rank,
            threshold_mode: self.threshold_mode,
        }
    }
}

/// Per-pipeline adjustments layered over `[selection]`.
///
/// Unset fields inherit the baseline.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CriteriaOverride {
    pub min_profit: Option<Decimal>,
    pub min_roi: Option<Decimal>,
    pub max_avg_rank_90d: Option<u64>,
    pub block_amazon_current_buybox: Option<bool>,
    pub skip_when_amazon_in_stock: Option<bool>,
    pub max_amazon_presence_ratio: Option<Decimal>,
    pub require_rank: Option<bool>,
    pub threshold_mode: Option<ThresholdMode>,
}

impl CriteriaOverride {
    /// Layer this override over `base`.
    #[must_use]
    pub fn apply(&self, base: SelectionCriteria) -> SelectionCriteria {
        SelectionCriteria {
            min_profit: self.min_profit.unwrap_or(base.min_profit),
            min_roi: self.min_roi.unwrap_or(base.min_roi),
            max_avg_rank_90d: self.max_avg_rank_90d.unwrap_or(base.max_avg_rank_90d),
            block_amazon_current_buybox: self
                .block_amazon_current_buybox
                .unwrap_or(base.block_amazon_current_buybox),
            skip_when_amazon_in_stock: self
                .skip_when_amazon_in_stock
                .unwrap_or(base.skip_when_amazon_in_stock),
            max_amazon_presence_ratio: self
                .max_amazon_presence_ratio
                .or(base.max_amazon_presence_ratio),
            require_rank: self.require_rank.unwrap_or(base.require_rank),
            threshold_mode: self.threshold_mode.unwrap_or(base.threshold_mode),
        }
    }
}
