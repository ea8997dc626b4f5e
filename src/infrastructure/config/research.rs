//! Per-pipeline configuration: genre research, hunts, gap search, cross-check.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

use super::selection::CriteriaOverride;
use crate::domain::fee::{FlatFees, WeightClassFees};
use crate::domain::{FeeSchedule, Genre, ThresholdMode};

const fn default_keyword_max_chars() -> usize {
    40
}

/// `[research]`: Rakuten genre ranking → Amazon scan.
#[derive(Debug, Clone, Deserialize)]
pub struct ResearchConfig {
    /// Genres to walk, in order.
    #[serde(default = "Genre::defaults")]
    pub genres: Vec<Genre>,
    /// Characters of the Rakuten item name used as the Keepa search term.
    #[serde(default = "default_keyword_max_chars")]
    pub keyword_max_chars: usize,
    #[serde(default = "default_research_criteria")]
    pub criteria: CriteriaOverride,
}

fn default_research_criteria() -> CriteriaOverride {
    CriteriaOverride {
        min_profit: Some(dec!(500)),
        min_roi: Some(dec!(0.10)),
        max_avg_rank_90d: Some(80_000),
        skip_when_amazon_in_stock: Some(true),
        ..CriteriaOverride::default()
    }
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            genres: Genre::defaults(),
            keyword_max_chars: default_keyword_max_chars(),
            criteria: default_research_criteria(),
        }
    }
}

/// `[hunt]`: export-file and keyword hunts.
#[derive(Debug, Clone, Deserialize)]
pub struct HuntConfig {
    /// Search terms for the keyword hunt.
    #[serde(default = "default_hunt_keywords")]
    pub keywords: Vec<String>,
    /// Fee model for export rows, which carry only grams and cm³.
    #[serde(default = "default_export_fees")]
    pub export_fees: FeeSchedule,
    #[serde(default = "default_hunt_criteria")]
    pub criteria: CriteriaOverride,
}

fn default_hunt_keywords() -> Vec<String> {
    [
        "Logicool G PRO X Superlight",
        "Logicool G502 X",
        "Logicool G913 TKL",
        "Logicool G703h",
        "Razer Viper V2 Pro",
        "Razer DeathAdder V3",
        "Elgato Stream Deck MK.2",
        "エプソン 純正 インク カメ 6色",
        "エプソン 純正 インク サツマイモ 6色",
        "キヤノン 純正 インク BCI-381+380/6MP",
        "キヤノン 純正 インク BCI-331+330/6MP",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_export_fees() -> FeeSchedule {
    FeeSchedule::WeightClass(WeightClassFees::default())
}

fn default_hunt_criteria() -> CriteriaOverride {
    CriteriaOverride {
        min_profit: Some(dec!(300)),
        min_roi: Some(dec!(0.05)),
        threshold_mode: Some(ThresholdMode::Any),
        ..CriteriaOverride::default()
    }
}

impl Default for HuntConfig {
    fn default() -> Self {
        Self {
            keywords: default_hunt_keywords(),
            export_fees: default_export_fees(),
            criteria: default_hunt_criteria(),
        }
    }
}

/// `[gap]`: JAN list with known Amazon cart prices, point-aware.
#[derive(Debug, Clone, Deserialize)]
pub struct GapConfig {
    /// Rakuten point rate earned on purchases (0.10 = 10x SPU).
    #[serde(default = "default_point_rate")]
    pub point_rate: Decimal,
    #[serde(default = "default_gap_fees")]
    pub fees: FeeSchedule,
    #[serde(default = "default_gap_criteria")]
    pub criteria: CriteriaOverride,
}

fn default_point_rate() -> Decimal {
    dec!(0.10)
}

fn default_gap_fees() -> FeeSchedule {
    FeeSchedule::Flat(FlatFees::new(dec!(0.10), dec!(450)).floored())
}

fn default_gap_criteria() -> CriteriaOverride {
    CriteriaOverride {
        min_profit: Some(dec!(200)),
        min_roi: Some(dec!(0.05)),
        ..CriteriaOverride::default()
    }
}

impl Default for GapConfig {
    fn default() -> Self {
        Self {
            point_rate: default_point_rate(),
            fees: default_gap_fees(),
            criteria: default_gap_criteria(),
        }
    }
}

/// `[cross_check]`: candidate ASINs looked up on Rakuten by title.
#[derive(Debug, Clone, Deserialize)]
pub struct CrossCheckConfig {
    #[serde(default = "default_keyword_max_chars")]
    pub keyword_max_chars: usize,
    #[serde(default = "default_cross_check_fees")]
    pub fees: FeeSchedule,
}

fn default_cross_check_fees() -> FeeSchedule {
    FeeSchedule::Flat(FlatFees::default())
}

impl Default for CrossCheckConfig {
    fn default() -> Self {
        Self {
            keyword_max_chars: default_keyword_max_chars(),
            fees: default_cross_check_fees(),
        }
    }
}
