//! Amazon fee estimation.
//!
//! Amazon charges a referral fee (a share of the sell price) and, for FBA, a
//! fulfillment fee keyed on package size and weight. The exact tables change
//! every year and by category, so several approximations are supported:
//!
//! - [`FeeSchedule::Tiered`] - size/weight brackets, first match wins
//! - [`FeeSchedule::Volumetric`] - billable weight with a per-gram surcharge
//! - [`FeeSchedule::Flat`] - referral rate plus a fixed fulfillment fee
//! - [`FeeSchedule::WeightClass`] - three classes from grams and cm³ only
//! - [`FeeSchedule::None`] - everything zero, for debugging price gaps

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::money::{floor_yen, Yen};
use super::product::Dimensions;

/// What the fee schedules need to know about the package.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parcel {
    pub weight_kg: Option<Decimal>,
    pub dimensions_cm: Option<Dimensions>,
    /// Volume when only the volume is known (exports without sides).
    pub volume_cm3: Option<Decimal>,
    pub category: Option<String>,
}

/// Estimated fees for one sale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FeeBreakdown {
    pub referral: Yen,
    pub fulfillment: Yen,
    pub storage: Yen,
}

impl FeeBreakdown {
    /// Sum of all fee components.
    #[must_use]
    pub fn total(&self) -> Yen {
        self.referral + self.fulfillment + self.storage
    }
}

/// One size/weight bracket of the tiered schedule.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeeTier {
    /// Upper bound on length + width + height, centimetres.
    pub max_dimension_sum_cm: Decimal,
    /// Upper bound on weight, kilograms.
    pub max_weight_kg: Decimal,
    /// Fulfillment fee for parcels inside this bracket.
    pub fee: Yen,
}

impl FeeTier {
    fn new(max_dimension_sum_cm: Decimal, max_weight_kg: Decimal, fee: Yen) -> Self {
        Self {
            max_dimension_sum_cm,
            max_weight_kg,
            fee,
        }
    }

    fn fits(&self, dimension_sum: Decimal, weight_kg: Decimal) -> bool {
        dimension_sum <= self.max_dimension_sum_cm && weight_kg <= self.max_weight_kg
    }
}

/// Size/weight bracket schedule.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TieredFees {
    pub referral_rate: Decimal,
    /// Assumed weight when the product has none (or zero).
    pub default_weight_kg: Decimal,
    /// Fulfillment fee when the package dimensions are unknown.
    pub missing_size_fee: Yen,
    /// Fulfillment fee when no tier fits (large items).
    pub oversize_fee: Yen,
    /// Brackets, smallest first.
    pub tiers: Vec<FeeTier>,
}

impl Default for TieredFees {
    fn default() -> Self {
        Self {
            referral_rate: dec!(0.15),
            default_weight_kg: dec!(0.5),
            missing_size_fee: dec!(500),
            oversize_fee: dec!(1200),
            tiers: vec![
                FeeTier::new(dec!(35), dec!(0.25), dec!(330)),
                FeeTier::new(dec!(45), dec!(1.0), dec!(480)),
                FeeTier::new(dec!(55), dec!(3.0), dec!(580)),
                FeeTier::new(dec!(65), dec!(5.0), dec!(680)),
            ],
        }
    }
}

impl TieredFees {
    fn fulfillment(&self, parcel: &Parcel) -> Yen {
        let weight = parcel
            .weight_kg
            .filter(|w| !w.is_zero())
            .unwrap_or(self.default_weight_kg);

        let Some(dimensions) = parcel.dimensions_cm else {
            return self.missing_size_fee;
        };
        if weight.is_zero() {
            return self.missing_size_fee;
        }

        let sum = dimensions.sum();
        self.tiers
            .iter()
            .find(|tier| tier.fits(sum, weight))
            .map_or(self.oversize_fee, |tier| tier.fee)
    }
}

/// Billable-weight schedule with a per-gram surcharge.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct VolumetricFees {
    pub referral_rate: Decimal,
    /// cm³ per kilogram of volumetric weight.
    pub volumetric_divisor: Decimal,
    /// Assumed weight when the product has none.
    pub default_weight_kg: Decimal,
    /// Base fee for categories not listed in `category_base_fees`.
    pub base_fee: Yen,
    /// Base fee per category, matched case-insensitively.
    pub category_base_fees: BTreeMap<String, Yen>,
    /// Weight covered by the base fee.
    pub free_weight_kg: Decimal,
    /// Surcharge per gram above the free weight.
    pub fee_per_gram: Yen,
    /// Flat monthly storage allowance per unit.
    pub storage_fee: Yen,
}

impl Default for VolumetricFees {
    fn default() -> Self {
        let category_base_fees = [
            ("toys", dec!(420)),
            ("おもちゃ", dec!(420)),
            ("beauty", dec!(410)),
            ("ビューティー", dec!(410)),
            ("electronics", dec!(480)),
            ("家電&カメラ", dec!(480)),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self {
            referral_rate: dec!(0.08),
            volumetric_divisor: dec!(5000),
            default_weight_kg: dec!(0.5),
            base_fee: dec!(440),
            category_base_fees,
            free_weight_kg: dec!(0.5),
            fee_per_gram: dec!(4),
            storage_fee: dec!(10),
        }
    }
}

impl VolumetricFees {
    fn billable_weight(&self, parcel: &Parcel) -> Decimal {
        let actual = parcel.weight_kg.unwrap_or(self.default_weight_kg);
        let volume = parcel
            .dimensions_cm
            .map(|d| d.volume_cm3())
            .or(parcel.volume_cm3);
        match volume {
            Some(v) if !self.volumetric_divisor.is_zero() => {
                actual.max(v / self.volumetric_divisor)
            }
            _ => actual,
        }
    }

    fn base_for(&self, category: Option<&str>) -> Yen {
        category
            .and_then(|c| {
                self.category_base_fees
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(c))
                    .map(|(_, fee)| *fee)
            })
            .unwrap_or(self.base_fee)
    }

    fn fulfillment(&self, parcel: &Parcel) -> Yen {
        let billable = self.billable_weight(parcel);
        let base = self.base_for(parcel.category.as_deref());
        let extra = if billable > self.free_weight_kg {
            ((billable - self.free_weight_kg) * dec!(1000)).ceil() * self.fee_per_gram
        } else {
            Decimal::ZERO
        };
        base + extra
    }
}

/// Referral rate plus a fixed fulfillment fee.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FlatFees {
    pub referral_rate: Decimal,
    pub fulfillment_fee: Yen,
    /// Cut the referral fee down to whole yen.
    pub floor_referral: bool,
}

impl Default for FlatFees {
    fn default() -> Self {
        Self {
            referral_rate: dec!(0.15),
            fulfillment_fee: dec!(300),
            floor_referral: false,
        }
    }
}

impl FlatFees {
    /// Flat schedule with the given rate and fee.
    #[must_use]
    pub const fn new(referral_rate: Decimal, fulfillment_fee: Yen) -> Self {
        Self {
            referral_rate,
            fulfillment_fee,
            floor_referral: false,
        }
    }

    /// Same schedule with the referral fee floored to whole yen.
    #[must_use]
    pub fn floored(mut self) -> Self {
        self.floor_referral = true;
        self
    }
}

/// Three fulfillment classes derived from grams and cm³ alone.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WeightClassFees {
    pub referral_rate: Decimal,
    /// Cut the referral fee down to whole yen.
    pub floor_referral: bool,
    pub default_weight_g: Decimal,
    pub default_volume_cm3: Decimal,
    pub standard_fee: Yen,
    /// Applied above `heavy_weight_g`.
    pub heavy_fee: Yen,
    pub heavy_weight_g: Decimal,
    /// Applied above `large_weight_g` or `large_volume_cm3`.
    pub large_fee: Yen,
    pub large_weight_g: Decimal,
    pub large_volume_cm3: Decimal,
}

impl Default for WeightClassFees {
    fn default() -> Self {
        Self {
            referral_rate: dec!(0.10),
            floor_referral: true,
            default_weight_g: dec!(200),
            default_volume_cm3: dec!(1000),
            standard_fee: dec!(450),
            heavy_fee: dec!(550),
            heavy_weight_g: dec!(500),
            large_fee: dec!(700),
            large_weight_g: dec!(1000),
            large_volume_cm3: dec!(15000),
        }
    }
}

impl WeightClassFees {
    fn fulfillment(&self, parcel: &Parcel) -> Yen {
        let grams = parcel
            .weight_kg
            .map_or(self.default_weight_g, |kg| kg * dec!(1000));
        let volume = parcel
            .volume_cm3
            .or_else(|| parcel.dimensions_cm.map(|d| d.volume_cm3()))
            .unwrap_or(self.default_volume_cm3);

        if grams > self.large_weight_g || volume > self.large_volume_cm3 {
            self.large_fee
        } else if grams > self.heavy_weight_g {
            self.heavy_fee
        } else {
            self.standard_fee
        }
    }
}

/// Fee approximation selected by the `model` key.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum FeeSchedule {
    Tiered(TieredFees),
    Volumetric(VolumetricFees),
    Flat(FlatFees),
    WeightClass(WeightClassFees),
    /// No fees at all.
    None,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self::Tiered(TieredFees::default())
    }
}

impl FeeSchedule {
    /// Short model name for logs and reports.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Tiered(_) => "tiered",
            Self::Volumetric(_) => "volumetric",
            Self::Flat(_) => "flat",
            Self::WeightClass(_) => "weight_class",
            Self::None => "none",
        }
    }

    fn referral_rate(&self) -> Decimal {
        match self {
            Self::Tiered(f) => f.referral_rate,
            Self::Volumetric(f) => f.referral_rate,
            Self::Flat(f) => f.referral_rate,
            Self::WeightClass(f) => f.referral_rate,
            Self::None => Decimal::ZERO,
        }
    }

    fn floors_referral(&self) -> bool {
        match self {
            Self::Flat(f) => f.floor_referral,
            Self::WeightClass(f) => f.floor_referral,
            _ => false,
        }
    }

    /// Estimate fees for selling one unit at `sell_price`.
    #[must_use]
    pub fn estimate(&self, sell_price: Yen, parcel: &Parcel) -> FeeBreakdown {
        let mut referral = sell_price * self.referral_rate();
        if self.floors_referral() {
            referral = floor_yen(referral);
        }
        let (fulfillment, storage) = match self {
            Self::Tiered(f) => (f.fulfillment(parcel), Decimal::ZERO),
            Self::Volumetric(f) => (f.fulfillment(parcel), f.storage_fee),
            Self::Flat(f) => (f.fulfillment_fee, Decimal::ZERO),
            Self::WeightClass(f) => (f.fulfillment(parcel), Decimal::ZERO),
            Self::None => (Decimal::ZERO, Decimal::ZERO),
        };
        FeeBreakdown {
            referral,
            fulfillment,
            storage,
        }
    }

    /// Check the schedule is usable.
    pub fn validate(&self) -> Result<(), DomainError> {
        let rate = self.referral_rate();
        if rate < Decimal::ZERO || rate > Decimal::ONE {
            return Err(DomainError::InvalidFeeSchedule {
                reason: format!("referral_rate must be between 0 and 1, got {rate}"),
            });
        }

        match self {
            Self::Tiered(f) => {
                if f.tiers.is_empty() {
                    return Err(DomainError::InvalidFeeSchedule {
                        reason: "tiered model needs at least one tier".to_string(),
                    });
                }
                let ordered = f.tiers.windows(2).all(|pair| {
                    pair[0].max_dimension_sum_cm <= pair[1].max_dimension_sum_cm
                        && pair[0].max_weight_kg <= pair[1].max_weight_kg
                });
                if !ordered {
                    return Err(DomainError::InvalidFeeSchedule {
                        reason: "tiers must be ordered smallest first".to_string(),
                    });
                }
            }
            Self::Volumetric(f) => {
                if f.volumetric_divisor <= Decimal::ZERO {
                    return Err(DomainError::InvalidFeeSchedule {
                        reason: "volumetric_divisor must be greater than 0".to_string(),
                    });
                }
            }
            Self::Flat(_) | Self::WeightClass(_) | Self::None => {}
        }
        Ok(())
    }
}
