//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings.
//! Configuration is loaded from a TOML file; API credentials only ever come
//! from the environment (`KEEPA_API_KEY`, `RAKUTEN_APPLICATION_ID`).
//!
//! # Example
//!
//! ```no_run
//! use sedori::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use url::Url;

use super::logging::LoggingConfig;
use super::output::OutputConfig;
use super::research::{CrossCheckConfig, GapConfig, HuntConfig, ResearchConfig};
use super::selection::SelectionConfig;
use crate::adapter::http::HttpConfig;
use crate::adapter::keepa::KeepaConfig;
use crate::adapter::rakuten::settings::{APPLICATION_ID_VARS, MAX_HITS};
use crate::adapter::rakuten::RakutenConfig;
use crate::domain::{FeeSchedule, SelectionCriteria};
use crate::error::{ConfigError, Result};

/// Keepa domain ids run from 1 (amazon.com) to 12 (amazon.com.br).
const KEEPA_DOMAINS: std::ops::RangeInclusive<u8> = 1..=12;

/// Main application configuration.
///
/// Every section is optional; an empty file yields the defaults the
/// research scripts were tuned with.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub keepa: KeepaConfig,

    #[serde(default)]
    pub rakuten: RakutenConfig,

    /// Baseline buy rules.
    #[serde(default)]
    pub selection: SelectionConfig,

    /// Fee model for selection, research, keyword hunts and estimates.
    #[serde(default)]
    pub fees: FeeSchedule,

    #[serde(default)]
    pub research: ResearchConfig,

    #[serde(default)]
    pub hunt: HuntConfig,

    #[serde(default)]
    pub gap: GapConfig,

    #[serde(default)]
    pub cross_check: CrossCheckConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Parse configuration from TOML content, reading secrets from the
    /// process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        Self::parse_toml_with(content, |name| std::env::var(name).ok())
    }

    /// Like [`Config::parse_toml`] with an injectable environment lookup.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml_with<F>(content: &str, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        config.keepa.api_key = env("KEEPA_API_KEY").filter(|v| !v.trim().is_empty());
        config.rakuten.application_id = APPLICATION_ID_VARS
            .iter()
            .find_map(|name| env(name).filter(|v| !v.trim().is_empty()));

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is malformed, or fails
    /// validation.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load `path` when it exists, otherwise start from defaults.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Self::parse_toml("")
        }
    }

    /// Initialize the global tracing subscriber from `[logging]`.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// Baseline criteria from `[selection]`.
    #[must_use]
    pub fn selection_criteria(&self) -> SelectionCriteria {
        self.selection.criteria()
    }

    #[must_use]
    pub fn research_criteria(&self) -> SelectionCriteria {
        self.research.criteria.apply(self.selection_criteria())
    }

    #[must_use]
    pub fn hunt_criteria(&self) -> SelectionCriteria {
        self.hunt.criteria.apply(self.selection_criteria())
    }

    #[must_use]
    pub fn gap_criteria(&self) -> SelectionCriteria {
        self.gap.criteria.apply(self.selection_criteria())
    }

    /// `schedule`, or no fees at all when `debug_no_fees` is set.
    #[must_use]
    pub fn effective_fees(&self, schedule: &FeeSchedule) -> FeeSchedule {
        if self.selection.debug_no_fees {
            FeeSchedule::None
        } else {
            schedule.clone()
        }
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(invalid("logging.format", "must be \"pretty\" or \"json\""));
        }

        validate_url("keepa.api_url", &self.keepa.api_url)?;
        if !KEEPA_DOMAINS.contains(&self.keepa.domain) {
            return Err(invalid("keepa.domain", "must be between 1 and 12"));
        }
        if self.keepa.stats_days == 0 {
            return Err(invalid("keepa.stats_days", "must be greater than 0"));
        }
        validate_http("keepa.http", &self.keepa.http)?;

        validate_url("rakuten.search_url", &self.rakuten.search_url)?;
        validate_url("rakuten.ranking_url", &self.rakuten.ranking_url)?;
        if self.rakuten.hits == 0 || self.rakuten.hits > MAX_HITS {
            return Err(invalid("rakuten.hits", "must be between 1 and 30"));
        }
        if self.rakuten.assumed_shipping < Decimal::ZERO {
            return Err(invalid("rakuten.assumed_shipping", "must be 0 or greater"));
        }
        validate_http("rakuten.http", &self.rakuten.http)?;

        validate_criteria("selection", &self.selection_criteria())?;
        validate_criteria("research.criteria", &self.research_criteria())?;
        validate_criteria("hunt.criteria", &self.hunt_criteria())?;
        validate_criteria("gap.criteria", &self.gap_criteria())?;

        validate_fees("fees", &self.fees)?;
        validate_fees("hunt.export_fees", &self.hunt.export_fees)?;
        validate_fees("gap.fees", &self.gap.fees)?;
        validate_fees("cross_check.fees", &self.cross_check.fees)?;

        if self.research.keyword_max_chars == 0 {
            return Err(invalid("research.keyword_max_chars", "must be greater than 0"));
        }
        if self.cross_check.keyword_max_chars == 0 {
            return Err(invalid(
                "cross_check.keyword_max_chars",
                "must be greater than 0",
            ));
        }
        if self.gap.point_rate < Decimal::ZERO || self.gap.point_rate > Decimal::ONE {
            return Err(invalid("gap.point_rate", "must be between 0 and 1"));
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
    .into()
}

#[allow(clippy::result_large_err)]
fn validate_url(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::MissingField { field }.into());
    }
    Url::parse(value).map_err(|e| invalid(field, &e.to_string()))?;
    Ok(())
}

#[allow(clippy::result_large_err)]
fn validate_http(field: &'static str, http: &HttpConfig) -> Result<()> {
    if http.timeout_ms == 0 || http.connect_timeout_ms == 0 {
        return Err(invalid(field, "timeouts must be greater than 0"));
    }
    if http.retry_max_attempts == 0 {
        return Err(invalid(field, "retry_max_attempts must be at least 1"));
    }
    Ok(())
}

#[allow(clippy::result_large_err)]
fn validate_criteria(field: &'static str, criteria: &SelectionCriteria) -> Result<()> {
    if criteria.min_profit < Decimal::ZERO {
        return Err(invalid(field, "min_profit must be 0 or greater"));
    }
    if criteria.min_roi < Decimal::ZERO {
        return Err(invalid(field, "min_roi must be 0 or greater"));
    }
    if criteria.max_avg_rank_90d == 0 {
        return Err(invalid(field, "max_avg_rank_90d must be greater than 0"));
    }
    if let Some(ratio) = criteria.max_amazon_presence_ratio {
        if ratio < Decimal::ZERO || ratio > Decimal::ONE {
            return Err(invalid(field, "max_amazon_presence_ratio must be between 0 and 1"));
        }
    }
    Ok(())
}

#[allow(clippy::result_large_err)]
fn validate_fees(field: &'static str, fees: &FeeSchedule) -> Result<()> {
    fees.validate().map_err(|e| invalid(field, &e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ThresholdMode;
    use crate::error::Error;
    use rust_decimal_macros::dec;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn empty_file_yields_defaults() {
        let config = Config::parse_toml_with("", no_env).unwrap();
        assert_eq!(config.keepa.domain, 5);
        assert_eq!(config.keepa.request_interval_ms, 3_000);
        assert_eq!(config.rakuten.request_interval_ms, 1_000);
        assert_eq!(config.selection.min_profit, dec!(500));
        assert_eq!(config.fees.name(), "tiered");
        assert_eq!(config.hunt.export_fees.name(), "weight_class");
        assert!(config.keepa.api_key.is_none());
        assert!(config.rakuten.application_id.is_none());
    }

    #[test]
    fn secrets_from_environment() {
        let env = |name: &str| match name {
            "KEEPA_API_KEY" => Some("keepa-secret-key".to_string()),
            "RAKUTEN_APP_ID" => Some("1234567890".to_string()),
            _ => None,
        };
        let config = Config::parse_toml_with("", env).unwrap();
        assert_eq!(config.keepa.api_key.as_deref(), Some("keepa-secret-key"));
        assert_eq!(config.rakuten.application_id.as_deref(), Some("1234567890"));
    }

    #[test]
    fn application_id_prefers_primary_variable() {
        let env = |name: &str| match name {
            "RAKUTEN_APPLICATION_ID" => Some("primary".to_string()),
            "RAKUTEN_API_KEY" => Some("fallback".to_string()),
            _ => None,
        };
        let config = Config::parse_toml_with("", env).unwrap();
        assert_eq!(config.rakuten.application_id.as_deref(), Some("primary"));
    }

    #[test]
    fn pipeline_overrides_layer_on_selection() {
        let toml = r#"
            [selection]
            min_profit = 800
            max_avg_rank_90d = 50000

            [hunt.criteria]
            min_roi = 0.2
        "#;
        let config = Config::parse_toml_with(toml, no_env).unwrap();

        let hunt = config.hunt_criteria();
        assert_eq!(hunt.min_profit, dec!(800));
        assert_eq!(hunt.min_roi, dec!(0.2));
        assert_eq!(hunt.max_avg_rank_90d, 50_000);
        assert_eq!(hunt.threshold_mode, ThresholdMode::All);

        let research = config.research_criteria();
        assert_eq!(research.min_profit, dec!(500));
        assert!(research.skip_when_amazon_in_stock);
    }

    #[test]
    fn debug_no_fees_disables_schedule() {
        let config = Config::parse_toml_with("[selection]\ndebug_no_fees = true\n", no_env).unwrap();
        assert_eq!(config.effective_fees(&config.fees).name(), "none");
    }

    #[test]
    fn rejects_negative_min_profit() {
        let result = Config::parse_toml_with("[selection]\nmin_profit = -1\n", no_env);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue {
                field: "selection",
                ..
            }))
        ));
    }

    #[test]
    fn rejects_bad_url() {
        let result = Config::parse_toml_with("[keepa]\napi_url = \"not a url\"\n", no_env);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue {
                field: "keepa.api_url",
                ..
            }))
        ));
    }

    #[test]
    fn rejects_empty_url() {
        let result = Config::parse_toml_with("[rakuten]\nsearch_url = \"\"\n", no_env);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::MissingField {
                field: "rakuten.search_url"
            }))
        ));
    }

    #[test]
    fn rejects_zero_stats_days() {
        let result = Config::parse_toml_with("[keepa]\nstats_days = 0\n", no_env);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue {
                field: "keepa.stats_days",
                ..
            }))
        ));
    }

    #[test]
    fn rejects_hits_out_of_range() {
        let result = Config::parse_toml_with("[rakuten]\nhits = 31\n", no_env);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue {
                field: "rakuten.hits",
                ..
            }))
        ));
    }

    #[test]
    fn rejects_point_rate_above_one() {
        let result = Config::parse_toml_with("[gap]\npoint_rate = 10\n", no_env);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue {
                field: "gap.point_rate",
                ..
            }))
        ));
    }

    #[test]
    fn rejects_referral_rate_outside_unit_interval() {
        let toml = "[fees]\nmodel = \"flat\"\nreferral_rate = 1.5\n";
        let result = Config::parse_toml_with(toml, no_env);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue { field: "fees", .. }))
        ));
    }

    #[test]
    fn rejects_unknown_log_format() {
        let result = Config::parse_toml_with("[logging]\nformat = \"xml\"\n", no_env);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue {
                field: "logging.format",
                ..
            }))
        ));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let result = Config::parse_toml_with("[selection\n", no_env);
        assert!(matches!(result, Err(Error::Config(ConfigError::Parse(_)))));
    }
}
