//! Per-command setup: configuration, logging and service clients.

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use tracing::debug;

use super::command::PipelineArgs;
use super::{output, paths};
use crate::adapter::keepa::KeepaClient;
use crate::adapter::rakuten::RakutenClient;
use crate::domain::{Evaluator, FeeSchedule, SelectionCriteria};
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::selection::CriteriaOverride;
use crate::infrastructure::config::settings::Config;
use crate::port::Marketplace;

/// Load `path`, or `config.toml` when present, or the built-in defaults.
///
/// An explicitly named file that does not exist is an error.
#[allow(clippy::result_large_err)]
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => Config::load_or_default(paths::DEFAULT_CONFIG),
    }
}

/// Loaded configuration plus the command-line overrides of one run.
pub struct Session {
    pub config: Config,
    overrides: CriteriaOverride,
}

impl Session {
    /// Load configuration, apply `args` and start logging.
    #[allow(clippy::result_large_err)]
    pub fn open(config_path: Option<&Path>, args: &PipelineArgs) -> Result<Self> {
        let mut config = load_config(config_path)?;

        if let Some(level) = &args.log_level {
            config.logging.level.clone_from(level);
        } else if output::verbosity() > 1 {
            config.logging.level = "debug".into();
        }
        if args.json_logs || output::is_json() {
            config.logging.format = "json".into();
        }
        if args.no_fees {
            config.selection.debug_no_fees = true;
        }

        let overrides = args.criteria_override();
        validate_overrides(&overrides)?;

        config.init_logging();
        debug!(fees = config.fees.name(), no_fees = config.selection.debug_no_fees, "Session opened");

        Ok(Self { config, overrides })
    }

    /// `base` with the threshold flags layered on top.
    #[must_use]
    pub fn criteria(&self, base: SelectionCriteria) -> SelectionCriteria {
        self.overrides.apply(base)
    }

    /// Evaluator for `base` criteria and `schedule` after overrides.
    #[must_use]
    pub fn evaluator(&self, base: SelectionCriteria, schedule: &FeeSchedule) -> Evaluator {
        Evaluator::new(self.criteria(base), self.config.effective_fees(schedule))
    }

    #[allow(clippy::result_large_err)]
    pub fn keepa(&self) -> Result<KeepaClient> {
        KeepaClient::new(self.config.keepa.clone())
    }

    pub fn rakuten(&self) -> RakutenClient {
        let client = RakutenClient::new(self.config.rakuten.clone());
        if !client.is_enabled() {
            output::warning("RAKUTEN_APPLICATION_ID is not set; Rakuten lookups are skipped");
        }
        client
    }

    /// `explicit` when given, otherwise `default` under the output directory.
    #[must_use]
    pub fn report_path(&self, explicit: Option<&PathBuf>, default: impl FnOnce(&Path) -> PathBuf) -> PathBuf {
        explicit
            .cloned()
            .unwrap_or_else(|| default(&self.config.output.dir))
    }
}

#[allow(clippy::result_large_err)]
fn validate_overrides(overrides: &CriteriaOverride) -> Result<()> {
    if overrides.min_profit.is_some_and(|v| v < Decimal::ZERO) {
        return Err(ConfigError::InvalidValue {
            field: "--min-profit",
            reason: "must be 0 or greater".into(),
        }
        .into());
    }
    if overrides.min_roi.is_some_and(|v| v < Decimal::ZERO) {
        return Err(ConfigError::InvalidValue {
            field: "--min-roi",
            reason: "must be 0 or greater".into(),
        }
        .into());
    }
    if overrides.max_avg_rank_90d == Some(0) {
        return Err(ConfigError::InvalidValue {
            field: "--max-rank",
            reason: "must be greater than 0".into(),
        }
        .into());
    }
    Ok(())
}
