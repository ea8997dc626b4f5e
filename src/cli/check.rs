//! Handler for `check config`.

use std::path::Path;

use serde_json::json;

use super::session::load_config;
use super::{output, paths};
use crate::adapter::keepa::settings::MIN_KEY_LEN;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Credential state that does not reveal the secrets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialReport {
    pub keepa_key: bool,
    pub keepa_key_short: bool,
    pub rakuten_id: bool,
}

impl CredentialReport {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let key_len = config.keepa.api_key.as_deref().map_or(0, str::len);
        Self {
            keepa_key: key_len > 0,
            keepa_key_short: key_len > 0 && key_len < MIN_KEY_LEN,
            rakuten_id: config.rakuten.application_id.is_some(),
        }
    }
}

/// Validate the configuration file and report which credentials are set.
pub fn execute_config(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let path = config_path.unwrap_or_else(|| Path::new(paths::DEFAULT_CONFIG));
    let credentials = CredentialReport::from_config(&config);

    if output::is_json() {
        output::json_output(json!({
            "command": "check.config",
            "valid": true,
            "config": path.display().to_string(),
            "config_found": path.exists(),
            "fees": config.fees.name(),
            "keepa_domain": config.keepa.domain,
            "genres": config.research.genres.len(),
            "keywords": config.hunt.keywords.len(),
            "keepa_key": credentials.keepa_key,
            "rakuten_id": credentials.rakuten_id,
        }));
        return Ok(());
    }

    output::section("Configuration Check");
    output::field("Config", path.display());
    if path.exists() {
        output::success("Configuration file is valid");
    } else {
        output::warning("Configuration file not found, using defaults");
    }

    output::section("Summary");
    output::field("Fee model", config.fees.name());
    output::field("Keepa domain", config.keepa.domain);
    output::field("Genres", config.research.genres.len());
    output::field("Keywords", config.hunt.keywords.len());
    output::field("Output dir", config.output.dir.display());

    if credentials.keepa_key_short {
        output::warning("KEEPA_API_KEY looks too short");
    } else if credentials.keepa_key {
        output::success("Keepa API key detected");
    } else {
        output::warning("KEEPA_API_KEY not set (required for select, cross-check, scan, research, hunt keywords)");
    }

    if credentials.rakuten_id {
        output::success("Rakuten application id detected");
    } else {
        output::warning("RAKUTEN_APPLICATION_ID not set (Rakuten lookups will be skipped)");
    }

    output::success("Configuration check complete");
    Ok(())
}
