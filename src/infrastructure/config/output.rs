//! Report output configuration.

use std::path::PathBuf;

use serde::Deserialize;

/// Reports opened as ordering sheets in Excel.
const SHEET_COMMANDS: &[&str] = &["hunt.export", "hunt.keywords", "gap"];

/// `[output]`
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory default report paths are placed in.
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
    /// Prefix reports with a UTF-8 byte order mark so Excel reads them.
    /// Unset means on for the hunt and gap reports only.
    #[serde(default)]
    pub excel_bom: Option<bool>,
    /// Rows shown in the terminal summary table.
    #[serde(default = "default_top_rows")]
    pub top_rows: usize,
}

fn default_dir() -> PathBuf {
    PathBuf::from("data")
}

const fn default_top_rows() -> usize {
    10
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            excel_bom: None,
            top_rows: default_top_rows(),
        }
    }
}

impl OutputConfig {
    /// Whether the report written by `command` starts with a BOM.
    #[must_use]
    pub fn bom(&self, command: &str) -> bool {
        self.excel_bom.unwrap_or_else(|| SHEET_COMMANDS.contains(&command))
    }
}
