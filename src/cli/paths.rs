//! Default input and report paths.
//!
//! Inputs live under `data/`; reports go to the configured output
//! directory (`data/` by default), some stamped with the run date.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG: &str = "config.toml";

pub fn candidates() -> PathBuf {
    Path::new("data").join("input_candidates.csv")
}

/// Directory of Keepa exports for `scan` and `hunt export`.
pub fn raw_exports() -> PathBuf {
    Path::new("data").join("raw_keepa")
}

pub fn gap_list() -> PathBuf {
    Path::new("data").join("order_list_keepa.csv")
}

pub fn selected(dir: &Path) -> PathBuf {
    dir.join("output_selected.csv")
}

pub fn cross_checked(dir: &Path) -> PathBuf {
    dir.join("cross_check_result.csv")
}

pub fn scan_candidates(dir: &Path) -> PathBuf {
    dir.join("keepa_scan_candidates.csv")
}

pub fn order_list(dir: &Path, now: DateTime<Local>) -> PathBuf {
    dir.join(format!("order_list_{}.csv", now.format("%Y%m%d")))
}

/// Export hunts can run several times a day, so the stamp carries the minute.
pub fn export_hunt(dir: &Path, now: DateTime<Local>) -> PathBuf {
    dir.join(format!("hunter_result_{}.csv", now.format("%Y%m%d_%H%M")))
}

pub fn keyword_hunt(dir: &Path, now: DateTime<Local>) -> PathBuf {
    dir.join(format!("hunter_result_{}.csv", now.format("%Y%m%d")))
}

pub fn profitable(dir: &Path) -> PathBuf {
    dir.join("profitable_list.csv")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn dated_reports_use_local_stamp() {
        let now = Local.with_ymd_and_hms(2026, 3, 7, 9, 5, 0).unwrap();
        let dir = Path::new("out");

        assert_eq!(order_list(dir, now), PathBuf::from("out/order_list_20260307.csv"));
        assert_eq!(export_hunt(dir, now), PathBuf::from("out/hunter_result_20260307_0905.csv"));
        assert_eq!(keyword_hunt(dir, now), PathBuf::from("out/hunter_result_20260307.csv"));
    }

    #[test]
    fn fixed_reports_live_in_output_dir() {
        let dir = Path::new("data");
        assert_eq!(selected(dir), PathBuf::from("data/output_selected.csv"));
        assert_eq!(scan_candidates(dir), PathBuf::from("data/keepa_scan_candidates.csv"));
        assert_eq!(profitable(dir), PathBuf::from("data/profitable_list.csv"));
    }
}
