//! Report writer.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use ::csv::Writer;
use serde::Serialize;
use tracing::info;

use crate::error::Result;

/// Write `rows` as CSV with a header line.
///
/// Parent directories are created. Nothing is written for an empty slice;
/// the return value says whether a file was produced. `bom` prefixes the
/// file with a UTF-8 byte order mark so Excel detects the encoding.
pub fn write_report<T: Serialize>(path: &Path, rows: &[T], bom: bool) -> Result<bool> {
    if rows.is_empty() {
        return Ok(false);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    if bom {
        file.write_all("\u{feff}".as_bytes())?;
    }

    let mut writer = Writer::from_writer(file);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = rows.len(), "Report written");
    Ok(true)
}
