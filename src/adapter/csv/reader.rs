//! Input file readers: candidate lists, ASIN lists, Keepa exports, JAN lists.
//!
//! Inputs come from spreadsheets and Keepa downloads, so the readers are
//! lenient: a UTF-8 BOM is ignored, header names are matched loosely, and a
//! bad row is logged and skipped rather than failing the whole file.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use ::csv::{ReaderBuilder, StringRecord};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::domain::{Asin, Candidate, ExportRow, GapRow, Jan, Yen};
use crate::error::{InputError, Result};

const BOM: char = '\u{feff}';

/// Header aliases for the Keepa product finder export, Japanese then English.
const EXPORT_JAN: &[&str] = &["商品コード: EAN", "Product Codes: EAN"];
const EXPORT_BUYBOX: &[&str] = &["Buy Box 🚚: 現在価格", "Buy Box 🚚: Current"];
const EXPORT_AMAZON: &[&str] = &["Amazon: 現在価格", "Amazon: Current"];
const EXPORT_NEW: &[&str] = &["新品: 現在価格", "New: Current"];
const EXPORT_TITLE: &[&str] = &["商品名", "Title"];
const EXPORT_ASIN: &[&str] = &["ASIN"];
const EXPORT_WEIGHT: &[&str] = &["パッケージ: 重さ (g)", "Package: Weight (g)"];
const EXPORT_VOLUME: &[&str] = &["パッケージ: サイズ (cm³)", "Package: Dimension (cm³)"];

/// A parsed file: normalised headers plus raw records.
struct Table {
    path: String,
    headers: Vec<String>,
    rows: Vec<(u64, StringRecord)>,
}

impl Table {
    fn open(path: &Path) -> Result<Self> {
        let shown = path.display().to_string();
        if !path.is_file() {
            return Err(InputError::NotFound(shown).into());
        }

        let content = fs::read_to_string(path)?;
        let content = content.strip_prefix(BOM).unwrap_or(&content);
        let first_line = content.lines().next().unwrap_or_default();
        let delimiter = if first_line.contains('\t') { b'\t' } else { b',' };

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .has_headers(true)
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for (index, result) in reader.records().enumerate() {
            // Line 1 is the header.
            let line = index as u64 + 2;
            match result {
                Ok(record) => rows.push((line, record)),
                Err(err) => warn!(path = %shown, line, error = %err, "Skipping malformed row"),
            }
        }

        debug!(path = %shown, rows = rows.len(), "Loaded input file");
        Ok(Self {
            path: shown,
            headers,
            rows,
        })
    }

    /// Index of the first header equal to `name`, ignoring ASCII case.
    fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.eq_ignore_ascii_case(name))
    }

    fn column_any(&self, aliases: &[&str]) -> Option<usize> {
        aliases.iter().find_map(|alias| self.column(alias))
    }

    fn require(&self, name: &'static str) -> Result<usize> {
        self.column(name).ok_or_else(|| {
            InputError::MissingColumn {
                path: self.path.clone(),
                column: name,
            }
            .into()
        })
    }
}

fn cell(record: &StringRecord, index: Option<usize>) -> Option<&str> {
    index
        .and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Parse a spreadsheet price: strips `¥`, `￥`, commas and spaces, drops
/// any fraction. Anything unparsable is zero.
#[must_use]
pub fn clean_price(raw: &str) -> Yen {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '¥' | '￥' | ',' | ' ' | '\u{3000}'))
        .collect();
    let cleaned = cleaned.trim();
    Decimal::from_str(cleaned)
        .or_else(|_| Decimal::from_scientific(cleaned))
        .map(|d| d.trunc())
        .unwrap_or(Decimal::ZERO)
}

fn positive_price(raw: Option<&str>) -> Option<Yen> {
    raw.map(clean_price).filter(|p| *p > Decimal::ZERO)
}

fn parse_decimal(raw: Option<&str>) -> Option<Decimal> {
    raw.and_then(|s| Decimal::from_str(s).ok())
        .filter(|d| *d > Decimal::ZERO)
}

/// Every `*.csv` file directly inside `dir`, sorted by name.
pub fn csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Read `asin,buy_price[,notes]` rows, comma or tab separated.
pub fn read_candidates(path: &Path) -> Result<Vec<Candidate>> {
    let table = Table::open(path)?;
    let asin_col = table.require("asin")?;
    let price_col = table.require("buy_price")?;
    let note_col = table.column("notes").or_else(|| table.column("note"));

    let mut candidates = Vec::new();
    for (line, record) in &table.rows {
        let Some(raw_asin) = cell(record, Some(asin_col)) else {
            continue;
        };
        let asin = match Asin::parse(raw_asin) {
            Ok(asin) => asin,
            Err(err) => {
                warn!(path = %table.path, line, error = %err, "Skipping candidate");
                continue;
            }
        };
        let Some(buy_price) = positive_price(cell(record, Some(price_col))) else {
            warn!(path = %table.path, line, asin = %asin, "Skipping candidate without buy price");
            continue;
        };

        let mut candidate = Candidate::new(asin, Some(buy_price));
        candidate.note = cell(record, note_col).unwrap_or_default().to_string();
        candidates.push(candidate);
    }
    Ok(candidates)
}

/// Read ASINs from a bestseller export.
///
/// Uses the `asin` column when present, otherwise the first column.
/// Duplicates are dropped, first occurrence wins.
pub fn read_asins(path: &Path) -> Result<Vec<Asin>> {
    let table = Table::open(path)?;
    let column = table.column("asin").unwrap_or(0);

    let mut asins: Vec<Asin> = Vec::new();
    for (line, record) in &table.rows {
        let Some(raw) = cell(record, Some(column)).or_else(|| cell(record, Some(0))) else {
            continue;
        };
        match Asin::parse(raw) {
            Ok(asin) if !asins.contains(&asin) => asins.push(asin),
            Ok(_) => {}
            Err(err) => debug!(path = %table.path, line, error = %err, "Ignoring non-ASIN cell"),
        }
    }
    Ok(asins)
}

/// Read a Keepa product finder export.
pub fn read_export(path: &Path) -> Result<Vec<ExportRow>> {
    let table = Table::open(path)?;
    let jan = table.column_any(EXPORT_JAN);
    let buybox = table.column_any(EXPORT_BUYBOX);
    let amazon = table.column_any(EXPORT_AMAZON);
    let new = table.column_any(EXPORT_NEW);
    let title = table.column_any(EXPORT_TITLE);
    let asin = table.column_any(EXPORT_ASIN);
    let weight = table.column_any(EXPORT_WEIGHT);
    let volume = table.column_any(EXPORT_VOLUME);

    if jan.is_none() {
        warn!(path = %table.path, "Export has no EAN column, every row will be skipped");
    }

    let rows = table
        .rows
        .iter()
        .map(|(_, record)| ExportRow {
            asin: cell(record, asin).and_then(|s| Asin::parse(s).ok()),
            title: cell(record, title).unwrap_or_default().to_string(),
            jan: cell(record, jan).and_then(first_jan),
            buybox_price: positive_price(cell(record, buybox)),
            amazon_price: positive_price(cell(record, amazon)),
            new_price: positive_price(cell(record, new)),
            package_weight_g: parse_decimal(cell(record, weight)),
            package_volume_cm3: parse_decimal(cell(record, volume)),
        })
        .collect();
    Ok(rows)
}

/// Exports may list several EANs in one cell.
fn first_jan(raw: &str) -> Option<Jan> {
    raw.split([',', ' '])
        .find_map(|code| Jan::parse(code).ok())
}

/// Read a JAN list with target Amazon prices.
pub fn read_gap_rows(path: &Path) -> Result<Vec<GapRow>> {
    let table = Table::open(path)?;
    let jan_col = table.require("jan")?;
    let price_col = table.column("target_price");
    let asin_col = table.column("asin");
    let keyword_col = table.column("keyword");
    let url_col = table.column("url");

    let mut rows = Vec::new();
    for (line, record) in &table.rows {
        let Some(jan) = cell(record, Some(jan_col)).and_then(|s| Jan::parse(s).ok()) else {
            debug!(path = %table.path, line, "Skipping row without JAN");
            continue;
        };
        let Some(target_price) = positive_price(cell(record, price_col)) else {
            debug!(path = %table.path, line, jan = %jan, "Skipping row without target price");
            continue;
        };

        rows.push(GapRow {
            jan,
            asin: cell(record, asin_col).and_then(|s| Asin::parse(s).ok()),
            keyword: cell(record, keyword_col).unwrap_or_default().to_string(),
            target_price,
            url: cell(record, url_col).map(String::from),
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn clean_price_strips_symbols() {
        assert_eq!(clean_price("¥2,980"), dec!(2980));
        assert_eq!(clean_price("￥ 1,200.9"), dec!(1200));
        assert_eq!(clean_price("3500"), dec!(3500));
        assert_eq!(clean_price("-"), Decimal::ZERO);
        assert_eq!(clean_price(""), Decimal::ZERO);
    }

    #[test]
    fn candidates_comma_separated() {
        let f = file("asin,buy_price,notes\nB00TEST001,2500,sale\nb00test002,1800,\n");
        let rows = read_candidates(f.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].buy_price, Some(dec!(2500)));
        assert_eq!(rows[0].note, "sale");
        assert_eq!(rows[1].asin.as_str(), "B00TEST002");
    }

    #[test]
    fn candidates_tab_separated_with_bom() {
        let f = file("\u{feff}asin\tbuy_price\tnote\nB00TEST001\t2500\tx\n");
        let rows = read_candidates(f.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].note, "x");
    }

    #[test]
    fn candidates_skip_bad_rows() {
        let f = file("asin,buy_price\nnot-an-asin,100\nB00TEST001,abc\nB00TEST002,900\n");
        let rows = read_candidates(f.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].asin.as_str(), "B00TEST002");
    }

    #[test]
    fn candidates_require_buy_price_column() {
        let f = file("asin\nB00TEST001\n");
        let err = read_candidates(f.path()).unwrap_err();
        assert!(err.to_string().contains("buy_price"));
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = read_asins(Path::new("/nonexistent/input.csv")).unwrap_err();
        assert!(matches!(err, crate::error::Error::Input(InputError::NotFound(_))));
    }

    #[test]
    fn asins_from_named_column_deduplicated() {
        let f = file("Rank,ASIN,Title\n1,B00TEST001,a\n2,B00TEST002,b\n3,B00TEST001,c\n");
        let asins = read_asins(f.path()).unwrap();
        let ids: Vec<&str> = asins.iter().map(Asin::as_str).collect();
        assert_eq!(ids, vec!["B00TEST001", "B00TEST002"]);
    }

    #[test]
    fn asins_fall_back_to_first_column() {
        let f = file("code,title\nB00TEST003,a\n");
        let asins = read_asins(f.path()).unwrap();
        assert_eq!(asins.len(), 1);
        assert_eq!(asins[0].as_str(), "B00TEST003");
    }

    #[test]
    fn export_with_japanese_headers() {
        let f = file(concat!(
            "商品名,ASIN,商品コード: EAN,Buy Box 🚚: 現在価格,Amazon: 現在価格,新品: 現在価格,パッケージ: 重さ (g),パッケージ: サイズ (cm³)\n",
            "マウス,B00TEST001,4.988601012345e12,\"¥3,100\",,¥2500,250,1200\n",
            "キーボード,B00TEST002,,,-,¥9800,,\n",
        ));
        let rows = read_export(f.path()).unwrap();
        assert_eq!(rows.len(), 2);

        let first = &rows[0];
        assert_eq!(first.jan.as_ref().map(Jan::as_str), Some("4988601012345"));
        assert_eq!(first.sell_price(), Some(dec!(3100)));
        assert_eq!(first.package_weight_g, Some(dec!(250)));
        assert_eq!(first.package_volume_cm3, Some(dec!(1200)));

        let second = &rows[1];
        assert_eq!(second.jan, None);
        assert_eq!(second.sell_price(), Some(dec!(9800)));
    }

    #[test]
    fn export_with_english_headers() {
        let f = file("Title,ASIN,Product Codes: EAN,Amazon: Current\nMouse,B00TEST001,4988601012345,2980\n");
        let rows = read_export(f.path()).unwrap();
        assert_eq!(rows[0].amazon_price, Some(dec!(2980)));
        assert_eq!(rows[0].title, "Mouse");
    }

    #[test]
    fn gap_rows_require_jan_column() {
        let f = file("asin,target_price\nB00TEST001,3000\n");
        let err = read_gap_rows(f.path()).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Input(InputError::MissingColumn { column: "jan", .. })
        ));
    }

    #[test]
    fn gap_rows_skip_missing_jan_or_price() {
        let f = file(concat!(
            "jan,asin,keyword,target_price,url\n",
            "4988601012345.0,B00TEST001,インク,\"3,980\",https://www.amazon.co.jp/dp/B00TEST001\n",
            ",B00TEST002,x,1000,\n",
            "4901234567894,B00TEST003,y,,\n",
        ));
        let rows = read_gap_rows(f.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].jan.as_str(), "4988601012345");
        assert_eq!(rows[0].target_price, dec!(3980));
        assert_eq!(rows[0].keyword, "インク");
    }
}
