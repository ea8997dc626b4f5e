//! Spreadsheet input and report output.

pub mod reader;
pub mod writer;

pub use reader::{clean_price, csv_files, read_asins, read_candidates, read_export, read_gap_rows};
pub use writer::write_report;
