//! Application services (use cases).
//!
//! Each pipeline drives the domain evaluator over one kind of input and
//! talks to the outside world only through the ports.

pub mod bulk_scan;
pub mod cross_check;
pub mod estimate;
pub mod export_hunt;
pub mod gap_search;
pub mod genre_research;
pub mod keyword_hunt;
pub mod report;
pub mod selection;

pub use report::{NoProgress, Progress, Report, RunStats};
