//! Pipeline results and progress reporting.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::Rejection;

/// Skip reason when the source marketplace has no matching offer.
pub const NOT_ON_RAKUTEN: &str = "not_on_rakuten";
/// Skip reason when the catalog has no matching product.
pub const NOT_ON_KEEPA: &str = "not_on_keepa";

/// Counters for one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub examined: usize,
    pub accepted: usize,
    /// Rejections keyed by [`Rejection::kind`] or a pipeline skip reason.
    pub rejected: BTreeMap<&'static str, usize>,
    /// Lookups that errored; the item was skipped.
    pub failed: usize,
}

impl RunStats {
    pub fn examine(&mut self) {
        self.examined += 1;
    }

    pub fn accept(&mut self) {
        self.accepted += 1;
    }

    pub fn reject(&mut self, rejection: &Rejection) {
        self.skip(rejection.kind());
    }

    pub fn skip(&mut self, reason: &'static str) {
        *self.rejected.entry(reason).or_insert(0) += 1;
    }

    pub fn fail(&mut self) {
        self.failed += 1;
    }

    #[must_use]
    pub fn rejected_total(&self) -> usize {
        self.rejected.values().sum()
    }
}

/// Rows a pipeline selected plus its counters.
#[derive(Debug, Clone, PartialEq)]
pub struct Report<T> {
    pub rows: Vec<T>,
    pub stats: RunStats,
}

impl<T> Default for Report<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            stats: RunStats::default(),
        }
    }
}

impl<T> Report<T> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Receives per-item progress from a running pipeline.
pub trait Progress: Send + Sync {
    /// A batch of `total` items is about to be processed.
    fn start(&self, total: usize, label: &str);
    /// One item finished.
    fn advance(&self, message: &str);
    fn finish(&self);
}

/// Progress sink that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn start(&self, _total: usize, _label: &str) {}
    fn advance(&self, _message: &str) {}
    fn finish(&self) {}
}
