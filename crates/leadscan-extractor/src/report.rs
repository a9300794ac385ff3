//! Summary of a finished run.

use leadscan_core::ExtractionResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Summary counts for one finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionReport {
    /// Results returned
    pub total: usize,
    /// Results with a phone
    pub with_phone: usize,
    /// Results with an empty phone
    pub without_phone: usize,
}

impl ExtractionReport {
    /// Count the results of one run.
    pub fn summarize(results: &[ExtractionResult]) -> Self {
        let with_phone = results.iter().filter(|r| r.has_phone()).count();
        Self {
            total: results.len(),
            with_phone,
            without_phone: results.len() - with_phone,
        }
    }
}

impl fmt::Display for ExtractionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} contacts, {} with phone, {} without",
            self.total, self.with_phone, self.without_phone
        )
    }
}
