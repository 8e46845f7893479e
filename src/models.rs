//! Data models for the word statistics service.
//!
//! This module contains the snapshot type handed out by the read path
//! and serialized by the stats endpoint.

use serde::{Deserialize, Serialize};

/// Number of entries reported in each ranking.
pub const TOP_N: usize = 5;

/// A point-in-time snapshot of the aggregated statistics.
///
/// The snapshot owns its data, so later writes never change a summary
/// that has already been returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of unique words seen.
    pub count: usize,
    /// Most frequent words, highest count first.
    pub top_words: Vec<String>,
    /// Most frequent letters across all words, highest count first.
    pub top_letters: Vec<String>,
}
