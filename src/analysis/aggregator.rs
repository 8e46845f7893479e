//! Concurrent word and letter aggregation.
//!
//! This module provides the shared store that request handlers write
//! words into and read summary snapshots from.

use crate::analysis::frequency::FrequencyTable;
use crate::models::{Summary, TOP_N};
use parking_lot::RwLock;
use std::sync::Arc;

/// Anything that can record words and report a summary of them.
///
/// The HTTP layer only depends on this trait, so it can be exercised
/// against a recording fake.
pub trait WordStore: Send + Sync {
    /// Record one occurrence of `word`.
    fn write(&self, word: &str);

    /// Take a snapshot of the statistics recorded so far.
    fn read(&self) -> Summary;
}

/// Store handle shared between the listeners.
pub type SharedStore = Arc<dyn WordStore>;

/// Both tables live behind one lock so a reader never sees a word
/// without its letters.
#[derive(Debug, Default)]
struct Tables {
    words: FrequencyTable,
    letters: FrequencyTable,
}

/// In-memory aggregator guarded by a single reader-writer lock.
#[derive(Debug, Default)]
pub struct Aggregator {
    tables: RwLock<Tables>,
}

impl Aggregator {
    /// Create an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }
}

impl WordStore for Aggregator {
    fn write(&self, word: &str) {
        // Words are not discriminated by case.
        let word = word.to_lowercase();
        let mut buf = [0u8; 4];

        let mut tables = self.tables.write();
        tables.words.increment(&word);

        for letter in word.chars().filter(|c| c.is_alphabetic()) {
            tables.letters.increment(letter.encode_utf8(&mut buf));
        }
    }

    fn read(&self) -> Summary {
        let tables = self.tables.read();

        Summary {
            count: tables.words.len(),
            top_words: tables.words.top(TOP_N),
            top_letters: tables.letters.top(TOP_N),
        }
    }
}
