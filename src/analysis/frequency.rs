//! Frequency tables and top-N ranking.

use std::cmp::Ordering;
use std::collections::HashMap;

/// Occurrence counts keyed by normalized token.
///
/// Entries are only ever created or incremented; nothing is removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: HashMap<String, u64>,
}

impl FrequencyTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one occurrence of `key`, inserting it with a count of 1 if absent.
    pub fn increment(&mut self, key: &str) {
        // Avoid allocating a key for tokens that are already present.
        if let Some(count) = self.counts.get_mut(key) {
            *count += 1;
        } else {
            self.counts.insert(key.to_string(), 1);
        }
    }

    /// Occurrences recorded for `key`.
    pub fn count(&self, key: &str) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns true if nothing has been counted.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The `n` most frequent keys, highest count first.
    pub fn top(&self, n: usize) -> Vec<String> {
        top_n(&self.counts, n)
    }
}

/// Find the `n` highest-counted keys in a map.
///
/// Returns `min(n, counts.len())` keys ordered by descending count. Equal
/// counts are ordered by key, ascending, so the result is deterministic.
/// There is no positivity threshold: zero or negative counts are returned
/// whenever nothing higher is left.
pub fn top_n<C: Ord>(counts: &HashMap<String, C>, n: usize) -> Vec<String> {
    let n = n.min(counts.len());
    if n == 0 {
        return Vec::new();
    }

    let mut entries: Vec<(&String, &C)> = counts.iter().collect();

    // Partition so the first n entries are the winners, then order only those.
    if n < entries.len() {
        entries.select_nth_unstable_by(n - 1, by_rank);
        entries.truncate(n);
    }
    entries.sort_unstable_by(by_rank);

    entries.into_iter().map(|(key, _)| key.clone()).collect()
}

/// Ranking order: higher count first, then lexical key order.
fn by_rank<C: Ord>(a: &(&String, &C), b: &(&String, &C)) -> Ordering {
    b.1.cmp(a.1).then_with(|| a.0.cmp(b.0))
}
