//! Analysis modules.
//!
//! Frequency counting, ranking, and the concurrent store built on them.

pub mod aggregator;
pub mod frequency;

pub use aggregator::{Aggregator, SharedStore, WordStore};
