//! wordstats - word and letter frequency service
//!
//! The [`analysis::Aggregator`] keeps running word and letter counts behind
//! one reader-writer lock; the [`server`] module exposes it over two HTTP
//! listeners.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod server;
