//! Analysis modules.
//!
//! Metrics are computed by the aggregator over an already cleaned table.

pub mod aggregator;

pub use aggregator::*;
