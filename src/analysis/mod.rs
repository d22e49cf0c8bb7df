//! Analysis modules.
//!
//! Pure computations over fetched deal data.

pub mod aggregator;

pub use aggregator::*;
