//! # Lifecycle Module
//!
//! Enrollment status machine and store-wide metrics.

mod metrics;
mod status;

pub use metrics::*;
