//! # Formats Module
//!
//! Binary snapshot encoding for the entity store.
//! File I/O lives in the app layer; everything here is a pure transformation.

mod snapshot;

pub use snapshot::*;
