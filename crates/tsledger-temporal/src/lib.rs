//! # tsledger-temporal
//!
//! Single-valued views over the bitemporal log: snapshot-as-of (latest
//! knowledge per effective time) and continuous-scenario (each version's
//! timeline until a newer version starts), plus bucketed aggregation of
//! either view.

pub mod engine;
pub mod query;

pub use engine::ReconstructionEngine;
