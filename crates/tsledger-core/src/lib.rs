//! # tsledger-core
//!
//! Foundation crate for the tsledger bitemporal time-series store.
//! Defines the data model, value codec, declarative query criteria,
//! errors, config, tracing setup, and the storage/reconstruction traits.
//! Every other crate in the workspace depends on this.

pub mod codec;
pub mod config;
pub mod errors;
pub mod models;
pub mod tracing;
pub mod traits;

pub use config::TempoConfig;
pub use errors::{StorageError, TempoError, TempoResult};
pub use models::{
    AggFunc, Criteria, Granularity, SeriesIdentity, SeriesRecord, SeriesValue, TimeBucketMask,
    ValueKind,
};
