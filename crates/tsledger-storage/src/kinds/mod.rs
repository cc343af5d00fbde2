//! Built-in record kinds.

mod series_identity;
mod series_log;
mod time_bucket_mask;

pub use series_identity::SeriesIdentityKind;
pub use series_log::SeriesLogKind;
pub use time_bucket_mask::TimeBucketMaskKind;
