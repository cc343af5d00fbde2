mod criteria;
mod reconstruction;
mod series_identity;
mod series_record;
mod time_bucket;

pub use criteria::{CompareOp, Criteria, Direction, Filter, FilterValue, OrderBy, Predicate};
pub use reconstruction::{ReconstructionMode, ReconstructionQuery, VersionCoverage};
pub use series_identity::SeriesIdentity;
pub use series_record::{SeriesRecord, SeriesValue, ValueKind};
pub use time_bucket::{AggFunc, BucketPoint, Granularity, TimeBucketMask};
