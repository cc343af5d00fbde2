pub mod criteria_sql;
pub mod lookup_ops;
pub mod series_ops;
