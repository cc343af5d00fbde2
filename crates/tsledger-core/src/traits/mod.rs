mod series_log;
mod series_reconstruction;

pub use series_log::ISeriesLog;
pub use series_reconstruction::ISeriesReconstruction;
