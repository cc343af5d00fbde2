mod storage_error;
mod tempo_error;

pub use storage_error::StorageError;
pub use tempo_error::{TempoError, TempoResult};
