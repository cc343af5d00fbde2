use serde::{Deserialize, Serialize};

use super::ValueKind;

/// Descriptive registry row for a series. Optional: facts can be appended
/// and reconstructed without one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesIdentity {
    pub series_id: String,
    pub display_name: Option<String>,
    pub unit: Option<String>,
    pub value_kind: ValueKind,
    pub description: Option<String>,
}

impl SeriesIdentity {
    pub fn new(series_id: impl Into<String>, value_kind: ValueKind) -> Self {
        Self {
            series_id: series_id.into(),
            display_name: None,
            unit: None,
            value_kind,
            description: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
