use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One record of the uploaded table after column resolution.
///
/// Lives only for the duration of a single analysis request. Numeric fields
/// are `None` when the cell was empty or not parseable as a number.
#[derive(Debug, Clone, PartialEq)]
pub struct EquipmentRow {
    pub equipment_name: String,
    pub equipment_type: String,
    pub flowrate: Option<f64>,
    pub pressure: Option<f64>,
    pub temperature: Option<f64>,
}

/// Aggregate statistics for one upload, the JSON body of a successful
/// `POST /api/analyze/` response.
///
/// Averages are `None` (serialized as `null`) when the column held no
/// numeric values at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub total_equipment: u64,
    pub average_flowrate: Option<f64>,
    pub average_pressure: Option<f64>,
    pub average_temperature: Option<f64>,
    pub equipment_by_type: BTreeMap<String, u64>,
}

impl AnalysisResult {
    /// Sum of the per-type counts; equals `total_equipment` for any result
    /// produced from a successful parse.
    pub fn type_count_sum(&self) -> u64 {
        self.equipment_by_type.values().sum()
    }
}

/// Error envelope used for every non-success response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
