use super::coordinate::Coordinate;
use serde::{Deserialize, Serialize};

/// One reading from a location provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionFix {
    #[serde(flatten)]
    pub coordinate: Coordinate,
    /// Horizontal accuracy radius in meters, when the sensor reports one.
    #[serde(default, rename = "accuracy")]
    pub accuracy_meters: Option<f64>,
}

impl PositionFix {
    pub fn new(coordinate: Coordinate, accuracy_meters: Option<f64>) -> Self {
        Self {
            coordinate,
            accuracy_meters,
        }
    }
}
