use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
use crate::models::domain::{CrisisArea, Location, Ngo, SupplyCategory};

/// Snapshot to run the matching engine over
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRequest {
    #[serde(default)]
    pub ngos: Vec<Ngo>,
    #[serde(default)]
    pub crisis_areas: Vec<CrisisArea>,
}

/// Heatmap request for a south-west / north-east bounding box
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_bounds"))]
pub struct HeatmapRequest {
    #[validate(nested)]
    pub sw: Location,
    #[validate(nested)]
    pub ne: Location,
    #[serde(default)]
    pub category: Option<SupplyCategory>,
    #[serde(default)]
    pub crisis_areas: Vec<CrisisArea>,
}

fn validate_bounds(req: &HeatmapRequest) -> Result<(), ValidationError> {
    if req.sw.latitude > req.ne.latitude || req.sw.longitude > req.ne.longitude {
        return Err(ValidationError::new("inverted_bounds"));
    }
    Ok(())
}

/// Request for crisis area markers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkersRequest {
    #[serde(default)]
    pub crisis_areas: Vec<CrisisArea>,
}
