use serde::{Deserialize, Serialize};
use crate::models::domain::{CrisisMarker, Donation, Supply};

/// One proposed transfer, as returned to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSummary {
    pub ngo_id: String,
    pub ngo: String,
    pub crisis_area_id: String,
    pub crisis_area: String,
    pub supplies: Vec<Supply>,
    pub donation_id: String,
}

/// Response for the match endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    pub matches: Vec<MatchSummary>,
    pub donations: Vec<Donation>,
    pub total_ngos: usize,
    pub total_crisis_areas: usize,
}

/// Response for the markers endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkersResponse {
    pub markers: Vec<CrisisMarker>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
