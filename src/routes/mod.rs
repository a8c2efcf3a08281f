// Route exports
pub mod heatmap;
pub mod matches;

use actix_web::{error, web, HttpRequest};
use validator::Validate;
use crate::error::ApiError;
use crate::models::{CrisisArea, HeatmapParams, MatchingWeights, Ngo};

/// Application state shared across all handlers
///
/// Engines are built per request, so nothing here is mutable.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub weights: MatchingWeights,
    pub heatmap: HeatmapParams,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure)
            .configure(heatmap::configure),
    );
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    ApiError::InvalidJson(err.to_string()).into()
}

/// Reject out-of-range records before they reach the engine
pub(crate) fn validate_snapshot(ngos: &[Ngo], crisis_areas: &[CrisisArea]) -> Result<(), ApiError> {
    for (index, ngo) in ngos.iter().enumerate() {
        ngo.validate()
            .map_err(|e| ApiError::validation(format!("ngo[{}] (id={})", index, ngo.id), e))?;
    }
    for (index, area) in crisis_areas.iter().enumerate() {
        area.validate()
            .map_err(|e| ApiError::validation(format!("crisis_area[{}] (id={})", index, area.id), e))?;
    }
    Ok(())
}
