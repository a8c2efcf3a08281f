use actix_web::{web, HttpResponse};
use validator::Validate;
use crate::core::{markers, HeatmapGenerator};
use crate::error::ApiError;
use crate::models::{HeatmapRequest, MarkersRequest, MarkersResponse};
use crate::routes::{validate_snapshot, AppState};

/// Configure heatmap and marker routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/heatmap", web::post().to(generate_heatmap))
        .route("/crisis-areas/markers", web::post().to(crisis_markers));
}

/// Heatmap endpoint
///
/// POST /api/v1/heatmap
///
/// Request body:
/// ```json
/// {
///   "sw": { "latitude": 0.0, "longitude": 0.0 },
///   "ne": { "latitude": 1.0, "longitude": 1.0 },
///   "category": "water",
///   "crisis_areas": [ ... ]
/// }
/// ```
async fn generate_heatmap(
    state: web::Data<AppState>,
    req: web::Json<HeatmapRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();
    req.validate().map_err(|e| ApiError::validation("bounds", e))?;
    validate_snapshot(&[], &req.crisis_areas)?;

    let generator = HeatmapGenerator::new(state.heatmap);
    let data = tokio::task::spawn_blocking(move || {
        generator.generate(&req.crisis_areas, req.sw, req.ne, req.category)
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))?;

    tracing::info!(
        "Heatmap generated: {} points, {} markers, category={:?}",
        data.points.len(),
        data.markers.len(),
        data.category
    );

    Ok(HttpResponse::Ok().json(data))
}

/// Crisis area markers endpoint
///
/// POST /api/v1/crisis-areas/markers
async fn crisis_markers(req: web::Json<MarkersRequest>) -> Result<HttpResponse, ApiError> {
    validate_snapshot(&[], &req.crisis_areas)?;

    Ok(HttpResponse::Ok().json(MarkersResponse {
        markers: markers(&req.crisis_areas),
    }))
}
