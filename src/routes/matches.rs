use actix_web::{web, HttpResponse, Responder};
use crate::core::{synthesize_donations, MatchingEngine};
use crate::error::ApiError;
use crate::models::{HealthResponse, MatchRequest, MatchResponse, MatchSummary, MatchingWeights};
use crate::routes::{validate_snapshot, AppState};

/// Configure match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/match", web::post().to(find_matches));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Find matches endpoint
///
/// POST /api/v1/match
///
/// Request body:
/// ```json
/// {
///   "ngos": [ ... ],
///   "crisis_areas": [ ... ]
/// }
/// ```
///
/// Donations in the response are pending and must be persisted by the caller.
async fn find_matches(
    state: web::Data<AppState>,
    req: web::Json<MatchRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();
    if let Err(e) = validate_snapshot(&req.ngos, &req.crisis_areas) {
        tracing::info!("Rejected match request: {}", e);
        return Err(e);
    }

    tracing::info!(
        "Matching {} NGOs against {} crisis areas",
        req.ngos.len(),
        req.crisis_areas.len()
    );

    let weights = state.weights;
    let response = tokio::task::spawn_blocking(move || run_matching(weights, &req))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    tracing::info!(
        "Returning {} matches ({} NGOs, {} crisis areas)",
        response.matches.len(),
        response.total_ngos,
        response.total_crisis_areas
    );

    Ok(HttpResponse::Ok().json(response))
}

/// Run one matching pass on a fresh engine and build the response
pub fn run_matching(weights: MatchingWeights, req: &MatchRequest) -> MatchResponse {
    let mut engine = MatchingEngine::new(weights);
    let matches = engine.find_optimal_matches(&req.ngos, &req.crisis_areas);
    let donations = synthesize_donations(&matches);

    let summaries = matches
        .iter()
        .zip(&donations)
        .map(|(m, donation)| MatchSummary {
            ngo_id: m.ngo.id.clone(),
            ngo: m.ngo.name.clone(),
            crisis_area_id: m.crisis_area.id.clone(),
            crisis_area: m.crisis_area.name.clone(),
            supplies: m.supplies.clone(),
            donation_id: donation.id.clone(),
        })
        .collect();

    MatchResponse {
        matches: summaries,
        donations,
        total_ngos: req.ngos.len(),
        total_crisis_areas: req.crisis_areas.len(),
    }
}
