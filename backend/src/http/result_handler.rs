use crate::api_error::ApiError;
use crate::http::AppState;
use crate::models::CreateResultRequest;
use crate::store::TournamentStore;
use actix_web::{web, HttpResponse, Responder};
use tracing::info;

/// POST /api/results
/// Record a result from already-resolved player and archetype ids
pub async fn create_result<S: TournamentStore>(
    state: web::Data<AppState<S>>,
    req: web::Json<CreateResultRequest>,
) -> Result<impl Responder, ApiError> {
    info!(
        player_id = ?req.player_id,
        week_start = ?req.week_start,
        "Received result"
    );

    let result_id = state.results.create(req.into_inner()).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "result_id": result_id,
    })))
}

pub fn configure_routes<S: TournamentStore + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/results", web::post().to(create_result::<S>));
}
