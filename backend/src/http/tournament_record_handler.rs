use crate::http::AppState;
use crate::models::SubmissionRequest;
use crate::service::SubmissionFailure;
use crate::store::TournamentStore;
use actix_web::{web, HttpResponse, Responder};
use tracing::info;

/// POST /api/tournament-records
/// Full form submission: player and archetypes are resolved or created on the way
pub async fn submit_tournament_record<S: TournamentStore>(
    state: web::Data<AppState<S>>,
    req: web::Json<SubmissionRequest>,
) -> Result<impl Responder, SubmissionFailure> {
    info!(date = ?req.date, "Received tournament record");

    let receipt = state.submissions.submit(req.into_inner()).await?;

    Ok(HttpResponse::Created().json(receipt))
}

pub fn configure_routes<S: TournamentStore + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/api/tournament-records",
        web::post().to(submit_tournament_record::<S>),
    );
}
