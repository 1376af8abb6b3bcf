use actix_web::{web, HttpResponse, Result};

use crate::api_error::ApiError;
use crate::http::AppState;
use crate::store::TournamentStore;

pub async fn health_check<S: TournamentStore>(
    state: web::Data<AppState<S>>,
) -> Result<HttpResponse, ApiError> {
    state.store.ping().await.map_err(|e| {
        tracing::error!(error = %e, "Database health check failed");
        ApiError::database_error("Database unavailable")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "database": "ok"
    })))
}

pub fn configure_routes<S: TournamentStore + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/health", web::get().to(health_check::<S>));
}
