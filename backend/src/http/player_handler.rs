use crate::api_error::ApiError;
use crate::http::AppState;
use crate::store::TournamentStore;
use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use tracing::info;

// =============================================================================
// FIND OR CREATE PLAYER
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRequest {
    /// Kept loose so a non-string name gets a field-specific message.
    #[serde(default)]
    pub player_name: Option<serde_json::Value>,
    #[serde(default)]
    pub password: Option<String>,
}

/// POST /api/players
/// Return the id of the named player, creating the player if needed
pub async fn find_or_create_player<S: TournamentStore>(
    state: web::Data<AppState<S>>,
    req: web::Json<PlayerRequest>,
) -> Result<impl Responder, ApiError> {
    let req = req.into_inner();
    state.gate.verify(req.password.as_deref())?;

    let name = match req.player_name.as_ref().and_then(|v| v.as_str()) {
        Some(name) if !name.trim().is_empty() => name,
        _ => {
            return Err(ApiError::bad_request(
                "Player name is required and must be a string",
            ))
        }
    };

    let player = state.players.resolve(name).await?;
    info!(player_id = %player.id, is_new = player.is_new, "Resolved player");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "player_id": player.id,
        "isNew": player.is_new,
    })))
}

// =============================================================================
// SEARCH / LIST PLAYERS
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct PlayerQuery {
    pub name: Option<String>,
}

/// GET /api/players?name=
/// Partial-name search; without `name` every player is listed
pub async fn search_players<S: TournamentStore>(
    state: web::Data<AppState<S>>,
    query: web::Query<PlayerQuery>,
) -> Result<impl Responder, ApiError> {
    let players = match query.name.as_deref() {
        Some(fragment) => state.players.search(fragment).await?,
        None => state.players.list().await?,
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "players": players,
    })))
}

// =============================================================================
// PLAYER HISTORY
// =============================================================================

/// GET /api/players/{id}
pub async fn get_player<S: TournamentStore>(
    state: web::Data<AppState<S>>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let history = state.players.history(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "player": history.player,
        "results": history.results,
    })))
}

pub fn configure_routes<S: TournamentStore + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/players")
            .route(web::post().to(find_or_create_player::<S>))
            .route(web::get().to(search_players::<S>)),
    )
    .route("/api/players/{id}", web::get().to(get_player::<S>));
}
