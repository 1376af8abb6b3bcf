use crate::api_error::ApiError;
use crate::http::AppState;
use crate::models::META_DECKS;
use crate::store::TournamentStore;
use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;

/// GET /api/meta-decks
pub async fn list_meta_decks() -> Result<impl Responder, ApiError> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "decks": META_DECKS,
    })))
}

#[derive(Debug, Deserialize)]
pub struct PokemonSearchQuery {
    pub q: Option<String>,
}

/// GET /api/pokemon/search?q=
/// Best effort: upstream trouble yields an empty list, never an error
pub async fn search_pokemon<S: TournamentStore>(
    state: web::Data<AppState<S>>,
    query: web::Query<PokemonSearchQuery>,
) -> Result<impl Responder, ApiError> {
    let pokemon = state
        .pokemon
        .search(query.q.as_deref().unwrap_or(""))
        .await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "pokemon": pokemon,
    })))
}

pub fn configure_routes<S: TournamentStore + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/meta-decks", web::get().to(list_meta_decks))
        .route("/api/pokemon/search", web::get().to(search_pokemon::<S>));
}
