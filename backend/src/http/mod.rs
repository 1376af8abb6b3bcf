pub mod catalog_handler;
pub mod health;
pub mod player_handler;
pub mod result_handler;
pub mod tournament_record_handler;

use actix_web::{error, web};
use std::sync::Arc;
use tracing::warn;

use crate::api_error::ApiError;
use crate::auth::SharedSecret;
use crate::config::Config;
use crate::service::{PlayerService, PokemonService, ResultService, SubmissionService};
use crate::store::TournamentStore;

/// Services shared by every worker, built once in `main`.
pub struct AppState<S> {
    pub store: Arc<S>,
    pub gate: SharedSecret,
    pub players: PlayerService<S>,
    pub results: ResultService<S>,
    pub submissions: SubmissionService<S>,
    pub pokemon: PokemonService,
}

impl<S: TournamentStore> AppState<S> {
    pub fn new(store: Arc<S>, config: &Config, pokemon: PokemonService) -> Self {
        let gate = SharedSecret::new(config.auth.submission_password.clone());
        let cap = config.limits.weekly_result_cap;

        Self {
            players: PlayerService::new(store.clone()),
            results: ResultService::new(store.clone(), gate.clone(), cap),
            submissions: SubmissionService::new(
                store.clone(),
                gate.clone(),
                config.pokemon_api.sprites_base.clone(),
                cap,
            ),
            pokemon,
            gate,
            store,
        }
    }
}

/// Malformed or mistyped bodies become a 400 with the standard error payload.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        warn!(error = %err, "Rejected request body");
        error::Error::from(ApiError::bad_request("Invalid JSON in request body"))
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        warn!(error = %err, "Rejected query string");
        error::Error::from(ApiError::bad_request("Invalid query parameters"))
    })
}

/// Registers every route under `/api`.
pub fn configure_routes<S: TournamentStore + 'static>(cfg: &mut web::ServiceConfig) {
    health::configure_routes::<S>(cfg);
    player_handler::configure_routes::<S>(cfg);
    result_handler::configure_routes::<S>(cfg);
    tournament_record_handler::configure_routes::<S>(cfg);
    catalog_handler::configure_routes::<S>(cfg);
}
