use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::api_error::ApiError;
use crate::auth::SharedSecret;
use crate::models::{ArchetypeRole, NewResult, SubmissionRequest};
use crate::service::archetype_service::ArchetypeService;
use crate::service::player_service::PlayerService;
use crate::service::result_service::ResultService;
use crate::store::TournamentStore;

/// Steps of a submission, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStage {
    Authorize,
    Validate,
    ResolvePlayer,
    CheckLimits,
    ResolveArchetypes,
    InsertResult,
}

impl std::fmt::Display for SubmissionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionStage::Authorize => write!(f, "authorize"),
            SubmissionStage::Validate => write!(f, "validate"),
            SubmissionStage::ResolvePlayer => write!(f, "resolve_player"),
            SubmissionStage::CheckLimits => write!(f, "check_limits"),
            SubmissionStage::ResolveArchetypes => write!(f, "resolve_archetypes"),
            SubmissionStage::InsertResult => write!(f, "insert_result"),
        }
    }
}

/// Identifiers settled before a submission stopped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedIds {
    pub player_id: Option<String>,
    pub deck_archetype_1_id: Option<i32>,
    pub deck_archetype_2_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReceipt {
    pub success: bool,
    pub player_id: String,
    pub result_id: i32,
}

/// The first error a submission hit, plus whatever rows it had already
/// resolved or created. Nothing is rolled back.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct SubmissionFailure {
    pub stage: SubmissionStage,
    pub error: ApiError,
    pub resolved: ResolvedIds,
}

impl SubmissionFailure {
    fn at(stage: SubmissionStage, error: ApiError, resolved: &ResolvedIds) -> Self {
        warn!(
            stage = %stage,
            error = %error,
            player_id = ?resolved.player_id,
            "Tournament submission stopped"
        );
        Self {
            stage,
            error,
            resolved: resolved.clone(),
        }
    }
}

impl ResponseError for SubmissionFailure {
    fn status_code(&self) -> StatusCode {
        self.error.status_code()
    }

    fn error_response(&self) -> HttpResponse {
        let mut body = self.error.body();
        body.player_id = self.resolved.player_id.clone();
        body.deck_archetype_1_id = self.resolved.deck_archetype_1_id;
        body.deck_archetype_2_id = self.resolved.deck_archetype_2_id;
        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Runs a full tournament-record submission:
/// authorize, validate, resolve the player, check the weekly limits,
/// resolve archetypes, insert the result.
pub struct SubmissionService<S> {
    gate: SharedSecret,
    players: PlayerService<S>,
    archetypes: ArchetypeService<S>,
    results: ResultService<S>,
}

impl<S: TournamentStore> SubmissionService<S> {
    pub fn new(
        store: Arc<S>,
        gate: SharedSecret,
        sprites_base: impl Into<String>,
        weekly_cap: i64,
    ) -> Self {
        Self {
            players: PlayerService::new(store.clone()),
            archetypes: ArchetypeService::new(store.clone(), sprites_base),
            results: ResultService::new(store, gate.clone(), weekly_cap),
            gate,
        }
    }

    pub async fn submit(
        &self,
        request: SubmissionRequest,
    ) -> Result<SubmissionReceipt, SubmissionFailure> {
        let mut resolved = ResolvedIds::default();

        self.gate
            .verify(request.password.as_deref())
            .map_err(|e| SubmissionFailure::at(SubmissionStage::Authorize, e, &resolved))?;

        let form = request
            .validate_form(Utc::now().date_naive())
            .map_err(|e| SubmissionFailure::at(SubmissionStage::Validate, e, &resolved))?;

        let player = self
            .players
            .resolve(&form.player_name)
            .await
            .map_err(|e| SubmissionFailure::at(SubmissionStage::ResolvePlayer, e, &resolved))?;
        resolved.player_id = Some(player.id.clone());

        self.results
            .ensure_can_record(&player.id, form.week_start)
            .await
            .map_err(|e| SubmissionFailure::at(SubmissionStage::CheckLimits, e, &resolved))?;

        let (primary, secondary) = self
            .archetypes
            .seeds_for(&form.deck)
            .map_err(|e| SubmissionFailure::at(SubmissionStage::ResolveArchetypes, e, &resolved))?;

        let primary_id = self
            .archetypes
            .resolve(ArchetypeRole::Primary, &primary)
            .await
            .map_err(|e| SubmissionFailure::at(SubmissionStage::ResolveArchetypes, e, &resolved))?;
        resolved.deck_archetype_1_id = Some(primary_id);

        let secondary_id = match secondary {
            Some(seed) => {
                let id = self
                    .archetypes
                    .resolve(ArchetypeRole::Secondary, &seed)
                    .await
                    .map_err(|e| {
                        SubmissionFailure::at(SubmissionStage::ResolveArchetypes, e, &resolved)
                    })?;
                resolved.deck_archetype_2_id = Some(id);
                Some(id)
            }
            None => None,
        };

        let new_result = NewResult {
            week_start: form.week_start,
            wins: form.wins,
            losses: form.losses,
            ties: form.ties,
            player_id: player.id.clone(),
            deck_archetype_1_id: primary_id,
            deck_archetype_2_id: secondary_id,
        };

        let result_id = self
            .results
            .insert(&new_result)
            .await
            .map_err(|e| SubmissionFailure::at(SubmissionStage::InsertResult, e, &resolved))?;

        info!(
            player_id = %player.id,
            new_player = player.is_new,
            result_id = result_id,
            "Tournament record submitted"
        );

        Ok(SubmissionReceipt {
            success: true,
            player_id: player.id,
            result_id,
        })
    }
}
