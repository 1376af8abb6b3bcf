use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::api_error::ApiError;
use crate::auth::SharedSecret;
use crate::models::{CreateResultRequest, NewResult};
use crate::store::TournamentStore;

/// Records weekly results and enforces the per-week limits.
///
/// Both limits are checked with a read before the insert, so concurrent
/// writers can slip past either one.
pub struct ResultService<S> {
    store: Arc<S>,
    gate: SharedSecret,
    weekly_cap: i64,
}

impl<S: TournamentStore> ResultService<S> {
    pub fn new(store: Arc<S>, gate: SharedSecret, weekly_cap: i64) -> Self {
        Self {
            store,
            gate,
            weekly_cap,
        }
    }

    /// `POST /api/results`: insert a result whose player and archetypes are already known.
    pub async fn create(&self, request: CreateResultRequest) -> Result<i32, ApiError> {
        self.gate.verify(request.password.as_deref())?;

        let new_result = request.validate_form(Utc::now().date_naive())?;

        self.ensure_can_record(&new_result.player_id, new_result.week_start)
            .await?;

        self.insert(&new_result).await
    }

    /// Rejects a second result for the same player and week, then rejects
    /// anything past the weekly cap.
    pub async fn ensure_can_record(
        &self,
        player_id: &str,
        week_start: NaiveDate,
    ) -> Result<(), ApiError> {
        let existing = self
            .store
            .find_results_for_week(player_id, week_start)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to check for existing result");
                ApiError::database_error("Failed to check for existing result")
            })?;

        if !existing.is_empty() {
            warn!(
                player_id = player_id,
                week_start = %week_start,
                "Duplicate result rejected"
            );
            return Err(ApiError::conflict(
                "A result for this player and week already exists.",
            ));
        }

        let count = self
            .store
            .count_results_for_week(week_start)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to count results for week");
                ApiError::database_error("Failed to check results count for this date")
            })?;

        if count >= self.weekly_cap {
            warn!(
                week_start = %week_start,
                count = count,
                cap = self.weekly_cap,
                "Weekly result cap reached"
            );
            return Err(ApiError::conflict(format!(
                "The maximum number of results ({}) for this date has been reached.",
                self.weekly_cap
            )));
        }

        Ok(())
    }

    pub async fn insert(&self, new_result: &NewResult) -> Result<i32, ApiError> {
        let result_id = self.store.insert_result(new_result).await.map_err(|e| {
            error!(error = %e, "Failed to save tournament result");
            ApiError::database_error("Failed to save tournament result")
        })?;

        info!(
            result_id = result_id,
            player_id = %new_result.player_id,
            week_start = %new_result.week_start,
            "Recorded tournament result"
        );

        Ok(result_id)
    }
}
