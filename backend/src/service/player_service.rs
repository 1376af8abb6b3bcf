use std::sync::Arc;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::api_error::ApiError;
use crate::models::{normalize_player_name, Player, PlayerHistory, ResolvedPlayer};
use crate::store::TournamentStore;

/// Finds players by display name and creates them on first sight.
pub struct PlayerService<S> {
    store: Arc<S>,
}

fn player_failure(err: sqlx::Error) -> ApiError {
    error!(error = %err, "Player lookup or insert failed");
    ApiError::database_error("Failed to process player")
}

impl<S: TournamentStore> PlayerService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Returns the id of the player whose name matches ignoring case and
    /// surrounding whitespace, creating the player if none exists.
    ///
    /// The lookup and the insert are separate round trips; two concurrent
    /// calls for a new name can both insert.
    pub async fn resolve(&self, raw_name: &str) -> Result<ResolvedPlayer, ApiError> {
        let name = normalize_player_name(raw_name);
        if name.is_empty() {
            return Err(ApiError::invalid_field(
                "playerName",
                "Player name cannot be empty",
            ));
        }

        let existing = self
            .store
            .find_players_by_name(name)
            .await
            .map_err(player_failure)?;

        if let Some(player) = existing.into_iter().next() {
            debug!(player_id = %player.id, "Matched existing player");
            return Ok(ResolvedPlayer {
                id: player.id,
                is_new: false,
            });
        }

        let player = Player {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
        };
        let created = self
            .store
            .insert_player(&player)
            .await
            .map_err(player_failure)?;

        info!(player_id = %created.id, name = %created.name, "Created player");

        Ok(ResolvedPlayer {
            id: created.id,
            is_new: true,
        })
    }

    pub async fn search(&self, fragment: &str) -> Result<Vec<Player>, ApiError> {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            return Err(ApiError::bad_request("Player name parameter is required"));
        }

        self.store.search_players(fragment).await.map_err(|e| {
            error!(error = %e, "Player search failed");
            ApiError::database_error("Failed to search for players")
        })
    }

    pub async fn list(&self) -> Result<Vec<Player>, ApiError> {
        Ok(self.store.list_players().await?)
    }

    pub async fn history(&self, player_id: &str) -> Result<PlayerHistory, ApiError> {
        let player = self
            .store
            .get_player(player_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Player not found"))?;

        let results = self.store.results_for_player(&player.id).await?;

        Ok(PlayerHistory { player, results })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::{MemoryStore, StoreOp};

    fn service() -> (Arc<MemoryStore>, PlayerService<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), PlayerService::new(store))
    }

    #[tokio::test]
    async fn test_resolve_is_idempotent_for_new_name() {
        let (store, players) = service();

        let first = players.resolve("Gary Oak").await.unwrap();
        let second = players.resolve("Gary Oak").await.unwrap();

        assert!(first.is_new);
        assert!(!second.is_new);
        assert_eq!(first.id, second.id);
        assert_eq!(store.players().len(), 1);
    }

    #[tokio::test]
    async fn test_resolve_ignores_case_and_whitespace() {
        let (store, players) = service();
        let ash = players.resolve("Ash").await.unwrap();

        let again = players.resolve("Ash ").await.unwrap();
        let shouted = players.resolve("  ASH").await.unwrap();

        assert_eq!(again.id, ash.id);
        assert_eq!(shouted.id, ash.id);
        assert_eq!(store.players().len(), 1);
        assert_eq!(store.players()[0].name, "Ash");
    }

    #[tokio::test]
    async fn test_duplicate_rows_resolve_to_smallest_id() {
        let (store, players) = service();
        for (id, name) in [("f0c1", "Red"), ("0a9e", "red")] {
            store
                .insert_player(&Player {
                    id: id.to_string(),
                    name: name.to_string(),
                })
                .await
                .unwrap();
        }

        let resolved = players.resolve(" RED ").await.unwrap();
        assert_eq!(resolved.id, "0a9e");
        assert!(!resolved.is_new);
    }

    #[tokio::test]
    async fn test_resolve_rejects_blank_name() {
        let (_, players) = service();
        let err = players.resolve("   ").await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_store_failure_is_generic() {
        let (store, players) = service();
        store.fail_on(StoreOp::InsertPlayer);

        let err = players.resolve("Brock").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to process player");
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let (_, players) = service();
        for name in ["Ash", "Ashley", "Misty", "Dash"] {
            players.resolve(name).await.unwrap();
        }

        let found: Vec<String> = players
            .search(" ash ")
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(found, vec!["Ash", "Ashley", "Dash"]);

        assert!(matches!(
            players.search("  ").await,
            Err(ApiError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_history_for_unknown_player() {
        let (_, players) = service();
        let err = players.history("missing").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
