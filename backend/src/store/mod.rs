//! Persistence boundary.
//!
//! Every method is a single round trip. Nothing here spans a transaction, so
//! callers that look a row up and then insert it can race with each other.

pub mod postgres;
#[cfg(test)]
pub mod memory;

use chrono::NaiveDate;

use crate::models::{ArchetypeRole, DeckArchetype, NewResult, Player, ResultWithDecks};

pub use postgres::PgStore;

pub type StoreResult<T> = Result<T, sqlx::Error>;

#[allow(async_fn_in_trait)]
pub trait TournamentStore {
    async fn ping(&self) -> StoreResult<()>;

    /// Players whose stored name equals `name` ignoring case, ordered by id text.
    /// Ids are random UUIDs, so the order is stable but says nothing about age.
    /// Callers pass an already trimmed name.
    async fn find_players_by_name(&self, name: &str) -> StoreResult<Vec<Player>>;

    async fn insert_player(&self, player: &Player) -> StoreResult<Player>;

    /// Case-insensitive substring match, ordered by name.
    async fn search_players(&self, fragment: &str) -> StoreResult<Vec<Player>>;

    async fn list_players(&self) -> StoreResult<Vec<Player>>;

    async fn get_player(&self, id: &str) -> StoreResult<Option<Player>>;

    /// Exact-name lookup in the role's table. The lowest id wins when duplicates exist.
    async fn find_archetype(
        &self,
        role: ArchetypeRole,
        name: &str,
    ) -> StoreResult<Option<DeckArchetype>>;

    async fn insert_archetype(
        &self,
        role: ArchetypeRole,
        name: &str,
        image_url: &str,
    ) -> StoreResult<DeckArchetype>;

    /// Ids of results already recorded for this player and week.
    async fn find_results_for_week(
        &self,
        player_id: &str,
        week_start: NaiveDate,
    ) -> StoreResult<Vec<i32>>;

    async fn count_results_for_week(&self, week_start: NaiveDate) -> StoreResult<i64>;

    async fn insert_result(&self, result: &NewResult) -> StoreResult<i32>;

    /// A player's results joined with their archetypes, newest week first.
    async fn results_for_player(&self, player_id: &str) -> StoreResult<Vec<ResultWithDecks>>;
}
