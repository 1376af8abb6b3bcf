//! In-memory store backing the service and handler tests.

use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use crate::models::{
    ArchetypeRole, ArchetypeSummary, DeckArchetype, NewResult, Player, ResultWithDecks,
    TournamentResult,
};
use crate::store::{StoreResult, TournamentStore};

/// Store calls that can be made to fail on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    FindPlayer,
    InsertPlayer,
    FindArchetype,
    InsertArchetype,
    FindResults,
    CountResults,
    InsertResult,
}

#[derive(Default)]
struct Tables {
    players: Vec<Player>,
    archetypes: HashMap<ArchetypeRole, Vec<DeckArchetype>>,
    results: Vec<TournamentResult>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    failing: RwLock<HashSet<StoreOp>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(&self, op: StoreOp) {
        self.failing.write().unwrap().insert(op);
    }

    pub fn players(&self) -> Vec<Player> {
        self.tables.read().unwrap().players.clone()
    }

    pub fn archetypes(&self, role: ArchetypeRole) -> Vec<DeckArchetype> {
        self.tables
            .read()
            .unwrap()
            .archetypes
            .get(&role)
            .cloned()
            .unwrap_or_default()
    }

    pub fn results(&self) -> Vec<TournamentResult> {
        self.tables.read().unwrap().results.clone()
    }

    fn check(&self, op: StoreOp) -> StoreResult<()> {
        if self.failing.read().unwrap().contains(&op) {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(())
    }
}

fn same_name(stored: &str, name: &str) -> bool {
    stored.to_lowercase() == name.to_lowercase()
}

impl TournamentStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn find_players_by_name(&self, name: &str) -> StoreResult<Vec<Player>> {
        self.check(StoreOp::FindPlayer)?;
        let mut found: Vec<Player> = self
            .tables
            .read()
            .unwrap()
            .players
            .iter()
            .filter(|p| same_name(&p.name, name))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(found)
    }

    async fn insert_player(&self, player: &Player) -> StoreResult<Player> {
        self.check(StoreOp::InsertPlayer)?;
        self.tables.write().unwrap().players.push(player.clone());
        Ok(player.clone())
    }

    async fn search_players(&self, fragment: &str) -> StoreResult<Vec<Player>> {
        self.check(StoreOp::FindPlayer)?;
        let needle = fragment.to_lowercase();
        let mut found: Vec<Player> = self
            .tables
            .read()
            .unwrap()
            .players
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(found)
    }

    async fn list_players(&self) -> StoreResult<Vec<Player>> {
        self.search_players("").await
    }

    async fn get_player(&self, id: &str) -> StoreResult<Option<Player>> {
        self.check(StoreOp::FindPlayer)?;
        let tables = self.tables.read().unwrap();
        Ok(tables.players.iter().find(|p| p.id == id).cloned())
    }

    async fn find_archetype(
        &self,
        role: ArchetypeRole,
        name: &str,
    ) -> StoreResult<Option<DeckArchetype>> {
        self.check(StoreOp::FindArchetype)?;
        let tables = self.tables.read().unwrap();
        Ok(tables
            .archetypes
            .get(&role)
            .and_then(|rows| rows.iter().find(|a| a.name == name))
            .cloned())
    }

    async fn insert_archetype(
        &self,
        role: ArchetypeRole,
        name: &str,
        image_url: &str,
    ) -> StoreResult<DeckArchetype> {
        self.check(StoreOp::InsertArchetype)?;
        let mut tables = self.tables.write().unwrap();
        let rows = tables.archetypes.entry(role).or_default();
        let archetype = DeckArchetype {
            id: rows.len() as i32 + 1,
            name: name.to_string(),
            image_url: image_url.to_string(),
        };
        rows.push(archetype.clone());
        Ok(archetype)
    }

    async fn find_results_for_week(
        &self,
        player_id: &str,
        week_start: NaiveDate,
    ) -> StoreResult<Vec<i32>> {
        self.check(StoreOp::FindResults)?;
        let tables = self.tables.read().unwrap();
        Ok(tables
            .results
            .iter()
            .filter(|r| r.player_id == player_id && r.week_start == week_start)
            .map(|r| r.id)
            .collect())
    }

    async fn count_results_for_week(&self, week_start: NaiveDate) -> StoreResult<i64> {
        self.check(StoreOp::CountResults)?;
        let tables = self.tables.read().unwrap();
        Ok(tables
            .results
            .iter()
            .filter(|r| r.week_start == week_start)
            .count() as i64)
    }

    async fn insert_result(&self, result: &NewResult) -> StoreResult<i32> {
        self.check(StoreOp::InsertResult)?;
        let mut tables = self.tables.write().unwrap();
        let id = tables.results.len() as i32 + 1;
        tables.results.push(TournamentResult {
            id,
            week_start: result.week_start,
            wins: result.wins,
            losses: result.losses,
            ties: result.ties,
            player_id: result.player_id.clone(),
            deck_archetype_1_id: result.deck_archetype_1_id,
            deck_archetype_2_id: result.deck_archetype_2_id,
        });
        Ok(id)
    }

    async fn results_for_player(&self, player_id: &str) -> StoreResult<Vec<ResultWithDecks>> {
        let tables = self.tables.read().unwrap();
        let lookup = |role: ArchetypeRole, id: Option<i32>| -> Option<ArchetypeSummary> {
            let id = id?;
            tables
                .archetypes
                .get(&role)?
                .iter()
                .find(|a| a.id == id)
                .cloned()
                .map(ArchetypeSummary::from)
        };

        let mut history: Vec<ResultWithDecks> = tables
            .results
            .iter()
            .filter(|r| r.player_id == player_id)
            .map(|r| ResultWithDecks {
                id: r.id,
                week_start: r.week_start,
                wins: r.wins,
                losses: r.losses,
                ties: r.ties,
                deck_archetype_1: lookup(ArchetypeRole::Primary, Some(r.deck_archetype_1_id)),
                deck_archetype_2: lookup(ArchetypeRole::Secondary, r.deck_archetype_2_id),
            })
            .collect();
        history.sort_by(|a, b| b.week_start.cmp(&a.week_start).then(b.id.cmp(&a.id)));
        Ok(history)
    }
}
