use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::result::ResultWithDecks;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct Player {
    pub id: String,
    pub name: String,
}

/// Outcome of a find-or-create on the player table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPlayer {
    pub id: String,
    pub is_new: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerHistory {
    pub player: Player,
    pub results: Vec<ResultWithDecks>,
}

/// Display names are stored and compared without surrounding whitespace.
pub fn normalize_player_name(raw: &str) -> &str {
    raw.trim()
}
