use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use validator::Validate;

use crate::api_error::{ApiError, FieldError};
use crate::models::archetype::ArchetypeSummary;
use crate::models::validation::{
    collect_rule_errors, integer_field, parse_week_start, string_field, GameCounts,
};

/// A stored weekly result row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct TournamentResult {
    pub id: i32,
    pub week_start: NaiveDate,
    pub wins: i32,
    pub losses: i32,
    pub ties: i32,
    pub player_id: String,
    pub deck_archetype_1_id: i32,
    pub deck_archetype_2_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewResult {
    pub week_start: NaiveDate,
    pub wins: i32,
    pub losses: i32,
    pub ties: i32,
    pub player_id: String,
    pub deck_archetype_1_id: i32,
    pub deck_archetype_2_id: Option<i32>,
}

/// A result joined with the archetypes it references, newest first in a player's history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResultWithDecks {
    pub id: i32,
    pub week_start: NaiveDate,
    pub wins: i32,
    pub losses: i32,
    pub ties: i32,
    pub deck_archetype_1: Option<ArchetypeSummary>,
    pub deck_archetype_2: Option<ArchetypeSummary>,
}

/// Body of `POST /api/results`: a result built from already-resolved ids.
/// Fields stay loosely typed so a wrong JSON type is reported per field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateResultRequest {
    #[serde(default)]
    pub week_start: Option<Value>,
    #[serde(default)]
    pub wins: Option<Value>,
    #[serde(default)]
    pub losses: Option<Value>,
    #[serde(default)]
    pub ties: Option<Value>,
    #[serde(default)]
    pub player_id: Option<Value>,
    #[serde(default)]
    pub deck_archetype_1_id: Option<Value>,
    #[serde(default)]
    pub deck_archetype_2_id: Option<Value>,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
}

/// The id references of a raw result after their JSON type check.
#[derive(Debug, Validate)]
struct ResultRefs {
    #[validate(
        required(message = "Player ID is required"),
        length(min = 1, message = "Player ID is required")
    )]
    player_id: Option<String>,
    #[validate(
        required(message = "Primary deck archetype is required"),
        range(min = 1, message = "Primary deck archetype ID must be a positive number")
    )]
    deck_archetype_1_id: Option<i32>,
    #[validate(range(
        min = 1,
        message = "Secondary deck archetype ID must be a positive number or null"
    ))]
    deck_archetype_2_id: Option<i32>,
}

impl CreateResultRequest {
    pub fn validate_form(&self, today: NaiveDate) -> Result<NewResult, ApiError> {
        let mut details = Vec::new();

        let counts = match GameCounts::check(&self.wins, &self.losses, &self.ties) {
            Ok(counts) => Some(counts),
            Err(errors) => {
                details.extend(errors);
                None
            }
        };

        let mut mistyped = Vec::new();
        let refs = ResultRefs {
            player_id: string_field(&self.player_id, "player_id", "Player ID must be a string")
                .unwrap_or_else(|e| {
                    mistyped.push(e);
                    None
                })
                .map(|id| id.trim().to_string()),
            deck_archetype_1_id: integer_field(
                &self.deck_archetype_1_id,
                "deck_archetype_1_id",
                "Primary deck archetype ID must be a positive number",
            )
            .unwrap_or_else(|e| {
                mistyped.push(e);
                None
            }),
            deck_archetype_2_id: integer_field(
                &self.deck_archetype_2_id,
                "deck_archetype_2_id",
                "Secondary deck archetype ID must be a positive number or null",
            )
            .unwrap_or_else(|e| {
                mistyped.push(e);
                None
            }),
        };
        collect_rule_errors(&refs, &mut mistyped);
        details.extend(mistyped);

        let week_start = string_field(
            &self.week_start,
            "week_start",
            "Date must be in YYYY-MM-DD format",
        )
        .and_then(|raw| {
            parse_week_start(raw.as_deref().unwrap_or(""), today)
                .map_err(|message| FieldError::new("week_start", message))
        });
        let week_start = match week_start {
            Ok(date) => Some(date),
            Err(e) => {
                details.push(e);
                None
            }
        };

        match (week_start, counts, refs) {
            (
                Some(week_start),
                Some((wins, losses, ties)),
                ResultRefs {
                    player_id: Some(player_id),
                    deck_archetype_1_id: Some(deck_archetype_1_id),
                    deck_archetype_2_id,
                },
            ) if details.is_empty() => Ok(NewResult {
                week_start,
                wins,
                losses,
                ties,
                player_id,
                deck_archetype_1_id,
                deck_archetype_2_id,
            }),
            _ => Err(ApiError::validation(details)),
        }
    }
}
