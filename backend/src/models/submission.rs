use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api_error::{ApiError, FieldError};
use crate::models::meta_deck::{find_meta_deck, MetaDeck};
use crate::models::player::normalize_player_name;
use crate::models::validation::{parse_week_start, string_field, GameCounts};

pub const MAX_CUSTOM_POKEMON: usize = 2;
pub const PLAYER_NAME_MIN_CHARS: usize = 2;
pub const PLAYER_NAME_MAX_CHARS: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomPokemon {
    pub name: String,
    pub pokedex_number: u32,
    #[serde(default)]
    pub sprite_url: Option<String>,
}

/// Body of `POST /api/tournament-records`.
///
/// Form fields stay loosely typed so a value of the wrong JSON type is
/// reported in `details` against its field instead of failing the whole body.
/// `selectedDeck` is a meta deck id (number or numeric string) or `"other"`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
    #[serde(default)]
    pub player_name: Option<Value>,
    #[serde(default)]
    pub date: Option<Value>,
    #[serde(default)]
    pub wins: Option<Value>,
    #[serde(default)]
    pub losses: Option<Value>,
    #[serde(default)]
    pub ties: Option<Value>,
    #[serde(default)]
    pub selected_deck: Option<Value>,
    #[serde(default)]
    pub custom_pokemon: Option<Value>,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
}

/// What the deck selection resolves to once validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeckSelection {
    Meta(&'static MetaDeck),
    Custom(Vec<CustomPokemon>),
}

/// A submission that passed every form check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSubmission {
    pub player_name: String,
    pub week_start: NaiveDate,
    pub wins: i32,
    pub losses: i32,
    pub ties: i32,
    pub deck: DeckSelection,
}

fn meta_deck(id: Option<u64>) -> Result<DeckSelection, FieldError> {
    id.and_then(|id| u32::try_from(id).ok())
        .and_then(find_meta_deck)
        .map(DeckSelection::Meta)
        .ok_or_else(|| FieldError::new("selectedDeck", "Selected meta deck not found"))
}

impl SubmissionRequest {
    /// Runs every field check and reports all failures at once.
    pub fn validate_form(&self, today: NaiveDate) -> Result<ValidatedSubmission, ApiError> {
        let mut details = Vec::new();

        let counts = match GameCounts::check(&self.wins, &self.losses, &self.ties) {
            Ok(counts) => Some(counts),
            Err(errors) => {
                details.extend(errors);
                None
            }
        };

        let player_name = match self.check_player_name() {
            Ok(name) => Some(name),
            Err(e) => {
                details.push(e);
                None
            }
        };

        let week_start = match self.check_date(today) {
            Ok(date) => Some(date),
            Err(e) => {
                details.push(e);
                None
            }
        };

        let deck = match self.deck_selection() {
            Ok(deck) => Some(deck),
            Err(e) => {
                details.push(e);
                None
            }
        };

        match (player_name, week_start, counts, deck) {
            (Some(player_name), Some(week_start), Some((wins, losses, ties)), Some(deck))
                if details.is_empty() =>
            {
                Ok(ValidatedSubmission {
                    player_name,
                    week_start,
                    wins,
                    losses,
                    ties,
                    deck,
                })
            }
            _ => Err(ApiError::validation(details)),
        }
    }

    fn check_player_name(&self) -> Result<String, FieldError> {
        let raw = string_field(
            &self.player_name,
            "playerName",
            "Player name is required and must be a string",
        )?
        .unwrap_or_default();
        let name = normalize_player_name(&raw);
        let chars = name.chars().count();
        if chars == 0 {
            Err(FieldError::new("playerName", "Player name is required"))
        } else if chars < PLAYER_NAME_MIN_CHARS {
            Err(FieldError::new(
                "playerName",
                "Player name must be at least 2 characters",
            ))
        } else if chars > PLAYER_NAME_MAX_CHARS {
            Err(FieldError::new(
                "playerName",
                "Player name must be 100 characters or less",
            ))
        } else {
            Ok(name.to_string())
        }
    }

    fn check_date(&self, today: NaiveDate) -> Result<NaiveDate, FieldError> {
        let raw = string_field(&self.date, "date", "Date must be in YYYY-MM-DD format")?
            .unwrap_or_default();
        parse_week_start(&raw, today).map_err(|message| FieldError::new("date", message))
    }

    fn deck_selection(&self) -> Result<DeckSelection, FieldError> {
        match &self.selected_deck {
            Some(Value::Number(id)) => meta_deck(id.as_u64()),
            Some(Value::String(raw)) if raw.trim() == "other" => self.custom_deck(),
            Some(Value::String(raw)) if !raw.trim().is_empty() => {
                meta_deck(raw.trim().parse::<u64>().ok())
            }
            _ => Err(FieldError::new("selectedDeck", "Deck selection is required")),
        }
    }

    fn custom_deck(&self) -> Result<DeckSelection, FieldError> {
        let picks: Vec<CustomPokemon> = match &self.custom_pokemon {
            None | Some(Value::Null) => Vec::new(),
            Some(value) => serde_json::from_value(value.clone()).map_err(|_| {
                FieldError::new(
                    "customPokemon",
                    "Each custom Pokemon needs a name and a Pokedex number",
                )
            })?,
        };
        if picks.is_empty() {
            return Err(FieldError::new(
                "customPokemon",
                "Custom Pokemon selection is required when \"Other\" is selected",
            ));
        }
        if picks.len() > MAX_CUSTOM_POKEMON {
            return Err(FieldError::new(
                "customPokemon",
                "Select at most 2 Pokemon for a custom deck",
            ));
        }
        if picks
            .iter()
            .any(|p| p.name.trim().is_empty() || p.pokedex_number == 0)
        {
            return Err(FieldError::new(
                "customPokemon",
                "Each custom Pokemon needs a name and a Pokedex number",
            ));
        }
        Ok(DeckSelection::Custom(picks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 14).unwrap()
    }

    fn request(json: &str) -> SubmissionRequest {
        serde_json::from_str(json).unwrap()
    }

    fn fields(err: &ApiError) -> Vec<String> {
        err.details()
            .unwrap()
            .iter()
            .map(|d| d.field.clone())
            .collect()
    }

    #[test]
    fn test_meta_deck_submission() {
        let req = request(
            r#"{"playerName":"  Misty ","date":"2025-07-07","wins":4,"losses":2,"ties":1,
                "selectedDeck":4,"password":"pw"}"#,
        );
        let valid = req.validate_form(today()).unwrap();
        assert_eq!(valid.player_name, "Misty");
        assert_eq!(valid.wins, 4);
        match valid.deck {
            DeckSelection::Meta(deck) => assert_eq!(deck.name, "Dragapult Charizard"),
            other => panic!("unexpected deck {:?}", other),
        }
    }

    #[test]
    fn test_other_requires_custom_pokemon() {
        let req = request(
            r#"{"playerName":"Misty","date":"2025-07-07","wins":1,"losses":0,"ties":0,
                "selectedDeck":"other"}"#,
        );
        let err = req.validate_form(today()).unwrap_err();
        assert_eq!(fields(&err), vec!["customPokemon"]);
    }

    #[test]
    fn test_custom_deck_with_two_pokemon() {
        let req = request(
            r#"{"playerName":"Brock","date":"2025-07-07","wins":1,"losses":0,"ties":0,
                "selectedDeck":"other",
                "customPokemon":[{"name":"Onix","pokedex_number":95},
                                 {"name":"Geodude","pokedex_number":74,"sprite_url":"https://img/74.png"}]}"#,
        );
        match req.validate_form(today()).unwrap().deck {
            DeckSelection::Custom(picks) => {
                assert_eq!(picks.len(), 2);
                assert_eq!(picks[1].sprite_url.as_deref(), Some("https://img/74.png"));
            }
            other => panic!("unexpected deck {:?}", other),
        }
    }

    #[test]
    fn test_more_than_two_custom_pokemon_rejected() {
        let req = request(
            r#"{"playerName":"Brock","date":"2025-07-07","wins":1,"losses":0,"ties":0,
                "selectedDeck":"other",
                "customPokemon":[{"name":"Onix","pokedex_number":95},
                                 {"name":"Geodude","pokedex_number":74},
                                 {"name":"Vulpix","pokedex_number":37}]}"#,
        );
        let err = req.validate_form(today()).unwrap_err();
        assert_eq!(fields(&err), vec!["customPokemon"]);
    }

    #[test]
    fn test_empty_deck_selection_rejected() {
        let req = request(
            r#"{"playerName":"Brock","date":"2025-07-07","wins":1,"losses":0,"ties":0,
                "selectedDeck":""}"#,
        );
        let err = req.validate_form(today()).unwrap_err();
        assert_eq!(fields(&err), vec!["selectedDeck"]);
    }

    #[test]
    fn test_meta_deck_id_as_string() {
        let req = request(
            r#"{"playerName":"Brock","date":"2025-07-07","wins":1,"losses":0,"ties":0,
                "selectedDeck":"7"}"#,
        );
        match req.validate_form(today()).unwrap().deck {
            DeckSelection::Meta(deck) => assert_eq!(deck.name, "Dragapult ex"),
            other => panic!("unexpected deck {:?}", other),
        }
    }

    #[test]
    fn test_unknown_meta_deck_rejected() {
        let req = request(
            r#"{"playerName":"Brock","date":"2025-07-07","wins":1,"losses":0,"ties":0,
                "selectedDeck":404}"#,
        );
        let err = req.validate_form(today()).unwrap_err();
        assert_eq!(err.details().unwrap()[0].message, "Selected meta deck not found");
    }

    #[test]
    fn test_zero_games_rejected() {
        let req = request(
            r#"{"playerName":"Brock","date":"2025-07-07","wins":0,"losses":0,"ties":0,
                "selectedDeck":1}"#,
        );
        let err = req.validate_form(today()).unwrap_err();
        assert_eq!(fields(&err), vec!["general"]);
    }

    #[test]
    fn test_name_bounds() {
        let short = request(
            r#"{"playerName":" A ","date":"2025-07-07","wins":1,"losses":0,"ties":0,"selectedDeck":1}"#,
        );
        assert_eq!(fields(&short.validate_form(today()).unwrap_err()), vec!["playerName"]);

        let long = SubmissionRequest {
            player_name: Some(Value::String("x".repeat(101))),
            ..short
        };
        assert_eq!(fields(&long.validate_form(today()).unwrap_err()), vec!["playerName"]);
    }

    #[test]
    fn test_mistyped_fields_reported_per_field() {
        let req = request(
            r#"{"playerName":42,"date":20250707,"wins":"3","losses":0,"ties":0,
                "selectedDeck":"other","customPokemon":[{"name":"Onix","pokedex_number":-95}]}"#,
        );
        let err = req.validate_form(today()).unwrap_err();
        let reported = fields(&err);
        for field in ["playerName", "date", "wins", "customPokemon"] {
            assert!(reported.contains(&field.to_string()), "missing {}", field);
        }
        assert!(!reported.contains(&"losses".to_string()));
        assert_eq!(
            err.details().unwrap()[0].message,
            "Wins must be a number between 0 and 50"
        );
    }

    #[test]
    fn test_all_errors_reported_together() {
        let req = request(r#"{"wins":99,"losses":0,"ties":0}"#);
        let err = req.validate_form(today()).unwrap_err();
        let reported = fields(&err);
        for field in ["wins", "playerName", "date", "selectedDeck"] {
            assert!(reported.contains(&field.to_string()), "missing {}", field);
        }
        assert!(!reported.contains(&"general".to_string()));
    }
}
