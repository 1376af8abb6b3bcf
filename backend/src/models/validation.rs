//! Field checks shared by the submission and raw result forms.

use chrono::NaiveDate;
use serde_json::Value;
use validator::{Validate, ValidationErrors};

use crate::api_error::FieldError;

/// Flattens `validator` output into `{ field, message }` pairs, ordered by field.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut details: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = if field == "__all__" {
                "general".to_string()
            } else {
                field.to_string()
            };
            errs.iter()
                .map(|e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field));
                    FieldError::new(field.clone(), message)
                })
                .collect::<Vec<_>>()
        })
        .collect();
    details.sort_by(|a, b| a.field.cmp(&b.field));
    details
}

/// Reads a loosely typed JSON field as a string. Absent and `null` are `None`;
/// any other non-string value is reported against `field`.
pub fn string_field(
    value: &Option<Value>,
    field: &str,
    message: &str,
) -> Result<Option<String>, FieldError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(FieldError::new(field, message)),
    }
}

/// Reads a loosely typed JSON field as an `i32`. Strings, fractions and
/// out-of-range numbers are reported against `field`.
pub fn integer_field(
    value: &Option<Value>,
    field: &str,
    message: &str,
) -> Result<Option<i32>, FieldError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| FieldError::new(field, message)),
    }
}

/// Runs `validate` on a typed form and drops reports for fields that
/// already failed their type check.
pub fn collect_rule_errors<T: Validate>(form: &T, details: &mut Vec<FieldError>) {
    if let Err(errors) = form.validate() {
        let mistyped: Vec<String> = details.iter().map(|d| d.field.clone()).collect();
        details.extend(
            field_errors(&errors)
                .into_iter()
                .filter(|e| !mistyped.contains(&e.field)),
        );
    }
}

/// Win/loss/tie counts after their JSON type check.
#[derive(Debug, Validate)]
pub struct GameCounts {
    #[validate(
        required(message = "Wins is required"),
        range(min = 0, max = 50, message = "Wins must be a number between 0 and 50")
    )]
    pub wins: Option<i32>,
    #[validate(
        required(message = "Losses is required"),
        range(min = 0, max = 50, message = "Losses must be a number between 0 and 50")
    )]
    pub losses: Option<i32>,
    #[validate(
        required(message = "Ties is required"),
        range(min = 0, max = 50, message = "Ties must be a number between 0 and 50")
    )]
    pub ties: Option<i32>,
}

impl GameCounts {
    /// Type checks, range rules, then the at-least-one-game rule.
    /// Returns `(wins, losses, ties)` or every failure found.
    pub fn check(
        wins: &Option<Value>,
        losses: &Option<Value>,
        ties: &Option<Value>,
    ) -> Result<(i32, i32, i32), Vec<FieldError>> {
        let mut details = Vec::new();
        let mut read = |value: &Option<Value>, field: &str, label: &str| {
            let message = format!("{} must be a number between 0 and 50", label);
            integer_field(value, field, &message).unwrap_or_else(|e| {
                details.push(e);
                None
            })
        };
        let counts = GameCounts {
            wins: read(wins, "wins", "Wins"),
            losses: read(losses, "losses", "Losses"),
            ties: read(ties, "ties", "Ties"),
        };
        collect_rule_errors(&counts, &mut details);

        match (counts.wins, counts.losses, counts.ties) {
            (Some(w), Some(l), Some(t)) if details.is_empty() => {
                check_games_played(w, l, t).map_err(|e| vec![e])?;
                Ok((w, l, t))
            }
            _ => Err(details),
        }
    }
}

/// Parses a strict `YYYY-MM-DD` week start that is not after `today`.
pub fn parse_week_start(raw: &str, today: NaiveDate) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("Date is required".to_string());
    }
    let well_formed = raw.len() == 10
        && raw
            .char_indices()
            .all(|(i, c)| if i == 4 || i == 7 { c == '-' } else { c.is_ascii_digit() });
    if !well_formed {
        return Err("Date must be in YYYY-MM-DD format".to_string());
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| "Date must be a valid calendar date".to_string())?;
    if date > today {
        return Err("Tournament date cannot be in the future".to_string());
    }
    Ok(date)
}

/// A record with no games played carries no information.
pub fn check_games_played(wins: i32, losses: i32, ties: i32) -> Result<(), FieldError> {
    if wins + losses + ties == 0 {
        return Err(FieldError::new(
            "general",
            "You must have played at least one game",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 14).unwrap()
    }

    #[test]
    fn test_parse_week_start() {
        assert_eq!(
            parse_week_start("2025-07-07", today()),
            Ok(NaiveDate::from_ymd_opt(2025, 7, 7).unwrap())
        );
        assert_eq!(parse_week_start("  ", today()), Err("Date is required".to_string()));
        assert!(parse_week_start("2025-7-7", today()).is_err());
        assert!(parse_week_start("07/07/2025", today()).is_err());
        assert!(parse_week_start("2025-02-30", today()).is_err());
        assert_eq!(
            parse_week_start("2025-07-15", today()),
            Err("Tournament date cannot be in the future".to_string())
        );
    }

    fn counts(v: Value) -> Result<(i32, i32, i32), Vec<FieldError>> {
        GameCounts::check(
            &v.get("wins").cloned(),
            &v.get("losses").cloned(),
            &v.get("ties").cloned(),
        )
    }

    fn reported(errors: Vec<FieldError>) -> Vec<String> {
        errors.into_iter().map(|e| e.field).collect()
    }

    #[test]
    fn test_game_counts_accept_integers() {
        let parsed = counts(serde_json::json!({ "wins": 3, "losses": 1, "ties": 0 }));
        assert_eq!(parsed, Ok((3, 1, 0)));
    }

    #[test]
    fn test_game_counts_report_wrong_types_per_field() {
        let errors = counts(serde_json::json!({ "wins": "3", "losses": 1.5, "ties": 0 })).unwrap_err();
        assert_eq!(reported(errors.clone()), vec!["wins", "losses"]);
        assert_eq!(errors[0].message, "Wins must be a number between 0 and 50");
    }

    #[test]
    fn test_game_counts_report_missing_and_range() {
        let errors = counts(serde_json::json!({ "wins": 51, "ties": null })).unwrap_err();
        assert_eq!(reported(errors), vec!["losses", "ties", "wins"]);
    }

    #[test]
    fn test_game_counts_need_one_game() {
        let errors = counts(serde_json::json!({ "wins": 0, "losses": 0, "ties": 0 })).unwrap_err();
        assert_eq!(reported(errors), vec!["general"]);
    }

    #[test]
    fn test_string_field_rejects_numbers() {
        assert_eq!(string_field(&None, "date", "bad"), Ok(None));
        assert_eq!(
            string_field(&Some(serde_json::json!("Ash")), "playerName", "bad"),
            Ok(Some("Ash".to_string()))
        );
        let err = string_field(&Some(serde_json::json!(42)), "playerName", "bad").unwrap_err();
        assert_eq!(err.field, "playerName");
    }

    #[test]
    fn test_games_played() {
        assert!(check_games_played(0, 0, 0).is_err());
        assert!(check_games_played(0, 0, 1).is_ok());
        assert!(check_games_played(3, 1, 0).is_ok());
    }
}
