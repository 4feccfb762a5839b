//! Raw request input and its validation.
//!
//! Bodies arrive either as JSON or as URL-encoded forms, so every field is
//! read as a loosely typed [`FieldValue`] and checked here. Checks run in
//! field order and the first failure is the one reported.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{CoreError, ValidationErrors};
use crate::exercise::{parse_date, Exercise};
use crate::id::UserId;

/// A scalar field as sent by a client.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Flag(bool),
}

impl FieldValue {
    /// The value rendered as text, e.g. for error messages.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            Self::Flag(b) => b.to_string(),
        }
    }

    /// `true` for empty text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }

    /// `true` for empty or whitespace-only text.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(s) if s.trim().is_empty())
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// Body of `POST /api/exercise/new-user`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewUserInput {
    pub username: Option<FieldValue>,
}

impl NewUserInput {
    /// Returns the validated username.
    ///
    /// # Errors
    /// Returns [`CoreError::Validation`] if the username is missing or empty.
    pub fn validate(self) -> Result<String, CoreError> {
        let mut errors = ValidationErrors::new();
        let username = required_text(&mut errors, "username", self.username);
        errors.into_result(username.unwrap_or_default())
    }
}

/// Body of `POST /api/exercise/add`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewExerciseInput {
    #[serde(rename = "userId")]
    pub user_id: Option<FieldValue>,
    pub description: Option<FieldValue>,
    pub duration: Option<FieldValue>,
    pub date: Option<FieldValue>,
}

/// A validated exercise that has not been assigned to a log yet.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct NewExercise {
    pub user_id: UserId,
    pub description: String,
    pub duration: f64,
    /// `None` when the client left the date out or blank.
    pub date: Option<DateTime<Utc>>,
}

impl NewExercise {
    /// Turn into a log entry, dating it `now` if no date was given.
    #[must_use]
    pub fn into_exercise(self, now: DateTime<Utc>) -> Exercise {
        Exercise::new(self.description, self.duration, self.date.unwrap_or(now))
    }
}

impl NewExerciseInput {
    /// Validates every field.
    ///
    /// # Errors
    /// Returns [`CoreError::Validation`] listing each failing field, in the
    /// order `userId`, `description`, `duration`, `date`.
    pub fn validate(self) -> Result<NewExercise, CoreError> {
        let mut errors = ValidationErrors::new();

        let user_id = required_text(&mut errors, "userId", self.user_id);
        let description = required_text(&mut errors, "description", self.description);
        let duration = match self.duration {
            None => {
                errors.required("duration");
                None
            }
            Some(v) if v.is_blank() => {
                errors.required("duration");
                None
            }
            Some(v) => {
                let minutes = to_number(&v);
                if minutes.is_none() {
                    errors.cast("duration", "Number", &v.to_text());
                }
                minutes
            }
        };
        let date = match self.date {
            Some(v) if !v.is_blank() => {
                let parsed = match &v {
                    FieldValue::Text(s) => text_to_date(s),
                    #[allow(clippy::cast_possible_truncation)]
                    FieldValue::Number(ms) if ms.is_finite() => {
                        DateTime::from_timestamp_millis(*ms as i64)
                    }
                    _ => None,
                };
                if parsed.is_none() {
                    errors.cast("date", "Date", &v.to_text());
                }
                parsed
            }
            _ => None,
        };

        match (user_id, description, duration) {
            (Some(user_id), Some(description), Some(duration)) if errors.is_empty() => {
                Ok(NewExercise {
                    user_id: UserId::new(user_id),
                    description,
                    duration,
                    date,
                })
            }
            _ => Err(CoreError::Validation(errors)),
        }
    }
}

fn required_text(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<FieldValue>,
) -> Option<String> {
    match value {
        Some(v) if !v.is_empty() => Some(v.to_text()),
        _ => {
            errors.required(field);
            None
        }
    }
}

/// Integer text is epoch milliseconds, anything else a calendar date.
fn text_to_date(raw: &str) -> Option<DateTime<Utc>> {
    match raw.trim().parse::<i64>() {
        Ok(ms) => DateTime::from_timestamp_millis(ms),
        Err(_) => parse_date(raw),
    }
}

fn to_number(value: &FieldValue) -> Option<f64> {
    let n = match value {
        FieldValue::Number(n) => *n,
        FieldValue::Text(s) => s.trim().parse::<f64>().ok()?,
        FieldValue::Flag(_) => return None,
    };
    n.is_finite().then_some(n)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn exercise_input(
        user_id: Option<&str>,
        description: Option<&str>,
        duration: Option<FieldValue>,
        date: Option<&str>,
    ) -> NewExerciseInput {
        NewExerciseInput {
            user_id: user_id.map(FieldValue::from),
            description: description.map(FieldValue::from),
            duration,
            date: date.map(FieldValue::from),
        }
    }

    fn first_message(err: &CoreError) -> String {
        match err {
            CoreError::Validation(errors) => errors.to_string(),
        }
    }

    #[test]
    fn username_missing_is_required_error() {
        let err = match NewUserInput::default().validate() {
            Ok(name) => panic!("expected error, got {name}"),
            Err(e) => e,
        };
        assert_eq!(first_message(&err), "Path `username` is required.");
    }

    #[test]
    fn username_empty_is_required_error() {
        let input = NewUserInput { username: Some("".into()) };
        assert!(input.validate().is_err(), "empty username must be rejected");
    }

    #[test]
    fn whitespace_username_and_description_are_accepted() {
        let input = NewUserInput { username: Some("   ".into()) };
        match input.validate() {
            Ok(name) => assert_eq!(name, "   "),
            Err(e) => panic!("unexpected error: {e}"),
        }
        let input = exercise_input(Some("u1"), Some(" "), Some("5".into()), None);
        match input.validate() {
            Ok(new) => assert_eq!(new.description, " "),
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn username_is_kept_verbatim() {
        let input = NewUserInput { username: Some("alice".into()) };
        match input.validate() {
            Ok(name) => assert_eq!(name, "alice"),
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn exercise_text_duration_is_cast_to_number() {
        let input = exercise_input(Some("u1"), Some("run"), Some("45".into()), None);
        let exercise = match input.validate() {
            Ok(e) => e,
            Err(e) => panic!("unexpected error: {e}"),
        };
        assert!((exercise.duration - 45.0).abs() < f64::EPSILON);
        assert_eq!(exercise.user_id, UserId::new("u1"));
        assert!(exercise.date.is_none(), "absent date must stay unset");
    }

    #[test]
    fn exercise_json_number_duration_is_accepted() {
        let input = exercise_input(Some("u1"), Some("swim"), Some(20.5.into()), None);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn exercise_bad_duration_reports_cast_error() {
        let input = exercise_input(Some("u1"), Some("run"), Some("long".into()), None);
        let err = match input.validate() {
            Ok(e) => panic!("expected error, got {e:?}"),
            Err(e) => e,
        };
        assert_eq!(
            first_message(&err),
            "Cast to Number failed for value \"long\" at path \"duration\""
        );
    }

    #[test]
    fn exercise_reports_first_failing_field_in_order() {
        let input = exercise_input(Some("u1"), None, None, Some("nope"));
        let err = match input.validate() {
            Ok(e) => panic!("expected error, got {e:?}"),
            Err(e) => e,
        };
        let CoreError::Validation(errors) = &err;
        assert_eq!(errors.len(), 3, "description, duration and date all fail");
        assert_eq!(first_message(&err), "Path `description` is required.");
        assert_eq!(
            errors.get("date"),
            Some("Cast to Date failed for value \"nope\" at path \"date\"")
        );
    }

    #[test]
    fn exercise_blank_date_defaults_to_now() {
        let input = exercise_input(Some("u1"), Some("row"), Some("10".into()), Some("  "));
        let new = match input.validate() {
            Ok(e) => e,
            Err(e) => panic!("unexpected error: {e}"),
        };
        let Some(now) = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).single() else {
            panic!("valid date")
        };
        assert_eq!(new.into_exercise(now).date, now);
    }

    #[test]
    fn exercise_explicit_date_is_preserved() {
        let input =
            exercise_input(Some("u1"), Some("row"), Some("10".into()), Some("2019-05-04"));
        let new = match input.validate() {
            Ok(e) => e,
            Err(e) => panic!("unexpected error: {e}"),
        };
        let exercise = new.into_exercise(Utc::now());
        assert_eq!(Some(exercise.date), Utc.with_ymd_and_hms(2019, 5, 4, 0, 0, 0).single());
    }

    #[test]
    fn exercise_numeric_date_is_epoch_millis() {
        let input = NewExerciseInput {
            date: Some(1_577_836_800_000.0.into()),
            ..exercise_input(Some("u1"), Some("row"), Some("10".into()), None)
        };
        let new = match input.validate() {
            Ok(e) => e,
            Err(e) => panic!("unexpected error: {e}"),
        };
        assert_eq!(new.date, Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).single());
    }

    #[test]
    fn exercise_numeric_text_date_is_epoch_millis() {
        let input =
            exercise_input(Some("u1"), Some("row"), Some("10".into()), Some("1577836800000"));
        let new = match input.validate() {
            Ok(e) => e,
            Err(e) => panic!("unexpected error: {e}"),
        };
        assert_eq!(new.date, Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).single());
    }

    #[test]
    fn non_finite_duration_is_rejected() {
        let input = exercise_input(Some("u1"), Some("run"), Some("inf".into()), None);
        assert!(input.validate().is_err(), "infinite duration must not validate");
    }
}
