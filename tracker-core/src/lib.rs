//! Core types for the exercise tracker service.
//!
//! Defines users and their exercise logs, the short identifiers they are
//! keyed by, validation of raw client input, and the log query filter.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod exercise;
pub mod id;
pub mod input;
pub mod log;
pub mod user;

pub use error::{CoreError, ValidationErrors};
pub use exercise::{parse_date, Exercise};
pub use id::{short_id, ExerciseId, UserId};
pub use input::{FieldValue, NewExercise, NewExerciseInput, NewUserInput};
pub use log::{LogQuery, LogQueryParams};
pub use user::{User, UserLog, UserSummary};
