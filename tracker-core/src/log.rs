//! Log query parsing and filtering.
//!
//! A query selects the half-open interval `[from, to)` over a log sorted by
//! date, then keeps at most `limit` of the earliest matches.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{CoreError, ValidationErrors};
use crate::exercise::{parse_date, Exercise};
use crate::id::UserId;

/// Query string of `GET /api/exercise/log`, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogQueryParams {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<String>,
}

impl LogQueryParams {
    /// Validates the parameters into a user id and a [`LogQuery`].
    ///
    /// # Errors
    /// Returns [`CoreError::Validation`] if `userId` is missing or `from`/`to`
    /// are not dates. An unusable `limit` is ignored rather than rejected.
    pub fn validate(self) -> Result<(UserId, LogQuery), CoreError> {
        let mut errors = ValidationErrors::new();

        let user_id = match self.user_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Some(UserId::new(id)),
            _ => {
                errors.required("userId");
                None
            }
        };
        let from = bound(&mut errors, "from", self.from.as_deref());
        let to = bound(&mut errors, "to", self.to.as_deref());
        let limit = self.limit.as_deref().and_then(parse_limit);

        match user_id {
            Some(user_id) if errors.is_empty() => Ok((user_id, LogQuery { from, to, limit })),
            _ => Err(CoreError::Validation(errors)),
        }
    }
}

fn bound(
    errors: &mut ValidationErrors,
    field: &'static str,
    raw: Option<&str>,
) -> Option<DateTime<Utc>> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    let parsed = parse_date(raw);
    if parsed.is_none() {
        errors.cast(field, "Date", raw);
    }
    parsed
}

/// Any finite positive number counts as a limit; fractions truncate.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_limit(raw: &str) -> Option<usize> {
    let n = raw.trim().parse::<f64>().ok().filter(|n| n.is_finite() && *n > 0.0)?;
    Some(n.trunc() as usize)
}

/// Date range and count filter over a user's log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogQuery {
    /// Inclusive lower bound.
    pub from: Option<DateTime<Utc>>,
    /// Exclusive upper bound.
    pub to: Option<DateTime<Utc>>,
    /// Maximum number of entries returned.
    pub limit: Option<usize>,
}

impl LogQuery {
    /// Returns `true` if `date` lies within `[from, to)`.
    #[must_use]
    pub fn contains(&self, date: DateTime<Utc>) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date < to)
    }

    /// Select the matching entries, earliest first.
    ///
    /// Entries sharing a date keep their log order.
    ///
    /// # Complexity
    /// O(n log n) for the sort, O(n) for the scan.
    #[must_use]
    pub fn apply(&self, log: &[Exercise]) -> Vec<Exercise> {
        let mut sorted: Vec<&Exercise> = log.iter().collect();
        sorted.sort_by_key(|e| e.date);
        sorted
            .into_iter()
            .filter(|e| self.contains(e.date))
            .take(self.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }
}
