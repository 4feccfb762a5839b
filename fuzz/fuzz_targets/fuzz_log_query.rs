//! Fuzz target: log query parameters applied to a fixed log.
//!
//! Whatever the `from`/`to`/`limit` strings, filtering must not panic and
//! every returned entry must satisfy the query.

#![no_main]

use chrono::{Duration, TimeZone, Utc};
use libfuzzer_sys::fuzz_target;
use tracker_core::{Exercise, LogQueryParams};

fuzz_target!(|data: (String, String, String)| {
    let (from, to, limit) = data;
    let params = LogQueryParams {
        user_id: Some("fuzz".to_owned()),
        from: Some(from),
        to: Some(to),
        limit: Some(limit),
    };
    let Ok((_, query)) = params.validate() else {
        return;
    };
    let Some(start) = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).single() else {
        return;
    };
    let log: Vec<Exercise> = (0..32)
        .map(|i| Exercise::new("x", 1.0, start + Duration::days(i * 7 % 31)))
        .collect();
    let out = query.apply(&log);
    assert!(out.iter().all(|e| query.contains(e.date)));
    assert!(out.windows(2).all(|w| w[0].date <= w[1].date));
});
