//! Fuzz target: JSON decoding and validation of `NewExerciseInput`.
//!
//! Arbitrary bytes must never panic the decoder or the validator, and a
//! body that validates must produce a finite duration.

#![no_main]

use chrono::Utc;
use libfuzzer_sys::fuzz_target;
use tracker_core::NewExerciseInput;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = serde_json::from_slice::<NewExerciseInput>(data) else {
        return;
    };
    if let Ok(new) = input.validate() {
        assert!(new.duration.is_finite());
        let exercise = new.into_exercise(Utc::now());
        let _ = serde_json::to_string(&exercise);
    }
});
