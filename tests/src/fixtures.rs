//! Test fixtures and data generators.

use serde_json::{json, Value};

/// A complete, valid survey body for `/api/survey`.
pub fn valid_survey_json() -> Value {
    json!({
        "abv": 16.5,
        "mood": "혼술",
        "recommended": "사케",
        "food": "회"
    })
}

pub fn survey_json_with_abv(abv: f64) -> Value {
    json!({
        "abv": abv,
        "mood": "파티",
        "recommended": "위스키"
    })
}

/// A survey body with every field out of range.
pub fn invalid_survey_json() -> Value {
    json!({
        "abv": 150.0,
        "mood": "가".repeat(65),
        "recommended": "와인"
    })
}

/// Form fields as the browser posts them to `/survey`.
pub fn survey_form(abv: &str, mood: &str, recommended: &str) -> Vec<(&'static str, String)> {
    vec![
        ("abv", abv.to_string()),
        ("mood", mood.to_string()),
        ("recommended", recommended.to_string()),
        ("food", "치즈".to_string()),
    ]
}
