//! Input limits for survey submissions.
//!
//! The `#[validate]` derive needs literal values, so `survey.rs` repeats
//! these. Keep both in sync when modifying.

/// Maximum characters in a free-text survey field.
pub const MAX_TEXT_FIELD_CHARS: u64 = 64;

/// Lowest accepted preferred ABV.
pub const MIN_ABV: f64 = 0.0;

/// Highest accepted preferred ABV.
pub const MAX_ABV: f64 = 100.0;
