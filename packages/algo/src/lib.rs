//! # pedagogy-algo - adaptive scoring and content-safety core
//!
//! Pure Rust engines used by the tutoring, assessment and marketplace services:
//!
//! - **IRT Engine** - 4PL probability of a correct response, online ability
//!   updates, item difficulty calibration and adaptive difficulty stepping
//! - **Content Safety Filter** - PII/credential redaction, profanity censoring,
//!   prohibited-content and scam detection with a bounded risk score
//! - **Gamification** - point/level/streak ledger transitions
//!
//! ## Design
//!
//! - **Pure** - no I/O, no locking, no async; callers own persistence and
//!   per-learner serialization
//! - **Bounded** - every operation is O(1) or linear in the input text
//! - **Infallible at scoring time** - invalid items are rejected when they are
//!   built, the filter returns a result for every string
//!
//! ## Modules
//!
//! - [`irt`] - logistic scoring, information, updates, difficulty policy
//! - [`safety`] - the content filter and its rule tables
//! - [`gamification`] - award/streak/level arithmetic
//! - [`sanitize`] - numeric repair helpers
//! - [`types`] - shared types and constants
//!
//! ## Example
//!
//! ```rust
//! use pedagogy_algo::{probability_correct, update_ability, ContentContext, ContentSafetyFilter, ItemParams};
//!
//! let item = ItemParams::three_pl(0.5, 1.2, 0.2).unwrap();
//! let p = probability_correct(0.5, &item);
//! assert!((p - 0.6).abs() < 1e-12);
//! let theta = update_ability(0.0, &item, true, 0.1);
//! assert!(theta > 0.0);
//!
//! let filter = ContentSafetyFilter::default();
//! let result = filter.sanitize("write to me at kid@example.com", &ContentContext::LearnerInput);
//! assert!(!result.is_safe);
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod error;
pub mod gamification;
pub mod irt;
pub mod safety;
pub mod sanitize;
pub mod types;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::AlgoError;

pub use types::*;

pub use irt::{
    adjust_difficulty, calibrate_difficulty, item_information, probability_correct,
    select_most_informative, update_ability, update_ability_within, AttemptWindow,
    DifficultyPolicy, DifficultyStep, IrtConfig, IrtEngine,
};

pub use safety::{ContentContext, ContentSafetyFilter, PiiCategory, ProfanityCensor, SafetyConfig};

pub use gamification::{award_points, level_for_points, levels_gained, StreakState};
