//! Common Types and Constants
//!
//! Shared data structures used across all algorithm modules.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AlgoError;

// ==================== Constants ====================

/// Exponent clamp for the logistic curve
pub const MAX_LOGIT_EXPONENT: f64 = 60.0;

/// Default lower bound of the ability scale
pub const DEFAULT_ABILITY_MIN: f64 = -4.0;

/// Default upper bound of the ability scale
pub const DEFAULT_ABILITY_MAX: f64 = 4.0;

/// Default difficulty bound (symmetric)
pub const DEFAULT_DIFFICULTY_BOUND: f64 = 3.0;

/// Default learning rate for ability and difficulty updates
pub const DEFAULT_LEARNING_RATE: f64 = 0.1;

/// Points needed per gamification level
pub const POINTS_PER_LEVEL: u64 = 100;

/// Numerical stability epsilon
pub const EPSILON: f64 = 1e-10;

// ==================== IRT Types ====================

/// Item (question) parameters for the four-parameter logistic model
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemParams {
    /// Location b on the theta scale
    pub difficulty: f64,
    /// Slope a (> 0)
    pub discrimination: f64,
    /// Lower asymptote c, chance floor
    #[serde(default)]
    pub guessing: f64,
    /// Upper asymptote d, slip ceiling
    #[serde(default = "default_upper_asymptote")]
    pub upper_asymptote: f64,
}

fn default_upper_asymptote() -> f64 {
    1.0
}

impl ItemParams {
    /// Create a validated item.
    ///
    /// Rejects non-finite values, `discrimination <= 0` and anything that breaks
    /// `0 <= guessing <= upper_asymptote <= 1`.
    pub fn new(
        difficulty: f64,
        discrimination: f64,
        guessing: f64,
        upper_asymptote: f64,
    ) -> Result<Self, AlgoError> {
        let item = Self {
            difficulty,
            discrimination,
            guessing,
            upper_asymptote,
        };
        item.validate()?;
        Ok(item)
    }

    /// Two-parameter item (no guessing floor, ceiling at 1)
    pub fn two_pl(difficulty: f64, discrimination: f64) -> Result<Self, AlgoError> {
        Self::new(difficulty, discrimination, 0.0, 1.0)
    }

    /// Three-parameter item (ceiling at 1)
    pub fn three_pl(difficulty: f64, discrimination: f64, guessing: f64) -> Result<Self, AlgoError> {
        Self::new(difficulty, discrimination, guessing, 1.0)
    }

    /// Check the parameter invariants. Deserialized items should pass through here
    /// before they are handed to the scorer.
    pub fn validate(&self) -> Result<(), AlgoError> {
        let fields = [
            ("difficulty", self.difficulty),
            ("discrimination", self.discrimination),
            ("guessing", self.guessing),
            ("upper_asymptote", self.upper_asymptote),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(AlgoError::invalid_item(field, "must be finite"));
            }
        }
        if self.discrimination <= 0.0 {
            return Err(AlgoError::invalid_item(
                "discrimination",
                "must be greater than 0",
            ));
        }
        if self.guessing < 0.0 {
            return Err(AlgoError::invalid_item("guessing", "must be at least 0"));
        }
        if self.guessing > self.upper_asymptote {
            return Err(AlgoError::invalid_item(
                "guessing",
                "must not exceed upper_asymptote",
            ));
        }
        if self.upper_asymptote > 1.0 {
            return Err(AlgoError::invalid_item(
                "upper_asymptote",
                "must be at most 1",
            ));
        }
        Ok(())
    }
}

impl Default for ItemParams {
    fn default() -> Self {
        Self {
            difficulty: 0.0,
            discrimination: 1.0,
            guessing: 0.0,
            upper_asymptote: 1.0,
        }
    }
}

/// Closed interval used to clip ability and difficulty estimates
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScaleRange {
    pub min: f64,
    pub max: f64,
}

impl ScaleRange {
    pub fn new(min: f64, max: f64) -> Result<Self, AlgoError> {
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(AlgoError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Default ability range [-4, 4]
    pub fn ability() -> Self {
        Self {
            min: DEFAULT_ABILITY_MIN,
            max: DEFAULT_ABILITY_MAX,
        }
    }

    /// Default difficulty range [-3, 3]
    pub fn difficulty() -> Self {
        Self {
            min: -DEFAULT_DIFFICULTY_BOUND,
            max: DEFAULT_DIFFICULTY_BOUND,
        }
    }

    pub fn clip(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Default for ScaleRange {
    fn default() -> Self {
        Self::ability()
    }
}

/// Summary of a trailing window of graded attempts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccuracyWindow {
    /// Attempts in the window
    pub attempts: u32,
    /// Correct attempts in the window
    pub correct: u32,
}

impl AccuracyWindow {
    pub fn new(attempts: u32, correct: u32) -> Self {
        Self {
            attempts,
            correct: correct.min(attempts),
        }
    }

    /// Fraction correct; 0 for an empty window
    pub fn accuracy(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.correct as f64 / self.attempts as f64
        }
    }
}

/// Outcome of the adaptive-difficulty policy
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyAdjustment {
    Increase,
    Decrease,
    Unchanged,
    /// Not enough attempts in the window to decide
    Hold,
}

// ==================== Content Safety Types ====================

/// Result of a single-text compliance check
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceResult {
    pub sanitized_text: String,
    pub is_safe: bool,
    /// Human-readable findings, in detection order
    pub violations: Vec<String>,
    /// Clamped to [0, 1]
    pub risk_score: f64,
    pub redactions: usize,
}

/// Result of the two-field (title + description) submission check
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResult {
    pub is_safe: bool,
    pub violations: Vec<String>,
    pub sanitized_title: String,
    pub sanitized_description: String,
    pub risk_score: f64,
    pub redactions: usize,
}

// ==================== Gamification Types ====================

/// Per-learner point/level/streak ledger
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamificationState {
    pub total_points: u64,
    pub level: u32,
    pub streak_days: u32,
    /// Calendar day (UTC) of the last award; `None` before the first one
    pub last_activity_date: Option<NaiveDate>,
}

impl Default for GamificationState {
    fn default() -> Self {
        Self {
            total_points: 0,
            level: 1,
            streak_days: 0,
            last_activity_date: None,
        }
    }
}
