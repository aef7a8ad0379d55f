//! Item Response Theory Engine
//!
//! Four-parameter logistic (4PL) scoring with online ability and difficulty updates.
//!
//! Core formula:
//! - P(θ) = c + (d - c) / (1 + exp(-a(θ - b)))
//!
//! where b is difficulty, a discrimination, c the guessing floor and d the
//! upper asymptote. 2PL and 3PL items are the special cases c = 0, d = 1 and
//! d = 1.
//!
//! Updates are a single stochastic-gradient step on the response
//! log-likelihood: a correct answer moves ability up and the item's difficulty
//! down, scaled by the discrimination and by how surprising the outcome was.

use std::collections::VecDeque;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::sanitize::{clamp_exponent, open_unit, sanitize_ability, sanitize_learning_rate};
use crate::types::{
    AccuracyWindow, DifficultyAdjustment, ItemParams, ScaleRange, DEFAULT_LEARNING_RATE, EPSILON,
};

// ==================== Configuration ====================

/// Ability/difficulty update configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IrtConfig {
    /// Range ability estimates are clipped to (default [-4, 4])
    pub ability_range: ScaleRange,
    /// Range calibrated difficulties are clipped to (default [-3, 3])
    pub difficulty_range: ScaleRange,
    /// Ability assigned on first attempt, and the fallback for NaN
    pub prior_ability: f64,
    /// Step size for both ability and difficulty updates
    pub learning_rate: f64,
}

impl Default for IrtConfig {
    fn default() -> Self {
        Self {
            ability_range: ScaleRange::ability(),
            difficulty_range: ScaleRange::difficulty(),
            prior_ability: 0.0,
            learning_rate: DEFAULT_LEARNING_RATE,
        }
    }
}

/// Adaptive difficulty stepping thresholds
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyPolicy {
    /// Accuracy strictly above this raises difficulty
    pub increase_threshold: f64,
    /// Accuracy strictly below this lowers difficulty
    pub decrease_threshold: f64,
    /// Fixed step on the theta scale
    pub step: f64,
    /// Minimum attempts in the window before any adjustment
    pub min_attempts: u32,
    pub range: ScaleRange,
}

impl Default for DifficultyPolicy {
    fn default() -> Self {
        Self {
            increase_threshold: 0.8,
            decrease_threshold: 0.5,
            step: 0.5,
            min_attempts: 5,
            range: ScaleRange::difficulty(),
        }
    }
}

/// New target difficulty plus the decision that produced it
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyStep {
    pub difficulty: f64,
    pub adjustment: DifficultyAdjustment,
}

// ==================== Scoring ====================

/// Probability of a correct response under the 4PL model.
///
/// Always within `[guessing, upper_asymptote]`; the exponent is clamped so
/// extreme abilities saturate instead of overflowing.
pub fn probability_correct(ability: f64, item: &ItemParams) -> f64 {
    let z = clamp_exponent(item.discrimination * (ability - item.difficulty));
    let span = item.upper_asymptote - item.guessing;
    let p = item.guessing + span / (1.0 + (-z).exp());
    p.clamp(item.guessing, item.upper_asymptote)
}

/// Fisher information of the item at `ability`
pub fn item_information(ability: f64, item: &ItemParams) -> f64 {
    let span = item.upper_asymptote - item.guessing;
    if span < EPSILON {
        return 0.0;
    }
    let p = probability_correct(ability, item);
    let numerator = item.discrimination.powi(2)
        * (p - item.guessing).powi(2)
        * (item.upper_asymptote - p).powi(2);
    let q = open_unit(p);
    numerator / (span.powi(2) * q * (1.0 - q))
}

/// Index and information of the most informative item at `ability`.
///
/// Ties resolve to the lowest index. Returns `None` for an empty bank.
pub fn select_most_informative(ability: f64, items: &[ItemParams]) -> Option<(usize, f64)> {
    items
        .par_iter()
        .enumerate()
        .map(|(idx, item)| (idx, item_information(ability, item)))
        .reduce_with(|best, candidate| if candidate.1 > best.1 { candidate } else { best })
}

fn outcome_residual(ability: f64, item: &ItemParams, is_correct: bool) -> f64 {
    let outcome = if is_correct { 1.0 } else { 0.0 };
    outcome - probability_correct(ability, item)
}

// ==================== Updates ====================

/// One-step ability update clipped to the default [-4, 4] range.
///
/// `ability_after = ability_before + learning_rate * a * (outcome - P)`
pub fn update_ability(
    ability_before: f64,
    item: &ItemParams,
    is_correct: bool,
    learning_rate: f64,
) -> f64 {
    update_ability_within(
        ability_before,
        item,
        is_correct,
        learning_rate,
        &ScaleRange::ability(),
        0.0,
    )
}

/// Ability update with an explicit clip range and NaN fallback.
pub fn update_ability_within(
    ability_before: f64,
    item: &ItemParams,
    is_correct: bool,
    learning_rate: f64,
    range: &ScaleRange,
    prior: f64,
) -> f64 {
    let theta = sanitize_ability(ability_before, prior, range);
    let rate = sanitize_learning_rate(learning_rate);
    let residual = outcome_residual(theta, item, is_correct);
    range.clip(theta + rate * item.discrimination * residual)
}

/// Mirror-image difficulty update used for online item calibration.
///
/// A correct answer lowers the difficulty, an incorrect one raises it.
pub fn calibrate_difficulty(
    item: &ItemParams,
    ability: f64,
    is_correct: bool,
    learning_rate: f64,
    range: &ScaleRange,
) -> f64 {
    let rate = sanitize_learning_rate(learning_rate);
    let residual = outcome_residual(ability, item, is_correct);
    range.clip(item.difficulty - rate * item.discrimination * residual)
}

/// Adaptive difficulty policy over a trailing window summary.
pub fn adjust_difficulty(
    current_difficulty: f64,
    window: &AccuracyWindow,
    policy: &DifficultyPolicy,
) -> DifficultyStep {
    let current = sanitize_ability(current_difficulty, 0.0, &policy.range);
    if window.attempts < policy.min_attempts {
        return DifficultyStep {
            difficulty: current,
            adjustment: DifficultyAdjustment::Hold,
        };
    }

    let accuracy = window.accuracy();
    let (delta, adjustment) = if accuracy > policy.increase_threshold {
        (policy.step, DifficultyAdjustment::Increase)
    } else if accuracy < policy.decrease_threshold {
        (-policy.step, DifficultyAdjustment::Decrease)
    } else {
        (0.0, DifficultyAdjustment::Unchanged)
    };

    DifficultyStep {
        difficulty: policy.range.clip(current + delta),
        adjustment,
    }
}

// ==================== Engine ====================

/// Stateless scorer carrying its configuration
#[derive(Clone, Debug, Default)]
pub struct IrtEngine {
    config: IrtConfig,
    policy: DifficultyPolicy,
}

impl IrtEngine {
    pub fn new(config: IrtConfig, policy: DifficultyPolicy) -> Self {
        Self { config, policy }
    }

    pub fn config(&self) -> &IrtConfig {
        &self.config
    }

    pub fn policy(&self) -> &DifficultyPolicy {
        &self.policy
    }

    /// Starting ability for a learner with no history
    pub fn initial_ability(&self) -> f64 {
        self.config.ability_range.clip(self.config.prior_ability)
    }

    pub fn probability(&self, ability: f64, item: &ItemParams) -> f64 {
        let theta = sanitize_ability(
            ability,
            self.config.prior_ability,
            &self.config.ability_range,
        );
        probability_correct(theta, item)
    }

    pub fn update_ability(&self, ability_before: f64, item: &ItemParams, is_correct: bool) -> f64 {
        update_ability_within(
            ability_before,
            item,
            is_correct,
            self.config.learning_rate,
            &self.config.ability_range,
            self.config.prior_ability,
        )
    }

    pub fn calibrate_difficulty(&self, item: &ItemParams, ability: f64, is_correct: bool) -> f64 {
        calibrate_difficulty(
            item,
            ability,
            is_correct,
            self.config.learning_rate,
            &self.config.difficulty_range,
        )
    }

    pub fn adjust_difficulty(&self, current_difficulty: f64, window: &AccuracyWindow) -> DifficultyStep {
        adjust_difficulty(current_difficulty, window, &self.policy)
    }
}

// ==================== Trailing Window ====================

/// Fixed-capacity record of recent outcomes. A capacity of 0 (possible
/// only through deserialization) behaves as 1.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AttemptWindow {
    capacity: usize,
    outcomes: VecDeque<bool>,
}

impl AttemptWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            outcomes: VecDeque::with_capacity(capacity),
        }
    }

    pub fn record(&mut self, is_correct: bool) {
        let capacity = self.capacity.max(1);
        while self.outcomes.len() >= capacity {
            self.outcomes.pop_front();
        }
        self.outcomes.push_back(is_correct);
    }

    pub fn summary(&self) -> AccuracyWindow {
        let correct = self.outcomes.iter().filter(|&&c| c).count();
        AccuracyWindow::new(self.outcomes.len() as u32, correct as u32)
    }

    /// Start a fresh window after a difficulty change
    pub fn clear(&mut self) {
        self.outcomes.clear();
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}
