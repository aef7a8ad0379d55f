use std::sync::Arc;

use chrono::{DateTime, Utc};
use pedagogy_algo::{select_most_informative, DifficultyAdjustment, IrtEngine, ItemParams};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ServiceError;
use crate::services::item_bank::ItemBank;
use crate::services::learner_store::LearnerStore;

/// One graded attempt, for analytics downstream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    pub id: Uuid,
    pub learner_id: String,
    pub item_id: String,
    pub is_correct: bool,
    /// Predicted before the outcome was known
    pub probability: f64,
    pub ability_before: f64,
    pub ability_after: f64,
    pub difficulty_before: f64,
    pub difficulty_after: f64,
    pub target_difficulty: f64,
    pub adjustment: DifficultyAdjustment,
    pub graded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecommendation {
    pub item_id: String,
    pub information: f64,
    pub probability: f64,
    pub ability: f64,
    pub target_difficulty: f64,
}

pub struct AssessmentService {
    engine: IrtEngine,
    items: Arc<ItemBank>,
    learners: Arc<LearnerStore>,
}

impl AssessmentService {
    pub fn new(engine: IrtEngine, items: Arc<ItemBank>, learners: Arc<LearnerStore>) -> Self {
        Self {
            engine,
            items,
            learners,
        }
    }

    pub fn engine(&self) -> &IrtEngine {
        &self.engine
    }

    pub fn items(&self) -> &ItemBank {
        &self.items
    }

    pub fn add_item(&self, id: impl Into<String>, params: ItemParams) -> Result<(), ServiceError> {
        self.items.insert(id, params)
    }

    /// Grade one response: score it, update the learner's ability and
    /// difficulty target under the learner's lock, then recalibrate the item.
    pub fn grade_attempt(
        &self,
        learner_id: &str,
        item_id: &str,
        is_correct: bool,
        now: DateTime<Utc>,
    ) -> Result<AttemptRecord, ServiceError> {
        let item = self.items.params(item_id)?;

        let (ability_before, ability_after, probability, target_difficulty, adjustment) =
            self.learners.with_learner(learner_id, |learner| {
                let ability_before = learner.ability;
                let probability = self.engine.probability(ability_before, &item);
                let ability_after = self.engine.update_ability(ability_before, &item, is_correct);

                learner.window.record(is_correct);
                let step = self
                    .engine
                    .adjust_difficulty(learner.target_difficulty, &learner.window.summary());
                if matches!(
                    step.adjustment,
                    DifficultyAdjustment::Increase | DifficultyAdjustment::Decrease
                ) {
                    // The old window described the previous difficulty
                    learner.window.clear();
                }

                learner.ability = ability_after;
                learner.target_difficulty = step.difficulty;
                learner.attempts += 1;

                (ability_before, ability_after, probability, step.difficulty, step.adjustment)
            });

        let (difficulty_before, difficulty_after) = self.items.calibrate(item_id, |params| {
            self.engine
                .calibrate_difficulty(params, ability_before, is_correct)
        })?;

        tracing::debug!(
            learner_id,
            item_id,
            is_correct,
            probability,
            ability_before,
            ability_after,
            difficulty_after,
            "attempt graded"
        );
        if adjustment != DifficultyAdjustment::Unchanged && adjustment != DifficultyAdjustment::Hold {
            tracing::info!(
                learner_id,
                ?adjustment,
                target_difficulty,
                "adaptive difficulty changed"
            );
        }

        Ok(AttemptRecord {
            id: Uuid::new_v4(),
            learner_id: learner_id.to_string(),
            item_id: item_id.to_string(),
            is_correct,
            probability,
            ability_before,
            ability_after,
            difficulty_before,
            difficulty_after,
            target_difficulty,
            adjustment,
            graded_at: now,
        })
    }

    /// Current ability; the prior for unseen learners
    pub fn ability(&self, learner_id: &str) -> f64 {
        self.learners
            .snapshot(learner_id)
            .map(|record| record.ability)
            .unwrap_or_else(|| self.engine.initial_ability())
    }

    /// Most informative bank item at the learner's current ability
    pub fn next_item(&self, learner_id: &str) -> Option<ItemRecommendation> {
        let (ability, target_difficulty) = match self.learners.snapshot(learner_id) {
            Some(record) => (record.ability, record.target_difficulty),
            None => (self.engine.initial_ability(), 0.0),
        };

        let bank = self.items.snapshot();
        let params: Vec<ItemParams> = bank.iter().map(|(_, params)| *params).collect();
        let (idx, information) = select_most_informative(ability, &params)?;
        let (item_id, item) = &bank[idx];

        Some(ItemRecommendation {
            item_id: item_id.clone(),
            information,
            probability: self.engine.probability(ability, item),
            ability,
            target_difficulty,
        })
    }
}
