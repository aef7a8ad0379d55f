use std::sync::Arc;

use chrono::{DateTime, Utc};
use pedagogy_algo::{award_points, levels_gained, GamificationState};
use serde::{Deserialize, Serialize};

use crate::services::learner_store::LearnerStore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardOutcome {
    pub learner_id: String,
    pub points: u32,
    pub state: GamificationState,
    pub levels_gained: u32,
    pub leveled_up: bool,
}

pub struct RewardService {
    learners: Arc<LearnerStore>,
}

impl RewardService {
    pub fn new(learners: Arc<LearnerStore>) -> Self {
        Self { learners }
    }

    /// Apply one award under the learner's lock so concurrent awards add up
    pub fn award(&self, learner_id: &str, points: u32, now: DateTime<Utc>) -> AwardOutcome {
        let (before, after) = self.learners.with_learner(learner_id, |learner| {
            let before = learner.gamification.clone();
            learner.gamification = award_points(&before, points, now);
            (before, learner.gamification.clone())
        });

        let gained = levels_gained(&before, &after);
        AwardOutcome {
            learner_id: learner_id.to_string(),
            points,
            state: after,
            levels_gained: gained,
            leveled_up: gained > 0,
        }
    }

    pub fn state(&self, learner_id: &str) -> GamificationState {
        self.learners
            .snapshot(learner_id)
            .map(|record| record.gamification)
            .unwrap_or_default()
    }
}
