use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use pedagogy_algo::{AttemptWindow, GamificationState};
use serde::{Deserialize, Serialize};

/// Everything the core needs about one learner between calls
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerRecord {
    pub ability: f64,
    /// Difficulty the adaptive policy currently targets
    pub target_difficulty: f64,
    pub window: AttemptWindow,
    pub gamification: GamificationState,
    pub attempts: u64,
}

/// Starting values for learners seen for the first time
#[derive(Debug, Clone, Copy)]
pub struct LearnerDefaults {
    pub ability: f64,
    pub target_difficulty: f64,
    pub window: usize,
}

impl LearnerDefaults {
    fn record(&self) -> LearnerRecord {
        LearnerRecord {
            ability: self.ability,
            target_difficulty: self.target_difficulty,
            window: AttemptWindow::new(self.window),
            gamification: GamificationState::default(),
            attempts: 0,
        }
    }
}

/// In-memory learner state with one lock per learner.
///
/// Every read-modify-write goes through [`LearnerStore::with_learner`], so two
/// attempts graded concurrently for the same learner never lose an update.
/// Different learners do not contend.
#[derive(Debug)]
pub struct LearnerStore {
    defaults: LearnerDefaults,
    learners: RwLock<HashMap<String, Arc<Mutex<LearnerRecord>>>>,
}

impl LearnerStore {
    pub fn new(defaults: LearnerDefaults) -> Self {
        Self {
            defaults,
            learners: RwLock::new(HashMap::new()),
        }
    }

    fn slot(&self, learner_id: &str) -> Arc<Mutex<LearnerRecord>> {
        if let Some(slot) = self.learners.read().get(learner_id) {
            return Arc::clone(slot);
        }
        let mut learners = self.learners.write();
        Arc::clone(
            learners
                .entry(learner_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(self.defaults.record()))),
        )
    }

    /// Run `f` with exclusive access to the learner's record, creating it on
    /// first use.
    pub fn with_learner<R>(&self, learner_id: &str, f: impl FnOnce(&mut LearnerRecord) -> R) -> R {
        let slot = self.slot(learner_id);
        let mut record = slot.lock();
        f(&mut *record)
    }

    pub fn snapshot(&self, learner_id: &str) -> Option<LearnerRecord> {
        let slot = self.learners.read().get(learner_id).map(Arc::clone)?;
        let record = slot.lock().clone();
        Some(record)
    }

    pub fn len(&self) -> usize {
        self.learners.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.learners.read().is_empty()
    }
}
