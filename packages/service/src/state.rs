use std::sync::Arc;

use pedagogy_algo::{ContentSafetyFilter, IrtEngine};

use crate::config::Config;
use crate::error::ServiceError;
use crate::services::assessment::AssessmentService;
use crate::services::compliance::ComplianceService;
use crate::services::item_bank::ItemBank;
use crate::services::learner_store::{LearnerDefaults, LearnerStore};
use crate::services::rewards::RewardService;

/// Shared handles for every service; cheap to clone.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    learners: Arc<LearnerStore>,
    assessment: Arc<AssessmentService>,
    compliance: ComplianceService,
    rewards: Arc<RewardService>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, ServiceError> {
        config.validate()?;
        let filter = ContentSafetyFilter::new(&config.safety_config()?)?;
        let engine = IrtEngine::new(config.irt.clone(), config.difficulty.clone());

        let learners = Arc::new(LearnerStore::new(LearnerDefaults {
            ability: config.irt.prior_ability,
            target_difficulty: config.difficulty.range.clip(0.0),
            window: config.accuracy_window,
        }));
        let assessment = AssessmentService::new(engine, Arc::new(ItemBank::new()), Arc::clone(&learners));

        tracing::info!(
            learning_rate = config.irt.learning_rate,
            accuracy_window = config.accuracy_window,
            max_scan_len = config.max_scan_len,
            "state initialized"
        );

        Ok(Self {
            rewards: Arc::new(RewardService::new(Arc::clone(&learners))),
            compliance: ComplianceService::new(Arc::new(filter)),
            assessment: Arc::new(assessment),
            learners,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn learners(&self) -> &LearnerStore {
        &self.learners
    }

    pub fn assessment(&self) -> &AssessmentService {
        &self.assessment
    }

    pub fn compliance(&self) -> &ComplianceService {
        &self.compliance
    }

    pub fn rewards(&self) -> &RewardService {
        &self.rewards
    }
}
