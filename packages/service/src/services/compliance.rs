use std::sync::Arc;

use pedagogy_algo::{ComplianceResult, ContentContext, ContentSafetyFilter, SubmissionResult};

/// Entry points for the three places text crosses a trust boundary:
/// learner input, model output and marketplace listings.
#[derive(Debug, Clone)]
pub struct ComplianceService {
    filter: Arc<ContentSafetyFilter>,
}

impl ComplianceService {
    pub fn new(filter: Arc<ContentSafetyFilter>) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> &ContentSafetyFilter {
        &self.filter
    }

    pub fn check(&self, text: &str, context: &ContentContext) -> ComplianceResult {
        let result = self.filter.sanitize(text, context);
        if !result.is_safe {
            tracing::info!(
                context = %context,
                violations = result.violations.len(),
                risk_score = result.risk_score,
                "content flagged"
            );
        }
        result
    }

    pub fn check_learner_input(&self, text: &str) -> ComplianceResult {
        self.check(text, &ContentContext::LearnerInput)
    }

    /// Generated text is filtered before it reaches a learner
    pub fn check_ai_output(&self, text: &str) -> ComplianceResult {
        self.check(text, &ContentContext::AiOutput)
    }

    pub fn validate_listing(&self, title: &str, description: &str) -> SubmissionResult {
        let result = self.filter.validate_content_submission(title, description);
        if !result.is_safe {
            tracing::info!(
                violations = result.violations.len(),
                risk_score = result.risk_score,
                "listing rejected"
            );
        }
        result
    }
}

impl Default for ComplianceService {
    fn default() -> Self {
        Self::new(Arc::new(ContentSafetyFilter::default()))
    }
}
