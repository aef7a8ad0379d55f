//! Content Safety Filter
//!
//! Classifies and redacts free text before it is stored or displayed.
//!
//! Categories, in violation-message order:
//! 1. PII (email, phone, SSN, credit card) - redacted in place
//! 2. Profanity - offending tokens censored
//! 3. Prohibited keywords - case-insensitive substring
//! 4. Scam indicators - flagged only when at least two distinct ones appear
//! 5. Credential leakage - values redacted, keys kept
//!
//! The risk score is an order-independent sum of fixed weights clamped to
//! [0, 1]. Text is unsafe when any violation was recorded or the score
//! reaches 0.5; both conditions are checked.
//!
//! Matching uses the `regex` crate, which runs in linear time, so no input
//! can trigger catastrophic backtracking. Input longer than
//! `max_scan_len` bytes is scanned up to the cap and the rest is dropped
//! behind a truncation marker.

pub mod keywords;
pub mod patterns;
pub mod profanity;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use keywords::{KeywordSet, DEFAULT_PROHIBITED_KEYWORDS, DEFAULT_SCAM_INDICATORS};
pub use patterns::{redact_pii, redact_secrets, CategoryHits, PiiCategory, PII_RULES};
pub use profanity::{ProfanityCensor, DEFAULT_PROFANITY_WORDS};

use crate::error::AlgoError;
use crate::sanitize::split_at_char_boundary;
use crate::types::{ComplianceResult, SubmissionResult};

// ==================== Risk Weights ====================

pub const PII_TITLE_WEIGHT: f64 = 0.3;
pub const PII_DESCRIPTION_WEIGHT: f64 = 0.3;
pub const PROFANITY_TITLE_WEIGHT: f64 = 0.4;
pub const PROFANITY_DESCRIPTION_WEIGHT: f64 = 0.3;
/// Per matched keyword
pub const PROHIBITED_KEYWORD_WEIGHT: f64 = 0.5;
pub const SCAM_WEIGHT: f64 = 0.6;
pub const CREDENTIAL_WEIGHT: f64 = 0.3;

pub const MIN_SCAM_INDICATORS: usize = 2;
pub const UNSAFE_RISK_THRESHOLD: f64 = 0.5;

pub const DEFAULT_MAX_SCAN_LEN: usize = 100_000;
pub const TRUNCATION_MARKER: &str = "[TRUNCATED]";

// ==================== Configuration ====================

/// Where a piece of text came from; only used as a log label
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentContext {
    #[default]
    General,
    LearnerInput,
    AiOutput,
    Marketplace,
    Custom(String),
}

impl ContentContext {
    pub fn as_str(&self) -> &str {
        match self {
            Self::General => "general",
            Self::LearnerInput => "learner_input",
            Self::AiOutput => "ai_output",
            Self::Marketplace => "marketplace",
            Self::Custom(label) => label,
        }
    }
}

impl fmt::Display for ContentContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyConfig {
    pub prohibited_keywords: Vec<String>,
    pub scam_indicators: Vec<String>,
    pub profanity_words: Vec<String>,
    /// Bytes scanned per field before truncation
    pub max_scan_len: usize,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        fn owned(words: &[&str]) -> Vec<String> {
            words.iter().map(|w| w.to_string()).collect()
        }
        Self {
            prohibited_keywords: owned(DEFAULT_PROHIBITED_KEYWORDS),
            scam_indicators: owned(DEFAULT_SCAM_INDICATORS),
            profanity_words: owned(DEFAULT_PROFANITY_WORDS),
            max_scan_len: DEFAULT_MAX_SCAN_LEN,
        }
    }
}

// ==================== Filter ====================

/// Stateless compliance checker; build once and share by reference.
#[derive(Clone, Debug)]
pub struct ContentSafetyFilter {
    censor: ProfanityCensor,
    prohibited: KeywordSet,
    scam: KeywordSet,
    max_scan_len: usize,
}

impl Default for ContentSafetyFilter {
    fn default() -> Self {
        Self {
            censor: ProfanityCensor::default(),
            prohibited: KeywordSet::prohibited(),
            scam: KeywordSet::scam_indicators(),
            max_scan_len: DEFAULT_MAX_SCAN_LEN,
        }
    }
}

/// Per-field redaction pass
struct FieldScan {
    sanitized: String,
    /// Lowercased scanned portion of the original text, for keyword matching
    lowered: String,
    pii: Vec<CategoryHits<PiiCategory>>,
    profanity: usize,
    secrets: Vec<CategoryHits<&'static str>>,
    truncated: bool,
    redactions: usize,
}

/// Running violation list and score for one call
struct Findings<'a> {
    context: &'a str,
    violations: Vec<String>,
    risk: f64,
}

impl<'a> Findings<'a> {
    fn new(context: &'a str) -> Self {
        Self {
            context,
            violations: Vec::new(),
            risk: 0.0,
        }
    }

    fn record(&mut self, category: &'static str, message: String, weight: f64) {
        tracing::warn!(
            context = self.context,
            category,
            weight,
            violation = %message,
            "content safety violation detected"
        );
        self.violations.push(message);
        self.risk += weight;
    }

    fn risk_score(&self) -> f64 {
        self.risk.clamp(0.0, 1.0)
    }

    fn is_safe(&self) -> bool {
        self.violations.is_empty() && self.risk_score() < UNSAFE_RISK_THRESHOLD
    }
}

fn field_suffix(field: Option<&str>) -> String {
    field.map(|f| format!(" in {f}")).unwrap_or_default()
}

impl ContentSafetyFilter {
    pub fn new(config: &SafetyConfig) -> Result<Self, AlgoError> {
        Ok(Self {
            censor: ProfanityCensor::new(&config.profanity_words)?,
            prohibited: KeywordSet::new(&config.prohibited_keywords),
            scam: KeywordSet::new(&config.scam_indicators),
            max_scan_len: config.max_scan_len.max(1),
        })
    }

    /// Single-text check.
    pub fn sanitize(&self, text: &str, context: &ContentContext) -> ComplianceResult {
        if text.is_empty() {
            return ComplianceResult {
                is_safe: true,
                ..ComplianceResult::default()
            };
        }

        let scan = self.scan_field(text);
        let mut findings = Findings::new(context.as_str());
        let mut credential_weight = CREDENTIAL_WEIGHT;

        Self::record_pii(&mut findings, &scan, None, PII_TITLE_WEIGHT);
        if scan.profanity > 0 {
            findings.record(
                "profanity",
                "Profanity detected".to_string(),
                PROFANITY_TITLE_WEIGHT,
            );
        }
        self.record_keywords(&mut findings, &scan.lowered);
        self.record_scam(&mut findings, &scan.lowered);
        Self::record_secrets(&mut findings, &scan, None, &mut credential_weight);
        self.record_truncation(&mut findings, &scan, None);

        let result = ComplianceResult {
            is_safe: findings.is_safe(),
            risk_score: findings.risk_score(),
            violations: findings.violations,
            redactions: scan.redactions,
            sanitized_text: scan.sanitized,
        };
        tracing::debug!(
            context = context.as_str(),
            is_safe = result.is_safe,
            risk_score = result.risk_score,
            redactions = result.redactions,
            "text sanitized"
        );
        result
    }

    /// Two-field (title + description) marketplace check.
    ///
    /// PII and profanity are weighted per field; keywords and scam
    /// indicators are matched against the combined text.
    pub fn validate_content_submission(&self, title: &str, description: &str) -> SubmissionResult {
        let title_scan = self.scan_field(title);
        let description_scan = self.scan_field(description);
        let context = ContentContext::Marketplace;
        let mut findings = Findings::new(context.as_str());
        let mut credential_weight = CREDENTIAL_WEIGHT;

        Self::record_pii(&mut findings, &title_scan, Some("title"), PII_TITLE_WEIGHT);
        Self::record_pii(
            &mut findings,
            &description_scan,
            Some("description"),
            PII_DESCRIPTION_WEIGHT,
        );
        if title_scan.profanity > 0 {
            findings.record(
                "profanity",
                "Profanity detected in title".to_string(),
                PROFANITY_TITLE_WEIGHT,
            );
        }
        if description_scan.profanity > 0 {
            findings.record(
                "profanity",
                "Profanity detected in description".to_string(),
                PROFANITY_DESCRIPTION_WEIGHT,
            );
        }

        let combined = format!("{} {}", title_scan.lowered, description_scan.lowered);
        self.record_keywords(&mut findings, &combined);
        self.record_scam(&mut findings, &combined);

        Self::record_secrets(&mut findings, &title_scan, Some("title"), &mut credential_weight);
        Self::record_secrets(
            &mut findings,
            &description_scan,
            Some("description"),
            &mut credential_weight,
        );
        self.record_truncation(&mut findings, &title_scan, Some("title"));
        self.record_truncation(&mut findings, &description_scan, Some("description"));

        SubmissionResult {
            is_safe: findings.is_safe(),
            risk_score: findings.risk_score(),
            violations: findings.violations,
            redactions: title_scan.redactions + description_scan.redactions,
            sanitized_title: title_scan.sanitized,
            sanitized_description: description_scan.sanitized,
        }
    }

    // ==================== Passes ====================

    fn scan_field(&self, text: &str) -> FieldScan {
        let (head, tail) = split_at_char_boundary(text, self.max_scan_len);

        let (redacted, pii) = redact_pii(head);
        let (censored, profanity) = self.censor.censor(&redacted);
        let (mut sanitized, secrets) = redact_secrets(&censored);

        let truncated = !tail.is_empty();
        if truncated {
            sanitized.push_str(TRUNCATION_MARKER);
        }

        let redactions = pii.iter().map(|h| h.count).sum::<usize>()
            + profanity
            + secrets.iter().map(|h| h.count).sum::<usize>();

        FieldScan {
            sanitized,
            lowered: head.to_lowercase(),
            pii,
            profanity,
            secrets,
            truncated,
            redactions,
        }
    }

    fn record_pii(findings: &mut Findings<'_>, scan: &FieldScan, field: Option<&str>, weight: f64) {
        let suffix = field_suffix(field);
        for (idx, hit) in scan.pii.iter().enumerate() {
            // One weight per field regardless of how many PII kinds matched
            let weight = if idx == 0 { weight } else { 0.0 };
            findings.record(
                "pii",
                format!("PII detected{suffix}: {}", hit.kind.as_str()),
                weight,
            );
        }
    }

    fn record_keywords(&self, findings: &mut Findings<'_>, lowered: &str) {
        for keyword in self.prohibited.find_in(lowered) {
            findings.record(
                "prohibited_keyword",
                format!("Prohibited content: {keyword}"),
                PROHIBITED_KEYWORD_WEIGHT,
            );
        }
    }

    fn record_scam(&self, findings: &mut Findings<'_>, lowered: &str) {
        let indicators = self.scam.find_in(lowered);
        if indicators.len() >= MIN_SCAM_INDICATORS {
            findings.record(
                "scam",
                format!("Scam indicators detected: {}", indicators.join(", ")),
                SCAM_WEIGHT,
            );
        }
    }

    fn record_secrets(
        findings: &mut Findings<'_>,
        scan: &FieldScan,
        field: Option<&str>,
        weight: &mut f64,
    ) {
        let suffix = field_suffix(field);
        for hit in &scan.secrets {
            findings.record(
                "credential",
                format!("Credential detected{suffix}: {}", hit.kind),
                *weight,
            );
            *weight = 0.0;
        }
    }

    fn record_truncation(&self, findings: &mut Findings<'_>, scan: &FieldScan, field: Option<&str>) {
        if scan.truncated {
            findings.record(
                "truncation",
                format!(
                    "Text{} exceeds {} bytes; remainder not scanned",
                    field_suffix(field),
                    self.max_scan_len
                ),
                0.0,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> ContentSafetyFilter {
        ContentSafetyFilter::default()
    }

    // ==================== sanitize ====================

    #[test]
    fn test_sanitize_empty() {
        let result = filter().sanitize("", &ContentContext::LearnerInput);
        assert_eq!(result.sanitized_text, "");
        assert!(result.is_safe);
        assert!(result.violations.is_empty());
        assert_eq!(result.redactions, 0);
        assert_eq!(result.risk_score, 0.0);
    }

    #[test]
    fn test_sanitize_email() {
        let result = filter().sanitize(
            "Contact me at john.doe@example.com for help",
            &ContentContext::LearnerInput,
        );
        assert!(!result.is_safe);
        assert_eq!(result.violations, vec!["PII detected: email".to_string()]);
        assert!(result.sanitized_text.contains("[REDACTED_EMAIL]"));
        assert!(!result.sanitized_text.contains("john.doe@example.com"));
        assert_eq!(result.redactions, 1);
        assert!((result.risk_score - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_sanitize_ssn() {
        let result = filter().sanitize("My SSN is 123-45-6789", &ContentContext::AiOutput);
        assert!(!result.is_safe);
        assert_eq!(result.sanitized_text, "My SSN is [REDACTED_SSN]");
        assert!(!result.sanitized_text.contains("123-45-6789"));
    }

    #[test]
    fn test_sanitize_pii_weight_counted_once() {
        let result = filter().sanitize(
            "mail a@b.com or call 555-123-4567, ssn 123-45-6789",
            &ContentContext::General,
        );
        assert_eq!(
            result.violations,
            vec![
                "PII detected: email".to_string(),
                "PII detected: phone".to_string(),
                "PII detected: ssn".to_string(),
            ]
        );
        assert_eq!(result.redactions, 3);
        assert!((result.risk_score - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_sanitize_profanity_is_censored_not_rejected() {
        let result = filter().sanitize("this quiz is damn hard", &ContentContext::LearnerInput);
        assert_eq!(result.sanitized_text, "this quiz is **** hard");
        assert_eq!(result.violations, vec!["Profanity detected".to_string()]);
        assert!((result.risk_score - 0.4).abs() < 1e-12);
        assert!(!result.is_safe);
    }

    #[test]
    fn test_sanitize_credentials_redacted() {
        let result = filter().sanitize("my password=hunter2", &ContentContext::LearnerInput);
        assert_eq!(result.sanitized_text, "my password=[REDACTED_SECRET]");
        assert_eq!(result.violations, vec!["Credential detected: password".to_string()]);
        assert_eq!(result.redactions, 1);
    }

    #[test]
    fn test_sanitize_clean_text_idempotent() {
        let text = "Photosynthesis converts light into chemical energy.";
        let first = filter().sanitize(text, &ContentContext::AiOutput);
        let second = filter().sanitize(&first.sanitized_text, &ContentContext::AiOutput);
        assert_eq!(first.sanitized_text, text);
        assert_eq!(second.sanitized_text, text);
        assert!(first.is_safe && second.is_safe);
    }

    #[test]
    fn test_sanitize_redacted_output_stays_redacted() {
        let first = filter().sanitize("reach me at a@b.com", &ContentContext::General);
        let second = filter().sanitize(&first.sanitized_text, &ContentContext::General);
        assert_eq!(second.sanitized_text, first.sanitized_text);
        assert!(second.is_safe);
    }

    #[test]
    fn test_sanitize_keyword_weights_clamp() {
        let result = filter().sanitize(
            "stolen answers, plagiarized essays",
            &ContentContext::General,
        );
        assert_eq!(result.violations.len(), 2);
        assert_eq!(result.risk_score, 1.0);
    }

    #[test]
    fn test_sanitize_truncates_long_text() {
        let config = SafetyConfig {
            max_scan_len: 10,
            ..SafetyConfig::default()
        };
        let filter = ContentSafetyFilter::new(&config).unwrap();
        let result = filter.sanitize("abcdefghij email a@b.com", &ContentContext::General);
        assert_eq!(result.sanitized_text, "abcdefghij[TRUNCATED]");
        assert!(!result.is_safe);
        assert_eq!(result.risk_score, 0.0);
        assert!(result.violations[0].contains("not scanned"));
    }

    #[test]
    fn test_sanitize_non_ascii() {
        let result = filter().sanitize("日本語のテキスト 🚀 ünïcödé", &ContentContext::General);
        assert!(result.is_safe);
        assert_eq!(result.sanitized_text, "日本語のテキスト 🚀 ünïcödé");
    }

    #[test]
    fn test_sanitize_prefixed_credential_keys() {
        for input in ["DB_PASSWORD=hunter2", "client_secret: abc123xyz", "AWS_SECRET=AKIAXYZ", "my_api_key=zzz"] {
            let result = filter().sanitize(input, &ContentContext::LearnerInput);
            assert!(!result.is_safe, "failed for {input}");
            assert!(result.sanitized_text.ends_with("[REDACTED_SECRET]"), "failed for {input}");
            assert_eq!(result.violations.len(), 1);
            assert!((result.risk_score - CREDENTIAL_WEIGHT).abs() < 1e-12);
        }
    }

    // ==================== validate_content_submission ====================

    #[test]
    fn test_submission_empty_fields() {
        let result = filter().validate_content_submission("", "");
        assert!(result.is_safe);
        assert!(result.violations.is_empty());
        assert_eq!(result.sanitized_title, "");
        assert_eq!(result.sanitized_description, "");
        assert_eq!(result.redactions, 0);
        assert_eq!(result.risk_score, 0.0);
    }

    #[test]
    fn test_submission_credential_weight_applied_once() {
        let result = filter().validate_content_submission("password=abc", "api_key=xyz");
        assert_eq!(
            result.violations,
            vec![
                "Credential detected in title: password".to_string(),
                "Credential detected in description: api_key".to_string(),
            ]
        );
        assert!((result.risk_score - 0.3).abs() < 1e-12);
        assert!(!result.is_safe);
        assert_eq!(result.sanitized_title, "password=[REDACTED_SECRET]");
        assert_eq!(result.sanitized_description, "api_key=[REDACTED_SECRET]");
        assert_eq!(result.redactions, 2);
    }

    #[test]
    fn test_submission_prohibited_content() {
        let result = filter().validate_content_submission(
            "Pirated Content Collection",
            "Access to cracked software and illegal downloads",
        );
        assert!(!result.is_safe);
        assert!(result.violations.len() >= 2);
        assert!(result.risk_score >= 0.5);
        assert_eq!(result.risk_score, 1.0);
    }

    #[test]
    fn test_submission_single_scam_phrase_not_flagged() {
        let result = filter()
            .validate_content_submission("Study guide", "Try it with no risk for a week");
        assert!(result.is_safe);
        assert!(result.violations.is_empty());
        assert_eq!(result.risk_score, 0.0);
    }

    #[test]
    fn test_submission_two_scam_phrases_flagged() {
        let result = filter().validate_content_submission(
            "Guaranteed money course",
            "100% guaranteed results",
        );
        assert!(!result.is_safe);
        assert_eq!(
            result.violations,
            vec!["Scam indicators detected: guaranteed money, 100% guaranteed".to_string()]
        );
        assert!((result.risk_score - SCAM_WEIGHT).abs() < 1e-12);
    }

    #[test]
    fn test_submission_pii_weighted_per_field() {
        let result = filter().validate_content_submission(
            "Email tutor@site.com",
            "or call 555-123-4567",
        );
        assert_eq!(
            result.violations,
            vec![
                "PII detected in title: email".to_string(),
                "PII detected in description: phone".to_string(),
            ]
        );
        assert!((result.risk_score - 0.6).abs() < 1e-12);
        assert!(!result.is_safe);
        assert_eq!(result.sanitized_title, "Email [REDACTED_EMAIL]");
        assert_eq!(result.sanitized_description, "or call [REDACTED_PHONE]");
    }

    #[test]
    fn test_submission_profanity_weights_differ_by_field() {
        let title_only = filter().validate_content_submission("damn good notes", "clean");
        let description_only = filter().validate_content_submission("notes", "damn good");
        assert!((title_only.risk_score - PROFANITY_TITLE_WEIGHT).abs() < 1e-12);
        assert!((description_only.risk_score - PROFANITY_DESCRIPTION_WEIGHT).abs() < 1e-12);
    }

    #[test]
    fn test_submission_keywords_span_fields() {
        let result = filter().validate_content_submission("Copyright", "infringement notice");
        // The join inserts a space between the fields
        assert_eq!(
            result.violations,
            vec!["Prohibited content: copyright infringement".to_string()]
        );
    }

    #[test]
    fn test_submission_clean() {
        let result = filter().validate_content_submission(
            "Organic Chemistry Flashcards",
            "200 cards covering reaction mechanisms",
        );
        assert!(result.is_safe);
        assert_eq!(result.sanitized_title, "Organic Chemistry Flashcards");
        assert_eq!(result.redactions, 0);
    }

    // ==================== config ====================

    #[test]
    fn test_custom_config_lists() {
        let config = SafetyConfig {
            prohibited_keywords: vec!["answer key".to_string()],
            scam_indicators: vec![],
            profanity_words: vec!["heck".to_string()],
            max_scan_len: DEFAULT_MAX_SCAN_LEN,
        };
        let filter = ContentSafetyFilter::new(&config).unwrap();
        let result = filter.sanitize("heck, selling the Answer Key", &ContentContext::Marketplace);
        assert_eq!(result.sanitized_text, "****, selling the Answer Key");
        assert_eq!(
            result.violations,
            vec![
                "Profanity detected".to_string(),
                "Prohibited content: answer key".to_string(),
            ]
        );
    }

    #[test]
    fn test_context_labels() {
        assert_eq!(ContentContext::LearnerInput.as_str(), "learner_input");
        assert_eq!(ContentContext::Custom("tutor_chat".into()).to_string(), "tutor_chat");
    }
}
