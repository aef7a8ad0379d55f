//! Declarative PII and credential rules.
//!
//! Rules are applied in table order, which fixes the order of violation
//! messages. New categories are a new table row.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PiiCategory {
    Email,
    Phone,
    Ssn,
    CreditCard,
}

impl PiiCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Ssn => "ssn",
            Self::CreditCard => "credit_card",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct PiiRule {
    pub category: PiiCategory,
    pub pattern: &'static str,
    pub redaction_label: &'static str,
}

pub const PII_RULES: [PiiRule; 4] = [
    PiiRule {
        category: PiiCategory::Email,
        pattern: r"\b[\w.+-]+@[\w-]+(?:\.[\w-]+)+\b",
        redaction_label: "[REDACTED_EMAIL]",
    },
    PiiRule {
        category: PiiCategory::Phone,
        pattern: r"(?:\+?1[-.\s]?)?(?:\(\d{3}\)|\b\d{3})[-.\s]?\d{3}[-.\s]?\d{4}\b",
        redaction_label: "[REDACTED_PHONE]",
    },
    PiiRule {
        category: PiiCategory::Ssn,
        pattern: r"\b\d{3}-\d{2}-\d{4}\b",
        redaction_label: "[REDACTED_SSN]",
    },
    PiiRule {
        category: PiiCategory::CreditCard,
        pattern: r"\b(?:\d{4}[-\s]?){3}\d{4}\b|\b\d{4}[-\s]?\d{6}[-\s]?\d{5}\b",
        redaction_label: "[REDACTED_CREDIT_CARD]",
    },
];

#[derive(Clone, Copy, Debug)]
pub struct SecretRule {
    pub kind: &'static str,
    pub pattern: &'static str,
}

pub const SECRET_RULES: [SecretRule; 2] = [
    SecretRule {
        kind: "password",
        pattern: r"(?i)(password|passwd|pwd)(\s*[:=]\s*)(\S+)",
    },
    SecretRule {
        kind: "api_key",
        pattern: r"(?i)(api[_-]?key|secret)(\s*[:=]\s*)(\S+)",
    },
];

pub const SECRET_REDACTION_LABEL: &str = "[REDACTED_SECRET]";

// A rule that fails to compile is skipped; test_all_rules_compile pins the count.
static COMPILED_PII: Lazy<Vec<(PiiRule, Regex)>> = Lazy::new(|| {
    PII_RULES
        .iter()
        .filter_map(|rule| Regex::new(rule.pattern).ok().map(|re| (*rule, re)))
        .collect()
});

static COMPILED_SECRETS: Lazy<Vec<(SecretRule, Regex)>> = Lazy::new(|| {
    SECRET_RULES
        .iter()
        .filter_map(|rule| Regex::new(rule.pattern).ok().map(|re| (*rule, re)))
        .collect()
});

/// Matches of one category within one text
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CategoryHits<K> {
    pub kind: K,
    pub count: usize,
}

/// Replace every PII occurrence with its category label.
pub fn redact_pii(text: &str) -> (String, Vec<CategoryHits<PiiCategory>>) {
    let mut current = text.to_string();
    let mut hits = Vec::new();

    for (rule, re) in COMPILED_PII.iter() {
        let count = re.find_iter(&current).count();
        if count == 0 {
            continue;
        }
        current = re.replace_all(&current, rule.redaction_label).into_owned();
        hits.push(CategoryHits {
            kind: rule.category,
            count,
        });
    }

    (current, hits)
}

/// Replace credential values, keeping the key and separator.
///
/// Values that are already redacted are left alone and not counted.
pub fn redact_secrets(text: &str) -> (String, Vec<CategoryHits<&'static str>>) {
    let mut current = text.to_string();
    let mut hits = Vec::new();

    for (rule, re) in COMPILED_SECRETS.iter() {
        let mut count = 0usize;
        let replaced = re.replace_all(&current, |caps: &Captures| {
            if &caps[3] == SECRET_REDACTION_LABEL {
                return caps[0].to_string();
            }
            count += 1;
            format!("{}{}{}", &caps[1], &caps[2], SECRET_REDACTION_LABEL)
        });
        if count == 0 {
            continue;
        }
        current = replaced.into_owned();
        hits.push(CategoryHits {
            kind: rule.kind,
            count,
        });
    }

    (current, hits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_rules_compile() {
        assert_eq!(COMPILED_PII.len(), PII_RULES.len());
        assert_eq!(COMPILED_SECRETS.len(), SECRET_RULES.len());
    }

    #[test]
    fn test_redact_email() {
        let (text, hits) = redact_pii("mail a.b+c@school.edu or x@y.org");
        assert_eq!(text, "mail [REDACTED_EMAIL] or [REDACTED_EMAIL]");
        assert_eq!(hits, vec![CategoryHits { kind: PiiCategory::Email, count: 2 }]);
    }

    #[test]
    fn test_redact_unicode_email() {
        let (text, hits) = redact_pii("écrire à josé@exemple.fr merci");
        assert_eq!(text, "écrire à [REDACTED_EMAIL] merci");
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_redact_phone_formats() {
        for phone in ["555-123-4567", "(555) 123-4567", "+1 555 123 4567", "555.123.4567"] {
            let (text, hits) = redact_pii(&format!("call {phone} today"));
            assert_eq!(text, "call [REDACTED_PHONE] today", "failed for {phone}");
            assert_eq!(hits[0].kind, PiiCategory::Phone);
        }
    }

    #[test]
    fn test_ssn_is_not_a_phone() {
        let (text, hits) = redact_pii("My SSN is 123-45-6789");
        assert_eq!(text, "My SSN is [REDACTED_SSN]");
        assert_eq!(hits, vec![CategoryHits { kind: PiiCategory::Ssn, count: 1 }]);
    }

    #[test]
    fn test_redact_credit_card() {
        for card in ["4111 1111 1111 1111", "4111-1111-1111-1111", "4111111111111111", "3782 822463 10005"] {
            let (text, hits) = redact_pii(&format!("card {card} ok"));
            assert_eq!(text, "card [REDACTED_CREDIT_CARD] ok", "failed for {card}");
            assert_eq!(hits[0].kind, PiiCategory::CreditCard);
        }
    }

    #[test]
    fn test_plain_numbers_pass() {
        let (text, hits) = redact_pii("Chapter 12, page 345, year 2024");
        assert_eq!(text, "Chapter 12, page 345, year 2024");
        assert!(hits.is_empty());
    }

    #[test]
    fn test_redact_secrets_keeps_key() {
        let (text, hits) = redact_secrets("login with Password: hunter2 and api_key=abc123");
        assert_eq!(
            text,
            "login with Password: [REDACTED_SECRET] and api_key=[REDACTED_SECRET]"
        );
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].kind, "password");
        assert_eq!(hits[1].kind, "api_key");
    }

    #[test]
    fn test_redact_secrets_idempotent() {
        let (once, _) = redact_secrets("pwd=letmein");
        let (twice, hits) = redact_secrets(&once);
        assert_eq!(once, twice);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_password_word_alone_is_not_a_leak() {
        let (text, hits) = redact_secrets("Choose a strong password for your account");
        assert_eq!(text, "Choose a strong password for your account");
        assert!(hits.is_empty());
    }

    #[test]
    fn test_redact_secrets_with_prefixed_keys() {
        let cases = [
            ("DB_PASSWORD=hunter2", "DB_PASSWORD=[REDACTED_SECRET]", "password"),
            ("client_secret: abc123xyz", "client_secret: [REDACTED_SECRET]", "api_key"),
            ("AWS_SECRET=AKIAXYZ", "AWS_SECRET=[REDACTED_SECRET]", "api_key"),
            ("my_api_key=zzz", "my_api_key=[REDACTED_SECRET]", "api_key"),
        ];
        for (input, expected, kind) in cases {
            let (text, hits) = redact_secrets(input);
            assert_eq!(text, expected, "failed for {input}");
            assert_eq!(hits, vec![CategoryHits { kind, count: 1 }], "failed for {input}");
        }
    }
}
