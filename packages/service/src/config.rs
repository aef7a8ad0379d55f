use std::path::{Path, PathBuf};
use std::str::FromStr;

use pedagogy_algo::{
    DifficultyPolicy, IrtConfig, SafetyConfig, ScaleRange, DEFAULT_ABILITY_MAX,
    DEFAULT_ABILITY_MIN, DEFAULT_LEARNING_RATE,
};
use pedagogy_algo::safety::DEFAULT_MAX_SCAN_LEN;

use crate::error::ServiceError;

const DEFAULT_ACCURACY_WINDOW: usize = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub file_logs: bool,
    pub log_dir: PathBuf,
    pub irt: IrtConfig,
    pub difficulty: DifficultyPolicy,
    /// Trailing attempts kept per learner for the difficulty policy
    pub accuracy_window: usize,
    pub max_scan_len: usize,
    /// Newline-separated censor list; built-in list when unset
    pub profanity_words_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            file_logs: false,
            log_dir: PathBuf::from("./logs"),
            irt: IrtConfig::default(),
            difficulty: DifficultyPolicy::default(),
            accuracy_window: DEFAULT_ACCURACY_WINDOW,
            max_scan_len: DEFAULT_MAX_SCAN_LEN,
            profanity_words_file: None,
        }
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    lookup(key)
        .and_then(|value| value.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn parse_flag(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> bool {
    lookup(key)
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false)
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source. Unparseable values fall back to the
    /// defaults; use [`Config::validate`] to reject inconsistent ones.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let policy = defaults.difficulty.clone();

        let ability_range = ScaleRange {
            min: parse_or(&lookup, "ABILITY_MIN", DEFAULT_ABILITY_MIN),
            max: parse_or(&lookup, "ABILITY_MAX", DEFAULT_ABILITY_MAX),
        };
        let difficulty_range = ScaleRange {
            min: parse_or(&lookup, "DIFFICULTY_MIN", defaults.irt.difficulty_range.min),
            max: parse_or(&lookup, "DIFFICULTY_MAX", defaults.irt.difficulty_range.max),
        };

        let irt = IrtConfig {
            ability_range,
            difficulty_range,
            prior_ability: parse_or(&lookup, "ABILITY_PRIOR", defaults.irt.prior_ability),
            learning_rate: parse_or(&lookup, "LEARNING_RATE", DEFAULT_LEARNING_RATE),
        };

        let difficulty = DifficultyPolicy {
            increase_threshold: parse_or(
                &lookup,
                "DIFFICULTY_INCREASE_THRESHOLD",
                policy.increase_threshold,
            ),
            decrease_threshold: parse_or(
                &lookup,
                "DIFFICULTY_DECREASE_THRESHOLD",
                policy.decrease_threshold,
            ),
            step: parse_or(&lookup, "DIFFICULTY_STEP", policy.step),
            min_attempts: parse_or(&lookup, "DIFFICULTY_MIN_ATTEMPTS", policy.min_attempts),
            range: difficulty_range,
        };

        Self {
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            file_logs: parse_flag(&lookup, "ENABLE_FILE_LOGS"),
            log_dir: lookup("LOG_DIR").map(PathBuf::from).unwrap_or(defaults.log_dir),
            irt,
            difficulty,
            accuracy_window: parse_or(&lookup, "ACCURACY_WINDOW", defaults.accuracy_window),
            max_scan_len: parse_or(&lookup, "MAX_SCAN_LEN", defaults.max_scan_len),
            profanity_words_file: lookup("PROFANITY_WORDS_FILE")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    pub fn validate(&self) -> Result<(), ServiceError> {
        ScaleRange::new(self.irt.ability_range.min, self.irt.ability_range.max)?;
        ScaleRange::new(self.irt.difficulty_range.min, self.irt.difficulty_range.max)?;

        if !self.irt.learning_rate.is_finite() || self.irt.learning_rate < 0.0 {
            return Err(ServiceError::Config(format!(
                "LEARNING_RATE must be a non-negative number, got {}",
                self.irt.learning_rate
            )));
        }
        if !self.irt.ability_range.contains(self.irt.prior_ability) {
            return Err(ServiceError::Config(format!(
                "ABILITY_PRIOR {} outside [{}, {}]",
                self.irt.prior_ability, self.irt.ability_range.min, self.irt.ability_range.max
            )));
        }
        let policy = &self.difficulty;
        if !(0.0..=1.0).contains(&policy.decrease_threshold)
            || !(0.0..=1.0).contains(&policy.increase_threshold)
            || policy.decrease_threshold > policy.increase_threshold
        {
            return Err(ServiceError::Config(format!(
                "difficulty thresholds must satisfy 0 <= decrease ({}) <= increase ({}) <= 1",
                policy.decrease_threshold, policy.increase_threshold
            )));
        }
        if !policy.step.is_finite() || policy.step <= 0.0 {
            return Err(ServiceError::Config(format!(
                "DIFFICULTY_STEP must be positive, got {}",
                policy.step
            )));
        }
        if self.accuracy_window == 0 {
            return Err(ServiceError::Config("ACCURACY_WINDOW must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Filter configuration, reading the external word list when one is set
    pub fn safety_config(&self) -> Result<SafetyConfig, ServiceError> {
        let mut safety = SafetyConfig {
            max_scan_len: self.max_scan_len,
            ..SafetyConfig::default()
        };
        if let Some(path) = &self.profanity_words_file {
            safety.profanity_words = load_word_list(path)?;
            tracing::info!(
                path = %path.display(),
                words = safety.profanity_words.len(),
                "loaded profanity word list"
            );
        }
        Ok(safety)
    }
}

/// One word per line; blank lines and `#` comments are skipped
pub fn load_word_list(path: &Path) -> Result<Vec<String>, ServiceError> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}
