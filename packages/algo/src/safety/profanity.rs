use regex::{Captures, Regex, RegexBuilder};

use crate::error::AlgoError;

/// Built-in censor list, used when no external word list is supplied.
pub const DEFAULT_PROFANITY_WORDS: &[&str] = &[
    "ass",
    "asshole",
    "bastard",
    "bitch",
    "bullshit",
    "crap",
    "damn",
    "dick",
    "fuck",
    "fucked",
    "fucking",
    "motherfucker",
    "piss",
    "shit",
    "slut",
    "whore",
];

const CENSOR_CHAR: char = '*';

/// Whole-word, case-insensitive censor over a word list
#[derive(Clone, Debug)]
pub struct ProfanityCensor {
    matcher: Option<Regex>,
    word_count: usize,
}

impl ProfanityCensor {
    pub fn new<I, S>(words: I) -> Result<Self, AlgoError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words: Vec<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        words.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        words.dedup();

        if words.is_empty() {
            return Ok(Self::empty());
        }

        let alternation = words
            .iter()
            .map(|w| regex::escape(w))
            .collect::<Vec<_>>()
            .join("|");
        let matcher = RegexBuilder::new(&format!(r"\b(?:{alternation})\b"))
            .case_insensitive(true)
            .build()
            .map_err(|e| AlgoError::InvalidWordList(e.to_string()))?;

        Ok(Self {
            matcher: Some(matcher),
            word_count: words.len(),
        })
    }

    /// A censor that never matches
    pub fn empty() -> Self {
        Self {
            matcher: None,
            word_count: 0,
        }
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn contains_profanity(&self, text: &str) -> bool {
        self.matcher.as_ref().is_some_and(|re| re.is_match(text))
    }

    /// Censor every listed word, returning the new text and the number of
    /// tokens replaced.
    pub fn censor(&self, text: &str) -> (String, usize) {
        let Some(re) = &self.matcher else {
            return (text.to_string(), 0);
        };

        let mut count = 0usize;
        let censored = re.replace_all(text, |caps: &Captures| {
            count += 1;
            CENSOR_CHAR.to_string().repeat(caps[0].chars().count())
        });
        (censored.into_owned(), count)
    }
}

impl Default for ProfanityCensor {
    fn default() -> Self {
        Self::new(DEFAULT_PROFANITY_WORDS.iter().copied()).unwrap_or_else(|_| Self::empty())
    }
}
