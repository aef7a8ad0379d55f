pub const DEFAULT_PROHIBITED_KEYWORDS: &[&str] = &[
    "pirated",
    "cracked",
    "illegal",
    "stolen",
    "copyright infringement",
    "plagiarized",
];

pub const DEFAULT_SCAM_INDICATORS: &[&str] = &[
    "guaranteed money",
    "get rich quick",
    "free money",
    "no risk",
    "100% guaranteed",
    "limited time only",
];

/// Literal, case-insensitive substring terms
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeywordSet {
    terms: Vec<String>,
}

impl KeywordSet {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = Vec::new();
        for term in terms {
            let term = term.as_ref().trim().to_lowercase();
            if !term.is_empty() && !seen.contains(&term) {
                seen.push(term);
            }
        }
        Self { terms: seen }
    }

    pub fn prohibited() -> Self {
        Self::new(DEFAULT_PROHIBITED_KEYWORDS.iter().copied())
    }

    pub fn scam_indicators() -> Self {
        Self::new(DEFAULT_SCAM_INDICATORS.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Distinct terms present in `lowered`, in list order.
    ///
    /// `lowered` must already be lowercased.
    pub fn find_in<'a>(&'a self, lowered: &str) -> Vec<&'a str> {
        self.terms
            .iter()
            .filter(|term| lowered.contains(term.as_str()))
            .map(String::as_str)
            .collect()
    }
}
