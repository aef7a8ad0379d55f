#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AlgoError {
    #[error("invalid item parameter `{field}`: {reason}")]
    InvalidItem { field: &'static str, reason: &'static str },
    #[error("invalid range [{min}, {max}]")]
    InvalidRange { min: f64, max: f64 },
    #[error("invalid word list: {0}")]
    InvalidWordList(String),
}

impl AlgoError {
    pub(crate) fn invalid_item(field: &'static str, reason: &'static str) -> Self {
        Self::InvalidItem { field, reason }
    }
}
