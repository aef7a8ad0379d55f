use pedagogy_algo::AlgoError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    Algo(#[from] AlgoError),
    #[error("unknown item: {0}")]
    UnknownItem(String),
    #[error("invalid request: {0}")]
    Request(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ServiceError {
    /// Stable machine-readable code for the response envelope
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Algo(_) => "VALIDATION_ERROR",
            Self::UnknownItem(_) => "NOT_FOUND",
            Self::Request(_) => "BAD_REQUEST",
            Self::Io(_) => "INTERNAL_ERROR",
        }
    }
}
