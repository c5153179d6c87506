#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error("invalid route pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid http method: {0:?}")]
    InvalidMethod(String),
}

impl RouterError {
    pub(super) fn pattern(pattern: &str, source: regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_owned(),
            source,
        }
    }
}
