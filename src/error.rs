use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{kind} not found: {key}")]
    NotFound { kind: &'static str, key: String },

    #[error("both {home} and {away} have zero strength")]
    DegenerateState { home: String, away: String },

    #[error("inconsistent league state: {0}")]
    InvalidState(String),
}

impl EngineError {
    pub fn team_not_found(name: &str) -> Self {
        EngineError::NotFound {
            kind: "team",
            key: name.to_string(),
        }
    }

    pub fn match_not_found(key: impl std::fmt::Display) -> Self {
        EngineError::NotFound {
            kind: "match",
            key: key.to_string(),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
