use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LookupError {
    #[error("lookup query is empty")]
    EmptyQuery,

    #[error("address provider failed: {0}")]
    Upstream(String),
}

pub type LookupResult<T> = Result<T, LookupError>;
