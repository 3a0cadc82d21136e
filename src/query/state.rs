// Query state for async data.

use crate::error::{HfsError, Result};

/// Outcome of a query invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum QueryState<T> {
    /// Not requested: the token or a required parameter is missing.
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Error(String),
}

impl<T> QueryState<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, QueryState::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, QueryState::Loaded(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            QueryState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            QueryState::Error(message) => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> QueryState<U> {
        match self {
            QueryState::Idle => QueryState::Idle,
            QueryState::Loading => QueryState::Loading,
            QueryState::Loaded(data) => QueryState::Loaded(f(data)),
            QueryState::Error(message) => QueryState::Error(message),
        }
    }

    /// `Some(Ok)` when loaded, `Some(Err)` on error, `None` otherwise.
    pub fn into_result(self) -> Option<Result<T>> {
        match self {
            QueryState::Loaded(data) => Some(Ok(data)),
            QueryState::Error(message) => Some(Err(HfsError::Other(message))),
            QueryState::Idle | QueryState::Loading => None,
        }
    }
}

impl<T> From<Result<T>> for QueryState<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => QueryState::Loaded(data),
            Err(e) => QueryState::Error(e.to_string()),
        }
    }
}
