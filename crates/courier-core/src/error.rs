//! Errors surfaced by `send` / `publish`.
//!
//! # 分類
//! - configuration: `IllegalArgument`（build 時に即失敗）
//! - routing: `HandlerNotFound`, `MultipleHandlersMatched`
//! - runtime: `Handler`, `Panicked`, `Abandoned`, `TypeMismatch`
//! - fan-out: `Aggregate`

use thiserror::Error;

/// Boxed failure raised by user handlers and middleware.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum CourierError {
    #[error("cannot find a matching handler for {command} command")]
    HandlerNotFound { command: String },

    #[error(
        "command {command} must have a single matching handler, but found {} ({})",
        .handlers.len(),
        .handlers.join(", ")
    )]
    MultipleHandlersMatched {
        command: String,
        handlers: Vec<String>,
    },

    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    #[error("illegal argument: {0}")]
    IllegalArgument(String),

    /// A failure raised by a handler or middleware.
    #[error("{0}")]
    Handler(#[source] BoxError),

    #[error("expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("task panicked: {0}")]
    Panicked(String),

    #[error("task was dropped by the worker pool before it reported an outcome")]
    Abandoned,
}

impl CourierError {
    /// Wrap a handler/middleware failure.
    ///
    /// ```ignore
    /// return Err(CourierError::handler("payment gateway unreachable"));
    /// ```
    pub fn handler(error: impl Into<BoxError>) -> Self {
        Self::Handler(error.into())
    }

    pub fn illegal_argument(message: impl Into<String>) -> Self {
        Self::IllegalArgument(message.into())
    }

    /// Routing errors are caller mistakes; everything else happened while handling.
    pub fn is_routing(&self) -> bool {
        matches!(
            self,
            Self::HandlerNotFound { .. } | Self::MultipleHandlersMatched { .. }
        )
    }
}

/// AggregateError は複数の失敗をまとめて返す
///
/// Sequential strategies keep task order; parallel ones keep arrival order.
#[derive(Debug, Error)]
#[error("{} failure(s)", .failures.len())]
pub struct AggregateError {
    failures: Vec<CourierError>,
}

impl AggregateError {
    pub fn new(failures: Vec<CourierError>) -> Self {
        Self { failures }
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> &[CourierError] {
        &self.failures
    }

    pub fn into_failures(self) -> Vec<CourierError> {
        self.failures
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CourierError> {
        self.failures.iter()
    }

    /// `Ok(())` when nothing was captured.
    pub(crate) fn into_result(failures: Vec<CourierError>) -> Result<(), CourierError> {
        if failures.is_empty() {
            Ok(())
        } else {
            Err(CourierError::Aggregate(Self::new(failures)))
        }
    }
}

impl IntoIterator for AggregateError {
    type Item = CourierError;
    type IntoIter = std::vec::IntoIter<CourierError>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.into_iter()
    }
}

impl<'a> IntoIterator for &'a AggregateError {
    type Item = &'a CourierError;
    type IntoIter = std::slice::Iter<'a, CourierError>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.iter()
    }
}
