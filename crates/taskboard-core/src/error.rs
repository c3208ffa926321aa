//! Centralized error types for the board.

use thiserror::Error;

/// Main error type for board operations.
///
/// Validation failures, unknown ids on move and redundant moves are not
/// errors; they are reported through `ValidationFailure` and `MoveOutcome`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Template has no root element: {0}")]
    EmptyTemplate(String),

    #[error("Host element not found: {0}")]
    HostNotFound(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Detached node: {0}")]
    DetachedNode(usize),

    #[error("No handler produced an outcome for {event}")]
    Unhandled { event: String },

    #[error("Invalid drag transition: cannot {event} while {phase}")]
    InvalidDragTransition { phase: String, event: String },
}

/// Result type for board operations.
pub type BoardResult<T> = Result<T, BoardError>;

impl BoardError {
    /// Create an invalid drag transition error.
    pub fn drag_transition(phase: impl Into<String>, event: impl Into<String>) -> Self {
        Self::InvalidDragTransition {
            phase: phase.into(),
            event: event.into(),
        }
    }
}
