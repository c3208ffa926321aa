//! Events dispatched to element listeners.

use std::rc::Rc;

use serde::Serialize;

use super::NodeId;
use crate::dragdrop::DataTransfer;
use crate::error::BoardResult;
use crate::project::model::Project;
use crate::project::MoveOutcome;
use crate::validation::ValidationFailure;

/// Listener callback. Handlers capture whatever state they need explicitly.
pub type EventHandler = Rc<dyn Fn(&mut DomEvent) -> BoardResult<()>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Submit,
    DragStart,
    DragEnd,
    DragOver,
    DragLeave,
    Drop,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::DragStart => "dragstart",
            Self::DragEnd => "dragend",
            Self::DragOver => "dragover",
            Self::DragLeave => "dragleave",
            Self::Drop => "drop",
        }
    }
}

/// What a handler did with the event, reported back to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum EventOutcome {
    /// A submitted form passed validation and a project was added.
    Added(Project),
    /// A submitted form failed validation; the store was not touched.
    Rejected(ValidationFailure),
    /// A drop reached the store.
    Move(MoveOutcome),
}

/// An event travelling to the listeners of one element.
#[derive(Debug, Clone)]
pub struct DomEvent {
    pub kind: EventKind,
    pub target: NodeId,
    pub data_transfer: Option<DataTransfer>,
    pub outcome: Option<EventOutcome>,
    default_prevented: bool,
}

impl DomEvent {
    pub fn new(kind: EventKind, target: NodeId) -> Self {
        Self {
            kind,
            target,
            data_transfer: None,
            outcome: None,
            default_prevented: false,
        }
    }

    /// Create a drag event carrying a transfer payload.
    pub fn drag(kind: EventKind, target: NodeId, data_transfer: DataTransfer) -> Self {
        Self {
            data_transfer: Some(data_transfer),
            ..Self::new(kind, target)
        }
    }

    /// For drag-over, signals that the target accepts a drop.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}
