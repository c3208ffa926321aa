//! Drag-and-drop protocol: capability traits and the per-gesture state machine.

use serde::{Deserialize, Serialize};

use crate::dom::DomEvent;
use crate::error::{BoardError, BoardResult};
use crate::project::model::ProjectStatus;

/// Payload type under which a dragged project's id travels.
pub const PROJECT_ID_TYPE: &str = "text/plain";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropEffect {
    #[default]
    None,
    Copy,
    Move,
    Link,
}

/// Typed payload carried by one drag gesture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataTransfer {
    entries: Vec<(String, String)>,
    pub effect_allowed: DropEffect,
    pub drop_effect: DropEffect,
}

impl DataTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `data` under `kind`, replacing any previous entry of that type.
    pub fn set_data(&mut self, kind: &str, data: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == kind) {
            Some(entry) => entry.1 = data.to_string(),
            None => self.entries.push((kind.to_string(), data.to_string())),
        }
    }

    pub fn get_data(&self, kind: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == kind)
            .map(|(_, v)| v.as_str())
    }

    /// Payload types in the order they were set.
    pub fn types(&self) -> Vec<&str> {
        self.entries.iter().map(|(k, _)| k.as_str()).collect()
    }
}

/// Whether an event carries a project payload a list can host.
pub fn carries_project(event: &DomEvent) -> bool {
    event
        .data_transfer
        .as_ref()
        .and_then(|dt| dt.types().first().copied())
        == Some(PROJECT_ID_TYPE)
}

/// An element that can be picked up.
pub trait Draggable {
    /// Mark the payload with the item's identity and a move intent.
    fn on_drag_start(&self, event: &mut DomEvent) -> BoardResult<()>;

    /// Reset any visual state set during the drag.
    fn on_drag_end(&self, event: &mut DomEvent) -> BoardResult<()>;
}

/// An element that accepts dropped items into its category.
pub trait DropTarget {
    fn category(&self) -> ProjectStatus;

    /// Accept the drag (prevent default) only for a recognized payload and
    /// flag the target as droppable.
    fn on_drag_over(&self, event: &mut DomEvent) -> BoardResult<()>;

    /// Move the dragged project into this target's category.
    fn on_drop(&self, event: &mut DomEvent) -> BoardResult<()>;

    /// Clear the droppable flag.
    fn on_drag_leave(&self, event: &mut DomEvent) -> BoardResult<()>;
}

/// Where a drag gesture currently is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum DragPhase {
    Idle,
    Dragging {
        project_id: String,
    },
    HoveringTarget {
        project_id: String,
        target: ProjectStatus,
    },
    Dropped {
        project_id: String,
        target: ProjectStatus,
    },
}

impl DragPhase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Dragging { .. } => "dragging",
            Self::HoveringTarget { .. } => "hovering",
            Self::Dropped { .. } => "dropped",
        }
    }

    pub fn project_id(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Dragging { project_id }
            | Self::HoveringTarget { project_id, .. }
            | Self::Dropped { project_id, .. } => Some(project_id),
        }
    }
}

/// State of a single drag gesture, from pick-up to drag end.
///
/// `Idle -> Dragging -> HoveringTarget (any number of times, across
/// targets) -> Dropped -> Idle`, or back to `Idle` on drag end without a drop.
#[derive(Debug, Clone)]
pub struct DragSession {
    phase: DragPhase,
    transfer: Option<DataTransfer>,
}

impl Default for DragSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DragSession {
    pub fn new() -> Self {
        Self {
            phase: DragPhase::Idle,
            transfer: None,
        }
    }

    pub fn phase(&self) -> &DragPhase {
        &self.phase
    }

    /// Payload written by the drag source, shared by later events.
    pub fn transfer(&self) -> Option<&DataTransfer> {
        self.transfer.as_ref()
    }

    pub fn start(&mut self, project_id: &str, transfer: DataTransfer) -> BoardResult<()> {
        if self.phase != DragPhase::Idle {
            return Err(self.invalid("start a drag"));
        }
        self.phase = DragPhase::Dragging {
            project_id: project_id.to_string(),
        };
        self.transfer = Some(transfer);
        Ok(())
    }

    /// Replace the payload once the drag source has written it.
    pub fn record_transfer(&mut self, transfer: DataTransfer) {
        if self.phase != DragPhase::Idle {
            self.transfer = Some(transfer);
        }
    }

    /// Whether a card is picked up and not yet dropped.
    pub fn in_flight(&self) -> bool {
        matches!(
            self.phase,
            DragPhase::Dragging { .. } | DragPhase::HoveringTarget { .. }
        )
    }

    /// A target accepted a drag-over.
    pub fn hover(&mut self, target: ProjectStatus) -> BoardResult<()> {
        match &self.phase {
            DragPhase::Dragging { project_id } | DragPhase::HoveringTarget { project_id, .. } => {
                let project_id = project_id.clone();
                self.phase = DragPhase::HoveringTarget { project_id, target };
                Ok(())
            }
            _ => Err(self.invalid("hover a target")),
        }
    }

    /// The pointer left `target`.
    pub fn leave(&mut self, target: ProjectStatus) -> BoardResult<()> {
        match &self.phase {
            DragPhase::HoveringTarget { project_id, target: current } if *current == target => {
                let project_id = project_id.clone();
                self.phase = DragPhase::Dragging { project_id };
                Ok(())
            }
            DragPhase::Dragging { .. } | DragPhase::HoveringTarget { .. } => Ok(()),
            _ => Err(self.invalid("leave a target")),
        }
    }

    /// Drop on `target`, which must be the target currently hovered.
    pub fn drop_on(&mut self, target: ProjectStatus) -> BoardResult<String> {
        match &self.phase {
            DragPhase::HoveringTarget { project_id, target: current } if *current == target => {
                let project_id = project_id.clone();
                self.phase = DragPhase::Dropped {
                    project_id: project_id.clone(),
                    target,
                };
                Ok(project_id)
            }
            _ => Err(self.invalid(&format!("drop on {}", target))),
        }
    }

    /// End the gesture. Returns the phase it ended in.
    pub fn end(&mut self) -> BoardResult<DragPhase> {
        if self.phase == DragPhase::Idle {
            return Err(self.invalid("end a drag"));
        }
        self.transfer = None;
        Ok(std::mem::replace(&mut self.phase, DragPhase::Idle))
    }

    fn invalid(&self, event: &str) -> BoardError {
        BoardError::drag_transition(self.phase.name(), event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(id: &str) -> DataTransfer {
        let mut dt = DataTransfer::new();
        dt.set_data(PROJECT_ID_TYPE, id);
        dt.effect_allowed = DropEffect::Move;
        dt
    }

    #[test]
    fn test_data_transfer_replaces_same_type() {
        let mut dt = payload("a");
        dt.set_data(PROJECT_ID_TYPE, "b");
        dt.set_data("text/html", "<li>");
        assert_eq!(dt.get_data(PROJECT_ID_TYPE), Some("b"));
        assert_eq!(dt.types(), vec![PROJECT_ID_TYPE, "text/html"]);
    }

    #[test]
    fn test_full_gesture_with_drop() {
        let mut session = DragSession::new();
        session.start("p1", payload("p1")).unwrap();
        session.hover(ProjectStatus::Active).unwrap();
        session.leave(ProjectStatus::Active).unwrap();
        session.hover(ProjectStatus::Finished).unwrap();

        let id = session.drop_on(ProjectStatus::Finished).unwrap();
        assert_eq!(id, "p1");

        let ended = session.end().unwrap();
        assert_eq!(
            ended,
            DragPhase::Dropped {
                project_id: "p1".to_string(),
                target: ProjectStatus::Finished
            }
        );
        assert_eq!(session.phase(), &DragPhase::Idle);
        assert!(session.transfer().is_none());
    }

    #[test]
    fn test_drag_end_without_drop() {
        let mut session = DragSession::new();
        session.start("p1", payload("p1")).unwrap();
        session.hover(ProjectStatus::Finished).unwrap();

        let ended = session.end().unwrap();
        assert_eq!(ended.name(), "hovering");
        assert_eq!(session.phase(), &DragPhase::Idle);
    }

    #[test]
    fn test_invalid_transitions() {
        let mut session = DragSession::new();
        assert!(session.hover(ProjectStatus::Active).is_err());
        assert!(session.end().is_err());

        session.start("p1", payload("p1")).unwrap();
        assert!(session.start("p2", payload("p2")).is_err());
        assert!(session.drop_on(ProjectStatus::Active).is_err());

        session.hover(ProjectStatus::Active).unwrap();
        let err = session.drop_on(ProjectStatus::Finished).unwrap_err();
        assert_eq!(err, BoardError::drag_transition("hovering", "drop on finished"));

        assert!(session.in_flight());
        session.drop_on(ProjectStatus::Active).unwrap();
        assert!(!session.in_flight());
        assert!(session.hover(ProjectStatus::Finished).is_err());
    }
}
