//! Taskboard Core Library
//!
//! Project model, observable store, component lifecycle and the
//! drag-and-drop protocol behind the project board.

pub mod app;
pub mod component;
pub mod dom;
pub mod dragdrop;
pub mod error;
pub mod project;
pub mod templates;
pub mod validation;

pub use app::BoardApp;
pub use error::{BoardError, BoardResult};
pub use project::model::{Project, ProjectStatus};
pub use project::{MoveOutcome, ProjectStore, Snapshot, StoreHandle, SubscriptionId};
