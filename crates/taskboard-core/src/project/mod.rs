//! Project store: the observable container every renderer subscribes to.

pub mod model;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::ops::Deref;
use std::rc::Rc;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use model::{Project, ProjectStatus};

/// Callback invoked with a fresh snapshot after every mutation.
pub type Listener = Box<dyn FnMut(&Snapshot)>;

/// Shared handle to the one store of a running board.
pub type StoreHandle = Rc<RefCell<ProjectStore>>;

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

/// Immutable copy of the project sequence at one notification instant.
///
/// All listeners of one notification pass share the same snapshot. Callers
/// that need to modify it take an owned copy with `to_vec`.
#[derive(Debug, Clone)]
pub struct Snapshot {
    projects: Arc<[Project]>,
}

impl Snapshot {
    fn capture(projects: &[Project]) -> Self {
        Self {
            projects: projects.into(),
        }
    }

    /// Projects of one category, in insertion order.
    pub fn filtered(&self, status: ProjectStatus) -> Vec<Project> {
        self.projects
            .iter()
            .filter(|p| p.status == status)
            .cloned()
            .collect()
    }

    /// Look up a project by id.
    pub fn find(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }
}

impl Deref for Snapshot {
    type Target = [Project];

    fn deref(&self) -> &[Project] {
        &self.projects
    }
}

/// Result of `move_project`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MoveOutcome {
    /// Status changed and listeners were notified.
    Moved {
        id: String,
        from: ProjectStatus,
        to: ProjectStatus,
    },
    /// The project already had the requested status.
    Unchanged { id: String, status: ProjectStatus },
    /// No project with this id exists.
    NotFound { id: String },
}

impl MoveOutcome {
    /// Whether the move produced a notification pass.
    pub fn is_moved(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

/// Insertion-ordered project sequence plus its subscribers.
#[derive(Default)]
pub struct ProjectStore {
    projects: Vec<Project>,
    listeners: BTreeMap<SubscriptionId, Listener>,
    next_subscription: u64,
}

impl std::fmt::Debug for ProjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectStore")
            .field("projects", &self.projects)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ProjectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store behind a shared handle.
    ///
    /// A running board creates exactly one of these and hands clones of the
    /// handle to every component that needs it.
    pub fn shared() -> StoreHandle {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Append a new active project and notify listeners.
    ///
    /// Input is expected to be validated already.
    pub fn add_project(&mut self, title: &str, description: &str, people: u32) -> Project {
        let project = Project::new(title, description, people);
        debug!(project_id = %project.id, title = %project.title, people, "Adding project");
        self.projects.push(project.clone());
        self.notify();
        project
    }

    /// Change a project's status.
    ///
    /// Unknown ids and same-status moves are no-ops and do not notify.
    pub fn move_project(&mut self, id: &str, new_status: ProjectStatus) -> MoveOutcome {
        let Some(project) = self.projects.iter_mut().find(|p| p.id == id) else {
            debug!(project_id = %id, "Move ignored, project not found");
            return MoveOutcome::NotFound { id: id.to_string() };
        };

        if project.status == new_status {
            debug!(project_id = %id, status = %new_status, "Move ignored, status unchanged");
            return MoveOutcome::Unchanged {
                id: id.to_string(),
                status: new_status,
            };
        }

        let from = project.status;
        project.status = new_status;
        debug!(project_id = %id, from = %from, to = %new_status, "Project moved");
        self.notify();

        MoveOutcome::Moved {
            id: id.to_string(),
            from,
            to: new_status,
        }
    }

    /// Register a listener. It is not called until the next mutation.
    pub fn subscribe(&mut self, listener: impl FnMut(&Snapshot) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.insert(id, Box::new(listener));
        debug!(subscription = id.0, "Listener subscribed");
        id
    }

    /// Remove a listener. Returns false if the handle was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    /// Current contents as a snapshot.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.projects)
    }

    pub fn get(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    /// Deliver one snapshot to every listener in subscription order.
    fn notify(&mut self) {
        let snapshot = Snapshot::capture(&self.projects);
        let handles: Vec<SubscriptionId> = self.listeners.keys().copied().collect();
        debug!(listeners = handles.len(), projects = snapshot.len(), "Notifying listeners");

        for handle in handles {
            if let Some(listener) = self.listeners.get_mut(&handle) {
                listener(&snapshot);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording_store() -> (ProjectStore, Rc<RefCell<Vec<Snapshot>>>) {
        let mut store = ProjectStore::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        store.subscribe(move |snapshot| sink.borrow_mut().push(snapshot.clone()));
        (store, seen)
    }

    #[test]
    fn test_add_keeps_fields_and_ids_unique() {
        let mut store = ProjectStore::new();
        let inputs = [("One", "first project", 1), ("Two", "second project", 2), ("Three", "third project", 5)];
        for (title, description, people) in inputs {
            store.add_project(title, description, people);
        }

        assert_eq!(store.len(), 3);
        let snapshot = store.snapshot();
        for (project, (title, description, people)) in snapshot.iter().zip(inputs) {
            assert_eq!(project.title, title);
            assert_eq!(project.description, description);
            assert_eq!(project.people, people);
            assert_eq!(project.status, ProjectStatus::Active);
        }

        let mut ids: Vec<&str> = snapshot.iter().map(|p| p.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_add_notifies_once() {
        let (mut store, seen) = recording_store();
        store.add_project("Build API", "Design the schema", 3);
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(seen.borrow()[0].len(), 1);
    }

    #[test]
    fn test_move_unknown_id_is_silent() {
        let (mut store, seen) = recording_store();
        store.add_project("Build API", "Design the schema", 3);
        let before = store.snapshot().to_vec();

        let outcome = store.move_project("missing", ProjectStatus::Finished);

        assert_eq!(outcome, MoveOutcome::NotFound { id: "missing".to_string() });
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(store.snapshot().to_vec(), before);
    }

    #[test]
    fn test_move_same_status_is_silent() {
        let (mut store, seen) = recording_store();
        let project = store.add_project("Build API", "Design the schema", 3);

        let outcome = store.move_project(&project.id, ProjectStatus::Active);

        assert!(matches!(outcome, MoveOutcome::Unchanged { .. }));
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_move_updates_only_target() {
        let (mut store, seen) = recording_store();
        let a = store.add_project("A", "project a", 1);
        let b = store.add_project("B", "project b", 2);

        let outcome = store.move_project(&a.id, ProjectStatus::Finished);

        assert!(outcome.is_moved());
        assert_eq!(seen.borrow().len(), 3);
        assert_eq!(store.get(&a.id).unwrap().status, ProjectStatus::Finished);
        assert_eq!(store.get(&b.id).unwrap().status, ProjectStatus::Active);
    }

    #[test]
    fn test_snapshots_are_independent() {
        let (mut store, seen) = recording_store();
        let a = store.add_project("A", "project a", 1);
        store.move_project(&a.id, ProjectStatus::Finished);

        let seen = seen.borrow();
        assert_eq!(seen[0][0].status, ProjectStatus::Active);
        assert_eq!(seen[1][0].status, ProjectStatus::Finished);

        let mut copy = seen[1].to_vec();
        copy[0].status = ProjectStatus::Active;
        copy[0].title = "changed".to_string();
        assert_eq!(seen[1][0].title, "A");
        assert_eq!(store.get(&a.id).unwrap().status, ProjectStatus::Finished);
    }

    #[test]
    fn test_listeners_run_in_subscription_order() {
        let mut store = ProjectStore::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for n in 0..3 {
            let order = order.clone();
            store.subscribe(move |_| order.borrow_mut().push(n));
        }

        store.add_project("A", "project a", 1);

        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let (mut store, seen) = recording_store();
        let extra = Rc::new(RefCell::new(0));
        let counter = extra.clone();
        let handle = store.subscribe(move |_| *counter.borrow_mut() += 1);

        store.add_project("A", "project a", 1);
        assert!(store.unsubscribe(handle));
        assert!(!store.unsubscribe(handle));
        store.add_project("B", "project b", 1);

        assert_eq!(*extra.borrow(), 1);
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(store.subscriber_count(), 1);
    }

    #[test]
    fn test_filtered_view() {
        let mut store = ProjectStore::new();
        let a = store.add_project("A", "project a", 1);
        store.add_project("B", "project b", 1);
        store.move_project(&a.id, ProjectStatus::Finished);

        let snapshot = store.snapshot();
        let active = snapshot.filtered(ProjectStatus::Active);
        let finished = snapshot.filtered(ProjectStatus::Finished);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].title, "B");
        assert_eq!(finished.len(), 1);
        assert_eq!(finished[0].title, "A");
        assert!(snapshot.find(&a.id).is_some());
    }
}
