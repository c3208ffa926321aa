//! Column of projects for one category; also the drop target for it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::{debug, warn};

use super::{mount, Component, ComponentBase, MountOptions, ProjectItem};
use crate::dom::{DocumentHandle, DomEvent, EventKind, EventOutcome, InsertPosition, NodeId};
use crate::dragdrop::{carries_project, DropEffect, DropTarget, PROJECT_ID_TYPE};
use crate::error::{BoardError, BoardResult};
use crate::project::model::{Project, ProjectStatus};
use crate::project::{StoreHandle, SubscriptionId};
use crate::templates::{APP_HOST, DROPPABLE_CLASS, PROJECT_LIST};

/// Renders the projects of one category and accepts drops into it.
///
/// Clones share state, so a clone captured by a listener sees the same
/// rendered items as the list held by the app.
#[derive(Clone)]
pub struct ProjectList {
    base: ComponentBase,
    category: ProjectStatus,
    list: NodeId,
    doc: DocumentHandle,
    store: StoreHandle,
    items: Rc<RefCell<Vec<ProjectItem>>>,
    subscription: Rc<Cell<Option<SubscriptionId>>>,
}

impl ProjectList {
    pub fn mount(doc: &DocumentHandle, store: &StoreHandle, category: ProjectStatus) -> BoardResult<Self> {
        let options = MountOptions::new(PROJECT_LIST, APP_HOST, InsertPosition::End)
            .with_element_id(&format!("{}-projects", category));
        mount(doc, &options, |base| {
            let list = doc
                .borrow()
                .find_by_tag(base.element, "ul")
                .ok_or_else(|| BoardError::ElementNotFound(format!("ul in {}", PROJECT_LIST)))?;
            Ok(Self {
                base,
                category,
                list,
                doc: doc.clone(),
                store: store.clone(),
                items: Rc::new(RefCell::new(Vec::new())),
                subscription: Rc::new(Cell::new(None)),
            })
        })
    }

    /// Id of the `ul` items are appended to.
    pub fn list_id(&self) -> String {
        format!("{}-projects-list", self.category)
    }

    pub fn list_element(&self) -> NodeId {
        self.list
    }

    /// Ids of the currently rendered cards, in display order.
    pub fn rendered_ids(&self) -> Vec<String> {
        self.items
            .borrow()
            .iter()
            .map(|item| item.project().id.clone())
            .collect()
    }

    pub fn subscription(&self) -> Option<SubscriptionId> {
        self.subscription.get()
    }

    /// Clear the list and rebuild one card per project.
    ///
    /// Every notification rebuilds the whole list: O(n) in the number of
    /// projects per change, with no per-item diffing. That is fine at board
    /// scale; large boards would need keyed updates instead.
    fn render_projects(&self, projects: &[Project]) -> BoardResult<()> {
        self.doc.borrow_mut().clear_children(self.list)?;

        let host_id = self.list_id();
        let mut rebuilt = Vec::with_capacity(projects.len());
        for project in projects {
            rebuilt.push(ProjectItem::mount(&self.doc, &host_id, project)?);
        }
        debug!(category = %self.category, count = rebuilt.len(), "Rendered project list");
        *self.items.borrow_mut() = rebuilt;
        Ok(())
    }
}

impl Component for ProjectList {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn configure(&mut self) -> BoardResult<()> {
        {
            let mut doc = self.doc.borrow_mut();
            let element = self.base.element;

            let target = self.clone();
            doc.add_event_listener(
                element,
                EventKind::DragOver,
                Rc::new(move |event: &mut DomEvent| target.on_drag_over(event)),
            )?;
            let target = self.clone();
            doc.add_event_listener(
                element,
                EventKind::Drop,
                Rc::new(move |event: &mut DomEvent| target.on_drop(event)),
            )?;
            let target = self.clone();
            doc.add_event_listener(
                element,
                EventKind::DragLeave,
                Rc::new(move |event: &mut DomEvent| target.on_drag_leave(event)),
            )?;
        }

        let renderer = self.clone();
        let id = self.store.borrow_mut().subscribe(move |snapshot| {
            let projects = snapshot.filtered(renderer.category);
            if let Err(e) = renderer.render_projects(&projects) {
                warn!(category = %renderer.category, error = %e, "Failed to render project list");
            }
        });
        self.subscription.set(Some(id));
        Ok(())
    }

    fn render_content(&mut self) -> BoardResult<()> {
        let mut doc = self.doc.borrow_mut();
        doc.set_id(self.list, &self.list_id())?;
        let heading = doc
            .find_by_tag(self.base.element, "h2")
            .ok_or_else(|| BoardError::ElementNotFound(format!("h2 in {}", PROJECT_LIST)))?;
        doc.set_text(heading, self.category.label())
    }
}

impl DropTarget for ProjectList {
    fn category(&self) -> ProjectStatus {
        self.category
    }

    fn on_drag_over(&self, event: &mut DomEvent) -> BoardResult<()> {
        if !carries_project(event) {
            return Ok(());
        }
        event.prevent_default();
        if let Some(transfer) = event.data_transfer.as_mut() {
            transfer.drop_effect = DropEffect::Move;
        }
        self.doc.borrow_mut().add_class(self.list, DROPPABLE_CLASS)
    }

    fn on_drop(&self, event: &mut DomEvent) -> BoardResult<()> {
        let project_id = event
            .data_transfer
            .as_ref()
            .and_then(|dt| dt.get_data(PROJECT_ID_TYPE))
            .map(str::to_string);

        if let Some(id) = project_id {
            // the store notifies renderers synchronously; no document borrow may be held here
            let outcome = self.store.borrow_mut().move_project(&id, self.category);
            event.outcome = Some(EventOutcome::Move(outcome));
        }

        self.doc.borrow_mut().remove_class(self.list, DROPPABLE_CLASS)
    }

    fn on_drag_leave(&self, _event: &mut DomEvent) -> BoardResult<()> {
        self.doc.borrow_mut().remove_class(self.list, DROPPABLE_CLASS)
    }
}
