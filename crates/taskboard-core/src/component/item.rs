//! A single draggable project card.

use std::rc::Rc;

use super::{mount, Component, ComponentBase, MountOptions};
use crate::dom::{DocumentHandle, DomEvent, EventKind, InsertPosition};
use crate::dragdrop::{DataTransfer, Draggable, DropEffect, PROJECT_ID_TYPE};
use crate::error::{BoardError, BoardResult};
use crate::project::model::Project;
use crate::templates::{DRAGGING_CLASS, SINGLE_PROJECT};

/// Card for one project, appended to a list's `ul`.
#[derive(Clone)]
pub struct ProjectItem {
    base: ComponentBase,
    project: Project,
    doc: DocumentHandle,
}

impl ProjectItem {
    pub fn mount(doc: &DocumentHandle, host_id: &str, project: &Project) -> BoardResult<Self> {
        let options = MountOptions::new(SINGLE_PROJECT, host_id, InsertPosition::End)
            .with_element_id(&project.id);
        mount(doc, &options, |base| {
            Ok(Self {
                base,
                project: project.clone(),
                doc: doc.clone(),
            })
        })
    }

    pub fn project(&self) -> &Project {
        &self.project
    }
}

impl Component for ProjectItem {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn configure(&mut self) -> BoardResult<()> {
        let mut doc = self.doc.borrow_mut();

        let item = self.clone();
        doc.add_event_listener(
            self.base.element,
            EventKind::DragStart,
            Rc::new(move |event: &mut DomEvent| item.on_drag_start(event)),
        )?;

        let item = self.clone();
        doc.add_event_listener(
            self.base.element,
            EventKind::DragEnd,
            Rc::new(move |event: &mut DomEvent| item.on_drag_end(event)),
        )
    }

    fn render_content(&mut self) -> BoardResult<()> {
        let mut doc = self.doc.borrow_mut();
        let root = self.base.element;
        let missing = |tag: &str| BoardError::ElementNotFound(format!("{} in {}", tag, SINGLE_PROJECT));

        let title = doc.find_by_tag(root, "h2").ok_or_else(|| missing("h2"))?;
        let people = doc.find_by_tag(root, "h3").ok_or_else(|| missing("h3"))?;
        let description = doc.find_by_tag(root, "p").ok_or_else(|| missing("p"))?;

        doc.set_text(title, &self.project.title)?;
        doc.set_text(people, &format!("{} assigned", self.project.persons()))?;
        doc.set_text(description, &self.project.description)
    }
}

impl Draggable for ProjectItem {
    fn on_drag_start(&self, event: &mut DomEvent) -> BoardResult<()> {
        let transfer = event.data_transfer.get_or_insert_with(DataTransfer::new);
        transfer.set_data(PROJECT_ID_TYPE, &self.project.id);
        transfer.effect_allowed = DropEffect::Move;
        self.doc
            .borrow_mut()
            .add_class(self.base.element, DRAGGING_CLASS)
    }

    fn on_drag_end(&self, _event: &mut DomEvent) -> BoardResult<()> {
        self.doc
            .borrow_mut()
            .remove_class(self.base.element, DRAGGING_CLASS)
    }
}
