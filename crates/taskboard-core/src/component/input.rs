//! The project form.

use std::rc::Rc;

use tracing::debug;

use super::{mount, Component, ComponentBase, MountOptions};
use crate::dom::{Document, DocumentHandle, DomEvent, EventKind, EventOutcome, InsertPosition, NodeId};
use crate::error::{BoardError, BoardResult};
use crate::project::StoreHandle;
use crate::templates::{APP_HOST, INPUT_FORM, PROJECT_INPUT};
use crate::validation::{self, RawProjectInput};

#[derive(Clone)]
pub struct ProjectInput {
    base: ComponentBase,
    title: NodeId,
    description: NodeId,
    people: NodeId,
    doc: DocumentHandle,
    store: StoreHandle,
}

fn field(doc: &Document, root: NodeId, id: &str) -> BoardResult<NodeId> {
    doc.find_by_id(root, id)
        .ok_or_else(|| BoardError::ElementNotFound(format!("#{} in {}", id, PROJECT_INPUT)))
}

impl ProjectInput {
    pub fn mount(doc: &DocumentHandle, store: &StoreHandle) -> BoardResult<Self> {
        let options = MountOptions::new(PROJECT_INPUT, APP_HOST, InsertPosition::Start)
            .with_element_id(INPUT_FORM);
        mount(doc, &options, |base| {
            let d = doc.borrow();
            Ok(Self {
                base,
                title: field(&d, base.element, "title")?,
                description: field(&d, base.element, "description")?,
                people: field(&d, base.element, "people")?,
                doc: doc.clone(),
                store: store.clone(),
            })
        })
    }

    /// Current field values.
    pub fn values(&self) -> BoardResult<RawProjectInput> {
        let doc = self.doc.borrow();
        Ok(RawProjectInput {
            title: doc.value(self.title)?,
            description: doc.value(self.description)?,
            people: doc.value(self.people)?,
        })
    }

    /// Type values into the fields, as a user would before submitting.
    pub fn fill(&self, input: &RawProjectInput) -> BoardResult<()> {
        let mut doc = self.doc.borrow_mut();
        doc.set_value(self.title, &input.title)?;
        doc.set_value(self.description, &input.description)?;
        doc.set_value(self.people, &input.people)
    }

    fn clear(&self) -> BoardResult<()> {
        self.fill(&RawProjectInput::default())
    }

    fn on_submit(&self, event: &mut DomEvent) -> BoardResult<()> {
        event.prevent_default();
        let raw = self.values()?;

        match validation::gather(&raw) {
            Ok(draft) => {
                let project = self
                    .store
                    .borrow_mut()
                    .add_project(&draft.title, &draft.description, draft.people);
                self.clear()?;
                event.outcome = Some(EventOutcome::Added(project));
            }
            Err(failure) => {
                debug!(fields = failure.fields.len(), "Project input rejected");
                event.outcome = Some(EventOutcome::Rejected(failure));
            }
        }
        Ok(())
    }
}

impl Component for ProjectInput {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn configure(&mut self) -> BoardResult<()> {
        let form = self.clone();
        self.doc.borrow_mut().add_event_listener(
            self.base.element,
            EventKind::Submit,
            Rc::new(move |event: &mut DomEvent| form.on_submit(event)),
        )
    }

    fn render_content(&mut self) -> BoardResult<()> {
        Ok(())
    }
}
