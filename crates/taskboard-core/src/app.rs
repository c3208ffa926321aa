//! The assembled board: one store, one document, the form and two lists.
//!
//! `BoardApp` is also the adapter surface a rendering target drives: it
//! turns "user submitted the form" or "user dropped a card here" into
//! events dispatched to the components that own them.

use tracing::{debug, info};

use crate::component::{Component, ProjectInput, ProjectList};
use crate::dom::{self, html, Document, DocumentHandle, DomEvent, EventKind, EventOutcome, NodeId};
use crate::dragdrop::{DataTransfer, DragPhase, DragSession, DropTarget};
use crate::error::{BoardError, BoardResult};
use crate::project::model::ProjectStatus;
use crate::project::{MoveOutcome, ProjectStore, Snapshot, StoreHandle, SubscriptionId};
use crate::templates;
use crate::validation::RawProjectInput;

pub struct BoardApp {
    doc: DocumentHandle,
    store: StoreHandle,
    input: ProjectInput,
    lists: Vec<ProjectList>,
    session: DragSession,
}

impl BoardApp {
    /// Build the page: templates, `#app` host, form first, then both lists.
    pub fn new() -> BoardResult<Self> {
        let doc = Document::shared();
        let store = ProjectStore::shared();

        {
            let mut d = doc.borrow_mut();
            templates::install(&mut d);
            let host = d.create(&templates::app_host());
            let body = d.body();
            d.append_child(body, host)?;
        }

        let input = ProjectInput::mount(&doc, &store)?;
        let lists = ProjectStatus::ALL
            .iter()
            .map(|&category| ProjectList::mount(&doc, &store, category))
            .collect::<BoardResult<Vec<_>>>()?;

        info!(lists = lists.len(), "Board mounted");
        Ok(Self {
            doc,
            store,
            input,
            lists,
            session: DragSession::new(),
        })
    }

    pub fn document(&self) -> &DocumentHandle {
        &self.doc
    }

    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    pub fn input(&self) -> &ProjectInput {
        &self.input
    }

    pub fn list(&self, category: ProjectStatus) -> BoardResult<&ProjectList> {
        self.lists
            .iter()
            .find(|list| list.category() == category)
            .ok_or_else(|| BoardError::ElementNotFound(format!("{}-projects", category)))
    }

    pub fn snapshot(&self) -> Snapshot {
        self.store.borrow().snapshot()
    }

    /// Subscribe an outside listener, notified after the board's own lists.
    ///
    /// Listeners run while the store is mutably borrowed and must only use
    /// the snapshot they are handed.
    pub fn subscribe(&self, listener: impl FnMut(&Snapshot) + 'static) -> SubscriptionId {
        self.store.borrow_mut().subscribe(listener)
    }

    pub fn drag_phase(&self) -> &DragPhase {
        self.session.phase()
    }

    /// Fill the form with `input` and submit it.
    pub fn submit(&mut self, input: &RawProjectInput) -> BoardResult<EventOutcome> {
        self.input.fill(input)?;
        let form = self.input.element();
        let mut event = DomEvent::new(EventKind::Submit, form);
        self.dispatch(form, &mut event)?;
        event.outcome.ok_or_else(|| BoardError::Unhandled {
            event: EventKind::Submit.as_str().to_string(),
        })
    }

    /// Pick up the card of `project_id`.
    pub fn drag_start(&mut self, project_id: &str) -> BoardResult<()> {
        // only cards are draggable; other ids in the page are not projects
        let not_found = || BoardError::ElementNotFound(project_id.to_string());
        if self.store.borrow().get(project_id).is_none() {
            return Err(not_found());
        }
        let card = self.doc.borrow().element_by_id(project_id).ok_or_else(not_found)?;

        self.session.start(project_id, DataTransfer::new())?;
        let mut event = DomEvent::drag(EventKind::DragStart, card, DataTransfer::new());
        self.dispatch(card, &mut event)?;
        self.session
            .record_transfer(event.data_transfer.unwrap_or_default());
        debug!(project_id, "Drag started");
        Ok(())
    }

    /// Move the dragged card over a list. Returns whether the list accepted it.
    pub fn drag_over(&mut self, category: ProjectStatus) -> BoardResult<bool> {
        // checked before dispatch so a refused hover never flags the list
        let transfer = self
            .session
            .transfer()
            .filter(|_| self.session.in_flight())
            .cloned()
            .ok_or_else(|| BoardError::drag_transition(self.session.phase().name(), "hover a target"))?;
        let target = self.list(category)?.element();

        let mut event = DomEvent::drag(EventKind::DragOver, target, transfer);
        self.dispatch(target, &mut event)?;
        if !event.default_prevented() {
            return Ok(false);
        }
        self.session.hover(category)?;
        Ok(true)
    }

    /// Move the dragged card off a list.
    pub fn drag_leave(&mut self, category: ProjectStatus) -> BoardResult<()> {
        self.session.leave(category)?;
        let target = self.list(category)?.element();
        let mut event = DomEvent::new(EventKind::DragLeave, target);
        self.dispatch(target, &mut event)?;
        Ok(())
    }

    /// Release the card over the list currently hovered.
    pub fn drop_on(&mut self, category: ProjectStatus) -> BoardResult<MoveOutcome> {
        self.session.drop_on(category)?;
        let transfer = self.session.transfer().cloned().unwrap_or_default();
        let target = self.list(category)?.element();

        let mut event = DomEvent::drag(EventKind::Drop, target, transfer);
        self.dispatch(target, &mut event)?;
        match event.outcome {
            Some(EventOutcome::Move(outcome)) => Ok(outcome),
            _ => Err(BoardError::Unhandled {
                event: EventKind::Drop.as_str().to_string(),
            }),
        }
    }

    /// Finish the gesture, dropped or not.
    pub fn drag_end(&mut self) -> BoardResult<DragPhase> {
        let ended = self.session.end()?;
        // the source card may have been rebuilt by the drop; its replacement
        // carries the same id
        let card = ended
            .project_id()
            .and_then(|id| self.doc.borrow().element_by_id(id));
        if let Some(card) = card {
            let mut event = DomEvent::new(EventKind::DragEnd, card);
            self.dispatch(card, &mut event)?;
        }
        debug!(phase = ended.name(), "Drag ended");
        Ok(ended)
    }

    /// A complete gesture: pick up, hover `target`, drop, end.
    pub fn move_via_drag(&mut self, project_id: &str, target: ProjectStatus) -> BoardResult<MoveOutcome> {
        self.drag_start(project_id)?;
        let outcome = match self.drag_over(target) {
            Ok(true) => self.drop_on(target),
            Ok(false) => Err(BoardError::drag_transition("dragging", format!("drop on {}", target))),
            Err(e) => Err(e),
        };
        self.drag_end()?;
        outcome
    }

    /// The whole `#app` subtree as HTML.
    pub fn render_html(&self) -> BoardResult<String> {
        let doc = self.doc.borrow();
        let host = doc
            .element_by_id(templates::APP_HOST)
            .ok_or_else(|| BoardError::HostNotFound(templates::APP_HOST.to_string()))?;
        html::inner_html(&doc, host)
    }

    /// One list section as HTML.
    pub fn render_list(&self, category: ProjectStatus) -> BoardResult<String> {
        let element = self.list(category)?.element();
        html::to_html(&self.doc.borrow(), element)
    }

    fn dispatch(&self, node: NodeId, event: &mut DomEvent) -> BoardResult<bool> {
        dom::dispatch(&self.doc, node, event)
    }
}

impl Drop for BoardApp {
    // Handlers and subscriptions hold clones of the components, which hold
    // the document and store handles; clear them so the cycles are released.
    fn drop(&mut self) {
        if let Ok(mut store) = self.store.try_borrow_mut() {
            for list in &self.lists {
                if let Some(id) = list.subscription() {
                    store.unsubscribe(id);
                }
            }
        }
        if let Ok(mut doc) = self.doc.try_borrow_mut() {
            doc.clear_listeners();
        }
    }
}
