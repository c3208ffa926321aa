//! In-memory document model used as the rendering target.
//!
//! Elements live in an arena addressed by generation-checked `NodeId`s, so
//! a handle to a removed element never resolves to a newer one. Templates
//! are registered by id and cloned into detached elements on import.

pub mod event;
pub mod html;

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use crate::error::{BoardError, BoardResult};

pub use event::{DomEvent, EventHandler, EventKind, EventOutcome};

/// Shared handle to the document of a running board.
pub type DocumentHandle = Rc<RefCell<Document>>;

/// Handle to an element in a `Document`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

/// Where to attach an element relative to the host's existing children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    /// Before the first child.
    Start,
    /// After the last child.
    End,
}

/// A live element.
#[derive(Debug, Clone, Default)]
pub struct Element {
    pub tag: String,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    text: Option<String>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Element {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn id(&self) -> Option<&str> {
        self.attribute("id")
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// Declarative element tree, used as template content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSpec {
    tag: String,
    attributes: Vec<(String, String)>,
    classes: Vec<String>,
    text: Option<String>,
    children: Vec<ElementSpec>,
}

impl ElementSpec {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attributes: Vec::new(),
            classes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.to_string(), value.to_string()));
        self
    }

    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn child(mut self, child: ElementSpec) -> Self {
        self.children.push(child);
        self
    }
}

/// Inert template content, cloned on import.
#[derive(Debug, Clone, Default)]
pub struct Template {
    content: Vec<ElementSpec>,
}

impl Template {
    pub fn new(content: Vec<ElementSpec>) -> Self {
        Self { content }
    }

    /// The element that becomes a component's root on import.
    pub fn first_element(&self) -> Option<&ElementSpec> {
        self.content.first()
    }
}

impl From<ElementSpec> for Template {
    fn from(spec: ElementSpec) -> Self {
        Self::new(vec![spec])
    }
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    element: Option<Element>,
}

/// The element arena plus templates and event listeners.
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<usize>,
    body: NodeId,
    templates: HashMap<String, Template>,
    listeners: HashMap<NodeId, Vec<(EventKind, EventHandler)>>,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("elements", &(self.slots.len() - self.free.len()))
            .field("templates", &self.templates.keys().collect::<Vec<_>>())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document containing only an empty `body`.
    pub fn new() -> Self {
        let mut doc = Self {
            slots: Vec::new(),
            free: Vec::new(),
            body: NodeId { index: 0, generation: 0 },
            templates: HashMap::new(),
            listeners: HashMap::new(),
        };
        doc.body = doc.alloc(Element {
            tag: "body".to_string(),
            ..Element::default()
        });
        doc
    }

    /// Create a document behind a shared handle.
    pub fn shared() -> DocumentHandle {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn register_template(&mut self, id: &str, template: Template) {
        self.templates.insert(id.to_string(), template);
    }

    pub fn template(&self, id: &str) -> Option<&Template> {
        self.templates.get(id)
    }

    /// Deep-clone a template's first element into a detached element.
    pub fn import_template(&mut self, template_id: &str) -> BoardResult<NodeId> {
        let spec = self
            .templates
            .get(template_id)
            .ok_or_else(|| BoardError::TemplateNotFound(template_id.to_string()))?
            .first_element()
            .cloned()
            .ok_or_else(|| BoardError::EmptyTemplate(template_id.to_string()))?;
        Ok(self.create(&spec))
    }

    /// Build a detached element tree from a spec.
    pub fn create(&mut self, spec: &ElementSpec) -> NodeId {
        let node = self.alloc(Element {
            tag: spec.tag.clone(),
            attributes: spec.attributes.iter().cloned().collect(),
            classes: spec.classes.clone(),
            text: spec.text.clone(),
            children: Vec::new(),
            parent: None,
        });
        for child_spec in &spec.children {
            let child = self.create(child_spec);
            self.link(node, child, InsertPosition::End);
        }
        node
    }

    pub fn get(&self, node: NodeId) -> BoardResult<&Element> {
        self.slots
            .get(node.index)
            .filter(|slot| slot.generation == node.generation)
            .and_then(|slot| slot.element.as_ref())
            .ok_or(BoardError::DetachedNode(node.index))
    }

    fn get_mut(&mut self, node: NodeId) -> BoardResult<&mut Element> {
        self.slots
            .get_mut(node.index)
            .filter(|slot| slot.generation == node.generation)
            .and_then(|slot| slot.element.as_mut())
            .ok_or(BoardError::DetachedNode(node.index))
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.get(node).is_ok()
    }

    /// Attach `child` to `host`, moving it out of any previous parent.
    pub fn insert_adjacent(
        &mut self,
        host: NodeId,
        position: InsertPosition,
        child: NodeId,
    ) -> BoardResult<()> {
        self.get(host)?;
        self.detach(child)?;
        self.link(host, child, position);
        Ok(())
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> BoardResult<()> {
        self.insert_adjacent(parent, InsertPosition::End, child)
    }

    /// Detach and free an element with its whole subtree.
    pub fn remove(&mut self, node: NodeId) -> BoardResult<()> {
        self.detach(node)?;
        self.free_subtree(node);
        Ok(())
    }

    /// Remove and free every child of `node`.
    pub fn clear_children(&mut self, node: NodeId) -> BoardResult<()> {
        let children = std::mem::take(&mut self.get_mut(node)?.children);
        for child in children {
            self.free_subtree(child);
        }
        Ok(())
    }

    pub fn children(&self, node: NodeId) -> BoardResult<&[NodeId]> {
        Ok(self.get(node)?.children())
    }

    /// Find an attached element by its `id` attribute.
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.find_by_id(self.body, id)
    }

    /// Find an element by `id` within the subtree rooted at `root`.
    pub fn find_by_id(&self, root: NodeId, id: &str) -> Option<NodeId> {
        self.find(root, &|el: &Element| el.id() == Some(id))
    }

    /// First element with the given tag within the subtree rooted at `root`.
    pub fn find_by_tag(&self, root: NodeId, tag: &str) -> Option<NodeId> {
        self.find(root, &|el: &Element| el.tag == tag)
    }

    fn find(&self, root: NodeId, pred: &dyn Fn(&Element) -> bool) -> Option<NodeId> {
        let el = self.get(root).ok()?;
        if pred(el) {
            return Some(root);
        }
        el.children.iter().find_map(|&child| self.find(child, pred))
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> BoardResult<()> {
        self.get_mut(node)?
            .attributes
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> BoardResult<Option<&str>> {
        Ok(self.get(node)?.attribute(name))
    }

    pub fn set_id(&mut self, node: NodeId, id: &str) -> BoardResult<()> {
        self.set_attribute(node, "id", id)
    }

    /// Form control value; empty when never set.
    pub fn value(&self, node: NodeId) -> BoardResult<String> {
        Ok(self.attribute(node, "value")?.unwrap_or_default().to_string())
    }

    pub fn set_value(&mut self, node: NodeId, value: &str) -> BoardResult<()> {
        self.set_attribute(node, "value", value)
    }

    pub fn set_text(&mut self, node: NodeId, text: &str) -> BoardResult<()> {
        self.get_mut(node)?.text = Some(text.to_string());
        Ok(())
    }

    pub fn text(&self, node: NodeId) -> BoardResult<Option<&str>> {
        Ok(self.get(node)?.text())
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) -> BoardResult<()> {
        let el = self.get_mut(node)?;
        if !el.has_class(class) {
            el.classes.push(class.to_string());
        }
        Ok(())
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) -> BoardResult<()> {
        self.get_mut(node)?.classes.retain(|c| c != class);
        Ok(())
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> BoardResult<bool> {
        Ok(self.get(node)?.has_class(class))
    }

    pub fn add_event_listener(
        &mut self,
        node: NodeId,
        kind: EventKind,
        handler: EventHandler,
    ) -> BoardResult<()> {
        self.get(node)?;
        self.listeners.entry(node).or_default().push((kind, handler));
        Ok(())
    }

    /// Handlers registered on `node` for `kind`, in registration order.
    pub fn handlers(&self, node: NodeId, kind: EventKind) -> Vec<EventHandler> {
        self.listeners
            .get(&node)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|(k, _)| *k == kind)
                    .map(|(_, h)| h.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.values().map(Vec::len).sum()
    }

    /// Drop every registered handler.
    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }

    fn alloc(&mut self, element: Element) -> NodeId {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.generation += 1;
                slot.element = Some(element);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    element: Some(element),
                });
                NodeId {
                    index: self.slots.len() - 1,
                    generation: 0,
                }
            }
        }
    }

    fn link(&mut self, parent: NodeId, child: NodeId, position: InsertPosition) {
        if let Ok(el) = self.get_mut(child) {
            el.parent = Some(parent);
        }
        if let Ok(el) = self.get_mut(parent) {
            match position {
                InsertPosition::Start => el.children.insert(0, child),
                InsertPosition::End => el.children.push(child),
            }
        }
    }

    fn detach(&mut self, node: NodeId) -> BoardResult<()> {
        let parent = self.get_mut(node)?.parent.take();
        if let Some(parent) = parent {
            if let Ok(el) = self.get_mut(parent) {
                el.children.retain(|&c| c != node);
            }
        }
        Ok(())
    }

    fn free_subtree(&mut self, node: NodeId) {
        let Some(element) = self
            .slots
            .get_mut(node.index)
            .filter(|slot| slot.generation == node.generation)
            .and_then(|slot| slot.element.take())
        else {
            return;
        };
        self.listeners.remove(&node);
        self.free.push(node.index);
        for child in element.children {
            self.free_subtree(child);
        }
    }
}

/// Run the handlers registered on `node` for the event's kind.
///
/// Handlers are collected first and the document borrow is released before
/// any of them runs, so handlers may borrow the document themselves.
/// Returns whether any handler ran.
pub fn dispatch(doc: &DocumentHandle, node: NodeId, event: &mut DomEvent) -> BoardResult<bool> {
    let handlers = doc.borrow().handlers(node, event.kind);
    if handlers.is_empty() {
        return Ok(false);
    }
    for handler in handlers {
        handler(event)?;
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> ElementSpec {
        ElementSpec::new("li")
            .attr("draggable", "true")
            .child(ElementSpec::new("h2"))
            .child(ElementSpec::new("p"))
    }

    #[test]
    fn test_import_template_clones_content() {
        let mut doc = Document::new();
        doc.register_template("single-project", card().into());

        let first = doc.import_template("single-project").unwrap();
        let second = doc.import_template("single-project").unwrap();

        assert_ne!(first, second);
        assert_eq!(doc.get(first).unwrap().tag, "li");
        assert_eq!(doc.children(first).unwrap().len(), 2);
        assert!(doc.get(first).unwrap().parent().is_none());
    }

    #[test]
    fn test_import_missing_or_empty_template() {
        let mut doc = Document::new();
        doc.register_template("empty", Template::default());

        assert_eq!(
            doc.import_template("nope"),
            Err(BoardError::TemplateNotFound("nope".to_string()))
        );
        assert_eq!(
            doc.import_template("empty"),
            Err(BoardError::EmptyTemplate("empty".to_string()))
        );
    }

    #[test]
    fn test_insert_adjacent_positions() {
        let mut doc = Document::new();
        let body = doc.body();
        let a = doc.create(&ElementSpec::new("div").id("a"));
        let b = doc.create(&ElementSpec::new("div").id("b"));
        let c = doc.create(&ElementSpec::new("div").id("c"));

        doc.insert_adjacent(body, InsertPosition::End, a).unwrap();
        doc.insert_adjacent(body, InsertPosition::End, b).unwrap();
        doc.insert_adjacent(body, InsertPosition::Start, c).unwrap();

        assert_eq!(doc.children(body).unwrap(), &[c, a, b]);
        assert_eq!(doc.element_by_id("b"), Some(b));
    }

    #[test]
    fn test_clear_children_frees_subtree_and_listeners() {
        let mut doc = Document::new();
        let body = doc.body();
        let item = doc.create(&card());
        doc.append_child(body, item).unwrap();
        let heading = doc.find_by_tag(item, "h2").unwrap();
        doc.add_event_listener(item, EventKind::DragStart, Rc::new(|_: &mut DomEvent| -> BoardResult<()> { Ok(()) }))
            .unwrap();

        doc.clear_children(body).unwrap();

        assert!(!doc.contains(item));
        assert!(!doc.contains(heading));
        assert_eq!(doc.listener_count(), 0);
    }

    #[test]
    fn test_stale_handle_does_not_resolve_reused_slot() {
        let mut doc = Document::new();
        let old = doc.create(&ElementSpec::new("li"));
        doc.remove(old).unwrap();
        let new = doc.create(&ElementSpec::new("li"));

        assert!(doc.contains(new));
        assert!(doc.get(old).is_err());
    }

    #[test]
    fn test_classes_are_a_set() {
        let mut doc = Document::new();
        let ul = doc.create(&ElementSpec::new("ul"));
        doc.add_class(ul, "droppable").unwrap();
        doc.add_class(ul, "droppable").unwrap();
        assert_eq!(doc.get(ul).unwrap().classes().len(), 1);
        doc.remove_class(ul, "droppable").unwrap();
        assert!(!doc.has_class(ul, "droppable").unwrap());
    }

    #[test]
    fn test_dispatch_releases_borrow() {
        let doc = Document::shared();
        let node = doc.borrow_mut().create(&ElementSpec::new("form"));
        let inner = doc.clone();
        doc.borrow_mut()
            .add_event_listener(
                node,
                EventKind::Submit,
                Rc::new(move |event: &mut DomEvent| inner.borrow_mut().set_value(event.target, "seen")),
            )
            .unwrap();

        let mut event = DomEvent::new(EventKind::Submit, node);
        assert!(dispatch(&doc, node, &mut event).unwrap());
        assert_eq!(doc.borrow().value(node).unwrap(), "seen");

        let mut drop = DomEvent::new(EventKind::Drop, node);
        assert!(!dispatch(&doc, node, &mut drop).unwrap());
    }
}
