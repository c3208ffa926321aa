//! Component lifecycle shared by every visual element of the board.
//!
//! A component is created by `mount`, which runs a fixed sequence:
//! attach the template clone to its host, build the concrete component
//! around the attached base, then `configure`, then `render_content`.
//! Concrete components never run lifecycle steps from their constructors.

pub mod input;
pub mod item;
pub mod list;

use crate::dom::{Document, DocumentHandle, InsertPosition, NodeId};
use crate::error::{BoardError, BoardResult};

pub use input::ProjectInput;
pub use item::ProjectItem;
pub use list::ProjectList;

/// Where and from what a component is instantiated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountOptions {
    pub template_id: String,
    pub host_id: String,
    pub position: InsertPosition,
    pub element_id: Option<String>,
}

impl MountOptions {
    pub fn new(template_id: &str, host_id: &str, position: InsertPosition) -> Self {
        Self {
            template_id: template_id.to_string(),
            host_id: host_id.to_string(),
            position,
            element_id: None,
        }
    }

    /// Stamp this id onto the cloned root element.
    pub fn with_element_id(mut self, id: &str) -> Self {
        self.element_id = Some(id.to_string());
        self
    }
}

/// The host a component was attached into and the element it owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentBase {
    pub host: NodeId,
    pub element: NodeId,
}

impl ComponentBase {
    /// Clone the template, stamp the optional id, and attach it to the host.
    pub fn attach(doc: &mut Document, options: &MountOptions) -> BoardResult<Self> {
        let host = doc
            .element_by_id(&options.host_id)
            .ok_or_else(|| BoardError::HostNotFound(options.host_id.clone()))?;
        let element = doc.import_template(&options.template_id)?;
        if let Some(id) = &options.element_id {
            doc.set_id(element, id)?;
        }
        doc.insert_adjacent(host, options.position, element)?;
        Ok(Self { host, element })
    }
}

/// Lifecycle operations every concrete component supplies.
pub trait Component {
    fn base(&self) -> &ComponentBase;

    /// Wire event listeners and store subscriptions.
    fn configure(&mut self) -> BoardResult<()>;

    /// Populate the element's static or dynamic content.
    fn render_content(&mut self) -> BoardResult<()>;

    fn element(&self) -> NodeId {
        self.base().element
    }
}

/// Attach, build, configure, render.
///
/// `build` receives the attached base and initializes the component's own
/// fields; lifecycle methods only run once it has returned.
pub fn mount<C, F>(doc: &DocumentHandle, options: &MountOptions, build: F) -> BoardResult<C>
where
    C: Component,
    F: FnOnce(ComponentBase) -> BoardResult<C>,
{
    let base = ComponentBase::attach(&mut doc.borrow_mut(), options)?;
    let mut component = build(base)?;
    component.configure()?;
    component.render_content()?;
    Ok(component)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, ElementSpec};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Probe {
        base: ComponentBase,
        calls: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Component for Probe {
        fn base(&self) -> &ComponentBase {
            &self.base
        }

        fn configure(&mut self) -> BoardResult<()> {
            self.calls.borrow_mut().push("configure");
            Ok(())
        }

        fn render_content(&mut self) -> BoardResult<()> {
            self.calls.borrow_mut().push("render");
            Ok(())
        }
    }

    fn document() -> DocumentHandle {
        let doc = Document::shared();
        {
            let mut d = doc.borrow_mut();
            d.register_template("probe", ElementSpec::new("section").into());
            let host = d.create(&ElementSpec::new("div").id("host"));
            let existing = d.create(&ElementSpec::new("p").id("existing"));
            let body = d.body();
            d.append_child(body, host).unwrap();
            d.append_child(host, existing).unwrap();
        }
        doc
    }

    #[test]
    fn test_mount_runs_lifecycle_in_order() {
        let doc = document();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let seen = calls.clone();
        let options = MountOptions::new("probe", "host", InsertPosition::End);

        let probe = mount(&doc, &options, |base| {
            assert!(doc.borrow().get(base.element).unwrap().parent().is_some());
            seen.borrow_mut().push("build");
            Ok(Probe { base, calls: seen })
        })
        .unwrap();

        assert_eq!(*calls.borrow(), vec!["build", "configure", "render"]);
        let d = doc.borrow();
        let host = d.element_by_id("host").unwrap();
        assert_eq!(probe.base().host, host);
        assert_eq!(d.children(host).unwrap().last(), Some(&probe.element()));
    }

    #[test]
    fn test_attach_at_start_with_element_id() {
        let doc = document();
        let options =
            MountOptions::new("probe", "host", InsertPosition::Start).with_element_id("first");

        let base = ComponentBase::attach(&mut doc.borrow_mut(), &options).unwrap();

        let d = doc.borrow();
        assert_eq!(d.children(base.host).unwrap().first(), Some(&base.element));
        assert_eq!(d.element_by_id("first"), Some(base.element));
    }

    #[test]
    fn test_attach_reports_missing_host_and_template() {
        let doc = document();
        let missing_host = MountOptions::new("probe", "nowhere", InsertPosition::End);
        let missing_template = MountOptions::new("nothing", "host", InsertPosition::End);

        assert_eq!(
            ComponentBase::attach(&mut doc.borrow_mut(), &missing_host),
            Err(BoardError::HostNotFound("nowhere".to_string()))
        );
        assert_eq!(
            ComponentBase::attach(&mut doc.borrow_mut(), &missing_template),
            Err(BoardError::TemplateNotFound("nothing".to_string()))
        );
    }
}
