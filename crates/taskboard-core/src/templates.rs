//! Standard templates and element ids of the board page.

use crate::dom::{Document, ElementSpec, Template};
use crate::validation::{PEOPLE_MAX, PEOPLE_MIN};

pub const PROJECT_INPUT: &str = "project-input";
pub const PROJECT_LIST: &str = "project-list";
pub const SINGLE_PROJECT: &str = "single-project";

/// Host every top-level component attaches into.
pub const APP_HOST: &str = "app";
pub const INPUT_FORM: &str = "user-input";

pub const DROPPABLE_CLASS: &str = "droppable";
pub const DRAGGING_CLASS: &str = "dragging";

/// Register the three board templates on `doc`.
pub fn install(doc: &mut Document) {
    doc.register_template(PROJECT_INPUT, project_input());
    doc.register_template(PROJECT_LIST, project_list());
    doc.register_template(SINGLE_PROJECT, single_project());
}

/// The empty `#app` host.
pub fn app_host() -> ElementSpec {
    ElementSpec::new("div").id(APP_HOST)
}

fn form_control(label: &str, field: ElementSpec, field_id: &str) -> ElementSpec {
    ElementSpec::new("div")
        .class("form-control")
        .child(ElementSpec::new("label").attr("for", field_id).text(label))
        .child(field)
}

fn project_input() -> Template {
    ElementSpec::new("form")
        .attr("method", "post")
        .attr("action", "/projects")
        .child(form_control(
            "Title",
            ElementSpec::new("input").attr("type", "text").attr("name", "title").id("title"),
            "title",
        ))
        .child(form_control(
            "Description",
            ElementSpec::new("textarea").attr("name", "description").attr("rows", "3").id("description"),
            "description",
        ))
        .child(form_control(
            "People",
            ElementSpec::new("input")
                .attr("type", "number")
                .attr("name", "people")
                .attr("step", "1")
                .attr("min", &PEOPLE_MIN.to_string())
                .attr("max", &PEOPLE_MAX.to_string())
                .id("people"),
            "people",
        ))
        .child(
            ElementSpec::new("button")
                .attr("type", "submit")
                .text("ADD PROJECT"),
        )
        .into()
}

fn project_list() -> Template {
    ElementSpec::new("section")
        .class("projects")
        .child(ElementSpec::new("header").child(ElementSpec::new("h2")))
        .child(ElementSpec::new("ul"))
        .into()
}

fn single_project() -> Template {
    ElementSpec::new("li")
        .attr("draggable", "true")
        .child(ElementSpec::new("h2"))
        .child(ElementSpec::new("h3"))
        .child(ElementSpec::new("p"))
        .into()
}
