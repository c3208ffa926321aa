//! HTML serialization of document subtrees.

use super::{Document, NodeId};
use crate::error::BoardResult;

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

/// Serialize an element and its subtree.
pub fn to_html(doc: &Document, node: NodeId) -> BoardResult<String> {
    let mut out = String::new();
    write_element(doc, node, &mut out)?;
    Ok(out)
}

/// Serialize only the children of an element.
pub fn inner_html(doc: &Document, node: NodeId) -> BoardResult<String> {
    let mut out = String::new();
    for &child in doc.children(node)? {
        write_element(doc, child, &mut out)?;
    }
    Ok(out)
}

fn write_element(doc: &Document, node: NodeId, out: &mut String) -> BoardResult<()> {
    let el = doc.get(node)?;
    let is_textarea = el.tag == "textarea";

    out.push('<');
    out.push_str(&el.tag);
    if !el.classes().is_empty() {
        out.push_str(" class=\"");
        out.push_str(&escape_attr(&el.classes().join(" ")));
        out.push('"');
    }
    for (name, value) in el.attributes() {
        // textarea carries its value as content
        if is_textarea && name == "value" {
            continue;
        }
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_attr(value));
        out.push('"');
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&el.tag.as_str()) {
        return Ok(());
    }

    if is_textarea {
        out.push_str(&escape_text(el.attribute("value").unwrap_or_default()));
    } else if let Some(text) = el.text() {
        out.push_str(&escape_text(text));
    }
    for &child in el.children() {
        write_element(doc, child, out)?;
    }

    out.push_str("</");
    out.push_str(&el.tag);
    out.push('>');
    Ok(())
}

pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;").replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ElementSpec;

    #[test]
    fn test_serializes_nested_elements() {
        let mut doc = Document::new();
        let node = doc.create(
            &ElementSpec::new("li")
                .attr("draggable", "true")
                .class("card")
                .child(ElementSpec::new("h2").text("Build API")),
        );

        let html = to_html(&doc, node).unwrap();

        assert_eq!(html, "<li class=\"card\" draggable=\"true\"><h2>Build API</h2></li>");
    }

    #[test]
    fn test_escapes_text_and_attributes() {
        let mut doc = Document::new();
        let node = doc.create(&ElementSpec::new("p").attr("title", "\"x\"").text("<b>&</b>"));

        let html = to_html(&doc, node).unwrap();

        assert_eq!(html, "<p title=\"&quot;x&quot;\">&lt;b&gt;&amp;&lt;/b&gt;</p>");
    }

    #[test]
    fn test_void_and_textarea_values() {
        let mut doc = Document::new();
        let form = doc.create(
            &ElementSpec::new("form")
                .child(ElementSpec::new("input").id("title"))
                .child(ElementSpec::new("textarea").id("description")),
        );
        let title = doc.find_by_id(form, "title").unwrap();
        let description = doc.find_by_id(form, "description").unwrap();
        doc.set_value(title, "Build").unwrap();
        doc.set_value(description, "a < b").unwrap();

        let html = inner_html(&doc, form).unwrap();

        assert_eq!(
            html,
            "<input id=\"title\" value=\"Build\"><textarea id=\"description\">a &lt; b</textarea>"
        );
    }
}
