//! Minimal element tree read with `quick-xml`.
//!
//! Fragments are small, so the whole document is materialised before it is
//! interpreted. Only elements and attributes are kept; comments, processing
//! instructions and the declaration are dropped.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

#[derive(Debug, Default)]
pub(super) struct Element {
    pub(super) name: String,
    pub(super) attributes: Vec<(String, String)>,
    pub(super) children: Vec<Element>,
}

impl Element {
    pub(super) fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }
}

/// Parse `text` into its root element.
pub(super) fn read_document(text: &str) -> Result<Element, String> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);
    let mut stack: Vec<Element> = Vec::new();
    let mut root = None;
    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => stack.push(element(&start)?),
            Ok(Event::Empty(start)) => attach(&mut stack, &mut root, element(&start)?)?,
            Ok(Event::End(_)) => {
                let closed = stack.pop().ok_or("unbalanced end tag")?;
                attach(&mut stack, &mut root, closed)?;
            }
            Ok(Event::Text(_) | Event::CData(_)) => {
                let location = stack.last().map_or("document", |el| el.name.as_str());
                return Err(format!("unexpected text content in '{location}'"));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                return Err(format!(
                    "{err} at byte {}",
                    reader.error_position()
                ));
            }
        }
    }
    if let Some(open) = stack.last() {
        return Err(format!("element '{}' is not closed", open.name));
    }
    root.ok_or_else(|| "document has no root element".to_owned())
}

fn element(start: &BytesStart<'_>) -> Result<Element, String> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|err| format!("bad attribute on '{name}': {err}"))?;
        let key = String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|err| format!("bad value for '{key}' on '{name}': {err}"))?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
    })
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), String> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(format!("second root element '{}'", element.name));
    }
    *root = Some(element);
    Ok(())
}
