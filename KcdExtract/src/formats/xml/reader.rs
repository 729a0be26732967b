//! XML file reading into an element arena

use super::document::{ElementId, XmlDocument, XmlElement};
use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs;
use std::path::Path;

/// Read an XML file from disk
///
/// # Errors
/// Returns an error if the file cannot be read or has invalid XML.
pub fn read_xml<P: AsRef<Path>>(path: P) -> Result<XmlDocument> {
    let content = fs::read_to_string(path)?;
    parse_xml(&content)
}

/// Parse XML from a string
///
/// # Errors
/// Returns an error if the XML is malformed or has no root element.
pub fn parse_xml(content: &str) -> Result<XmlDocument> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = Reader::from_str(content);
    reader.trim_text(true);

    let mut doc: Option<XmlDocument> = None;
    let mut stack: Vec<ElementId> = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let element = element_from_start(&e)?;
                let id = attach(&mut doc, &stack, element);
                stack.push(id);
            }
            Ok(Event::Empty(e)) => {
                let element = element_from_start(&e)?;
                attach(&mut doc, &stack, element);
            }
            Ok(Event::End(_)) => {
                stack.pop();
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape()?;
                push_text(&mut doc, &stack, &text);
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                push_text(&mut doc, &stack, &text);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlError(e)),
            _ => {}
        }
        buf.clear();
    }

    doc.ok_or(Error::MissingRootElement)
}

fn element_from_start(start: &BytesStart) -> Result<XmlElement> {
    let mut element = XmlElement::new(String::from_utf8_lossy(start.name().as_ref()));
    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        element.attributes.insert(key, value);
    }
    Ok(element)
}

/// Adds `element` under the current open element, or makes it the root.
fn attach(doc: &mut Option<XmlDocument>, stack: &[ElementId], element: XmlElement) -> ElementId {
    match doc {
        None => {
            let mut new_doc = XmlDocument::new(element.tag.clone());
            let root = new_doc.root();
            *new_doc.element_mut(root) = element;
            *doc = Some(new_doc);
            root
        }
        Some(doc) => {
            let id = doc.create_element(element);
            // Siblings of the root element are not part of the tree
            if let Some(&parent) = stack.last() {
                doc.append_child(parent, id);
            }
            id
        }
    }
}

fn push_text(doc: &mut Option<XmlDocument>, stack: &[ElementId], text: &str) {
    let (Some(doc), Some(&current)) = (doc.as_mut(), stack.last()) else {
        return;
    };
    let element = doc.element_mut(current);
    match element.text.as_mut() {
        Some(existing) => existing.push_str(text),
        None => element.text = Some(text.to_string()),
    }
}
