//! XML file writing for merged item dumps

use super::document::{ElementId, XmlDocument};
use crate::error::Result;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::fs;
use std::path::Path;

/// Write an XML document to disk
///
/// # Errors
/// Returns an error if serialization or file writing fails.
pub fn write_xml<P: AsRef<Path>>(doc: &XmlDocument, path: P) -> Result<()> {
    let xml = serialize_xml(doc)?;
    fs::write(path, xml)?;
    Ok(())
}

/// Serialize an XML document to a string, indented with 4 spaces
///
/// # Errors
/// Returns an error if XML serialization fails.
pub fn serialize_xml(doc: &XmlDocument) -> Result<String> {
    let mut output = Vec::new();
    let mut writer = Writer::new_with_indent(&mut output, b' ', 4);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    write_element(&mut writer, doc, doc.root())?;

    let mut xml = String::from_utf8(output)?;
    xml.push('\n');
    Ok(xml)
}

fn write_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    doc: &XmlDocument,
    id: ElementId,
) -> Result<()> {
    let element = doc.element(id);
    let mut start = BytesStart::new(element.tag.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    let text = element.text.as_deref().filter(|t| !t.is_empty());
    if element.children().is_empty() && text.is_none() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    if let Some(text) = text {
        writer.write_event(Event::Text(BytesText::new(text)))?;
    }
    for &child in element.children() {
        write_element(writer, doc, child)?;
    }
    writer.write_event(Event::End(BytesEnd::new(element.tag.as_str())))?;
    Ok(())
}
