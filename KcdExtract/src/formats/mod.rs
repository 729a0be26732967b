//! File format handlers for KCD2 data tables

pub mod xml;

// Re-export main document types
pub use xml::{ElementId, XmlDocument, XmlElement, read_xml, write_xml};
