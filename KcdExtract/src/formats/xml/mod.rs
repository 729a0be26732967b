//! Generic XML tables
//!
//! KCD2 ships its item, equipment and weapon tables as plain XML inside
//! `Tables.pak`. They are loaded into an [`XmlDocument`] arena so that merge and
//! alias passes can move elements around without rebuilding the tree.

mod document;
mod reader;
mod writer;

pub use document::{ElementId, XmlDocument, XmlElement};
pub use reader::{parse_xml, read_xml};
pub use writer::{serialize_xml, write_xml};
