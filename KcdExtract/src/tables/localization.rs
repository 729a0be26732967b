//! Localized item names (`text_ui_items.xml`)

use crate::formats::xml::XmlDocument;
use std::collections::HashMap;

/// Display names of one localization key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedName {
    pub item_name: Option<String>,
    pub alt_name: Option<String>,
}

/// Localization key (an item's `UIName`) to display names.
#[derive(Debug, Clone, Default)]
pub struct LocalizedNames {
    entries: HashMap<String, LocalizedName>,
}

impl LocalizedNames {
    /// Parse the `Row`/`Cell` table.
    ///
    /// The first three cells of a row hold the key, the alternative name and
    /// the item name. Rows with fewer cells or an empty key are skipped.
    pub fn from_document(doc: &XmlDocument) -> Self {
        let mut entries = HashMap::new();

        for row in doc.find_all("Row") {
            let cells: Vec<Option<String>> = doc
                .children(row)
                .iter()
                .map(|&cell| doc.element(cell))
                .filter(|cell| cell.tag == "Cell")
                .take(3)
                .map(|cell| cell.text.clone())
                .collect();
            let [Some(key), alt_name, item_name] = <[Option<String>; 3]>::try_from(cells)
                .unwrap_or([None, None, None])
            else {
                continue;
            };
            entries.insert(key, LocalizedName { item_name, alt_name });
        }

        tracing::debug!("Loaded {} localized item names", entries.len());
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&LocalizedName> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
