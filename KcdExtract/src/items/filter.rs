//! Placeholder-item rejection

use crate::formats::xml::XmlElement;
use serde::{Deserialize, Serialize};

/// Rejects placeholder and debug items.
///
/// An item is rejected when its `IconId` equals one of `icon_ids` or its
/// `UIInfo` equals one of `ui_infos`. Both comparisons ignore case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemFilter {
    pub icon_ids: Vec<String>,
    pub ui_infos: Vec<String>,
}

impl Default for ItemFilter {
    fn default() -> Self {
        Self {
            icon_ids: vec!["trafficcone".to_string()],
            ui_infos: vec!["ui_in_warning".to_string()],
        }
    }
}

impl ItemFilter {
    /// Whether an item with these field values is rejected.
    pub fn rejects_values(&self, icon_id: Option<&str>, ui_info: Option<&str>) -> bool {
        let listed = |value: Option<&str>, list: &[String]| {
            value.is_some_and(|v| list.iter().any(|s| s.eq_ignore_ascii_case(v)))
        };
        listed(icon_id, &self.icon_ids) || listed(ui_info, &self.ui_infos)
    }

    /// Whether `element` is rejected.
    pub fn rejects(&self, element: &XmlElement) -> bool {
        self.rejects_values(element.get("IconId"), element.get("UIInfo"))
    }
}
