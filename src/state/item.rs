// Listable items with expandable detail panels.

use serde::{Deserialize, Serialize};

use crate::registry::defaults::DOCUMENTS;

fn default_true() -> bool {
    true
}

/// A top-level entity shown in the item list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub badge: u32,
    #[serde(default)]
    pub created_date: String,
    #[serde(default)]
    pub team: String,
    /// When false, the documents tab is hidden for this item only.
    #[serde(default = "default_true")]
    pub show_documents: bool,
}

impl Item {
    /// Whether this item suppresses a tab regardless of global visibility.
    pub fn suppresses(&self, tab_id: &str) -> bool {
        tab_id == DOCUMENTS && !self.show_documents
    }

    /// Built-in items used when no list is configured.
    pub fn samples() -> Vec<Item> {
        vec![
            Item {
                id: "item1".to_string(),
                title: "Project Alpha".to_string(),
                description: "Development Team • Created: 2024-01-15".to_string(),
                badge: 42,
                created_date: "2024-01-15".to_string(),
                team: "Development Team".to_string(),
                show_documents: true,
            },
            Item {
                id: "item2".to_string(),
                title: "Marketing Campaign".to_string(),
                description: "Marketing Team • Created: 2024-02-01".to_string(),
                badge: 128,
                created_date: "2024-02-01".to_string(),
                team: "Marketing Team".to_string(),
                show_documents: false,
            },
            Item {
                id: "item3".to_string(),
                title: "Research Project".to_string(),
                description: "R&D Department • Created: 2024-01-20".to_string(),
                badge: 76,
                created_date: "2024-01-20".to_string(),
                team: "R&D Department".to_string(),
                show_documents: true,
            },
        ]
    }
}
