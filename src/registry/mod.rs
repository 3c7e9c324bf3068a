// Tab registry module.
// Owns the global tab definitions, their ordering, visibility and column schema.

pub mod defaults;

use serde::{Deserialize, Serialize};

/// A column in a tab's data table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableColumn {
    /// Record field rendered in this column.
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub sortable: bool,
    /// Relative width as a percentage string, e.g. "25%".
    #[serde(default)]
    pub width: Option<String>,
}

impl TableColumn {
    pub fn new(key: &str, label: &str, sortable: bool, width: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            sortable,
            width: Some(width.to_string()),
        }
    }

    /// Width as a percentage, if one was declared and parses.
    pub fn width_percent(&self) -> Option<u16> {
        self.width
            .as_deref()
            .and_then(|w| w.trim().trim_end_matches('%').parse().ok())
    }
}

/// Global configuration for one tab, shared by every item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabDefinition {
    pub id: String,
    pub title: String,
    /// Sort key. Equal values keep registration order.
    pub order: i32,
    pub visible: bool,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub columns: Vec<TableColumn>,
}

/// Registry of tab definitions, kept in registration order.
#[derive(Debug, Clone)]
pub struct TabRegistry {
    definitions: Vec<TabDefinition>,
}

impl Default for TabRegistry {
    fn default() -> Self {
        Self::new(defaults::tab_definitions())
    }
}

impl TabRegistry {
    pub fn new(definitions: Vec<TabDefinition>) -> Self {
        Self { definitions }
    }

    /// Visible definitions, sorted by order.
    pub fn get_visible(&self) -> Vec<&TabDefinition> {
        let mut visible: Vec<&TabDefinition> =
            self.definitions.iter().filter(|d| d.visible).collect();
        // sort_by_key is stable, so ties keep registration order
        visible.sort_by_key(|d| d.order);
        visible
    }

    /// All definitions, sorted by order.
    pub fn get_all(&self) -> Vec<&TabDefinition> {
        let mut all: Vec<&TabDefinition> = self.definitions.iter().collect();
        all.sort_by_key(|d| d.order);
        all
    }

    pub fn get(&self, tab_id: &str) -> Option<&TabDefinition> {
        self.definitions.iter().find(|d| d.id == tab_id)
    }

    /// Declared columns for a tab, empty if the tab is unknown.
    pub fn get_columns(&self, tab_id: &str) -> &[TableColumn] {
        self.get(tab_id).map(|d| d.columns.as_slice()).unwrap_or(&[])
    }

    /// Set a tab's visibility in place. Returns false if the tab is unknown.
    pub fn set_visibility(&mut self, tab_id: &str, visible: bool) -> bool {
        match self.definitions.iter_mut().find(|d| d.id == tab_id) {
            Some(def) => {
                def.visible = visible;
                true
            }
            None => false,
        }
    }

    /// Flip a tab's visibility. Returns the new flag, or None if unknown.
    pub fn toggle_visibility(&mut self, tab_id: &str) -> Option<bool> {
        let def = self.definitions.iter_mut().find(|d| d.id == tab_id)?;
        def.visible = !def.visible;
        Some(def.visible)
    }
}
