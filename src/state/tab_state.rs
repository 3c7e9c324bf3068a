// Per-item, per-tab runtime state.

use crate::registry::TabDefinition;
use crate::remote::{CanonicalResult, Record};

/// Load state of one tab for one item, seeded from a definition snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct TabState {
    pub id: String,
    pub title: String,
    pub order: i32,
    pub visible: bool,
    pub icon: Option<String>,
    /// A fetch is in flight. At most one per (item, tab).
    pub loading: bool,
    /// At least one fetch has completed successfully.
    pub loaded: bool,
    pub data: Vec<Record>,
    pub last_updated: Option<String>,
    pub total_count: u64,
}

impl TabState {
    pub fn from_definition(def: &TabDefinition) -> Self {
        Self {
            id: def.id.clone(),
            title: def.title.clone(),
            order: def.order,
            visible: def.visible,
            icon: def.icon.clone(),
            loading: false,
            loaded: false,
            data: Vec::new(),
            last_updated: None,
            total_count: 0,
        }
    }

    /// Whether a load should start. Loading tabs never start another.
    pub fn needs_load(&self, forced: bool) -> bool {
        !self.loading && (forced || !self.loaded)
    }

    /// Store a successful result.
    pub fn set_loaded(&mut self, result: CanonicalResult) {
        self.loading = false;
        self.loaded = true;
        self.data = result.items;
        self.last_updated = Some(result.last_updated);
        self.total_count = result.total_count;
    }

    /// Clear the loading flag after a failed fetch, keeping prior data.
    pub fn set_failed(&mut self) {
        self.loading = false;
    }

    pub fn has_data(&self) -> bool {
        !self.data.is_empty()
    }
}
