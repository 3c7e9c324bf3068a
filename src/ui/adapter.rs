// Panel presentation adapter.
// Derives what an expanded item's panel shows and turns clicks into intents.

use std::collections::HashSet;

use serde_json::Value;

use crate::registry::TableColumn;
use crate::remote::Record;
use crate::state::{Item, PanelStateManager, TabState};

/// An upward request from the panel to the state manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelIntent {
    Select { item_id: String, tab_id: String },
    Refresh { item_id: String, tab_id: String },
}

/// Read-only view of one item's panel, rebuilt on every frame.
pub struct PanelView<'a> {
    item: &'a Item,
    tabs: Vec<&'a TabState>,
    active_tab: Option<&'a str>,
    active: Option<&'a TabState>,
    columns: &'a [TableColumn],
}

impl<'a> PanelView<'a> {
    pub fn new(item: &'a Item, panels: &'a PanelStateManager) -> Self {
        let renders = |t: &TabState| t.visible && !item.suppresses(&t.id);

        let mut tabs: Vec<&TabState> = panels
            .tab_states(&item.id)
            .iter()
            .filter(|t| renders(*t))
            .collect();
        tabs.sort_by_key(|t| t.order);

        let active_tab = panels.active_tab(&item.id);
        let active = active_tab
            .and_then(|id| panels.tab_state(&item.id, id))
            .filter(|t| renders(*t));

        Self {
            item,
            tabs,
            active_tab,
            active,
            columns: active_tab.map(|id| panels.columns(id)).unwrap_or(&[]),
        }
    }

    /// Tabs shown for this item, honouring its per-item suppression.
    pub fn rendered_tabs(&self) -> &[&'a TabState] {
        &self.tabs
    }

    pub fn columns(&self) -> &'a [TableColumn] {
        self.columns
    }

    pub fn active_tab(&self) -> Option<&'a str> {
        self.active_tab
    }

    pub fn is_active(&self, tab_id: &str) -> bool {
        self.active_tab == Some(tab_id)
    }

    /// State of the active tab, if it is rendered.
    pub fn active_state(&self) -> Option<&'a TabState> {
        self.active
    }

    /// Position of the active tab among the rendered tabs.
    pub fn active_index(&self) -> Option<usize> {
        let active = self.active_tab?;
        self.tabs.iter().position(|t| t.id == active)
    }

    fn find(&self, tab_id: &str) -> Option<&'a TabState> {
        self.tabs.iter().copied().find(|t| t.id == tab_id)
    }

    /// Refresh is offered once a tab has loaded and is idle.
    pub fn can_refresh(&self, tab_id: &str) -> bool {
        self.find(tab_id).is_some_and(|t| t.loaded && !t.loading)
    }

    pub fn has_data(&self, tab_id: &str) -> bool {
        self.find(tab_id).is_some_and(|t| t.has_data())
    }

    pub fn row_count(&self, tab_id: &str) -> usize {
        self.find(tab_id).map(|t| t.data.len()).unwrap_or(0)
    }

    /// Select a tab. None when it is already active.
    pub fn select(&self, tab_id: &str) -> Option<PanelIntent> {
        if self.is_active(tab_id) {
            return None;
        }
        Some(PanelIntent::Select {
            item_id: self.item.id.clone(),
            tab_id: tab_id.to_string(),
        })
    }

    /// Select the rendered tab at a position.
    pub fn select_index(&self, index: usize) -> Option<PanelIntent> {
        let tab = self.tabs.get(index)?;
        self.select(&tab.id)
    }

    /// Select the next rendered tab, wrapping around.
    pub fn select_next(&self) -> Option<PanelIntent> {
        let len = self.tabs.len();
        if len == 0 {
            return None;
        }
        let next = self.active_index().map(|i| (i + 1) % len).unwrap_or(0);
        self.select_index(next)
    }

    /// Select the previous rendered tab, wrapping around.
    pub fn select_prev(&self) -> Option<PanelIntent> {
        let len = self.tabs.len();
        if len == 0 {
            return None;
        }
        let prev = self
            .active_index()
            .map(|i| (i + len - 1) % len)
            .unwrap_or(0);
        self.select_index(prev)
    }

    pub fn refresh(&self, tab_id: &str) -> PanelIntent {
        PanelIntent::Refresh {
            item_id: self.item.id.clone(),
            tab_id: tab_id.to_string(),
        }
    }

    pub fn refresh_active(&self) -> Option<PanelIntent> {
        self.active_tab.map(|tab_id| self.refresh(tab_id))
    }

    /// When the active tab is not rendered for this item, pick the first rendered one.
    pub fn fallback_selection(&self) -> Option<PanelIntent> {
        if self.active_state().is_some() {
            return None;
        }
        let first = self.tabs.first()?;
        self.select(&first.id)
    }
}

/// Expanded rows of the active tab's table.
#[derive(Debug, Clone, Default)]
pub struct RowExpansion {
    tab_id: Option<String>,
    rows: HashSet<usize>,
}

impl RowExpansion {
    /// Drop expansions that belong to a different tab.
    fn scope_to(&mut self, tab_id: &str) {
        if self.tab_id.as_deref() != Some(tab_id) {
            self.tab_id = Some(tab_id.to_string());
            self.rows.clear();
        }
    }

    pub fn toggle(&mut self, tab_id: &str, row: usize) {
        self.scope_to(tab_id);
        if !self.rows.remove(&row) {
            self.rows.insert(row);
        }
    }

    pub fn is_expanded(&self, tab_id: &str, row: usize) -> bool {
        self.tab_id.as_deref() == Some(tab_id) && self.rows.contains(&row)
    }

    pub fn clear(&mut self) {
        self.tab_id = None;
        self.rows.clear();
    }
}

/// Render one record field as table cell text.
pub fn cell_text(record: &Record, key: &str) -> String {
    match record.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TabRegistry;
    use crate::remote::CanonicalResult;
    use crate::state::panel::FetchCompletion;
    use serde_json::json;

    fn item(show_documents: bool) -> Item {
        Item {
            id: if show_documents { "item1" } else { "item2" }.to_string(),
            title: "T".to_string(),
            description: String::new(),
            badge: 0,
            created_date: String::new(),
            team: String::new(),
            show_documents,
        }
    }

    fn manager_with_documents() -> PanelStateManager {
        let mut registry = TabRegistry::default();
        registry.set_visibility("documents", true);
        PanelStateManager::new(registry)
    }

    fn rendered_ids(view: &PanelView) -> Vec<String> {
        view.rendered_tabs().iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn test_suppression_is_per_item() {
        let mut manager = manager_with_documents();
        let shows = item(true);
        let hides = item(false);
        manager.expand(&shows.id);
        manager.expand(&hides.id);

        let view = PanelView::new(&shows, &manager);
        assert!(rendered_ids(&view).contains(&"documents".to_string()));

        let view = PanelView::new(&hides, &manager);
        assert_eq!(
            rendered_ids(&view),
            vec!["overview", "team", "analytics", "settings"]
        );
    }

    #[test]
    fn test_columns_follow_active_tab() {
        let mut manager = manager_with_documents();
        let shows = item(true);
        manager.expand(&shows.id);
        manager.select_tab(&shows.id, "documents");

        let view = PanelView::new(&shows, &manager);
        assert_eq!(view.columns()[0].key, "fileName");
        assert_eq!(view.active_state().unwrap().id, "documents");
    }

    #[test]
    fn test_intents() {
        let mut manager = PanelStateManager::new(TabRegistry::default());
        let it = item(true);
        manager.expand(&it.id);
        let view = PanelView::new(&it, &manager);

        assert_eq!(view.select("overview"), None);
        assert_eq!(
            view.select("team"),
            Some(PanelIntent::Select {
                item_id: "item1".to_string(),
                tab_id: "team".to_string()
            })
        );
        assert_eq!(
            view.select_prev(),
            Some(PanelIntent::Select {
                item_id: "item1".to_string(),
                tab_id: "settings".to_string()
            })
        );
        assert_eq!(
            view.refresh_active(),
            Some(PanelIntent::Refresh {
                item_id: "item1".to_string(),
                tab_id: "overview".to_string()
            })
        );
        // Loading, not yet loaded
        assert!(!view.can_refresh("overview"));
        assert_eq!(view.fallback_selection(), None);
    }

    #[test]
    fn test_fallback_when_active_is_suppressed() {
        let mut manager = manager_with_documents();
        let hides = item(false);
        manager.expand(&hides.id);
        manager.select_tab(&hides.id, "documents");
        assert_eq!(manager.active_tab(&hides.id), Some("documents"));

        let view = PanelView::new(&hides, &manager);

        assert!(view.active_state().is_none());
        assert_eq!(view.active_index(), None);
        assert_eq!(
            view.fallback_selection(),
            Some(PanelIntent::Select {
                item_id: "item2".to_string(),
                tab_id: "overview".to_string()
            })
        );
    }

    #[test]
    fn test_row_count_follows_loaded_data() {
        let mut manager = PanelStateManager::new(TabRegistry::default());
        let it = item(true);
        manager.expand(&it.id);
        let request = match manager.next_task() {
            Some(crate::state::panel::PanelTask::Fetch(request)) => request,
            other => panic!("expected a fetch, got {other:?}"),
        };

        {
            let view = PanelView::new(&it, &manager);
            assert!(!view.has_data("overview"));
            assert_eq!(view.row_count("overview"), 0);
        }

        manager.apply_completion(FetchCompletion {
            request,
            outcome: Ok(CanonicalResult::from_items(vec![json!({"a": 1}), json!({"a": 2})])),
        });

        let view = PanelView::new(&it, &manager);
        assert!(view.has_data("overview"));
        assert_eq!(view.row_count("overview"), 2);
        assert_eq!(view.row_count("coverage"), 0);
        assert!(view.can_refresh("overview"));
    }

    #[test]
    fn test_row_expansion_resets_on_tab_change() {
        let mut rows = RowExpansion::default();
        rows.toggle("team", 1);
        rows.toggle("team", 3);
        assert!(rows.is_expanded("team", 1));

        rows.toggle("team", 1);
        assert!(!rows.is_expanded("team", 1));
        assert!(rows.is_expanded("team", 3));

        rows.toggle("overview", 0);
        assert!(!rows.is_expanded("team", 3));
        assert!(rows.is_expanded("overview", 0));
    }

    #[test]
    fn test_cell_text() {
        let record = json!({"name": "Ada", "progress": 75, "active": true, "note": null});
        assert_eq!(cell_text(&record, "name"), "Ada");
        assert_eq!(cell_text(&record, "progress"), "75");
        assert_eq!(cell_text(&record, "active"), "true");
        assert_eq!(cell_text(&record, "note"), "");
        assert_eq!(cell_text(&record, "missing"), "");
        assert_eq!(cell_text(&json!(5), "name"), "");
    }
}
