// Panel state management.
// Tracks expansion, active tabs and per-tab load state, and queues fetch work.

use std::collections::{HashMap, VecDeque};

use tracing::{debug, warn};

use crate::error::{Result, TileError};
use crate::registry::{TabDefinition, TabRegistry, TableColumn};
use crate::remote::CanonicalResult;

use super::tab_state::TabState;

/// A fetch the manager wants run for one (item, tab) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub item_id: String,
    pub tab_id: String,
    pub forced: bool,
    /// State epoch at the time the load started.
    pub epoch: u64,
}

/// Result of a fetch, fed back into the manager.
#[derive(Debug)]
pub struct FetchCompletion {
    pub request: FetchRequest,
    pub outcome: Result<CanonicalResult>,
}

/// Work queued by the manager for the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelTask {
    Fetch(FetchRequest),
    /// Rebuild an item's panel after a visibility reset. Runs on the next tick.
    Reexpand { item_id: String, epoch: u64 },
}

/// Where the manager stands after a registry-driven reset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResetPhase {
    #[default]
    Settled,
    /// All panel state was discarded and nothing has been rebuilt.
    Cleared,
    /// State was discarded while this item was expanded; it will be rebuilt.
    PendingReexpand { item_id: String },
}

/// One item's panel: its tab states and which one is active.
#[derive(Debug, Clone, Default)]
pub struct PanelState {
    pub active_tab: Option<String>,
    pub tabs: Vec<TabState>,
}

impl PanelState {
    fn from_definitions(definitions: &[&TabDefinition]) -> Self {
        let tabs: Vec<TabState> = definitions
            .iter()
            .map(|def| TabState::from_definition(def))
            .collect();
        Self {
            active_tab: tabs.first().map(|t| t.id.clone()),
            tabs,
        }
    }

    fn tab_mut(&mut self, tab_id: &str) -> Option<&mut TabState> {
        self.tabs.iter_mut().find(|t| t.id == tab_id)
    }

    fn contains(&self, tab_id: &str) -> bool {
        self.tabs.iter().any(|t| t.id == tab_id)
    }
}

/// Owns expansion, tab selection and load state for every item.
#[derive(Debug)]
pub struct PanelStateManager {
    registry: TabRegistry,
    expanded: Option<String>,
    panels: HashMap<String, PanelState>,
    /// Bumped on every reset so completions for discarded state can be told apart.
    epoch: u64,
    phase: ResetPhase,
    tasks: VecDeque<PanelTask>,
}

impl PanelStateManager {
    pub fn new(registry: TabRegistry) -> Self {
        Self {
            registry,
            expanded: None,
            panels: HashMap::new(),
            epoch: 0,
            phase: ResetPhase::Settled,
            tasks: VecDeque::new(),
        }
    }

    /// Toggle an item's expansion.
    pub fn expand_collapse(&mut self, item_id: &str) {
        if self.is_expanded(item_id) {
            self.collapse(item_id);
        } else {
            self.expand(item_id);
        }
    }

    /// Expand an item, collapsing any other. Builds its panel on first expansion
    /// and loads the active tab if it has not loaded yet.
    pub fn expand(&mut self, item_id: &str) {
        self.phase = ResetPhase::Settled;
        self.expanded = Some(item_id.to_string());

        let registry = &self.registry;
        let panel = self
            .panels
            .entry(item_id.to_string())
            .or_insert_with(|| PanelState::from_definitions(&registry.get_visible()));

        debug!(item = item_id, tabs = panel.tabs.len(), "expanded item");
        if let Some(tab_id) = panel.active_tab.clone() {
            self.load_tab(item_id, &tab_id, false);
        }
    }

    /// Collapse an item if it is the expanded one. Panel state is kept.
    pub fn collapse(&mut self, item_id: &str) {
        if matches!(&self.phase, ResetPhase::PendingReexpand { item_id: pending } if pending == item_id)
        {
            debug!(item = item_id, "collapse cancels pending re-expand");
            self.phase = ResetPhase::Cleared;
        }
        if self.is_expanded(item_id) {
            self.expanded = None;
            debug!(item = item_id, "collapsed item");
        }
    }

    /// Make a tab active and load it if needed. Ignored when already active or
    /// when the tab is not in the item's panel.
    pub fn select_tab(&mut self, item_id: &str, tab_id: &str) {
        let Some(panel) = self.panels.get_mut(item_id) else {
            debug!(item = item_id, tab = tab_id, "select ignored, item has no panel");
            return;
        };
        if panel.active_tab.as_deref() == Some(tab_id) {
            return;
        }
        if !panel.contains(tab_id) {
            debug!(item = item_id, error = %TileError::UnknownTab(tab_id.to_string()), "select ignored");
            return;
        }

        panel.active_tab = Some(tab_id.to_string());
        self.load_tab(item_id, tab_id, false);
    }

    /// Force a reload of a tab, even when it has already loaded.
    pub fn refresh_tab(&mut self, item_id: &str, tab_id: &str) -> bool {
        self.load_tab(item_id, tab_id, true)
    }

    /// Start a load unless one is in flight, or the tab is loaded and the load
    /// is not forced. Returns whether a fetch was queued.
    pub fn load_tab(&mut self, item_id: &str, tab_id: &str, forced: bool) -> bool {
        let epoch = self.epoch;
        let Some(state) = self.panels.get_mut(item_id).and_then(|p| p.tab_mut(tab_id)) else {
            debug!(item = item_id, error = %TileError::UnknownTab(tab_id.to_string()), "load ignored");
            return false;
        };
        if !state.needs_load(forced) {
            return false;
        }

        state.loading = true;
        debug!(item = item_id, tab = tab_id, forced, "queueing tab fetch");
        self.tasks.push_back(PanelTask::Fetch(FetchRequest {
            item_id: item_id.to_string(),
            tab_id: tab_id.to_string(),
            forced,
            epoch,
        }));
        true
    }

    /// Apply a finished fetch. Loading always clears; only success marks the tab loaded.
    pub fn apply_completion(&mut self, completion: FetchCompletion) {
        let FetchCompletion { request, outcome } = completion;
        if request.epoch != self.epoch {
            debug!(
                item = %request.item_id,
                tab = %request.tab_id,
                "dropping completion for discarded panel state"
            );
            return;
        }
        let Some(state) = self
            .panels
            .get_mut(&request.item_id)
            .and_then(|p| p.tab_mut(&request.tab_id))
        else {
            return;
        };

        match outcome {
            Ok(result) => {
                debug!(
                    item = %request.item_id,
                    tab = %request.tab_id,
                    rows = result.items.len(),
                    "tab loaded"
                );
                state.set_loaded(result);
            }
            Err(e) => {
                warn!(item = %request.item_id, tab = %request.tab_id, error = %e, "tab load failed");
                state.set_failed();
            }
        }
    }

    /// Flip a tab's global visibility and discard every panel. An expanded item
    /// is collapsed and queued for re-expansion on the next tick.
    pub fn toggle_tab_visibility(&mut self, tab_id: &str) -> Option<bool> {
        let Some(visible) = self.registry.toggle_visibility(tab_id) else {
            debug!(tab = tab_id, "visibility toggle ignored, unknown tab");
            return None;
        };

        self.panels.clear();
        self.tasks.clear();
        self.epoch += 1;
        debug!(tab = tab_id, visible, epoch = self.epoch, "tab visibility toggled, panels cleared");

        let pending = match std::mem::take(&mut self.phase) {
            ResetPhase::PendingReexpand { item_id } => Some(item_id),
            _ => None,
        };
        match self.expanded.take().or(pending) {
            Some(item_id) => {
                self.tasks.push_back(PanelTask::Reexpand {
                    item_id: item_id.clone(),
                    epoch: self.epoch,
                });
                self.phase = ResetPhase::PendingReexpand { item_id };
            }
            None => self.phase = ResetPhase::Cleared,
        }
        Some(visible)
    }

    /// Second phase of a visibility reset. Stale or cancelled requests are dropped.
    pub fn run_reexpand(&mut self, item_id: &str, epoch: u64) {
        let current = matches!(
            &self.phase,
            ResetPhase::PendingReexpand { item_id: pending } if pending == item_id
        );
        if !current || epoch != self.epoch {
            debug!(item = item_id, epoch, "dropping stale re-expand");
            return;
        }
        self.expand(item_id);
    }

    /// Drop all panel state (teardown).
    pub fn clear(&mut self) {
        self.panels.clear();
        self.tasks.clear();
        self.expanded = None;
        self.epoch += 1;
        self.phase = ResetPhase::Settled;
    }

    /// Next queued task, if any.
    pub fn next_task(&mut self) -> Option<PanelTask> {
        self.tasks.pop_front()
    }

    pub fn has_pending_tasks(&self) -> bool {
        !self.tasks.is_empty()
    }

    pub fn is_expanded(&self, item_id: &str) -> bool {
        self.expanded.as_deref() == Some(item_id)
    }

    pub fn expanded_item(&self) -> Option<&str> {
        self.expanded.as_deref()
    }

    pub fn active_tab(&self, item_id: &str) -> Option<&str> {
        self.panels.get(item_id)?.active_tab.as_deref()
    }

    /// Tab states for an item, empty if it has never been expanded.
    pub fn tab_states(&self, item_id: &str) -> &[TabState] {
        self.panels
            .get(item_id)
            .map(|p| p.tabs.as_slice())
            .unwrap_or(&[])
    }

    pub fn tab_state(&self, item_id: &str, tab_id: &str) -> Option<&TabState> {
        self.tab_states(item_id).iter().find(|t| t.id == tab_id)
    }

    pub fn visible_tab_definitions(&self) -> Vec<&TabDefinition> {
        self.registry.get_visible()
    }

    pub fn all_tab_definitions(&self) -> Vec<&TabDefinition> {
        self.registry.get_all()
    }

    pub fn columns(&self, tab_id: &str) -> &[TableColumn] {
        self.registry.get_columns(tab_id)
    }

    pub fn registry(&self) -> &TabRegistry {
        &self.registry
    }

    pub fn reset_phase(&self) -> &ResetPhase {
        &self.phase
    }
}
