// App state and main event loop.
// Maps keyboard input to panel intents and pumps the fetch dispatcher each tick.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::prelude::*;
use ratatui::widgets::{ListState, TableState};
use tracing::{debug, warn};

use crate::state::{Dispatcher, Item, PanelStateManager};
use crate::ui::{self, PanelIntent, PanelView, RowExpansion};

/// How long shutdown waits for fetches still in flight.
pub const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

/// Main application state.
pub struct App {
    pub items: Vec<Item>,
    /// Selection in the item list.
    pub list_state: ListState,
    pub panels: PanelStateManager,
    pub dispatcher: Dispatcher,
    /// Expanded rows of the active tab.
    pub rows: RowExpansion,
    /// Row cursor in the active tab's table.
    pub table_state: TableState,
    /// Selection in the tab visibility modal, when open.
    pub visibility_selection: Option<usize>,
    pub show_help: bool,
    pub base_url: String,
    /// Frame counter for the loading spinner.
    pub tick: u64,
    /// Whether the app should exit.
    pub should_quit: bool,
}

impl App {
    pub fn new(
        items: Vec<Item>,
        panels: PanelStateManager,
        dispatcher: Dispatcher,
        base_url: String,
    ) -> Self {
        let mut list_state = ListState::default();
        if !items.is_empty() {
            list_state.select(Some(0));
        }
        Self {
            items,
            list_state,
            panels,
            dispatcher,
            rows: RowExpansion::default(),
            table_state: TableState::default(),
            visibility_selection: None,
            show_help: false,
            base_url,
            tick: 0,
            should_quit: false,
        }
    }

    /// Main event loop.
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> io::Result<()> {
        while !self.should_quit {
            self.dispatcher.pump(&mut self.panels);
            self.apply_fallback_selection();
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.handle_events()?;
            self.tick = self.tick.wrapping_add(1);
        }
        Ok(())
    }

    /// Tear down panel state and wait up to `grace` for in-flight fetches to drain.
    /// Their completions land after the reset and are dropped as stale.
    pub async fn shutdown(&mut self, grace: Duration) {
        self.panels.clear();
        match tokio::time::timeout(grace, self.dispatcher.settle(&mut self.panels)).await {
            Ok(()) => debug!("fetches drained on shutdown"),
            Err(_) => warn!(
                in_flight = self.dispatcher.in_flight(),
                "shutdown grace elapsed with fetches in flight"
            ),
        }
    }

    /// Handle keyboard and other events.
    #[allow(clippy::collapsible_if)]
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.visibility_selection.is_some() {
            self.handle_modal_key(key.code);
            return;
        }
        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
                self.show_help = false;
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('v') => self.visibility_selection = Some(0),
            KeyCode::Up | KeyCode::Char('k') => self.select_prev_item(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next_item(),
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_selected_item(),
            KeyCode::Char('c') => {
                if let Some(item_id) = self.panels.expanded_item().map(str::to_string) {
                    self.panels.collapse(&item_id);
                }
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => {
                self.emit(|view| view.select_next());
            }
            KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => {
                self.emit(|view| view.select_prev());
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                self.emit(|view| view.select_index(index));
            }
            KeyCode::Char('r') => self.emit(|view| view.refresh_active()),
            KeyCode::Char('J') => self.move_row_cursor(1),
            KeyCode::Char('K') => self.move_row_cursor(-1),
            KeyCode::Char('x') => self.toggle_row(),
            _ => {}
        }
    }

    fn handle_modal_key(&mut self, code: KeyCode) {
        let Some(selection) = self.visibility_selection else {
            return;
        };
        let count = self.panels.all_tab_definitions().len();

        match code {
            KeyCode::Esc | KeyCode::Char('v') | KeyCode::Char('q') => {
                self.visibility_selection = None;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.visibility_selection = Some(selection.saturating_sub(1));
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.visibility_selection = Some((selection + 1).min(count.saturating_sub(1)));
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let tab_id = self
                    .panels
                    .all_tab_definitions()
                    .get(selection)
                    .map(|d| d.id.clone());
                if let Some(tab_id) = tab_id {
                    self.panels.toggle_tab_visibility(&tab_id);
                    self.reset_rows();
                }
            }
            _ => {}
        }
    }

    fn selected_item(&self) -> Option<&Item> {
        self.items.get(self.list_state.selected()?)
    }

    fn select_next_item(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < self.items.len() => i + 1,
            Some(i) => i, // Stay at end
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn select_prev_item(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = self.list_state.selected().map(|i| i.saturating_sub(1)).unwrap_or(0);
        self.list_state.select(Some(i));
    }

    fn toggle_selected_item(&mut self) {
        if let Some(item_id) = self.selected_item().map(|i| i.id.clone()) {
            self.panels.expand_collapse(&item_id);
            self.reset_rows();
        }
    }

    /// Build the expanded item's panel view and derive a value from it.
    fn with_view<T>(&self, f: impl FnOnce(&PanelView) -> Option<T>) -> Option<T> {
        let item_id = self.panels.expanded_item()?;
        let item = self.items.iter().find(|i| i.id == item_id)?;
        f(&PanelView::new(item, &self.panels))
    }

    /// Derive an intent from the panel view and apply it.
    fn emit(&mut self, f: impl FnOnce(&PanelView) -> Option<PanelIntent>) {
        if let Some(intent) = self.with_view(f) {
            self.dispatch(intent);
        }
    }

    pub fn dispatch(&mut self, intent: PanelIntent) {
        match intent {
            PanelIntent::Select { item_id, tab_id } => {
                self.panels.select_tab(&item_id, &tab_id);
                self.reset_rows();
            }
            PanelIntent::Refresh { item_id, tab_id } => {
                self.panels.refresh_tab(&item_id, &tab_id);
            }
        }
    }

    /// Move off an active tab the item does not render.
    fn apply_fallback_selection(&mut self) {
        self.emit(|view| view.fallback_selection());
    }

    fn reset_rows(&mut self) {
        self.rows.clear();
        self.table_state.select(None);
    }

    fn move_row_cursor(&mut self, delta: isize) {
        let Some(count) = self.with_view(|view| view.active_tab().map(|id| view.row_count(id))) else {
            return;
        };
        if count == 0 {
            return;
        }
        let next = match self.table_state.selected() {
            Some(i) => (i as isize + delta).clamp(0, count as isize - 1) as usize,
            None => 0,
        };
        self.table_state.select(Some(next));
    }

    fn toggle_row(&mut self) {
        let Some(row) = self.table_state.selected() else {
            return;
        };
        if let Some(tab_id) = self.with_view(|view| view.active_tab().map(str::to_string)) {
            self.rows.toggle(&tab_id, row);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TabRegistry;
    use crate::remote::{CanonicalResult, DataFetcher};
    use async_trait::async_trait;
    use crossterm::event::KeyModifiers;
    use serde_json::json;
    use std::sync::Arc;

    struct RowsFetcher;

    struct HangingFetcher;

    #[async_trait]
    impl DataFetcher for HangingFetcher {
        async fn fetch(&self, _item_id: &str, _tab_id: &str, _forced: bool) -> CanonicalResult {
            std::future::pending().await
        }
    }

    #[async_trait]
    impl DataFetcher for RowsFetcher {
        async fn fetch(&self, _item_id: &str, _tab_id: &str, _forced: bool) -> CanonicalResult {
            CanonicalResult::from_items(vec![json!({"taskName": "a"}), json!({"taskName": "b"})])
        }
    }

    fn app() -> App {
        App::new(
            Item::samples(),
            PanelStateManager::new(TabRegistry::default()),
            Dispatcher::new(Arc::new(RowsFetcher)),
            "http://localhost:8000".to_string(),
        )
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[tokio::test]
    async fn test_keys_drive_panel() {
        let mut app = app();

        press(&mut app, KeyCode::Enter);
        assert!(app.panels.is_expanded("item1"));

        press(&mut app, KeyCode::Right);
        assert_eq!(app.panels.active_tab("item1"), Some("team"));

        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.panels.active_tab("item1"), Some("overview"));

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert!(app.panels.is_expanded("item2"));
        assert!(!app.panels.is_expanded("item1"));

        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.panels.expanded_item(), None);
    }

    #[tokio::test]
    async fn test_row_expansion_resets_on_select() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        app.dispatcher.settle(&mut app.panels).await;

        press(&mut app, KeyCode::Char('J'));
        press(&mut app, KeyCode::Char('J'));
        assert_eq!(app.table_state.selected(), Some(1));
        press(&mut app, KeyCode::Char('x'));
        assert!(app.rows.is_expanded("overview", 1));

        press(&mut app, KeyCode::Char('l'));
        assert!(!app.rows.is_expanded("overview", 1));
        assert_eq!(app.table_state.selected(), None);
    }

    #[tokio::test]
    async fn test_visibility_modal_toggles_and_reexpands() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        app.dispatcher.settle(&mut app.panels).await;

        press(&mut app, KeyCode::Char('v'));
        for _ in 0..3 {
            press(&mut app, KeyCode::Down);
        }
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Esc);
        assert!(app.panels.registry().get("documents").unwrap().visible);
        assert_eq!(app.panels.expanded_item(), None);

        app.dispatcher.settle(&mut app.panels).await;
        assert!(app.panels.is_expanded("item1"));
        assert_eq!(app.panels.tab_states("item1").len(), 5);
        assert!(app.panels.tab_state("item1", "overview").unwrap().loaded);
    }

    #[tokio::test]
    async fn test_help_swallows_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.panels.expanded_item(), None);
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_shutdown_drains_in_flight_fetches() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        app.dispatcher.pump(&mut app.panels);
        assert_eq!(app.dispatcher.in_flight(), 1);

        app.shutdown(SHUTDOWN_GRACE).await;

        assert_eq!(app.dispatcher.in_flight(), 0);
        assert_eq!(app.panels.expanded_item(), None);
        assert!(app.panels.tab_states("item1").is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_gives_up_after_grace() {
        let mut app = App::new(
            Item::samples(),
            PanelStateManager::new(TabRegistry::default()),
            Dispatcher::new(Arc::new(HangingFetcher)),
            "http://localhost:8000".to_string(),
        );
        press(&mut app, KeyCode::Enter);
        app.dispatcher.pump(&mut app.panels);
        let started = tokio::time::Instant::now();

        app.shutdown(SHUTDOWN_GRACE).await;

        assert!(started.elapsed() >= SHUTDOWN_GRACE);
        assert_eq!(app.dispatcher.in_flight(), 1);
        assert_eq!(app.panels.expanded_item(), None);
    }
}
