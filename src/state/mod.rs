// State management module.
// Handles item panels, per-tab load state and the task dispatcher.

pub mod dispatch;
pub mod item;
pub mod panel;
pub mod tab_state;

pub use dispatch::Dispatcher;
pub use item::Item;
pub use panel::{PanelStateManager, ResetPhase};
pub use tab_state::TabState;
