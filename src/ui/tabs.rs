// Panel tab bar rendering.
// Marks the active tab and shows a spinner on tabs with a fetch in flight.

use ratatui::{prelude::*, widgets::*};

use super::adapter::PanelView;

const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// Draw the tab bar for an expanded item's panel.
pub fn draw_panel_tabs(frame: &mut Frame, view: &PanelView, tick: u64, area: Rect) {
    let spinner = SPINNER[(tick as usize) % SPINNER.len()];

    let tab_titles: Vec<Line> = view
        .rendered_tabs()
        .iter()
        .enumerate()
        .map(|(i, tab)| {
            let mut title = format!("{} {}", i + 1, tab.title);
            if let Some(icon) = &tab.icon {
                title = format!("{} {}", icon, title);
            }
            if tab.loading {
                title = format!("{} {}", title, spinner);
            }

            let style = if view.is_active(&tab.id) {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else if tab.loaded {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::Gray)
            };

            Line::from(Span::styled(title, style))
        })
        .collect();

    let tabs_widget = Tabs::new(tab_titles)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .select(view.active_index())
        .highlight_style(Style::default().fg(Color::Yellow))
        .divider(Span::raw(" │ "));

    frame.render_widget(tabs_widget, area);
}
