// UI module for rendering the TUI.
// Contains widgets for the item list, panel tabs, data table and overlays.

pub mod adapter;
mod list;
mod modal;
mod table;
mod tabs;

use ratatui::{prelude::*, widgets::*};

use crate::app::App;
use crate::state::ResetPhase;

pub use adapter::{PanelIntent, PanelView, RowExpansion};

/// Main draw function that renders the entire UI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let list_height = list_height(app.items.len());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),           // Header
            Constraint::Length(list_height), // Item list
            Constraint::Min(1),              // Panel
            Constraint::Length(1),           // Status bar
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);
    list::render_items_list(
        frame,
        &app.items,
        &app.panels,
        &mut app.list_state,
        chunks[1],
    );
    draw_panel(frame, app, chunks[2]);
    draw_status_bar(frame, app, chunks[3]);

    if let Some(selection) = app.visibility_selection {
        modal::draw_visibility_modal(frame, app.panels.registry(), selection);
    }

    // Help overlay (rendered last, on top of everything)
    if app.show_help {
        draw_help_overlay(frame);
    }
}

/// Rows for the item list: one per item plus borders, kept between 3 and 12.
fn list_height(item_count: usize) -> u16 {
    u16::try_from(item_count)
        .unwrap_or(u16::MAX)
        .saturating_add(2)
        .clamp(3, 12)
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " tiledeck ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} ", app.base_url),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!(
                " {}/{} tabs ",
                app.panels.visible_tab_definitions().len(),
                app.panels.all_tab_definitions().len()
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(header, area);
}

/// Draw the expanded item's panel, or a hint when nothing is expanded.
fn draw_panel(frame: &mut Frame, app: &mut App, area: Rect) {
    let Some(item_id) = app.panels.expanded_item() else {
        let hint = match app.panels.reset_phase() {
            ResetPhase::Cleared => "Tab visibility changed. Press Enter to expand an item",
            _ => "Press Enter to expand an item",
        };
        let block = Block::default().borders(Borders::ALL).title(" Details ");
        let text = Paragraph::new(hint)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(text, area);
        return;
    };
    let Some(item) = app.items.iter().find(|i| i.id == item_id) else {
        return;
    };

    let view = PanelView::new(item, &app.panels);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", item.title))
        .title(
            Line::styled(
                format!(" {} · {} ", item.team, item.created_date),
                Style::default().fg(Color::DarkGray),
            )
            .right_aligned(),
        );
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)])
        .split(inner);

    tabs::draw_panel_tabs(frame, &view, app.tick, chunks[0]);
    table::draw_tab_content(frame, &view, &app.rows, &mut app.table_state, chunks[1]);
}

/// Draw the status bar with keybinding hints.
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut hints = vec![
        Span::raw(" ↑↓ "),
        Span::styled("Item", Style::default().fg(Color::DarkGray)),
        Span::raw("  ↵ "),
        Span::styled("Expand", Style::default().fg(Color::DarkGray)),
        Span::raw("  ←→ "),
        Span::styled("Tab", Style::default().fg(Color::DarkGray)),
        Span::raw("  r "),
        Span::styled("Refresh", Style::default().fg(Color::DarkGray)),
        Span::raw("  v "),
        Span::styled("Tabs", Style::default().fg(Color::DarkGray)),
        Span::raw("  ? "),
        Span::styled("Help", Style::default().fg(Color::DarkGray)),
        Span::raw("  q "),
        Span::styled("Quit", Style::default().fg(Color::DarkGray)),
    ];

    let in_flight = app.dispatcher.in_flight();
    if in_flight > 0 {
        hints.push(Span::styled(
            format!("  fetching {}", in_flight),
            Style::default().fg(Color::Yellow),
        ));
    }

    let status = Paragraph::new(Line::from(hints));
    frame.render_widget(status, area);
}

/// Draw the help overlay.
fn draw_help_overlay(frame: &mut Frame) {
    let area = frame.area();

    // Create a centered popup
    let popup_width = 52.min(area.width);
    let popup_height = 19.min(area.height);
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let key = |k: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<14}", k), Style::default().fg(Color::Cyan)),
            Span::raw(desc),
        ])
    };

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        key("↑/↓ or j/k", "Select item"),
        key("Enter/Space", "Expand / collapse item"),
        key("c", "Collapse expanded item"),
        key("←/→ or h/l", "Previous / next tab"),
        key("Tab/BackTab", "Next / previous tab"),
        key("1-9", "Jump to tab"),
        key("r", "Refresh active tab"),
        key("J/K", "Move row cursor"),
        key("x", "Expand / collapse row"),
        key("v", "Tab visibility"),
        key("?", "Show/hide this help"),
        key("q", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::DarkGray)),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::styled(" or ", Style::default().fg(Color::DarkGray)),
            Span::styled("?", Style::default().fg(Color::Yellow)),
            Span::styled(" to close", Style::default().fg(Color::DarkGray)),
        ]),
    ];

    let help_paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help ")
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .alignment(Alignment::Left);

    frame.render_widget(help_paragraph, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_height_bounds() {
        assert_eq!(list_height(0), 3);
        assert_eq!(list_height(3), 5);
        assert_eq!(list_height(10), 12);
        assert_eq!(list_height(u16::MAX as usize - 1), 12);
        assert_eq!(list_height(u16::MAX as usize), 12);
        assert_eq!(list_height(usize::MAX), 12);
    }
}
