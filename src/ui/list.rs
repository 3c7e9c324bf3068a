// Item list rendering.
// Shows every item with its expansion marker, badge and description.

use ratatui::{prelude::*, widgets::*};

use crate::state::{Item, PanelStateManager};

/// Render a loading indicator.
pub fn render_loading(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(format!("⏳ {}...", message))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(text, area);
}

/// Render an empty state message.
pub fn render_empty(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(text, area);
}

/// Render the items list.
pub fn render_items_list(
    frame: &mut Frame,
    items: &[Item],
    panels: &PanelStateManager,
    list_state: &mut ListState,
    area: Rect,
) {
    let block = Block::default().borders(Borders::ALL).title(" Items ");

    if items.is_empty() {
        let text = Paragraph::new("No items configured")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(text, area);
        return;
    }

    let rows: Vec<ListItem> = items
        .iter()
        .map(|item| {
            let expanded = panels.is_expanded(&item.id);
            let marker = if expanded { "▼" } else { "▶" };
            let title_style = if expanded {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", marker), Style::default().fg(Color::DarkGray)),
                Span::styled(
                    format!("{:>4} ", item.badge),
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled(item.title.clone(), title_style),
                Span::styled(
                    format!("  {}", item.description),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let list_widget = List::new(rows)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list_widget, area, list_state);
}
