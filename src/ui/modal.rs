// Modal UI components.
// Tab visibility dialog for toggling which tabs every item shows.

use ratatui::{prelude::*, widgets::*};

use crate::registry::TabRegistry;

/// Draw the tab visibility modal on top of the current view.
pub fn draw_visibility_modal(frame: &mut Frame, registry: &TabRegistry, selection: usize) {
    let area = frame.area();
    let definitions = registry.get_all();

    // Create centered modal
    let modal_width = 44.min(area.width);
    let modal_height = u16::try_from(definitions.len())
        .unwrap_or(u16::MAX)
        .saturating_add(5)
        .min(area.height);
    let modal_x = (area.width.saturating_sub(modal_width)) / 2;
    let modal_y = (area.height.saturating_sub(modal_height)) / 2;

    let modal_area = Rect::new(modal_x, modal_y, modal_width, modal_height);

    // Clear the area behind the modal
    frame.render_widget(Clear, modal_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Tab list
            Constraint::Length(2), // Instructions
        ])
        .split(modal_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Tab Visibility ");

    let items: Vec<ListItem> = definitions
        .iter()
        .map(|def| {
            let (mark, color) = if def.visible {
                ("[x]", Color::Green)
            } else {
                ("[ ]", Color::DarkGray)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {} ", mark), Style::default().fg(color)),
                Span::styled(def.title.clone(), Style::default().fg(Color::White)),
                Span::styled(
                    format!("  #{}", def.order),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let mut list_state = ListState::default();
    list_state.select(Some(selection));

    let list_widget = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list_widget, chunks[0], &mut list_state);

    // Instructions
    let instructions = Line::from(vec![
        Span::styled(" Enter", Style::default().fg(Color::Yellow)),
        Span::styled(" = Toggle  ", Style::default().fg(Color::DarkGray)),
        Span::styled("↑↓", Style::default().fg(Color::Yellow)),
        Span::styled(" = Navigate  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::styled(" = Close ", Style::default().fg(Color::DarkGray)),
    ]);

    let instructions_widget = Paragraph::new(instructions).alignment(Alignment::Center);
    frame.render_widget(instructions_widget, chunks[1]);
}
