// Tab data table rendering.
// Shows the active tab's rows under its column schema, with loading and empty states.

use ratatui::{prelude::*, widgets::*};

use super::adapter::{PanelView, RowExpansion, cell_text};
use super::list::{render_empty, render_loading};

/// Draw the active tab's content and its status footer.
pub fn draw_tab_content(
    frame: &mut Frame,
    view: &PanelView,
    rows: &RowExpansion,
    table_state: &mut TableState,
    area: Rect,
) {
    let Some(tab) = view.active_state() else {
        render_empty(frame, area, "No tabs to show for this item");
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    if tab.loading && !tab.loaded {
        render_loading(frame, chunks[0], &format!("Loading {}", tab.title));
        return;
    }

    if !view.has_data(&tab.id) {
        render_empty(frame, chunks[0], "No data available  (r to refresh)");
    } else {
        let columns = view.columns();
        let header = Row::new(columns.iter().map(|c| {
            let label = if c.sortable {
                format!("{} ↕", c.label)
            } else {
                c.label.clone()
            };
            Cell::from(label)
        }))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

        let body: Vec<Row> = tab
            .data
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let cells: Vec<Cell> = columns
                    .iter()
                    .map(|c| Cell::from(cell_text(record, &c.key)))
                    .collect();
                if rows.is_expanded(&tab.id, i) {
                    // Expanded rows add the raw record beneath the cells
                    let mut cells = cells;
                    if let Some(first) = columns.first() {
                        let detail = Text::from(vec![
                            Line::from(cell_text(record, &first.key)),
                            Line::styled(record.to_string(), Style::default().fg(Color::DarkGray)),
                        ]);
                        cells[0] = Cell::from(detail);
                    }
                    Row::new(cells).height(2)
                } else {
                    Row::new(cells)
                }
            })
            .collect();

        let widths: Vec<Constraint> = columns
            .iter()
            .map(|c| match c.width_percent() {
                Some(pct) => Constraint::Percentage(pct),
                None => Constraint::Fill(1),
            })
            .collect();

        let table = Table::new(body, widths)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", tab.title)),
            )
            .row_highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        frame.render_stateful_widget(table, chunks[0], table_state);
    }

    let mut footer = Vec::new();
    if let Some(updated) = &tab.last_updated {
        footer.push(Span::styled(
            format!(" Updated {}", updated),
            Style::default().fg(Color::DarkGray),
        ));
        footer.push(Span::styled(
            format!(" · {} of {} rows", view.row_count(&tab.id), tab.total_count),
            Style::default().fg(Color::DarkGray),
        ));
    }
    if tab.loading {
        footer.push(Span::styled(" · refreshing", Style::default().fg(Color::Yellow)));
    } else if view.can_refresh(&tab.id) {
        footer.push(Span::styled(" · r refresh", Style::default().fg(Color::DarkGray)));
    } else {
        footer.push(Span::styled(" r retry", Style::default().fg(Color::Yellow)));
    }
    frame.render_widget(Paragraph::new(Line::from(footer)), chunks[1]);
}
