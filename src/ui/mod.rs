pub mod widgets;

use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::collections::BTreeMap;

const HELP_TEXT: &str = "Tab/Shift-Tab switch pane | ↑↓/jk scroll | q quit";

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    render_grid(frame, app, chunks[0]);
    render_status_bar(frame, app, chunks[1]);
}

/// Widget indices grouped by row, each row ordered by column.
pub fn grid_rows(positions: &[(usize, usize)]) -> Vec<Vec<usize>> {
    let mut rows: BTreeMap<usize, Vec<(usize, usize)>> = BTreeMap::new();
    for (index, (row, col)) in positions.iter().enumerate() {
        rows.entry(*row).or_default().push((*col, index));
    }

    rows.into_values()
        .map(|mut cells| {
            cells.sort();
            cells.into_iter().map(|(_, index)| index).collect()
        })
        .collect()
}

fn render_grid(frame: &mut Frame, app: &App, area: Rect) {
    let positions: Vec<(usize, usize)> = app.widgets.iter().map(|w| w.position()).collect();
    let rows = grid_rows(&positions);
    if rows.is_empty() {
        frame.render_widget(
            Paragraph::new("No widgets configured").style(Style::default().fg(Color::DarkGray)),
            area,
        );
        return;
    }

    let row_count = rows.len() as u32;
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(rows.iter().map(|_| Constraint::Ratio(1, row_count)))
        .split(area);

    for (row, row_area) in rows.iter().zip(row_areas.iter()) {
        let col_count = row.len() as u32;
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(row.iter().map(|_| Constraint::Ratio(1, col_count)))
            .split(*row_area);

        for (index, cell) in row.iter().zip(cells.iter()) {
            app.widgets[*index].render(frame, *cell, *index == app.selected);
        }
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let pane = app
        .widgets
        .get(app.selected)
        .map(|w| w.title().to_string())
        .unwrap_or_default();

    let line = Line::from(vec![
        Span::styled(format!(" {} ", pane), Style::default().fg(Color::Black).bg(Color::Yellow)),
        Span::raw(" "),
        Span::styled(HELP_TEXT, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
