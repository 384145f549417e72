use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::history::{started_ago, HistoryRecord};
use crate::ui::{frame_layout, render_legend, render_status, selected_style, title_style};

pub fn render_history(app: &App, f: &mut Frame) {
    let (body, status, legend) = frame_layout(f.area());
    let view = &app.history_view;

    let chunks = if view.expanded {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(body)
    } else {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3)])
            .split(body)
    };

    let now = Local::now();
    let items: Vec<ListItem> = view
        .records
        .iter()
        .map(|r| {
            ListItem::new(format!(
                "{}  Winner: {} ({}, {})  Duration: {}",
                r.game,
                r.winner_label(),
                r.start_time.format("%Y-%m-%d"),
                started_ago(r.start_time, now),
                r.duration
            ))
        })
        .collect();
    let title = format!("History ({} sessions)", view.records.len());
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(title, title_style())),
        )
        .highlight_style(selected_style())
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !view.records.is_empty() {
        state.select(Some(view.selected));
    }
    f.render_stateful_widget(list, chunks[0], &mut state);

    if view.expanded {
        if let Some(record) = view.records.get(view.selected) {
            f.render_widget(details(record), chunks[1]);
        }
    }

    render_status(app, status, f);
    render_legend(
        "(↑↓) select / (enter) details / (d) delete / (esc) back",
        legend,
        f,
    );
}

fn details(record: &HistoryRecord) -> Paragraph<'_> {
    let mut lines = vec![
        Line::from(format!("Players: {}", record.players.join(", "))),
        Line::from("Point Log:"),
    ];
    lines.extend(record.point_log.iter().map(|log| {
        Line::from(format!(
            "  {} scored {} (New Total: {})",
            log.player, log.points_added, log.new_score
        ))
    }));
    Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(record.game.as_str()))
        .wrap(Wrap { trim: false })
}
