use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::contention::ROUNDS_TO_WIN;
use crate::ui::{frame_layout, render_legend, render_status, selected_style, title_style};

pub fn render_scoreboard(app: &App, f: &mut Frame) {
    let (body, status, legend) = frame_layout(f.area());
    let Some(session) = app.session.as_ref() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(body);

    let header = Paragraph::new(vec![
        Line::from(Span::styled(session.game.name.as_str(), title_style())),
        Line::from(format!(
            "First to {} wins!   round {}",
            session.game.winning_score,
            session.rounds_played + 1
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(header, chunks[0]);

    let name_width = session
        .players
        .iter()
        .map(|p| p.width())
        .max()
        .unwrap_or_default()
        .max(6) as u16;

    let rows = session.standings().into_iter().enumerate().map(|(idx, (player, score))| {
        let is_winner = session.winner.as_deref() == Some(player);
        let is_contender = session.contention.contender.as_deref() == Some(player);
        let marker = if is_winner {
            "★ winner".to_string()
        } else if is_contender {
            format!("leading {}/{}", session.contention.win_streak, ROUNDS_TO_WIN)
        } else {
            String::new()
        };

        let style = if is_winner {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else if idx == app.entry.selected_player {
            selected_style()
        } else {
            Style::default()
        };

        Row::new(vec![
            Cell::from(if idx == app.entry.selected_player { ">" } else { " " }),
            Cell::from(player.to_string()),
            Cell::from(score.to_string()),
            Cell::from(marker),
        ])
        .style(style)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(2),
            Constraint::Length(name_width + 2),
            Constraint::Length(8),
            Constraint::Min(10),
        ],
    )
    .header(
        Row::new(vec!["", "Player", "Points", ""])
            .style(Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED)),
    )
    .block(Block::default().borders(Borders::ALL).title("Scoreboard"));
    f.render_widget(table, chunks[1]);

    let target = session
        .players
        .get(app.entry.selected_player)
        .map(String::as_str)
        .unwrap_or_default();
    let input = Paragraph::new(Line::from(vec![
        Span::raw(format!("Add points for {}: ", target)),
        Span::styled(
            format!("{}_", app.entry.points_input),
            Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        ),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(input, chunks[2]);

    render_status(app, status, f);
    render_legend(
        "(↑↓) player / digits + (enter) add points / (e) end round / (esc) leave game",
        legend,
        f,
    );
}
