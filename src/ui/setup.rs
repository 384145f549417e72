use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::{frame_layout, render_legend, render_status, selected_style, title_style};

pub fn render_setup(app: &App, f: &mut Frame) {
    let (body, status, legend) = frame_layout(f.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(body);

    let games: Vec<ListItem> = app
        .config
        .games
        .games()
        .iter()
        .map(|g| ListItem::new(format!("{} ({} points)", g.name, g.winning_score)))
        .collect();
    let games = List::new(games)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled("Game", title_style())),
        )
        .highlight_style(selected_style())
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(app.setup.selected_game));
    f.render_stateful_widget(games, columns[0], &mut state);

    let mut lines: Vec<Line> = app
        .setup
        .players
        .iter()
        .enumerate()
        .map(|(idx, p)| Line::from(format!("{}. {}", idx + 1, p)))
        .collect();
    lines.push(Line::from(vec![
        Span::raw("+ "),
        Span::styled(
            format!("{}_", app.setup.name_input),
            Style::default().add_modifier(Modifier::UNDERLINED),
        ),
    ]));
    let players = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled("Players", title_style())),
    );
    f.render_widget(players, columns[1]);

    render_status(app, status, f);
    render_legend(
        "type a name + (enter) add player / (enter) on empty: start / (↑↓) game / (F2) games / (tab) history / (esc) quit",
        legend,
        f,
    );
}
