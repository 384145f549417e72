use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, GameField, Modal};
use crate::ui::{centered_rect, legend_style, selected_style, title_style};

pub fn render_modal(modal: Modal, app: &App, f: &mut Frame) {
    match modal {
        Modal::EndOfRound => render_end_of_round(app, f),
        Modal::Winner => render_winner(app, f),
        Modal::ManageGames => render_manage_games(app, f),
    }
}

fn render_end_of_round(app: &App, f: &mut Frame) {
    let area = centered_rect(54, 7, f.area());
    let target = app
        .session
        .as_ref()
        .map(|s| s.game.winning_score)
        .unwrap_or_default();
    let text = vec![
        Line::from(format!("Someone has reached {} points!", target)),
        Line::from(""),
        Line::from("Is the round over? (y)es / (n)o"),
    ];
    let popup = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled("End of round", title_style())),
        );
    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

fn render_winner(app: &App, f: &mut Frame) {
    let area = centered_rect(44, 9, f.area());
    let winner = app
        .last_verdict
        .as_ref()
        .and_then(|v| v.winner())
        .unwrap_or("Nobody");
    let duration = app
        .history_view
        .records
        .first()
        .map(|r| r.duration.clone())
        .unwrap_or_default();
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("{} wins!", winner),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("Game time: {}", duration)),
        Line::from(""),
        Line::from(Span::styled(
            "(enter) new game / (h) history",
            legend_style(),
        )),
    ];
    let popup = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green))
            .title(Span::styled("Winner", title_style())),
    );
    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

fn render_manage_games(app: &App, f: &mut Frame) {
    let area = centered_rect(60, 18, f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled("Manage games", title_style()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(2),
            Constraint::Length(2),
        ])
        .split(inner);

    let items: Vec<ListItem> = app
        .config
        .games
        .games()
        .iter()
        .map(|g| ListItem::new(format!("{} ({} points)", g.name, g.winning_score)))
        .collect();
    let list = List::new(items)
        .highlight_style(selected_style())
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(app.manage.selected));
    f.render_stateful_widget(list, chunks[0], &mut state);

    let field_style = |field: GameField| {
        if app.manage.field == field {
            Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default()
        }
    };
    let form = Paragraph::new(Line::from(vec![
        Span::raw("Name: "),
        Span::styled(format!("{}_", app.manage.name_input), field_style(GameField::Name)),
        Span::raw("  Winning score: "),
        Span::styled(format!("{}_", app.manage.score_input), field_style(GameField::Score)),
    ]));
    f.render_widget(form, chunks[1]);

    let help = Paragraph::new(Span::styled(
        "(tab) switch field / (enter) add / (del) delete selected / (esc) close",
        legend_style(),
    ))
    .wrap(Wrap { trim: true });
    f.render_widget(help, chunks[2]);
}
