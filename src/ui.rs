pub mod history;
pub mod modal;
pub mod scoreboard;
pub mod screen;
pub mod setup;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::Paragraph,
    Frame,
};

use crate::{app::App, celebration::Celebration};

pub const HORIZONTAL_MARGIN: u16 = 3;
pub const VERTICAL_MARGIN: u16 = 1;

pub const COLORS: [Color; 7] = [
    Color::Yellow,
    Color::Magenta,
    Color::Cyan,
    Color::Green,
    Color::Red,
    Color::Blue,
    Color::LightYellow,
];

pub fn title_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

pub fn legend_style() -> Style {
    Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM)
}

pub fn selected_style() -> Style {
    Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD)
}

/// Draw the whole UI: current screen, then any modal, then confetti on top.
pub fn draw(app: &App, f: &mut Frame) {
    screen::current_screen(app.screen).render(app, f);

    if let Some(modal) = app.modal {
        modal::render_modal(modal, app, f);
    }

    if app.celebration.is_active {
        let area = f.area();
        render_celebration(&app.celebration, area, f.buffer_mut());
    }
}

/// Split `area` into body, status line and key legend.
pub fn frame_layout(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(2),
            Constraint::Length(1),
        ])
        .split(area);
    (chunks[0], chunks[1], chunks[2])
}

pub fn render_status(app: &App, area: Rect, f: &mut Frame) {
    if let Some(status) = &app.status {
        let status = Paragraph::new(Span::styled(
            status.as_str(),
            Style::default().fg(Color::Yellow),
        ))
        .alignment(Alignment::Center)
        .wrap(ratatui::widgets::Wrap { trim: true });
        f.render_widget(status, area);
    }
}

pub fn render_legend(text: &str, area: Rect, f: &mut Frame) {
    f.render_widget(Paragraph::new(Span::styled(text, legend_style())), area);
}

/// A `width` x `height` rectangle centered in `area`, clamped to fit.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    rect
}

fn render_celebration(celebration: &Celebration, area: Rect, buf: &mut Buffer) {
    for piece in &celebration.pieces {
        if piece.x < 0.0 || piece.y < 0.0 {
            continue;
        }
        let (x, y) = (piece.x as u16, piece.y as u16);
        if x >= area.width || y >= area.height {
            continue;
        }
        let fade = 1.0 - piece.age / piece.max_age;
        let color = COLORS[piece.color_index % COLORS.len()];
        let style = if fade > 0.6 {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else if fade > 0.25 {
            Style::default().fg(color)
        } else {
            Style::default().fg(color).add_modifier(Modifier::DIM)
        };
        if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
            cell.set_symbol(&piece.symbol.to_string());
            cell.set_style(style);
        }
    }
}
