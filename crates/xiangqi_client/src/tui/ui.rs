//! Stateless UI rendering for the xiangqi board.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;
use xiangqi_core::{BOARD_COLUMNS, BOARD_ROWS, BoardState, GameStatus, Position, Side};

use super::app::App;
use crate::controller::InteractionState;

/// Terminal columns per board point.
const CELL_WIDTH: u16 = 4;
/// Row label plus nine points.
const BOARD_WIDTH: u16 = 3 + CELL_WIDTH * BOARD_COLUMNS as u16;
/// Column header, ten ranks and the river.
const BOARD_HEIGHT: u16 = 1 + BOARD_ROWS as u16 + 1;
const HISTORY_WIDTH: u16 = 34;

/// Renders the whole screen.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Min(BOARD_HEIGHT + 2),
            Constraint::Length(5), // Status
        ])
        .split(area);

    let title = Paragraph::new("Xiangqi")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(BOARD_WIDTH + 2), Constraint::Length(HISTORY_WIDTH)])
        .split(chunks[1]);

    app.controller().store().with_current(|board| {
        draw_board(frame, body[0], app, board);
        draw_status(frame, chunks[2], app, board);
    });
    draw_history(frame, body[1], app);

    if let Some(notice) = app.notice() {
        draw_notice(frame, area, &notice.to_string());
    }
}

fn draw_board(frame: &mut Frame, area: Rect, app: &App, board: &BoardState) {
    let board_area = center_rect(area, BOARD_WIDTH + 2, BOARD_HEIGHT + 2);

    let mut lines = Vec::with_capacity(BOARD_HEIGHT as usize);
    let header: String = (0..BOARD_COLUMNS)
        .map(|x| pad_cell(&x.to_string()))
        .collect();
    lines.push(Line::from(Span::styled(
        format!("   {}", header),
        Style::default().fg(Color::DarkGray),
    )));

    for y in 0..BOARD_ROWS {
        if y == BOARD_ROWS / 2 {
            let river = "楚 河        漢 界";
            let pad = (CELL_WIDTH * BOARD_COLUMNS as u16) as usize;
            let pad = pad.saturating_sub(river.width()) / 2;
            lines.push(Line::from(Span::styled(
                format!("   {}{}", " ".repeat(pad), river),
                Style::default().fg(Color::Blue),
            )));
        }
        let mut spans = vec![Span::styled(
            format!("{:>2} ", y),
            Style::default().fg(Color::DarkGray),
        )];
        for x in 0..BOARD_COLUMNS {
            spans.push(cell(app, board, Position::new(x, y)));
        }
        lines.push(Line::from(spans));
    }

    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Board"));
    frame.render_widget(paragraph, board_area);
}

fn cell(app: &App, board: &BoardState, position: Position) -> Span<'static> {
    let piece = board.piece_at(position);
    let is_candidate = app.controller().candidates().contains(position);
    let is_selected = app
        .controller()
        .selected()
        .is_some_and(|p| p.position() == position);

    let (symbol, mut style) = match piece {
        Some(p) => (p.glyph().to_string(), side_style(p.owner())),
        None if is_candidate => ("•".to_string(), Style::default().fg(Color::Green)),
        None => ("·".to_string(), Style::default().fg(Color::DarkGray)),
    };

    if is_candidate && piece.is_some() {
        style = style.bg(Color::LightRed);
    }
    if is_selected {
        style = style.bg(Color::Yellow).fg(Color::Black);
    }
    if position == app.cursor() {
        style = style.bg(Color::White).fg(Color::Black);
    }

    Span::styled(pad_cell(&symbol), style)
}

fn side_style(side: Side) -> Style {
    match side {
        Side::Red => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        Side::Black => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    }
}

/// Pads `symbol` to one cell. Glyphs are double width, markers single.
fn pad_cell(symbol: &str) -> String {
    let fill = (CELL_WIDTH as usize - 2).saturating_sub(symbol.width());
    format!(" {}{} ", symbol, " ".repeat(fill))
}

fn draw_status(frame: &mut Frame, area: Rect, app: &App, board: &BoardState) {
    let status = board.status();
    let status_style = match status {
        GameStatus::InProgress => Style::default(),
        GameStatus::Check => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        _ => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    };

    let mut headline = vec![Span::styled(
        board.turn_banner(),
        side_style(board.turn_owner()),
    )];
    let status_text = status.to_string();
    if !status_text.is_empty() {
        headline.push(Span::raw("  "));
        headline.push(Span::styled(status_text, status_style));
    }

    let activity = match app.controller().state() {
        InteractionState::AwaitingCandidates { .. } => "Fetching legal moves...",
        InteractionState::Committing { .. } => "Submitting move...",
        _ => app.status_message(),
    };

    let lines = vec![
        Line::from(headline),
        Line::from(Span::styled(
            activity.to_string(),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(Span::styled(
            "Arrows: move  Enter/Space: select/drop  Esc: clear  r: reset  u: undo  q: quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn draw_history(frame: &mut Frame, area: Rect, app: &App) {
    let history = app.controller().history();
    let visible = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = history
        .lines()
        .skip(history.len().saturating_sub(visible))
        .map(Line::from)
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Moves"));
    frame.render_widget(paragraph, area);
}

fn draw_notice(frame: &mut Frame, area: Rect, message: &str) {
    let popup = center_rect(area, 50, 6);
    frame.render_widget(Clear, popup);

    let text = vec![
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title("Notice"),
        );
    frame.render_widget(paragraph, popup);
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(vert[1])[1]
}
