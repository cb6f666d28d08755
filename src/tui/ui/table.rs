use crate::cards::{Card, Suit};
use crate::game::GameState;
use crate::seat::PlayerPosition;
use crate::tui::app::AppState;
use crate::view::RestrictedView;
use ratatui::prelude::*;
use ratatui::widgets::*;

use super::layout::{centered_rect, columns, inner};

pub(super) fn draw_table(f: &mut Frame, app: &AppState) {
    let view = app.view();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // header
            Constraint::Min(12),   // seats and trick
            Constraint::Length(5), // own hand
            Constraint::Length(4), // status bar
        ])
        .split(f.area());

    draw_header(f, chunks[0], app, &view);
    draw_middle(f, chunks[1], app, &view);
    draw_hand(f, chunks[2], app, &view);
    draw_status(f, chunks[3], app, &view);

    if app.help_open() {
        draw_help(f);
    } else if app.history_open() {
        draw_history(f, app);
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &AppState, view: &RestrictedView) {
    let game = match (view.game_type, view.declarer) {
        (Some(g), Some(d)) => format!("{g} by {d}"),
        _ => "no game announced".to_string(),
    };
    let wins = app.wins();
    let lines = vec![
        Line::from(format!(
            "Game #{}   Dealer: {}   Phase: {}",
            view.game_no + 1,
            view.dealer,
            view.state.label()
        )),
        Line::from(format!(
            "{game}   x{}   Wins B{} L{} T{} R{}",
            view.multiplier(),
            wins[0],
            wins[1],
            wins[2],
            wins[3]
        )),
    ];
    let header = Paragraph::new(lines).block(Block::default().title("schafkopf").borders(Borders::ALL));
    f.render_widget(header, area);
}

fn draw_middle(f: &mut Frame, area: Rect, app: &AppState, view: &RestrictedView) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(6)])
        .split(area);
    let across = view.me.next().next();
    let left_of_me = view.me.next();
    let right_of_me = across.next();

    let top_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(40),
            Constraint::Percentage(30),
        ])
        .split(rows[0]);
    draw_seat(f, top_cols[1], app, view, across);

    let mid_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(50),
            Constraint::Percentage(25),
        ])
        .split(rows[1]);
    draw_seat(f, mid_cols[0], app, view, left_of_me);
    draw_trick(f, mid_cols[1], view);
    draw_seat(f, mid_cols[2], app, view, right_of_me);
}

fn draw_seat(f: &mut Frame, area: Rect, app: &AppState, view: &RestrictedView, pos: PlayerPosition) {
    let mut title = app.seat_label(pos);
    if pos == view.dealer {
        title.push_str(" [Dealer]");
    }
    if view.turn == Some(pos) {
        title.push_str(" [Act]");
    }
    let mut lines = vec![
        Line::from(format!("Cards: {}", view.hand_sizes[pos.index()])),
        Line::from(format!("Tricks: {}", view.tricks_won()[pos.index()])),
    ];
    let mut roles: Vec<&str> = Vec::new();
    if view.declarer == Some(pos) {
        roles.push("declarer");
    }
    if view.known_partner == Some(pos) {
        roles.push("partner");
    }
    if view.raises.contains(&pos) {
        roles.push("raised");
    }
    if view.struck_by == Some(pos) {
        roles.push("struck");
    }
    if view.is_accepting(pos) {
        roles.push("ready");
    }
    if !roles.is_empty() {
        lines.push(Line::from(Span::styled(roles.join(", "), Style::default().fg(Color::Cyan))));
    }
    let mut block = Block::default().title(title).borders(Borders::ALL);
    if view.turn == Some(pos) {
        block = block.border_style(Style::default().fg(Color::Yellow));
    }
    let winners = view.result.as_ref().map(|r| r.winners()).unwrap_or_default();
    if winners.contains(&pos) {
        block = block.border_style(Style::default().fg(Color::Green));
    }
    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), area);
}

fn draw_trick(f: &mut Frame, area: Rect, view: &RestrictedView) {
    let title = match view.tricks.last() {
        Some(last) => {
            let cards: Vec<String> = last.cards.iter().map(|(_, c)| c.to_string()).collect();
            format!("Trick {} (last: {} to {})", view.tricks.len() + 1, cards.join(" "), last.winner)
        }
        None => format!("Trick {}", view.tricks.len() + 1),
    };
    let block = Block::default().title(title).borders(Borders::ALL);
    let trick_inner = inner(area);
    f.render_widget(block, area);
    if let Some(result) = view.result.as_ref() {
        let outcome = if result.declarer_won { "declarer team wins" } else { "defenders win" };
        let lines = vec![
            Line::from(format!("{}: {outcome}", result.game_type)),
            Line::from(format!(
                "Declarer team {} : {} defenders",
                result.declarer_points, result.defender_points
            )),
            Line::from(format!("Stake x{}", result.multiplier)),
        ];
        f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), trick_inner);
        return;
    }
    if trick_inner.height < 3 {
        return;
    }
    let slots = columns(trick_inner, 4);
    for (i, &(pos, card)) in view.trick.iter().enumerate().take(4) {
        let area = Rect { height: slots[i].height.min(4), ..slots[i] };
        render_card_widget(f, area, Some(card), None, Some(pos.label()));
    }
}

fn draw_hand(f: &mut Frame, area: Rect, app: &AppState, view: &RestrictedView) {
    let title = format!("{} hand", app.seat_label(view.me));
    let block = Block::default().title(title).borders(Borders::ALL);
    let hand_inner = inner(area);
    f.render_widget(block, area);
    let legal = view.legal_plays();
    let slots = columns(hand_inner, 8);
    for (i, &card) in view.hand.iter().enumerate().take(8) {
        let border = if app.selected() == Some(i) {
            Color::Yellow
        } else if legal.contains(&card) {
            Color::Green
        } else {
            Color::DarkGray
        };
        let label = (i + 1).to_string();
        render_card_widget(f, slots[i], Some(card), Some(border), Some(&label));
    }
}

fn prompt(view: &RestrictedView, app: &AppState) -> String {
    if !view.is_my_turn() && view.state != GameState::Finished {
        return match view.turn {
            Some(pos) => format!("Waiting for {pos}."),
            None => String::new(),
        };
    }
    match view.state {
        GameState::ChoosingGame => {
            let pending = app.pending_game().map_or_else(|| "pass".to_string(), |g| g.to_string());
            format!("Your announcement: {pending}. C/W/G/S choose, Enter announce, P pass.")
        }
        GameState::Raising => "Raise the stake? Y yes, P no.".to_string(),
        GameState::Striking => "Strike? Y yes, P no.".to_string(),
        GameState::StrikingBack => "Strike back? Y yes, P no.".to_string(),
        GameState::Playing => "Your lead or follow: 1-8 select, Enter play.".to_string(),
        GameState::Finished if view.is_accepting(view.me) => "Waiting for the others.".to_string(),
        GameState::Finished => "Game over. N or Enter for the next game.".to_string(),
    }
}

fn draw_status(f: &mut Frame, area: Rect, app: &AppState, view: &RestrictedView) {
    f.render_widget(Block::default().borders(Borders::ALL).title("Status"), area);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(inner(area));
    let mut left = vec![Line::from(prompt(view, app))];
    if let Some(msg) = app.message() {
        left.push(Line::from(Span::styled(format!("Rejected: {msg}"), Style::default().fg(Color::Red))));
    }
    let right = vec![Line::from(""), Line::from("? help - H history - M menu - Q quit")];
    f.render_widget(Paragraph::new(left).wrap(Wrap { trim: true }), cols[0]);
    f.render_widget(
        Paragraph::new(right).wrap(Wrap { trim: true }).alignment(Alignment::Right),
        cols[1],
    );
}

fn draw_history(f: &mut Frame, app: &AppState) {
    let area = centered_rect(70, 80, f.area());
    let block = Block::default().title("History").borders(Borders::ALL);
    let entries = app.history_page();
    let mut lines: Vec<Line> = Vec::new();
    if entries.is_empty() {
        lines.push(Line::from("No actions yet."));
    }
    for entry in entries {
        lines.push(Line::from(format!("{} {} [{}]", entry.position, entry.kind, entry.state.label())));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Up/Down scroll - Close: H or Esc",
        Style::default().add_modifier(Modifier::DIM),
    )));
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner(area));
}

fn draw_help(f: &mut Frame) {
    let area = centered_rect(70, 80, f.area());
    let block = Block::default().title("Help").borders(Borders::ALL);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(Span::styled("Table:", bold)),
        Line::from("- 1-8: select a card"),
        Line::from("- Enter: play card / announce / next game"),
        Line::from("- P: pass or decline"),
        Line::from("- Y: raise, strike or strike back"),
        Line::from("- C: cycle called Ace (Acorns, Leaves, Bells)"),
        Line::from("- W / G: Wenz / Geier"),
        Line::from("- S: cycle solo suit"),
        Line::from("- N: ready for the next game"),
        Line::from("- H: history"),
        Line::from(""),
        Line::from(Span::styled("Menu:", bold)),
        Line::from("- M: open / close menu"),
        Line::from("- Up / Down: move selection"),
        Line::from("- + / -: adjust value"),
        Line::from("- Enter: apply and deal"),
        Line::from("- Esc: cancel"),
        Line::from(""),
        Line::from("Q quits. Close help: ? or Esc"),
    ];
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner(area));
}

fn suit_style(s: Suit) -> Style {
    match s {
        Suit::Acorns => Style::default().fg(Color::Yellow),
        Suit::Leaves => Style::default().fg(Color::Green),
        Suit::Hearts => Style::default().fg(Color::Red),
        Suit::Bells => Style::default().fg(Color::LightMagenta),
    }
}

fn render_card_widget(
    f: &mut Frame,
    area: Rect,
    card: Option<Card>,
    border: Option<Color>,
    title: Option<&str>,
) {
    let mut block = Block::default().borders(Borders::ALL).title_alignment(Alignment::Center);
    if let Some(t) = title {
        block = block.title(t.to_string());
    }
    if let Some(color) = border {
        block = block.border_style(Style::default().fg(color));
    }
    let card_inner = inner(area);
    f.render_widget(block, area);
    let content = match card {
        Some(c) => Line::from(Span::styled(c.to_string(), suit_style(c.suit()))),
        None => Line::from("[  ]"),
    };
    f.render_widget(Paragraph::new(content).alignment(Alignment::Center), card_inner);
}
