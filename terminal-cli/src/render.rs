use hitstand_client::view::{
    render_outcome, render_results, render_table, render_trace, Notice, TOURNAMENT_WELCOME,
    WELCOME,
};
use hitstand_client::{Control, Tab};
use hitstand_types::CardStyle;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap};

use crate::commands::COMMANDS;
use crate::tui::TuiState;

pub fn draw_ui(f: &mut ratatui::Frame, state: &TuiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1), Constraint::Length(3)].as_ref())
        .split(f.area());

    // Status line
    let app = &state.app;
    let status = Paragraph::new(format!(
        "Service: {} | Agent: {} | Cards: {}",
        state.url,
        app.session().selected_agent_id(),
        match app.card_style() {
            CardStyle::Text => "text",
            CardStyle::Emoji => "emoji",
        }
    ))
    .style(Style::default().fg(Color::Gray));
    f.render_widget(status, chunks[0]);

    let titles: Vec<Line> = app
        .tabs()
        .markers()
        .map(|(tab, _)| Line::from(format!("{} {}", tab.index() + 1, tab.title())))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.tabs().active().index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    f.render_widget(
        tabs,
        Rect {
            x: chunks[0].x,
            y: chunks[0].y.saturating_add(1),
            width: chunks[0].width,
            height: 1,
        },
    );

    // Main area split into the active tab + log
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)].as_ref())
        .split(chunks[1]);

    match app.tabs().active() {
        Tab::PlayHand => draw_hand_tab(f, state, main_chunks[0]),
        Tab::Tournament => draw_tournament_tab(f, state, main_chunks[0]),
    }

    // Log pane
    let log_lines: Vec<Line> = state
        .logs
        .iter()
        .rev()
        .take((main_chunks[1].height.saturating_sub(2)) as usize)
        .rev()
        .map(|l| Line::raw(l.clone()))
        .collect();
    let log = Paragraph::new(log_lines)
        .block(Block::default().borders(Borders::ALL).title("Log"))
        .wrap(Wrap { trim: true });
    f.render_widget(log, main_chunks[1]);

    draw_input(f, state, chunks[2]);
}

fn control_label(key: &str, control: &Control) -> Span<'static> {
    if control.is_enabled() {
        Span::styled(format!("[{key} {}]", control.name()), Style::default().fg(Color::Cyan))
    } else {
        Span::styled(
            format!("[{key} {}…]", control.name()),
            Style::default().fg(Color::DarkGray),
        )
    }
}

fn notice_line(notice: Option<&Notice>) -> Line<'static> {
    match notice {
        Some(Notice::Error(text)) => Line::styled(text.clone(), Style::default().fg(Color::Red)),
        Some(Notice::Info(text)) => Line::styled(text.clone(), Style::default().fg(Color::White)),
        None => Line::raw(""),
    }
}

fn outcome_color(class: &str) -> Color {
    match class {
        "win" => Color::Green,
        "loss" => Color::Red,
        "push" => Color::Yellow,
        _ => Color::White,
    }
}

fn draw_hand_tab(f: &mut ratatui::Frame, state: &TuiState, area: Rect) {
    let app = &state.app;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(28), Constraint::Min(1)].as_ref())
        .split(area);

    // Agent picker
    let selected = app.session().selected_agent_id();
    let items: Vec<ListItem> = app
        .catalog()
        .agents()
        .iter()
        .map(|agent| {
            let marker = if agent.id == selected { "● " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Green)),
                Span::raw(agent.name.clone()),
            ]))
        })
        .collect();
    let mut list_state = ListState::default();
    if !items.is_empty() {
        list_state.select(Some(state.agent_cursor.min(items.len() - 1)));
    }
    let agents = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Agents (Enter)"))
        .highlight_style(Style::default().fg(Color::Yellow));
    f.render_stateful_widget(agents, columns[0], &mut list_state);

    // Table + trace
    let screen = app.screen();
    let style = app.card_style();
    let mut lines = vec![Line::from(control_label("F5", app.hand_controller().control()))];
    match &screen.hand {
        Some(hand) => {
            lines.push(Line::styled(
                render_outcome(hand),
                Style::default()
                    .fg(outcome_color(hand.outcome.category.class()))
                    .add_modifier(Modifier::BOLD),
            ));
            lines.push(notice_line(screen.notice(Tab::PlayHand)));
            lines.extend(render_table(hand, style).into_iter().map(Line::raw));
            lines.push(Line::raw(""));
            lines.push(Line::styled("Trace", Style::default().fg(Color::Yellow)));
            lines.extend(render_trace(&hand.steps, style).into_iter().map(Line::raw));
        }
        None => {
            lines.push(notice_line(screen.notice(Tab::PlayHand)));
            lines.push(Line::raw(WELCOME));
        }
    }
    let board = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Play Hand"))
        .wrap(Wrap { trim: false });
    f.render_widget(board, columns[1]);
}

fn draw_tournament_tab(f: &mut ratatui::Frame, state: &TuiState, area: Rect) {
    let app = &state.app;
    let screen = app.screen();
    let mut lines = vec![Line::from(vec![
        control_label("F6", app.tournament_controller().control()),
        Span::styled(
            format!("  default {} hands", state.default_hands),
            Style::default().fg(Color::Gray),
        ),
    ])];
    lines.push(notice_line(screen.notice(Tab::Tournament)));
    lines.push(Line::raw(""));
    match &screen.tournament {
        Some(results) => lines.extend(render_results(results).into_iter().map(Line::raw)),
        None => lines.push(Line::raw(TOURNAMENT_WELCOME)),
    }
    let board = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Tournament"))
        .wrap(Wrap { trim: false });
    f.render_widget(board, area);
}

fn draw_input(f: &mut ratatui::Frame, state: &TuiState, area: Rect) {
    f.render_widget(Clear, area);
    let input = Paragraph::new(format!("hitstand $ {}", state.input))
        .block(Block::default().borders(Borders::ALL).title("Input"));
    f.render_widget(input, area);

    // Hint overlay on the bottom border
    if !state.hint.is_empty() && area.height > 0 {
        let hint = Paragraph::new(state.hint.as_str()).style(Style::default().fg(Color::Gray));
        f.render_widget(
            hint,
            Rect {
                x: area.x.saturating_add(2),
                y: area.y + area.height - 1,
                width: area.width.saturating_sub(4),
                height: 1,
            },
        );
    }

    if state.completion.filtered.is_empty() {
        return;
    }
    let items: Vec<ListItem> = state
        .completion
        .filtered
        .iter()
        .map(|&idx| {
            let cmd = &COMMANDS[idx];
            ListItem::new(Line::from(vec![
                Span::styled(format!("/{}", cmd.name), Style::default().fg(Color::Cyan)),
                Span::raw("  "),
                Span::styled(cmd.desc, Style::default().fg(Color::Gray)),
            ]))
        })
        .collect();
    // Float the palette just above the input box.
    let height = (items.len() as u16).min(6) + 2;
    let popup = Rect {
        x: area.x,
        y: area.y.saturating_sub(height),
        width: area.width.min(60),
        height,
    };
    let mut list_state = ListState::default();
    list_state.select(Some(state.completion.selected.min(items.len() - 1)));
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Commands"))
        .highlight_style(Style::default().fg(Color::Yellow));
    f.render_widget(Clear, popup);
    f.render_stateful_widget(list, popup, &mut list_state);
}
