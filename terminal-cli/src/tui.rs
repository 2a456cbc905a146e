//! Interactive client: a single select loop over terminal input and finished requests.

use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::Local;
use crossterm::event::{Event as CEvent, EventStream, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use futures::StreamExt;
use hitstand_client::{App, Command, Completion, Dispatch, Error, Tab};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::select;
use tokio::sync::mpsc;
use tracing::debug;

use crate::commands::{self, Action, COMMANDS};
use crate::config::Settings;
use crate::render::draw_ui;

const MAX_LOGS: usize = 300;

enum UiEvent {
    Completed(Completion),
}

#[derive(Default)]
pub struct CompletionState {
    pub filtered: Vec<usize>,
    pub selected: usize,
}

pub struct TuiState {
    pub app: App,
    pub url: String,
    pub default_hands: i64,
    pub input: String,
    pub logs: Vec<String>,
    pub hint: String,
    pub agent_cursor: usize,
    pub completion: CompletionState,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
}

impl TuiState {
    fn new(app: App, settings: &Settings, ui_tx: mpsc::UnboundedSender<UiEvent>) -> Self {
        Self {
            app,
            url: settings.url.clone(),
            default_hands: settings.hands,
            input: String::new(),
            logs: vec![format!("Connecting to {}…", settings.url)],
            hint: commands::IDLE_HINT.to_string(),
            agent_cursor: 0,
            completion: CompletionState::default(),
            ui_tx,
        }
    }

    pub fn push_log(&mut self, line: String) {
        let ts = Local::now().format("%H:%M:%S");
        for (i, part) in line.lines().enumerate() {
            if i == 0 {
                self.logs.push(format!("{ts} {part}"));
            } else {
                self.logs.push(format!("         {part}"));
            }
        }
        if self.logs.len() > MAX_LOGS {
            let excess = self.logs.len() - MAX_LOGS;
            self.logs.drain(0..excess);
        }
    }

    /// Run `command`; remote work is spawned and reported back through the event channel.
    fn dispatch(&mut self, command: Command) {
        match self.app.dispatch(command) {
            Dispatch::Done(Ok(())) => self.log_notice(),
            Dispatch::Done(Err(err @ Error::UnknownAgent(_))) if self.app.needs_catalog() => {
                self.push_log(format!("⚠️ {}", err.notification()));
                self.reload_agents();
            }
            Dispatch::Done(Err(err)) => self.push_log(format!("⚠️ {}", err.notification())),
            Dispatch::Pending(request) => {
                let ui_tx = self.ui_tx.clone();
                tokio::spawn(async move {
                    let _ = ui_tx.send(UiEvent::Completed(request.await));
                });
            }
        }
    }

    fn complete(&mut self, completion: Completion) {
        let agents_loaded = matches!(completion, Completion::Agents(Ok(_)));
        match self.app.complete(completion) {
            Ok(()) if agents_loaded => {
                let catalog = self.app.catalog();
                self.agent_cursor = catalog
                    .position(self.app.session().selected_agent_id())
                    .unwrap_or(0);
                let count = catalog.agents().len();
                self.push_log(format!(
                    "Loaded {count} agents · selected {}",
                    self.app.session().selected_agent_id()
                ));
            }
            Ok(()) => self.log_notice(),
            Err(err) => self.push_log(format!("⚠️ {}", err.notification())),
        }
    }

    fn log_notice(&mut self) {
        if let Some(text) = self.app.screen().latest_notice().map(|n| n.text().to_string()) {
            self.push_log(text);
        }
    }

    fn reload_agents(&mut self) {
        self.push_log("Fetching agents…".into());
        self.dispatch(Command::LoadAgents);
    }

    fn move_agent_cursor(&mut self, forward: bool) {
        let len = self.app.catalog().agents().len();
        if len == 0 {
            return;
        }
        self.agent_cursor = if forward {
            (self.agent_cursor + 1) % len
        } else {
            (self.agent_cursor + len - 1) % len
        };
    }

    fn select_agent_at_cursor(&mut self) {
        let id = self
            .app
            .catalog()
            .agents()
            .get(self.agent_cursor)
            .map(|agent| agent.id.clone());
        match id {
            Some(id) => self.dispatch(Command::SelectAgent(id)),
            None => self.push_log("No agents loaded".into()),
        }
    }

    fn agents_listing(&self) -> String {
        let catalog = self.app.catalog();
        let selected = self.app.session().selected_agent_id();
        let mut out = String::from("Agents:");
        for agent in catalog.agents() {
            let marker = if agent.id == selected { "*" } else { " " };
            out.push_str(&format!("\n {marker} {:<8} {}", agent.id, agent.name));
            if !agent.description.is_empty() {
                out.push_str(&format!(" · {}", agent.description));
            }
        }
        out
    }

    fn update_hint(&mut self) {
        let trimmed = self.input.trim().to_string();
        self.completion.filtered = commands::filter_commands(&trimmed);
        self.completion.selected = 0;
        self.hint = commands::hint_for(&trimmed);
    }

    /// Returns true when the user asked to quit.
    fn handle_key_event(&mut self, ev: CEvent) -> bool {
        let CEvent::Key(KeyEvent { code, modifiers, .. }) = ev else {
            return false;
        };
        match (code, modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => return true,
            (KeyCode::Char('d'), KeyModifiers::CONTROL) => return true,
            (KeyCode::Char(c @ '1'..='9'), m) if m.contains(KeyModifiers::ALT) => {
                if let Some(tab) = Tab::from_index((c as u8 - b'1') as usize) {
                    self.dispatch(Command::SwitchTab(tab));
                }
            }
            (KeyCode::F(5), _) => self.dispatch(Command::PlayHand { seed: None }),
            (KeyCode::F(6), _) => self.dispatch(Command::RunTournament {
                num_hands: self.default_hands,
                seed: None,
            }),
            (KeyCode::Up, _) | (KeyCode::Down, _) => {
                let forward = code == KeyCode::Down;
                let len = self.completion.filtered.len();
                if len > 0 {
                    self.completion.selected = if forward {
                        (self.completion.selected + 1) % len
                    } else {
                        (self.completion.selected + len - 1) % len
                    };
                } else {
                    self.move_agent_cursor(forward);
                }
            }
            (KeyCode::Tab, _) => {
                if !self.completion.filtered.is_empty() {
                    let last = self.completion.filtered.len() - 1;
                    let idx = self.completion.filtered[self.completion.selected.min(last)];
                    self.input = format!("/{} ", COMMANDS[idx].name);
                    self.update_hint();
                } else if self.input.trim_start().starts_with('/') {
                    if let Some(completed) = commands::autocomplete(&self.input) {
                        self.input = completed;
                    }
                    self.update_hint();
                } else {
                    let next = self.app.tabs().active().next();
                    self.dispatch(Command::SwitchTab(next));
                }
            }
            (KeyCode::Enter, _) => {
                let line = self.input.trim().to_string();
                self.input.clear();
                if line.is_empty() {
                    self.select_agent_at_cursor();
                } else {
                    debug!(%line, "command entered");
                    match commands::handle_line(&line, self.default_hands) {
                        Ok(Action::Dispatch(command)) => self.dispatch(command),
                        Ok(Action::Local(msg)) => self.push_log(msg),
                        Ok(Action::ListAgents) if self.app.needs_catalog() => self.reload_agents(),
                        Ok(Action::ListAgents) => {
                            let listing = self.agents_listing();
                            self.push_log(listing);
                        }
                        Ok(Action::Quit) => return true,
                        Err(e) => self.push_log(format!("⚠️ {e}")),
                    }
                }
                self.update_hint();
            }
            (KeyCode::Char(c), m) if !m.contains(KeyModifiers::CONTROL) => {
                self.input.push(c);
                self.update_hint();
            }
            (KeyCode::Backspace, _) => {
                self.input.pop();
                self.update_hint();
            }
            (KeyCode::Esc, _) => {
                self.input.clear();
                self.update_hint();
            }
            _ => {}
        }
        false
    }
}

pub async fn run(app: App, settings: &Settings) -> Result<()> {
    let (ui_tx, mut ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let mut state = TuiState::new(app, settings, ui_tx);
    state.reload_agents();

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut events = EventStream::new();
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(200);

    let outcome: Result<()> = loop {
        if let Err(err) = terminal.draw(|f| draw_ui(f, &state)) {
            break Err(err.into());
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::from_millis(0));

        select! {
            maybe_ev = events.next() => {
                match maybe_ev {
                    Some(Ok(ev)) => {
                        if state.handle_key_event(ev) {
                            break Ok(());
                        }
                    }
                    Some(Err(err)) => break Err(err).context("read terminal event"),
                    None => break Ok(()),
                }
            }
            Some(UiEvent::Completed(completion)) = ui_rx.recv() => {
                state.complete(completion);
            }
            _ = tokio::time::sleep(timeout) => {
                last_tick = Instant::now();
            }
        }
    };

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        crossterm::terminal::LeaveAlternateScreen,
        crossterm::cursor::Show
    )?;
    terminal.show_cursor()?;
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PersistedConfig;
    use hitstand_client::Client;

    fn state() -> (TuiState, mpsc::UnboundedReceiver<UiEvent>) {
        let settings = Settings::resolve(
            Some("http://127.0.0.1:9".into()),
            None,
            None,
            false,
            &PersistedConfig::default(),
        );
        let app = App::new(Client::new(&settings.url).unwrap());
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        (TuiState::new(app, &settings, ui_tx), ui_rx)
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> CEvent {
        CEvent::Key(KeyEvent::new(code, modifiers))
    }

    fn enter_line(state: &mut TuiState, line: &str) {
        state.input = line.to_string();
        state.handle_key_event(key(KeyCode::Enter, KeyModifiers::NONE));
    }

    async fn next_completion(ui_rx: &mut mpsc::UnboundedReceiver<UiEvent>) -> Completion {
        let Some(UiEvent::Completed(completion)) = ui_rx.recv().await else {
            panic!("channel closed");
        };
        completion
    }

    #[tokio::test]
    async fn test_play_without_catalog_fetches_agents_again() {
        let (mut state, mut ui_rx) = state();
        state.complete(Completion::Agents(Err(Error::Service("temporarily down".into()))));

        state.handle_key_event(key(KeyCode::F(5), KeyModifiers::NONE));
        assert!(matches!(next_completion(&mut ui_rx).await, Completion::Agents(Err(_))));
        assert!(state.logs.iter().any(|l| l.ends_with("unknown agent: EV")));
        assert!(state.app.hand_controller().control().is_enabled());
    }

    #[tokio::test]
    async fn test_agents_command_reloads_missing_catalog() {
        let (mut state, mut ui_rx) = state();
        enter_line(&mut state, "/agents");
        assert!(matches!(next_completion(&mut ui_rx).await, Completion::Agents(_)));

        enter_line(&mut state, "/reload");
        assert!(matches!(next_completion(&mut ui_rx).await, Completion::Agents(_)));
    }

    #[tokio::test]
    async fn test_alt_digit_switches_tab() {
        let (mut state, _ui_rx) = state();
        state.handle_key_event(key(KeyCode::Char('2'), KeyModifiers::ALT));
        assert!(state.app.tabs().is_active(Tab::Tournament));
        state.handle_key_event(key(KeyCode::Char('1'), KeyModifiers::CONTROL));
        assert!(state.app.tabs().is_active(Tab::Tournament));
        assert_eq!(state.input, "");
    }
}
