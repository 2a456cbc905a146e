//! Command dispatch shared by every front end.
//!
//! A front end turns user input into [`Command`]s. [`App::dispatch`] applies local commands
//! immediately and, for remote ones, disables the matching control before handing back a future.
//! The front end drives that future however it likes and feeds the resulting [`Completion`] back
//! through [`App::complete`], which is the only place results reach the [`Screen`].

use crate::controller::{HandController, PlayedHand, TournamentController};
use crate::session::{AgentCatalog, SessionState};
use crate::tabs::{Tab, TabController};
use crate::view::{Notice, Screen};
use crate::{Client, Error, Result};
use futures::future::BoxFuture;
use futures::FutureExt;
use hitstand_types::{CardStyle, MatchResults};
use tracing::{debug, warn};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    LoadAgents,
    SelectAgent(String),
    SwitchTab(Tab),
    PlayHand { seed: Option<i64> },
    RunTournament { num_hands: i64, seed: Option<i64> },
}

/// Output of a remote command.
#[derive(Debug)]
pub enum Completion {
    Agents(Result<AgentCatalog>),
    Hand(Result<PlayedHand>),
    Tournament(Result<MatchResults>),
}

pub enum Dispatch {
    /// The command was applied (or rejected) in place.
    Done(Result<()>),
    /// A request is in flight; pass its output to [`App::complete`].
    Pending(BoxFuture<'static, Completion>),
}

pub struct App {
    client: Client,
    catalog: AgentCatalog,
    session: SessionState,
    tabs: TabController,
    screen: Screen,
    hand: HandController,
    tournament: TournamentController,
    style: CardStyle,
}

impl App {
    pub fn new(client: Client) -> Self {
        Self {
            hand: HandController::new(client.clone()),
            tournament: TournamentController::new(client.clone()),
            client,
            catalog: AgentCatalog::default(),
            session: SessionState::default(),
            tabs: TabController::default(),
            screen: Screen::default(),
            style: CardStyle::default(),
        }
    }

    pub fn with_card_style(mut self, style: CardStyle) -> Self {
        self.style = style;
        self
    }

    pub fn card_style(&self) -> CardStyle {
        self.style
    }

    pub fn catalog(&self) -> &AgentCatalog {
        &self.catalog
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn tabs(&self) -> &TabController {
        &self.tabs
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// True until a catalog fetch has succeeded. Hands cannot be played before that.
    pub fn needs_catalog(&self) -> bool {
        !self.catalog.is_loaded()
    }

    pub fn hand_controller(&self) -> &HandController {
        &self.hand
    }

    pub fn tournament_controller(&self) -> &TournamentController {
        &self.tournament
    }

    pub fn dispatch(&mut self, command: Command) -> Dispatch {
        debug!(?command, "dispatch");
        match command {
            Command::LoadAgents => {
                let client = self.client.clone();
                Dispatch::Pending(
                    async move { Completion::Agents(AgentCatalog::fetch(&client).await) }.boxed(),
                )
            }
            Command::SelectAgent(id) => {
                let result = self.session.select(&self.catalog, &id);
                match &result {
                    Ok(()) => self.screen.notify(
                        Tab::PlayHand,
                        Notice::Info(format!(
                            "Selected agent {}",
                            self.session.selected_agent_id()
                        )),
                    ),
                    Err(err) => self.screen.fail(Tab::PlayHand, err),
                }
                Dispatch::Done(result)
            }
            Command::SwitchTab(tab) => {
                self.tabs.switch(tab);
                Dispatch::Done(Ok(()))
            }
            Command::PlayHand { seed } => {
                // Rejected before the control is touched, so nothing reaches the service.
                let agent_id = self.session.selected_agent_id();
                if !self.catalog.contains(agent_id) {
                    let err = Error::UnknownAgent(agent_id.to_string());
                    self.screen.fail(Tab::PlayHand, &err);
                    return Dispatch::Done(Err(err));
                }
                match self.hand.begin(agent_id, seed) {
                    Ok(request) => {
                        Dispatch::Pending(request.map(Completion::Hand).boxed())
                    }
                    Err(err) => Dispatch::Done(Err(err)),
                }
            }
            Command::RunTournament { num_hands, seed } => {
                match self.tournament.begin(num_hands, seed) {
                    Ok(request) => {
                        Dispatch::Pending(request.map(Completion::Tournament).boxed())
                    }
                    Err(err) => Dispatch::Done(Err(err)),
                }
            }
        }
    }

    /// Apply the output of a remote command.
    pub fn complete(&mut self, completion: Completion) -> Result<()> {
        match completion {
            Completion::Agents(Ok(catalog)) => {
                self.catalog = catalog;
                self.session.reconcile(&self.catalog);
                if self.catalog.agents().is_empty() {
                    warn!("service offered no agents");
                }
                Ok(())
            }
            Completion::Agents(Err(err)) => {
                warn!(error = %err, "failed to load agents");
                self.screen.fail(Tab::PlayHand, &err);
                Err(err)
            }
            Completion::Hand(result) => self.screen.apply_hand(result),
            Completion::Tournament(result) => self.screen.apply_tournament(result),
        }
    }

    /// Dispatch `command` and, if it went remote, wait for it and apply the result.
    pub async fn run(&mut self, command: Command) -> Result<()> {
        match self.dispatch(command) {
            Dispatch::Done(result) => result,
            Dispatch::Pending(request) => {
                let completion = request.await;
                self.complete(completion)
            }
        }
    }
}
