//! Text rendering of hands and tournaments, plus the state of what is currently on screen.
//!
//! Renderers are pure: they turn already-derived structures into lines and never fail. The
//! terminal front end only lays these lines out.

use crate::controller::PlayedHand;
use crate::tabs::Tab;
use crate::{Error, Result};
use hitstand_types::api::Step;
use hitstand_types::cards::render_optional;
use hitstand_types::{Card, CardStyle, MatchResults, TournamentStats, CARD_BACK};

/// Shown before the first successful hand.
pub const WELCOME: &str = "Welcome! Pick an agent and play a hand to see how it plays.";

/// Shown before the first successful tournament.
pub const TOURNAMENT_WELCOME: &str = "Run a tournament to compare both agents over many hands.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Info(text) | Notice::Error(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

/// What the user currently sees. Results are only replaced by a later success.
///
/// Each tab keeps its own notice line; a successful result clears that tab's line since the
/// result itself carries the banner. `latest` is whatever was reported last, for log panes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Screen {
    pub hand: Option<PlayedHand>,
    pub tournament: Option<MatchResults>,
    hand_notice: Option<Notice>,
    tournament_notice: Option<Notice>,
    latest: Option<Notice>,
}

impl Screen {
    /// Show a finished hand, or keep the previous one and surface the error.
    pub fn apply_hand(&mut self, result: Result<PlayedHand>) -> Result<()> {
        match result {
            Ok(hand) => {
                self.hand_notice = None;
                self.latest = Some(Notice::Info(render_outcome(&hand)));
                self.hand = Some(hand);
                Ok(())
            }
            Err(err) => {
                self.fail(Tab::PlayHand, &err);
                Err(err)
            }
        }
    }

    /// Show tournament results, or keep the previous ones and surface the error.
    pub fn apply_tournament(&mut self, result: Result<MatchResults>) -> Result<()> {
        match result {
            Ok(results) => {
                self.tournament_notice = None;
                self.latest = Some(Notice::Info(render_leader(&results)));
                self.tournament = Some(results);
                Ok(())
            }
            Err(err) => {
                self.fail(Tab::Tournament, &err);
                Err(err)
            }
        }
    }

    pub fn fail(&mut self, tab: Tab, err: &Error) {
        self.notify(tab, Notice::Error(err.notification()));
    }

    pub fn notify(&mut self, tab: Tab, notice: Notice) {
        self.latest = Some(notice.clone());
        match tab {
            Tab::PlayHand => self.hand_notice = Some(notice),
            Tab::Tournament => self.tournament_notice = Some(notice),
        }
    }

    /// Notice line drawn under `tab`'s results.
    pub fn notice(&self, tab: Tab) -> Option<&Notice> {
        match tab {
            Tab::PlayHand => self.hand_notice.as_ref(),
            Tab::Tournament => self.tournament_notice.as_ref(),
        }
    }

    pub fn latest_notice(&self) -> Option<&Notice> {
        self.latest.as_ref()
    }
}

/// Cards separated by spaces.
pub fn render_cards(cards: &[Card], style: CardStyle) -> String {
    cards
        .iter()
        .map(|card| card.render(style))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Dealer-side cards in the order they were dealt, face-down ones as card backs.
pub fn render_dealer_row(row: &[Option<Card>], style: CardStyle) -> String {
    row.iter()
        .map(|card| card.as_ref().map_or(CARD_BACK, |card| card.render(style)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn total_label(total: i32, bust: bool) -> String {
    if bust {
        format!("{total} BUST")
    } else {
        total.to_string()
    }
}

/// The table: agent, dealer upcard and both hands with their final totals.
pub fn render_table(hand: &PlayedHand, style: CardStyle) -> Vec<String> {
    let summary = &hand.summary;
    vec![
        format!("Agent:  {}", summary.agent),
        format!(
            "Upcard: {}",
            render_optional(summary.dealer_upcard.as_ref(), style)
        ),
        format!(
            "Player: {}  ({})",
            render_cards(&hand.table.player_cards, style),
            total_label(summary.player_total, summary.player_bust)
        ),
        format!(
            "Dealer: {}  ({})",
            render_dealer_row(&hand.table.dealer_row, style),
            total_label(summary.dealer_total, summary.dealer_bust)
        ),
    ]
}

/// One trace line: `ACTOR  ACTION CARD | p=.. d=.. | note`.
pub fn format_step(step: &Step, style: CardStyle) -> String {
    let card = step.card.as_ref().map_or("-", |card| card.render(style));
    let line = format!(
        "{:<6} {:<5} {:>2} | p={:>2} d={:>2} | {}",
        step.actor,
        step.action,
        card,
        step.player_total,
        step.dealer_total,
        step.note().unwrap_or_default()
    );
    line.trim_end().trim_end_matches('|').trim_end().to_string()
}

pub fn render_trace(steps: &[Step], style: CardStyle) -> Vec<String> {
    if steps.is_empty() {
        return vec!["(no steps)".to_string()];
    }
    steps.iter().map(|step| format_step(step, style)).collect()
}

pub fn render_outcome(hand: &PlayedHand) -> String {
    format!(
        "{} ({} {})",
        hand.outcome.message,
        hand.payoff.label(),
        hand.payoff
    )
}

pub fn render_stats(stats: &TournamentStats) -> String {
    format!(
        "{}: hands={} wins={} ({}) losses={} ({}) pushes={} ({}) avg_return={}",
        stats.agent,
        stats.hands,
        stats.wins,
        stats.win_rate_display(),
        stats.losses,
        stats.loss_rate_display(),
        stats.pushes,
        stats.push_rate_display(),
        stats.avg_return_display()
    )
}

pub fn render_leader(results: &MatchResults) -> String {
    match results.leader() {
        Some(slot) => {
            let stats = results.get(slot);
            format!(
                "Leader: {} with avg_return {}",
                stats.agent,
                stats.avg_return_display()
            )
        }
        None => "Leader: tie on avg_return".to_string(),
    }
}

pub fn render_results(results: &MatchResults) -> Vec<String> {
    let mut lines: Vec<String> = results
        .iter()
        .map(|(slot, stats)| format!("[{slot}] {}", render_stats(stats)))
        .collect();
    lines.push(render_leader(results));
    lines
}
