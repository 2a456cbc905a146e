//! Controllers for the two remote operations.
//!
//! Each controller owns one [`Control`]. `begin` takes the control synchronously and hands back a
//! `'static` future that carries the guard, so a caller can spawn the request and keep drawing
//! while the control stays disabled until the future finishes or is dropped.

use crate::control::Control;
use crate::{Client, Error, Result};
use futures::Future;
use hitstand_types::api::{HandSummary, MatchRequest, Payoff, PlayHandRequest, PlayHandResponse, Step};
use hitstand_types::{classify, reconstruct, MatchResults, OutcomeResult, ReconstructedTable};
use tracing::{info, warn};

/// Tournament size used when none (or zero, or garbage) is given.
pub const DEFAULT_TOURNAMENT_HANDS: i64 = 1000;

/// A finished hand together with everything derived from its trace.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayedHand {
    pub summary: HandSummary,
    pub steps: Vec<Step>,
    pub payoff: Payoff,
    pub table: ReconstructedTable,
    pub outcome: OutcomeResult,
}

impl From<PlayHandResponse> for PlayedHand {
    fn from(response: PlayHandResponse) -> Self {
        let table = reconstruct(&response.steps);
        let outcome = classify(response.payoff, &response.summary);
        Self {
            summary: response.summary,
            steps: response.steps,
            payoff: response.payoff,
            table,
            outcome,
        }
    }
}

#[derive(Clone, Debug)]
pub struct HandController {
    client: Client,
    control: Control,
}

impl HandController {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            control: Control::new("play hand"),
        }
    }

    pub fn control(&self) -> &Control {
        &self.control
    }

    /// Disable the control and build the request future.
    pub fn begin(
        &self,
        agent_id: &str,
        seed: Option<i64>,
    ) -> Result<impl Future<Output = Result<PlayedHand>> + Send + 'static> {
        let guard = self
            .control
            .try_acquire()
            .ok_or(Error::Busy(self.control.name()))?;
        let client = self.client.clone();
        let request = PlayHandRequest {
            agent_id: agent_id.to_string(),
            seed,
        };
        Ok(async move {
            let _guard = guard;
            let hand = PlayedHand::from(client.play_hand(&request).await?);
            info!(
                agent_id = %request.agent_id,
                steps = hand.steps.len(),
                payoff = hand.payoff.value(),
                outcome = ?hand.outcome.category,
                "hand complete"
            );
            Ok(hand)
        })
    }

    pub async fn play_hand(&self, agent_id: &str, seed: Option<i64>) -> Result<PlayedHand> {
        self.begin(agent_id, seed)?.await
    }
}

#[derive(Clone, Debug)]
pub struct TournamentController {
    client: Client,
    control: Control,
}

impl TournamentController {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            control: Control::new("tournament"),
        }
    }

    pub fn control(&self) -> &Control {
        &self.control
    }

    /// Disable the control and build the request future. `num_hands` is forwarded unchanged.
    pub fn begin(
        &self,
        num_hands: i64,
        seed: Option<i64>,
    ) -> Result<impl Future<Output = Result<MatchResults>> + Send + 'static> {
        let guard = self
            .control
            .try_acquire()
            .ok_or(Error::Busy(self.control.name()))?;
        let client = self.client.clone();
        let request = MatchRequest { num_hands, seed };
        Ok(async move {
            let _guard = guard;
            let results = client.run_match(&request).await?;
            for (slot, stats) in results.iter() {
                if !stats.is_consistent() {
                    warn!(
                        %slot,
                        agent = %stats.agent,
                        hands = stats.hands,
                        wins = stats.wins,
                        losses = stats.losses,
                        pushes = stats.pushes,
                        "tournament counts do not add up"
                    );
                }
            }
            info!(num_hands, leader = ?results.leader(), "tournament complete");
            Ok(results)
        })
    }

    pub async fn run_tournament(&self, num_hands: i64, seed: Option<i64>) -> Result<MatchResults> {
        self.begin(num_hands, seed)?.await
    }
}

/// Leading integer of `input`, read the way a form field is: optional sign, then digits, and
/// anything after the digits ignored. Out-of-range values saturate.
fn leading_integer(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..end];
    if digits.is_empty() {
        return None;
    }
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Tournament size from user input. Absent, non-numeric and zero input fall back to
/// [`DEFAULT_TOURNAMENT_HANDS`]; negative sizes are passed through for the service to judge.
pub fn coerce_num_hands(input: Option<&str>) -> i64 {
    match input.and_then(leading_integer) {
        None | Some(0) => DEFAULT_TOURNAMENT_HANDS,
        Some(hands) => hands,
    }
}

/// Seed from user input; blank or non-numeric input means no seed.
pub fn coerce_seed(input: Option<&str>) -> Option<i64> {
    input.and_then(leading_integer)
}
