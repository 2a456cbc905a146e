//! JSON contracts of the simulation service.
//!
//! - `GET /api/agents` -> [`AgentsResponse`]
//! - `POST /api/play-hand` with [`PlayHandRequest`] -> enveloped [`PlayHandResponse`]
//! - `POST /api/match` with [`MatchRequest`] -> enveloped [`MatchResponse`]
//!
//! Enveloped responses carry `success`; a `false` value comes with an `error` string that is
//! surfaced to the user unchanged.

use crate::cards::Card;
use crate::tournament::MatchResults;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Path of the agent catalog endpoint, relative to the service root.
pub const AGENTS_PATH: &str = "api/agents";
/// Path of the single-hand endpoint.
pub const PLAY_HAND_PATH: &str = "api/play-hand";
/// Path of the tournament endpoint.
pub const MATCH_PATH: &str = "api/match";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDescriptor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentsResponse {
    pub agents: Vec<AgentDescriptor>,
}

/// Who produced a step. `System` draws belong to the dealer side of the table.
///
/// Labels the client does not know are kept verbatim so the step still shows up in the trace.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Actor {
    Player,
    Dealer,
    System,
    Unknown(String),
}

impl Actor {
    pub fn is_dealer_side(&self) -> bool {
        matches!(self, Actor::Dealer | Actor::System)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Actor::Player => "PLAYER",
            Actor::Dealer => "DEALER",
            Actor::System => "SYSTEM",
            Actor::Unknown(label) => label,
        }
    }
}

impl From<String> for Actor {
    fn from(label: String) -> Self {
        match label.as_str() {
            "PLAYER" => Actor::Player,
            "DEALER" => Actor::Dealer,
            "SYSTEM" => Actor::System,
            _ => Actor::Unknown(label),
        }
    }
}

impl From<Actor> for String {
    fn from(actor: Actor) -> Self {
        match actor {
            Actor::Unknown(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `pad` keeps width/alignment flags working in trace lines.
        f.pad(self.as_str())
    }
}

/// One atomic game event, in chronological order within its trace.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub actor: Actor,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub card: Option<Card>,
    #[serde(default)]
    pub player_total: i32,
    #[serde(default)]
    pub dealer_total: i32,
    #[serde(default)]
    pub note: Option<String>,
}

impl Step {
    /// The note, if one was given and is not blank.
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HandSummary {
    #[serde(default)]
    pub agent: String,
    #[serde(default)]
    pub dealer_upcard: Option<Card>,
    #[serde(default)]
    pub player_total: i32,
    #[serde(default)]
    pub dealer_total: i32,
    #[serde(default)]
    pub player_bust: bool,
    #[serde(default)]
    pub dealer_bust: bool,
}

/// Payoff from the player's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i8")]
pub enum Payoff {
    Loss,
    Push,
    Win,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("payoff must be -1, 0 or 1 (got {0})")]
pub struct InvalidPayoff(pub i64);

impl Payoff {
    pub const fn value(self) -> i8 {
        match self {
            Payoff::Loss => -1,
            Payoff::Push => 0,
            Payoff::Win => 1,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Payoff::Loss => "LOSS",
            Payoff::Push => "PUSH",
            Payoff::Win => "WIN",
        }
    }
}

impl TryFrom<i64> for Payoff {
    type Error = InvalidPayoff;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Payoff::Loss),
            0 => Ok(Payoff::Push),
            1 => Ok(Payoff::Win),
            other => Err(InvalidPayoff(other)),
        }
    }
}

impl From<Payoff> for i8 {
    fn from(payoff: Payoff) -> Self {
        payoff.value()
    }
}

impl fmt::Display for Payoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Payoff::Loss => "-1",
            Payoff::Push => "0",
            Payoff::Win => "+1",
        })
    }
}

/// Body of `POST /api/play-hand`. `seed` is sent as `null` when absent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayHandRequest {
    pub agent_id: String,
    pub seed: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayHandResponse {
    pub summary: HandSummary,
    pub payoff: Payoff,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// Body of `POST /api/match`. `num_hands` is forwarded as given, even when non-positive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRequest {
    pub num_hands: i64,
    pub seed: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchResponse {
    pub results: MatchResults,
}

/// Error decoding a `{success, error, ...}` envelope.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// Well-formed response with `success: false`.
    #[error("{0}")]
    Service(String),
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Decode an enveloped response body.
///
/// A body without a `success` field is decoded as-is, which is how the agent catalog is served.
pub fn decode_envelope<T: DeserializeOwned>(value: Value) -> Result<T, EnvelopeError> {
    if value.get("success").and_then(Value::as_bool) == Some(false) {
        let message = match value.get("error") {
            Some(Value::String(message)) => message.clone(),
            Some(Value::Null) | None => "unknown service error".to_string(),
            Some(other) => other.to_string(),
        };
        return Err(EnvelopeError::Service(message));
    }
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardRank;
    use serde_json::json;

    #[test]
    fn test_play_hand_request_sends_null_seed() {
        let request = PlayHandRequest {
            agent_id: "EV".into(),
            seed: None,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"agent_id": "EV", "seed": null})
        );
    }

    #[test]
    fn test_decode_play_hand() {
        let body = json!({
            "success": true,
            "payoff": -1,
            "summary": {
                "agent": "PlayerBot(Naive)",
                "dealer_upcard": 6,
                "player_total": 24,
                "dealer_total": 16,
                "player_bust": true,
                "dealer_bust": false,
                "payoff": -1
            },
            "steps": [
                {"actor": "PLAYER", "action": "DEAL", "card": 10, "player_total": 10, "dealer_total": 0, "note": "player card 1"},
                {"actor": "PLAYER", "action": "HIT", "card": null, "player_total": 14, "dealer_total": 16, "note": "PlayerBot(Naive) decision"}
            ]
        });
        let response: PlayHandResponse = decode_envelope(body).unwrap();
        assert_eq!(response.payoff, Payoff::Loss);
        assert_eq!(response.summary.dealer_upcard, Some(Card::Rank(CardRank::new(6).unwrap())));
        assert!(response.summary.player_bust);
        assert_eq!(response.steps.len(), 2);
        assert_eq!(response.steps[1].card, None);
        assert_eq!(response.steps[0].note(), Some("player card 1"));
    }

    #[test]
    fn test_decode_service_error() {
        let err = decode_envelope::<PlayHandResponse>(json!({"success": false, "error": "deck empty"}))
            .unwrap_err();
        assert!(matches!(err, EnvelopeError::Service(ref m) if m == "deck empty"));
        assert_eq!(err.to_string(), "deck empty");
    }

    #[test]
    fn test_decode_rejects_invalid_payoff() {
        let err = decode_envelope::<PlayHandResponse>(json!({
            "success": true,
            "payoff": 2,
            "summary": {},
            "steps": []
        }))
        .unwrap_err();
        assert!(matches!(err, EnvelopeError::Malformed(_)));
    }

    #[test]
    fn test_blank_note_is_absent() {
        let step: Step = serde_json::from_value(json!({"actor": "DEALER", "action": "DRAW", "card": 3, "note": ""})).unwrap();
        assert_eq!(step.note(), None);
        assert_eq!(step.player_total, 0);
    }

    #[test]
    fn test_unrecognised_actor_keeps_the_step() {
        let body = json!({
            "success": true,
            "payoff": 0,
            "summary": {"agent": "DealerBot(EV)"},
            "steps": [
                {"actor": "OBSERVER", "action": "NOTE", "card": null, "player_total": 0, "dealer_total": 0},
                {"actor": "DEALER", "action": "DEAL", "card": 4, "player_total": 0, "dealer_total": 4}
            ]
        });
        let response: PlayHandResponse = decode_envelope(body).unwrap();
        assert_eq!(response.steps[0].actor, Actor::Unknown("OBSERVER".into()));
        assert_eq!(response.steps[0].actor.to_string(), "OBSERVER");
        assert!(!response.steps[0].actor.is_dealer_side());
        assert_eq!(response.steps[1].actor, Actor::Dealer);
        assert_eq!(serde_json::to_value(&response.steps[1].actor).unwrap(), json!("DEALER"));
    }

    #[test]
    fn test_payoff_labels() {
        assert_eq!(Payoff::Win.label(), "WIN");
        assert_eq!(Payoff::Loss.to_string(), "-1");
        assert_eq!(Payoff::Push.to_string(), "0");
        assert_eq!(Payoff::try_from(3), Err(InvalidPayoff(3)));
    }
}
