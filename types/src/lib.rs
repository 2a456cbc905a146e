//! Common types used throughout hitstand.
//!
//! The simulation service only ships an ordered list of atomic [`api::Step`]s plus a summary.
//! Everything a client shows on the table (per-side card sequences, outcome banner, tournament
//! rates) is derived here from those contracts, without any I/O.

pub mod api;
pub mod cards;
pub mod outcome;
pub mod tournament;
pub mod trace;

pub use api::{
    decode_envelope, Actor, AgentDescriptor, AgentsResponse, EnvelopeError, HandSummary,
    MatchRequest, MatchResponse, Payoff, PlayHandRequest, PlayHandResponse, Step,
};
pub use cards::{Card, CardRank, CardStyle, CARD_BACK, UNKNOWN_CARD};
pub use outcome::{classify, classify_flags, OutcomeCategory, OutcomeResult};
pub use tournament::{MatchResults, Slot, TournamentStats};
pub use trace::{reconstruct, ReconstructedTable};

/// Agent selected before the catalog has been fetched.
pub const DEFAULT_AGENT_ID: &str = "EV";
