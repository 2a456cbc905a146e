//! Aggregate statistics from a tournament run.
//!
//! Rates are display contracts: one decimal place with a `%` suffix, and `avg_return` with four
//! decimal places. A slot that played no hands shows `0.0%` rather than a NaN rate.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Rate shown when a slot reports no hands.
pub const EMPTY_RATE: &str = "0.0%";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TournamentStats {
    pub agent: String,
    pub hands: i64,
    pub wins: i64,
    pub losses: i64,
    pub pushes: i64,
    pub avg_return: f64,
}

fn rate(count: i64, hands: i64) -> Option<f64> {
    if hands <= 0 {
        return None;
    }
    Some(count as f64 / hands as f64 * 100.0)
}

fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(rate) if rate.is_finite() => format!("{rate:.1}%"),
        _ => EMPTY_RATE.to_string(),
    }
}

impl TournamentStats {
    /// Win percentage, or `None` when no hands were played.
    pub fn win_rate(&self) -> Option<f64> {
        rate(self.wins, self.hands)
    }

    pub fn loss_rate(&self) -> Option<f64> {
        rate(self.losses, self.hands)
    }

    pub fn push_rate(&self) -> Option<f64> {
        rate(self.pushes, self.hands)
    }

    pub fn win_rate_display(&self) -> String {
        format_rate(self.win_rate())
    }

    pub fn loss_rate_display(&self) -> String {
        format_rate(self.loss_rate())
    }

    pub fn push_rate_display(&self) -> String {
        format_rate(self.push_rate())
    }

    pub fn avg_return_display(&self) -> String {
        let avg = if self.avg_return.is_finite() {
            self.avg_return
        } else {
            0.0
        };
        format!("{avg:.4}")
    }

    /// Whether `wins + losses + pushes == hands`.
    pub fn is_consistent(&self) -> bool {
        self.wins
            .checked_add(self.losses)
            .and_then(|n| n.checked_add(self.pushes))
            == Some(self.hands)
    }
}

/// Agent slot in a two-agent match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    A,
    B,
}

impl Slot {
    pub const ALL: [Self; 2] = [Self::A, Self::B];
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Slot::A => "A",
            Slot::B => "B",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchResults {
    #[serde(rename = "A")]
    pub a: TournamentStats,
    #[serde(rename = "B")]
    pub b: TournamentStats,
}

impl MatchResults {
    pub fn get(&self, slot: Slot) -> &TournamentStats {
        match slot {
            Slot::A => &self.a,
            Slot::B => &self.b,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Slot, &TournamentStats)> {
        Slot::ALL.into_iter().map(move |slot| (slot, self.get(slot)))
    }

    /// Slot with the higher average return; `None` on a tie or a non-comparable value.
    pub fn leader(&self) -> Option<Slot> {
        match self.a.avg_return.partial_cmp(&self.b.avg_return)? {
            Ordering::Greater => Some(Slot::A),
            Ordering::Less => Some(Slot::B),
            Ordering::Equal => None,
        }
    }
}
