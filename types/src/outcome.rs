//! Outcome banner for a finished hand.

use crate::api::{HandSummary, Payoff};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeCategory {
    Win,
    /// Player went over 21.
    LossBust,
    /// Dealer finished ahead without the player busting.
    LossDealer,
    Push,
}

impl OutcomeCategory {
    pub const ALL: [Self; 4] = [Self::Win, Self::LossBust, Self::LossDealer, Self::Push];

    pub const fn message(self) -> &'static str {
        match self {
            Self::Win => "You win!",
            Self::LossBust => "Bust! You went over 21.",
            Self::LossDealer => "Dealer wins.",
            Self::Push => "Push. It's a tie.",
        }
    }

    /// Visual class used by renderers to pick a colour.
    pub const fn class(self) -> &'static str {
        match self {
            Self::Win => "win",
            Self::LossBust | Self::LossDealer => "loss",
            Self::Push => "push",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct OutcomeResult {
    pub category: OutcomeCategory,
    pub message: &'static str,
}

impl From<OutcomeCategory> for OutcomeResult {
    fn from(category: OutcomeCategory) -> Self {
        Self {
            category,
            message: category.message(),
        }
    }
}

/// Classify a payoff with the bust flags. Total over every input combination.
///
/// A win is a win whatever the flags say. A loss is a bust when the player busted; any other loss
/// (including the contradictory dealer-bust case) is a plain dealer win.
pub const fn classify_flags(payoff: Payoff, player_bust: bool, _dealer_bust: bool) -> OutcomeCategory {
    match (payoff, player_bust) {
        (Payoff::Win, _) => OutcomeCategory::Win,
        (Payoff::Loss, true) => OutcomeCategory::LossBust,
        (Payoff::Loss, false) => OutcomeCategory::LossDealer,
        (Payoff::Push, _) => OutcomeCategory::Push,
    }
}

pub fn classify(payoff: Payoff, summary: &HandSummary) -> OutcomeResult {
    classify_flags(payoff, summary.player_bust, summary.dealer_bust).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYOFFS: [Payoff; 3] = [Payoff::Loss, Payoff::Push, Payoff::Win];

    #[test]
    fn test_win_ignores_bust_flags() {
        for player_bust in [false, true] {
            for dealer_bust in [false, true] {
                assert_eq!(classify_flags(Payoff::Win, player_bust, dealer_bust), OutcomeCategory::Win);
            }
        }
    }

    #[test]
    fn test_loss_categories() {
        assert_eq!(classify_flags(Payoff::Loss, true, false), OutcomeCategory::LossBust);
        assert_eq!(classify_flags(Payoff::Loss, false, false), OutcomeCategory::LossDealer);
        assert_eq!(classify_flags(Payoff::Loss, false, true), OutcomeCategory::LossDealer);
        assert_eq!(classify_flags(Payoff::Loss, true, true), OutcomeCategory::LossBust);
    }

    #[test]
    fn test_push() {
        assert_eq!(classify_flags(Payoff::Push, false, false), OutcomeCategory::Push);
        assert_eq!(classify_flags(Payoff::Push, true, true), OutcomeCategory::Push);
    }

    #[test]
    fn test_total_and_deterministic() {
        for payoff in PAYOFFS {
            for player_bust in [false, true] {
                for dealer_bust in [false, true] {
                    let first = classify_flags(payoff, player_bust, dealer_bust);
                    for _ in 0..3 {
                        assert_eq!(classify_flags(payoff, player_bust, dealer_bust), first);
                    }
                    assert!(OutcomeCategory::ALL.contains(&first));
                }
            }
        }
    }

    #[test]
    fn test_messages_are_distinct() {
        let mut messages: Vec<_> = OutcomeCategory::ALL.iter().map(|c| c.message()).collect();
        messages.sort_unstable();
        messages.dedup();
        assert_eq!(messages.len(), OutcomeCategory::ALL.len());
    }

    #[test]
    fn test_classify_uses_summary_flags() {
        let summary = HandSummary {
            agent: "DealerBot(EV)".into(),
            dealer_upcard: None,
            player_total: 23,
            dealer_total: 10,
            player_bust: true,
            dealer_bust: false,
        };
        let result = classify(Payoff::Loss, &summary);
        assert_eq!(result.category, OutcomeCategory::LossBust);
        assert_eq!(result.message, OutcomeCategory::LossBust.message());
    }
}
