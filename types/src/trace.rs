//! Rebuild the table from a hand trace.
//!
//! The service never sends board state. Each side's cards are recovered by walking the trace in
//! order and keeping every step that carries a card: player steps feed the player's hand, while
//! `DEALER` and `SYSTEM` steps both feed the dealer's hand. A dealer-side `DEAL` or `DRAW` without
//! a card is a face-down card; any other card-less step (decisions, stands, bookkeeping) is skipped.

use crate::api::{Actor, Step};
use crate::cards::Card;
use serde::Serialize;

/// Actions that put a card on the table.
const CARD_ACTIONS: [&str; 2] = ["DEAL", "DRAW"];

/// Per-side card sequences derived from a trace. Rebuilt for every hand.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReconstructedTable {
    pub player_cards: Vec<Card>,
    /// Revealed dealer-side cards.
    pub dealer_cards: Vec<Card>,
    /// Dealer-side cards in trace order; `None` is a card dealt face down.
    pub dealer_row: Vec<Option<Card>>,
    pub hidden_dealer_cards: usize,
    /// Player total as of the last step.
    pub player_total: Option<i32>,
    /// Dealer total as of the last step.
    pub dealer_total: Option<i32>,
}

impl ReconstructedTable {
    pub fn is_empty(&self) -> bool {
        self.player_cards.is_empty() && self.dealer_row.is_empty()
    }
}

fn deals_a_card(step: &Step) -> bool {
    CARD_ACTIONS
        .iter()
        .any(|action| step.action.eq_ignore_ascii_case(action))
}

/// Reconstruct both hands from an ordered trace. Never fails; an empty trace yields an empty table.
pub fn reconstruct(steps: &[Step]) -> ReconstructedTable {
    let mut table = ReconstructedTable::default();
    for step in steps {
        match (&step.actor, &step.card) {
            (Actor::Player, Some(card)) => table.player_cards.push(card.clone()),
            (Actor::Dealer | Actor::System, Some(card)) => {
                table.dealer_cards.push(card.clone());
                table.dealer_row.push(Some(card.clone()));
            }
            (Actor::Dealer | Actor::System, None) if deals_a_card(step) => {
                table.hidden_dealer_cards += 1;
                table.dealer_row.push(None);
            }
            (Actor::Player | Actor::Dealer | Actor::System, None) | (Actor::Unknown(_), _) => {}
        }
    }
    if let Some(last) = steps.last() {
        table.player_total = Some(last.player_total);
        table.dealer_total = Some(last.dealer_total);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardRank;
    use proptest::prelude::*;

    fn step(actor: Actor, action: &str, card: Option<u8>, player_total: i32, dealer_total: i32) -> Step {
        Step {
            actor,
            action: action.to_string(),
            card: card.map(|v| match CardRank::new(v) {
                Some(rank) => Card::Rank(rank),
                None => Card::Unknown(v.to_string()),
            }),
            player_total,
            dealer_total,
            note: None,
        }
    }

    fn ranks(cards: &[Card]) -> Vec<u8> {
        cards.iter().map(|c| c.rank().map_or(0, CardRank::value)).collect()
    }

    #[test]
    fn test_empty_trace() {
        let table = reconstruct(&[]);
        assert!(table.is_empty());
        assert_eq!(table.player_total, None);
        assert_eq!(table.hidden_dealer_cards, 0);
    }

    #[test]
    fn test_partition_preserves_order() {
        let steps = vec![
            step(Actor::Player, "DEAL", Some(10), 10, 0),
            step(Actor::Dealer, "DEAL", Some(6), 10, 6),
            step(Actor::Player, "DEAL", Some(7), 17, 6),
            step(Actor::Dealer, "DEAL", Some(10), 17, 16),
            step(Actor::Player, "STAND", None, 17, 16),
            step(Actor::System, "DRAW", Some(1), 17, 17),
        ];
        let table = reconstruct(&steps);
        assert_eq!(ranks(&table.player_cards), vec![10, 7]);
        assert_eq!(ranks(&table.dealer_cards), vec![6, 10, 1]);
        assert_eq!(table.hidden_dealer_cards, 0);
        assert_eq!(table.player_total, Some(17));
        assert_eq!(table.dealer_total, Some(17));
    }

    #[test]
    fn test_hidden_hole_card_is_not_a_card() {
        let steps = vec![
            step(Actor::Dealer, "DEAL", Some(9), 0, 9),
            step(Actor::Dealer, "DEAL", None, 0, 19),
        ];
        let table = reconstruct(&steps);
        assert_eq!(ranks(&table.dealer_cards), vec![9]);
        assert_eq!(table.hidden_dealer_cards, 1);
        assert_eq!(table.dealer_row.len(), 2);
    }

    #[test]
    fn test_cardless_dealer_steps_are_not_hidden_cards() {
        let steps = vec![
            step(Actor::Dealer, "DEAL", Some(6), 0, 6),
            step(Actor::Dealer, "DEAL", Some(10), 0, 16),
            step(Actor::Dealer, "STAND", None, 0, 16),
            step(Actor::System, "SETTLE", None, 0, 16),
        ];
        let table = reconstruct(&steps);
        assert_eq!(ranks(&table.dealer_cards), vec![6, 10]);
        assert_eq!(table.hidden_dealer_cards, 0);
        assert_eq!(table.dealer_row.len(), 2);
    }

    #[test]
    fn test_face_down_card_keeps_its_place() {
        let steps = vec![
            step(Actor::Dealer, "DEAL", Some(6), 0, 6),
            step(Actor::Dealer, "DEAL", None, 0, 6),
            step(Actor::Dealer, "DRAW", Some(5), 0, 11),
        ];
        let table = reconstruct(&steps);
        let row: Vec<Option<u8>> = table
            .dealer_row
            .iter()
            .map(|card| card.as_ref().and_then(Card::rank).map(CardRank::value))
            .collect();
        assert_eq!(row, vec![Some(6), None, Some(5)]);
    }

    #[test]
    fn test_unknown_actor_contributes_no_card() {
        let steps = vec![
            step(Actor::Unknown("OBSERVER".into()), "DEAL", Some(4), 0, 0),
            step(Actor::Player, "DEAL", Some(9), 9, 0),
        ];
        let table = reconstruct(&steps);
        assert_eq!(ranks(&table.player_cards), vec![9]);
        assert!(table.dealer_row.is_empty());
        assert_eq!(table.player_total, Some(9));
    }

    #[test]
    fn test_unknown_code_kept_as_placeholder() {
        let steps = vec![step(Actor::Player, "DEAL", Some(13), 0, 0)];
        let table = reconstruct(&steps);
        assert_eq!(table.player_cards, vec![Card::Unknown("13".into())]);
    }

    fn arb_step() -> impl Strategy<Value = Step> {
        (
            prop_oneof![Just(Actor::Player), Just(Actor::Dealer), Just(Actor::System)],
            proptest::option::of(0u8..=14),
        )
            .prop_map(|(actor, card)| step(actor, "DRAW", card, 0, 0))
    }

    proptest! {
        #[test]
        fn prop_card_counts_match_trace(steps in proptest::collection::vec(arb_step(), 0..40)) {
            let table = reconstruct(&steps);
            let player = steps.iter().filter(|s| s.actor == Actor::Player && s.card.is_some()).count();
            let dealer = steps.iter().filter(|s| s.actor.is_dealer_side() && s.card.is_some()).count();
            prop_assert_eq!(table.player_cards.len(), player);
            prop_assert_eq!(table.dealer_cards.len(), dealer);
            prop_assert_eq!(table.dealer_row.len(), dealer + table.hidden_dealer_cards);
        }
    }
}
