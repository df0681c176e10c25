use crate::card::Card;
use crate::simulation::hand::Hand;
use serde::{Deserialize, Serialize};

/// Result of a single trial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialOutcome {
    /// Draws taken after the opening hand before the combo was assembled.
    /// Equals the number of cards drawn when the pile ran out first.
    pub draws_to_win: usize,
    /// Combo was already in the opening hand
    pub opening_hand_win: bool,
    /// False only when the draw pile ran out short of the combo
    pub combo_assembled: bool,
}

impl TrialOutcome {
    pub fn opening_hand() -> Self {
        TrialOutcome {
            draws_to_win: 0,
            opening_hand_win: true,
            combo_assembled: true,
        }
    }

    pub fn won_after(draws: usize) -> Self {
        TrialOutcome {
            draws_to_win: draws,
            opening_hand_win: false,
            combo_assembled: true,
        }
    }

    pub fn exhausted_after(draws: usize) -> Self {
        TrialOutcome {
            draws_to_win: draws,
            opening_hand_win: false,
            combo_assembled: false,
        }
    }
}

/// Deal `hand_size` cards, then draw one at a time until the hand holds
/// `required_combo_count` combo pieces or the deck is empty.
///
/// The deck is consumed. `hand_size` is clamped to the deck length; scenario
/// parameters are validated once up front, not here.
pub fn run_trial(mut deck: Vec<Card>, hand_size: usize, required_combo_count: usize) -> TrialOutcome {
    let opening = hand_size.min(deck.len());
    // `deck` keeps the opening hand, `pile` the rest in shuffled order
    let pile = deck.split_off(opening);

    let mut hand = Hand::with_capacity(opening + pile.len());
    for card in deck {
        hand.add_card(card);
    }
    if hand.has_combo(required_combo_count) {
        return TrialOutcome::opening_hand();
    }

    let mut draws = 0;
    for card in pile {
        draws += 1;
        hand.add_card(card);
        if hand.has_combo(required_combo_count) {
            return TrialOutcome::won_after(draws);
        }
    }

    TrialOutcome::exhausted_after(draws)
}
