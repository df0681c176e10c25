use crate::card::Card;
use crate::config::ConfigError;
use crate::rng::TrialRng;
use serde::{Deserialize, Serialize};

/// Fixed composition of a simulated deck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckConfig {
    pub total_cards: usize,
    pub num_lands: usize,
    pub num_combo_pieces: usize,
}

impl Default for DeckConfig {
    /// 99-card singleton deck with 37 lands and 4 combo pieces
    fn default() -> Self {
        DeckConfig {
            total_cards: 99,
            num_lands: 37,
            num_combo_pieces: 4,
        }
    }
}

impl DeckConfig {
    pub fn new(total_cards: usize, num_lands: usize, num_combo_pieces: usize) -> Self {
        DeckConfig {
            total_cards,
            num_lands,
            num_combo_pieces,
        }
    }

    /// Every card that is not a land. Saturates for invalid configs.
    pub fn num_non_lands(&self) -> usize {
        self.total_cards.saturating_sub(self.num_lands)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_cards == 0 {
            return Err(ConfigError::EmptyDeck);
        }
        if self.num_lands > self.total_cards {
            return Err(ConfigError::TooManyLands {
                lands: self.num_lands,
                total: self.total_cards,
            });
        }
        if self.num_combo_pieces > self.num_non_lands() {
            return Err(ConfigError::TooManyComboPieces {
                combo_pieces: self.num_combo_pieces,
                non_lands: self.num_non_lands(),
            });
        }
        Ok(())
    }
}

/// Lay out the deck in category order: lands, plain non-lands, combo pieces
fn unshuffled_deck(config: &DeckConfig) -> Vec<Card> {
    let plain = config.num_non_lands() - config.num_combo_pieces;
    let mut deck = Vec::with_capacity(config.total_cards);
    deck.extend(std::iter::repeat(Card::land()).take(config.num_lands));
    deck.extend(std::iter::repeat(Card::spell()).take(plain));
    deck.extend(std::iter::repeat(Card::combo_piece()).take(config.num_combo_pieces));
    deck
}

/// Build a deck matching `config` and shuffle it with the trial's generator
pub fn build_deck(config: &DeckConfig, rng: &mut TrialRng) -> Result<Vec<Card>, ConfigError> {
    config.validate()?;
    Ok(shuffled_deck(config, rng))
}

/// `build_deck` for a config that has already been validated
pub(crate) fn shuffled_deck(config: &DeckConfig, rng: &mut TrialRng) -> Vec<Card> {
    let mut deck = unshuffled_deck(config);
    rng.shuffle(&mut deck);
    deck
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_lands(deck: &[Card]) -> usize {
        deck.iter().filter(|c| c.is_land()).count()
    }

    fn count_combo(deck: &[Card]) -> usize {
        deck.iter().filter(|c| c.is_combo_piece()).count()
    }

    #[test]
    fn test_composition_invariant() {
        let configs = [
            DeckConfig::default(),
            DeckConfig::new(60, 24, 8),
            DeckConfig::new(40, 0, 40),
            DeckConfig::new(10, 10, 0),
            DeckConfig::new(1, 0, 1),
        ];

        for (seed, config) in configs.iter().enumerate() {
            let mut rng = TrialRng::new(Some(seed as u64));
            let deck = build_deck(config, &mut rng).expect("valid config");

            assert_eq!(deck.len(), config.total_cards);
            assert_eq!(count_lands(&deck), config.num_lands);
            assert_eq!(count_combo(&deck), config.num_combo_pieces);
            assert!(deck.iter().filter(|c| c.is_combo_piece()).all(|c| !c.is_land()));
        }
    }

    #[test]
    fn test_too_many_combo_pieces_rejected() {
        let mut rng = TrialRng::new(Some(1));
        let err = build_deck(&DeckConfig::new(10, 8, 3), &mut rng).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::TooManyComboPieces {
                combo_pieces: 3,
                non_lands: 2
            }
        ));
    }

    #[test]
    fn test_too_many_lands_rejected() {
        let result = DeckConfig::new(10, 11, 0).validate();
        assert!(matches!(result, Err(ConfigError::TooManyLands { lands: 11, total: 10 })));
    }

    #[test]
    fn test_empty_deck_rejected() {
        assert!(matches!(DeckConfig::new(0, 0, 0).validate(), Err(ConfigError::EmptyDeck)));
    }

    #[test]
    fn test_shuffle_changes_order() {
        let config = DeckConfig::default();
        let mut rng = TrialRng::new(Some(2024));
        let shuffled = build_deck(&config, &mut rng).expect("valid config");
        assert_ne!(shuffled, unshuffled_deck(&config));
    }

    /// Chi-square test of where the single combo piece lands across many shuffles.
    #[test]
    fn test_shuffle_uniformity() {
        let config = DeckConfig::new(20, 10, 1);
        let trials = 40_000;
        let mut position_counts = vec![0usize; config.total_cards];

        for trial in 0..trials {
            let mut rng = TrialRng::for_trial(77, trial as u64);
            let deck = build_deck(&config, &mut rng).expect("valid config");
            let pos = deck
                .iter()
                .position(|c| c.is_combo_piece())
                .expect("deck holds one combo piece");
            position_counts[pos] += 1;
        }

        let expected = trials as f64 / config.total_cards as f64;
        let chi_square: f64 = position_counts
            .iter()
            .map(|&observed| {
                let diff = observed as f64 - expected;
                diff * diff / expected
            })
            .sum();

        // 19 degrees of freedom, p = 0.001 critical value is 43.82
        assert!(chi_square < 43.82, "chi-square too large: {:.2}", chi_square);
    }
}
