//! Exact odds of holding the combo, used as a reference for the simulator.

use crate::config::ConfigError;
use crate::simulation::deck::DeckConfig;

fn ln_choose(n: usize, k: usize) -> f64 {
    (0..k)
        .map(|i| ((n - i) as f64).ln() - ((i + 1) as f64).ln())
        .sum()
}

/// P(X = x) for X ~ Hypergeometric(population, successes, sample)
fn hypergeometric_pmf(population: usize, successes: usize, sample: usize, x: usize) -> f64 {
    if x > successes || x > sample || sample - x > population - successes {
        return 0.0;
    }
    (ln_choose(successes, x) + ln_choose(population - successes, sample - x)
        - ln_choose(population, sample))
    .exp()
}

/// Probability that the first `cards_seen` cards of a shuffled deck contain
/// at least `required` combo pieces
pub fn combo_probability(
    deck: &DeckConfig,
    cards_seen: usize,
    required: usize,
) -> Result<f64, ConfigError> {
    deck.validate()?;
    if cards_seen > deck.total_cards {
        return Err(ConfigError::HandTooLarge {
            hand_size: cards_seen,
            total: deck.total_cards,
        });
    }
    let max_hits = deck.num_combo_pieces.min(cards_seen);
    if required > max_hits {
        return Ok(0.0);
    }
    let p: f64 = (required..=max_hits)
        .map(|x| hypergeometric_pmf(deck.total_cards, deck.num_combo_pieces, cards_seen, x))
        .sum();
    Ok(p.clamp(0.0, 1.0))
}

/// Probability the opening hand already holds the combo
pub fn opening_hand_win_probability(
    deck: &DeckConfig,
    hand_size: usize,
    required: usize,
) -> Result<f64, ConfigError> {
    combo_probability(deck, hand_size, required)
}

/// Probability the combo is assembled by each draw step, starting at the
/// opening hand (index 0) and ending with the whole deck seen
pub fn cumulative_by_draw(
    deck: &DeckConfig,
    hand_size: usize,
    required: usize,
) -> Result<Vec<f64>, ConfigError> {
    (hand_size..=deck.total_cards.max(hand_size))
        .map(|seen| combo_probability(deck, seen, required))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_ln_choose_small_values() {
        assert!(close(ln_choose(5, 2).exp(), 10.0));
        assert!(close(ln_choose(7, 0).exp(), 1.0));
        assert!(close(ln_choose(99, 7).exp().round(), 14_887_031_544.0));
    }

    #[test]
    fn test_opening_hand_known_value() {
        // 99 cards, 4 combo pieces, 7-card hand, need 2:
        // 1 - P(0) - P(1) with P(0) = C(95,7)/C(99,7), P(1) = 4*C(95,6)/C(99,7)
        let deck = DeckConfig::default();
        let c99_7 = 14_887_031_544.0;
        let p0 = 11_050_084_695.0 / c99_7;
        let p1 = 4.0 * 869_107_785.0 / c99_7;
        let p = opening_hand_win_probability(&deck, 7, 2).expect("valid deck");
        assert!((p - (1.0 - p0 - p1)).abs() < 1e-9, "got {}", p);
    }

    #[test]
    fn test_edges() {
        let deck = DeckConfig::new(10, 4, 3);
        assert!(close(combo_probability(&deck, 10, 3).expect("valid"), 1.0));
        assert!(close(combo_probability(&deck, 0, 1).expect("valid"), 0.0));
        assert!(close(combo_probability(&deck, 2, 3).expect("valid"), 0.0));
        assert!(combo_probability(&deck, 11, 1).is_err());
    }

    #[test]
    fn test_cumulative_is_monotonic_and_ends_at_one() {
        let deck = DeckConfig::new(60, 24, 4);
        let curve = cumulative_by_draw(&deck, 7, 2).expect("valid deck");
        assert_eq!(curve.len(), 60 - 7 + 1);
        assert!(curve.windows(2).all(|w| w[1] + 1e-12 >= w[0]));
        assert!(close(*curve.last().expect("non-empty"), 1.0));
    }
}
