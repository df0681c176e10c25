use crate::card::Card;

/// Cards drawn so far in one trial, in draw order
#[derive(Debug, Clone, Default)]
pub struct Hand {
    cards: Vec<Card>,
    combo_count: usize,
}

impl Hand {
    pub fn new() -> Self {
        Hand::default()
    }

    pub fn with_capacity(cap: usize) -> Self {
        Hand {
            cards: Vec::with_capacity(cap),
            combo_count: 0,
        }
    }

    pub fn add_card(&mut self, card: Card) {
        if card.is_combo_piece() {
            self.combo_count += 1;
        }
        self.cards.push(card);
    }

    pub fn size(&self) -> usize {
        self.cards.len()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn combo_count(&self) -> usize {
        self.combo_count
    }

    pub fn land_count(&self) -> usize {
        self.cards.iter().filter(|c| c.is_land()).count()
    }

    pub fn has_combo(&self, required: usize) -> bool {
        self.combo_count >= required
    }
}

impl FromIterator<Card> for Hand {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        let mut hand = Hand::new();
        for card in iter {
            hand.add_card(card);
        }
        hand
    }
}
