use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad card category tracked by the simulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CardCategory {
    Land,
    NonLand,
}

/// A single card in a simulated deck.
///
/// Only the land/non-land split and the combo flag matter; cards have no
/// identity beyond their position in a shuffled deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "card_type", rename_all = "kebab-case")]
pub enum Card {
    Land,
    NonLand {
        #[serde(default)]
        combo: bool,
    },
}

impl Card {
    pub const fn land() -> Self {
        Card::Land
    }

    pub const fn spell() -> Self {
        Card::NonLand { combo: false }
    }

    pub const fn combo_piece() -> Self {
        Card::NonLand { combo: true }
    }

    pub fn category(&self) -> CardCategory {
        match self {
            Card::Land => CardCategory::Land,
            Card::NonLand { .. } => CardCategory::NonLand,
        }
    }

    pub fn is_land(&self) -> bool {
        matches!(self, Card::Land)
    }

    /// Lands are never combo pieces
    pub fn is_combo_piece(&self) -> bool {
        matches!(self, Card::NonLand { combo: true })
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Card::Land => write!(f, "land"),
            Card::NonLand { combo: false } => write!(f, "non-land"),
            Card::NonLand { combo: true } => write!(f, "non-land (combo)"),
        }
    }
}
