//! Scenario configuration and its validation.

use crate::simulation::deck::DeckConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("deck must contain at least one card")]
    EmptyDeck,
    #[error("{lands} lands do not fit in a {total}-card deck")]
    TooManyLands { lands: usize, total: usize },
    #[error("{combo_pieces} combo pieces exceed the {non_lands} non-land slots")]
    TooManyComboPieces { combo_pieces: usize, non_lands: usize },
    #[error("hand size {hand_size} exceeds deck size {total}")]
    HandTooLarge { hand_size: usize, total: usize },
    #[error("required combo count must be at least 1")]
    ZeroRequiredCombo,
    #[error("required combo count {required} exceeds the {combo_pieces} combo pieces in the deck")]
    UnreachableCombo { required: usize, combo_pieces: usize },
    #[error("scenario must run at least one trial")]
    NoTrials,
    #[error("worker count must be at least 1")]
    NoWorkers,
    #[error("outcome channel capacity must be at least 1")]
    ZeroChannelCapacity,
}

fn default_num_trials() -> usize {
    10_000
}

fn default_hand_size() -> usize {
    7
}

fn default_required_combo_count() -> usize {
    2
}

fn default_channel_capacity() -> usize {
    1024
}

/// Everything needed to run one scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default = "default_num_trials")]
    pub num_trials: usize,
    #[serde(default)]
    pub deck: DeckConfig,
    #[serde(default = "default_hand_size")]
    pub hand_size: usize,
    #[serde(default = "default_required_combo_count")]
    pub required_combo_count: usize,
    /// Base seed; a random one is drawn when absent
    #[serde(default)]
    pub seed: Option<u64>,
    /// Worker threads; defaults to available parallelism
    #[serde(default)]
    pub workers: Option<usize>,
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        ScenarioConfig {
            num_trials: default_num_trials(),
            deck: DeckConfig::default(),
            hand_size: default_hand_size(),
            required_combo_count: default_required_combo_count(),
            seed: None,
            workers: None,
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl ScenarioConfig {
    /// Load a scenario from a JSON file. Missing fields take their defaults.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: ScenarioConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Check every count before a single trial runs
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_trials == 0 {
            return Err(ConfigError::NoTrials);
        }
        self.deck.validate()?;
        if self.hand_size > self.deck.total_cards {
            return Err(ConfigError::HandTooLarge {
                hand_size: self.hand_size,
                total: self.deck.total_cards,
            });
        }
        if self.required_combo_count == 0 {
            return Err(ConfigError::ZeroRequiredCombo);
        }
        if self.required_combo_count > self.deck.num_combo_pieces {
            return Err(ConfigError::UnreachableCombo {
                required: self.required_combo_count,
                combo_pieces: self.deck.num_combo_pieces,
            });
        }
        if self.workers == Some(0) {
            return Err(ConfigError::NoWorkers);
        }
        if self.channel_capacity == 0 {
            return Err(ConfigError::ZeroChannelCapacity);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ScenarioConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.deck.num_non_lands(), 62);
    }

    #[test]
    fn test_zero_combo_pieces_with_requirement_rejected() {
        let config = ScenarioConfig {
            deck: DeckConfig::new(60, 24, 0),
            required_combo_count: 1,
            ..ScenarioConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnreachableCombo {
                required: 1,
                combo_pieces: 0
            })
        ));
    }

    #[test]
    fn test_hand_larger_than_deck_rejected() {
        let config = ScenarioConfig {
            deck: DeckConfig::new(5, 1, 2),
            hand_size: 6,
            ..ScenarioConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::HandTooLarge { .. })));
    }

    #[test]
    fn test_zero_values_rejected() {
        let no_trials = ScenarioConfig {
            num_trials: 0,
            ..ScenarioConfig::default()
        };
        assert!(matches!(no_trials.validate(), Err(ConfigError::NoTrials)));

        let no_required = ScenarioConfig {
            required_combo_count: 0,
            ..ScenarioConfig::default()
        };
        assert!(matches!(no_required.validate(), Err(ConfigError::ZeroRequiredCombo)));

        let no_workers = ScenarioConfig {
            workers: Some(0),
            ..ScenarioConfig::default()
        };
        assert!(matches!(no_workers.validate(), Err(ConfigError::NoWorkers)));

        let no_capacity = ScenarioConfig {
            channel_capacity: 0,
            ..ScenarioConfig::default()
        };
        assert!(matches!(no_capacity.validate(), Err(ConfigError::ZeroChannelCapacity)));
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config: ScenarioConfig = serde_json::from_str(
            r#"{"num_trials": 50, "deck": {"total_cards": 60, "num_lands": 24, "num_combo_pieces": 3}}"#,
        )
        .expect("parse");
        assert_eq!(config.num_trials, 50);
        assert_eq!(config.deck, DeckConfig::new(60, 24, 3));
        assert_eq!(config.hand_size, 7);
        assert_eq!(config.required_combo_count, 2);
        assert_eq!(config.channel_capacity, 1024);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_negative_counts_fail_to_parse() {
        let result: Result<ScenarioConfig, _> = serde_json::from_str(r#"{"hand_size": -1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file() {
        let result = ScenarioConfig::from_file("does-not-exist.json");
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }
}
