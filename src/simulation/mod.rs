pub mod aggregate;
pub mod deck;
pub mod hand;
pub mod odds;
pub mod scenario;
pub mod trial;

pub use aggregate::{AggregateError, Aggregator, Results};
pub use deck::{build_deck, DeckConfig};
pub use hand::Hand;
pub use scenario::{run_scenario, run_scenario_with_progress, ScenarioError};
pub use trial::{run_trial, TrialOutcome};
