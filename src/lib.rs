pub mod card;
pub mod config;
pub mod rng;
pub mod simulation;


pub use config::{ConfigError, ScenarioConfig};
pub use simulation::{run_scenario, Results, ScenarioError};
