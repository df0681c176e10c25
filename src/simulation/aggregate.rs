//! Reduction of trial outcomes into scenario statistics.
//!
//! Only integer sums and counts are accumulated, so the final statistics do
//! not depend on the order outcomes arrive in.

use crate::simulation::trial::TrialOutcome;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Condvar, Mutex, MutexGuard};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AggregateError {
    #[error("cannot compute results before any trial was recorded")]
    NoAttempts,
}

/// Summary statistics of a finished scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Results {
    pub attempts: u64,
    pub opening_hand_wins: u64,
    pub average_draws_to_win: f64,
    pub average_opening_hand_win_rate: f64,
    /// Trials that reached the combo before the deck ran out
    pub combos_assembled: u64,
    pub max_draws_to_win: usize,
    /// draws_to_win -> trials, over trials that assembled the combo
    pub draw_distribution: BTreeMap<usize, u64>,
}

#[derive(Debug, Default)]
struct Totals {
    attempts: u64,
    opening_hand_wins: u64,
    combos_assembled: u64,
    draws_sum: u64,
    max_draws: usize,
    distribution: BTreeMap<usize, u64>,
    closed: bool,
}

impl Totals {
    fn add(&mut self, outcome: &TrialOutcome) {
        self.attempts += 1;
        if outcome.opening_hand_win {
            self.opening_hand_wins += 1;
        }
        if outcome.combo_assembled {
            self.combos_assembled += 1;
            *self.distribution.entry(outcome.draws_to_win).or_insert(0) += 1;
        }
        self.draws_sum += outcome.draws_to_win as u64;
        self.max_draws = self.max_draws.max(outcome.draws_to_win);
    }
}

/// Running totals shared between the outcome consumer and the orchestrator.
///
/// `wait_for` is released by `record`, after the outcome has been added to
/// the totals, never when it is merely queued. `close` releases it early
/// when the consumer stops.
#[derive(Debug, Default)]
pub struct Aggregator {
    totals: Mutex<Totals>,
    recorded: Condvar,
}

impl Aggregator {
    pub fn new() -> Self {
        Aggregator::default()
    }

    fn lock(&self) -> MutexGuard<'_, Totals> {
        // Totals are updated in a single non-panicking step, so a poisoned
        // lock still guards consistent data.
        self.totals.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn record(&self, outcome: TrialOutcome) {
        self.lock().add(&outcome);
        self.recorded.notify_all();
    }

    /// Outcomes recorded so far
    pub fn attempts(&self) -> u64 {
        self.lock().attempts
    }

    /// Mark that no more outcomes will be recorded
    pub fn close(&self) {
        self.lock().closed = true;
        self.recorded.notify_all();
    }

    /// Block until `expected` outcomes have been recorded or the aggregator
    /// is closed. Returns the number recorded.
    pub fn wait_for(&self, expected: u64) -> u64 {
        let mut totals = self.lock();
        while totals.attempts < expected && !totals.closed {
            totals = self
                .recorded
                .wait(totals)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
        totals.attempts
    }

    pub fn compute_results(&self) -> Result<Results, AggregateError> {
        let totals = self.lock();
        if totals.attempts == 0 {
            return Err(AggregateError::NoAttempts);
        }
        let attempts = totals.attempts as f64;
        Ok(Results {
            attempts: totals.attempts,
            opening_hand_wins: totals.opening_hand_wins,
            average_draws_to_win: totals.draws_sum as f64 / attempts,
            average_opening_hand_win_rate: totals.opening_hand_wins as f64 / attempts,
            combos_assembled: totals.combos_assembled,
            max_draws_to_win: totals.max_draws,
            draw_distribution: totals.distribution.clone(),
        })
    }
}

impl Extend<TrialOutcome> for Aggregator {
    fn extend<I: IntoIterator<Item = TrialOutcome>>(&mut self, iter: I) {
        let totals = self.totals.get_mut().unwrap_or_else(|poisoned| poisoned.into_inner());
        for outcome in iter {
            totals.add(&outcome);
        }
    }
}
