//! Runs many independent trials on a bounded worker pool and reduces their
//! outcomes into [`Results`].
//!
//! Workers push outcomes through a bounded channel to a single consumer
//! thread, which is the only writer of the [`Aggregator`]. A full channel
//! blocks the sending worker; outcomes are never dropped.

use crate::config::{ConfigError, ScenarioConfig};
use crate::rng::{random_seed, TrialRng};
use crate::simulation::aggregate::{AggregateError, Aggregator, Results};
use crate::simulation::deck::shuffled_deck;
use crate::simulation::trial::{run_trial, TrialOutcome};
use log::{debug, info, warn};
use rayon::{ThreadPoolBuildError, ThreadPoolBuilder};
use std::ops::Range;
use std::sync::mpsc::{self, SyncSender};
use std::thread;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("invalid scenario: {0}")]
    Config(#[from] ConfigError),
    #[error("aggregation failed: {0}")]
    Aggregate(#[from] AggregateError),
    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] ThreadPoolBuildError),
    #[error("only {recorded} of {expected} trials were recorded")]
    Incomplete { expected: u64, recorded: u64 },
}

/// Run `config.num_trials` trials and return their summary statistics
pub fn run_scenario(config: &ScenarioConfig) -> Result<Results, ScenarioError> {
    run_scenario_with_progress(config, |_| {})
}

/// Like [`run_scenario`], calling `on_outcome` on the consumer thread for
/// every outcome as it is recorded.
pub fn run_scenario_with_progress<F>(
    config: &ScenarioConfig,
    on_outcome: F,
) -> Result<Results, ScenarioError>
where
    F: Fn(&TrialOutcome) + Sync,
{
    config.validate()?;

    let base_seed = config.seed.unwrap_or_else(random_seed);
    let workers = worker_count(config);
    let pool = ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("trial-worker-{}", i))
        .build()?;

    info!(
        "running {} trials on {} workers (seed {}, deck {}/{} lands/{} combo, hand {}, need {})",
        config.num_trials,
        workers,
        base_seed,
        config.deck.total_cards,
        config.deck.num_lands,
        config.deck.num_combo_pieces,
        config.hand_size,
        config.required_combo_count,
    );

    let expected = config.num_trials as u64;
    let aggregator = Aggregator::new();
    let (sender, receiver) = mpsc::sync_channel::<TrialOutcome>(config.channel_capacity);

    let recorded = thread::scope(|scope| {
        let aggregator = &aggregator;
        let on_outcome = &on_outcome;
        let consumer = scope.spawn(move || {
            let _close = CloseOnDrop(aggregator);
            for outcome in receiver {
                on_outcome(&outcome);
                aggregator.record(outcome);
            }
        });

        let assignments: Vec<_> = trial_ranges(config.num_trials, workers)
            .into_iter()
            .map(|range| (range, sender.clone()))
            .collect();
        drop(sender);

        pool.scope(move |workers_scope| {
            for (worker, (range, sender)) in assignments.into_iter().enumerate() {
                workers_scope.spawn(move |_| run_worker(worker, range, config, base_seed, &sender));
            }
        });

        let recorded = aggregator.wait_for(expected);
        if let Err(panic) = consumer.join() {
            std::panic::resume_unwind(panic);
        }
        recorded
    });

    if recorded != expected {
        return Err(ScenarioError::Incomplete { expected, recorded });
    }

    let results = aggregator.compute_results()?;
    info!(
        "scenario complete: {} attempts, {:.4} avg draws, {:.4} opening hand win rate",
        results.attempts, results.average_draws_to_win, results.average_opening_hand_win_rate,
    );
    Ok(results)
}

/// Closes the aggregator when the consumer exits, including by panic
struct CloseOnDrop<'a>(&'a Aggregator);

impl Drop for CloseOnDrop<'_> {
    fn drop(&mut self) {
        self.0.close();
    }
}

fn run_worker(
    worker: usize,
    trials: Range<usize>,
    config: &ScenarioConfig,
    base_seed: u64,
    sender: &SyncSender<TrialOutcome>,
) {
    debug!("worker {} running trials {:?}", worker, trials);
    for trial in trials {
        let mut rng = TrialRng::for_trial(base_seed, trial as u64);
        let deck = shuffled_deck(&config.deck, &mut rng);
        let outcome = run_trial(deck, config.hand_size, config.required_combo_count);
        if sender.send(outcome).is_err() {
            warn!("worker {} stopping at trial {}: outcome consumer is gone", worker, trial);
            return;
        }
    }
}

/// Configured worker count, or available parallelism, capped at the trial count
pub fn worker_count(config: &ScenarioConfig) -> usize {
    let requested = config.workers.unwrap_or_else(|| {
        thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    });
    requested.min(config.num_trials).max(1)
}

/// Split `0..num_trials` into `workers` contiguous ranges differing in length by at most one
fn trial_ranges(num_trials: usize, workers: usize) -> Vec<Range<usize>> {
    let base = num_trials / workers;
    let extra = num_trials % workers;
    let mut start = 0;
    (0..workers)
        .map(|w| {
            let len = base + usize::from(w < extra);
            let range = start..start + len;
            start += len;
            range
        })
        .collect()
}
