use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use combo_sim::config::{ConfigError, ScenarioConfig};
use combo_sim::rng::random_seed;
use combo_sim::simulation::odds::{cumulative_by_draw, opening_hand_win_probability};
use combo_sim::simulation::scenario::{run_scenario, run_scenario_with_progress, worker_count};
use combo_sim::simulation::Results;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "combo-sim")]
#[command(about = "Monte Carlo estimate of how fast a deck draws into its combo", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario of many trials (default)
    Run {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Write results and config as JSON to this path
        #[arg(long)]
        json: Option<String>,

        /// Hide the progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Print the exact odds of assembling the combo by each draw
    Odds {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Number of draws after the opening hand to show
        #[arg(long, default_value = "10")]
        draws: usize,
    },

    /// Run the scenario once for each combo piece count in a range
    Sweep {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Smallest combo piece count
        #[arg(long)]
        from: usize,

        /// Largest combo piece count
        #[arg(long)]
        to: usize,
    },
}

/// Scenario settings. A JSON config file is read first, flags override it.
#[derive(Args, Default)]
struct ScenarioArgs {
    /// JSON scenario file
    #[arg(short, long)]
    config: Option<String>,

    /// Number of trials to simulate
    #[arg(short, long)]
    num_trials: Option<usize>,

    /// Cards in the deck
    #[arg(long)]
    total_cards: Option<usize>,

    /// Lands in the deck
    #[arg(long)]
    lands: Option<usize>,

    /// Combo pieces among the non-lands
    #[arg(long)]
    combo_pieces: Option<usize>,

    /// Opening hand size
    #[arg(long)]
    hand_size: Option<usize>,

    /// Combo pieces needed in hand to win
    #[arg(short, long)]
    required: Option<usize>,

    /// Seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,

    /// Worker threads
    #[arg(short, long)]
    workers: Option<usize>,

    /// Capacity of the outcome channel
    #[arg(long)]
    channel_capacity: Option<usize>,
}

impl ScenarioArgs {
    fn into_config(self) -> Result<ScenarioConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => ScenarioConfig::from_file(path)?,
            None => ScenarioConfig::default(),
        };
        if let Some(n) = self.num_trials {
            config.num_trials = n;
        }
        if let Some(n) = self.total_cards {
            config.deck.total_cards = n;
        }
        if let Some(n) = self.lands {
            config.deck.num_lands = n;
        }
        if let Some(n) = self.combo_pieces {
            config.deck.num_combo_pieces = n;
        }
        if let Some(n) = self.hand_size {
            config.hand_size = n;
        }
        if let Some(n) = self.required {
            config.required_combo_count = n;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.workers.is_some() {
            config.workers = self.workers;
        }
        if let Some(n) = self.channel_capacity {
            config.channel_capacity = n;
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Serialize)]
struct Report<'a> {
    generated_at: String,
    config: &'a ScenarioConfig,
    results: &'a Results,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let outcome = match cli.command {
        Some(Commands::Run {
            scenario,
            json,
            quiet,
        }) => run(scenario, json.as_deref(), quiet),
        Some(Commands::Odds { scenario, draws }) => odds(scenario, draws),
        Some(Commands::Sweep { scenario, from, to }) => sweep(scenario, from, to),
        None => run(ScenarioArgs::default(), None, false),
    };

    if let Err(message) = outcome {
        eprintln!("✗ {}", message);
        std::process::exit(1);
    }
}

fn load_config(args: ScenarioArgs) -> Result<ScenarioConfig, String> {
    let mut config = args
        .into_config()
        .map_err(|e| format!("Invalid scenario: {}", e))?;
    config.seed.get_or_insert_with(random_seed);
    Ok(config)
}

fn progress_bar(len: usize, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let style = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} trials ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    ProgressBar::new(len as u64).with_style(style)
}

fn run(args: ScenarioArgs, json: Option<&str>, quiet: bool) -> Result<(), String> {
    let config = load_config(args)?;

    println!("\n=== Combo Draw Simulator ===\n");
    print_scenario(&config);
    println!();

    let start = std::time::Instant::now();
    let bar = progress_bar(config.num_trials, quiet);
    let results = run_scenario_with_progress(&config, |_| bar.inc(1))
        .map_err(|e| format!("Scenario failed: {}", e))?;
    bar.finish_and_clear();
    let elapsed = start.elapsed();

    print_results(&results);

    println!();
    println!(
        "Simulation completed in {:.2?} ({:.0} trials/sec)",
        elapsed,
        config.num_trials as f64 / elapsed.as_secs_f64()
    );

    if let Some(path) = json {
        write_report(path, &config, &results)?;
        println!("Report written to: {}", path);
    }
    Ok(())
}

fn print_scenario(config: &ScenarioConfig) {
    let deck = &config.deck;
    println!(
        "Deck: {} cards ({} lands, {} non-lands, {} combo pieces)",
        deck.total_cards,
        deck.num_lands,
        deck.num_non_lands(),
        deck.num_combo_pieces
    );
    println!(
        "Win: {} combo pieces, opening hand of {}",
        config.required_combo_count, config.hand_size
    );
    println!("Trials: {} on {} workers", config.num_trials, worker_count(config));
    if let Some(seed) = config.seed {
        println!("Seed: {}", seed);
    }
}

fn print_results(results: &Results) {
    println!("=== Results ===\n");
    println!("Attempts: {}", results.attempts);
    println!(
        "Opening hand wins: {:.2}% ({}/{})",
        results.average_opening_hand_win_rate * 100.0,
        results.opening_hand_wins,
        results.attempts
    );
    println!("Average draws to win: {:.2}", results.average_draws_to_win);
    println!("Most draws needed: {}", results.max_draws_to_win);
    println!();

    println!("Draw distribution:");
    for (draws, count) in &results.draw_distribution {
        let pct = *count as f64 / results.attempts as f64 * 100.0;
        let bar = "█".repeat((pct / 2.0) as usize);
        println!("  Draw {:3}: {:5.1}% {} ({})", draws, pct, bar, count);
    }

    let exhausted = results.attempts - results.combos_assembled;
    if exhausted > 0 {
        let pct = exhausted as f64 / results.attempts as f64 * 100.0;
        println!("  Never:    {:5.1}% ({})", pct, exhausted);
    }
}

fn write_report(path: &str, config: &ScenarioConfig, results: &Results) -> Result<(), String> {
    let report = Report {
        generated_at: Utc::now().to_rfc3339(),
        config,
        results,
    };
    let json = serde_json::to_string_pretty(&report)
        .map_err(|e| format!("Failed to serialize report: {}", e))?;
    std::fs::write(path, json).map_err(|e| format!("Failed to write '{}': {}", path, e))
}

fn odds(args: ScenarioArgs, draws: usize) -> Result<(), String> {
    let config = args
        .into_config()
        .map_err(|e| format!("Invalid scenario: {}", e))?;
    let opening = opening_hand_win_probability(&config.deck, config.hand_size, config.required_combo_count)
        .map_err(|e| format!("Invalid scenario: {}", e))?;
    let curve = cumulative_by_draw(&config.deck, config.hand_size, config.required_combo_count)
        .map_err(|e| format!("Invalid scenario: {}", e))?;

    println!("\n=== Exact Combo Odds ===\n");
    print_scenario(&config);
    println!();
    println!("Opening hand: {:.3}%", opening * 100.0);
    println!();
    println!("Assembled by draw:");
    for (draw, p) in curve.iter().enumerate().take(draws + 1) {
        let bar = "█".repeat((p * 50.0) as usize);
        println!("  Draw {:3}: {:6.2}% {}", draw, p * 100.0, bar);
    }
    Ok(())
}

fn sweep(args: ScenarioArgs, from: usize, to: usize) -> Result<(), String> {
    if from > to {
        return Err(format!("Empty sweep range {}..={}", from, to));
    }
    let mut base = load_config(ScenarioArgs {
        combo_pieces: Some(to),
        ..args
    })?;

    println!("\n=== Combo Piece Sweep ===\n");
    print_scenario(&base);
    println!();
    println!(
        "{:>8} {:>12} {:>14} {:>14}",
        "Pieces", "Avg draws", "Opening (sim)", "Opening (exact)"
    );
    println!("{:-<51}", "");

    let start = std::time::Instant::now();
    for pieces in from..=to {
        base.deck.num_combo_pieces = pieces;
        if pieces < base.required_combo_count {
            println!("{:>8} {:>12}", pieces, "unreachable");
            continue;
        }
        let results = run_scenario(&base)
            .map_err(|e| format!("Scenario with {} pieces failed: {}", pieces, e))?;
        let exact = opening_hand_win_probability(&base.deck, base.hand_size, base.required_combo_count)
            .map_err(|e| format!("Invalid scenario: {}", e))?;
        println!(
            "{:>8} {:>12.2} {:>13.2}% {:>13.2}%",
            pieces,
            results.average_draws_to_win,
            results.average_opening_hand_win_rate * 100.0,
            exact * 100.0
        );
    }

    println!("\nCompleted in {:.2?}", start.elapsed());
    Ok(())
}
