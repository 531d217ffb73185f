use std::io::{self, BufRead, Write};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use crate::cards::parse_cards;
use crate::display::{
    board_display, equity_bar, print_error, print_section, profile_table, range_grid, result_table,
};
use crate::equity::{SimulationConfig, Simulator, DEFAULT_MAX_DRAW_ATTEMPTS};
use crate::error::EngineResult;
use crate::hand_evaluator::{classify, hand_label, select_best_five, HandSelection};
use crate::ranges::{profile_for, tables, ALL_CATEGORIES};
use crate::service::{analyze_seeded, handle_json_line, AnalysisRequest, AnalysisResponse};

#[derive(Parser)]
#[command(name = "equity", version = "1.0.0", about = "Monte Carlo poker equity against position-weighted opponent ranges.")]
struct Cli {
    #[command(flatten)]
    engine: EngineArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct EngineArgs {
    /// Seed for reproducible simulations
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// How five cards are picked from seven before scoring
    #[arg(long, global = true, default_value = "truncated")]
    selection: Selection,
    /// Shape draws per opponent before dealing off the top of the deck
    #[arg(long = "max-attempts", global = true, default_value_t = DEFAULT_MAX_DRAW_ATTEMPTS)]
    max_attempts: usize,
    /// Spread iterations over all cores
    #[arg(long, global = true)]
    parallel: bool,
}

impl EngineArgs {
    fn config(&self) -> SimulationConfig {
        SimulationConfig {
            selection: self.selection.into(),
            max_draw_attempts: self.max_attempts,
            parallel: self.parallel,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Selection {
    Truncated,
    Exhaustive,
}

impl From<Selection> for HandSelection {
    fn from(s: Selection) -> HandSelection {
        match s {
            Selection::Truncated => HandSelection::Truncated,
            Selection::Exhaustive => HandSelection::Exhaustive,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate win/lose chances for a hand
    Analyze {
        /// Your hole cards (e.g., AhKd)
        hand: String,
        /// Community cards (e.g., AsKd5c)
        #[arg(short, long)]
        board: Option<String>,
        /// Number of opponents
        #[arg(short, long, default_value = "1")]
        opponents: usize,
        /// Your position (UTG, MP, CO, BTN, SB, BB)
        #[arg(short, long)]
        position: Option<String>,
        /// Number of simulations
        #[arg(short = 'n', long, default_value = "10000")]
        sims: usize,
        /// Print the response JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Classify five or more cards
    Classify {
        /// Cards (e.g., AhKhQhJhTh)
        cards: String,
    },
    /// Show the opponent ranges used for a position
    Ranges {
        /// Your position (UTG, MP, CO, BTN, SB, BB)
        position: String,
    },
    /// Answer JSON requests read line by line from stdin
    Serve,
}

pub fn run() {
    let cli = Cli::parse();
    dispatch(cli);
}

pub fn run_with_args(args: Vec<String>) {
    let cli = Cli::parse_from(args);
    dispatch(cli);
}

/// Level used when `RUST_LOG` is unset. Only `serve` reports each request;
/// one-shot commands stay quiet below warnings.
fn default_log_level(command: &Commands) -> &'static str {
    match command {
        Commands::Serve => "info",
        _ => "warn",
    }
}

fn init_logging(command: &Commands) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(command)));
    // A subscriber may already be installed when running in-process.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn dispatch(cli: Cli) {
    init_logging(&cli.command);
    let simulator = Simulator::new(cli.engine.config());
    let seed = cli.engine.seed;
    match cli.command {
        Commands::Analyze {
            hand,
            board,
            opponents,
            position,
            sims,
            json,
        } => cmd_analyze(&simulator, seed, hand, board, opponents, position, sims, json),
        Commands::Classify { cards } => cmd_classify(cards, simulator.config().selection),
        Commands::Ranges { position } => cmd_ranges(position),
        Commands::Serve => {
            if let Err(e) = cmd_serve(&simulator, seed) {
                print_error(&e.to_string());
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_analyze(
    simulator: &Simulator<'_>,
    seed: Option<u64>,
    hand: String,
    board: Option<String>,
    opponents: usize,
    position: Option<String>,
    sims: usize,
    json: bool,
) {
    let hand_cards = match parse_cards(&hand) {
        Ok(cards) => cards,
        Err(e) => {
            print_error(&e.to_string());
            return;
        }
    };
    let board_cards = match board.as_deref().map(parse_cards).transpose() {
        Ok(cards) => cards.unwrap_or_default(),
        Err(e) => {
            print_error(&e.to_string());
            return;
        }
    };

    let request = AnalysisRequest {
        player_hand: Some(hand_cards.clone()),
        community_cards: board_cards.clone(),
        num_opponents: opponents,
        player_position: position.clone(),
        num_simulations: Some(sims),
    };

    if !json {
        println!();
        println!(
            "  {} on {} vs {} opponent(s) from {}",
            board_display(&hand_cards),
            board_display(&board_cards),
            opponents.to_string().bold(),
            position.as_deref().unwrap_or("?").bold(),
        );
        println!("  Running {} simulations...\n", sims.to_string().bold());
    }

    let response = analyze_seeded(simulator, &request, seed);
    if json {
        match serde_json::to_string_pretty(&response) {
            Ok(s) => println!("{}", s),
            Err(e) => print_error(&e.to_string()),
        }
        return;
    }

    match response {
        AnalysisResponse::Success(result) => {
            println!("  Win:  {}", equity_bar(result.win_chance, 30));
            println!("  Lose: {}", equity_bar(result.lose_chance, 30));
            println!();
            println!("{}", result_table(&result));
            println!("  {}", result.message.dimmed());
            println!();
        }
        AnalysisResponse::Error { error } => print_error(&error),
    }
}

fn cmd_classify(cards: String, selection: HandSelection) {
    let cards = match parse_cards(&cards) {
        Ok(c) => c,
        Err(e) => {
            print_error(&e.to_string());
            return;
        }
    };
    let all = match classify(&cards) {
        Ok(t) => t,
        Err(e) => {
            print_error(&e.to_string());
            return;
        }
    };

    println!();
    println!("  {}", board_display(&cards));
    print_section("Label", &hand_label(&cards));
    print_section("All cards", &format!("{} (score {})", all, all.score()));

    match select_best_five(&cards, selection).and_then(|five| Ok((classify(&five)?, five))) {
        Ok((hand_type, five)) => print_section(
            &format!("Scored five ({})", selection.as_str()),
            &format!("{} -> {} (score {})", board_display(&five), hand_type, hand_type.score()),
        ),
        Err(e) => print_error(&e.to_string()),
    }
    println!();
}

fn cmd_ranges(position: String) {
    let profile = profile_for(&position);
    let t = tables();

    println!();
    println!(
        "  {} plays against the {} profile",
        position.bold(),
        profile.as_str().cyan().bold()
    );
    println!("{}", profile_table(t, profile));

    let reachable: Vec<_> = ALL_CATEGORIES
        .iter()
        .filter(|&&c| t.weight(profile, c) > 0.0)
        .flat_map(|&c| t.shapes(c).iter().copied())
        .collect();
    println!();
    println!("{}", range_grid(&reachable, "Hands an opponent can hold"));
    println!();
}

fn cmd_serve(simulator: &Simulator<'_>, seed: Option<u64>) -> EngineResult<()> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                print_error(&e.to_string());
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let reply = handle_json_line(simulator, &line, &mut rng)?;
        if writeln!(stdout, "{}", reply).and_then(|_| stdout.flush()).is_err() {
            break;
        }
    }
    Ok(())
}
