use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::cards::{Card, Deck};
use crate::error::{EngineError, EngineResult};
use crate::hand_evaluator::{evaluate, hand_label, HandSelection};
use crate::ranges::{profile_for, tables, PositionalProfile, RangeTables};

pub const MAX_BOARD_CARDS: usize = 5;
pub const DEFAULT_MAX_DRAW_ATTEMPTS: usize = 50;
/// Iterations per independently seeded chunk in `run_parallel`.
pub const PARALLEL_CHUNK: usize = 1_000;

#[derive(Debug, Clone)]
pub struct EquityRequest {
    pub player_hand: [Card; 2],
    pub community: Vec<Card>,
    pub num_opponents: usize,
    pub position: String,
    pub num_simulations: usize,
}

impl EquityRequest {
    fn known_cards(&self) -> Vec<Card> {
        let mut known = self.player_hand.to_vec();
        known.extend_from_slice(&self.community);
        known
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    pub selection: HandSelection,
    pub max_draw_attempts: usize,
    pub parallel: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            selection: HandSelection::Truncated,
            max_draw_attempts: DEFAULT_MAX_DRAW_ATTEMPTS,
            parallel: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub win_chance: f64,
    pub lose_chance: f64,
    pub num_simulations: usize,
    pub your_hand_type: String,
    pub message: String,
}

impl SimulationResult {
    fn from_tally(tally: Tally, request: &EquityRequest) -> SimulationResult {
        let total = tally.total();
        let (win_chance, lose_chance) = if total > 0 {
            let half_ties = tally.ties as f64 / 2.0;
            (
                (tally.wins as f64 + half_ties) / total as f64,
                (tally.losses as f64 + half_ties) / total as f64,
            )
        } else {
            (0.0, 0.0)
        };
        SimulationResult {
            win_chance,
            lose_chance,
            num_simulations: total as usize,
            your_hand_type: hand_label(&request.known_cards()),
            message: format!(
                "Analysis based on player position: {}. Opponent hand ranges adjusted accordingly.",
                request.position
            ),
        }
    }
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Win {:.1}% | Lose {:.1}% ({} sims, {})",
            self.win_chance * 100.0,
            self.lose_chance * 100.0,
            self.num_simulations,
            self.your_hand_type,
        )
    }
}

/// Win/tie/loss counters over the feasible iterations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub wins: u64,
    pub ties: u64,
    pub losses: u64,
}

impl Tally {
    pub fn total(&self) -> u64 {
        self.wins + self.ties + self.losses
    }

    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Tie => self.ties += 1,
            Outcome::Loss => self.losses += 1,
        }
    }

    fn merge(self, other: Tally) -> Tally {
        Tally {
            wins: self.wins + other.wins,
            ties: self.ties + other.ties,
            losses: self.losses + other.losses,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Tie,
    Loss,
}

/// Runs position-weighted Monte Carlo deals against a set of range tables.
pub struct Simulator<'t> {
    tables: &'t RangeTables,
    config: SimulationConfig,
}

impl Simulator<'static> {
    pub fn new(config: SimulationConfig) -> Self {
        Simulator {
            tables: tables(),
            config,
        }
    }
}

impl Default for Simulator<'static> {
    fn default() -> Self {
        Simulator::new(SimulationConfig::default())
    }
}

struct Deal<'a> {
    request: &'a EquityRequest,
    deck: &'a Deck,
    profile: PositionalProfile,
}

impl<'t> Simulator<'t> {
    pub fn with_tables(tables: &'t RangeTables, config: SimulationConfig) -> Self {
        Simulator { tables, config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Runs `request.num_simulations` deals sequentially on `rng`.
    pub fn run<R: Rng + ?Sized>(
        &self,
        request: &EquityRequest,
        rng: &mut R,
    ) -> EngineResult<SimulationResult> {
        let deck = self.prepare(request)?;
        let deal = Deal {
            request,
            deck: &deck,
            profile: profile_for(&request.position),
        };
        let tally = self.simulate_batch(&deal, request.num_simulations, rng)?;
        self.finish(tally, request)
    }

    /// Same as `run`, spread over rayon in fixed chunks. Chunk `i` draws from
    /// `StdRng::seed_from_u64(seed + i)`, so a seed gives the same tallies on
    /// any number of threads.
    pub fn run_parallel(&self, request: &EquityRequest, seed: u64) -> EngineResult<SimulationResult> {
        let deck = self.prepare(request)?;
        let deal = Deal {
            request,
            deck: &deck,
            profile: profile_for(&request.position),
        };
        let chunks = request.num_simulations.div_ceil(PARALLEL_CHUNK);
        let tally = (0..chunks)
            .into_par_iter()
            .map(|i| {
                let start = i * PARALLEL_CHUNK;
                let size = PARALLEL_CHUNK.min(request.num_simulations - start);
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(i as u64));
                self.simulate_batch(&deal, size, &mut rng)
            })
            .try_reduce(Tally::default, |a, b| Ok(a.merge(b)))?;
        self.finish(tally, request)
    }

    fn prepare(&self, request: &EquityRequest) -> EngineResult<Deck> {
        if request.community.len() > MAX_BOARD_CARDS {
            return Err(EngineError::TooManyCommunityCards(request.community.len()));
        }
        if request.num_simulations == 0 {
            return Err(EngineError::InvalidValue(
                "Number of simulations must be positive".to_string(),
            ));
        }
        Deck::without(&request.known_cards())
    }

    fn finish(&self, tally: Tally, request: &EquityRequest) -> EngineResult<SimulationResult> {
        debug!(
            wins = tally.wins,
            ties = tally.ties,
            losses = tally.losses,
            discarded = request.num_simulations as u64 - tally.total(),
            "simulation finished"
        );
        Ok(SimulationResult::from_tally(tally, request))
    }

    fn simulate_batch<R: Rng + ?Sized>(
        &self,
        deal: &Deal<'_>,
        iterations: usize,
        rng: &mut R,
    ) -> EngineResult<Tally> {
        let mut tally = Tally::default();
        for _ in 0..iterations {
            if let Some(outcome) = self.simulate_once(deal, rng)? {
                tally.record(outcome);
            }
        }
        Ok(tally)
    }

    /// One deal. `None` means the deck ran out and the deal does not count.
    fn simulate_once<R: Rng + ?Sized>(
        &self,
        deal: &Deal<'_>,
        rng: &mut R,
    ) -> EngineResult<Option<Outcome>> {
        let mut deck = deal.deck.clone();
        deck.shuffle(rng);

        let mut opponents: Vec<[Card; 2]> = Vec::new();
        for _ in 0..deal.request.num_opponents {
            match self.draw_opponent(&mut deck, deal.profile, rng)? {
                Some(hand) => opponents.push(hand),
                None => return Ok(None),
            }
        }

        let needed = MAX_BOARD_CARDS - deal.request.community.len();
        let Some(runout) = deck.deal(needed) else {
            return Ok(None);
        };
        let mut board = deal.request.community.clone();
        board.extend(runout);

        let player_score = self.score_hand(&deal.request.player_hand, &board)?;
        let mut best_opponent = 0;
        for hand in &opponents {
            best_opponent = best_opponent.max(self.score_hand(hand, &board)?);
        }

        let outcome = match player_score.cmp(&best_opponent) {
            std::cmp::Ordering::Greater => Outcome::Win,
            std::cmp::Ordering::Equal => Outcome::Tie,
            std::cmp::Ordering::Less => Outcome::Loss,
        };
        Ok(Some(outcome))
    }

    /// Samples shapes until one is still in the deck, then falls back to the
    /// top two cards. `None` when fewer than two cards remain.
    fn draw_opponent<R: Rng + ?Sized>(
        &self,
        deck: &mut Deck,
        profile: PositionalProfile,
        rng: &mut R,
    ) -> EngineResult<Option<[Card; 2]>> {
        for _ in 0..self.config.max_draw_attempts {
            let category = self.tables.sample_category(profile, rng);
            let [first, second] = self.tables.sample_starting_hand(category, rng)?;
            if let Some(hand) = deck.take_pair(first, second) {
                return Ok(Some(hand));
            }
        }
        Ok(deck.deal(2).map(|cards| [cards[0], cards[1]]))
    }

    fn score_hand(&self, hole: &[Card; 2], board: &[Card]) -> EngineResult<u8> {
        let mut cards = hole.to_vec();
        cards.extend_from_slice(board);
        Ok(evaluate(&cards, self.config.selection)?.score())
    }
}
