//! Request/response boundary in front of the simulator: validates raw
//! requests, logs them and turns engine faults into error responses.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::cards::{format_cards, Card};
use crate::equity::{EquityRequest, SimulationResult, Simulator};
use crate::error::{EngineError, EngineResult};

pub const DEFAULT_SIMULATIONS: usize = 10_000;

pub const HAND_SIZE_MESSAGE: &str = "Please select exactly 2 hole cards.";
pub const MISSING_POSITION_MESSAGE: &str = "Player position is missing.";
pub const BAD_SIMULATIONS_MESSAGE: &str = "Number of simulations must be positive.";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub player_hand: Option<Vec<Card>>,
    #[serde(default)]
    pub community_cards: Vec<Card>,
    #[serde(default)]
    pub num_opponents: usize,
    pub player_position: Option<String>,
    pub num_simulations: Option<usize>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum AnalysisResponse {
    Success(SimulationResult),
    Error { error: String },
}

impl AnalysisResponse {
    pub fn error(message: impl Into<String>) -> Self {
        AnalysisResponse::Error {
            error: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, AnalysisResponse::Error { .. })
    }
}

/// Checks a raw request and builds the engine request. Nothing here touches
/// the simulator.
pub fn validate(request: &AnalysisRequest) -> EngineResult<EquityRequest> {
    let player_hand: [Card; 2] = match request.player_hand.as_deref() {
        Some(&[first, second]) => [first, second],
        _ => return Err(EngineError::Validation(HAND_SIZE_MESSAGE.to_string())),
    };
    let position = match request.player_position.as_deref() {
        Some(p) if !p.is_empty() => p.to_string(),
        _ => return Err(EngineError::Validation(MISSING_POSITION_MESSAGE.to_string())),
    };
    let num_simulations = request.num_simulations.unwrap_or(DEFAULT_SIMULATIONS);
    if num_simulations == 0 {
        return Err(EngineError::Validation(BAD_SIMULATIONS_MESSAGE.to_string()));
    }
    Ok(EquityRequest {
        player_hand,
        community: request.community_cards.clone(),
        num_opponents: request.num_opponents,
        position,
        num_simulations,
    })
}

fn log_request(request: &AnalysisRequest) {
    let hand = request
        .player_hand
        .as_deref()
        .map_or_else(|| "None".to_string(), format_cards);
    let community = format_cards(&request.community_cards);
    let position = request.player_position.as_deref().unwrap_or("None");
    info!(
        player_hand = %hand,
        community = %community,
        opponents = request.num_opponents,
        position,
        "received analysis request"
    );
}

fn respond(result: EngineResult<SimulationResult>) -> AnalysisResponse {
    match result {
        Ok(result) => AnalysisResponse::Success(result),
        Err(e) => {
            error!(error = %e, "error during analysis");
            AnalysisResponse::error(format!("Backend calculation error: {}", e))
        }
    }
}

/// Handles one request on the caller's random source.
pub fn analyze<R: Rng + ?Sized>(
    simulator: &Simulator<'_>,
    request: &AnalysisRequest,
    rng: &mut R,
) -> AnalysisResponse {
    log_request(request);
    let equity_request = match validate(request) {
        Ok(r) => r,
        Err(e) => return AnalysisResponse::error(e.to_string()),
    };
    if simulator.config().parallel {
        let seed: u64 = rng.gen();
        respond(simulator.run_parallel(&equity_request, seed))
    } else {
        respond(simulator.run(&equity_request, rng))
    }
}

/// Handles one request, seeded when `seed` is given and from entropy otherwise.
pub fn analyze_seeded(
    simulator: &Simulator<'_>,
    request: &AnalysisRequest,
    seed: Option<u64>,
) -> AnalysisResponse {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    analyze(simulator, request, &mut rng)
}

/// Decodes one JSON request line and answers it with one JSON response line.
pub fn handle_json_line<R: Rng + ?Sized>(
    simulator: &Simulator<'_>,
    line: &str,
    rng: &mut R,
) -> EngineResult<String> {
    let response = match serde_json::from_str::<AnalysisRequest>(line) {
        Ok(request) => analyze(simulator, &request, rng),
        Err(e) => AnalysisResponse::error(format!("Invalid request: {}", e)),
    };
    Ok(serde_json::to_string(&response)?)
}
