use thiserror::Error;

use crate::cards::Card;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid rank: {0}")]
    InvalidRank(char),

    #[error("Invalid suit: {0}")]
    InvalidSuit(char),

    #[error("Invalid card notation: {0}")]
    InvalidCardNotation(String),

    #[error("Invalid hand notation: {0}")]
    InvalidHandNotation(String),

    #[error("Need at least {need} cards, got {got}")]
    NotEnoughCards { need: usize, got: usize },

    #[error("Duplicate known card: {0}")]
    DuplicateCard(Card),

    #[error("At most 5 community cards allowed, got {0}")]
    TooManyCommunityCards(usize),

    #[error("No starting hands left to sample (category {0} and WIDE are empty)")]
    RangeExhausted(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Caller-boundary rejection. The message is shown to the user verbatim.
    #[error("{0}")]
    Validation(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
