use std::fmt;

use itertools::Itertools;

use crate::cards::{Card, Rank, ALL_RANKS};
use crate::error::{EngineError, EngineResult};

pub const HAND_SIZE: usize = 5;

pub const NOT_ENOUGH_CARDS_LABEL: &str = "Not enough cards for a full poker hand";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandType {
    HighCard = 1,
    OnePair = 2,
    TwoPair = 3,
    ThreeOfAKind = 4,
    Straight = 5,
    Flush = 6,
    FullHouse = 7,
    FourOfAKind = 8,
    StraightFlush = 9,
}

impl HandType {
    /// Category score used to compare hands. Two hands of the same type
    /// always score equal, whatever their ranks.
    pub fn score(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for HandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandType::HighCard => write!(f, "High Card"),
            HandType::OnePair => write!(f, "One Pair"),
            HandType::TwoPair => write!(f, "Two Pair"),
            HandType::ThreeOfAKind => write!(f, "Three of a Kind"),
            HandType::Straight => write!(f, "Straight"),
            HandType::Flush => write!(f, "Flush"),
            HandType::FullHouse => write!(f, "Full House"),
            HandType::FourOfAKind => write!(f, "Four of a Kind"),
            HandType::StraightFlush => write!(f, "Straight Flush"),
        }
    }
}

/// How five cards are picked out of a larger hand before scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HandSelection {
    /// The first five cards in the order given (hole cards, then the board).
    #[default]
    Truncated,
    /// The best-scoring 5-card subset out of every combination.
    Exhaustive,
}

impl HandSelection {
    pub fn as_str(&self) -> &'static str {
        match self {
            HandSelection::Truncated => "truncated",
            HandSelection::Exhaustive => "exhaustive",
        }
    }
}

fn is_straight(values: &[u8]) -> bool {
    let mut distinct: Vec<u8> = values.iter().copied().sorted_unstable().dedup().collect();
    if distinct.last() == Some(&Rank::Ace.value()) {
        distinct.insert(0, 1);
    }
    distinct
        .windows(HAND_SIZE)
        .any(|w| w.windows(2).all(|p| p[1] == p[0] + 1))
}

/// Classifies any set of five or more cards. All cards count, so with more
/// than five a flush and a straight may come from different cards.
pub fn classify(cards: &[Card]) -> EngineResult<HandType> {
    if cards.len() < HAND_SIZE {
        return Err(EngineError::NotEnoughCards {
            need: HAND_SIZE,
            got: cards.len(),
        });
    }

    let mut rank_counts = [0u8; 15];
    let mut suit_counts = [0u8; 4];
    for card in cards {
        rank_counts[card.value() as usize] += 1;
        suit_counts[card.suit.index()] += 1;
    }

    let with_count = |n: u8| rank_counts.iter().filter(|&&c| c == n).count();
    let pairs = with_count(2);
    let trips = with_count(3);
    let quads = with_count(4);

    let flush = suit_counts.iter().any(|&c| c as usize >= HAND_SIZE);
    let values: Vec<u8> = cards.iter().map(|c| c.value()).collect();
    let straight = is_straight(&values);

    let hand_type = if straight && flush {
        HandType::StraightFlush
    } else if quads == 1 {
        HandType::FourOfAKind
    } else if trips == 1 && pairs >= 1 {
        HandType::FullHouse
    } else if flush {
        HandType::Flush
    } else if straight {
        HandType::Straight
    } else if trips == 1 {
        HandType::ThreeOfAKind
    } else if pairs >= 2 {
        HandType::TwoPair
    } else if pairs == 1 {
        HandType::OnePair
    } else {
        HandType::HighCard
    };
    Ok(hand_type)
}

pub fn score(hand_type: HandType) -> u8 {
    hand_type.score()
}

/// Picks the five cards that get scored. With five or fewer cards, all of them.
pub fn select_best_five(cards: &[Card], selection: HandSelection) -> EngineResult<Vec<Card>> {
    if cards.len() <= HAND_SIZE {
        return Ok(cards.to_vec());
    }
    match selection {
        HandSelection::Truncated => Ok(cards[..HAND_SIZE].to_vec()),
        HandSelection::Exhaustive => {
            let mut best: Option<(u8, Vec<Card>)> = None;
            for combo in cards.iter().copied().combinations(HAND_SIZE) {
                let s = classify(&combo)?.score();
                if best.as_ref().map_or(true, |(b, _)| s > *b) {
                    best = Some((s, combo));
                }
            }
            Ok(best.map(|(_, combo)| combo).unwrap_or_default())
        }
    }
}

/// Selects five cards with `selection` and classifies them.
pub fn evaluate(cards: &[Card], selection: HandSelection) -> EngineResult<HandType> {
    classify(&select_best_five(cards, selection)?)
}

/// Human-readable label for everything the player can see right now.
pub fn hand_label(cards: &[Card]) -> String {
    match classify(cards) {
        Ok(HandType::HighCard) => {
            let high = cards
                .iter()
                .map(|c| c.rank)
                .max()
                .unwrap_or(ALL_RANKS[0]);
            format!("{} ({})", HandType::HighCard, high.to_char())
        }
        Ok(hand_type) => hand_type.to_string(),
        Err(_) => NOT_ENOUGH_CARDS_LABEL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_straight_needs_distinct_run() {
        assert!(is_straight(&[5, 6, 7, 8, 9]));
        assert!(is_straight(&[14, 2, 3, 4, 5]));
        assert!(is_straight(&[2, 3, 3, 4, 5, 6, 13]));
        assert!(!is_straight(&[12, 13, 14, 2, 3]));
        assert!(!is_straight(&[2, 3, 4, 5, 5]));
    }

    #[test]
    fn test_broadway_with_ace() {
        assert!(is_straight(&[10, 11, 12, 13, 14]));
    }
}
