//! Opponent starting-hand ranges: curated hand categories and the positional
//! profiles that weight them.

use std::fmt;

use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;

use crate::cards::{Card, Rank, ALL_SUITS};
use crate::error::{EngineError, EngineResult};

static HAND_RANGES_JSON: &str = include_str!("../data/hand_ranges.json");

/// How far a profile's weights may drift from 1.0 and still load.
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

static TABLES: Lazy<RangeTables> = Lazy::new(|| {
    RangeTables::from_json(HAND_RANGES_JSON).expect("Failed to parse hand range tables")
});

/// The built-in tables, parsed once on first use.
pub fn tables() -> &'static RangeTables {
    &TABLES
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandCategory {
    Premium,
    Strong,
    Solid,
    Speculative,
    Wide,
}

/// Declared order; cumulative sampling walks categories in this order.
pub const ALL_CATEGORIES: [HandCategory; 5] = [
    HandCategory::Premium,
    HandCategory::Strong,
    HandCategory::Solid,
    HandCategory::Speculative,
    HandCategory::Wide,
];

impl HandCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            HandCategory::Premium => "PREMIUM",
            HandCategory::Strong => "STRONG",
            HandCategory::Solid => "SOLID",
            HandCategory::Speculative => "SPECULATIVE",
            HandCategory::Wide => "WIDE",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionalProfile {
    Early,
    Late,
    Blinds,
}

pub const ALL_PROFILES: [PositionalProfile; 3] = [
    PositionalProfile::Early,
    PositionalProfile::Late,
    PositionalProfile::Blinds,
];

impl PositionalProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionalProfile::Early => "EARLY",
            PositionalProfile::Late => "LATE",
            PositionalProfile::Blinds => "BLINDS",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for PositionalProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps the player's seat to the profile used for every opponent.
/// Anything unrecognised, the blinds included, gets the widest profile.
pub fn profile_for(position: &str) -> PositionalProfile {
    match position {
        "UTG" | "MP" => PositionalProfile::Early,
        "CO" | "BTN" => PositionalProfile::Late,
        _ => PositionalProfile::Blinds,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Pair,
    Suited,
    Offsuit,
}

/// A starting-hand shape such as "AKs", "AKo" or "TT".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandShape {
    pub first: Rank,
    pub second: Rank,
    pub kind: ShapeKind,
}

impl HandShape {
    /// Two ranks plus an optional `s`/`o` suffix. Unequal ranks without a
    /// suffix are dealt offsuit.
    pub fn parse(notation: &str) -> EngineResult<HandShape> {
        let notation = notation.trim();
        let chars: Vec<char> = notation.chars().collect();
        let bad = || EngineError::InvalidHandNotation(notation.to_string());
        if chars.len() != 2 && chars.len() != 3 {
            return Err(bad());
        }
        let first = Rank::from_char(chars[0]).map_err(|_| bad())?;
        let second = Rank::from_char(chars[1]).map_err(|_| bad())?;

        let kind = match (first == second, chars.get(2).copied()) {
            (true, None) => ShapeKind::Pair,
            (false, Some('s')) => ShapeKind::Suited,
            (false, Some('o')) | (false, None) => ShapeKind::Offsuit,
            _ => return Err(bad()),
        };
        Ok(HandShape {
            first,
            second,
            kind,
        })
    }

    /// Deals concrete cards for this shape using a fresh shuffle of the suits.
    pub fn deal<R: Rng + ?Sized>(&self, rng: &mut R) -> [Card; 2] {
        let mut suits = ALL_SUITS;
        suits.shuffle(rng);
        let second_suit = match self.kind {
            ShapeKind::Suited => suits[0],
            ShapeKind::Pair | ShapeKind::Offsuit => suits[1],
        };
        [
            Card::new(self.first, suits[0]),
            Card::new(self.second, second_suit),
        ]
    }
}

impl fmt::Display for HandShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.first.to_char(), self.second.to_char())?;
        match self.kind {
            ShapeKind::Pair => Ok(()),
            ShapeKind::Suited => write!(f, "s"),
            ShapeKind::Offsuit => write!(f, "o"),
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "UPPERCASE")]
struct PerCategory<T> {
    premium: T,
    strong: T,
    solid: T,
    speculative: T,
    wide: T,
}

impl<T> PerCategory<T> {
    fn into_array(self) -> [T; 5] {
        [
            self.premium,
            self.strong,
            self.solid,
            self.speculative,
            self.wide,
        ]
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "UPPERCASE")]
struct ProfileFile {
    early: PerCategory<f64>,
    late: PerCategory<f64>,
    blinds: PerCategory<f64>,
}

#[derive(Deserialize, Debug)]
struct RangeFile {
    categories: PerCategory<Vec<String>>,
    profiles: ProfileFile,
}

/// Read-only category lists and profile weights.
#[derive(Debug, Clone)]
pub struct RangeTables {
    hands: [Vec<HandShape>; 5],
    weights: [[f64; 5]; 3],
}

impl RangeTables {
    pub fn from_json(json: &str) -> EngineResult<RangeTables> {
        let file: RangeFile = serde_json::from_str(json)?;

        let mut hands: [Vec<HandShape>; 5] = Default::default();
        for (slot, shapes) in hands.iter_mut().zip(file.categories.into_array()) {
            *slot = shapes
                .iter()
                .map(|s| HandShape::parse(s))
                .collect::<EngineResult<Vec<_>>>()?;
        }

        let weights = [
            file.profiles.early.into_array(),
            file.profiles.late.into_array(),
            file.profiles.blinds.into_array(),
        ];
        if weights.iter().flatten().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(EngineError::InvalidValue(
                "Profile weights must be non-negative numbers".to_string(),
            ));
        }
        for (profile, row) in ALL_PROFILES.iter().zip(&weights) {
            let sum: f64 = row.iter().sum();
            if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
                return Err(EngineError::InvalidValue(format!(
                    "{} weights sum to {}, expected 1",
                    profile, sum
                )));
            }
        }

        Ok(RangeTables { hands, weights })
    }

    pub fn shapes(&self, category: HandCategory) -> &[HandShape] {
        &self.hands[category.index()]
    }

    pub fn weight(&self, profile: PositionalProfile, category: HandCategory) -> f64 {
        self.weights[profile.index()][category.index()]
    }

    /// Draws a category by cumulative weight. Falls back to WIDE when rounding
    /// leaves the draw above the last cumulative sum.
    pub fn sample_category<R: Rng + ?Sized>(
        &self,
        profile: PositionalProfile,
        rng: &mut R,
    ) -> HandCategory {
        let r: f64 = rng.gen();
        let mut cumulative = 0.0;
        for category in ALL_CATEGORIES {
            cumulative += self.weight(profile, category);
            if r < cumulative {
                return category;
            }
        }
        HandCategory::Wide
    }

    /// Picks one shape of `category` uniformly and deals it. An empty category
    /// falls back to WIDE.
    pub fn sample_starting_hand<R: Rng + ?Sized>(
        &self,
        category: HandCategory,
        rng: &mut R,
    ) -> EngineResult<[Card; 2]> {
        let shape = self
            .shapes(category)
            .choose(rng)
            .or_else(|| self.shapes(HandCategory::Wide).choose(rng))
            .copied()
            .ok_or_else(|| EngineError::RangeExhausted(category.to_string()))?;
        Ok(shape.deal(rng))
    }
}
