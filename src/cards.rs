use std::collections::HashSet;
use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    #[serde(rename = "2")]
    Two = 2,
    #[serde(rename = "3")]
    Three = 3,
    #[serde(rename = "4")]
    Four = 4,
    #[serde(rename = "5")]
    Five = 5,
    #[serde(rename = "6")]
    Six = 6,
    #[serde(rename = "7")]
    Seven = 7,
    #[serde(rename = "8")]
    Eight = 8,
    #[serde(rename = "9")]
    Nine = 9,
    #[serde(rename = "T", alias = "t")]
    Ten = 10,
    #[serde(rename = "J", alias = "j")]
    Jack = 11,
    #[serde(rename = "Q", alias = "q")]
    Queen = 12,
    #[serde(rename = "K", alias = "k")]
    King = 13,
    #[serde(rename = "A", alias = "a")]
    Ace = 14,
}

impl Rank {
    pub fn from_char(c: char) -> EngineResult<Rank> {
        match c {
            '2' => Ok(Rank::Two),
            '3' => Ok(Rank::Three),
            '4' => Ok(Rank::Four),
            '5' => Ok(Rank::Five),
            '6' => Ok(Rank::Six),
            '7' => Ok(Rank::Seven),
            '8' => Ok(Rank::Eight),
            '9' => Ok(Rank::Nine),
            'T' => Ok(Rank::Ten),
            'J' => Ok(Rank::Jack),
            'Q' => Ok(Rank::Queen),
            'K' => Ok(Rank::King),
            'A' => Ok(Rank::Ace),
            _ => Err(EngineError::InvalidRank(c)),
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }

    /// Numeric value, 2 through 14 (ace high).
    pub fn value(self) -> u8 {
        self as u8
    }
}

pub const ALL_RANKS: [Rank; 13] = [
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
    Rank::Nine,
    Rank::Ten,
    Rank::Jack,
    Rank::Queen,
    Rank::King,
    Rank::Ace,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Suit {
    #[serde(rename = "H", alias = "h")]
    Hearts,
    #[serde(rename = "D", alias = "d")]
    Diamonds,
    #[serde(rename = "C", alias = "c")]
    Clubs,
    #[serde(rename = "S", alias = "s")]
    Spades,
}

impl Suit {
    pub fn from_char(c: char) -> EngineResult<Suit> {
        match c.to_ascii_uppercase() {
            'H' => Ok(Suit::Hearts),
            'D' => Ok(Suit::Diamonds),
            'C' => Ok(Suit::Clubs),
            'S' => Ok(Suit::Spades),
            _ => Err(EngineError::InvalidSuit(c)),
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Suit::Hearts => 'h',
            Suit::Diamonds => 'd',
            Suit::Clubs => 'c',
            Suit::Spades => 's',
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Suit::Hearts => "\u{2665}",
            Suit::Diamonds => "\u{2666}",
            Suit::Clubs => "\u{2663}",
            Suit::Spades => "\u{2660}",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

pub const ALL_SUITS: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Card {
        Card { rank, suit }
    }

    pub fn value(&self) -> u8 {
        self.rank.value()
    }

    pub fn pretty(&self) -> String {
        format!("{}{}", self.rank.to_char(), self.suit.symbol())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.to_char(), self.suit.to_char())
    }
}

fn full_deck() -> impl Iterator<Item = Card> {
    ALL_SUITS
        .into_iter()
        .flat_map(|s| ALL_RANKS.into_iter().map(move |r| Card::new(r, s)))
}

/// All 52 cards minus `known`. A duplicate inside `known` means the caller
/// handed us an impossible table state.
pub fn build_deck(known: &[Card]) -> EngineResult<Vec<Card>> {
    let mut seen: HashSet<Card> = HashSet::with_capacity(known.len());
    for &card in known {
        if !seen.insert(card) {
            return Err(EngineError::DuplicateCard(card));
        }
    }
    Ok(full_deck().filter(|c| !seen.contains(c)).collect())
}

/// A private, mutable run of cards for one simulated deal.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn without(known: &[Card]) -> EngineResult<Deck> {
        Ok(Deck {
            cards: build_deck(known)?,
        })
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &mut Self {
        self.cards.shuffle(rng);
        self
    }

    /// Takes `n` cards off the top, or `None` when the deck is short.
    pub fn deal(&mut self, n: usize) -> Option<Vec<Card>> {
        if n > self.cards.len() {
            return None;
        }
        Some(self.cards.drain(..n).collect())
    }

    /// Removes both cards if both are still in the deck; leaves it untouched otherwise.
    pub fn take_pair(&mut self, first: Card, second: Card) -> Option<[Card; 2]> {
        let i = self.cards.iter().position(|&c| c == first)?;
        let j = self.cards.iter().position(|&c| c == second)?;
        if i == j {
            return None;
        }
        self.cards.remove(i.max(j));
        self.cards.remove(i.min(j));
        Some([first, second])
    }

    pub fn contains(&self, card: &Card) -> bool {
        self.cards.contains(card)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

pub fn parse_card(notation: &str) -> EngineResult<Card> {
    let notation = notation.trim();
    let chars: Vec<char> = notation.chars().collect();
    if chars.len() != 2 {
        return Err(EngineError::InvalidCardNotation(notation.to_string()));
    }
    let rank = Rank::from_char(chars[0].to_ascii_uppercase())?;
    let suit = Suit::from_char(chars[1])?;
    Ok(Card::new(rank, suit))
}

/// Parses "AhKd", "Ah Kd" or "Ah,Kd" into cards. An empty string is no cards.
pub fn parse_cards(notation: &str) -> EngineResult<Vec<Card>> {
    let clean: String = notation
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();
    let chars: Vec<char> = clean.chars().collect();
    if chars.len() % 2 != 0 {
        return Err(EngineError::InvalidCardNotation(notation.trim().to_string()));
    }
    chars
        .chunks(2)
        .map(|pair| parse_card(&pair.iter().collect::<String>()))
        .collect()
}

pub fn format_cards(cards: &[Card]) -> String {
    if cards.is_empty() {
        return "None".to_string();
    }
    cards
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
