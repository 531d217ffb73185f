use std::collections::HashSet;

use poker_equity::cards::*;
use poker_equity::error::EngineError;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn c(notation: &str) -> Card {
    parse_card(notation).unwrap()
}

#[test]
fn test_card_creation() {
    let c = Card::new(Rank::Ace, Suit::Spades);
    assert_eq!(c.rank, Rank::Ace);
    assert_eq!(c.suit, Suit::Spades);
    assert_eq!(c.value(), 14);
}

#[test]
fn test_invalid_rank() {
    assert!(matches!(Rank::from_char('X'), Err(EngineError::InvalidRank('X'))));
}

#[test]
fn test_invalid_suit() {
    assert!(matches!(Suit::from_char('x'), Err(EngineError::InvalidSuit('x'))));
}

#[test]
fn test_card_str() {
    assert_eq!(format!("{}", Card::new(Rank::King, Suit::Diamonds)), "Kd");
    assert_eq!(Card::new(Rank::Ace, Suit::Hearts).pretty(), "A\u{2665}");
}

#[test]
fn test_card_equality_and_hash() {
    let mut s = HashSet::new();
    s.insert(c("As"));
    s.insert(c("AS"));
    s.insert(c("Ah"));
    assert_eq!(s.len(), 2);
}

#[test]
fn test_parse_card_case_insensitive() {
    assert_eq!(c("th"), Card::new(Rank::Ten, Suit::Hearts));
    assert_eq!(c("AH"), Card::new(Rank::Ace, Suit::Hearts));
}

#[test]
fn test_parse_card_invalid() {
    assert!(parse_card("ABC").is_err());
    assert!(parse_card("1h").is_err());
    assert!(parse_card("Ax").is_err());
}

#[test]
fn test_parse_cards_separators() {
    let expected = vec![c("Ah"), c("Kd"), c("5c")];
    assert_eq!(parse_cards("AhKd5c").unwrap(), expected);
    assert_eq!(parse_cards("Ah Kd 5c").unwrap(), expected);
    assert_eq!(parse_cards("Ah,Kd,5c").unwrap(), expected);
    assert!(parse_cards("").unwrap().is_empty());
    assert!(parse_cards("AhK").is_err());
}

#[test]
fn test_format_cards() {
    assert_eq!(format_cards(&[]), "None");
    assert_eq!(format_cards(&[c("Ah"), c("Td")]), "Ah Td");
}

#[test]
fn test_card_json_shape() {
    let json = serde_json::to_string(&c("Ah")).unwrap();
    assert_eq!(json, r#"{"rank":"A","suit":"H"}"#);
    let parsed: Card = serde_json::from_str(r#"{"rank":"T","suit":"s"}"#).unwrap();
    assert_eq!(parsed, c("Ts"));
    assert!(serde_json::from_str::<Card>(r#"{"rank":"1","suit":"S"}"#).is_err());
}

#[test]
fn test_card_json_accepts_either_case() {
    for (json, expected) in [
        (r#"{"rank":"t","suit":"s"}"#, "Ts"),
        (r#"{"rank":"a","suit":"H"}"#, "Ah"),
        (r#"{"rank":"K","suit":"d"}"#, "Kd"),
        (r#"{"rank":"q","suit":"c"}"#, "Qc"),
        (r#"{"rank":"j","suit":"C"}"#, "Jc"),
    ] {
        let parsed: Card = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, c(expected));
        assert_eq!(parsed, parse_card(&expected.to_lowercase()).unwrap());
    }
    // Output always uses the canonical uppercase form.
    let json = serde_json::to_string(&c("td")).unwrap();
    assert_eq!(json, r#"{"rank":"T","suit":"D"}"#);
}

#[test]
fn test_build_deck_full() {
    let deck = build_deck(&[]).unwrap();
    assert_eq!(deck.len(), 52);
    let unique: HashSet<Card> = deck.iter().copied().collect();
    assert_eq!(unique.len(), 52);
}

#[test]
fn test_build_deck_excludes_known() {
    let known = parse_cards("AhAdKs2c9h").unwrap();
    let deck = build_deck(&known).unwrap();
    assert_eq!(deck.len(), 52 - known.len());
    for card in &known {
        assert!(!deck.contains(card), "{} should be removed", card);
    }
}

#[test]
fn test_build_deck_many_known_sets() {
    let mut rng = StdRng::seed_from_u64(7);
    for n in 0..=7 {
        let mut pool = Deck::without(&[]).unwrap();
        pool.shuffle(&mut rng);
        let known = pool.deal(n).unwrap();
        let deck = build_deck(&known).unwrap();
        assert_eq!(deck.len(), 52 - n);
        assert!(deck.iter().all(|c| !known.contains(c)));
    }
}

#[test]
fn test_build_deck_duplicate_known() {
    let known = vec![c("Ah"), c("Kd"), c("Ah")];
    match build_deck(&known) {
        Err(EngineError::DuplicateCard(card)) => assert_eq!(card, c("Ah")),
        other => panic!("expected duplicate error, got {:?}", other),
    }
}

#[test]
fn test_deck_deal() {
    let mut deck = Deck::without(&[]).unwrap();
    let first_two = deck.cards()[..2].to_vec();
    assert_eq!(deck.deal(2).unwrap(), first_two);
    assert_eq!(deck.len(), 50);
    assert!(deck.deal(51).is_none());
    assert_eq!(deck.len(), 50);
    assert_eq!(deck.deal(50).unwrap().len(), 50);
    assert!(deck.is_empty());
}

#[test]
fn test_deck_take_pair() {
    let mut deck = Deck::without(&[c("2c")]).unwrap();
    assert_eq!(deck.take_pair(c("As"), c("Kd")), Some([c("As"), c("Kd")]));
    assert_eq!(deck.len(), 49);
    assert!(!deck.contains(&c("As")));
    assert!(!deck.contains(&c("Kd")));
    assert!(deck.take_pair(c("As"), c("Qd")).is_none());
    assert!(deck.take_pair(c("2c"), c("Qd")).is_none());
    assert_eq!(deck.len(), 49);
}

#[test]
fn test_deck_shuffle_is_seeded() {
    let mut a = Deck::without(&[]).unwrap();
    let mut b = Deck::without(&[]).unwrap();
    a.shuffle(&mut StdRng::seed_from_u64(42));
    b.shuffle(&mut StdRng::seed_from_u64(42));
    assert_eq!(a.cards(), b.cards());
    assert_eq!(a.len(), 52);
}
