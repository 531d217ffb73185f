use poker_equity::cards::*;
use poker_equity::error::EngineError;
use poker_equity::hand_evaluator::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn cards(notation: &str) -> Vec<Card> {
    parse_cards(notation).unwrap()
}

fn kind(notation: &str) -> HandType {
    classify(&cards(notation)).unwrap()
}

#[test]
fn test_four_of_a_kind() {
    let t = kind("2h2d2c2s3h");
    assert_eq!(t, HandType::FourOfAKind);
    assert_eq!(t.score(), 8);
}

#[test]
fn test_royal_is_straight_flush() {
    let t = kind("AhKhQhJhTh");
    assert_eq!(t, HandType::StraightFlush);
    assert_eq!(score(t), 9);
}

#[test]
fn test_high_card() {
    let t = kind("2h3d5c7s9h");
    assert_eq!(t, HandType::HighCard);
    assert_eq!(t.score(), 1);
}

#[test]
fn test_wheel() {
    let t = kind("Ah2d3c4s5h");
    assert_eq!(t, HandType::Straight);
    assert_eq!(t.score(), 5);
}

#[test]
fn test_no_wraparound_straight() {
    assert_eq!(kind("QhKdAc2s3h"), HandType::HighCard);
}

#[test]
fn test_categories() {
    assert_eq!(kind("AsAhAdKsKh"), HandType::FullHouse);
    assert_eq!(kind("As9s5s3s2s"), HandType::Flush);
    assert_eq!(kind("9s8h7d6c5s"), HandType::Straight);
    assert_eq!(kind("7s7h7dKs2h"), HandType::ThreeOfAKind);
    assert_eq!(kind("7s7hKdKs2h"), HandType::TwoPair);
    assert_eq!(kind("7s7hKdQs2h"), HandType::OnePair);
    assert_eq!(kind("9h8h7h6h5h"), HandType::StraightFlush);
}

#[test]
fn test_more_than_five_cards() {
    assert_eq!(kind("AhKh2h7h9hKd3c"), HandType::Flush);
    assert_eq!(kind("2s3s4d5c6h6d6s"), HandType::Straight);
    assert_eq!(kind("AsAdKsKdQsQd2c"), HandType::TwoPair);
}

#[test]
fn test_scores_are_ordered() {
    let ordered = [
        HandType::HighCard,
        HandType::OnePair,
        HandType::TwoPair,
        HandType::ThreeOfAKind,
        HandType::Straight,
        HandType::Flush,
        HandType::FullHouse,
        HandType::FourOfAKind,
        HandType::StraightFlush,
    ];
    for (i, t) in ordered.iter().enumerate() {
        assert_eq!(t.score() as usize, i + 1);
    }
    assert!(HandType::Flush > HandType::Straight);
}

#[test]
fn test_same_category_scores_equal() {
    assert_eq!(kind("AhKh9h5h2h").score(), kind("7d6d4d3d2d").score());
}

#[test]
fn test_not_enough_cards() {
    match classify(&cards("AhKhQh")) {
        Err(EngineError::NotEnoughCards { need, got }) => {
            assert_eq!(need, 5);
            assert_eq!(got, 3);
        }
        other => panic!("expected NotEnoughCards, got {:?}", other),
    }
}

#[test]
fn test_classify_order_invariant() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..200 {
        let mut deck = Deck::without(&[]).unwrap();
        deck.shuffle(&mut rng);
        let hand = deck.deal(7).unwrap();
        let expected = classify(&hand).unwrap();
        let mut reversed = hand.clone();
        reversed.reverse();
        assert_eq!(classify(&reversed).unwrap(), expected);
        let mut sorted = hand.clone();
        sorted.sort();
        assert_eq!(classify(&sorted).unwrap(), expected);
    }
}

#[test]
fn test_truncated_selection_keeps_first_five() {
    let seven = cards("2h7dAsAcKd9sAh");
    let five = select_best_five(&seven, HandSelection::Truncated).unwrap();
    assert_eq!(five, seven[..5].to_vec());
    // The third ace is the seventh card, so only a pair gets scored.
    assert_eq!(evaluate(&seven, HandSelection::Truncated).unwrap(), HandType::OnePair);
}

#[test]
fn test_exhaustive_selection_finds_trips() {
    let seven = cards("2h7dAsAcKd9sAh");
    let five = select_best_five(&seven, HandSelection::Exhaustive).unwrap();
    assert_eq!(five.len(), 5);
    assert_eq!(classify(&five).unwrap(), HandType::ThreeOfAKind);
}

#[test]
fn test_short_hand_returned_whole() {
    let three = cards("2h7dAs");
    assert_eq!(select_best_five(&three, HandSelection::Truncated).unwrap(), three);
    assert_eq!(select_best_five(&three, HandSelection::Exhaustive).unwrap(), three);
}

#[test]
fn test_exhaustive_never_below_truncated() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..300 {
        let mut deck = Deck::without(&[]).unwrap();
        deck.shuffle(&mut rng);
        let hand = deck.deal(7).unwrap();
        let truncated = evaluate(&hand, HandSelection::Truncated).unwrap();
        let exhaustive = evaluate(&hand, HandSelection::Exhaustive).unwrap();
        assert!(exhaustive >= truncated, "{:?} < {:?} for {:?}", exhaustive, truncated, hand);
    }
}

#[test]
fn test_hand_label() {
    assert_eq!(hand_label(&cards("AhKd")), NOT_ENOUGH_CARDS_LABEL);
    assert_eq!(hand_label(&cards("2h3d5c7s9hJd")), "High Card (J)");
    assert_eq!(hand_label(&cards("AhAdKs")), NOT_ENOUGH_CARDS_LABEL);
    assert_eq!(hand_label(&cards("AhAdKsKd2c")), "Two Pair");
}

#[test]
fn test_hand_type_display() {
    assert_eq!(HandType::ThreeOfAKind.to_string(), "Three of a Kind");
    assert_eq!(HandType::StraightFlush.to_string(), "Straight Flush");
}
