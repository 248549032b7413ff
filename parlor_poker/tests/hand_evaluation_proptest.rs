/// Property-based tests for hand evaluation using proptest
///
/// These tests verify that the evaluator is total, order-independent and
/// consistent with the category ranking across random card combinations.
use parlor_poker::game::{
    GameError,
    entities::{ACE, Card, Suit},
    functional::{Category, HandEvaluation, argmax, evaluate},
};
use proptest::prelude::*;
use std::collections::BTreeSet;

// Strategy to generate a valid card (values 2-14, aces high)
fn card_strategy() -> impl Strategy<Value = Card> {
    (2u8..=ACE, 0usize..4).prop_map(|(value, suit_idx)| Card(value, Suit::ALL[suit_idx]))
}

// Strategy to generate a vec of unique cards (no duplicates)
fn unique_cards_strategy(min: usize, max: usize) -> impl Strategy<Value = Vec<Card>> {
    prop::collection::vec(card_strategy(), min..=max).prop_filter("Cards must be unique", |cards| {
        let set: BTreeSet<_> = cards.iter().collect();
        set.len() == cards.len()
    })
}

fn five_card_hand_strategy() -> impl Strategy<Value = Vec<Card>> {
    unique_cards_strategy(5, 5)
}

// 2 hole cards + 5 board cards
fn seven_card_hand_strategy() -> impl Strategy<Value = Vec<Card>> {
    unique_cards_strategy(7, 7)
}

fn eval(cards: &[Card]) -> HandEvaluation {
    evaluate(cards).unwrap()
}

fn cards(spec: &[(u8, Suit)]) -> Vec<Card> {
    spec.iter().map(|&(value, suit)| Card(value, suit)).collect()
}

proptest! {
    #[test]
    fn test_evaluate_accepts_five_to_seven(cards in unique_cards_strategy(5, 7)) {
        let evaluation = evaluate(&cards);
        prop_assert!(evaluation.is_ok());

        // The best five always comes from the input.
        let evaluation = evaluation.unwrap();
        for card in evaluation.best_five {
            prop_assert!(cards.contains(&card), "{card} not in input");
        }
    }

    #[test]
    fn test_evaluate_rejects_short_hands(cards in unique_cards_strategy(0, 4)) {
        prop_assert_eq!(evaluate(&cards), Err(GameError::InvalidHandSize(cards.len())));
    }

    #[test]
    fn test_evaluate_ignores_input_order(cards in seven_card_hand_strategy()) {
        let forward = eval(&cards);
        let mut reversed = cards.clone();
        reversed.reverse();
        let backward = eval(&reversed);
        let mut rotated = cards.clone();
        rotated.rotate_left(3);
        let rotated = eval(&rotated);

        prop_assert_eq!(forward, backward);
        prop_assert_eq!(forward.best_five, backward.best_five);
        prop_assert_eq!(forward.best_five, rotated.best_five);
    }

    #[test]
    fn test_more_cards_never_hurt(cards in seven_card_hand_strategy()) {
        let five = eval(&cards[..5]);
        let six = eval(&cards[..6]);
        let seven = eval(&cards);
        prop_assert!(six >= five);
        prop_assert!(seven >= six);
    }

    #[test]
    fn test_best_five_scores_the_same(cards in seven_card_hand_strategy()) {
        let evaluation = eval(&cards);
        let rescored = eval(&evaluation.best_five);
        prop_assert_eq!(evaluation, rescored);
    }

    #[test]
    fn test_primary_rank_is_a_card_rank(cards in seven_card_hand_strategy()) {
        let rank = eval(&cards).primary_rank();
        prop_assert!((2..=ACE).contains(&rank), "rank {rank}");
    }

    #[test]
    fn test_argmax_single_hand_returns_zero(cards in five_card_hand_strategy()) {
        let winners = argmax(&[eval(&cards)]);
        prop_assert_eq!(winners, vec![0]);
    }

    #[test]
    fn test_argmax_identical_hands_all_win(cards in five_card_hand_strategy()) {
        let hand = eval(&cards);
        let winners = argmax(&[hand, hand, hand]);
        prop_assert_eq!(winners, vec![0, 1, 2]);
    }

    #[test]
    fn test_argmax_returns_valid_indices(
        hands in prop::collection::vec(five_card_hand_strategy(), 2..=10)
    ) {
        let evaluated: Vec<HandEvaluation> = hands.iter().map(|h| eval(h)).collect();
        let winners = argmax(&evaluated);

        prop_assert!(!winners.is_empty());
        let best = evaluated.iter().max().unwrap();
        for &winner in &winners {
            prop_assert!(winner < evaluated.len());
            prop_assert_eq!(&evaluated[winner], best);
        }

        // Indices should be sorted and unique
        let mut sorted_winners = winners.clone();
        sorted_winners.sort_unstable();
        sorted_winners.dedup();
        prop_assert_eq!(winners, sorted_winners);
    }

    #[test]
    fn test_suits_do_not_break_ties(values in prop::collection::btree_set(2u8..=ACE, 5)) {
        let values: Vec<u8> = values.into_iter().collect();
        // Off-suit versions of the same ranks (never a flush).
        let first: Vec<Card> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| Card(v, if i == 0 { Suit::Heart } else { Suit::Club }))
            .collect();
        let second: Vec<Card> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| Card(v, if i == 0 { Suit::Spade } else { Suit::Diamond }))
            .collect();
        prop_assert_eq!(eval(&first), eval(&second));
    }
}

// === Category Ladder ===

#[test]
fn test_category_ladder() {
    use Suit::{Club, Diamond, Heart, Spade};

    let ladder = [
        (cards(&[(14, Spade), (12, Heart), (9, Club), (6, Diamond), (3, Spade)]), Category::HighCard),
        (cards(&[(9, Spade), (9, Heart), (14, Club), (6, Diamond), (3, Spade)]), Category::OnePair),
        (cards(&[(9, Spade), (9, Heart), (6, Club), (6, Diamond), (3, Spade)]), Category::TwoPair),
        (cards(&[(9, Spade), (9, Heart), (9, Club), (6, Diamond), (3, Spade)]), Category::ThreeOfAKind),
        (cards(&[(5, Spade), (4, Heart), (3, Club), (2, Diamond), (14, Spade)]), Category::Straight),
        (cards(&[(13, Heart), (11, Heart), (8, Heart), (4, Heart), (2, Heart)]), Category::Flush),
        (cards(&[(9, Spade), (9, Heart), (9, Club), (6, Diamond), (6, Spade)]), Category::FullHouse),
        (cards(&[(9, Spade), (9, Heart), (9, Club), (9, Diamond), (6, Spade)]), Category::FourOfAKind),
        (cards(&[(9, Club), (8, Club), (7, Club), (6, Club), (5, Club)]), Category::StraightFlush),
        (cards(&[(14, Diamond), (13, Diamond), (12, Diamond), (11, Diamond), (10, Diamond)]), Category::RoyalFlush),
    ];

    let mut previous: Option<HandEvaluation> = None;
    for (hand, category) in ladder {
        let evaluation = eval(&hand);
        assert_eq!(evaluation.category, category, "{hand:?}");
        if let Some(previous) = previous {
            assert!(evaluation > previous, "{category:?} should beat {:?}", previous.category);
        }
        previous = Some(evaluation);
    }
}

#[test]
fn test_wheel_is_lowest_straight() {
    use Suit::{Club, Diamond, Heart, Spade};

    let wheel = eval(&cards(&[(14, Spade), (2, Heart), (3, Club), (4, Diamond), (5, Spade)]));
    let six_high = eval(&cards(&[(6, Spade), (2, Heart), (3, Club), (4, Diamond), (5, Spade)]));
    assert_eq!(wheel.category, Category::Straight);
    assert_eq!(wheel.primary_rank(), 5);
    assert!(six_high > wheel);
}

#[test]
fn test_seven_cards_pick_the_flush_over_the_straight() {
    use Suit::{Club, Heart, Spade};

    let hand = eval(&cards(&[
        (10, Heart),
        (9, Spade),
        (8, Heart),
        (7, Club),
        (6, Heart),
        (2, Heart),
        (13, Heart),
    ]));
    assert_eq!(hand.category, Category::Flush);
    assert_eq!(hand.primary_rank(), 13);
}

#[test]
fn test_kicker_decides_equal_pairs() {
    use Suit::{Club, Diamond, Heart, Spade};

    let board = [(12, Club), (12, Diamond), (8, Spade), (5, Heart), (3, Club)];
    let mut ace_kicker = cards(&board);
    ace_kicker.extend(cards(&[(14, Heart), (2, Spade)]));
    let mut king_kicker = cards(&board);
    king_kicker.extend(cards(&[(13, Heart), (2, Diamond)]));

    let ace = eval(&ace_kicker);
    let king = eval(&king_kicker);
    assert_eq!(ace.category, Category::OnePair);
    assert!(ace > king);
    assert_eq!(argmax(&[king, ace]), vec![1]);
}
