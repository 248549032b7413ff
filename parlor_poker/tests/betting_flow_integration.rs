//! Full hands played through the betting state machine with stacked decks.

use parlor_poker::game::{
    GameError, Hand, Phase, Street,
    entities::{ACE, Action, Blinds, Card, Deck, JACK, KING, Player, QUEEN, SeatIndex, Suit, User, Usd},
    functional::Category,
};

const BLINDS: Blinds = Blinds { small: 5, big: 10 };

fn players(stacks: &[Usd]) -> Vec<Player> {
    stacks
        .iter()
        .enumerate()
        .map(|(i, &money)| Player::new(User::new(&format!("p{i}"), money), false))
        .collect()
}

/// Deck that deals `hole[seat]` to every seat (starting left of the
/// button) and then `board`, burning before each street.
fn stacked_deck(button: SeatIndex, hole: &[[Card; 2]], board: [Card; 5]) -> Deck {
    let n = hole.len();
    let burn = Card(2, Suit::Heart);
    let mut cards = Vec::new();
    for pass in 0..2 {
        for k in 1..=n {
            cards.push(hole[(button + k) % n][pass]);
        }
    }
    cards.push(burn);
    cards.extend_from_slice(&board[..3]);
    cards.push(burn);
    cards.push(board[3]);
    cards.push(burn);
    cards.push(board[4]);
    Deck::from_cards(cards)
}

fn act(hand: &mut Hand, seat: SeatIndex, action: Action) {
    assert_eq!(hand.active_seat(), Some(seat), "expected seat {seat} to act");
    assert!(hand.is_legal(seat, &action), "seat {seat} can't {action}");
    hand.submit_action(seat, action).unwrap();
}

fn stacks(hand: &Hand) -> Vec<Usd> {
    hand.players().iter().map(|p| p.user.money).collect()
}

#[test]
fn test_four_handed_hand_to_showdown() {
    let hole = [
        [Card(ACE, Suit::Spade), Card(ACE, Suit::Heart)],
        [Card(2, Suit::Club), Card(7, Suit::Diamond)],
        [Card(3, Suit::Club), Card(8, Suit::Diamond)],
        [Card(KING, Suit::Spade), Card(KING, Suit::Heart)],
    ];
    let board = [
        Card(QUEEN, Suit::Club),
        Card(9, Suit::Diamond),
        Card(4, Suit::Spade),
        Card(5, Suit::Heart),
        Card(JACK, Suit::Club),
    ];
    let mut hand = Hand::start(players(&[500; 4]), 0, BLINDS, stacked_deck(0, &hole, board)).unwrap();
    assert_eq!(hand.pot_total(), 15);
    assert_eq!(hand.players()[3].cards, hole[3].to_vec());

    // Preflop: UTG raises, button calls, small blind folds, big blind calls.
    assert_eq!(hand.min_raise(), 10);
    act(&mut hand, 3, Action::Raise(30));
    assert_eq!(hand.to_call(0), 30);
    act(&mut hand, 0, Action::Call);
    act(&mut hand, 1, Action::Fold);
    act(&mut hand, 2, Action::Call);
    assert_eq!(hand.street(), Street::Flop);
    assert_eq!(hand.board().len(), 3);
    assert_eq!(hand.pot_total(), 95);

    // Flop: check, bet, raise, fold, call.
    act(&mut hand, 2, Action::Check);
    act(&mut hand, 3, Action::Bet(50));
    act(&mut hand, 0, Action::Raise(150));
    act(&mut hand, 2, Action::Fold);
    act(&mut hand, 3, Action::Call);
    assert_eq!(hand.street(), Street::Turn);
    assert_eq!(hand.pot_total(), 395);

    // Turn: checked through.
    act(&mut hand, 3, Action::Check);
    act(&mut hand, 0, Action::Check);
    assert_eq!(hand.street(), Street::River);

    // River: bet and call.
    act(&mut hand, 3, Action::Bet(100));
    assert!(!hand.is_betting_round_complete());
    act(&mut hand, 0, Action::Call);
    assert_eq!(hand.phase(), Phase::Showdown);
    assert_eq!(hand.active_seat(), None);

    let payouts = hand.resolve_showdown().unwrap();
    let winner = payouts.iter().find(|p| p.amount_won > 0).unwrap();
    assert_eq!(winner.seat, 0);
    assert_eq!(winner.amount_won, 595);
    assert_eq!(winner.evaluation.unwrap().category, Category::OnePair);

    assert_eq!(hand.phase(), Phase::Complete);
    assert_eq!(hand.pot_total(), 0);
    assert_eq!(stacks(&hand), vec![815, 495, 470, 220]);
    assert_eq!(hand.state().chips_in_play(), 2000);

    assert_eq!(
        hand.submit_action(0, Action::Check).unwrap_err(),
        GameError::HandComplete
    );
    assert_eq!(hand.resolve_showdown().unwrap_err(), GameError::NotAtShowdown);
}

#[test]
fn test_all_in_side_pot_hand() {
    let hole = [
        [Card(ACE, Suit::Spade), Card(ACE, Suit::Heart)],
        [Card(KING, Suit::Spade), Card(KING, Suit::Heart)],
        [Card(QUEEN, Suit::Spade), Card(QUEEN, Suit::Heart)],
    ];
    let board = [
        Card(2, Suit::Club),
        Card(7, Suit::Diamond),
        Card(9, Suit::Spade),
        Card(JACK, Suit::Heart),
        Card(4, Suit::Club),
    ];
    let mut hand =
        Hand::start(players(&[100, 300, 300]), 0, BLINDS, stacked_deck(0, &hole, board)).unwrap();

    // Three-handed the button opens the action.
    act(&mut hand, 0, Action::Raise(100));
    act(&mut hand, 1, Action::Raise(300));
    act(&mut hand, 2, Action::Call);

    // Everyone is all-in: the board runs out with no more betting.
    assert_eq!(hand.phase(), Phase::Showdown);
    assert_eq!(hand.board().len(), 5);
    let state = hand.state();
    assert_eq!(state.pot, 300);
    assert_eq!(state.side_pots.len(), 1);
    assert_eq!(state.side_pots[0].amount, 400);

    let payouts = hand.resolve_showdown().unwrap();
    let won: Vec<Usd> = payouts.iter().map(|p| p.amount_won).collect();
    assert_eq!(won, vec![300, 400, 0]);
    assert_eq!(stacks(&hand), vec![300, 400, 0]);
}

#[test]
fn test_everyone_folds_to_big_blind() {
    let mut hand = Hand::start(players(&[200, 200, 200, 200]), 1, BLINDS, Deck::ordered(1)).unwrap();
    // Button 1: small blind 2, big blind 3, UTG 0.
    act(&mut hand, 0, Action::Fold);
    act(&mut hand, 1, Action::Fold);
    act(&mut hand, 2, Action::Fold);

    assert!(hand.is_complete());
    assert_eq!(hand.payouts().len(), 1);
    assert_eq!(hand.payouts()[0].seat, 3);
    assert_eq!(hand.payouts()[0].evaluation, None);
    assert_eq!(stacks(&hand), vec![200, 200, 195, 205]);
    // The flop was never dealt.
    assert!(hand.board().is_empty());
}

#[test]
fn test_redacted_views_hide_opponents() {
    let mut hand = Hand::start(players(&[200, 200, 200]), 0, BLINDS, Deck::ordered(1)).unwrap();
    let view = hand.state().redacted_for(1);
    assert_eq!(view.seats[1].cards.len(), 2);
    assert!(view.seats[0].cards.is_empty());
    assert!(view.seats[2].cards.is_empty());

    hand.force_fold(0).unwrap();
    hand.force_fold(1).unwrap();
    assert!(hand.is_complete());
    // Won without a showdown: the winner's cards are never revealed.
    let view = hand.state().redacted_for(1);
    assert!(!view.showdown);
    assert!(view.seats[0].cards.is_empty());
    assert_eq!(view.seats[1].cards.len(), 2);
    assert!(view.seats[2].cards.is_empty());
}
