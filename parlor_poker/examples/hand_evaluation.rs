//! Showdown walkthrough
//!
//! Scores three players' hole cards against one board, splits the pot
//! between the winners and prints each step.

use parlor_poker::{
    PotLedger,
    entities::{Card, Suit},
    functional::{HandEvaluation, argmax, evaluate},
    game::GameError,
};
use std::collections::BTreeMap;

fn show(cards: &[Card]) -> String {
    cards.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
}

fn main() -> Result<(), GameError> {
    let board = [
        Card(10, Suit::Heart),
        Card(10, Suit::Diamond),
        Card(5, Suit::Club),
        Card(3, Suit::Spade),
        Card(14, Suit::Heart),
    ];
    let hole = [
        ("alice", [Card(14, Suit::Spade), Card(9, Suit::Club)]),
        ("bob", [Card(14, Suit::Club), Card(9, Suit::Diamond)]),
        ("carol", [Card(13, Suit::Spade), Card(12, Suit::Diamond)]),
    ];
    println!("Board: {}\n", show(&board));

    let mut evaluations: Vec<HandEvaluation> = Vec::with_capacity(hole.len());
    for (name, cards) in &hole {
        let mut seven = cards.to_vec();
        seven.extend_from_slice(&board);
        let evaluation = evaluate(&seven)?;
        println!(
            "{name:<6} {}  ->  {} ({})",
            show(cards),
            evaluation.category,
            show(&evaluation.best_five)
        );
        evaluations.push(evaluation);
    }

    let winners = argmax(&evaluations);
    let names: Vec<&str> = winners.iter().map(|&i| hole[i].0).collect();
    println!("\nBest hand: {}", names.join(", "));

    // Everyone put 101 in; a 303 pot doesn't split evenly two ways.
    let mut ledger = PotLedger::new(hole.len());
    for seat in 0..hole.len() {
        ledger.commit(seat, 101);
    }
    let pots = ledger.pots(&[false; 3], &[false; 3]);
    let by_seat: BTreeMap<usize, HandEvaluation> = evaluations.into_iter().enumerate().collect();
    let won = ledger.award(&pots, &by_seat, 0);
    for (seat, amount) in won {
        println!("{} collects ${amount}", hole[seat].0);
    }
    Ok(())
}
