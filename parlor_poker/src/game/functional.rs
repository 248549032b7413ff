//! Hand evaluation over 5 to 7 cards.
//!
//! Every 5-card subset is scored independently into a [`Category`] and a
//! positional integer tiebreak; the subset with the greatest
//! `(category, tiebreak)` pair is the hand's value.

use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};

use super::{
    entities::{ACE, Card, Value},
    errors::GameError,
};

/// Hand categories, ordered weakest to strongest (1..=10).
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Category {
    HighCard = 1,
    OnePair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
    RoyalFlush,
}

impl Category {
    /// Numeric rank, 1 for high card through 10 for a royal flush.
    #[must_use]
    pub fn value(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::HighCard => "hi",
            Self::OnePair => "1p",
            Self::TwoPair => "2p",
            Self::ThreeOfAKind => "3k",
            Self::Straight => "s8",
            Self::Flush => "fs",
            Self::FullHouse => "fh",
            Self::FourOfAKind => "4k",
            Self::StraightFlush => "sf",
            Self::RoyalFlush => "rf",
        };
        write!(f, "{repr}")
    }
}

/// Score of the best 5-card hand within a set of cards.
///
/// Equality and ordering only consider `(category, tiebreak)`; two hands
/// with different suits but the same ranks compare equal.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct HandEvaluation {
    pub category: Category,
    pub tiebreak: u64,
    pub best_five: [Card; 5],
}

impl HandEvaluation {
    /// The rank that defines the hand: the quad, trip, top pair, straight
    /// high card, or highest card depending on category.
    #[must_use]
    pub fn primary_rank(&self) -> Value {
        let rank = match self.category {
            Category::HighCard | Category::Flush => self.tiebreak / 100u64.pow(4),
            Category::OnePair => self.tiebreak / 1_000_000,
            Category::TwoPair | Category::ThreeOfAKind => self.tiebreak / 10_000,
            Category::FullHouse => self.tiebreak / 100,
            Category::FourOfAKind => self.tiebreak / 1_000,
            Category::Straight | Category::StraightFlush | Category::RoyalFlush => self.tiebreak,
        };
        rank as Value
    }
}

impl PartialEq for HandEvaluation {
    fn eq(&self, other: &Self) -> bool {
        self.category == other.category && self.tiebreak == other.tiebreak
    }
}

impl Eq for HandEvaluation {}

impl PartialOrd for HandEvaluation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HandEvaluation {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.category, self.tiebreak).cmp(&(other.category, other.tiebreak))
    }
}

impl fmt::Display for HandEvaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.category)?;
        for card in &self.best_five {
            write!(f, " {card}")?;
        }
        Ok(())
    }
}

/// Base-100 positional encoding, most significant rank first.
fn positional(values: &[Value]) -> u64 {
    values.iter().fold(0, |acc, &v| acc * 100 + u64::from(v))
}

/// High card of a 5-card run, with the wheel (A-2-3-4-5) counting as 5.
/// `values` must be sorted descending.
fn straight_high(values: &[Value; 5]) -> Option<Value> {
    let distinct = values.windows(2).all(|w| w[0] != w[1]);
    if !distinct {
        return None;
    }
    if values[0] - values[4] == 4 {
        return Some(values[0]);
    }
    if *values == [ACE, 5, 4, 3, 2] {
        return Some(5);
    }
    None
}

/// Score exactly five cards.
fn score_five(cards: &[Card; 5]) -> (Category, u64) {
    let mut values = (*cards).map(|c| c.0);
    values.sort_unstable_by(|a, b| b.cmp(a));

    let is_flush = cards.iter().all(|c| c.1 == cards[0].1);
    let straight = straight_high(&values);

    if let (true, Some(high)) = (is_flush, straight) {
        let category = if high == ACE {
            Category::RoyalFlush
        } else {
            Category::StraightFlush
        };
        return (category, u64::from(high));
    }

    // (count, value) groups, largest group first, then highest value.
    let mut groups: Vec<(u8, Value)> = Vec::with_capacity(5);
    for &v in &values {
        match groups.iter_mut().find(|(_, gv)| *gv == v) {
            Some(group) => group.0 += 1,
            None => groups.push((1, v)),
        }
    }
    groups.sort_unstable_by(|a, b| b.cmp(a));
    let rank = |i: usize| u64::from(groups.get(i).map_or(0, |g| g.1));
    let shape: Vec<u8> = groups.iter().map(|g| g.0).collect();

    match shape.as_slice() {
        // Five of a kind can only come out of multi-set decks; it plays as
        // quads kicked by itself.
        [5] => (Category::FourOfAKind, rank(0) * 1_000 + rank(0)),
        [4, 1] => (Category::FourOfAKind, rank(0) * 1_000 + rank(1)),
        [3, 2] => (Category::FullHouse, rank(0) * 100 + rank(1)),
        _ if is_flush => (Category::Flush, positional(&values)),
        _ if straight.is_some() => (
            Category::Straight,
            u64::from(straight.unwrap_or_default()),
        ),
        [3, 1, 1] => (
            Category::ThreeOfAKind,
            rank(0) * 10_000 + rank(1) * 100 + rank(2),
        ),
        [2, 2, 1] => (
            Category::TwoPair,
            rank(0) * 10_000 + rank(1) * 100 + rank(2),
        ),
        [2, 1, 1, 1] => (
            Category::OnePair,
            rank(0) * 1_000_000 + rank(1) * 10_000 + rank(2) * 100 + rank(3),
        ),
        _ => (Category::HighCard, positional(&values)),
    }
}

/// Index sets of every 5-card subset of `n` cards in lexicographic order.
fn five_card_subsets(n: usize) -> Vec<[usize; 5]> {
    let mut subsets = Vec::with_capacity(21);
    if n < 5 {
        return subsets;
    }
    let mut idx = [0, 1, 2, 3, 4];
    loop {
        subsets.push(idx);
        // Find the rightmost index that can still move right.
        let Some(i) = (0..5).rev().find(|&i| idx[i] < n - 5 + i) else {
            return subsets;
        };
        idx[i] += 1;
        for j in i + 1..5 {
            idx[j] = idx[j - 1] + 1;
        }
    }
}

/// Evaluate the best 5-card hand among 5 to 7 cards.
///
/// The result doesn't depend on the order of `cards`: the input is sorted
/// before subsets are enumerated and the first best subset wins.
///
/// # Errors
///
/// Returns [`GameError::InvalidHandSize`] for fewer than 5 or more than 7
/// cards.
pub fn evaluate(cards: &[Card]) -> Result<HandEvaluation, GameError> {
    if !(5..=7).contains(&cards.len()) {
        return Err(GameError::InvalidHandSize(cards.len()));
    }
    let mut sorted = cards.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));

    let mut best: Option<HandEvaluation> = None;
    for subset in five_card_subsets(sorted.len()) {
        let five = subset.map(|i| sorted[i]);
        let (category, tiebreak) = score_five(&five);
        let candidate = HandEvaluation {
            category,
            tiebreak,
            best_five: five,
        };
        if best.is_none_or(|b| candidate > b) {
            best = Some(candidate);
        }
    }
    best.ok_or(GameError::InvalidHandSize(cards.len()))
}

/// Get the indices corresponding to the maximum values in `values`.
#[must_use]
pub fn argmax<T: Ord>(values: &[T]) -> Vec<usize> {
    let Some(max) = values.iter().max() else {
        return Vec::new();
    };
    values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| (v == max).then_some(i))
        .collect()
}
