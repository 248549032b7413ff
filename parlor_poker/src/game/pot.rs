//! Per-hand contribution ledger with main/side pot construction.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::{
    entities::{SeatIndex, Usd},
    functional::HandEvaluation,
};

/// One contested pot: the main pot is the first, side pots follow in
/// ascending all-in tier order.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SidePot {
    pub amount: Usd,
    pub eligible: BTreeSet<SeatIndex>,
}

/// Tracks what every seat has put in over the hand.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct PotLedger {
    // Indexed by seat.
    committed: Vec<Usd>,
    settled: bool,
}

impl PotLedger {
    #[must_use]
    pub fn new(num_seats: usize) -> Self {
        Self {
            committed: vec![0; num_seats],
            settled: false,
        }
    }

    pub fn commit(&mut self, seat: SeatIndex, amount: Usd) {
        if let Some(committed) = self.committed.get_mut(seat) {
            *committed += amount;
        }
    }

    /// Return the amount the seat has invested over the hand.
    #[must_use]
    pub fn committed(&self, seat: SeatIndex) -> Usd {
        self.committed.get(seat).copied().unwrap_or(0)
    }

    /// Chips currently held in the pot. Zero once the ledger is settled.
    #[must_use]
    pub fn total(&self) -> Usd {
        if self.settled {
            0
        } else {
            self.committed.iter().sum()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Mark every chip as paid out.
    pub fn settle(&mut self) {
        self.settled = true;
    }

    /// Split contributions into the main pot and side pots.
    ///
    /// Tier levels are the distinct contributions of live all-in seats plus
    /// the largest contribution overall. Each tier collects
    /// `min(c, level) - min(c, previous level)` from every seat and is
    /// contested by the live seats that reached the level. A tier nobody
    /// live reached (chips a folded seat put in above every live seat) is
    /// folded into the pot below it.
    ///
    /// # Arguments
    ///
    /// * `folded` - Whether each seat has folded, indexed by seat
    /// * `all_in` - Whether each seat is all-in, indexed by seat
    ///
    /// # Returns
    ///
    /// * `Vec<SidePot>` - Main pot first; empty if nothing was committed
    #[must_use]
    pub fn pots(&self, folded: &[bool], all_in: &[bool]) -> Vec<SidePot> {
        if self.settled {
            return Vec::new();
        }
        let is_live = |seat: SeatIndex| !folded.get(seat).copied().unwrap_or(true);

        let mut levels: BTreeSet<Usd> = self
            .committed
            .iter()
            .enumerate()
            .filter(|&(seat, &c)| c > 0 && is_live(seat) && all_in.get(seat).copied().unwrap_or(false))
            .map(|(_, &c)| c)
            .collect();
        if let Some(&max) = self.committed.iter().max() {
            if max > 0 {
                levels.insert(max);
            }
        }

        let mut pots: Vec<SidePot> = Vec::with_capacity(levels.len());
        let mut previous = 0;
        for level in levels {
            let amount: Usd = self
                .committed
                .iter()
                .map(|&c| c.min(level) - c.min(previous))
                .sum();
            let eligible: BTreeSet<SeatIndex> = self
                .committed
                .iter()
                .enumerate()
                .filter(|&(seat, &c)| c >= level && is_live(seat))
                .map(|(seat, _)| seat)
                .collect();
            previous = level;

            if amount == 0 {
                continue;
            }
            match pots.last_mut() {
                Some(last) if eligible.is_empty() => last.amount += amount,
                // Nothing below to merge into; every live seat contests it.
                None if eligible.is_empty() => pots.push(SidePot {
                    amount,
                    eligible: (0..self.committed.len()).filter(|&s| is_live(s)).collect(),
                }),
                _ => pots.push(SidePot { amount, eligible }),
            }
        }
        pots
    }

    /// Decide who wins each pot.
    ///
    /// Only eligible seats with an evaluation compete for a pot. Ties split
    /// the pot evenly; the indivisible remainder goes to the first winner
    /// clockwise from the button (the button itself is last in line).
    ///
    /// # Arguments
    ///
    /// * `pots` - Pots as built by [`PotLedger::pots`]
    /// * `evaluations` - Showdown evaluations of live seats
    /// * `button` - Button seat for the remainder rule
    ///
    /// # Returns
    ///
    /// * `BTreeMap<SeatIndex, Usd>` - Chips won per seat (winners only)
    #[must_use]
    pub fn award(
        &self,
        pots: &[SidePot],
        evaluations: &BTreeMap<SeatIndex, HandEvaluation>,
        button: SeatIndex,
    ) -> BTreeMap<SeatIndex, Usd> {
        let num_seats = self.committed.len().max(1);
        let clockwise_distance = |seat: SeatIndex| (seat + num_seats - button - 1) % num_seats;

        let mut winnings: BTreeMap<SeatIndex, Usd> = BTreeMap::new();
        for pot in pots {
            let contenders: Vec<(SeatIndex, &HandEvaluation)> = pot
                .eligible
                .iter()
                .filter_map(|seat| evaluations.get(seat).map(|eval| (*seat, eval)))
                .collect();

            let mut winners: Vec<SeatIndex> = match contenders.iter().map(|(_, e)| *e).max() {
                Some(best) => contenders
                    .iter()
                    .filter(|(_, e)| *e == best)
                    .map(|(seat, _)| *seat)
                    .collect(),
                // No evaluations (uncontested): eligible seats share it.
                None => pot.eligible.iter().copied().collect(),
            };
            if winners.is_empty() {
                log::warn!("pot of ${} has no eligible seats", pot.amount);
                continue;
            }
            winners.sort_by_key(|&seat| clockwise_distance(seat));

            let share = pot.amount / winners.len() as Usd;
            let remainder = pot.amount % winners.len() as Usd;
            for (i, seat) in winners.into_iter().enumerate() {
                let bonus = if i == 0 { remainder } else { 0 };
                *winnings.entry(seat).or_default() += share + bonus;
            }
        }
        winnings
    }
}
