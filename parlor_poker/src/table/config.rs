//! Table configuration models.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::TableError;
use crate::game::{
    constants::{BURN_CARDS, BOARD_CARDS, CARDS_PER_SET, HOLE_CARDS, MAX_PLAYERS},
    entities::{Blinds, Usd},
};

/// Named blind level with its buy-in.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Stakes {
    pub name: String,
    pub blinds: Blinds,
    pub buy_in: Usd,
}

/// (name, small blind, big blind, buy-in). Chips are quarter dollars so the
/// smallest level has a whole small blind.
const STAKES_PRESETS: [(&str, Usd, Usd, Usd); 7] = [
    ("micro", 1, 2, 200),
    ("low", 2, 4, 400),
    ("small", 4, 8, 800),
    ("medium", 10, 20, 2000),
    ("high", 20, 40, 4000),
    ("premium", 50, 100, 10_000),
    ("nosebleed", 100, 200, 20_000),
];

impl Stakes {
    /// Every preset, smallest first.
    #[must_use]
    pub fn presets() -> Vec<Self> {
        STAKES_PRESETS
            .iter()
            .map(|&(name, small, big, buy_in)| Self {
                name: name.to_string(),
                blinds: Blinds::new(small, big),
                buy_in,
            })
            .collect()
    }

    /// Look up a preset by name, ignoring case.
    #[must_use]
    pub fn preset(name: &str) -> Option<Self> {
        Self::presets()
            .into_iter()
            .find(|stakes| stakes.name.eq_ignore_ascii_case(name))
    }

    /// Buy-in measured in big blinds.
    #[must_use]
    pub fn buy_in_bb(&self) -> Usd {
        self.buy_in / self.blinds.big.max(1)
    }
}

impl Default for Stakes {
    fn default() -> Self {
        let (name, small, big, buy_in) = STAKES_PRESETS[0];
        Self {
            name: name.to_string(),
            blinds: Blinds::new(small, big),
            buy_in,
        }
    }
}

impl fmt::Display for Stakes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, buy-in ${})", self.name, self.blinds, self.buy_in)
    }
}

/// Table configuration
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TableConfig {
    /// Table name, also written on wallet ledger entries
    pub name: String,

    /// Maximum number of seats (default: 6)
    ///
    /// **Range**: 2 to 10
    pub max_players: usize,

    /// Blind level and buy-in
    pub stakes: Stakes,

    /// Number of 52-card sets shuffled into the deck (default: 1)
    ///
    /// **Effect**: More sets allow duplicate cards; one set is standard play.
    pub deck_sets: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            name: "Default Table".to_string(),
            max_players: 6,
            stakes: Stakes::default(),
            deck_sets: 1,
        }
    }
}

impl TableConfig {
    /// Validate configuration
    ///
    /// # Errors
    ///
    /// * `TableError::InvalidConfig` - Describes the first broken rule
    pub fn validate(&self) -> Result<(), TableError> {
        if !self.stakes.blinds.is_valid() {
            return Err(TableError::InvalidConfig(format!(
                "blinds {} must be positive with small <= big",
                self.stakes.blinds
            )));
        }

        if self.stakes.buy_in < self.stakes.blinds.big {
            return Err(TableError::InvalidConfig(
                "buy-in must cover at least one big blind".to_string(),
            ));
        }

        if !(2..=MAX_PLAYERS).contains(&self.max_players) {
            return Err(TableError::InvalidConfig(format!(
                "max players must be between 2 and {MAX_PLAYERS}"
            )));
        }

        let needed = HOLE_CARDS * self.max_players + BOARD_CARDS + BURN_CARDS;
        if self.deck_sets == 0 || CARDS_PER_SET * self.deck_sets < needed {
            return Err(TableError::InvalidConfig(format!(
                "{} deck set(s) can't deal {} seats",
                self.deck_sets, self.max_players
            )));
        }

        Ok(())
    }
}
