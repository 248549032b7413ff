//! Errors raised by the hand engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::entities::{Action, SeatIndex};

/// Why an action was refused by the betting rules.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ActionReason {
    /// Calling with nothing owed.
    NothingToCall,
    /// Checking while a live bet is unmatched.
    FacingBet,
    /// Opening a bet while a bet already exists; use a raise.
    BetAlreadyOpen,
    /// Raising while no bet exists; use a bet.
    NoBetToRaise,
    /// Total is below the minimum full raise and is not an all-in.
    BelowMinimumRaise,
    /// Total needs more chips than the seat holds.
    ExceedsStack,
    /// An under-raise all-in did not reopen the action for this seat.
    ActionNotReopened,
    /// Bets and raises must move chips.
    ZeroAmount,
}

impl fmt::Display for ActionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::NothingToCall => "nothing to call",
            Self::FacingBet => "facing a bet",
            Self::BetAlreadyOpen => "a bet is already open",
            Self::NoBetToRaise => "no bet to raise",
            Self::BelowMinimumRaise => "below the minimum raise",
            Self::ExceedsStack => "not enough chips",
            Self::ActionNotReopened => "action was not reopened",
            Self::ZeroAmount => "amount must be positive",
        };
        write!(f, "{repr}")
    }
}

/// Errors that can occur while running a hand.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum GameError {
    #[error("seat {seat} can't {action}: {reason}")]
    IllegalAction {
        seat: SeatIndex,
        action: Action,
        reason: ActionReason,
    },
    #[error("not seat {seat}'s turn")]
    OutOfTurn { seat: SeatIndex },
    #[error("deck exhausted")]
    DeckExhausted,
    #[error("need 2+ funded seats, have {funded}")]
    InsufficientSeats { funded: usize },
    #[error("can't evaluate {0} cards (need 5 to 7)")]
    InvalidHandSize(usize),
    #[error("seat {0} does not exist")]
    InvalidSeat(SeatIndex),
    #[error("blinds must be positive with small <= big")]
    InvalidBlinds,
    #[error("table is full")]
    CapacityReached,
    #[error("hand is not at showdown")]
    NotAtShowdown,
    #[error("hand is already complete")]
    HandComplete,
}
