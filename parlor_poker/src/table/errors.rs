use thiserror::Error;

use crate::{
    game::{GameError, Phase, entities::Username},
    wallet::WalletError,
};

/// Errors raised while seating players and running hands.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum TableError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error(transparent)]
    Wallet(#[from] WalletError),
    #[error("invalid table config: {0}")]
    InvalidConfig(String),
    #[error("{0} is already seated")]
    SeatTaken(Username),
    #[error("{0} is not seated")]
    UnknownPlayer(Username),
    #[error("table is full")]
    TableFull,
    #[error("a hand is already in progress")]
    HandInProgress,
    #[error("no hand in progress")]
    NoHandInProgress,
    #[error("{0} is not controlled by a human")]
    NotHuman(Username),
    #[error("hand stalled in {0} with no seat to act")]
    Stalled(Phase),
}
