//! Poker game engine - cards, hand scoring, pots and the betting state
//! machine for a single hand.

pub mod constants;
pub mod entities;
pub mod errors;
pub mod functional;
pub mod pot;
pub mod state_machine;

pub use errors::{ActionReason, GameError};
pub use pot::{PotLedger, SidePot};
pub use state_machine::{GameState, Hand, Payout, Phase, PlayPositions, SeatView, Street};
