//! # Parlor Poker
//!
//! A Texas Hold'em engine: shuffled decks, hand evaluation, a per-hand
//! betting state machine with exact side pots, and heuristic bots.
//!
//! ## Architecture
//!
//! A hand moves through six phases:
//!
//! - **Preflop**: Blinds posted, hole cards dealt, first betting round
//! - **Flop/Turn/River**: Burn and reveal, then another betting round
//! - **Showdown**: Live hands are scored and every pot is split
//! - **Complete**: Chips are back in the stacks
//!
//! A hand that folds down to one player skips straight to complete. When
//! every remaining player is all-in the board runs out without betting.
//!
//! ## Core Modules
//!
//! - [`game`]: Cards, the evaluator, the pot ledger and the hand state machine
//! - [`bot`]: Bot play styles and the decision maker
//! - [`wallet`]: In-memory wallets with an append-only ledger
//! - [`table`]: Seats, controllers and the hand lifecycle
//!
//! ## Example
//!
//! ```
//! use parlor_poker::functional::{Category, evaluate};
//! use parlor_poker::entities::{Card, Suit};
//!
//! let cards = [
//!     Card(14, Suit::Spade),
//!     Card(13, Suit::Spade),
//!     Card(12, Suit::Spade),
//!     Card(11, Suit::Spade),
//!     Card(10, Suit::Spade),
//!     Card(2, Suit::Heart),
//!     Card(3, Suit::Club),
//! ];
//! let evaluation = evaluate(&cards).unwrap();
//! assert_eq!(evaluation.category, Category::RoyalFlush);
//! ```

/// Core game logic, entities, and state machine.
pub mod game;
pub use game::{
    GameError, GameState, Hand, Payout, Phase, PotLedger, Street,
    constants::{self, MAX_PLAYERS},
    entities, functional,
};

/// Bot play styles and decisions.
pub mod bot;

/// Chip accounting outside the table.
pub mod wallet;

/// Seating and the hand lifecycle.
pub mod table;
pub use table::{Controller, Table, TableConfig, TableError, TableEvent};
