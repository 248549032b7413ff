//! Table module running hands for a set of seated players.
//!
//! This module implements:
//! - Table: seating, buy-ins and cash-outs through the wallet, and the hand
//!   lifecycle from blinds to payout
//! - Seat controllers dispatched with `enum_dispatch` (queued human actions
//!   or the bot policy)
//! - Per-player statistics and table configuration with stakes presets
//!
//! ## Driving a hand
//!
//! [`Table::run`] lets bots act until a human has to decide, then returns
//! [`TableEvent::AwaitingAction`]. Feed the human's choice to
//! [`Table::submit_action`] and call `run` again. A hand that reaches
//! showdown yields [`TableEvent::ShowdownResolved`] before
//! [`TableEvent::HandComplete`].
//!
//! ## Example
//!
//! ```
//! use parlor_poker::bot::roster;
//! use parlor_poker::game::entities::Username;
//! use parlor_poker::table::{Controller, Table, TableConfig, TableEvent};
//! use parlor_poker::wallet::WalletManager;
//!
//! let mut wallet = WalletManager::new();
//! let bots = roster(3);
//! for bot in &bots {
//!     wallet.create_wallet(&Username::new(&bot.name), 1_000).unwrap();
//! }
//!
//! let mut table = Table::with_seed(TableConfig::default(), wallet, 42).unwrap();
//! for bot in bots {
//!     let name = bot.name.clone();
//!     table.join(&name, Controller::bot(bot)).unwrap();
//! }
//!
//! table.start_hand().unwrap();
//! let summary = loop {
//!     if let TableEvent::HandComplete(summary) = table.run().unwrap() {
//!         break summary;
//!     }
//! };
//! assert!(!summary.winners.is_empty());
//! ```

pub mod config;
pub mod controller;
pub mod errors;
pub mod runner;
pub mod stats;

pub use config::{Stakes, TableConfig};
pub use controller::{Bot, Controller, Decision, Human, SeatController};
pub use errors::TableError;
pub use runner::{Departure, HandSummary, Table, TableEvent, TableSeat};
pub use stats::PlayerStats;
