//! Bot module providing scripted opponents with play-style presets.
//!
//! This module implements:
//! - BotDecisionMaker: one decision function shared by every style
//! - Play-style presets (GTO, Tight, Loose, Maniac) as a data table
//! - Table positions and their preflop thresholds
//! - The default bot roster
//!
//! ## Play Styles
//!
//! | Style  | Aggression | Tightness | Bluff frequency |
//! |--------|-----------:|----------:|----------------:|
//! | GTO    | 0.70       | 0.60      | 0.25            |
//! | Tight  | 0.50       | 0.80      | 0.10            |
//! | Loose  | 0.80       | 0.30      | 0.40            |
//! | Maniac | 0.95       | 0.20      | 0.60            |
//!
//! ## Example
//!
//! ```
//! use parlor_poker::bot::{BotDecisionContext, BotDecisionMaker, PlayStyle, Position};
//! use parlor_poker::game::entities::{Action, ActionChoices, Card, Suit};
//!
//! let mut maker = BotDecisionMaker::with_seed(7);
//! let hole = [Card(7, Suit::Club), Card(2, Suit::Diamond)];
//! let ctx = BotDecisionContext {
//!     hole_cards: &hole,
//!     board_cards: &[],
//!     pot_size: 30,
//!     current_bet: 20,
//!     choices: Some(ActionChoices {
//!         to_call: 20,
//!         call_amount: 20,
//!         can_check: false,
//!         raise_range: None,
//!     }),
//!     position: Position::UnderTheGun,
//!     opponents: 5,
//! };
//! let action = maker.decide(&PlayStyle::Tight.profile(), &ctx).unwrap();
//! assert_eq!(action, Action::Fold);
//! ```

pub mod decision;
pub mod models;

pub use decision::{BotDecisionConfig, BotDecisionContext, BotDecisionMaker, BotError};
pub use models::{BotConfig, BotProfile, PlayStyle, Position, STYLE_PROFILES, roster};
