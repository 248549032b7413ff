//! Wallet module: the bankroll collaborator that funds table buy-ins and
//! receives cash-outs.
//!
//! This module implements:
//! - An append-only ledger of wallet entries
//! - Idempotency keys to prevent duplicate transactions
//! - Balance checks before any mutation
//!
//! ## Example
//!
//! ```
//! use parlor_poker::game::entities::Username;
//! use parlor_poker::wallet::WalletManager;
//!
//! let mut wallets = WalletManager::new();
//! let alice = Username::new("alice");
//! wallets.create_wallet(&alice, 1000).unwrap();
//!
//! let balance = wallets
//!     .transfer_to_table(&alice, "main", 400, "buy_in:alice:1".to_string())
//!     .unwrap();
//! assert_eq!(balance, 600);
//! ```

pub mod errors;
pub mod manager;
pub mod models;

pub use errors::{WalletError, WalletResult};
pub use manager::WalletManager;
pub use models::{EntryDirection, EntryType, Wallet, WalletEntry};
