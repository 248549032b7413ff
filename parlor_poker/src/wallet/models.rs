//! Wallet data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::game::entities::{Usd, Username};

/// Wallet model
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Wallet {
    pub user: Username,
    pub balance: Usd,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Wallet entry model. Every balance change appends exactly one entry.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct WalletEntry {
    pub id: u64,
    pub user: Username,
    pub table: Option<String>,
    pub amount: Usd,
    pub balance_after: Usd,
    pub direction: EntryDirection,
    pub entry_type: EntryType,
    pub idempotency_key: String,
    pub created_at: DateTime<Utc>,
}

/// Entry direction
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryDirection {
    Debit,
    Credit,
}

impl fmt::Display for EntryDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryDirection::Debit => write!(f, "debit"),
            EntryDirection::Credit => write!(f, "credit"),
        }
    }
}

/// Entry type
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    Deposit,
    BuyIn,
    CashOut,
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryType::Deposit => write!(f, "deposit"),
            EntryType::BuyIn => write!(f, "buy_in"),
            EntryType::CashOut => write!(f, "cash_out"),
        }
    }
}

impl fmt::Display for WalletEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = match self.direction {
            EntryDirection::Debit => '-',
            EntryDirection::Credit => '+',
        };
        write!(
            f,
            "#{} {} {} {sign}${} (balance ${})",
            self.id, self.user, self.entry_type, self.amount, self.balance_after
        )
    }
}
