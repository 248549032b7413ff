//! In-memory wallet manager with an append-only ledger.

use chrono::Utc;
use log::debug;
use std::collections::{HashMap, HashSet};

use super::{
    errors::{WalletError, WalletResult},
    models::{EntryDirection, EntryType, Wallet, WalletEntry},
};
use crate::game::entities::{Usd, Username};

/// Wallet manager
#[derive(Debug, Default)]
pub struct WalletManager {
    wallets: HashMap<Username, Wallet>,
    entries: Vec<WalletEntry>,
    used_keys: HashSet<String>,
}

impl WalletManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a wallet with an initial deposit.
    ///
    /// # Arguments
    ///
    /// * `user` - Wallet owner
    /// * `initial_balance` - Chips deposited on creation (may be zero)
    ///
    /// # Returns
    ///
    /// * `WalletResult<&Wallet>` - The new wallet
    ///
    /// # Errors
    ///
    /// * `WalletError::WalletAlreadyExists` - The user already has a wallet
    pub fn create_wallet(&mut self, user: &Username, initial_balance: Usd) -> WalletResult<&Wallet> {
        if self.wallets.contains_key(user) {
            return Err(WalletError::WalletAlreadyExists(user.clone()));
        }
        let now = Utc::now();
        self.wallets.insert(
            user.clone(),
            Wallet {
                user: user.clone(),
                balance: initial_balance,
                created_at: now,
                updated_at: now,
            },
        );
        if initial_balance > 0 {
            let key = format!("deposit:{user}:{}", self.entries.len());
            self.record(
                user,
                None,
                initial_balance,
                initial_balance,
                EntryDirection::Credit,
                EntryType::Deposit,
                key,
            );
        }
        self.wallet(user)
    }

    /// Get wallet for a user
    ///
    /// # Errors
    ///
    /// * `WalletError::WalletNotFound` - No wallet for the user
    pub fn wallet(&self, user: &Username) -> WalletResult<&Wallet> {
        self.wallets
            .get(user)
            .ok_or_else(|| WalletError::WalletNotFound(user.clone()))
    }

    /// Get wallet balance for a user
    ///
    /// # Errors
    ///
    /// * `WalletError::WalletNotFound` - No wallet for the user
    pub fn balance(&self, user: &Username) -> WalletResult<Usd> {
        self.wallet(user).map(|w| w.balance)
    }

    /// Transfer chips from a user's wallet to a table (buy-in)
    ///
    /// Nothing changes unless every check passes.
    ///
    /// # Arguments
    ///
    /// * `user` - Wallet owner
    /// * `table` - Table name, kept on the ledger entry
    /// * `amount` - Amount to transfer
    /// * `idempotency_key` - Unique key to prevent duplicate transactions
    ///
    /// # Returns
    ///
    /// * `WalletResult<Usd>` - New wallet balance or error
    ///
    /// # Errors
    ///
    /// * `WalletError::InvalidAmount` - Zero amount
    /// * `WalletError::DuplicateTransaction` - Idempotency key already used
    /// * `WalletError::InsufficientBalance` - Not enough chips
    pub fn transfer_to_table(
        &mut self,
        user: &Username,
        table: &str,
        amount: Usd,
        idempotency_key: String,
    ) -> WalletResult<Usd> {
        self.check_transfer(amount, &idempotency_key)?;
        let wallet = self
            .wallets
            .get_mut(user)
            .ok_or_else(|| WalletError::WalletNotFound(user.clone()))?;
        if wallet.balance < amount {
            return Err(WalletError::InsufficientBalance {
                available: wallet.balance,
                required: amount,
            });
        }
        wallet.balance -= amount;
        wallet.updated_at = Utc::now();
        let new_balance = wallet.balance;

        self.record(
            user,
            Some(table),
            amount,
            new_balance,
            EntryDirection::Debit,
            EntryType::BuyIn,
            idempotency_key,
        );
        debug!("{user} bought in to {table} for ${amount}");
        Ok(new_balance)
    }

    /// Transfer chips from a table back to a user's wallet (cash-out)
    ///
    /// # Arguments
    ///
    /// * `user` - Wallet owner
    /// * `table` - Table name, kept on the ledger entry
    /// * `amount` - Amount to transfer
    /// * `idempotency_key` - Unique key to prevent duplicate transactions
    ///
    /// # Returns
    ///
    /// * `WalletResult<Usd>` - New wallet balance or error
    ///
    /// # Errors
    ///
    /// * `WalletError::InvalidAmount` - Zero amount
    /// * `WalletError::DuplicateTransaction` - Idempotency key already used
    /// * `WalletError::BalanceOverflow` - Credit doesn't fit the balance
    pub fn transfer_from_table(
        &mut self,
        user: &Username,
        table: &str,
        amount: Usd,
        idempotency_key: String,
    ) -> WalletResult<Usd> {
        self.check_transfer(amount, &idempotency_key)?;
        let wallet = self
            .wallets
            .get_mut(user)
            .ok_or_else(|| WalletError::WalletNotFound(user.clone()))?;
        let new_balance = wallet
            .balance
            .checked_add(amount)
            .ok_or(WalletError::BalanceOverflow)?;
        wallet.balance = new_balance;
        wallet.updated_at = Utc::now();

        self.record(
            user,
            Some(table),
            amount,
            new_balance,
            EntryDirection::Credit,
            EntryType::CashOut,
            idempotency_key,
        );
        debug!("{user} cashed out ${amount} from {table}");
        Ok(new_balance)
    }

    /// Every ledger entry in the order it was written.
    #[must_use]
    pub fn entries(&self) -> &[WalletEntry] {
        &self.entries
    }

    pub fn entries_for<'a>(&'a self, user: &'a Username) -> impl Iterator<Item = &'a WalletEntry> {
        self.entries.iter().filter(move |entry| &entry.user == user)
    }

    fn check_transfer(&self, amount: Usd, idempotency_key: &str) -> WalletResult<()> {
        if amount == 0 {
            return Err(WalletError::InvalidAmount(amount));
        }
        if self.used_keys.contains(idempotency_key) {
            return Err(WalletError::DuplicateTransaction(idempotency_key.to_string()));
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn record(
        &mut self,
        user: &Username,
        table: Option<&str>,
        amount: Usd,
        balance_after: Usd,
        direction: EntryDirection,
        entry_type: EntryType,
        idempotency_key: String,
    ) {
        self.used_keys.insert(idempotency_key.clone());
        self.entries.push(WalletEntry {
            id: self.entries.len() as u64 + 1,
            user: user.clone(),
            table: table.map(str::to_string),
            amount,
            balance_after,
            direction,
            entry_type,
            idempotency_key,
            created_at: Utc::now(),
        });
    }
}
