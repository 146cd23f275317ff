//! Wallet gateway to the external economy backend.
//!
//! The clan bank never holds real spendable currency; deposits debit
//! the player's wallet and withdrawals credit it back. When no backend
//! is hooked, deposit and withdraw are disabled rather than crashing.

use std::collections::HashMap;
use thiserror::Error;

/// Errors from the wallet backend.
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds { balance: i64, requested: i64 },

    #[error("economy backend unavailable: {0}")]
    Unavailable(String),
}

/// A player's spendable currency balance, held by an external service.
pub trait WalletGateway: Send {
    /// Current spendable balance.
    fn balance(&self, player: &str) -> Result<i64, WalletError>;

    /// Remove `amount` from the player's wallet.
    fn debit(&mut self, player: &str, amount: i64) -> Result<(), WalletError>;

    /// Add `amount` to the player's wallet.
    fn credit(&mut self, player: &str, amount: i64) -> Result<(), WalletError>;
}

/// In-memory wallet for tests and offline development.
#[derive(Debug, Default)]
pub struct MockWallet {
    balances: HashMap<String, i64>,
}

impl MockWallet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a starting balance.
    pub fn with_balance(mut self, player: impl Into<String>, amount: i64) -> Self {
        self.balances.insert(player.into(), amount);
        self
    }
}

impl WalletGateway for MockWallet {
    fn balance(&self, player: &str) -> Result<i64, WalletError> {
        Ok(self.balances.get(player).copied().unwrap_or(0))
    }

    fn debit(&mut self, player: &str, amount: i64) -> Result<(), WalletError> {
        let balance = self.balances.entry(player.to_string()).or_insert(0);
        if *balance < amount {
            return Err(WalletError::InsufficientFunds {
                balance: *balance,
                requested: amount,
            });
        }
        *balance -= amount;
        Ok(())
    }

    fn credit(&mut self, player: &str, amount: i64) -> Result<(), WalletError> {
        *self.balances.entry(player.to_string()).or_insert(0) += amount;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_player_has_zero_balance() {
        let wallet = MockWallet::new();
        assert_eq!(wallet.balance("Avia").unwrap(), 0);
    }

    #[test]
    fn test_debit_and_credit() {
        let mut wallet = MockWallet::new().with_balance("Avia", 1_000);

        wallet.debit("Avia", 400).unwrap();
        assert_eq!(wallet.balance("Avia").unwrap(), 600);

        wallet.credit("Avia", 50).unwrap();
        assert_eq!(wallet.balance("Avia").unwrap(), 650);
    }

    #[test]
    fn test_debit_rejects_overdraft() {
        let mut wallet = MockWallet::new().with_balance("Avia", 10);

        let err = wallet.debit("Avia", 11).unwrap_err();
        assert!(matches!(
            err,
            WalletError::InsufficientFunds {
                balance: 10,
                requested: 11
            }
        ));
        // Balance untouched on failure.
        assert_eq!(wallet.balance("Avia").unwrap(), 10);
    }
}
