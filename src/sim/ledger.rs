//! Score ledger: one balance, debited per drop and credited per landing

use serde::{Deserialize, Serialize};

/// Drop refusal
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DropError {
    #[error("insufficient score: balance {balance} is below drop cost {cost}")]
    InsufficientScore { balance: u64, cost: u64 },
}

/// The player's score
///
/// The balance is unsigned: a drop is refused rather than taking it negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    balance: u64,
    drop_cost: u64,
}

impl Ledger {
    pub fn new(starting_balance: u64, drop_cost: u64) -> Self {
        Self {
            balance: starting_balance,
            drop_cost,
        }
    }

    /// Current score (read-only for presentation)
    #[inline]
    pub fn balance(&self) -> u64 {
        self.balance
    }

    #[inline]
    pub fn drop_cost(&self) -> u64 {
        self.drop_cost
    }

    /// Whether a drop would currently be admitted
    #[inline]
    pub fn can_afford_drop(&self) -> bool {
        self.balance >= self.drop_cost
    }

    /// Pay for one drop. Leaves the balance untouched on refusal.
    pub fn debit_drop(&mut self) -> Result<(), DropError> {
        if !self.can_afford_drop() {
            return Err(DropError::InsufficientScore {
                balance: self.balance,
                cost: self.drop_cost,
            });
        }
        self.balance -= self.drop_cost;
        Ok(())
    }

    /// Add a landing payout
    pub fn credit(&mut self, amount: u64) {
        self.balance = self.balance.saturating_add(amount);
    }
}
