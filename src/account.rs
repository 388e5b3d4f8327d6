use rust_decimal::Decimal;

use crate::error::{LedgerError, LedgerResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    id: String,
    holder_name: String,
    balance: Decimal,
}

/// Read-only view of an account at the moment it was taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSnapshot {
    pub id: String,
    pub holder_name: String,
    pub balance: Decimal,
}

impl Account {
    pub fn new(
        id: impl Into<String>,
        holder_name: impl Into<String>,
        initial_balance: Decimal,
    ) -> Self {
        Account {
            id: id.into(),
            holder_name: holder_name.into(),
            balance: initial_balance,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_holder_name(&mut self, holder_name: impl Into<String>) {
        self.holder_name = holder_name.into();
    }

    /// Adds `amount` as is and returns the new balance. The sign of `amount` is
    /// not checked here, callers decide on a validation policy.
    pub fn deposit(&mut self, amount: Decimal) -> LedgerResult<Decimal> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::AmountOverflow)?;
        Ok(self.balance)
    }

    pub fn withdraw(&mut self, amount: Decimal) -> LedgerResult<Decimal> {
        if amount > self.balance {
            return Err(LedgerError::InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }
        // a negative amount passes the check above and grows the balance,
        // which can still overflow
        self.balance = self
            .balance
            .checked_sub(amount)
            .ok_or(LedgerError::AmountOverflow)?;
        Ok(self.balance)
    }

    pub fn inquire(&self) -> AccountSnapshot {
        AccountSnapshot {
            id: self.id.clone(),
            holder_name: self.holder_name.clone(),
            balance: self.balance,
        }
    }
}
