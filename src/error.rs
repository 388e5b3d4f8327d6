use rust_decimal::Decimal;
use thiserror::Error;

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Failures reported back to whoever issued the request. None of these are fatal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Account number is not unique. Please choose a different account number.")]
    DuplicateAccount(String),

    #[error("Account {0} does not exist.")]
    AccountNotFound(String),

    #[error("Insufficient funds!")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },

    #[error("Amount must be positive, got {0}.")]
    InvalidAmount(Decimal),

    #[error("Amount is out of the representable range.")]
    AmountOverflow,
}
