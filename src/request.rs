use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, de::Deserializer};

use crate::account::AccountSnapshot;
use crate::error::LedgerResult;
use crate::ledger::Ledger;
use crate::output::money;
use crate::store::AccountStore;

/// A fully parsed operation, whatever front end it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Create {
        id: String,
        holder_name: String,
        initial_balance: Decimal,
    },
    Deposit {
        id: String,
        amount: Decimal,
    },
    Withdraw {
        id: String,
        amount: Decimal,
    },
    Inquire {
        id: String,
    },
    Rename {
        id: String,
        holder_name: String,
    },
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created,
    Deposited { amount: Decimal, balance: Decimal },
    Withdrawn { amount: Decimal, balance: Decimal },
    Balance(AccountSnapshot),
    Renamed { holder_name: String },
    Exit,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Created => write!(f, "Account created successfully."),
            Outcome::Deposited { amount, balance } => write!(
                f,
                "Deposited {}. New balance: {}",
                money(*amount),
                money(*balance)
            ),
            Outcome::Withdrawn { amount, balance } => write!(
                f,
                "Withdrawn {}. New balance: {}",
                money(*amount),
                money(*balance)
            ),
            Outcome::Balance(snapshot) => {
                writeln!(f, "Account Number: {}", snapshot.id)?;
                writeln!(f, "Account Holder: {}", snapshot.holder_name)?;
                write!(f, "Balance: {}", money(snapshot.balance))
            }
            Outcome::Renamed { holder_name } => {
                write!(f, "Account holder changed to {holder_name}.")
            }
            Outcome::Exit => write!(f, "Goodbye."),
        }
    }
}

/// Applies a single request to the ledger.
pub fn dispatch<S: AccountStore>(
    ledger: &mut Ledger<S>,
    request: Request,
) -> LedgerResult<Outcome> {
    match request {
        Request::Create {
            id,
            holder_name,
            initial_balance,
        } => {
            ledger.create(&id, &holder_name, initial_balance)?;
            Ok(Outcome::Created)
        }
        Request::Deposit { id, amount } => {
            let balance = ledger.deposit(&id, amount)?;
            Ok(Outcome::Deposited { amount, balance })
        }
        Request::Withdraw { id, amount } => {
            let balance = ledger.withdraw(&id, amount)?;
            Ok(Outcome::Withdrawn { amount, balance })
        }
        Request::Inquire { id } => ledger.inquire(&id).map(Outcome::Balance),
        Request::Rename { id, holder_name } => {
            ledger.rename(&id, &holder_name)?;
            Ok(Outcome::Renamed { holder_name })
        }
        Request::Exit => Ok(Outcome::Exit),
    }
}

/// CSV rows look like `command,account,holder,amount`; unused columns stay empty.
impl<'de> Deserialize<'de> for Request {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RequestCSVRow {
            command: String,
            account: Option<String>,
            holder: Option<String>,
            // kept as text so the decimal is parsed exactly, not through a float
            amount: Option<String>,
        }

        impl RequestCSVRow {
            fn required(&self, value: &Option<String>, field: &str) -> Result<String, String> {
                match value {
                    Some(value) if !value.is_empty() => Ok(value.clone()),
                    _ => Err(format!("{} requires {field}", self.command)),
                }
            }

            fn forbidden(&self, value: &Option<String>, field: &str) -> Result<(), String> {
                match value {
                    Some(value) if !value.is_empty() => {
                        Err(format!("{} must not have {field}", self.command))
                    }
                    _ => Ok(()),
                }
            }

            fn amount(&self) -> Result<Decimal, String> {
                let text = self.required(&self.amount, "amount")?;
                Decimal::from_str(&text)
                    .map_err(|error| format!("invalid amount {text:?}: {error}"))
            }

            fn into_request(self) -> Result<Request, String> {
                let request = match self.command.to_ascii_lowercase().as_str() {
                    "create" => Request::Create {
                        id: self.required(&self.account, "account")?,
                        holder_name: self.required(&self.holder, "holder")?,
                        initial_balance: self.amount()?,
                    },
                    "deposit" => {
                        self.forbidden(&self.holder, "holder")?;
                        Request::Deposit {
                            id: self.required(&self.account, "account")?,
                            amount: self.amount()?,
                        }
                    }
                    "withdraw" => {
                        self.forbidden(&self.holder, "holder")?;
                        Request::Withdraw {
                            id: self.required(&self.account, "account")?,
                            amount: self.amount()?,
                        }
                    }
                    "inquire" => {
                        self.forbidden(&self.holder, "holder")?;
                        self.forbidden(&self.amount, "amount")?;
                        Request::Inquire {
                            id: self.required(&self.account, "account")?,
                        }
                    }
                    "rename" => {
                        self.forbidden(&self.amount, "amount")?;
                        Request::Rename {
                            id: self.required(&self.account, "account")?,
                            holder_name: self.required(&self.holder, "holder")?,
                        }
                    }
                    "exit" => Request::Exit,
                    _ => return Err(format!("unknown command: {}", self.command)),
                };
                Ok(request)
            }
        }

        RequestCSVRow::deserialize(deserializer)?
            .into_request()
            .map_err(serde::de::Error::custom)
    }
}
