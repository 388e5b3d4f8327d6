use std::io::{BufRead, Write};
use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::debug;

use crate::ledger::Ledger;
use crate::request::{Outcome, Request, dispatch};
use crate::store::AccountStore;

const MENU: &str = "\
Bank Account Management System
1. Create Account
2. Deposit
3. Withdraw
4. Inquire Balance
5. Exit";

const INVALID_CHOICE: &str = "Invalid choice. Please enter a valid option.";
const INVALID_AMOUNT: &str = "Invalid amount. Please enter a numeric value.";

enum Entry {
    Request(Request),
    Rejected(&'static str),
    // input ran out before the entry was complete
    Closed,
}

/// Line oriented front end: prints the menu, collects the fields of one
/// operation and hands it to the ledger, until told to exit or input ends.
pub struct Menu<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Menu { input, output }
    }

    pub fn run<S: AccountStore>(&mut self, ledger: &mut Ledger<S>) -> anyhow::Result<()> {
        loop {
            writeln!(self.output, "{MENU}")?;

            match self.read_entry()? {
                Entry::Closed => return Ok(()),
                Entry::Rejected(message) => writeln!(self.output, "{message}")?,
                Entry::Request(request) => match dispatch(ledger, request) {
                    Ok(outcome @ Outcome::Exit) => {
                        writeln!(self.output, "{outcome}")?;
                        return Ok(());
                    }
                    Ok(outcome) => writeln!(self.output, "{outcome}")?,
                    Err(error) => {
                        debug!(%error, "request failed");
                        writeln!(self.output, "{error}")?
                    }
                },
            }

            writeln!(self.output)?;
        }
    }

    fn read_entry(&mut self) -> anyhow::Result<Entry> {
        let Some([choice]) = self.ask(["Enter your choice: "])? else {
            return Ok(Entry::Closed);
        };

        let entry = match choice.parse::<u8>() {
            Ok(1) => {
                let Some([id, holder_name, balance]) = self.ask([
                    "Enter account number: ",
                    "Enter account holder name: ",
                    "Enter initial balance: ",
                ])?
                else {
                    return Ok(Entry::Closed);
                };
                match parse_amount(&balance) {
                    Some(initial_balance) => Entry::Request(Request::Create {
                        id,
                        holder_name,
                        initial_balance,
                    }),
                    None => Entry::Rejected(INVALID_AMOUNT),
                }
            }
            Ok(2) => {
                let Some([id, amount]) =
                    self.ask(["Enter account number: ", "Enter deposit amount: "])?
                else {
                    return Ok(Entry::Closed);
                };
                match parse_amount(&amount) {
                    Some(amount) => Entry::Request(Request::Deposit { id, amount }),
                    None => Entry::Rejected(INVALID_AMOUNT),
                }
            }
            Ok(3) => {
                let Some([id, amount]) =
                    self.ask(["Enter account number: ", "Enter withdrawal amount: "])?
                else {
                    return Ok(Entry::Closed);
                };
                match parse_amount(&amount) {
                    Some(amount) => Entry::Request(Request::Withdraw { id, amount }),
                    None => Entry::Rejected(INVALID_AMOUNT),
                }
            }
            Ok(4) => {
                let Some([id]) = self.ask(["Enter account number: "])? else {
                    return Ok(Entry::Closed);
                };
                Entry::Request(Request::Inquire { id })
            }
            Ok(5) => Entry::Request(Request::Exit),
            _ => Entry::Rejected(INVALID_CHOICE),
        };

        Ok(entry)
    }

    /// Prompts for each label in turn. `None` once input is exhausted.
    fn ask<const N: usize>(&mut self, labels: [&str; N]) -> anyhow::Result<Option<[String; N]>> {
        let mut answers = Vec::with_capacity(N);
        for label in labels {
            write!(self.output, "{label}")?;
            self.output.flush()?;

            // bytes rather than `read_line` so a stray non UTF-8 byte is
            // replaced instead of ending the session
            let mut line = Vec::new();
            if self.input.read_until(b'\n', &mut line)? == 0 {
                return Ok(None);
            }
            answers.push(String::from_utf8_lossy(&line).trim().to_string());
        }

        Ok(answers.try_into().ok())
    }
}

fn parse_amount(text: &str) -> Option<Decimal> {
    Decimal::from_str(text).ok()
}
