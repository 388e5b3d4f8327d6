use anyhow::Context;
use clap::Parser;
use csv::ReaderBuilder;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod account;

mod error;

mod store;

mod ledger;
use ledger::{AmountPolicy, Ledger};

mod request;
use request::{Outcome, Request, dispatch};

mod output;

mod menu;
use menu::Menu;

#[derive(Parser)]
#[command(version, about = "In-memory bank account ledger")]
struct Options {
    /// Replay requests from a CSV file (command,account,holder,amount) and
    /// print the resulting accounts instead of showing the menu
    #[arg(long)]
    script: Option<PathBuf>,

    /// How deposit, withdrawal and opening amounts are validated
    #[arg(long, value_enum, default_value_t = AmountPolicy::PassThrough)]
    amounts: AmountPolicy,
}

// Logs go to stderr so stdout only carries the menu or the account report.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}

fn process_script(ledger: &mut Ledger, path: &Path) -> anyhow::Result<()> {
    let mut reader = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open script {}", path.display()))?;

    for (row, result) in reader.deserialize::<Request>().enumerate() {
        let row = row + 1;
        match result {
            Ok(request) => match dispatch(ledger, request) {
                Ok(Outcome::Exit) => {
                    info!(row, "exit requested, skipping the rest of the script");
                    break;
                }
                Ok(outcome) => info!(row, "{outcome}"),
                // Failed requests are reported and the replay goes on, same as
                // in the interactive menu
                Err(error) => warn!(row, "Request rejected: {error}"),
            },
            Err(deserialization_error) => {
                warn!(row, "Failed to parse request: {deserialization_error}")
            }
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let options = Options::parse();
    let mut ledger = Ledger::with_policy(options.amounts);

    match options.script {
        Some(path) => {
            process_script(&mut ledger, &path)?;
            output::write_accounts(io::stdout(), &ledger.accounts())?;
        }
        None => {
            let stdin = io::stdin();
            Menu::new(stdin.lock(), io::stdout()).run(&mut ledger)?;
        }
    }

    Ok(())
}
