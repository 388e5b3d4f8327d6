use std::io;

use csv::Writer;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};

use crate::account::AccountSnapshot;

fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount the way it is shown to a person, e.g. `$1.50` or `-$3.00`.
pub fn money(value: Decimal) -> String {
    let rounded = round_cents(value);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${:.2}", rounded.abs())
}

fn serialize_decimal_2dp<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format!("{:.2}", round_cents(*value)))
}

#[derive(Debug, Serialize)]
pub struct AccountRow<'a> {
    pub account: &'a str,

    pub holder: &'a str,

    #[serde(serialize_with = "serialize_decimal_2dp")]
    pub balance: Decimal,
}

impl<'a> From<&'a AccountSnapshot> for AccountRow<'a> {
    fn from(snapshot: &'a AccountSnapshot) -> Self {
        AccountRow {
            account: &snapshot.id,
            holder: &snapshot.holder_name,
            balance: snapshot.balance,
        }
    }
}

pub fn write_accounts<W: io::Write>(
    writer: W,
    accounts: &[AccountSnapshot],
) -> anyhow::Result<()> {
    let mut writer = Writer::from_writer(writer);
    for account in accounts {
        writer.serialize(AccountRow::from(account))?;
    }
    writer.flush()?;

    Ok(())
}
