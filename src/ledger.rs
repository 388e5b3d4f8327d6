use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::account::{Account, AccountSnapshot};
use crate::error::{LedgerError, LedgerResult};
use crate::store::{AccountStore, InMemoryStore};

/// How amounts coming from callers are validated before they reach an account.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum AmountPolicy {
    /// Accept any amount, including zero and negative ones. Suspicious amounts
    /// are only logged.
    #[default]
    PassThrough,
    /// Reject non-positive deposits and withdrawals and negative opening balances.
    Strict,
}

impl AmountPolicy {
    // Only called once the account is known to exist, so an unknown id is
    // always reported as such whatever the amount.
    fn check(self, id: &str, amount: Decimal) -> LedgerResult<()> {
        if amount > Decimal::ZERO {
            return Ok(());
        }
        match self {
            AmountPolicy::Strict => Err(LedgerError::InvalidAmount(amount)),
            AmountPolicy::PassThrough => {
                warn!(account = id, %amount, "accepting a non-positive amount");
                Ok(())
            }
        }
    }
}

pub struct Ledger<S = InMemoryStore> {
    store: S,
    policy: AmountPolicy,
}

impl Default for Ledger {
    fn default() -> Self {
        Ledger::with_policy(AmountPolicy::default())
    }
}

impl Ledger<InMemoryStore> {
    pub fn with_policy(policy: AmountPolicy) -> Self {
        Ledger::with_store(InMemoryStore::default(), policy)
    }
}

impl<S: AccountStore> Ledger<S> {
    pub fn with_store(store: S, policy: AmountPolicy) -> Self {
        Ledger { store, policy }
    }

    pub fn create(
        &mut self,
        id: &str,
        holder_name: &str,
        initial_balance: Decimal,
    ) -> LedgerResult<()> {
        if self.store.find(id).is_some() {
            return Err(LedgerError::DuplicateAccount(id.to_string()));
        }
        if initial_balance.is_sign_negative() && !initial_balance.is_zero() {
            match self.policy {
                AmountPolicy::Strict => return Err(LedgerError::InvalidAmount(initial_balance)),
                AmountPolicy::PassThrough => {
                    warn!(account = id, %initial_balance, "opening account with a negative balance")
                }
            }
        }

        self.store.insert(Account::new(id, holder_name, initial_balance));
        debug!(account = id, %initial_balance, "account created");
        Ok(())
    }

    pub fn deposit(&mut self, id: &str, amount: Decimal) -> LedgerResult<Decimal> {
        let policy = self.policy;
        let account = self.account_mut(id)?;
        policy.check(id, amount)?;
        let balance = account.deposit(amount)?;
        debug!(account = id, %amount, %balance, "deposit applied");
        Ok(balance)
    }

    pub fn withdraw(&mut self, id: &str, amount: Decimal) -> LedgerResult<Decimal> {
        let policy = self.policy;
        let account = self.account_mut(id)?;
        policy.check(id, amount)?;
        let balance = account.withdraw(amount)?;
        debug!(account = id, %amount, %balance, "withdrawal applied");
        Ok(balance)
    }

    pub fn inquire(&self, id: &str) -> LedgerResult<AccountSnapshot> {
        self.store
            .find(id)
            .map(Account::inquire)
            .ok_or_else(|| LedgerError::AccountNotFound(id.to_string()))
    }

    pub fn rename(&mut self, id: &str, holder_name: &str) -> LedgerResult<()> {
        self.account_mut(id)?.set_holder_name(holder_name);
        debug!(account = id, holder_name, "holder renamed");
        Ok(())
    }

    /// Snapshots of every account in the order they were created.
    pub fn accounts(&self) -> Vec<AccountSnapshot> {
        self.store.snapshot()
    }

    fn account_mut(&mut self, id: &str) -> LedgerResult<&mut Account> {
        self.store
            .find_mut(id)
            .ok_or_else(|| LedgerError::AccountNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn alice() -> Ledger {
        let mut ledger = Ledger::default();
        ledger.create("A1", "Alice", dec!(100.00)).unwrap();
        ledger
    }

    #[test]
    fn test_create_then_inquire() {
        let ledger = alice();
        assert_eq!(
            ledger.inquire("A1"),
            Ok(AccountSnapshot {
                id: "A1".to_string(),
                holder_name: "Alice".to_string(),
                balance: dec!(100.00),
            })
        );
    }

    #[test]
    fn test_create_duplicate() {
        let mut ledger = alice();
        assert_eq!(
            ledger.create("A1", "Mallory", dec!(5)),
            Err(LedgerError::DuplicateAccount("A1".to_string()))
        );

        let accounts = ledger.accounts();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].holder_name, "Alice");
        assert_eq!(accounts[0].balance, dec!(100.00));
    }

    #[test]
    fn test_walkthrough() {
        let mut ledger = alice();
        assert_eq!(ledger.deposit("A1", dec!(50.00)), Ok(dec!(150.00)));
        assert!(matches!(
            ledger.withdraw("A1", dec!(200.00)),
            Err(LedgerError::InsufficientFunds { .. })
        ));
        assert_eq!(ledger.inquire("A1").unwrap().balance, dec!(150.00));
        assert_eq!(ledger.withdraw("A1", dec!(150.00)), Ok(dec!(0.00)));
    }

    #[test]
    fn test_unknown_account() {
        let mut ledger = alice();
        let not_found = Err(LedgerError::AccountNotFound("B2".to_string()));

        assert_eq!(ledger.deposit("B2", dec!(1)), not_found);
        assert_eq!(ledger.withdraw("B2", dec!(1)), not_found);
        assert_eq!(
            ledger.rename("B2", "Bob"),
            Err(LedgerError::AccountNotFound("B2".to_string()))
        );
        assert_eq!(
            ledger.inquire("B2"),
            Err(LedgerError::AccountNotFound("B2".to_string()))
        );
        assert_eq!(ledger.accounts().len(), 1);
        assert_eq!(ledger.inquire("A1").unwrap().balance, dec!(100.00));
    }

    #[test]
    fn test_rename() {
        let mut ledger = alice();
        ledger.rename("A1", "Alice Smith").unwrap();
        assert_eq!(ledger.inquire("A1").unwrap().holder_name, "Alice Smith");
    }

    #[test]
    fn test_accounts_in_insertion_order() {
        let mut ledger = Ledger::default();
        for id in ["C3", "A1", "B2"] {
            ledger.create(id, "someone", dec!(0)).unwrap();
        }
        let ids: Vec<_> = ledger.accounts().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["C3", "A1", "B2"]);
    }

    #[test]
    fn test_pass_through_accepts_negative_amounts() {
        let mut ledger = alice();
        assert_eq!(ledger.deposit("A1", dec!(-30)), Ok(dec!(70.00)));
        assert_eq!(ledger.withdraw("A1", dec!(-30)), Ok(dec!(100.00)));
        assert_eq!(ledger.create("N1", "Neg", dec!(-5)), Ok(()));
    }

    #[test]
    fn test_strict_rejects_non_positive_amounts() {
        let mut ledger = Ledger::with_policy(AmountPolicy::Strict);
        ledger.create("A1", "Alice", dec!(0)).unwrap();

        assert_eq!(
            ledger.deposit("A1", dec!(0)),
            Err(LedgerError::InvalidAmount(dec!(0)))
        );
        assert_eq!(
            ledger.withdraw("A1", dec!(-1)),
            Err(LedgerError::InvalidAmount(dec!(-1)))
        );
        assert_eq!(
            ledger.create("N1", "Neg", dec!(-5)),
            Err(LedgerError::InvalidAmount(dec!(-5)))
        );
        assert!(ledger.inquire("N1").is_err());
        assert_eq!(ledger.inquire("A1").unwrap().balance, dec!(0));
    }

    #[test]
    fn test_strict_unknown_account_is_not_found() {
        let mut ledger = Ledger::with_policy(AmountPolicy::Strict);
        ledger.create("A1", "Alice", dec!(10)).unwrap();

        assert_eq!(
            ledger.deposit("B2", dec!(0)),
            Err(LedgerError::AccountNotFound("B2".to_string()))
        );
        assert_eq!(
            ledger.withdraw("B2", dec!(-1)),
            Err(LedgerError::AccountNotFound("B2".to_string()))
        );
        assert_eq!(ledger.accounts().len(), 1);
    }

    fn cents() -> impl Strategy<Value = Decimal> {
        (0i64..1_000_000_000_000).prop_map(|value| Decimal::new(value, 2))
    }

    proptest! {
        #[test]
        fn deposit_adds_to_balance(balance in cents(), amount in cents()) {
            let mut ledger = Ledger::default();
            ledger.create("A1", "Alice", balance).unwrap();
            prop_assert_eq!(ledger.deposit("A1", amount), Ok(balance + amount));
        }

        #[test]
        fn withdraw_never_overdraws(balance in cents(), amount in cents()) {
            let mut ledger = Ledger::default();
            ledger.create("A1", "Alice", balance).unwrap();

            let result = ledger.withdraw("A1", amount);
            let after = ledger.inquire("A1").unwrap().balance;
            if amount <= balance {
                prop_assert_eq!(result, Ok(balance - amount));
                prop_assert_eq!(after, balance - amount);
            } else {
                prop_assert!(
                    matches!(result, Err(LedgerError::InsufficientFunds { .. })),
                    "expected insufficient funds"
                );
                prop_assert_eq!(after, balance);
            }
            prop_assert!(after >= Decimal::ZERO);
        }

        #[test]
        fn unknown_id_mutates_nothing(id in "[A-Z][0-9]{1,3}", amount in cents()) {
            prop_assume!(id != "A1");
            let mut ledger = alice();
            let before = ledger.accounts();

            prop_assert!(ledger.deposit(&id, amount).is_err());
            prop_assert!(ledger.withdraw(&id, amount).is_err());
            prop_assert!(ledger.inquire(&id).is_err());
            prop_assert_eq!(ledger.accounts(), before);
        }
    }
}
