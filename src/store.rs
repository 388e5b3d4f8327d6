use crate::account::{Account, AccountSnapshot};

/// Where the ledger keeps its accounts. Uniqueness of ids is enforced by the
/// ledger, a store only has to find and keep what it is given.
pub trait AccountStore {
    fn find(&self, id: &str) -> Option<&Account>;
    fn find_mut(&mut self, id: &str) -> Option<&mut Account>;
    fn insert(&mut self, account: Account);
    /// All accounts in insertion order.
    fn snapshot(&self) -> Vec<AccountSnapshot>;
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    accounts: Vec<Account>,
}

impl AccountStore for InMemoryStore {
    fn find(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|account| account.id() == id)
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|account| account.id() == id)
    }

    fn insert(&mut self, account: Account) {
        self.accounts.push(account);
    }

    fn snapshot(&self) -> Vec<AccountSnapshot> {
        self.accounts.iter().map(Account::inquire).collect()
    }
}
