use {
  serde::{Deserialize, Serialize},
  std::collections::BTreeMap,
  zkapp_primitives::{digest, Account, Address, Multihash},
};

/// Represents a change in ledger accounts state.
///
/// A transaction that passes validation produces a statediff holding
/// the complete post-state of every account it touches. Applying that
/// diff to the account store is the only way the store changes, which
/// makes commits all-or-nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDiff {
  upserts: BTreeMap<Address, Account>,
}

impl StateDiff {
  /// Inserts or updates an account under a given address.
  ///
  /// If the state diff had an account stored under this address
  /// then the old value is returned, otherwise `None` is returned.
  pub fn set(
    &mut self,
    address: Address,
    account: Account,
  ) -> Option<Account> {
    self.upserts.insert(address, account)
  }

  /// Iterate over all accounts changed by this diff.
  pub fn iter(&self) -> impl Iterator<Item = (&Address, &Account)> {
    self.upserts.iter()
  }

  pub fn len(&self) -> usize {
    self.upserts.len()
  }

  pub fn is_empty(&self) -> bool {
    self.upserts.is_empty()
  }
}

impl State for StateDiff {
  fn get(&self, address: &Address) -> Option<Account> {
    self.upserts.get(address).cloned()
  }

  fn apply(&mut self, diff: StateDiff) {
    self.upserts.extend(diff.upserts);
  }
}

pub trait State {
  fn get(&self, address: &Address) -> Option<Account>;
  fn apply(&mut self, diff: StateDiff);
}

/// The account store of the local ledger.
///
/// Accounts are kept ordered by address so that the store has a
/// canonical encoding and therefore a well defined state root.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStateStore {
  data: BTreeMap<Address, Account>,
}

impl InMemoryStateStore {
  pub fn iter(&self) -> impl Iterator<Item = (&Address, &Account)> {
    self.data.iter()
  }

  pub fn len(&self) -> usize {
    self.data.len()
  }

  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }

  /// Digest of the entire store. Two stores have the same root iff
  /// they hold identical accounts.
  pub fn root(&self) -> Multihash {
    digest(&self.data)
  }
}

impl State for InMemoryStateStore {
  fn get(&self, address: &Address) -> Option<Account> {
    self.data.get(address).cloned()
  }

  fn apply(&mut self, diff: StateDiff) {
    self.data.extend(diff.upserts);
  }
}
