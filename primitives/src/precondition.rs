use {
  crate::{Account, Field},
  serde::{Deserialize, Serialize},
};

/// The slice of chain-wide state a precondition may look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkView {
  /// Height of the ledger head the transaction is validated against.
  pub height: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClosedInterval<T> {
  pub lower: T,
  pub upper: T,
}

impl<T: PartialOrd> ClosedInterval<T> {
  pub fn new(lower: T, upper: T) -> Self {
    Self { lower, upper }
  }

  pub fn contains(&self, value: &T) -> bool {
    &self.lower <= value && value <= &self.upper
  }
}

impl<T: PartialOrd + Copy> ClosedInterval<T> {
  pub fn exactly(value: T) -> Self {
    Self::new(value, value)
  }
}

/// A single check against the target account or the ledger.
///
/// Account conditions never hold for an account that does not exist,
/// except `IsNew(true)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
  StateEquals { index: usize, value: Field },
  BalanceWithin(ClosedInterval<u64>),
  NonceWithin(ClosedInterval<u32>),
  IsNew(bool),
  HeightWithin(ClosedInterval<u64>),
  /// `height % modulus == remainder`, never true for a zero modulus.
  HeightModulo { modulus: u64, remainder: u64 },
}

impl Condition {
  pub fn evaluate(
    &self,
    account: Option<&Account>,
    network: &NetworkView,
  ) -> bool {
    match self {
      Condition::StateEquals { index, value } => account
        .and_then(|acc| acc.app_state.get(*index))
        .map(|current| current == value)
        .unwrap_or(false),
      Condition::BalanceWithin(range) => {
        account.map(|acc| range.contains(&acc.balance)).unwrap_or(false)
      }
      Condition::NonceWithin(range) => {
        account.map(|acc| range.contains(&acc.nonce)).unwrap_or(false)
      }
      Condition::IsNew(expected) => account.is_none() == *expected,
      Condition::HeightWithin(range) => range.contains(&network.height),
      Condition::HeightModulo { modulus, remainder } => {
        *modulus != 0 && network.height % modulus == *remainder
      }
    }
  }
}

/// A Boolean Expressions Tree of conditions attached to an account update.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Precondition {
  Id(Condition),
  Not(Box<Precondition>),
  And(Box<Precondition>, Box<Precondition>),
  Or(Box<Precondition>, Box<Precondition>),
}

impl Precondition {
  pub fn and(self, other: Precondition) -> Self {
    Precondition::And(Box::new(self), Box::new(other))
  }

  pub fn or(self, other: Precondition) -> Self {
    Precondition::Or(Box::new(self), Box::new(other))
  }

  pub fn negate(self) -> Self {
    Precondition::Not(Box::new(self))
  }

  /// Evaluates the tree, short-circuiting `And` and `Or`.
  pub fn evaluate(
    &self,
    account: Option<&Account>,
    network: &NetworkView,
  ) -> bool {
    match self {
      Precondition::Id(cond) => cond.evaluate(account, network),
      Precondition::Not(inner) => !inner.evaluate(account, network),
      Precondition::And(l, r) => {
        l.evaluate(account, network) && r.evaluate(account, network)
      }
      Precondition::Or(l, r) => {
        l.evaluate(account, network) || r.evaluate(account, network)
      }
    }
  }

  /// Applies a function to all conditions in the tree.
  pub fn for_each<F>(&self, op: &mut F)
  where
    F: FnMut(&Condition),
  {
    match self {
      Precondition::Id(c) => op(c),
      Precondition::Not(pt) => pt.for_each(op),
      Precondition::And(l, r) | Precondition::Or(l, r) => {
        l.for_each(op);
        r.for_each(op);
      }
    };
  }
}

impl From<Condition> for Precondition {
  fn from(cond: Condition) -> Self {
    Precondition::Id(cond)
  }
}
