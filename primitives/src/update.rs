use {
  crate::{
    digest,
    Address,
    AppState,
    Field,
    Permissions,
    Precondition,
    Proof,
    VerificationKey,
  },
  ed25519_dalek::Signature,
  multihash::Multihash,
  serde::{Deserialize, Serialize},
  std::fmt::Display,
};

/// Name of a contract method.
#[derive(
  Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct MethodId(String);

impl MethodId {
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl From<&str> for MethodId {
  fn from(name: &str) -> Self {
    Self(name.to_owned())
  }
}

impl Display for MethodId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

/// What an update intends to do to its target account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateKind {
  /// Creates the target account, funded by the fee payer.
  CreateAccount,

  /// Installs a contract: its verification key and permissions.
  Deploy {
    verification_key: VerificationKey,
    permissions: Permissions,
  },

  /// Writes the proposed state (and/or moves balance) on an existing account.
  SetState,

  /// Result of a proven contract method call.
  InvokeMethod { method: MethodId, args: Vec<Field> },
}

/// The kind of authorization an update declares it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthorizationKind {
  None,
  Signature,
  Proof,
}

/// The authorization material actually attached to an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Control {
  None,
  Signature(Signature),
  Proof(Proof),
}

/// A single intended mutation of one account within a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountUpdate {
  pub target: Address,
  pub kind: UpdateKind,

  /// Signed change of the target's balance. Positive deltas are funded
  /// by the fee payer, negative deltas are refunded to it.
  pub balance_delta: i64,

  /// When present, replaces the whole app state of the target.
  pub proposed_state: Option<AppState>,

  pub required_authorization: AuthorizationKind,

  /// Must hold against the target account as of the start of the
  /// transaction for the update to be valid.
  pub precondition: Option<Precondition>,

  /// Signature or proof, attached after the body is final.
  pub authorization: Control,
}

/// Everything in an update except its authorization.
#[derive(Serialize)]
struct Statement<'a> {
  target: &'a Address,
  kind: &'a UpdateKind,
  balance_delta: i64,
  proposed_state: &'a Option<AppState>,
  required_authorization: AuthorizationKind,
  precondition: &'a Option<Precondition>,
}

impl AccountUpdate {
  pub fn new(target: Address, kind: UpdateKind) -> Self {
    Self {
      target,
      kind,
      balance_delta: 0,
      proposed_state: None,
      required_authorization: AuthorizationKind::None,
      precondition: None,
      authorization: Control::None,
    }
  }

  pub fn with_balance_delta(mut self, delta: i64) -> Self {
    self.balance_delta = delta;
    self
  }

  pub fn with_proposed_state(mut self, state: AppState) -> Self {
    self.proposed_state = Some(state);
    self
  }

  pub fn with_precondition(mut self, precondition: Precondition) -> Self {
    self.precondition = Some(precondition);
    self
  }

  pub fn requiring(mut self, kind: AuthorizationKind) -> Self {
    self.required_authorization = kind;
    self
  }

  pub fn authorized(mut self, control: Control) -> Self {
    self.authorization = control;
    self
  }

  /// Digest of the update body, the public input of its proof.
  ///
  /// Attaching a signature or proof does not change the statement.
  pub fn statement(&self) -> Multihash {
    digest(&Statement {
      target: &self.target,
      kind: &self.kind,
      balance_delta: self.balance_delta,
      proposed_state: &self.proposed_state,
      required_authorization: self.required_authorization,
      precondition: &self.precondition,
    })
  }

  pub fn writes_state(&self) -> bool {
    self.proposed_state.is_some()
  }

  pub fn is_creation(&self) -> bool {
    matches!(self.kind, UpdateKind::CreateAccount)
  }

  pub fn is_deploy(&self) -> bool {
    matches!(self.kind, UpdateKind::Deploy { .. })
  }
}

#[cfg(test)]
mod tests {
  use {
    super::*,
    crate::{Condition, Field},
  };

  fn target() -> Address {
    Address::from_bytes([3u8; 32])
  }

  #[test]
  fn statement_ignores_authorization() {
    let update = AccountUpdate::new(target(), UpdateKind::SetState)
      .with_proposed_state(vec![Field::from(2)])
      .requiring(AuthorizationKind::Proof);

    let proven = update.clone().authorized(Control::Proof(Proof::new(
      crate::digest(&"anything"),
    )));

    assert_eq!(update.statement(), proven.statement());
  }

  #[test]
  fn statement_covers_body() {
    let base = AccountUpdate::new(target(), UpdateKind::SetState)
      .with_proposed_state(vec![Field::from(2)]);

    let other_state = base.clone().with_proposed_state(vec![Field::from(3)]);
    let guarded = base.clone().with_precondition(Precondition::Id(
      Condition::StateEquals {
        index: 0,
        value: Field::ZERO,
      },
    ));
    let funded = base.clone().with_balance_delta(1);

    assert_ne!(base.statement(), other_state.statement());
    assert_ne!(base.statement(), guarded.statement());
    assert_ne!(base.statement(), funded.statement());
  }
}
