use {
  crate::{Address, AuthorizationKind, Field, VerificationKey},
  serde::{Deserialize, Serialize},
};

/// The on-chain state of a zkApp: an ordered tuple of field elements
/// whose length is fixed when the account is created.
pub type AppState = Vec<Field>;

/// The kind of authorization an account demands before a given
/// aspect of it may be changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthRequired {
  None,
  Signature,
  Proof,
  Either,
  Impossible,
}

impl AuthRequired {
  /// Whether an update authorized with `kind` satisfies this requirement.
  pub fn allows(&self, kind: AuthorizationKind) -> bool {
    match self {
      AuthRequired::None => true,
      AuthRequired::Signature => kind == AuthorizationKind::Signature,
      AuthRequired::Proof => kind == AuthorizationKind::Proof,
      AuthRequired::Either => matches!(
        kind,
        AuthorizationKind::Signature | AuthorizationKind::Proof
      ),
      AuthRequired::Impossible => false,
    }
  }
}

/// Capability set controlling who may alter an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permissions {
  /// Writing any element of the app state.
  pub edit_state: AuthRequired,

  /// Decreasing the balance.
  pub send: AuthRequired,

  /// Deploying or replacing the verification key and permissions.
  pub set_verification_key: AuthRequired,
}

impl Permissions {
  /// Permissions of a freshly created account: the owner of the
  /// private key controls everything.
  pub fn user_default() -> Self {
    Self {
      edit_state: AuthRequired::Signature,
      send: AuthRequired::Signature,
      set_verification_key: AuthRequired::Signature,
    }
  }

  /// Permissions installed by a contract deployment: state and funds
  /// only move through proven method calls, while the key owner may
  /// still redeploy.
  pub fn zkapp_default() -> Self {
    Self {
      edit_state: AuthRequired::Proof,
      send: AuthRequired::Proof,
      set_verification_key: AuthRequired::Signature,
    }
  }
}

impl Default for Permissions {
  fn default() -> Self {
    Self::user_default()
  }
}

/// Represents the basic unit of storage in the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Account {
  pub address: Address,

  /// Balance in nanomina.
  pub balance: u64,

  /// Number of transactions this account has paid for. Only ever
  /// incremented by one per applied transaction.
  pub nonce: u32,

  /// Present once a contract has been deployed to this account.
  pub verification_key: Option<VerificationKey>,

  pub app_state: AppState,

  pub permissions: Permissions,
}

impl Account {
  /// A new plain account with a zeroed app state of the given width.
  pub fn new(address: Address, balance: u64, app_state_width: usize) -> Self {
    Self {
      address,
      balance,
      nonce: 0,
      verification_key: None,
      app_state: vec![Field::ZERO; app_state_width],
      permissions: Permissions::user_default(),
    }
  }

  pub fn is_zkapp(&self) -> bool {
    self.verification_key.is_some()
  }
}
