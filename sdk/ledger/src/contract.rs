use {
  thiserror::Error,
  zkapp_primitives::{
    Account,
    Address,
    AppState,
    Field,
    MethodId,
    NetworkView,
    Permissions,
    Precondition,
    VerificationKey,
  },
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProofError {
  #[error("Circuit assertion failed: {0}")]
  AssertionFailed(String),

  #[error("Contract has no method named '{0}'")]
  UnknownMethod(MethodId),

  #[error("Method '{method}' takes {expected} arguments, got {found}")]
  InvalidArguments {
    method: MethodId,
    expected: usize,
    found: usize,
  },

  #[error("No contract is deployed at {0}")]
  NotDeployed(Address),

  #[error("Account {0} runs a different circuit")]
  KeyMismatch(Address),
}

/// What a contract method sees while it runs inside the prover.
#[derive(Debug, Clone, Copy)]
pub struct MethodContext<'a> {
  /// The contract account as of the last committed transaction.
  pub account: &'a Account,
  pub network: NetworkView,
}

impl<'a> MethodContext<'a> {
  /// Reads one element of the on-chain state.
  pub fn state(&self, index: usize) -> Result<Field, ProofError> {
    self.account.app_state.get(index).copied().ok_or_else(|| {
      ProofError::AssertionFailed(format!(
        "state index {index} is out of bounds of {} elements",
        self.account.app_state.len()
      ))
    })
  }
}

/// Result of running a contract method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodOutput {
  /// The complete new app state of the contract account.
  pub proposed_state: AppState,

  /// Assumptions the method made about on-chain state. The ledger
  /// rejects the resulting update if they no longer hold at execution.
  pub precondition: Option<Precondition>,
}

/// Business logic of a zkApp.
///
/// Implementations describe a circuit: the methods it exposes and how
/// they transform the contract's state. The prover runs them against
/// the current on-chain account and proves the outcome.
pub trait SmartContract: Send + Sync {
  /// Unique name of the circuit.
  fn name(&self) -> &str;

  fn verification_key(&self) -> VerificationKey {
    VerificationKey::for_circuit(self.name())
  }

  /// Permissions installed on the account when the contract is deployed.
  fn permissions(&self) -> Permissions {
    Permissions::zkapp_default()
  }

  /// State written by the contract's initializer.
  fn initial_state(&self, width: usize) -> AppState {
    vec![Field::ZERO; width]
  }

  fn execute(
    &self,
    method: &MethodId,
    args: &[Field],
    ctx: &MethodContext<'_>,
  ) -> Result<MethodOutput, ProofError>;
}
