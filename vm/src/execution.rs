use {
  crate::{collect, verify, ProofVerifier, State, StateDiff},
  std::fmt::Display,
  thiserror::Error,
  tracing::debug,
  zkapp_primitives::{Address, NetworkView, ToBase58String, Transaction},
};

/// The part of an account that an update needs permission to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
  EditState,
  Send,
  SetVerificationKey,
}

impl Display for Action {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(match self {
      Action::EditState => "edit state",
      Action::Send => "send funds",
      Action::SetVerificationKey => "set verification key",
    })
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("Invalid nonce {found}, the fee payer account expects {expected}")]
  InvalidNonce { expected: u32, found: u32 },

  #[error(
    "Account {address} has insufficient funds: {required} required, \
     {available} available"
  )]
  InsufficientFunds {
    address: Address,
    required: u64,
    available: u64,
  },

  #[error("Missing or invalid signature for account {0}")]
  InvalidSignature(Address),

  #[error("Missing or invalid proof for account {0}")]
  InvalidProof(Address),

  #[error("Precondition on account {0} does not hold")]
  PreconditionFailed(Address),

  #[error("Account {0} does not exist")]
  AccountNotFound(Address),

  #[error("Trying to create an account ({0}) that already exists")]
  DuplicateAccountCreation(Address),

  #[error("Transaction has more than one {1} update for account {0}")]
  ConflictingUpdates(Address, &'static str),

  #[error("Not permitted to {action} on account {address}")]
  UpdateNotPermitted { address: Address, action: Action },

  #[error(
    "Proposed state for account {address} has {found} elements, expected \
     {expected}"
  )]
  InvalidStateLength {
    address: Address,
    expected: usize,
    found: usize,
  },

  #[error("Balance of account {0} would overflow")]
  BalanceOverflow(Address),

  #[error("Nonce of account {0} is exhausted")]
  NonceOverflow(Address),
}

/// Ledger-wide parameters a transaction is executed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Environment {
  /// Height of the chain head at submission time.
  pub height: u64,

  /// Charged to the fee payer for every account created.
  pub account_creation_fee: u64,

  /// Width of the app state of newly created accounts.
  pub app_state_width: usize,
}

impl Environment {
  pub fn network(&self) -> NetworkView {
    NetworkView {
      height: self.height,
    }
  }
}

/// Executes a transaction.
///
/// Validates the transaction against the current ledger state and, if
/// every check passes, returns a StateDiff with the post-state of all
/// touched accounts (fee payer included) that can be applied to the
/// store in one step. On error nothing has been written anywhere.
///
/// Validation order:
///   1. fee payer existence and nonce,
///   2. fee payer funds for the net funding of the transaction,
///   3. signatures and proofs, then preconditions,
///   4. conflicting updates within the transaction,
///   5. staging of every update on a working copy.
///
/// Every check reads the state as of submission: no update can change
/// what a later update in the same transaction is validated against.
pub fn execute(
  tx: &Transaction,
  state: &impl State,
  env: &Environment,
  verifier: &dyn ProofVerifier,
) -> Result<StateDiff, Error> {
  let commitment = tx.commitment();
  debug!(
    "executing transaction {} with {} updates at height {}",
    commitment.to_b58(),
    tx.updates.len(),
    env.height
  );

  let payer = state
    .get(&tx.fee_payer)
    .ok_or(Error::AccountNotFound(tx.fee_payer))?;

  if tx.nonce != payer.nonce {
    return Err(Error::InvalidNonce {
      expected: payer.nonce,
      found: tx.nonce,
    });
  }

  // net amount leaving the fee payer, negative when
  // the updates refund more than they are funded with.
  let debit = collect::funding(tx, env);
  if debit > payer.balance as i128 {
    return Err(Error::InsufficientFunds {
      address: tx.fee_payer,
      required: u64::try_from(debit).unwrap_or(u64::MAX),
      available: payer.balance,
    });
  }

  let checks = collect::authorizations(state, tx);
  debug!("verifying {} authorizations", checks.len());
  verify::run_checks(&commitment.to_bytes(), checks, verifier)?;

  collect::preconditions(state, tx, &env.network())?;
  collect::conflicts(tx)?;

  let diff = collect::outputs(state, tx, env, debit)?;
  debug!("transaction valid, touching {} accounts", diff.len());
  Ok(diff)
}
