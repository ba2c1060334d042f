use {
  crate::{
    execution::{Action, Environment, Error},
    verify::Check,
    State,
    StateDiff,
  },
  std::collections::BTreeMap,
  tracing::debug,
  zkapp_primitives::{
    Account,
    AccountUpdate,
    Address,
    AuthRequired,
    AuthorizationKind,
    Control,
    NetworkView,
    Permissions,
    Transaction,
    UpdateKind,
  },
};

/// A working copy of the accounts touched by a transaction layered
/// over the untouched ledger state.
struct Overlay<'s, S: State + ?Sized> {
  base: &'s S,
  diff: StateDiff,
}

impl<'s, S: State + ?Sized> Overlay<'s, S> {
  fn new(base: &'s S) -> Self {
    Self {
      base,
      diff: StateDiff::default(),
    }
  }

  fn get(&self, address: &Address) -> Option<Account> {
    self.diff.get(address).or_else(|| self.base.get(address))
  }

  fn set(&mut self, account: Account) {
    self.diff.set(account.address, account);
  }
}

/// Net amount the fee payer has to fund: all balance deltas plus the
/// creation fee of every new account.
pub fn funding(tx: &Transaction, env: &Environment) -> i128 {
  tx.updates
    .iter()
    .map(|u| {
      u.balance_delta as i128
        + match u.is_creation() {
          true => env.account_creation_fee as i128,
          false => 0,
        }
    })
    .sum()
}

/// Resolves the authorization checks of a transaction, fee payer first
/// and then every update in order.
///
/// Verification keys are taken from the state as of submission, so an
/// update cannot be proven against a key deployed earlier in the same
/// transaction.
pub fn authorizations(state: &impl State, tx: &Transaction) -> Vec<Check> {
  let mut checks = Vec::with_capacity(tx.updates.len() + 1);

  checks.push(match tx.fee_payer_signature {
    Some(signature) => Check::Signature {
      signer: tx.fee_payer,
      signature,
    },
    None => Check::Rejected(Error::InvalidSignature(tx.fee_payer)),
  });

  for update in &tx.updates {
    if let Some(check) = authorization(state, update) {
      checks.push(check);
    }
  }

  checks
}

fn authorization(state: &impl State, update: &AccountUpdate) -> Option<Check> {
  let target = update.target;

  // method invocations are only meaningful with a proof
  // of the method's execution attached to them.
  if matches!(update.kind, UpdateKind::InvokeMethod { .. })
    && update.required_authorization != AuthorizationKind::Proof
  {
    return Some(Check::Rejected(Error::InvalidProof(target)));
  }

  match (update.required_authorization, &update.authorization) {
    (AuthorizationKind::None, _) => None,
    (AuthorizationKind::Signature, Control::Signature(signature)) => {
      Some(Check::Signature {
        signer: target,
        signature: *signature,
      })
    }
    (AuthorizationKind::Signature, _) => {
      Some(Check::Rejected(Error::InvalidSignature(target)))
    }
    (AuthorizationKind::Proof, Control::Proof(proof)) => {
      match state.get(&target).and_then(|acc| acc.verification_key) {
        Some(key) => Some(Check::Proof {
          target,
          proof: *proof,
          key,
          statement: update.statement(),
        }),
        None => Some(Check::Rejected(Error::InvalidProof(target))),
      }
    }
    (AuthorizationKind::Proof, _) => {
      Some(Check::Rejected(Error::InvalidProof(target)))
    }
  }
}

/// Evaluates every update's precondition against the target account
/// as it was when the transaction was submitted.
pub fn preconditions(
  state: &impl State,
  tx: &Transaction,
  network: &NetworkView,
) -> Result<(), Error> {
  for update in &tx.updates {
    if let Some(precondition) = &update.precondition {
      let current = state.get(&update.target);
      if !precondition.evaluate(current.as_ref(), network) {
        let mut conditions = 0;
        precondition.for_each(&mut |_| conditions += 1);
        debug!(
          "precondition with {conditions} conditions failed on {} at height {}",
          update.target, network.height
        );
        return Err(Error::PreconditionFailed(update.target));
      }
    }
  }
  Ok(())
}

/// Rejects transactions that mutate the same aspect of one account
/// more than once.
pub fn conflicts(tx: &Transaction) -> Result<(), Error> {
  #[derive(Default)]
  struct Touches {
    creations: usize,
    deploys: usize,
    state_writes: usize,
  }

  let mut touched = BTreeMap::<Address, Touches>::new();
  for update in &tx.updates {
    let entry = touched.entry(update.target).or_default();
    entry.creations += update.is_creation() as usize;
    entry.deploys += update.is_deploy() as usize;
    entry.state_writes += update.writes_state() as usize;

    if entry.creations > 1 {
      return Err(Error::DuplicateAccountCreation(update.target));
    }
    if entry.deploys > 1 {
      return Err(Error::ConflictingUpdates(update.target, "deploy"));
    }
    if entry.state_writes > 1 {
      return Err(Error::ConflictingUpdates(update.target, "state write"));
    }
  }
  Ok(())
}

fn permit(
  required: AuthRequired,
  update: &AccountUpdate,
  action: Action,
) -> Result<(), Error> {
  match required.allows(update.required_authorization) {
    true => Ok(()),
    false => Err(Error::UpdateNotPermitted {
      address: update.target,
      action,
    }),
  }
}

/// Stages every update of the transaction on a working copy of the
/// touched accounts, then charges the fee payer and bumps its nonce.
///
/// In case all checks pass, this is the set of state mutations that
/// will be applied to the ledger state.
pub fn outputs(
  state: &impl State,
  tx: &Transaction,
  env: &Environment,
  debit: i128,
) -> Result<StateDiff, Error> {
  let mut work = Overlay::new(state);

  for update in &tx.updates {
    let target = update.target;

    // permissions are those in effect when the transaction was
    // submitted. Accounts created by this transaction are governed
    // by the defaults of a new account.
    let permissions = state
      .get(&target)
      .map(|acc| acc.permissions)
      .unwrap_or_else(Permissions::user_default);

    let mut account = match update.kind {
      UpdateKind::CreateAccount => {
        if work.get(&target).is_some() {
          return Err(Error::DuplicateAccountCreation(target));
        }
        Account::new(target, 0, env.app_state_width)
      }
      _ => work.get(&target).ok_or(Error::AccountNotFound(target))?,
    };

    if let UpdateKind::Deploy {
      verification_key,
      permissions: installed,
    } = &update.kind
    {
      permit(
        permissions.set_verification_key,
        update,
        Action::SetVerificationKey,
      )?;
      account.verification_key = Some(*verification_key);
      account.permissions = *installed;
    }

    if let Some(proposed) = &update.proposed_state {
      if !update.is_creation() {
        permit(permissions.edit_state, update, Action::EditState)?;
      }
      if proposed.len() != account.app_state.len() {
        return Err(Error::InvalidStateLength {
          address: target,
          expected: account.app_state.len(),
          found: proposed.len(),
        });
      }
      account.app_state = proposed.clone();
    }

    if update.balance_delta < 0 {
      permit(permissions.send, update, Action::Send)?;
      let amount = update.balance_delta.unsigned_abs();
      account.balance = account.balance.checked_sub(amount).ok_or(
        Error::InsufficientFunds {
          address: target,
          required: amount,
          available: account.balance,
        },
      )?;
    } else {
      account.balance = account
        .balance
        .checked_add(update.balance_delta as u64)
        .ok_or(Error::BalanceOverflow(target))?;
    }

    work.set(account);
  }

  let mut payer = work
    .get(&tx.fee_payer)
    .ok_or(Error::AccountNotFound(tx.fee_payer))?;

  payer.balance = match u64::try_from(debit.unsigned_abs()) {
    Ok(amount) if debit >= 0 => payer.balance.checked_sub(amount).ok_or(
      Error::InsufficientFunds {
        address: tx.fee_payer,
        required: amount,
        available: payer.balance,
      },
    )?,
    Ok(amount) => payer
      .balance
      .checked_add(amount)
      .ok_or(Error::BalanceOverflow(tx.fee_payer))?,
    Err(_) => return Err(Error::BalanceOverflow(tx.fee_payer)),
  };

  payer.nonce = payer
    .nonce
    .checked_add(1)
    .ok_or(Error::NonceOverflow(tx.fee_payer))?;

  work.set(payer);
  Ok(work.diff)
}
