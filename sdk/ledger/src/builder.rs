use {
  crate::{Ledger, MethodCall, ProofError, SmartContract},
  thiserror::Error,
  tracing::debug,
  zkapp_primitives::{
    AccountUpdate,
    Address,
    AppState,
    AuthorizationKind,
    Field,
    MethodId,
    Transaction,
    UpdateKind,
  },
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
  #[error("Proof generation failed: {0}")]
  ProofGenerationFailed(#[from] ProofError),

  #[error("Account {0} does not exist")]
  AccountNotFound(Address),

  #[error("Amount {0} is too large to be moved in one update")]
  AmountOutOfRange(u64),
}

/// Records the account updates of one transaction.
///
/// A builder is handed by mutable reference to the callback passed to
/// [`TransactionBuilder::build`] or [`Ledger::transaction`]. Updates are
/// appended in the order the recording methods are called. Each build
/// owns its builder, so concurrent builds never see each other's updates.
pub struct TransactionBuilder<'l> {
  ledger: &'l Ledger,
  fee_payer: Address,
  memo: String,
  updates: Vec<AccountUpdate>,
}

impl<'l> TransactionBuilder<'l> {
  /// Runs the callback against a fresh builder and turns the recorded
  /// updates into an unsigned transaction using the fee payer's current
  /// nonce.
  ///
  /// If the callback fails the recording is discarded and no
  /// transaction is produced.
  pub fn build<F>(
    ledger: &'l Ledger,
    fee_payer: Address,
    callback: F,
  ) -> Result<Transaction, BuildError>
  where
    F: FnOnce(&mut TransactionBuilder<'l>) -> Result<(), BuildError>,
  {
    let mut builder = Self {
      ledger,
      fee_payer,
      memo: String::new(),
      updates: vec![],
    };

    callback(&mut builder)?;
    builder.finish()
  }

  fn finish(self) -> Result<Transaction, BuildError> {
    let payer = self
      .ledger
      .get_account(&self.fee_payer)
      .ok_or(BuildError::AccountNotFound(self.fee_payer))?;

    debug!(
      "built transaction for {} with {} updates at nonce {}",
      self.fee_payer,
      self.updates.len(),
      payer.nonce
    );

    Ok(
      Transaction::new(self.fee_payer, payer.nonce, self.updates)
        .with_memo(self.memo),
    )
  }

  pub fn fee_payer(&self) -> &Address {
    &self.fee_payer
  }

  /// Updates recorded so far, in call order.
  pub fn updates(&self) -> &[AccountUpdate] {
    &self.updates
  }

  pub fn memo(&mut self, memo: impl Into<String>) -> &mut Self {
    self.memo = memo.into();
    self
  }

  /// Records a hand-made update as is.
  pub fn push(&mut self, update: AccountUpdate) -> &mut Self {
    debug!("recording {:?} update on {}", update.kind, update.target);
    self.updates.push(update);
    self
  }

  /// Creates `address` and moves `amount` from the fee payer to it.
  /// The fee payer is also charged the account creation fee.
  pub fn fund_new_account(
    &mut self,
    address: Address,
    amount: u64,
  ) -> Result<&mut Self, BuildError> {
    let delta =
      i64::try_from(amount).map_err(|_| BuildError::AmountOutOfRange(amount))?;
    Ok(self.push(
      AccountUpdate::new(address, UpdateKind::CreateAccount)
        .with_balance_delta(delta),
    ))
  }

  /// Installs the contract's verification key and permissions on
  /// `address`. Must be signed by the key of `address`.
  pub fn deploy(
    &mut self,
    contract: &dyn SmartContract,
    address: Address,
  ) -> &mut Self {
    self.push(
      AccountUpdate::new(address, UpdateKind::Deploy {
        verification_key: contract.verification_key(),
        permissions: contract.permissions(),
      })
      .requiring(AuthorizationKind::Signature),
    )
  }

  /// Writes the contract's initial state to `address`.
  /// Must be signed by the key of `address`.
  pub fn init(
    &mut self,
    contract: &dyn SmartContract,
    address: Address,
  ) -> &mut Self {
    let width = self.ledger.config().app_state_width;
    self.set_state(address, contract.initial_state(width))
  }

  /// Overwrites the app state of `address`, authorized by signature.
  pub fn set_state(&mut self, address: Address, state: AppState) -> &mut Self {
    self.push(
      AccountUpdate::new(address, UpdateKind::SetState)
        .with_proposed_state(state)
        .requiring(AuthorizationKind::Signature),
    )
  }

  /// Runs a contract method against the current on-ledger state of
  /// `address` and records the proven update it produces.
  pub fn invoke(
    &mut self,
    contract: &dyn SmartContract,
    address: Address,
    method: impl Into<MethodId>,
    args: Vec<Field>,
  ) -> Result<&mut Self, BuildError> {
    let current = self
      .ledger
      .get_account(&address)
      .ok_or(BuildError::AccountNotFound(address))?;

    let call = MethodCall {
      target: address,
      method: method.into(),
      args,
    };

    let update = self.ledger.proof_system().prove(
      contract,
      &call,
      &current,
      &self.ledger.network(),
    )?;

    Ok(self.push(update))
  }
}
