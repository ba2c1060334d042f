use {
  crate::Ledger,
  ed25519_dalek::Keypair,
  std::collections::BTreeMap,
  tracing::error,
  zkapp_primitives::{
    Account,
    Address,
    Block,
    Multihash,
    ToBase58String,
    Transaction,
  },
  zkapp_vm::ExecutionError,
};

/// A transaction accepted by the ledger.
#[derive(Debug, Clone)]
pub struct Settlement {
  /// Height of the block that includes the transaction.
  pub height: u64,
  pub block: Block,

  /// Hash of the settled transaction.
  pub transaction: Multihash,

  /// Root of the ledger state right after the transaction.
  pub state_root: Multihash,

  /// Committed post-state of every account the transaction touched,
  /// the fee payer included.
  pub accounts: BTreeMap<Address, Account>,
}

type Outcome = Result<Settlement, ExecutionError>;

/// Handle to a transaction on its way into the ledger.
///
/// A fresh handle holds the unsigned transaction, which can be signed
/// with [`sign`](Self::sign) and submitted with [`send`](Self::send).
/// The outcome of the submission is only surfaced through
/// [`wait`](Self::wait).
pub struct TransactionHandle {
  ledger: Ledger,
  transaction: Transaction,
  outcome: Option<Outcome>,
}

impl TransactionHandle {
  pub(crate) fn new(ledger: Ledger, transaction: Transaction) -> Self {
    Self {
      ledger,
      transaction,
      outcome: None,
    }
  }

  pub fn transaction(&self) -> &Transaction {
    &self.transaction
  }

  pub fn is_sent(&self) -> bool {
    self.outcome.is_some()
  }

  /// Signs the transaction with every key that has something to sign.
  ///
  /// Has no effect once the transaction was sent.
  pub fn sign(&mut self, keys: &[&Keypair]) -> &mut Self {
    match self.is_sent() {
      true => error!(
        "ignoring signatures on already sent transaction {}",
        self.transaction.hash().to_b58()
      ),
      false => self.transaction.sign(keys),
    }
    self
  }

  /// Submits the transaction to the ledger.
  ///
  /// Sending is idempotent, only the first call submits. The ledger
  /// applies the transaction right away whether or not anyone waits
  /// for its outcome.
  pub fn send(&mut self) -> &mut Self {
    self.outcome();
    self
  }

  /// Resolves the settlement of the transaction, sending it first if
  /// that did not happen yet.
  ///
  /// The outcome is produced once. Later calls return the same result.
  pub async fn wait(&mut self) -> Result<Settlement, ExecutionError> {
    self.outcome().clone()
  }

  fn outcome(&mut self) -> &Outcome {
    let (ledger, transaction) = (&self.ledger, &self.transaction);
    self
      .outcome
      .get_or_insert_with(|| ledger.apply(transaction))
  }
}
