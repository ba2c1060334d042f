use {
  crate::{
    BuildError,
    LedgerConfig,
    ProofSystem,
    Settlement,
    SimulatedProofSystem,
    TransactionBuilder,
    TransactionHandle,
  },
  ed25519_dalek::Keypair,
  parking_lot::RwLock,
  rand::{rngs::StdRng, SeedableRng},
  std::{collections::BTreeMap, sync::Arc},
  tracing::{debug, info, warn},
  zkapp_primitives::{
    digest,
    Account,
    Address,
    AppState,
    Block,
    Multihash,
    NetworkView,
    Proof,
    ToBase58String,
    Transaction,
    VerificationKey,
  },
  zkapp_vm::{
    execute,
    Environment,
    ExecutionError,
    InMemoryStateStore,
    ProofVerifier,
    State,
    StateDiff,
  },
};

/// A funded account whose keys are known to the caller.
#[derive(Debug, Clone)]
pub struct TestAccount {
  pub address: Address,
  pub keypair: Arc<Keypair>,
}

impl TestAccount {
  /// Keys of the `index`-th test account of a ledger seeded with `seed`.
  ///
  /// The rng seed is a digest over a tag, the ledger seed and the index,
  /// so derived keys never repeat across seeds or indices and never
  /// match keys drawn from a plainly seeded rng.
  fn derive(seed: u64, index: u64) -> Self {
    let mut rng_seed = <StdRng as SeedableRng>::Seed::default();
    let hash = digest(&("test-account", seed, index));
    let seed_len = rng_seed.len();
    rng_seed.copy_from_slice(&hash.digest()[..seed_len]);

    let keypair = Keypair::generate(&mut StdRng::from_seed(rng_seed));
    Self {
      address: Address::from(&keypair.public),
      keypair: Arc::new(keypair),
    }
  }

  pub fn keypair(&self) -> &Keypair {
    &self.keypair
  }
}

struct Chain {
  store: InMemoryStateStore,
  head: Block,
  test_accounts: Vec<TestAccount>,

  /// Number of test account keys derived so far, credited or not.
  derived: u64,
}

struct Inner {
  config: LedgerConfig,
  proofs: Box<dyn ProofSystem>,
  chain: RwLock<Chain>,
}

/// Lends the verification half of a proof system to the executor.
struct Verifying<'a>(&'a dyn ProofSystem);

impl ProofVerifier for Verifying<'_> {
  fn verify(
    &self,
    proof: &Proof,
    key: &VerificationKey,
    statement: &Multihash,
  ) -> bool {
    self.0.verify(proof, key, statement)
  }
}

/// A local, single node zkApp ledger.
///
/// Owns the account store, the chain of sealed blocks and the proof
/// system. Transactions are applied one at a time under a write lock,
/// each sealed in its own block, so the chain height is the logical
/// clock preconditions are evaluated against. Cloning a ledger is
/// cheap and every clone refers to the same chain.
#[derive(Clone)]
pub struct Ledger {
  inner: Arc<Inner>,
}

impl Ledger {
  /// Creates a ledger with the simulated proof system.
  pub fn new(config: LedgerConfig) -> Self {
    Self::with_proof_system(config, SimulatedProofSystem::new())
  }

  pub fn with_proof_system(
    config: LedgerConfig,
    proofs: impl ProofSystem + 'static,
  ) -> Self {
    let mut chain = Chain {
      store: InMemoryStateStore::default(),
      head: Block::zero(),
      test_accounts: vec![],
      derived: 0,
    };

    while chain.test_accounts.len() < config.test_accounts {
      faucet(&mut chain, &config);
    }

    info!(
      "genesis with {} test accounts, state root {}",
      chain.test_accounts.len(),
      chain.store.root().to_b58()
    );

    Self {
      inner: Arc::new(Inner {
        config,
        proofs: Box::new(proofs),
        chain: RwLock::new(chain),
      }),
    }
  }

  pub fn config(&self) -> &LedgerConfig {
    &self.inner.config
  }

  pub fn proof_system(&self) -> &dyn ProofSystem {
    self.inner.proofs.as_ref()
  }

  /// Returns the first `count` test accounts.
  ///
  /// When more accounts are requested than were funded at genesis,
  /// the missing ones are derived and credited on the spot. Crediting
  /// test accounts does not seal a block.
  pub fn funded_test_accounts(&self, count: usize) -> Vec<TestAccount> {
    let mut chain = self.inner.chain.write();
    while chain.test_accounts.len() < count {
      faucet(&mut chain, &self.inner.config);
    }
    chain.test_accounts[..count].to_vec()
  }

  /// Builds a transaction paid for by `fee_payer` from the updates
  /// recorded by `callback`. See [`TransactionBuilder`].
  pub fn transaction<F>(
    &self,
    fee_payer: Address,
    callback: F,
  ) -> Result<TransactionHandle, BuildError>
  where
    F: FnOnce(&mut TransactionBuilder) -> Result<(), BuildError>,
  {
    let tx = TransactionBuilder::build(self, fee_payer, callback)?;
    Ok(self.submit(tx))
  }

  /// Wraps an already built transaction in a handle. The transaction
  /// is executed when the handle is sent.
  pub fn submit(&self, tx: Transaction) -> TransactionHandle {
    TransactionHandle::new(self.clone(), tx)
  }

  /// Validates and applies one transaction.
  ///
  /// On success all account changes are committed at once and sealed
  /// in a new block. On failure the ledger is left untouched.
  pub(crate) fn apply(
    &self,
    tx: &Transaction,
  ) -> Result<Settlement, ExecutionError> {
    let mut guard = self.inner.chain.write();
    let chain = &mut *guard;

    let env = Environment {
      height: chain.head.height,
      account_creation_fee: self.inner.config.account_creation_fee,
      app_state_width: self.inner.config.app_state_width,
    };

    let hash = tx.hash();
    let verifier = Verifying(self.inner.proofs.as_ref());
    let diff = match execute(tx, &chain.store, &env, &verifier) {
      Ok(diff) => diff,
      Err(e) => {
        warn!("transaction {} rejected: {e}", hash.to_b58());
        return Err(e);
      }
    };

    let accounts: BTreeMap<_, _> =
      diff.iter().map(|(a, acc)| (*a, acc.clone())).collect();

    chain.store.apply(diff);
    chain.head = Block::new(&chain.head, vec![tx.clone()]);
    let state_root = chain.store.root();

    info!(
      "transaction {} settled in block {} at height {}, state root {}",
      hash.to_b58(),
      chain.head.hash().to_b58(),
      chain.head.height,
      state_root.to_b58()
    );

    Ok(Settlement {
      height: chain.head.height,
      block: chain.head.clone(),
      transaction: hash,
      state_root,
      accounts,
    })
  }

  pub fn get_account(&self, address: &Address) -> Option<Account> {
    self.inner.chain.read().store.get(address)
  }

  /// App state of an account as of the last committed transaction.
  pub fn get_state(
    &self,
    address: &Address,
  ) -> Result<AppState, ExecutionError> {
    self
      .get_account(address)
      .map(|acc| acc.app_state)
      .ok_or(ExecutionError::AccountNotFound(*address))
  }

  pub fn height(&self) -> u64 {
    self.inner.chain.read().head.height
  }

  pub fn head(&self) -> Block {
    self.inner.chain.read().head.clone()
  }

  pub fn network(&self) -> NetworkView {
    NetworkView {
      height: self.height(),
    }
  }

  pub fn state_root(&self) -> Multihash {
    self.inner.chain.read().store.root()
  }
}

/// Derives the next test account and credits it.
///
/// Keys whose address already holds an account are passed over, the
/// faucet only ever creates accounts, never rewrites them.
fn faucet(chain: &mut Chain, config: &LedgerConfig) {
  loop {
    let index = chain.derived;
    chain.derived += 1;

    let account = TestAccount::derive(config.genesis_seed, index);
    if chain.store.get(&account.address).is_some() {
      warn!(
        "test account #{index} ({}) already exists, skipping",
        account.address
      );
      continue;
    }

    debug!("funding test account #{index}: {}", account.address);
    let mut diff = StateDiff::default();
    diff.set(
      account.address,
      Account::new(
        account.address,
        config.test_account_balance,
        config.app_state_width,
      ),
    );
    chain.store.apply(diff);
    chain.test_accounts.push(account);
    return;
  }
}
