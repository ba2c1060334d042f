use {
  ed25519_dalek::Keypair,
  zkapp_primitives::{
    digest,
    Account,
    AccountUpdate,
    Address,
    AuthorizationKind,
    Control,
    Field,
    Multihash,
    Permissions,
    Proof,
    Transaction,
    UpdateKind,
    VerificationKey,
  },
  zkapp_vm::{Environment, InMemoryStateStore, ProofVerifier, State, StateDiff},
};

pub const CREATION_FEE: u64 = 1_000;
pub const WIDTH: usize = 1;

/// Accepts a proof iff it is the digest of the key and the statement.
pub struct DigestVerifier;

impl ProofVerifier for DigestVerifier {
  fn verify(
    &self,
    proof: &Proof,
    key: &VerificationKey,
    statement: &Multihash,
  ) -> bool {
    proof == &prove(key, statement)
  }
}

pub fn prove(key: &VerificationKey, statement: &Multihash) -> Proof {
  Proof::new(digest(&(key, statement)))
}

pub fn keypair() -> Keypair {
  Keypair::generate(&mut rand::thread_rng())
}

pub fn address(keypair: &Keypair) -> Address {
  keypair.public.into()
}

pub fn env(height: u64) -> Environment {
  Environment {
    height,
    account_creation_fee: CREATION_FEE,
    app_state_width: WIDTH,
  }
}

/// A store holding one funded plain account per given key.
pub fn store_with(accounts: &[(&Keypair, u64)]) -> InMemoryStateStore {
  let mut diff = StateDiff::default();
  for (keypair, balance) in accounts {
    let addr = address(keypair);
    diff.set(addr, Account::new(addr, *balance, WIDTH));
  }
  let mut store = InMemoryStateStore::default();
  store.apply(diff);
  store
}

/// Installs a deployed contract with the given state directly in the store.
pub fn install_zkapp(
  store: &mut InMemoryStateStore,
  zkapp: &Keypair,
  key: VerificationKey,
  state: u64,
) {
  let addr = address(zkapp);
  let mut account = Account::new(addr, 0, WIDTH);
  account.verification_key = Some(key);
  account.permissions = Permissions::zkapp_default();
  account.app_state = vec![Field::from(state)];

  let mut diff = StateDiff::default();
  diff.set(addr, account);
  store.apply(diff);
}

/// The three updates of a contract deployment funded by the fee payer.
pub fn deploy_updates(
  zkapp: &Keypair,
  key: VerificationKey,
  funding: i64,
) -> Vec<AccountUpdate> {
  let target = address(zkapp);
  vec![
    AccountUpdate::new(target, UpdateKind::CreateAccount)
      .with_balance_delta(funding),
    AccountUpdate::new(target, UpdateKind::Deploy {
      verification_key: key,
      permissions: Permissions::zkapp_default(),
    })
    .requiring(AuthorizationKind::Signature),
    AccountUpdate::new(target, UpdateKind::SetState)
      .with_proposed_state(vec![Field::ZERO])
      .requiring(AuthorizationKind::Signature),
  ]
}

/// A proven method call writing `state` to the zkapp.
pub fn proven_update(
  zkapp: Address,
  key: &VerificationKey,
  state: u64,
) -> AccountUpdate {
  let update = AccountUpdate::new(zkapp, UpdateKind::InvokeMethod {
    method: "update".into(),
    args: vec![],
  })
  .with_proposed_state(vec![Field::from(state)])
  .requiring(AuthorizationKind::Proof);

  let proof = prove(key, &update.statement());
  update.authorized(Control::Proof(proof))
}

pub fn signed(
  payer: &Keypair,
  nonce: u32,
  updates: Vec<AccountUpdate>,
  signers: &[&Keypair],
) -> Transaction {
  let mut tx = Transaction::new(address(payer), nonce, updates);
  let mut keys = vec![payer];
  keys.extend_from_slice(signers);
  tx.sign(&keys);
  tx
}
