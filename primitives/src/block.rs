use {
  crate::{b58::ToBase58String, digest, Transaction},
  multihash::Multihash,
  once_cell::sync::OnceCell,
  serde::{Deserialize, Serialize},
};

/// A sealed entry of the local chain.
///
/// The local ledger seals every accepted transaction in its own block,
/// so the block height doubles as the ledger's logical clock.
#[derive(Clone, Serialize, Deserialize)]
pub struct Block {
  pub height: u64,
  pub parent: Multihash,
  pub transactions: Vec<Transaction>,

  #[serde(skip)]
  hash_cache: OnceCell<Multihash>,
}

impl Block {
  pub fn new(parent: &Block, transactions: Vec<Transaction>) -> Self {
    Self {
      height: parent.height + 1,
      parent: *parent.hash(),
      transactions,
      hash_cache: OnceCell::new(),
    }
  }

  pub fn zero() -> Self {
    Self {
      height: 0,
      parent: Multihash::default(),
      transactions: vec![],
      hash_cache: OnceCell::new(),
    }
  }

  pub fn hash(&self) -> &Multihash {
    self.hash_cache.get_or_init(|| digest(self))
  }
}

impl std::fmt::Debug for Block {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Block")
      .field("height", &self.height)
      .field("parent", &self.parent.to_b58())
      .field("hash", &self.hash().to_b58())
      .field("transactions", &self.transactions.len())
      .finish()
  }
}
