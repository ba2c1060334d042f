use {
  crate::{b58::ToBase58String, digest},
  multihash::Multihash,
  serde::{Deserialize, Serialize},
};

/// Identifies a compiled circuit.
///
/// Deploying a contract stores its verification key in the target
/// account; from then on every proof-authorized update of that account
/// is checked against this key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerificationKey(Multihash);

impl VerificationKey {
  pub fn new(digest: Multihash) -> Self {
    Self(digest)
  }

  /// Derives the key of a circuit from its unique name.
  pub fn for_circuit(name: &str) -> Self {
    Self(digest(&("circuit", name)))
  }

  pub fn digest(&self) -> &Multihash {
    &self.0
  }
}

impl std::fmt::Debug for VerificationKey {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "vk({})", self.0.to_b58())
  }
}

/// A validity proof produced by the proof system for one account update.
///
/// The ledger treats proofs as opaque; only a verifier knows how to
/// relate one to a verification key and a statement.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Proof(Multihash);

impl Proof {
  pub fn new(digest: Multihash) -> Self {
    Self(digest)
  }

  pub fn digest(&self) -> &Multihash {
    &self.0
  }
}

impl std::fmt::Debug for Proof {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "proof({})", self.0.to_b58())
  }
}
