use {
  crate::{digest, AccountUpdate, Address, AuthorizationKind, Control},
  ed25519_dalek::{Keypair, Signature, Signer},
  multihash::Multihash,
  serde::{Deserialize, Serialize},
};

/// An ordered batch of account updates paid for by one fee payer.
///
/// Either every update in a transaction is applied or none is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
  /// Account that funds the transaction and whose nonce orders it.
  pub fee_payer: Address,

  /// Fee payer nonce at build time. Must equal the on-chain nonce
  /// when the transaction is executed.
  pub nonce: u32,

  /// Free-form note, covered by the commitment.
  pub memo: String,

  pub updates: Vec<AccountUpdate>,

  /// Fee payer signature over the commitment.
  pub fee_payer_signature: Option<Signature>,
}

#[derive(Serialize)]
struct Commitment<'a> {
  fee_payer: &'a Address,
  nonce: u32,
  memo: &'a str,
  statements: Vec<Multihash>,
}

impl Transaction {
  pub fn new(
    fee_payer: Address,
    nonce: u32,
    updates: Vec<AccountUpdate>,
  ) -> Self {
    Self {
      fee_payer,
      nonce,
      memo: String::new(),
      updates,
      fee_payer_signature: None,
    }
  }

  pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
    self.memo = memo.into();
    self
  }

  /// Digest of the transaction without any authorizations.
  ///
  /// This is the message signed by the fee payer and by every update
  /// that requires a signature, so signatures can be attached in any
  /// order without invalidating each other.
  pub fn commitment(&self) -> Multihash {
    digest(&Commitment {
      fee_payer: &self.fee_payer,
      nonce: self.nonce,
      memo: &self.memo,
      statements: self.updates.iter().map(|u| u.statement()).collect(),
    })
  }

  /// Hash of the complete transaction, signatures and proofs included,
  /// that uniquely identifies it.
  pub fn hash(&self) -> Multihash {
    digest(self)
  }

  /// Signs the transaction with every given key that has something
  /// to sign: the fee payer, and any update requiring a signature whose
  /// target address belongs to the key.
  pub fn sign(&mut self, keys: &[&Keypair]) {
    let message = self.commitment().to_bytes();
    for key in keys {
      let signer = Address::from(key.public);
      if signer == self.fee_payer {
        self.fee_payer_signature = Some(key.sign(&message));
      }

      for update in self.updates.iter_mut().filter(|u| {
        u.target == signer
          && u.required_authorization == AuthorizationKind::Signature
      }) {
        update.authorization = Control::Signature(key.sign(&message));
      }
    }
  }
}
