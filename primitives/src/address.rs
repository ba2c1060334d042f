use {
  ed25519_dalek::{PublicKey, Signature, Verifier},
  serde::{Deserialize, Serialize},
  std::{
    fmt::{Debug, Display},
    ops::Deref,
    str::FromStr,
  },
  thiserror::Error,
};

#[derive(Debug, Error)]
pub enum Error {
  #[error("Invalid base58 encoding: {0}")]
  Base58(#[from] bs58::decode::Error),

  #[error("Address must be 32 bytes long, got {0}")]
  InvalidLength(usize),
}

/// Represents an address of an account.
///
/// An address is the 32 bytes of an ed25519 public key. The same
/// address identifies a user wallet or a zkApp account; the only
/// difference between the two is whether a verification key has been
/// deployed to the account.
///
/// Updates that require a signature are checked against the key
/// encoded in the target address, so whoever holds the matching
/// private key is the only party able to authorize them.
#[derive(
  Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Address([u8; 32]);

impl Address {
  pub fn from_bytes(bytes: [u8; 32]) -> Self {
    Self(bytes)
  }

  /// Interprets the address as an ed25519 public key.
  ///
  /// Fails if the bytes are not a valid compressed curve point, which
  /// can happen for addresses that were not derived from a keypair.
  pub fn public_key(&self) -> Result<PublicKey, ed25519_dalek::SignatureError> {
    PublicKey::from_bytes(&self.0)
  }

  /// Checks a signature over `message` against the key of this address.
  pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
    match self.public_key() {
      Ok(pubkey) => pubkey.verify(message, signature).is_ok(),
      Err(_) => false,
    }
  }
}

impl AsRef<[u8]> for Address {
  fn as_ref(&self) -> &[u8] {
    &self.0
  }
}

impl Deref for Address {
  type Target = [u8];

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl Display for Address {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", bs58::encode(self.0).into_string())
  }
}

impl Debug for Address {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "address({})", bs58::encode(self.0).into_string())
  }
}

impl From<Address> for String {
  fn from(addr: Address) -> Self {
    bs58::encode(addr.0).into_string()
  }
}

impl FromStr for Address {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let bytes = bs58::decode(s).into_vec()?;
    let len = bytes.len();
    Ok(Self(bytes.try_into().map_err(|_| Error::InvalidLength(len))?))
  }
}

impl TryFrom<&str> for Address {
  type Error = Error;

  fn try_from(value: &str) -> Result<Self, Self::Error> {
    FromStr::from_str(value)
  }
}

impl From<PublicKey> for Address {
  fn from(p: PublicKey) -> Self {
    Self(*p.as_bytes())
  }
}

impl From<&PublicKey> for Address {
  fn from(p: &PublicKey) -> Self {
    Self(*p.as_bytes())
  }
}
