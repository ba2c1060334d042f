mod account;
mod address;
mod b58;
mod block;
mod digest;
mod field;
mod precondition;
mod proof;
mod transaction;
mod update;

pub use {
  account::{Account, AppState, AuthRequired, Permissions},
  address::{Address, Error as AddressError},
  b58::ToBase58String,
  block::Block,
  digest::digest,
  field::{Error as FieldError, Field},
  multihash::Multihash,
  precondition::{ClosedInterval, Condition, NetworkView, Precondition},
  proof::{Proof, VerificationKey},
  transaction::Transaction,
  update::{AccountUpdate, AuthorizationKind, Control, MethodId, UpdateKind},
};
