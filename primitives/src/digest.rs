use {
  multihash::{Multihash, MultihashDigest},
  serde::Serialize,
};

/// SHA3-256 digest of the canonical MessagePack encoding of a value.
///
/// All hashes on the ledger (transaction commitments, update statements,
/// block hashes, state roots) are produced by this function, so two
/// values hash equally iff they serialize equally.
pub fn digest<T: Serialize + ?Sized>(value: &T) -> Multihash {
  let bytes = rmp_serde::to_vec(value)
    .expect("in-memory ledger values always have a msgpack encoding");
  multihash::Code::Sha3_256.digest(&bytes)
}
