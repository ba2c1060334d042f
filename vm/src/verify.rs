use {
  crate::ExecutionError as Error,
  ed25519_dalek::Signature,
  rayon::prelude::*,
  std::sync::atomic::{AtomicUsize, Ordering},
  zkapp_primitives::{Address, Multihash, Proof, VerificationKey},
};

/// Verification side of the proof system.
///
/// The ledger never looks inside proofs; it only asks an implementation
/// of this trait whether a proof is valid for a verification key and
/// the statement of the update carrying it.
pub trait ProofVerifier: Send + Sync {
  fn verify(
    &self,
    proof: &Proof,
    key: &VerificationKey,
    statement: &Multihash,
  ) -> bool;
}

/// One authorization check of a transaction.
#[derive(Debug)]
pub(crate) enum Check {
  /// Resolution already failed, e.g. the authorization is missing.
  Rejected(Error),

  /// Signature over the transaction commitment by the key of `signer`.
  Signature {
    signer: Address,
    signature: Signature,
  },

  /// Proof of an update statement under the target's verification key.
  Proof {
    target: Address,
    proof: Proof,
    key: VerificationKey,
    statement: Multihash,
  },
}

impl Check {
  fn run(
    self,
    commitment: &[u8],
    verifier: &dyn ProofVerifier,
  ) -> Result<(), Error> {
    match self {
      Check::Rejected(e) => Err(e),
      Check::Signature { signer, signature } => {
        match signer.verify(commitment, &signature) {
          true => Ok(()),
          false => Err(Error::InvalidSignature(signer)),
        }
      }
      Check::Proof {
        target,
        proof,
        key,
        statement,
      } => match verifier.verify(&proof, &key, &statement) {
        true => Ok(()),
        false => Err(Error::InvalidProof(target)),
      },
    }
  }
}

/// Runs all authorization checks in parallel and returns Ok(()) if every
/// one of them passes.
///
/// Otherwise the error of the earliest failing check (in transaction
/// order) is returned. Checks positioned after an already observed
/// failure are skipped, checks before it still run, so the reported
/// error does not depend on thread scheduling.
pub(crate) fn run_checks(
  commitment: &[u8],
  checks: Vec<Check>,
  verifier: &dyn ProofVerifier,
) -> Result<(), Error> {
  let first_failure = AtomicUsize::new(usize::MAX);
  let failure = checks
    .into_par_iter()
    .enumerate()
    .filter_map(|(index, check)| {
      if index > first_failure.load(Ordering::Acquire) {
        return None; // cancelled by an earlier failure
      }

      match check.run(commitment, verifier) {
        Ok(()) => None,
        Err(e) => {
          first_failure.fetch_min(index, Ordering::AcqRel);
          Some((index, e))
        }
      }
    })
    .min_by_key(|(index, _)| *index);

  match failure {
    Some((_, e)) => Err(e),
    None => Ok(()),
  }
}
