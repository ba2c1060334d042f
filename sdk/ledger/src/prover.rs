use {
  crate::{MethodContext, ProofError, SmartContract},
  std::time::Duration,
  tracing::debug,
  zkapp_primitives::{
    digest,
    Account,
    AccountUpdate,
    Address,
    AuthorizationKind,
    Control,
    Field,
    MethodId,
    Multihash,
    NetworkView,
    Proof,
    ToBase58String,
    UpdateKind,
    VerificationKey,
  },
  zkapp_vm::ProofVerifier,
};

/// A request to prove one contract method invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
  pub target: Address,
  pub method: MethodId,
  pub args: Vec<Field>,
}

/// The proving side of the proof system.
///
/// Given a contract, a method call and the current on-chain state of the
/// contract account, runs the method and produces an account update
/// carrying a proof of its correct execution, or fails.
pub trait ProofSystem: ProofVerifier {
  fn prove(
    &self,
    contract: &dyn SmartContract,
    call: &MethodCall,
    current: &Account,
    network: &NetworkView,
  ) -> Result<AccountUpdate, ProofError>;
}

/// Stand-in for a real proving backend.
///
/// Runs the contract natively and binds the resulting update to the
/// circuit with a digest of the verification key and the statement.
/// It offers no zero-knowledge or soundness guarantees, only the
/// bookkeeping of a real prover: a proof is valid only for the circuit
/// and exact update it was produced for.
#[derive(Debug, Clone, Default)]
pub struct SimulatedProofSystem {
  latency: Duration,
}

impl SimulatedProofSystem {
  pub fn new() -> Self {
    Self::default()
  }

  /// Makes every proof take at least `latency` to produce, to mimic
  /// a slow proving worker.
  pub fn with_latency(latency: Duration) -> Self {
    Self { latency }
  }

  fn proof_for(key: &VerificationKey, statement: &Multihash) -> Proof {
    Proof::new(digest(&(key, statement)))
  }
}

impl ProofVerifier for SimulatedProofSystem {
  fn verify(
    &self,
    proof: &Proof,
    key: &VerificationKey,
    statement: &Multihash,
  ) -> bool {
    proof == &Self::proof_for(key, statement)
  }
}

impl ProofSystem for SimulatedProofSystem {
  fn prove(
    &self,
    contract: &dyn SmartContract,
    call: &MethodCall,
    current: &Account,
    network: &NetworkView,
  ) -> Result<AccountUpdate, ProofError> {
    let key = contract.verification_key();
    match current.verification_key {
      None => return Err(ProofError::NotDeployed(call.target)),
      Some(deployed) if deployed != key => {
        return Err(ProofError::KeyMismatch(call.target))
      }
      Some(_) => {}
    }

    let ctx = MethodContext {
      account: current,
      network: *network,
    };
    let output = contract.execute(&call.method, &call.args, &ctx)?;

    let mut update = AccountUpdate::new(call.target, UpdateKind::InvokeMethod {
      method: call.method.clone(),
      args: call.args.clone(),
    })
    .with_proposed_state(output.proposed_state)
    .requiring(AuthorizationKind::Proof);

    if let Some(precondition) = output.precondition {
      update = update.with_precondition(precondition);
    }

    if !self.latency.is_zero() {
      std::thread::sleep(self.latency);
    }

    let statement = update.statement();
    let proof = Self::proof_for(&key, &statement);
    debug!(
      "proved {}.{} on {}: statement {}",
      contract.name(),
      call.method,
      call.target,
      statement.to_b58()
    );

    Ok(update.authorized(Control::Proof(proof)))
  }
}
