mod builder;
mod config;
mod contract;
mod handle;
mod ledger;
mod prover;

pub use {
  builder::{BuildError, TransactionBuilder},
  config::{LedgerConfig, MINA},
  contract::{MethodContext, MethodOutput, ProofError, SmartContract},
  handle::{Settlement, TransactionHandle},
  ledger::{Ledger, TestAccount},
  prover::{MethodCall, ProofSystem, SimulatedProofSystem},
  zkapp_vm::{ExecutionError, ProofVerifier},
};
