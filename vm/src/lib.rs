mod collect;
mod execution;
mod state;
mod verify;

pub use {
  execution::{execute, Action, Environment, Error as ExecutionError},
  state::{InMemoryStateStore, State, StateDiff},
  verify::ProofVerifier,
};
