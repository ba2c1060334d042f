/// Number of nanomina in one mina.
pub const MINA: u64 = 1_000_000_000;

/// Parameters of a local ledger instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
  /// Number of accounts funded at genesis.
  pub test_accounts: usize,

  /// Genesis balance of every test account, in nanomina.
  pub test_account_balance: u64,

  /// Charged to the fee payer for every account a transaction creates.
  pub account_creation_fee: u64,

  /// Number of field elements in the app state of every account.
  /// Fixed for the lifetime of the ledger.
  pub app_state_width: usize,

  /// Test account keys are derived from this seed, so two ledgers
  /// with the same seed start from identical state.
  pub genesis_seed: u64,
}

impl Default for LedgerConfig {
  fn default() -> Self {
    Self {
      test_accounts: 10,
      test_account_balance: 1_000 * MINA,
      account_creation_fee: MINA,
      app_state_width: 8,
      genesis_seed: 0,
    }
  }
}
