use {
  clap::Parser,
  humantime::Duration,
  zkapp_ledger::{LedgerConfig, MINA},
};

/// zkApp Local Devnode
///
/// Starts a single node local ledger, deploys the Add contract to it
/// and drives it through a few proven state transitions.
#[derive(Debug, Parser)]
pub struct SystemSettings {
  /// Number of test accounts funded at genesis
  #[clap(long, short = 'a', default_value = "10", value_name = "COUNT")]
  accounts: usize,

  /// Genesis balance of every test account, in mina
  #[clap(long, short, default_value = "1000", value_name = "MINA")]
  balance: u64,

  /// Fee charged for every account a transaction creates, in mina
  #[clap(long, default_value = "1", value_name = "MINA")]
  creation_fee: u64,

  /// Number of field elements in every account's app state
  #[clap(long, short = 'w', default_value = "8", value_name = "WIDTH")]
  state_width: usize,

  /// Seed test account and contract keys are derived from
  #[clap(long, short, default_value = "0", value_name = "SEED")]
  seed: u64,

  /// Artificial time it takes to produce one proof
  #[clap(long, short = 'l', default_value = "0s", value_name = "DURATION")]
  proof_latency: Duration,
}

impl SystemSettings {
  pub fn ledger_config(&self) -> LedgerConfig {
    LedgerConfig {
      test_accounts: self.accounts,
      test_account_balance: self.balance.saturating_mul(MINA),
      account_creation_fee: self.creation_fee.saturating_mul(MINA),
      app_state_width: self.state_width,
      genesis_seed: self.seed,
    }
  }

  pub fn seed(&self) -> u64 {
    self.seed
  }

  pub fn proof_latency(&self) -> std::time::Duration {
    self.proof_latency.into()
  }
}
