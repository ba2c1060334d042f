use {
  crate::{add::Add, settings::SystemSettings},
  clap::Parser,
  ed25519_dalek::Keypair,
  rand::{rngs::StdRng, SeedableRng},
  tracing::{info, subscriber::set_global_default, warn},
  tracing_subscriber::{EnvFilter, FmtSubscriber},
  zkapp_ledger::{Ledger, SimulatedProofSystem, TestAccount},
  zkapp_primitives::{Address, Field, ToBase58String},
};

mod add;
mod settings;

async fn update(
  ledger: &Ledger,
  deployer: &TestAccount,
  zkapp: Address,
) -> anyhow::Result<()> {
  ledger
    .transaction(deployer.address, |tx| {
      tx.memo("add 2").invoke(&Add, zkapp, "update", vec![])?;
      Ok(())
    })?
    .sign(&[deployer.keypair()])
    .wait()
    .await?;
  Ok(())
}

fn num(ledger: &Ledger, zkapp: &Address) -> anyhow::Result<Field> {
  Ok(ledger.get_state(zkapp)?[0])
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // configure logging
  set_global_default(
    FmtSubscriber::builder()
      .with_env_filter(
        EnvFilter::try_from_default_env()
          .unwrap_or_else(|_| EnvFilter::new("info")),
      )
      .finish(),
  )?;

  // gather CLI parameters
  let settings = SystemSettings::parse();
  info!("startup settings: {settings:#?}");
  anyhow::ensure!(
    settings.ledger_config().app_state_width > 0,
    "the Add contract needs at least one state element"
  );

  // start a local ledger
  let ledger = Ledger::with_proof_system(
    settings.ledger_config(),
    SimulatedProofSystem::with_latency(settings.proof_latency()),
  );
  let deployer = ledger.funded_test_accounts(1).remove(0);

  // the account the contract is deployed to
  let zkapp_key =
    Keypair::generate(&mut StdRng::seed_from_u64(settings.seed()));
  let zkapp = Address::from(&zkapp_key.public);

  ledger
    .transaction(deployer.address, |tx| {
      tx.memo("deploy add").fund_new_account(zkapp, 0)?;
      tx.deploy(&Add, zkapp).init(&Add, zkapp);
      Ok(())
    })?
    .sign(&[deployer.keypair(), &zkapp_key])
    .wait()
    .await?;
  info!("num after init: {}", num(&ledger, &zkapp)?);

  update(&ledger, &deployer, zkapp).await?;
  info!("add 2: {}", num(&ledger, &zkapp)?);

  // lands on an even height, where the contract refuses to update
  if let Err(e) = update(&ledger, &deployer, zkapp).await {
    warn!("{e}");
  }
  info!("add 2: {}", num(&ledger, &zkapp)?);

  // any accepted transaction moves the clock back to an odd height
  ledger
    .transaction(deployer.address, |tx| {
      tx.memo("tick");
      Ok(())
    })?
    .sign(&[deployer.keypair()])
    .wait()
    .await?;
  info!("ledger height: {}", ledger.height());

  update(&ledger, &deployer, zkapp).await?;
  info!("add 2: {}", num(&ledger, &zkapp)?);

  info!(
    "closing the local ledger at height {}, state root {}",
    ledger.height(),
    ledger.state_root().to_b58()
  );
  Ok(())
}
