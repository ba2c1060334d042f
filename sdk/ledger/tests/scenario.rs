mod common;

use {
  common::{address, config, deploy, update, zkapp_key, Add},
  zkapp_ledger::{ExecutionError, Ledger, SmartContract, MINA},
  zkapp_primitives::{Address, Field},
};

#[tokio::test]
async fn add_contract_lifecycle() -> anyhow::Result<()> {
  let ledger = Ledger::new(config(0));
  let deployer = ledger.funded_test_accounts(1).remove(0);
  let zkapp = zkapp_key(7);
  let target = address(&zkapp);

  deploy(&ledger, &deployer, &zkapp).await?;
  assert_eq!(ledger.height(), 1);
  assert_eq!(
    ledger.get_account(&deployer.address).expect("exists").nonce,
    1
  );
  assert_eq!(ledger.get_state(&target)?, vec![Field::ZERO]);

  let account = ledger.get_account(&target).expect("deployed");
  assert_eq!(account.verification_key, Some(Add.verification_key()));
  assert_eq!(account.permissions, Add.permissions());

  // odd height, the guard holds
  let settlement = update(&ledger, &deployer, target).await??;
  assert_eq!(settlement.height, 2);
  assert_eq!(ledger.get_state(&target)?, vec![Field::new(2)]);
  assert_eq!(settlement.accounts[&target].app_state, vec![Field::new(2)]);

  // even height, the guard does not hold
  let root = ledger.state_root();
  let nonce = ledger.get_account(&deployer.address).expect("exists").nonce;
  assert_eq!(
    update(&ledger, &deployer, target).await?.unwrap_err(),
    ExecutionError::PreconditionFailed(target)
  );
  assert_eq!(ledger.get_state(&target)?, vec![Field::new(2)]);
  assert_eq!(ledger.height(), 2);
  assert_eq!(ledger.state_root(), root);
  assert_eq!(
    ledger.get_account(&deployer.address).expect("exists").nonce,
    nonce
  );

  // any other transaction moves the clock to an odd height
  let bystander = Address::from_bytes([3; 32]);
  ledger
    .transaction(deployer.address, |tx| {
      tx.fund_new_account(bystander, MINA)?;
      Ok(())
    })?
    .sign(&[deployer.keypair()])
    .wait()
    .await?;
  assert_eq!(ledger.height(), 3);

  update(&ledger, &deployer, target).await??;
  assert_eq!(ledger.get_state(&target)?, vec![Field::new(4)]);
  assert_eq!(ledger.height(), 4);
  Ok(())
}

#[tokio::test]
async fn fee_payer_funds_new_accounts() -> anyhow::Result<()> {
  let ledger = Ledger::new(config(0));
  let payer = ledger.funded_test_accounts(1).remove(0);
  let before = ledger.get_account(&payer.address).expect("funded").balance;

  let target = Address::from_bytes([5; 32]);
  let settlement = ledger
    .transaction(payer.address, |tx| {
      tx.fund_new_account(target, 5 * MINA)?;
      Ok(())
    })?
    .sign(&[payer.keypair()])
    .wait()
    .await?;

  let fee = ledger.config().account_creation_fee;
  let payer_after = &settlement.accounts[&payer.address];
  assert_eq!(payer_after.balance, before - 5 * MINA - fee);
  assert_eq!(payer_after.nonce, 1);
  assert_eq!(ledger.get_account(&target).expect("created").balance, 5 * MINA);
  assert_eq!(settlement.accounts.len(), 2);
  assert_eq!(settlement.block.transactions.len(), 1);
  assert_eq!(settlement.state_root, ledger.state_root());
  Ok(())
}

#[tokio::test]
async fn identical_histories_reach_identical_roots() -> anyhow::Result<()> {
  async fn run(seed: u64) -> anyhow::Result<Ledger> {
    let ledger = Ledger::new(config(seed));
    let deployer = ledger.funded_test_accounts(1).remove(0);
    let zkapp = zkapp_key(seed);
    deploy(&ledger, &deployer, &zkapp).await?;
    update(&ledger, &deployer, address(&zkapp)).await??;
    Ok(ledger)
  }

  let a = run(11).await?;
  let b = run(11).await?;
  assert_eq!(a.state_root(), b.state_root());
  assert_eq!(a.head().hash(), b.head().hash());

  let c = run(12).await?;
  assert_ne!(a.state_root(), c.state_root());
  Ok(())
}

#[tokio::test]
async fn deployed_contracts_survive_faucet_top_ups() -> anyhow::Result<()> {
  let ledger = Ledger::new(config(0));
  let deployer = ledger.funded_test_accounts(1).remove(0);
  let zkapp = zkapp_key(2);
  let target = address(&zkapp);

  deploy(&ledger, &deployer, &zkapp).await?;
  update(&ledger, &deployer, target).await??;
  let deployed = ledger.get_account(&target).expect("deployed");

  // more test accounts than genesis funded
  let accounts = ledger.funded_test_accounts(config(0).test_accounts + 3);
  assert!(accounts.iter().all(|acc| acc.address != target));

  assert_eq!(ledger.get_account(&target), Some(deployed));
  assert_eq!(ledger.get_state(&target)?, vec![Field::new(2)]);
  assert_eq!(ledger.height(), 2);
  assert_eq!(
    ledger.get_account(&deployer.address).expect("exists").nonce,
    2
  );
  Ok(())
}
