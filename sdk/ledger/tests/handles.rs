mod common;

use {
  common::{address, config, deploy, zkapp_key, Add},
  zkapp_ledger::{
    BuildError,
    ExecutionError,
    Ledger,
    ProofError,
    TransactionBuilder,
  },
  zkapp_primitives::{Address, Field, MethodId},
};

#[tokio::test]
async fn stale_nonce_is_rejected() -> anyhow::Result<()> {
  let ledger = Ledger::new(config(0));
  let payer = ledger.funded_test_accounts(1).remove(0);

  let mut first = ledger.transaction(payer.address, |tx| {
    tx.set_state(payer.address, vec![Field::ONE]);
    Ok(())
  })?;
  // built against the same nonce as `first`
  let mut second = ledger.transaction(payer.address, |tx| {
    tx.set_state(payer.address, vec![Field::new(2)]);
    Ok(())
  })?;

  first.sign(&[payer.keypair()]).wait().await?;
  let root = ledger.state_root();

  assert_eq!(
    second.sign(&[payer.keypair()]).wait().await.unwrap_err(),
    ExecutionError::InvalidNonce {
      expected: 1,
      found: 0
    }
  );
  assert_eq!(ledger.state_root(), root);
  assert_eq!(ledger.get_state(&payer.address)?, vec![Field::ONE]);
  Ok(())
}

#[tokio::test]
async fn wait_is_resolved_once() -> anyhow::Result<()> {
  let ledger = Ledger::new(config(0));
  let payer = ledger.funded_test_accounts(1).remove(0);

  let mut handle = ledger.transaction(payer.address, |tx| {
    tx.set_state(payer.address, vec![Field::new(9)]);
    Ok(())
  })?;
  handle.sign(&[payer.keypair()]);

  let first = handle.wait().await?;
  let second = handle.wait().await?;
  assert_eq!(first.height, second.height);
  assert_eq!(first.state_root, second.state_root);
  assert_eq!(first.transaction, second.transaction);
  assert_eq!(ledger.height(), 1);

  // failures are cached too
  let mut unsigned = ledger.transaction(payer.address, |_| Ok(()))?;
  let err = unsigned.wait().await.unwrap_err();
  assert_eq!(err, ExecutionError::InvalidSignature(payer.address));
  assert_eq!(unsigned.wait().await.unwrap_err(), err);
  Ok(())
}

#[tokio::test]
async fn send_applies_without_waiting() -> anyhow::Result<()> {
  let ledger = Ledger::new(config(0));
  let payer = ledger.funded_test_accounts(1).remove(0);

  let mut handle = ledger.transaction(payer.address, |tx| {
    tx.set_state(payer.address, vec![Field::new(3)]);
    Ok(())
  })?;
  assert!(!handle.is_sent());
  handle.sign(&[payer.keypair()]).send().send();
  assert!(handle.is_sent());
  drop(handle);

  assert_eq!(ledger.height(), 1);
  assert_eq!(ledger.get_state(&payer.address)?, vec![Field::new(3)]);
  assert_eq!(ledger.get_account(&payer.address).expect("exists").nonce, 1);
  Ok(())
}

#[tokio::test]
async fn failed_proofs_abort_the_build() -> anyhow::Result<()> {
  let ledger = Ledger::new(config(0));
  let deployer = ledger.funded_test_accounts(1).remove(0);
  let zkapp = zkapp_key(1);
  let target = address(&zkapp);

  let before = ledger.transaction(deployer.address, |tx| {
    tx.invoke(&Add, target, "update", vec![])?;
    Ok(())
  });
  assert_eq!(before.err(), Some(BuildError::AccountNotFound(target)));

  deploy(&ledger, &deployer, &zkapp).await?;

  let failing = ledger.transaction(deployer.address, |tx| {
    tx.set_state(deployer.address, vec![Field::ONE]);
    tx.invoke(&Add, target, "fail", vec![])?;
    Ok(())
  });
  assert_eq!(
    failing.err(),
    Some(BuildError::ProofGenerationFailed(ProofError::AssertionFailed(
      "always fails".into()
    )))
  );

  let unknown = TransactionBuilder::build(&ledger, deployer.address, |tx| {
    tx.invoke(&Add, target, "subtract", vec![])?;
    Ok(())
  });
  assert_eq!(
    unknown,
    Err(BuildError::ProofGenerationFailed(ProofError::UnknownMethod(
      MethodId::from("subtract")
    )))
  );

  let arity = TransactionBuilder::build(&ledger, deployer.address, |tx| {
    tx.invoke(&Add, target, "update", vec![Field::ONE])?;
    Ok(())
  });
  assert!(matches!(
    arity,
    Err(BuildError::ProofGenerationFailed(
      ProofError::InvalidArguments { .. }
    ))
  ));

  // the aborted recordings did not leak into this build
  let tx = TransactionBuilder::build(&ledger, deployer.address, |_| Ok(()))?;
  assert!(tx.updates.is_empty());
  assert_eq!(ledger.get_state(&deployer.address)?, vec![Field::ZERO]);
  assert_eq!(ledger.height(), 1);
  Ok(())
}

#[tokio::test]
async fn proofs_are_bound_to_their_circuit() -> anyhow::Result<()> {
  let ledger = Ledger::new(config(0));
  let payer = ledger.funded_test_accounts(1).remove(0);
  let plain = Address::from_bytes([4; 32]);

  // a plain account has no circuit to prove against
  ledger
    .transaction(payer.address, |tx| {
      tx.fund_new_account(plain, 0)?;
      Ok(())
    })?
    .sign(&[payer.keypair()])
    .wait()
    .await?;

  let result = ledger.transaction(payer.address, |tx| {
    tx.invoke(&Add, plain, "update", vec![])?;
    Ok(())
  });
  assert_eq!(
    result.err(),
    Some(BuildError::ProofGenerationFailed(ProofError::NotDeployed(plain)))
  );

  // tampering with a proven update invalidates its proof
  let zkapp = zkapp_key(2);
  let target = address(&zkapp);
  deploy(&ledger, &payer, &zkapp).await?;

  let mut tx = TransactionBuilder::build(&ledger, payer.address, |tx| {
    tx.invoke(&Add, target, "update", vec![])?;
    Ok(())
  })?;
  tx.updates[0].proposed_state = Some(vec![Field::new(100)]);
  tx.sign(&[payer.keypair()]);

  assert_eq!(
    ledger.submit(tx).wait().await.unwrap_err(),
    ExecutionError::InvalidProof(target)
  );
  assert_eq!(ledger.get_state(&target)?, vec![Field::ZERO]);
  Ok(())
}

#[tokio::test]
async fn waiting_after_send_reuses_the_outcome() -> anyhow::Result<()> {
  let ledger = Ledger::new(config(0));
  let payer = ledger.funded_test_accounts(1).remove(0);

  let mut signed = ledger.transaction(payer.address, |tx| {
    tx.set_state(payer.address, vec![Field::new(5)]);
    Ok(())
  })?;
  signed.sign(&[payer.keypair()]).send();

  let settlement = signed.wait().await?;
  assert_eq!(settlement.height, 1);
  assert_eq!(settlement.transaction, signed.transaction().hash());
  assert_eq!(ledger.height(), 1);

  // signatures added after sending do not reach the ledger
  let mut unsigned = ledger.transaction(payer.address, |_| Ok(()))?;
  unsigned.send();
  let submitted = unsigned.transaction().hash();
  unsigned.sign(&[payer.keypair()]);
  assert_eq!(unsigned.transaction().hash(), submitted);
  assert_eq!(
    unsigned.wait().await.unwrap_err(),
    ExecutionError::InvalidSignature(payer.address)
  );
  assert_eq!(ledger.height(), 1);
  assert_eq!(
    ledger.get_account(&payer.address).expect("exists").nonce,
    1
  );
  Ok(())
}
