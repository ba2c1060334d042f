use {
  ed25519_dalek::Keypair,
  rand::{rngs::StdRng, SeedableRng},
  zkapp_ledger::{
    ExecutionError,
    Ledger,
    LedgerConfig,
    MethodContext,
    MethodOutput,
    ProofError,
    Settlement,
    SmartContract,
    TestAccount,
  },
  zkapp_primitives::{Address, Condition, Field, MethodId, Precondition},
};

/// Adds two to its single state element, but only on odd block heights.
pub struct Add;

impl SmartContract for Add {
  fn name(&self) -> &str {
    "add"
  }

  fn execute(
    &self,
    method: &MethodId,
    args: &[Field],
    ctx: &MethodContext<'_>,
  ) -> Result<MethodOutput, ProofError> {
    match method.as_str() {
      "update" => {
        if !args.is_empty() {
          return Err(ProofError::InvalidArguments {
            method: method.clone(),
            expected: 0,
            found: args.len(),
          });
        }
        let current = ctx.state(0)?;
        Ok(MethodOutput {
          proposed_state: vec![current + Field::new(2)],
          precondition: Some(
            Precondition::from(Condition::StateEquals {
              index: 0,
              value: current,
            })
            .and(
              Condition::HeightModulo {
                modulus: 2,
                remainder: 1,
              }
              .into(),
            ),
          ),
        })
      }
      "fail" => Err(ProofError::AssertionFailed("always fails".into())),
      _ => Err(ProofError::UnknownMethod(method.clone())),
    }
  }
}

pub fn config(seed: u64) -> LedgerConfig {
  LedgerConfig {
    test_accounts: 2,
    app_state_width: 1,
    genesis_seed: seed,
    ..Default::default()
  }
}

/// Deterministic key for the contract account.
pub fn zkapp_key(seed: u64) -> Keypair {
  Keypair::generate(&mut StdRng::seed_from_u64(seed))
}

pub fn address(keypair: &Keypair) -> Address {
  Address::from(&keypair.public)
}

/// Creates, deploys and initializes `Add` at the address of `zkapp`,
/// leaving the ledger at height 1 with state `[0]`.
pub async fn deploy(
  ledger: &Ledger,
  deployer: &TestAccount,
  zkapp: &Keypair,
) -> anyhow::Result<()> {
  let target = address(zkapp);
  ledger
    .transaction(deployer.address, |tx| {
      tx.fund_new_account(target, 0)?;
      tx.deploy(&Add, target).init(&Add, target);
      Ok(())
    })?
    .sign(&[deployer.keypair(), zkapp])
    .wait()
    .await?;
  Ok(())
}

/// Invokes `Add.update` signed only by the fee payer.
pub async fn update(
  ledger: &Ledger,
  payer: &TestAccount,
  zkapp: Address,
) -> anyhow::Result<Result<Settlement, ExecutionError>> {
  Ok(
    ledger
      .transaction(payer.address, |tx| {
        tx.invoke(&Add, zkapp, "update", vec![])?;
        Ok(())
      })?
      .sign(&[payer.keypair()])
      .wait()
      .await,
  )
}
