use {
  zkapp_ledger::{MethodContext, MethodOutput, ProofError, SmartContract},
  zkapp_primitives::{Condition, Field, MethodId, Precondition},
};

/// Keeps a number in its first state slot and adds two to it on
/// every `update`. Updates are only valid at odd chain heights.
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
    if method.as_str() != "update" {
      return Err(ProofError::UnknownMethod(method.clone()));
    }

    if !args.is_empty() {
      return Err(ProofError::InvalidArguments {
        method: method.clone(),
        expected: 0,
        found: args.len(),
      });
    }

    let num = ctx.state(0)?;
    let mut proposed = ctx.account.app_state.clone();
    proposed[0] = num + Field::new(2);

    let guard = Precondition::from(Condition::StateEquals {
      index: 0,
      value: num,
    })
    .and(
      Condition::HeightModulo {
        modulus: 2,
        remainder: 1,
      }
      .into(),
    );

    Ok(MethodOutput {
      proposed_state: proposed,
      precondition: Some(guard),
    })
  }
}
