use {
  serde::{Deserialize, Serialize},
  std::{
    fmt::{Debug, Display},
    ops::{Add, Mul, Neg, Sub},
    str::FromStr,
  },
  thiserror::Error,
};

/// Order of the field, `2^64 - 2^32 + 1`.
const MODULUS: u64 = 0xFFFF_FFFF_0000_0001;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  #[error("Invalid field element literal: {0}")]
  Malformed(#[from] std::num::ParseIntError),

  #[error("Value {0} is not below the field modulus")]
  OutOfRange(u64),
}

/// An element of the prime field that zkApp account state is made of.
///
/// Values are always kept in canonical form (strictly below the modulus),
/// so equality and serialization are by value.
#[derive(
  Copy,
  Clone,
  Default,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
)]
#[serde(from = "u64", into = "u64")]
pub struct Field(u64);

impl Field {
  pub const ZERO: Field = Field(0);
  pub const ONE: Field = Field(1);

  /// Reduces an arbitrary integer into the field.
  pub const fn new(value: u64) -> Self {
    Self(value % MODULUS)
  }

  pub fn as_u64(&self) -> u64 {
    self.0
  }
}

impl From<u64> for Field {
  fn from(value: u64) -> Self {
    Self::new(value)
  }
}

impl From<Field> for u64 {
  fn from(value: Field) -> Self {
    value.0
  }
}

impl Add for Field {
  type Output = Field;

  fn add(self, rhs: Field) -> Field {
    Field(((self.0 as u128 + rhs.0 as u128) % MODULUS as u128) as u64)
  }
}

impl Sub for Field {
  type Output = Field;

  fn sub(self, rhs: Field) -> Field {
    Field(
      ((self.0 as u128 + MODULUS as u128 - rhs.0 as u128) % MODULUS as u128)
        as u64,
    )
  }
}

impl Mul for Field {
  type Output = Field;

  fn mul(self, rhs: Field) -> Field {
    Field(((self.0 as u128 * rhs.0 as u128) % MODULUS as u128) as u64)
  }
}

impl Neg for Field {
  type Output = Field;

  fn neg(self) -> Field {
    Field::ZERO - self
  }
}

impl Display for Field {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl Debug for Field {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "Field({})", self.0)
  }
}

impl FromStr for Field {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let value: u64 = s.trim().parse()?;
    if value >= MODULUS {
      return Err(Error::OutOfRange(value));
    }
    Ok(Field(value))
  }
}
