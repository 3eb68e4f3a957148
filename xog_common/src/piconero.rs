use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign},
};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

pub const XMR_CURRENCY_CODE: &str = "XMR";
pub const XMR_CURRENCY_CODE_LOWER: &str = "xmr";

/// Number of piconero in one Monero.
const PICONERO_PER_XMR: i64 = 1_000_000_000_000;

//--------------------------------------     Piconero       ----------------------------------------------------------
/// An amount of Monero, in atomic units (1 XMR = 10^12 piconero).
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct Piconero(i64);

impl Add for Piconero {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Piconero {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl AddAssign for Piconero {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Piconero {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Piconero {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Mul<i64> for Piconero {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self::from(self.value() * rhs)
    }
}

impl Sum for Piconero {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented in piconero: {0}")]
pub struct PiconeroConversionError(String);

impl From<i64> for Piconero {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl PartialEq for Piconero {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Piconero {}

impl TryFrom<u64> for Piconero {
    type Error = PiconeroConversionError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value > i64::MAX as u64 {
            Err(PiconeroConversionError(format!("Value {} is too large to convert to Piconero", value)))
        } else {
            #[allow(clippy::cast_possible_wrap)]
            Ok(Self(value as i64))
        }
    }
}

impl Display for Piconero {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 < 1_000_000 {
            write!(f, "{}pXMR", self.0)
        } else {
            let xmr = self.0 as f64 / PICONERO_PER_XMR as f64;
            write!(f, "{xmr:0.6}XMR")
        }
    }
}

impl Piconero {
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn from_xmr(xmr: i64) -> Self {
        Self(xmr * PICONERO_PER_XMR)
    }
}
