use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Sub},
};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

//--------------------------------------      Dollars       ----------------------------------------------------------
/// A whole-dollar price, as used throughout the dealership catalogue and order book.
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct Dollars(i64);

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented in dollars: {0}")]
pub struct DollarsConversionError(String);

impl From<i64> for Dollars {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl PartialEq for Dollars {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Dollars {}

impl TryFrom<u64> for Dollars {
    type Error = DollarsConversionError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value > i64::MAX as u64 {
            Err(DollarsConversionError(format!("Value {} is too large to convert to Dollars", value)))
        } else {
            #[allow(clippy::cast_possible_wrap)]
            Ok(Self(value as i64))
        }
    }
}

impl Add for Dollars {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Dollars {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Sum for Dollars {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl Display for Dollars {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${}", self.0)
    }
}

impl Dollars {
    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod test {
    use super::Dollars;

    #[test]
    fn arithmetic_and_display() {
        let a = Dollars::from(250_000);
        let b = Dollars::from(200_000);
        assert_eq!(a + b, Dollars::from(450_000));
        assert_eq!(a - b, Dollars::from(50_000));
        assert_eq!(format!("{a}"), "$250000");
    }

    #[test]
    fn sums_over_iterators() {
        let total: Dollars = [250_000, 350_000, 450_000].into_iter().map(Dollars::from).sum();
        assert_eq!(total.value(), 1_050_000);
    }
}
