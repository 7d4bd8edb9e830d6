//! Fixed-width exact fractions, used for unit and dimension exponents

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use num::integer::gcd;
use serde::{Deserialize, Serialize};

use crate::error::{Result, UnitError};

/// An `i64` fraction kept in lowest terms with a positive denominator.
///
/// Arithmetic goes through `i128` and reduces before narrowing back, so
/// intermediate products never overflow. A reduced result that does not fit
/// in `i64` panics, like primitive integer overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRational", into = "RawRational")]
pub struct Rational {
    numerator: i64,
    denominator: i64,
}

#[derive(Serialize, Deserialize)]
struct RawRational(i64, i64);

impl Rational {
    pub const ZERO: Rational = Rational {
        numerator: 0,
        denominator: 1,
    };
    pub const ONE: Rational = Rational {
        numerator: 1,
        denominator: 1,
    };

    /// Create `numerator / denominator`, reduced
    pub fn new(numerator: i64, denominator: i64) -> Result<Self> {
        if denominator == 0 {
            return Err(UnitError::DivisionByZero);
        }
        Ok(Self::reduce(numerator as i128, denominator as i128))
    }

    pub const fn integer(value: i64) -> Self {
        Rational {
            numerator: value,
            denominator: 1,
        }
    }

    fn reduce(numerator: i128, denominator: i128) -> Self {
        debug_assert!(denominator != 0);
        let divisor = gcd(numerator, denominator).max(1);
        let sign = if denominator < 0 { -1 } else { 1 };
        let numerator = sign * numerator / divisor;
        let denominator = sign * denominator / divisor;
        Rational {
            numerator: i64::try_from(numerator).expect("rational numerator overflow"),
            denominator: i64::try_from(denominator).expect("rational denominator overflow"),
        }
    }

    pub fn numerator(&self) -> i64 {
        self.numerator
    }

    pub fn denominator(&self) -> i64 {
        self.denominator
    }

    pub fn is_zero(&self) -> bool {
        self.numerator == 0
    }

    pub fn is_one(&self) -> bool {
        self.numerator == 1 && self.denominator == 1
    }

    pub fn is_integer(&self) -> bool {
        self.denominator == 1
    }

    /// -1, 0 or 1
    pub fn signum(&self) -> i64 {
        self.numerator.signum()
    }

    pub fn abs(&self) -> Self {
        Rational {
            numerator: self.numerator.abs(),
            denominator: self.denominator,
        }
    }

    pub fn negate(&self) -> Self {
        -*self
    }

    pub fn reciprocal(&self) -> Result<Self> {
        Rational::new(self.denominator, self.numerator)
    }

    pub fn divide(&self, other: &Rational) -> Result<Self> {
        Ok(*self * other.reciprocal()?)
    }

    pub fn multiply_int(&self, factor: i64) -> Self {
        Self::reduce(self.numerator as i128 * factor as i128, self.denominator as i128)
    }

    /// Raise to an integer power. Negative powers of zero fail, and so do
    /// results that leave the `i64` range.
    pub fn pow(&self, exponent: i32) -> Result<Self> {
        let base = if exponent < 0 {
            self.reciprocal()?
        } else {
            *self
        };
        let magnitude = exponent.unsigned_abs();
        // powers of coprime parts stay coprime, so no reduction is needed
        match (
            base.numerator.checked_pow(magnitude),
            base.denominator.checked_pow(magnitude),
        ) {
            (Some(numerator), Some(denominator)) => Ok(Rational {
                numerator,
                denominator,
            }),
            _ => Err(UnitError::invalid(format!(
                "({self})^{exponent} does not fit in 64 bits"
            ))),
        }
    }

    pub fn to_f64(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

impl Default for Rational {
    fn default() -> Self {
        Rational::ZERO
    }
}

impl From<i64> for Rational {
    fn from(value: i64) -> Self {
        Rational::integer(value)
    }
}

impl From<i32> for Rational {
    fn from(value: i32) -> Self {
        Rational::integer(value as i64)
    }
}

impl TryFrom<RawRational> for Rational {
    type Error = UnitError;

    fn try_from(raw: RawRational) -> Result<Self> {
        Rational::new(raw.0, raw.1)
    }
}

impl From<Rational> for RawRational {
    fn from(value: Rational) -> Self {
        RawRational(value.numerator, value.denominator)
    }
}

impl Add for Rational {
    type Output = Rational;

    fn add(self, rhs: Rational) -> Rational {
        let n = self.numerator as i128 * rhs.denominator as i128
            + rhs.numerator as i128 * self.denominator as i128;
        let d = self.denominator as i128 * rhs.denominator as i128;
        Rational::reduce(n, d)
    }
}

impl Sub for Rational {
    type Output = Rational;

    fn sub(self, rhs: Rational) -> Rational {
        self + (-rhs)
    }
}

impl Mul for Rational {
    type Output = Rational;

    fn mul(self, rhs: Rational) -> Rational {
        Rational::reduce(
            self.numerator as i128 * rhs.numerator as i128,
            self.denominator as i128 * rhs.denominator as i128,
        )
    }
}

impl Mul<i64> for Rational {
    type Output = Rational;

    fn mul(self, rhs: i64) -> Rational {
        self.multiply_int(rhs)
    }
}

impl Neg for Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational {
            numerator: -self.numerator,
            denominator: self.denominator,
        }
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = self.numerator as i128 * other.denominator as i128;
        let rhs = other.numerator as i128 * self.denominator as i128;
        lhs.cmp(&rhs)
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denominator == 1 {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn r(n: i64, d: i64) -> Rational {
        Rational::new(n, d).unwrap()
    }

    #[test]
    fn test_reduction() {
        assert_eq!(r(2, 4), r(1, 2));
        assert_eq!(r(2, -4).numerator(), -1);
        assert_eq!(r(2, -4).denominator(), 2);
        assert_eq!(r(0, -7), Rational::ZERO);
    }

    #[test]
    fn test_zero_denominator() {
        assert_eq!(Rational::new(1, 0), Err(UnitError::DivisionByZero));
        assert_eq!(Rational::ZERO.reciprocal(), Err(UnitError::DivisionByZero));
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(r(1, 2) + r(1, 3), r(5, 6));
        assert_eq!(r(1, 2) - r(1, 3), r(1, 6));
        assert_eq!(r(2, 3) * r(3, 4), r(1, 2));
        assert_eq!(r(2, 3).divide(&r(4, 3)).unwrap(), r(1, 2));
        assert_eq!(r(3, 4) * 4, Rational::integer(3));
        assert_eq!(r(-2, 3).reciprocal().unwrap(), r(-3, 2));
    }

    #[test]
    fn test_pow() {
        assert_eq!(r(2, 3).pow(3).unwrap(), r(8, 27));
        assert_eq!(r(2, 3).pow(-2).unwrap(), r(9, 4));
        assert_eq!(r(5, 7).pow(0).unwrap(), Rational::ONE);
        assert!(Rational::ZERO.pow(-1).is_err());
    }

    #[test]
    fn test_pow_extreme_exponents() {
        assert_eq!(Rational::ONE.pow(i32::MIN).unwrap(), Rational::ONE);
        assert_eq!(Rational::integer(-1).pow(i32::MIN).unwrap(), Rational::ONE);
        assert_eq!(Rational::integer(-1).pow(i32::MAX).unwrap(), Rational::integer(-1));
        assert!(matches!(
            Rational::integer(2).pow(i32::MIN),
            Err(UnitError::InvalidArgument(_))
        ));
        assert!(Rational::integer(2).pow(63).is_err());
        assert_eq!(r(-1, 2).pow(-3).unwrap(), Rational::integer(-8));
    }

    #[test]
    fn test_ordering_and_signum() {
        assert!(r(1, 3) < r(1, 2));
        assert!(r(-1, 2) < Rational::ZERO);
        assert_eq!(r(-5, 3).signum(), -1);
        assert_eq!(Rational::ZERO.signum(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(r(4, 2).to_string(), "2");
        assert_eq!(r(-1, 3).to_string(), "-1/3");
    }

    #[test]
    fn test_serde_validates() {
        let half: Rational = serde_json::from_str("[2,4]").unwrap();
        assert_eq!(half, r(1, 2));
        assert!(serde_json::from_str::<Rational>("[1,0]").is_err());
    }

    proptest! {
        #[test]
        fn prop_always_reduced(n in -1_000_000i64..1_000_000, d in 1i64..1_000_000) {
            let f = r(n, if n % 2 == 0 { d } else { -d });
            prop_assert!(f.denominator() > 0);
            prop_assert_eq!(gcd(f.numerator().abs(), f.denominator()), 1);
        }

        #[test]
        fn prop_additive_inverse(n in -1_000_000i64..1_000_000, d in 1i64..1_000_000) {
            let f = r(n, d);
            prop_assert_eq!(f + f.negate(), Rational::ZERO);
        }
    }
}
