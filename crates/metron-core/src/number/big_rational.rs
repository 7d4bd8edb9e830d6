//! Arbitrary-precision fractions, used for unit scale factors
//!
//! Doubles enter either exactly, by taking the IEEE-754 bits apart, or
//! approximately, through a bounded continued-fraction expansion.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use num::bigint::Sign;
use num::{BigInt, Integer, One, Signed, ToPrimitive, Zero};
use rust_decimal::Decimal;

use crate::config::{ApproxConfig, MathContext};
use crate::error::{Result, UnitError};

type Ratio = num::BigRational;

const MANTISSA_BITS: u32 = 52;
const EXPONENT_BIAS: i64 = 1075;
const MIN_EXPONENT: i64 = -1074;

/// An unbounded fraction in lowest terms with a positive denominator
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BigRational(Ratio);

impl BigRational {
    pub fn new(numerator: impl Into<BigInt>, denominator: impl Into<BigInt>) -> Result<Self> {
        let denominator = denominator.into();
        if denominator.is_zero() {
            return Err(UnitError::DivisionByZero);
        }
        Ok(BigRational(Ratio::new(numerator.into(), denominator)))
    }

    pub fn from_integer(value: impl Into<BigInt>) -> Self {
        BigRational(Ratio::from_integer(value.into()))
    }

    pub fn zero() -> Self {
        BigRational(Ratio::zero())
    }

    pub fn one() -> Self {
        BigRational(Ratio::one())
    }

    /// `base ^ exponent` for a (possibly negative) integer exponent
    pub fn power_of(base: u32, exponent: i32) -> Self {
        let magnitude = num::pow(BigInt::from(base), exponent.unsigned_abs() as usize);
        if exponent >= 0 {
            BigRational::from_integer(magnitude)
        } else {
            BigRational(Ratio::new(BigInt::one(), magnitude))
        }
    }

    /// The exact value of a finite double: `±mantissa · 2^exponent`.
    ///
    /// `-0.0` has no signed rational counterpart and comes back from
    /// [`BigRational::to_f64`] as `0.0`; every other finite double round
    /// trips bit for bit.
    pub fn from_f64_exact(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(UnitError::invalid(format!(
                "{value} has no rational representation"
            )));
        }
        let bits = value.to_bits();
        let negative = bits >> 63 == 1;
        let biased = ((bits >> MANTISSA_BITS) & 0x7ff) as i64;
        let fraction = bits & ((1u64 << MANTISSA_BITS) - 1);

        // Subnormals have no implicit leading bit and share the smallest exponent
        let (mantissa, exponent) = if biased == 0 {
            (fraction, 1 - EXPONENT_BIAS)
        } else {
            (fraction | (1u64 << MANTISSA_BITS), biased - EXPONENT_BIAS)
        };
        if mantissa == 0 {
            return Ok(BigRational::zero());
        }

        let mantissa = if negative {
            -BigInt::from(mantissa)
        } else {
            BigInt::from(mantissa)
        };
        let ratio = if exponent >= 0 {
            Ratio::from_integer(mantissa << exponent as usize)
        } else {
            Ratio::new(mantissa, BigInt::one() << (-exponent) as usize)
        };
        Ok(BigRational(ratio))
    }

    pub fn from_f64_approx_with(value: f64, config: &ApproxConfig) -> Result<Self> {
        Self::from_f64_approx(
            value,
            config.epsilon,
            config.max_denominator,
            config.max_iterations,
        )
    }

    /// Continued-fraction approximation of `value`.
    ///
    /// Stops at the first convergent within `epsilon` of `value`, before the
    /// denominator exceeds `max_denominator`, or after `max_iterations`
    /// convergents.
    pub fn from_f64_approx(
        value: f64,
        epsilon: f64,
        max_denominator: i64,
        max_iterations: u32,
    ) -> Result<Self> {
        if !value.is_finite() {
            return Err(UnitError::invalid(format!(
                "{value} has no rational representation"
            )));
        }
        let overflow = |numerator: i64, denominator: i64| UnitError::ConversionOverflow {
            value,
            numerator,
            denominator,
        };

        let mut r0 = value;
        let mut a0 = r0.floor();
        if !fits_i64(a0) {
            return Err(overflow(a0 as i64, 1));
        }
        let a0_int = a0 as i64;
        if (a0 - value).abs() <= epsilon {
            return BigRational::new(a0_int, 1);
        }

        let (mut p0, mut q0) = (1i64, 0i64);
        let (mut p1, mut q1) = (a0_int, 1i64);
        let mut p2;
        let mut q2;
        let mut iterations = 0u32;

        loop {
            iterations += 1;
            let r1 = 1.0 / (r0 - a0);
            let a1 = r1.floor();
            if !fits_i64(a1) {
                return Err(overflow(p1, q1));
            }
            let a1_int = a1 as i64;
            p2 = a1_int
                .checked_mul(p1)
                .and_then(|v| v.checked_add(p0))
                .ok_or_else(|| overflow(p1, q1))?;
            q2 = a1_int
                .checked_mul(q1)
                .and_then(|v| v.checked_add(q0))
                .ok_or_else(|| overflow(p1, q1))?;

            let convergent = p2 as f64 / q2 as f64;
            let keep_going = iterations < max_iterations
                && (convergent - value).abs() > epsilon
                && q2 < max_denominator;
            if !keep_going {
                break;
            }
            p0 = p1;
            p1 = p2;
            q0 = q1;
            q1 = q2;
            a0 = a1;
            r0 = r1;
        }

        if iterations >= max_iterations && (p2 as f64 / q2 as f64 - value).abs() > epsilon {
            return Err(UnitError::ConversionFailed {
                value,
                iterations: max_iterations,
            });
        }

        if q2 < max_denominator {
            BigRational::new(p2, q2)
        } else {
            BigRational::new(p1, q1)
        }
    }

    pub fn numerator(&self) -> &BigInt {
        self.0.numer()
    }

    pub fn denominator(&self) -> &BigInt {
        self.0.denom()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_one(&self) -> bool {
        self.0.is_one()
    }

    pub fn is_integer(&self) -> bool {
        self.0.is_integer()
    }

    pub fn signum(&self) -> i32 {
        match self.0.numer().sign() {
            Sign::Minus => -1,
            Sign::NoSign => 0,
            Sign::Plus => 1,
        }
    }

    pub fn negate(&self) -> Self {
        -self.clone()
    }

    pub fn reciprocal(&self) -> Result<Self> {
        if self.is_zero() {
            return Err(UnitError::DivisionByZero);
        }
        Ok(BigRational(self.0.recip()))
    }

    /// Reciprocal of a value known to be non-zero
    pub(crate) fn recip_nonzero(&self) -> Self {
        debug_assert!(!self.is_zero());
        BigRational(self.0.recip())
    }

    pub fn divide(&self, other: &BigRational) -> Result<Self> {
        Ok(self.clone() * other.reciprocal()?)
    }

    /// Raise to an integer power; negative powers of zero fail
    pub fn pow(&self, exponent: i32) -> Result<Self> {
        let base = if exponent < 0 {
            self.reciprocal()?
        } else {
            self.clone()
        };
        Ok(base.pow_unsigned(exponent.unsigned_abs()))
    }

    pub fn pow_unsigned(&self, exponent: u32) -> Self {
        BigRational(num::pow(self.0.clone(), exponent as usize))
    }

    /// The exact `n`-th root, when both numerator and denominator are perfect
    /// powers. Even roots of negative values have none.
    pub fn nth_root(&self, n: u32) -> Option<Self> {
        if n == 0 {
            return None;
        }
        if n == 1 {
            return Some(self.clone());
        }
        if self.signum() < 0 && n % 2 == 0 {
            return None;
        }
        let exact = |value: &BigInt| {
            let root = value.nth_root(n);
            (num::pow(root.clone(), n as usize) == *value).then_some(root)
        };
        let numerator = exact(self.0.numer())?;
        let denominator = exact(self.0.denom())?;
        Some(BigRational(Ratio::new(numerator, denominator)))
    }

    /// Nearest double, rounding half to even. Exact for any value produced by
    /// [`BigRational::from_f64_exact`].
    pub fn to_f64(&self) -> f64 {
        if self.is_zero() {
            return 0.0;
        }
        let negative = self.signum() < 0;
        let numerator = self.0.numer().abs();
        let denominator = self.0.denom().clone();

        // Scale so the integer quotient carries 54 or 55 significant bits
        let shift = 54 + denominator.bits() as i64 - numerator.bits() as i64;
        let (dividend, divisor) = if shift >= 0 {
            (numerator << shift as usize, denominator)
        } else {
            (numerator, denominator << (-shift) as usize)
        };
        let (quotient, remainder) = dividend.div_rem(&divisor);
        let quotient = quotient.to_u64().unwrap_or(u64::MAX);
        let sticky = !remainder.is_zero();
        let exponent = -shift;

        let width = 64 - quotient.leading_zeros() as i64;
        let mut dropped = width - 53;
        if exponent + dropped < MIN_EXPONENT {
            dropped = MIN_EXPONENT - exponent;
        }
        if dropped > 55 {
            return if negative { -0.0 } else { 0.0 };
        }

        let half = 1u64 << (dropped - 1);
        let rest = quotient & ((1u64 << dropped) - 1);
        let mut mantissa = quotient >> dropped;
        let round_up = rest > half || (rest == half && (sticky || mantissa & 1 == 1));
        if round_up {
            mantissa += 1;
        }
        let mut lsb_exponent = exponent + dropped;
        if mantissa == 1u64 << 53 {
            mantissa >>= 1;
            lsb_exponent += 1;
        }

        let bits = if mantissa >= 1u64 << MANTISSA_BITS {
            let biased = lsb_exponent + EXPONENT_BIAS;
            if biased >= 0x7ff {
                return if negative {
                    f64::NEG_INFINITY
                } else {
                    f64::INFINITY
                };
            }
            ((biased as u64) << MANTISSA_BITS) | (mantissa & ((1u64 << MANTISSA_BITS) - 1))
        } else {
            // subnormal: lsb_exponent is pinned to MIN_EXPONENT
            mantissa
        };
        let value = f64::from_bits(bits);
        if negative {
            -value
        } else {
            value
        }
    }

    /// This fraction as a decimal rounded to `ctx`
    pub fn to_decimal(&self, ctx: &MathContext) -> Result<Decimal> {
        let numerator = big_to_decimal(self.0.numer())?;
        let denominator = big_to_decimal(self.0.denom())?;
        let value = numerator
            .checked_div(denominator)
            .ok_or(UnitError::DecimalOverflow)?;
        Ok(ctx.round(value))
    }

    pub(crate) fn numerator_f64(&self) -> f64 {
        self.0.numer().to_f64().unwrap_or(f64::NAN)
    }

    pub(crate) fn denominator_f64(&self) -> f64 {
        self.0.denom().to_f64().unwrap_or(f64::NAN)
    }
}

/// Whether a whole double survives `as i64` unchanged. `i64::MAX as f64`
/// rounds up to 2^63, so the upper bound is exclusive.
fn fits_i64(value: f64) -> bool {
    (i64::MIN as f64..i64::MAX as f64).contains(&value)
}

pub(crate) fn big_to_decimal(value: &BigInt) -> Result<Decimal> {
    let value = value.to_i128().ok_or(UnitError::DecimalOverflow)?;
    Decimal::try_from_i128_with_scale(value, 0).map_err(|_| UnitError::DecimalOverflow)
}

impl From<i64> for BigRational {
    fn from(value: i64) -> Self {
        BigRational::from_integer(value)
    }
}

impl From<crate::Rational> for BigRational {
    fn from(value: crate::Rational) -> Self {
        BigRational(Ratio::new(
            BigInt::from(value.numerator()),
            BigInt::from(value.denominator()),
        ))
    }
}

impl Add for BigRational {
    type Output = BigRational;

    fn add(self, rhs: BigRational) -> BigRational {
        BigRational(self.0 + rhs.0)
    }
}

impl Sub for BigRational {
    type Output = BigRational;

    fn sub(self, rhs: BigRational) -> BigRational {
        BigRational(self.0 - rhs.0)
    }
}

impl Mul for BigRational {
    type Output = BigRational;

    fn mul(self, rhs: BigRational) -> BigRational {
        BigRational(self.0 * rhs.0)
    }
}

impl Mul<&BigRational> for &BigRational {
    type Output = BigRational;

    fn mul(self, rhs: &BigRational) -> BigRational {
        BigRational(&self.0 * &rhs.0)
    }
}

impl Neg for BigRational {
    type Output = BigRational;

    fn neg(self) -> BigRational {
        BigRational(-self.0)
    }
}

impl BigRational {
    pub fn compare(&self, other: &BigRational) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl fmt::Display for BigRational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_integer() {
            write!(f, "{}", self.0.numer())
        } else {
            write!(f, "{}/{}", self.0.numer(), self.0.denom())
        }
    }
}
