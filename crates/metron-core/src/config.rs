//! Numeric evaluation settings
//!
//! Both settings structs deserialize with defaults for every missing field,
//! so a host application can keep them in its own config file.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Rounding applied after every decimal converter step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    /// Round half to even (banker's rounding)
    #[default]
    HalfEven,
    HalfUp,
    HalfDown,
    /// Round towards zero
    Down,
    /// Round away from zero
    Up,
    Floor,
    Ceiling,
}

impl Rounding {
    pub fn strategy(self) -> RoundingStrategy {
        match self {
            Rounding::HalfEven => RoundingStrategy::MidpointNearestEven,
            Rounding::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            Rounding::HalfDown => RoundingStrategy::MidpointTowardZero,
            Rounding::Down => RoundingStrategy::ToZero,
            Rounding::Up => RoundingStrategy::AwayFromZero,
            Rounding::Floor => RoundingStrategy::ToNegativeInfinity,
            Rounding::Ceiling => RoundingStrategy::ToPositiveInfinity,
        }
    }
}

/// Precision (significant digits) and rounding used for decimal conversions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MathContext {
    pub precision: u32,
    pub rounding: Rounding,
}

impl MathContext {
    /// Largest precision a `Decimal` can hold
    pub const MAX_PRECISION: u32 = 28;

    pub const DECIMAL128: MathContext = MathContext {
        precision: 28,
        rounding: Rounding::HalfEven,
    };

    pub fn new(precision: u32, rounding: Rounding) -> Self {
        Self {
            precision: precision.clamp(1, Self::MAX_PRECISION),
            rounding,
        }
    }

    /// Round `value` to this context's significant digits
    pub fn round(&self, value: Decimal) -> Decimal {
        if value.is_zero() {
            return value;
        }
        value
            .round_sf_with_strategy(self.precision, self.rounding.strategy())
            .unwrap_or(value)
            .normalize()
    }
}

impl Default for MathContext {
    fn default() -> Self {
        Self::DECIMAL128
    }
}

/// Stop conditions for the continued-fraction approximation of a double
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApproxConfig {
    pub epsilon: f64,
    pub max_denominator: i64,
    pub max_iterations: u32,
}

impl Default for ApproxConfig {
    fn default() -> Self {
        Self {
            epsilon: 1e-12,
            max_denominator: i32::MAX as i64,
            max_iterations: 100,
        }
    }
}
