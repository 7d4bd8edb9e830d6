use std::fmt;

use super::Unit;
use crate::number::Rational;

/// One factor of a unit: a non-product unit raised to a rational power
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnitElement {
    unit: Unit,
    exponent: Rational,
}

impl UnitElement {
    pub fn new(unit: Unit, exponent: Rational) -> Self {
        Self { unit, exponent }
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn exponent(&self) -> Rational {
        self.exponent
    }

    pub(crate) fn scaled(&self, factor: Rational) -> Self {
        Self {
            unit: self.unit.clone(),
            exponent: self.exponent * factor,
        }
    }

    pub(crate) fn add_exponent(&mut self, exponent: Rational) {
        self.exponent = self.exponent + exponent;
    }
}

impl fmt::Display for UnitElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let e = self.exponent;
        if e.is_one() {
            write!(f, "{}", self.unit)
        } else if e.is_integer() {
            write!(f, "{}^{}", self.unit, e)
        } else {
            write!(f, "{}^({})", self.unit, e)
        }
    }
}
