//! Composable value converters
//!
//! A [`Converter`] maps a value expressed in one unit to the value in
//! another. Converters compose, invert, and (when linear) take integer
//! powers and roots. Construction always normalizes, so two converters that
//! describe the same linear map compare equal however they were assembled:
//!
//! * identity steps vanish,
//! * neighbouring linear steps collapse into one factor (plus at most one
//!   irrational radical),
//! * neighbouring shifts add up,
//! * a step followed by its inverse cancels.

mod decimal;

use std::fmt;
use std::sync::Arc;

use num::integer::lcm;

use crate::error::{Result, UnitError};
use crate::number::BigRational;

/// A value transformation, evaluated over `f64` or `Decimal`.
///
/// The representation is private so that every value is built through the
/// normalizing constructors; equal maps always compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Converter(Step);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Step {
    Identity,
    /// `x · factor`; the factor is never zero or one
    Linear(BigRational),
    /// `x + offset`; the offset is never zero
    Shift(BigRational),
    /// `x · radicand^(1/index)` where the root is irrational
    Root { radicand: BigRational, index: u32 },
    /// `second(first(x))`
    Composed {
        first: Arc<Converter>,
        second: Arc<Converter>,
    },
}

/// `factor · radicand^(1/index)`, the normal form of every linear converter
#[derive(Debug, Clone)]
struct LinearForm {
    factor: BigRational,
    radical: Option<(BigRational, u32)>,
}

impl LinearForm {
    fn rational(factor: BigRational) -> Self {
        Self {
            factor,
            radical: None,
        }
    }

    fn times(self, other: LinearForm) -> LinearForm {
        let factor = self.factor * other.factor;
        let radical = match (self.radical, other.radical) {
            (None, r) | (r, None) => r,
            (Some((s1, n1)), Some((s2, n2))) => {
                let index = lcm(n1, n2);
                Some((s1.pow_unsigned(index / n1) * s2.pow_unsigned(index / n2), index))
            }
        };
        LinearForm { factor, radical }.reduced()
    }

    /// Factors are never zero, so the reciprocal always exists
    fn inverse(self) -> LinearForm {
        LinearForm {
            factor: self.factor.recip_nonzero(),
            radical: self
                .radical
                .map(|(radicand, index)| (radicand.recip_nonzero(), index)),
        }
    }

    /// Whole powers of the radical move into the factor before raising, so
    /// the radicand never grows past its index
    fn pow(self, n: u32) -> LinearForm {
        let factor = self.factor.pow_unsigned(n);
        match self.radical {
            None => LinearForm::rational(factor),
            Some((radicand, index)) => {
                let whole = radicand.pow_unsigned(n / index);
                let radical = match n % index {
                    0 => None,
                    rest => Some((radicand.pow_unsigned(rest), index)),
                };
                LinearForm {
                    factor: factor * whole,
                    radical,
                }
                .reduced()
            }
        }
    }

    /// Pull exact roots out of the radical
    fn reduced(mut self) -> LinearForm {
        let Some((mut radicand, mut index)) = self.radical.take() else {
            return self;
        };
        'outer: while index > 1 {
            let current = index;
            for k in (2..=current).rev().filter(|k| current % k == 0) {
                if let Some(root) = radicand.nth_root(k) {
                    radicand = root;
                    index /= k;
                    continue 'outer;
                }
            }
            break;
        }
        if index == 1 {
            self.factor = self.factor * radicand;
        } else if !radicand.is_one() {
            self.radical = Some((radicand, index));
        }
        self
    }

    fn into_converter(self) -> Converter {
        let scale = if self.factor.is_one() {
            Converter::identity()
        } else {
            Converter(Step::Linear(self.factor))
        };
        match self.radical {
            None => scale,
            Some((radicand, index)) => {
                let root = Converter(Step::Root { radicand, index });
                if scale.is_identity() {
                    root
                } else {
                    Converter(Step::Composed {
                        first: Arc::new(root),
                        second: Arc::new(scale),
                    })
                }
            }
        }
    }
}

impl Converter {
    pub const IDENTITY: Converter = Converter(Step::Identity);

    pub fn identity() -> Converter {
        Converter::IDENTITY
    }

    /// Multiply by `factor`
    pub fn linear(factor: BigRational) -> Result<Converter> {
        if factor.is_zero() {
            return Err(UnitError::invalid("a scale factor of zero is not invertible"));
        }
        Ok(LinearForm::rational(factor).into_converter())
    }

    /// Multiply by `numerator / denominator`
    pub fn rational(numerator: i64, denominator: i64) -> Result<Converter> {
        Converter::linear(BigRational::new(numerator, denominator)?)
    }

    /// Multiply by `base ^ exponent`, the converter of a prefix
    pub fn power_of(base: u32, exponent: i32) -> Converter {
        LinearForm::rational(BigRational::power_of(base, exponent)).into_converter()
    }

    /// Add `offset`
    pub fn shift(offset: BigRational) -> Converter {
        if offset.is_zero() {
            Converter::identity()
        } else {
            Converter(Step::Shift(offset))
        }
    }

    pub fn is_identity(&self) -> bool {
        matches!(self.0, Step::Identity)
    }

    /// Whether this converter is a pure scaling `x ↦ k·x`
    pub fn is_linear(&self) -> bool {
        match &self.0 {
            Step::Identity | Step::Linear(_) | Step::Root { .. } => true,
            Step::Shift(_) => false,
            Step::Composed { first, second } => first.is_linear() && second.is_linear(),
        }
    }

    /// Whether this converter keeps an irrational radical
    pub fn is_irrational(&self) -> bool {
        matches!(
            self.linear_form(),
            Some(LinearForm {
                radical: Some(_),
                ..
            })
        )
    }

    /// The exact rational factor of a linear converter. Shifts and
    /// irrational roots have none.
    pub fn scale(&self) -> Option<BigRational> {
        match self.linear_form()? {
            LinearForm {
                factor,
                radical: None,
            } => Some(factor),
            _ => None,
        }
    }

    /// The constant added by a pure shift
    pub fn offset(&self) -> Option<&BigRational> {
        match &self.0 {
            Step::Shift(offset) => Some(offset),
            _ => None,
        }
    }

    fn linear_form(&self) -> Option<LinearForm> {
        match &self.0 {
            Step::Identity => Some(LinearForm::rational(BigRational::one())),
            Step::Linear(factor) => Some(LinearForm::rational(factor.clone())),
            Step::Root { radicand, index } => Some(LinearForm {
                factor: BigRational::one(),
                radical: Some((radicand.clone(), *index)),
            }),
            Step::Shift(_) => None,
            Step::Composed { first, second } => {
                Some(first.linear_form()?.times(second.linear_form()?))
            }
        }
    }

    /// Apply `self`, then `after`
    pub fn and_then(&self, after: &Converter) -> Converter {
        let mut steps = Vec::new();
        self.push_steps(&mut steps);
        after.push_steps(&mut steps);
        Converter::chain(steps)
    }

    /// Apply `before`, then `self`
    pub fn compose(&self, before: &Converter) -> Converter {
        before.and_then(self)
    }

    /// Flatten into maximal steps; a linear block counts as one step
    fn push_steps(&self, steps: &mut Vec<Converter>) {
        match &self.0 {
            Step::Identity => {}
            Step::Composed { first, second } if !self.is_linear() => {
                first.push_steps(steps);
                second.push_steps(steps);
            }
            _ => steps.push(self.clone()),
        }
    }

    fn merge(first: &Converter, second: &Converter) -> Option<Converter> {
        if let (Some(a), Some(b)) = (first.linear_form(), second.linear_form()) {
            return Some(a.times(b).into_converter());
        }
        match (&first.0, &second.0) {
            (Step::Shift(a), Step::Shift(b)) => Some(Converter::shift(a.clone() + b.clone())),
            _ => None,
        }
    }

    fn chain(steps: Vec<Converter>) -> Converter {
        let mut merged: Vec<Converter> = Vec::with_capacity(steps.len());
        for step in steps {
            match merged.last().and_then(|last| Converter::merge(last, &step)) {
                Some(combined) => {
                    merged.pop();
                    if !combined.is_identity() {
                        merged.push(combined);
                    }
                }
                None => merged.push(step),
            }
        }
        merged
            .into_iter()
            .rev()
            .reduce(|second, first| {
                Converter(Step::Composed {
                    first: Arc::new(first),
                    second: Arc::new(second),
                })
            })
            .unwrap_or(Converter::IDENTITY)
    }

    pub fn inverse(&self) -> Converter {
        match &self.0 {
            Step::Shift(offset) => Converter(Step::Shift(offset.negate())),
            Step::Composed { first, second } if !self.is_linear() => {
                second.inverse().and_then(&first.inverse())
            }
            _ => self
                .linear_form()
                .map_or(Converter::IDENTITY, |form| form.inverse().into_converter()),
        }
    }

    /// `self` applied `n` times; negative `n` applies the inverse
    pub fn pow(&self, n: i32) -> Result<Converter> {
        if n == 1 {
            return Ok(self.clone());
        }
        let form = self.linear_form().ok_or(UnitError::NonLinearConverter)?;
        let form = if n < 0 { form.inverse() } else { form };
        Ok(form.pow(n.unsigned_abs()).into_converter())
    }

    /// The converter whose `n`-fold application is `self`
    pub fn root(&self, n: u32) -> Result<Converter> {
        if n == 0 {
            return Err(UnitError::invalid("root index must be positive"));
        }
        if n == 1 {
            return Ok(self.clone());
        }
        let form = self.linear_form().ok_or(UnitError::NonLinearConverter)?;
        if form.factor.signum() < 0 && n % 2 == 0 {
            return Err(UnitError::invalid(format!(
                "even root of a negative scale factor {}",
                form.factor
            )));
        }
        let factor = LinearForm {
            factor: BigRational::one(),
            radical: Some((form.factor, n)),
        };
        let radical = LinearForm {
            factor: BigRational::one(),
            radical: form.radical.map(|(radicand, index)| (radicand, index * n)),
        };
        Ok(factor.times(radical).into_converter())
    }

    /// Evaluate over doubles
    pub fn convert(&self, value: f64) -> f64 {
        match &self.0 {
            Step::Identity => value,
            Step::Linear(factor) => scale_f64(value, factor),
            Step::Shift(offset) => value + offset.to_f64(),
            Step::Root { radicand, index } => value * real_root(radicand.to_f64(), *index),
            Step::Composed { first, second } => second.convert(first.convert(value)),
        }
    }
}

/// `value · factor`, dividing last when both parts are exact doubles
fn scale_f64(value: f64, factor: &BigRational) -> f64 {
    const EXACT: f64 = (1u64 << 53) as f64;
    let numerator = factor.numerator_f64();
    let denominator = factor.denominator_f64();
    if numerator.abs() <= EXACT && denominator <= EXACT {
        value * numerator / denominator
    } else {
        value * factor.to_f64()
    }
}

pub(crate) fn real_root(value: f64, index: u32) -> f64 {
    let root = value.abs().powf(1.0 / index as f64);
    if value < 0.0 {
        -root
    } else {
        root
    }
}

impl Default for Converter {
    fn default() -> Self {
        Converter::IDENTITY
    }
}

impl fmt::Display for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Step::Identity => write!(f, "x"),
            Step::Linear(factor) => write!(f, "x·{factor}"),
            Step::Shift(offset) if offset.signum() < 0 => write!(f, "x - {}", offset.negate()),
            Step::Shift(offset) => write!(f, "x + {offset}"),
            Step::Root { radicand, index } => write!(f, "x·({radicand})^(1/{index})"),
            Step::Composed { first, second } => {
                let inner = first.to_string();
                let outer = second.to_string();
                write!(f, "{}", outer.replacen('x', &format!("({inner})"), 1))
            }
        }
    }
}
