//! Evaluation of converters over `rust_decimal::Decimal`

use rust_decimal::{Decimal, MathematicalOps};

use super::{Converter, Step};
use crate::config::MathContext;
use crate::error::{Result, UnitError};
use crate::number::{big_to_decimal, BigRational};

impl Converter {
    /// Evaluate over decimals, rounding to `ctx` after every step
    pub fn convert_decimal(&self, value: Decimal, ctx: &MathContext) -> Result<Decimal> {
        let converted = match &self.0 {
            Step::Identity => return Ok(value),
            Step::Linear(factor) => scale(value, factor, ctx)?,
            Step::Shift(offset) => value
                .checked_add(offset.to_decimal(ctx)?)
                .ok_or(UnitError::DecimalOverflow)?,
            Step::Root { radicand, index } => value
                .checked_mul(root(radicand, *index, ctx)?)
                .ok_or(UnitError::DecimalOverflow)?,
            Step::Composed { first, second } => {
                let inner = first.convert_decimal(value, ctx)?;
                return second.convert_decimal(inner, ctx);
            }
        };
        Ok(ctx.round(converted))
    }
}

fn scale(value: Decimal, factor: &BigRational, ctx: &MathContext) -> Result<Decimal> {
    // Multiply before dividing so that factors like 1/3 stay exact on round numbers
    let parts = big_to_decimal(factor.numerator())
        .and_then(|numerator| Ok((numerator, big_to_decimal(factor.denominator())?)));
    if let Ok((numerator, denominator)) = parts {
        if let Some(scaled) = value
            .checked_mul(numerator)
            .and_then(|product| product.checked_div(denominator))
        {
            return Ok(scaled);
        }
    }
    value
        .checked_mul(factor.to_decimal(ctx)?)
        .ok_or(UnitError::DecimalOverflow)
}

fn root(radicand: &BigRational, index: u32, ctx: &MathContext) -> Result<Decimal> {
    let radicand = radicand.to_decimal(ctx)?;
    let magnitude = radicand.abs();
    let root = if index == 2 {
        magnitude.sqrt()
    } else {
        magnitude.checked_powd(Decimal::ONE / Decimal::from(index))
    }
    .ok_or(UnitError::DecimalOverflow)?;
    Ok(if radicand.is_sign_negative() { -root } else { root })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Rounding;
    use rust_decimal::prelude::ToPrimitive;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_linear_is_exact() {
        let ctx = MathContext::default();
        let km = Converter::rational(1000, 1).unwrap();
        assert_eq!(km.convert_decimal(dec("1.5"), &ctx).unwrap(), dec("1500"));
        let inch = Converter::rational(127, 5000).unwrap();
        assert_eq!(inch.convert_decimal(dec("100"), &ctx).unwrap(), dec("2.54"));
    }

    #[test]
    fn test_rounds_to_context() {
        let ctx = MathContext::new(5, Rounding::HalfEven);
        let third = Converter::rational(1, 3).unwrap();
        assert_eq!(third.convert_decimal(Decimal::ONE, &ctx).unwrap(), dec("0.33333"));

        let ctx = MathContext::new(5, Rounding::Ceiling);
        assert_eq!(third.convert_decimal(Decimal::ONE, &ctx).unwrap(), dec("0.33334"));
    }

    #[test]
    fn test_affine_chain() {
        let ctx = MathContext::default();
        let c_to_f = Converter::rational(9, 5)
            .unwrap()
            .and_then(&Converter::shift(BigRational::from_integer(32)));
        assert_eq!(c_to_f.convert_decimal(dec("37"), &ctx).unwrap(), dec("98.6"));
        assert_eq!(
            c_to_f.inverse().convert_decimal(dec("98.6"), &ctx).unwrap(),
            dec("37")
        );

        let kelvin = Converter::shift(BigRational::new(27315, 100).unwrap());
        assert_eq!(kelvin.convert_decimal(dec("25"), &ctx).unwrap(), dec("298.15"));
    }

    #[test]
    fn test_roots() {
        let ctx = MathContext::new(10, Rounding::HalfEven);
        let sqrt_ten = Converter::rational(10, 1).unwrap().root(2).unwrap();
        assert_eq!(sqrt_ten.convert_decimal(Decimal::ONE, &ctx).unwrap(), dec("3.16227766"));

        let cbrt_two = Converter::rational(2, 1).unwrap().root(3).unwrap();
        let value = cbrt_two.convert_decimal(Decimal::ONE, &ctx).unwrap();
        approx::assert_abs_diff_eq!(value.to_f64().unwrap(), 2f64.cbrt(), epsilon = 1e-6);
    }

    #[test]
    fn test_overflow() {
        let ctx = MathContext::default();
        let huge = Converter::linear(BigRational::power_of(10, 20)).unwrap();
        assert_eq!(
            huge.convert_decimal(Decimal::MAX, &ctx),
            Err(UnitError::DecimalOverflow)
        );
        assert_eq!(
            Converter::IDENTITY.convert_decimal(Decimal::MAX, &ctx).unwrap(),
            Decimal::MAX
        );
    }
}
