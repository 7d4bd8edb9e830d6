//! Product canonicalization and the unit interning cache

use once_cell::sync::{Lazy, OnceCell};

use super::{Unit, UnitElement, UnitInner, UnitKind};
use crate::cache::InternCache;
use crate::converter::Converter;
use crate::dimension::Dimension;
use crate::error::{Result, UnitError};
use crate::number::Rational;

/// Products with a non-trivial dimension, keyed by their sorted factors
static UNITS: Lazy<InternCache<Vec<UnitElement>, UnitInner>> =
    Lazy::new(|| InternCache::new("unit"));

/// `left^left_exp · right^right_exp`, in canonical form
pub(super) fn of_product(
    left: &Unit,
    left_exp: Rational,
    right: &Unit,
    right_exp: Rational,
) -> Result<Unit> {
    let scaled = left
        .elements()
        .iter()
        .map(|e| e.scaled(left_exp))
        .chain(right.elements().iter().map(|e| e.scaled(right_exp)))
        .collect::<Vec<_>>();

    let mut merged: Vec<UnitElement> = Vec::with_capacity(scaled.len());
    for element in scaled {
        match merged.iter_mut().find(|m| m.unit() == element.unit()) {
            Some(existing) => existing.add_exponent(element.exponent()),
            None => merged.push(element),
        }
    }
    merged.retain(|e| !e.exponent().is_zero());

    match merged.as_slice() {
        [] => return Ok(Unit::one()),
        [single] if single.exponent().is_one() => return Ok(single.unit().clone()),
        _ => {}
    }
    merged.sort_by_cached_key(|e| (e.unit().to_string(), e.exponent()));
    of_elements(merged)
}

fn of_elements(elements: Vec<UnitElement>) -> Result<Unit> {
    if let Some(cached) = UNITS.get(&elements) {
        return Ok(Unit(cached));
    }
    let product = build(elements.clone())?;

    // km·mm is m² under another name
    let unit = if !product.is_system_unit() && product.system_converter().is_identity() {
        tracing::trace!(product = %product, "product collapses to its system unit");
        product.system_unit()
    } else {
        product
    };

    // Dimensionless products are told apart by identity, so they are never shared
    if unit.dimension().is_none() {
        return Ok(unit);
    }
    Ok(Unit(UNITS.insert_if_absent(elements, unit.0)))
}

fn build(elements: Vec<UnitElement>) -> Result<Unit> {
    let mut dimension = Dimension::none();
    let mut converter = Converter::IDENTITY;
    for element in &elements {
        let unit = element.unit();
        if !unit.system_converter().is_linear() {
            return Err(UnitError::NonLinearConverter);
        }
        dimension = dimension.multiply(&unit.dimension().pow_rational(element.exponent()));
        converter = converter.and_then(&raise(unit.system_converter(), element.exponent())?);
    }
    let symbol = product_symbol(&elements);
    Ok(Unit::from_parts(
        UnitKind::Product {
            elements,
            system_unit: OnceCell::new(),
        },
        Some(symbol),
        None,
        dimension,
        converter,
    ))
}

/// `converter^(p/q)` as a `p`-fold composition followed by a `q`-th root
fn raise(converter: &Converter, exponent: Rational) -> Result<Converter> {
    let power = i32::try_from(exponent.numerator())
        .map_err(|_| UnitError::invalid(format!("unit exponent {exponent} is too large")))?;
    let index = u32::try_from(exponent.denominator())
        .map_err(|_| UnitError::invalid(format!("unit exponent {exponent} is too large")))?;
    converter.pow(power)?.root(index)
}

/// `kg·m/s^2`: positive powers first, then the negative ones after a slash
fn product_symbol(elements: &[UnitElement]) -> String {
    let numerator: Vec<String> = elements
        .iter()
        .filter(|e| e.exponent().signum() > 0)
        .map(UnitElement::to_string)
        .collect();
    let denominator: Vec<String> = elements
        .iter()
        .filter(|e| e.exponent().signum() < 0)
        .map(|e| e.scaled(-Rational::ONE).to_string())
        .collect();

    let numerator = if numerator.is_empty() {
        "1".to_string()
    } else {
        numerator.join("·")
    };
    match denominator.len() {
        0 => numerator,
        1 => format!("{numerator}/{}", denominator[0]),
        _ => format!("{numerator}/({})", denominator.join("·")),
    }
}

/// Each factor replaced by its system unit at the same power
pub(super) fn system_unit_of(unit: &Unit, elements: &[UnitElement]) -> Unit {
    let mut system = Unit::one();
    for element in elements {
        system = of_product(
            &system,
            Rational::ONE,
            &element.unit().system_unit(),
            element.exponent(),
        )
        .unwrap_or_else(|err| panic!("system unit of {unit} cannot be formed: {err}"));
    }
    assert_eq!(
        system.dimension(),
        unit.dimension(),
        "system unit {system} does not match the dimension of {unit}"
    );
    system
}

/// Number of live interned product units
pub(crate) fn interned_count() -> usize {
    UNITS.len()
}
