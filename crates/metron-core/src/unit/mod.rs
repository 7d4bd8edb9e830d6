//! Units of measurement
//!
//! A [`Unit`] is an immutable, cheaply clonable handle. Every unit knows its
//! [`Dimension`], the coherent system unit of that dimension, and the
//! [`Converter`] that maps its values into the system unit.
//!
//! Units come in a closed set of kinds:
//!
//! * `one`, the dimensionless identity,
//! * base units (`m`, `kg`, `s`, ...), one per dimension,
//! * alternate system units that rename a system unit (`N`, `rad`),
//! * products of other units raised to rational powers (`kg·m/s^2`),
//! * transformed units that wrap another unit with a converter (`°C`, `min`),
//! * prefixed units (`km`, `KiB`),
//! * named units that only override the symbol or name of another unit.
//!
//! Products are canonical: equal factor lists built in any order resolve to
//! the same interned instance while it is alive.
//!
//! ```
//! use metron_core::{Dimension, Prefix, Unit};
//!
//! let metre = Unit::base("m", Dimension::length()).unwrap();
//! let km = metre.with_prefix(Prefix::KILO);
//! assert_eq!(km.symbol(), Some("km"));
//! assert_eq!(km.converter_to(&metre).unwrap().convert(1.0), 1000.0);
//! ```

mod element;
mod prefix;
mod product;

pub use element::UnitElement;
pub use prefix::Prefix;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use once_cell::sync::{Lazy, OnceCell};

use crate::converter::Converter;
use crate::dimension::Dimension;
use crate::error::{Result, UnitError};
use crate::number::{BigRational, Rational};

static ONE: Lazy<Unit> = Lazy::new(|| {
    Unit::from_parts(
        UnitKind::One,
        None,
        Some("one".to_string()),
        Dimension::none(),
        Converter::IDENTITY,
    )
});

/// A unit of measurement
#[derive(Clone)]
pub struct Unit(Arc<UnitInner>);

struct UnitInner {
    kind: UnitKind,
    symbol: Option<String>,
    name: Option<String>,
    dimension: Dimension,
    /// Maps a value in this unit to the value in its system unit
    system_converter: Converter,
}

enum UnitKind {
    One,
    Base,
    AlternateSystem {
        parent: Unit,
    },
    Product {
        /// Sorted by symbol, no zero exponents, at least two factors or a
        /// single factor with an exponent other than one
        elements: Vec<UnitElement>,
        system_unit: OnceCell<Unit>,
    },
    Transformed {
        parent: Unit,
        converter: Converter,
    },
    Prefixed {
        parent: Unit,
        prefix: Prefix,
    },
    Named {
        parent: Unit,
    },
}

fn checked_label(kind: &str, label: &str) -> Result<String> {
    let label = label.trim();
    if label.is_empty() {
        return Err(UnitError::invalid(format!("unit {kind} must not be empty")));
    }
    Ok(label.to_string())
}

impl Unit {
    fn from_parts(
        kind: UnitKind,
        symbol: Option<String>,
        name: Option<String>,
        dimension: Dimension,
        system_converter: Converter,
    ) -> Unit {
        Unit(Arc::new(UnitInner {
            kind,
            symbol,
            name,
            dimension,
            system_converter,
        }))
    }

    /// The dimensionless unit `1`
    pub fn one() -> Unit {
        ONE.clone()
    }

    /// The base unit of `dimension`, e.g. `m` for length
    pub fn base(symbol: &str, dimension: Dimension) -> Result<Unit> {
        let symbol = checked_label("symbol", symbol)?;
        if dimension.is_none() {
            return Err(UnitError::invalid(format!(
                "base unit {symbol} needs a dimension, use Unit::one() for pure numbers"
            )));
        }
        Ok(Unit::from_parts(
            UnitKind::Base,
            Some(symbol),
            None,
            dimension,
            Converter::IDENTITY,
        ))
    }

    /// A system unit that stands for `parent` under its own symbol, such as
    /// `N` for `kg·m/s^2` or `rad` for `one`
    pub fn alternate(parent: &Unit, symbol: &str) -> Result<Unit> {
        let symbol = checked_label("symbol", symbol)?;
        if !parent.is_system_unit() {
            return Err(UnitError::invalid(format!(
                "alternate unit {symbol} needs a system unit as parent, got {parent}"
            )));
        }
        Ok(Unit::from_parts(
            UnitKind::AlternateSystem {
                parent: parent.clone(),
            },
            Some(symbol),
            None,
            parent.dimension().clone(),
            Converter::IDENTITY,
        ))
    }

    /// A unit whose values map to this unit through `converter`
    pub fn transform(&self, converter: &Converter) -> Unit {
        if converter.is_identity() {
            return self.clone();
        }
        if let UnitKind::Transformed {
            parent,
            converter: inner,
        } = &self.0.kind
        {
            return parent.transform(&converter.and_then(inner));
        }
        Unit::from_parts(
            UnitKind::Transformed {
                parent: self.clone(),
                converter: converter.clone(),
            },
            None,
            None,
            self.dimension().clone(),
            converter.and_then(self.system_converter()),
        )
    }

    /// One of the new unit equals `factor` of this unit
    pub fn scale(&self, factor: BigRational) -> Result<Unit> {
        Ok(self.transform(&Converter::linear(factor)?))
    }

    /// A unit offset from this one: `x` in the new unit is `x + offset` here
    pub fn shift(&self, offset: BigRational) -> Unit {
        self.transform(&Converter::shift(offset))
    }

    /// Apply `prefix`. Prefixes of the same kind combine instead of nesting.
    pub fn with_prefix(&self, prefix: Prefix) -> Unit {
        if let UnitKind::Prefixed {
            parent,
            prefix: current,
        } = &self.0.kind
        {
            if current.same_kind(&prefix) {
                let exponent = current.exponent() + prefix.exponent();
                if exponent == 0 {
                    return parent.clone();
                }
                return match Prefix::lookup(prefix.base(), exponent) {
                    Some(combined) => parent.with_prefix(combined),
                    None => parent.transform(&Converter::power_of(prefix.base(), exponent)),
                };
            }
        }
        let symbol = self.symbol().map(|s| format!("{}{s}", prefix.symbol()));
        let name = self.name().map(|n| format!("{}{n}", prefix.name()));
        Unit::from_parts(
            UnitKind::Prefixed {
                parent: self.clone(),
                prefix,
            },
            symbol,
            name,
            self.dimension().clone(),
            prefix.converter().and_then(self.system_converter()),
        )
    }

    /// The same unit under another symbol
    pub fn with_symbol(&self, symbol: &str) -> Result<Unit> {
        let symbol = checked_label("symbol", symbol)?;
        Ok(self.named(Some(symbol), self.0.name.clone()))
    }

    /// The same unit under another name
    pub fn with_name(&self, name: &str) -> Result<Unit> {
        let name = checked_label("name", name)?;
        Ok(self.named(self.0.symbol.clone(), Some(name)))
    }

    fn named(&self, symbol: Option<String>, name: Option<String>) -> Unit {
        let parent = match &self.0.kind {
            UnitKind::Named { parent } => parent.clone(),
            _ => self.clone(),
        };
        Unit::from_parts(
            UnitKind::Named { parent },
            symbol,
            name,
            self.dimension().clone(),
            self.system_converter().clone(),
        )
    }

    pub fn symbol(&self) -> Option<&str> {
        self.0.symbol.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    pub fn dimension(&self) -> &Dimension {
        &self.0.dimension
    }

    /// Maps values in this unit to values in [`Unit::system_unit`]
    pub fn system_converter(&self) -> &Converter {
        &self.0.system_converter
    }

    pub fn is_system_unit(&self) -> bool {
        match &self.0.kind {
            UnitKind::One | UnitKind::Base | UnitKind::AlternateSystem { .. } => true,
            UnitKind::Product { elements, .. } => {
                elements.iter().all(|e| e.unit().is_system_unit())
            }
            UnitKind::Transformed { .. } | UnitKind::Prefixed { .. } => false,
            UnitKind::Named { parent } => parent.is_system_unit(),
        }
    }

    /// The coherent unit of this unit's dimension
    pub fn system_unit(&self) -> Unit {
        match &self.0.kind {
            UnitKind::One | UnitKind::Base | UnitKind::AlternateSystem { .. } => self.clone(),
            UnitKind::Product {
                elements,
                system_unit,
            } => {
                if self.is_system_unit() {
                    return self.clone();
                }
                system_unit
                    .get_or_init(|| product::system_unit_of(self, elements))
                    .clone()
            }
            UnitKind::Transformed { parent, .. }
            | UnitKind::Prefixed { parent, .. }
            | UnitKind::Named { parent } => parent.system_unit(),
        }
    }

    /// Decomposition into base units with their exponents
    pub fn base_units(&self) -> HashMap<Unit, Rational> {
        match &self.0.kind {
            UnitKind::One => HashMap::new(),
            UnitKind::Base => HashMap::from([(self.clone(), Rational::ONE)]),
            UnitKind::Product { elements, .. } => {
                let mut units: HashMap<Unit, Rational> = HashMap::new();
                for element in elements {
                    for (unit, e) in element.unit().base_units() {
                        let entry = units.entry(unit).or_insert(Rational::ZERO);
                        *entry = *entry + e * element.exponent();
                    }
                }
                units.retain(|_, e| !e.is_zero());
                units
            }
            UnitKind::AlternateSystem { parent }
            | UnitKind::Transformed { parent, .. }
            | UnitKind::Prefixed { parent, .. }
            | UnitKind::Named { parent } => parent.base_units(),
        }
    }

    /// The factors this unit recombines from: nothing for `one`, the factor
    /// list for a product, and the unit itself otherwise
    pub fn elements(&self) -> Vec<UnitElement> {
        match &self.0.kind {
            UnitKind::One => Vec::new(),
            UnitKind::Product { elements, .. } => elements.clone(),
            _ => vec![UnitElement::new(self.clone(), Rational::ONE)],
        }
    }

    /// The unit this one wraps, if any
    pub fn parent(&self) -> Option<&Unit> {
        match &self.0.kind {
            UnitKind::AlternateSystem { parent }
            | UnitKind::Transformed { parent, .. }
            | UnitKind::Prefixed { parent, .. }
            | UnitKind::Named { parent } => Some(parent),
            UnitKind::One | UnitKind::Base | UnitKind::Product { .. } => None,
        }
    }

    pub fn prefix(&self) -> Option<Prefix> {
        match &self.0.kind {
            UnitKind::Prefixed { prefix, .. } => Some(*prefix),
            _ => None,
        }
    }

    pub fn is_product(&self) -> bool {
        matches!(self.0.kind, UnitKind::Product { .. })
    }

    /// Whether both handles point to the same instance
    pub fn ptr_eq(&self, other: &Unit) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn is_compatible(&self, that: &Unit) -> bool {
        self.dimension() == that.dimension()
    }

    /// The converter from values in this unit to values in `that`
    pub fn converter_to(&self, that: &Unit) -> Result<Converter> {
        if self.ptr_eq(that) {
            return Ok(Converter::IDENTITY);
        }
        if !self.is_compatible(that) {
            return Err(UnitError::Incommensurable {
                from: self.to_string(),
                to: that.to_string(),
            });
        }
        Ok(self
            .system_converter()
            .and_then(&that.system_converter().inverse()))
    }

    pub fn multiply(&self, that: &Unit) -> Result<Unit> {
        product::of_product(self, Rational::ONE, that, Rational::ONE)
    }

    pub fn divide(&self, that: &Unit) -> Result<Unit> {
        product::of_product(self, Rational::ONE, that, -Rational::ONE)
    }

    pub fn pow(&self, n: i32) -> Result<Unit> {
        self.pow_rational(Rational::from(n))
    }

    pub fn root(&self, n: i32) -> Result<Unit> {
        if n <= 0 {
            return Err(UnitError::invalid(format!("root index must be positive, got {n}")));
        }
        self.pow_rational(Rational::new(1, n as i64)?)
    }

    pub fn pow_rational(&self, exponent: Rational) -> Result<Unit> {
        product::of_product(self, exponent, &Unit::one(), Rational::ZERO)
    }

    pub fn inverse(&self) -> Result<Unit> {
        self.pow(-1)
    }

    /// Number of live interned product units
    pub fn interned_count() -> usize {
        product::interned_count()
    }

    /// Symbols and exponents of the system unit's factors, which tell
    /// dimensionless units such as `rad` and `one` apart
    fn signature(&self) -> Vec<(String, Rational)> {
        let mut factors = BTreeMap::new();
        self.collect_system_factors(Rational::ONE, &mut factors);
        factors.into_iter().filter(|(_, e)| !e.is_zero()).collect()
    }

    fn collect_system_factors(
        &self,
        exponent: Rational,
        factors: &mut BTreeMap<String, Rational>,
    ) {
        match &self.0.kind {
            UnitKind::One => {}
            UnitKind::Base | UnitKind::AlternateSystem { .. } => {
                let entry = factors.entry(self.to_string()).or_insert(Rational::ZERO);
                *entry = *entry + exponent;
            }
            UnitKind::Product { elements, .. } => {
                for element in elements {
                    element
                        .unit()
                        .collect_system_factors(exponent * element.exponent(), factors);
                }
            }
            UnitKind::Transformed { parent, .. }
            | UnitKind::Prefixed { parent, .. }
            | UnitKind::Named { parent } => parent.collect_system_factors(exponent, factors),
        }
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        if self.dimension() != other.dimension()
            || self.system_converter() != other.system_converter()
        {
            return false;
        }
        if !self.dimension().is_none() {
            return true;
        }
        self.signature() == other.signature()
    }
}

impl Eq for Unit {}

impl Hash for Unit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.dimension().hash(state);
        self.system_converter().hash(state);
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(symbol) = self.symbol() {
            return write!(f, "{symbol}");
        }
        if let Some(name) = self.name() {
            return write!(f, "{name}");
        }
        match &self.0.kind {
            UnitKind::Transformed { parent, converter } => write!(f, "{parent}[{converter}]"),
            UnitKind::Prefixed { parent, prefix } => write!(f, "{prefix}{parent}"),
            _ => write!(f, "?"),
        }
    }
}

impl fmt::Debug for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unit({self})")
    }
}
