//! Symbol lookup for a fixed set of units
//!
//! A [`UnitCatalog`] is an immutable value built once at startup and passed
//! to whoever needs to resolve symbols. [`UnitCatalog::si`] gives the SI base
//! units with a few coherent derived and everyday units; hosts with their own
//! tables use [`UnitCatalog::builder`].
//!
//! To add a derived unit to the SI catalog, add an entry to `SI_DERIVED`.

use std::cmp::Reverse;
use std::collections::HashMap;

use crate::dimension::{BaseDimension, Dimension};
use crate::error::{Result, UnitError};
use crate::number::BigRational;
use crate::unit::{Prefix, Unit};

struct BaseDef {
    symbol: &'static str,
    name: &'static str,
    dimension: BaseDimension,
}

static SI_BASE: &[BaseDef] = &[
    BaseDef {
        symbol: "m",
        name: "metre",
        dimension: BaseDimension::Length,
    },
    BaseDef {
        symbol: "kg",
        name: "kilogram",
        dimension: BaseDimension::Mass,
    },
    BaseDef {
        symbol: "s",
        name: "second",
        dimension: BaseDimension::Time,
    },
    BaseDef {
        symbol: "A",
        name: "ampere",
        dimension: BaseDimension::ElectricCurrent,
    },
    BaseDef {
        symbol: "K",
        name: "kelvin",
        dimension: BaseDimension::Temperature,
    },
    BaseDef {
        symbol: "mol",
        name: "mole",
        dimension: BaseDimension::AmountOfSubstance,
    },
    BaseDef {
        symbol: "cd",
        name: "candela",
        dimension: BaseDimension::LuminousIntensity,
    },
];

/// A coherent unit defined as a product of units registered before it
struct DerivedDef {
    symbol: &'static str,
    name: &'static str,
    factors: &'static [(&'static str, i32)],
}

static SI_DERIVED: &[DerivedDef] = &[
    DerivedDef {
        symbol: "rad",
        name: "radian",
        factors: &[],
    },
    DerivedDef {
        symbol: "sr",
        name: "steradian",
        factors: &[],
    },
    DerivedDef {
        symbol: "Hz",
        name: "hertz",
        factors: &[("s", -1)],
    },
    DerivedDef {
        symbol: "N",
        name: "newton",
        factors: &[("kg", 1), ("m", 1), ("s", -2)],
    },
    DerivedDef {
        symbol: "Pa",
        name: "pascal",
        factors: &[("N", 1), ("m", -2)],
    },
    DerivedDef {
        symbol: "J",
        name: "joule",
        factors: &[("N", 1), ("m", 1)],
    },
    DerivedDef {
        symbol: "W",
        name: "watt",
        factors: &[("J", 1), ("s", -1)],
    },
    DerivedDef {
        symbol: "C",
        name: "coulomb",
        factors: &[("A", 1), ("s", 1)],
    },
    DerivedDef {
        symbol: "V",
        name: "volt",
        factors: &[("W", 1), ("A", -1)],
    },
];

/// Immutable map from symbols and names to units
#[derive(Debug, Clone)]
pub struct UnitCatalog {
    units: HashMap<String, Unit>,
    symbols: Vec<String>,
}

/// Collects units for a [`UnitCatalog`]
#[derive(Debug, Default)]
pub struct UnitCatalogBuilder {
    units: HashMap<String, Unit>,
    symbols: Vec<String>,
}

impl UnitCatalogBuilder {
    /// Register `unit` under its symbol and, if it has one, its name
    pub fn unit(mut self, unit: Unit) -> Result<Self> {
        let symbol = unit
            .symbol()
            .ok_or_else(|| UnitError::invalid(format!("cannot register {unit} without a symbol")))?
            .to_string();
        self.insert(symbol.clone(), unit.clone())?;
        if let Some(name) = unit.name() {
            if name != symbol {
                self.insert(name.to_string(), unit.clone())?;
            }
        }
        self.symbols.push(symbol);
        Ok(self)
    }

    /// Register an extra lookup key for `unit`
    pub fn alias(mut self, alias: &str, unit: &Unit) -> Result<Self> {
        let alias = alias.trim();
        if alias.is_empty() {
            return Err(UnitError::invalid("unit alias must not be empty"));
        }
        self.insert(alias.to_string(), unit.clone())?;
        Ok(self)
    }

    fn insert(&mut self, key: String, unit: Unit) -> Result<()> {
        if self.units.contains_key(&key) {
            return Err(UnitError::invalid(format!("'{key}' is already registered")));
        }
        self.units.insert(key, unit);
        Ok(())
    }

    fn lookup(&self, symbol: &str) -> Result<Unit> {
        self.units
            .get(symbol)
            .cloned()
            .ok_or_else(|| UnitError::UnknownUnit(symbol.to_string()))
    }

    pub fn build(self) -> UnitCatalog {
        tracing::debug!(
            units = self.symbols.len(),
            keys = self.units.len(),
            "built unit catalog"
        );
        UnitCatalog {
            units: self.units,
            symbols: self.symbols,
        }
    }
}

impl UnitCatalog {
    pub fn builder() -> UnitCatalogBuilder {
        UnitCatalogBuilder::default()
    }

    /// SI base and coherent derived units, plus `g`, `°C`, `min`, `h`, and
    /// `bit`/`B` over the "information" dimension
    pub fn si() -> Result<UnitCatalog> {
        let mut builder = UnitCatalog::builder().alias("one", &Unit::one())?;
        for def in SI_BASE {
            let unit = Unit::base(def.symbol, def.dimension.into())?.with_name(def.name)?;
            builder = builder.unit(unit)?;
        }
        for def in SI_DERIVED {
            let mut product = Unit::one();
            for (symbol, exponent) in def.factors {
                product = product.multiply(&builder.lookup(symbol)?.pow(*exponent)?)?;
            }
            let unit = Unit::alternate(&product, def.symbol)?.with_name(def.name)?;
            builder = builder.unit(unit)?;
        }

        let gram = builder
            .lookup("kg")?
            .scale(BigRational::new(1, 1000)?)?
            .with_symbol("g")?
            .with_name("gram")?;
        let celsius = builder
            .lookup("K")?
            .shift(BigRational::new(27315, 100)?)
            .with_symbol("°C")?
            .with_name("degree Celsius")?;
        let minute = builder
            .lookup("s")?
            .scale(BigRational::from_integer(60))?
            .with_symbol("min")?
            .with_name("minute")?;
        let hour = minute
            .scale(BigRational::from_integer(60))?
            .with_symbol("h")?
            .with_name("hour")?;
        let bit = Unit::base("bit", Dimension::named("information")?)?;
        let byte = bit
            .scale(BigRational::from_integer(8))?
            .with_symbol("B")?
            .with_name("byte")?;

        Ok(builder
            .unit(gram)?
            .alias("degC", &celsius)?
            .unit(celsius)?
            .unit(minute)?
            .unit(hour)?
            .unit(bit)?
            .unit(byte)?
            .build())
    }

    /// The unit registered under `symbol`, or a registered unit behind a
    /// metric or binary prefix (`km`, `KiB`, `kilometre`)
    pub fn get(&self, symbol: &str) -> Result<Unit> {
        let symbol = symbol.trim();
        if let Some(unit) = self.units.get(symbol) {
            return Ok(unit.clone());
        }
        self.prefixed(symbol)
            .ok_or_else(|| UnitError::UnknownUnit(symbol.to_string()))
    }

    fn prefixed(&self, symbol: &str) -> Option<Unit> {
        let mut candidates: Vec<(&str, Prefix)> = Prefix::all()
            .flat_map(|p| [(p.symbol(), p), (p.name(), p)])
            .chain([("u", Prefix::MICRO)])
            .filter(|(head, _)| symbol.len() > head.len() && symbol.starts_with(head))
            .collect();
        candidates.sort_by_key(|(head, _)| Reverse(head.len()));
        candidates.into_iter().find_map(|(head, prefix)| {
            self.units
                .get(&symbol[head.len()..])
                .map(|unit| unit.with_prefix(prefix))
        })
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.get(symbol).is_ok()
    }

    /// Primary symbols in registration order
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
