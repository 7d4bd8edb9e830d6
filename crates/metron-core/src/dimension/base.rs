//! The seven SI base dimensions and the atoms a dimension is built from

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub const NDIMS: usize = 7;

/// One of the seven SI base dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseDimension {
    Length,
    Mass,
    Time,
    ElectricCurrent,
    Temperature,
    AmountOfSubstance,
    LuminousIntensity,
}

impl BaseDimension {
    pub const ALL: [BaseDimension; NDIMS] = [
        BaseDimension::Length,
        BaseDimension::Mass,
        BaseDimension::Time,
        BaseDimension::ElectricCurrent,
        BaseDimension::Temperature,
        BaseDimension::AmountOfSubstance,
        BaseDimension::LuminousIntensity,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            BaseDimension::Length => 0,
            BaseDimension::Mass => 1,
            BaseDimension::Time => 2,
            BaseDimension::ElectricCurrent => 3,
            BaseDimension::Temperature => 4,
            BaseDimension::AmountOfSubstance => 5,
            BaseDimension::LuminousIntensity => 6,
        }
    }

    /// Conventional dimension symbol, e.g. `L` for length
    pub fn symbol(self) -> &'static str {
        match self {
            BaseDimension::Length => "L",
            BaseDimension::Mass => "M",
            BaseDimension::Time => "T",
            BaseDimension::ElectricCurrent => "I",
            BaseDimension::Temperature => "Θ",
            BaseDimension::AmountOfSubstance => "N",
            BaseDimension::LuminousIntensity => "J",
        }
    }
}

impl fmt::Display for BaseDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.symbol())
    }
}

/// A single factor of a dimension: a base dimension or a named,
/// non-physical one such as "information"
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DimensionAtom {
    Base(BaseDimension),
    Named(Arc<str>),
}

impl From<BaseDimension> for DimensionAtom {
    fn from(base: BaseDimension) -> Self {
        DimensionAtom::Base(base)
    }
}

impl fmt::Display for DimensionAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimensionAtom::Base(base) => write!(f, "{base}"),
            DimensionAtom::Named(name) => write!(f, "[{name}]"),
        }
    }
}
