//! Dimension algebra
//!
//! A [`Dimension`] is a product of base dimensions and named, non-physical
//! dimensions raised to rational exponents. Every value is interned: equal
//! dimensions built while one of them is alive share the same allocation,
//! and the base dimensions and [`Dimension::none`] live for the whole process.

mod base;

pub use base::{BaseDimension, DimensionAtom, NDIMS};

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::cache::InternCache;
use crate::error::{Result, UnitError};
use crate::number::Rational;

/// Normalized content of a dimension. Zero exponents never appear in
/// `named`, which is sorted by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct DimensionKey {
    physical: [Rational; NDIMS],
    named: Vec<(Arc<str>, Rational)>,
}

impl DimensionKey {
    fn none() -> Self {
        Self {
            physical: [Rational::ZERO; NDIMS],
            named: Vec::new(),
        }
    }

    fn is_none(&self) -> bool {
        self.named.is_empty() && self.physical.iter().all(Rational::is_zero)
    }

    fn scaled(&self, factor: Rational) -> Self {
        if factor.is_zero() {
            return Self::none();
        }
        Self {
            physical: self.physical.map(|e| e * factor),
            named: self
                .named
                .iter()
                .map(|(name, e)| (Arc::clone(name), *e * factor))
                .collect(),
        }
    }

    fn combined(&self, other: &Self) -> Self {
        let mut physical = self.physical;
        for (slot, e) in physical.iter_mut().zip(other.physical) {
            *slot = *slot + e;
        }

        let mut named: BTreeMap<Arc<str>, Rational> = BTreeMap::new();
        for (name, e) in self.named.iter().chain(&other.named) {
            let entry = named.entry(Arc::clone(name)).or_insert(Rational::ZERO);
            *entry = *entry + *e;
        }
        Self {
            physical,
            named: named.into_iter().filter(|(_, e)| !e.is_zero()).collect(),
        }
    }
}

static DIMENSIONS: Lazy<InternCache<DimensionKey, DimensionKey>> =
    Lazy::new(|| InternCache::new("dimension"));

static NONE: Lazy<Dimension> = Lazy::new(|| Dimension::intern(DimensionKey::none()));

static BASES: Lazy<[Dimension; NDIMS]> = Lazy::new(|| {
    BaseDimension::ALL.map(|base| {
        let mut key = DimensionKey::none();
        key.physical[base.index()] = Rational::ONE;
        Dimension::intern(key)
    })
});

/// A physical (or named) dimension, cheap to clone
#[derive(Clone)]
pub struct Dimension(Arc<DimensionKey>);

impl Dimension {
    fn intern(key: DimensionKey) -> Self {
        Dimension(DIMENSIONS.get_or_insert_with(key.clone(), || key))
    }

    /// The dimension of pure numbers, identity of [`Dimension::multiply`]
    pub fn none() -> Self {
        NONE.clone()
    }

    pub fn base(base: BaseDimension) -> Self {
        BASES[base.index()].clone()
    }

    pub fn length() -> Self {
        Self::base(BaseDimension::Length)
    }

    pub fn mass() -> Self {
        Self::base(BaseDimension::Mass)
    }

    pub fn time() -> Self {
        Self::base(BaseDimension::Time)
    }

    pub fn electric_current() -> Self {
        Self::base(BaseDimension::ElectricCurrent)
    }

    pub fn temperature() -> Self {
        Self::base(BaseDimension::Temperature)
    }

    pub fn amount_of_substance() -> Self {
        Self::base(BaseDimension::AmountOfSubstance)
    }

    pub fn luminous_intensity() -> Self {
        Self::base(BaseDimension::LuminousIntensity)
    }

    /// Introduce a non-physical dimension such as "information" or "money"
    pub fn named(name: &str) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(UnitError::invalid("dimension name must not be empty"));
        }
        let mut key = DimensionKey::none();
        key.named.push((Arc::from(name), Rational::ONE));
        Ok(Self::intern(key))
    }

    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }

    /// Whether both handles point to the same interned instance
    pub fn ptr_eq(&self, other: &Dimension) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn multiply(&self, other: &Dimension) -> Dimension {
        if self.is_none() {
            return other.clone();
        }
        if other.is_none() {
            return self.clone();
        }
        Self::intern(self.0.combined(&other.0))
    }

    pub fn divide(&self, other: &Dimension) -> Dimension {
        self.multiply(&other.pow(-1))
    }

    pub fn pow(&self, n: i32) -> Dimension {
        self.pow_rational(Rational::from(n))
    }

    pub fn root(&self, n: i32) -> Result<Dimension> {
        if n <= 0 {
            return Err(UnitError::invalid(format!("root index must be positive, got {n}")));
        }
        Ok(self.pow_rational(Rational::new(1, n as i64)?))
    }

    /// Multiply every exponent by `exponent`
    pub fn pow_rational(&self, exponent: Rational) -> Dimension {
        if exponent.is_one() || self.is_none() {
            return self.clone();
        }
        Self::intern(self.0.scaled(exponent))
    }

    pub fn exponent_of(&self, atom: &DimensionAtom) -> Rational {
        match atom {
            DimensionAtom::Base(base) => self.0.physical[base.index()],
            DimensionAtom::Named(name) => self
                .0
                .named
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, e)| *e)
                .unwrap_or(Rational::ZERO),
        }
    }

    /// Every atom with its (non-zero) exponent
    pub fn base_dimensions(&self) -> BTreeMap<DimensionAtom, Rational> {
        let physical = BaseDimension::ALL
            .iter()
            .map(|base| (DimensionAtom::Base(*base), self.0.physical[base.index()]));
        let named = self
            .0
            .named
            .iter()
            .map(|(name, e)| (DimensionAtom::Named(Arc::clone(name)), *e));
        physical.chain(named).filter(|(_, e)| !e.is_zero()).collect()
    }

    /// The product of the base-dimension factors only
    pub fn physical_part(&self) -> Dimension {
        if self.0.named.is_empty() {
            return self.clone();
        }
        Self::intern(DimensionKey {
            physical: self.0.physical,
            named: Vec::new(),
        })
    }

    /// The named factors, each as its own dimension with its exponent
    pub fn named_elements(&self) -> Vec<(Dimension, Rational)> {
        self.0
            .named
            .iter()
            .map(|(name, e)| {
                let mut key = DimensionKey::none();
                key.named.push((Arc::clone(name), Rational::ONE));
                (Self::intern(key), *e)
            })
            .collect()
    }

    /// Number of live interned dimensions, base ones included
    pub fn interned_count() -> usize {
        DIMENSIONS.len()
    }
}

impl PartialEq for Dimension {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for Dimension {}

impl Hash for Dimension {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl From<BaseDimension> for Dimension {
    fn from(base: BaseDimension) -> Self {
        Dimension::base(base)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let atoms = self.base_dimensions();
        if atoms.is_empty() {
            return write!(f, "1");
        }
        for (i, (atom, e)) in atoms.iter().enumerate() {
            if i > 0 {
                write!(f, "·")?;
            }
            if e.is_one() {
                write!(f, "{atom}")?;
            } else if e.is_integer() {
                write!(f, "{atom}^{e}")?;
            } else {
                write!(f, "{atom}^({e})")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dimension({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(n: i64, d: i64) -> Rational {
        Rational::new(n, d).unwrap()
    }

    #[test]
    fn test_none_is_identity() {
        let speed = Dimension::length().divide(&Dimension::time());
        assert!(Dimension::none().multiply(&speed).ptr_eq(&speed));
        assert!(speed.multiply(&Dimension::none()).ptr_eq(&speed));
    }

    #[test]
    fn test_divide_by_self_is_none() {
        let force = Dimension::mass()
            .multiply(&Dimension::length())
            .divide(&Dimension::time().pow(2));
        assert_eq!(force.divide(&force), Dimension::none());
        assert!(force.divide(&force).ptr_eq(&Dimension::none()));
    }

    #[test]
    fn test_pow_laws() {
        let area = Dimension::length().pow(2);
        assert_eq!(area.pow(3), Dimension::length().pow(6));
        assert_eq!(area.pow(3).root(3).unwrap(), area);
        assert_eq!(Dimension::length().pow(1), Dimension::length());
        assert_eq!(area.pow(0), Dimension::none());
    }

    #[test]
    fn test_root_rejects_non_positive() {
        assert!(matches!(
            Dimension::length().root(0),
            Err(UnitError::InvalidArgument(_))
        ));
        assert!(Dimension::length().root(-2).is_err());
    }

    #[test]
    fn test_fractional_exponents() {
        let half = Dimension::length().root(2).unwrap();
        assert_eq!(half.exponent_of(&BaseDimension::Length.into()), r(1, 2));
        assert_eq!(half.multiply(&half), Dimension::length());
    }

    #[test]
    fn test_base_dimensions_of_area() {
        let area = Dimension::length().multiply(&Dimension::length());
        let expected: BTreeMap<DimensionAtom, Rational> =
            [(DimensionAtom::Base(BaseDimension::Length), Rational::integer(2))].into();
        assert_eq!(area.base_dimensions(), expected);
    }

    #[test]
    fn test_named_dimensions_combine() {
        let info = Dimension::named("information").unwrap();
        let rate = info.divide(&Dimension::time());
        assert_eq!(rate.physical_part(), Dimension::time().pow(-1));
        assert_eq!(rate.named_elements(), vec![(info.clone(), Rational::ONE)]);

        // Multiplying back by time unwraps to the named dimension itself
        let back = rate.multiply(&Dimension::time());
        assert!(back.ptr_eq(&info));
        assert!(Dimension::named("  ").is_err());
    }

    #[test]
    fn test_interning_shares_instances() {
        let a = Dimension::length().multiply(&Dimension::time());
        let b = Dimension::length().multiply(&Dimension::time());
        assert!(a.ptr_eq(&b));
    }

    #[test]
    fn test_display() {
        let accel = Dimension::length().divide(&Dimension::time().pow(2));
        assert_eq!(accel.to_string(), "[L]·[T]^-2");
        assert_eq!(Dimension::none().to_string(), "1");
        let root = Dimension::mass().root(2).unwrap();
        assert_eq!(root.to_string(), "[M]^(1/2)");
    }
}
