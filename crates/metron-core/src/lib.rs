//! metron-core: unit and dimension algebra
//!
//! This crate models units of measurement, the physical dimensions they
//! measure, and the converters between them. Units combine algebraically
//! (multiply, divide, powers, roots, prefixes); algebraically equivalent
//! expressions collapse to one canonical, shared unit, and conversions are
//! only handed out between units of the same dimension.
//!
//! # Example
//!
//! ```
//! use metron_core::{Prefix, UnitCatalog};
//!
//! let si = UnitCatalog::si().unwrap();
//! let metre = si.get("m").unwrap();
//! let second = si.get("s").unwrap();
//!
//! // Products are canonical
//! let speed = metre.divide(&second).unwrap();
//! assert_eq!(speed.symbol(), Some("m/s"));
//!
//! // Prefixes and conversions
//! let km = metre.with_prefix(Prefix::KILO);
//! assert_eq!(km.converter_to(&metre).unwrap().convert(1.0), 1000.0);
//!
//! // Incompatible units refuse to convert
//! assert!(metre.converter_to(&second).is_err());
//! ```

pub mod cache;
pub mod catalog;
pub mod config;
pub mod converter;
pub mod dimension;
pub mod error;
pub mod number;
pub mod unit;

pub use catalog::{UnitCatalog, UnitCatalogBuilder};
pub use config::{ApproxConfig, MathContext, Rounding};
pub use converter::Converter;
pub use dimension::{BaseDimension, Dimension, DimensionAtom};
pub use error::{Result, UnitError};
pub use number::{BigRational, Rational};
pub use unit::{Prefix, Unit, UnitElement};
