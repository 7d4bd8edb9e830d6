//! Exact number types
//!
//! [`Rational`] carries exponents; [`BigRational`] carries scale factors,
//! which can grow without bound once prefixes and powers pile up.

mod big_rational;
mod rational;

pub use big_rational::BigRational;
pub(crate) use big_rational::big_to_decimal;
pub use rational::Rational;
