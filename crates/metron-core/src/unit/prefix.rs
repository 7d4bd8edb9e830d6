//! Metric and binary unit prefixes
//!
//! To add a prefix, add a constant and list it in [`Prefix::METRIC`] or
//! [`Prefix::BINARY`]. Symbol lookup and re-prefixing pick it up from there.

use std::fmt;

use crate::converter::Converter;
use crate::error::{Result, UnitError};

/// A named power of ten (metric) or of 1024 (binary)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Prefix {
    name: &'static str,
    symbol: &'static str,
    base: u32,
    exponent: i32,
}

const fn metric(name: &'static str, symbol: &'static str, exponent: i32) -> Prefix {
    Prefix {
        name,
        symbol,
        base: 10,
        exponent,
    }
}

const fn binary(name: &'static str, symbol: &'static str, exponent: i32) -> Prefix {
    Prefix {
        name,
        symbol,
        base: 1024,
        exponent,
    }
}

impl Prefix {
    pub const QUECTO: Prefix = metric("quecto", "q", -30);
    pub const RONTO: Prefix = metric("ronto", "r", -27);
    pub const YOCTO: Prefix = metric("yocto", "y", -24);
    pub const ZEPTO: Prefix = metric("zepto", "z", -21);
    pub const ATTO: Prefix = metric("atto", "a", -18);
    pub const FEMTO: Prefix = metric("femto", "f", -15);
    pub const PICO: Prefix = metric("pico", "p", -12);
    pub const NANO: Prefix = metric("nano", "n", -9);
    pub const MICRO: Prefix = metric("micro", "µ", -6);
    pub const MILLI: Prefix = metric("milli", "m", -3);
    pub const CENTI: Prefix = metric("centi", "c", -2);
    pub const DECI: Prefix = metric("deci", "d", -1);
    pub const DEKA: Prefix = metric("deka", "da", 1);
    pub const HECTO: Prefix = metric("hecto", "h", 2);
    pub const KILO: Prefix = metric("kilo", "k", 3);
    pub const MEGA: Prefix = metric("mega", "M", 6);
    pub const GIGA: Prefix = metric("giga", "G", 9);
    pub const TERA: Prefix = metric("tera", "T", 12);
    pub const PETA: Prefix = metric("peta", "P", 15);
    pub const EXA: Prefix = metric("exa", "E", 18);
    pub const ZETTA: Prefix = metric("zetta", "Z", 21);
    pub const YOTTA: Prefix = metric("yotta", "Y", 24);
    pub const RONNA: Prefix = metric("ronna", "R", 27);
    pub const QUETTA: Prefix = metric("quetta", "Q", 30);

    pub const KIBI: Prefix = binary("kibi", "Ki", 1);
    pub const MEBI: Prefix = binary("mebi", "Mi", 2);
    pub const GIBI: Prefix = binary("gibi", "Gi", 3);
    pub const TEBI: Prefix = binary("tebi", "Ti", 4);
    pub const PEBI: Prefix = binary("pebi", "Pi", 5);
    pub const EXBI: Prefix = binary("exbi", "Ei", 6);
    pub const ZEBI: Prefix = binary("zebi", "Zi", 7);
    pub const YOBI: Prefix = binary("yobi", "Yi", 8);

    pub const METRIC: [Prefix; 24] = [
        Prefix::QUECTO,
        Prefix::RONTO,
        Prefix::YOCTO,
        Prefix::ZEPTO,
        Prefix::ATTO,
        Prefix::FEMTO,
        Prefix::PICO,
        Prefix::NANO,
        Prefix::MICRO,
        Prefix::MILLI,
        Prefix::CENTI,
        Prefix::DECI,
        Prefix::DEKA,
        Prefix::HECTO,
        Prefix::KILO,
        Prefix::MEGA,
        Prefix::GIGA,
        Prefix::TERA,
        Prefix::PETA,
        Prefix::EXA,
        Prefix::ZETTA,
        Prefix::YOTTA,
        Prefix::RONNA,
        Prefix::QUETTA,
    ];

    pub const BINARY: [Prefix; 8] = [
        Prefix::KIBI,
        Prefix::MEBI,
        Prefix::GIBI,
        Prefix::TEBI,
        Prefix::PEBI,
        Prefix::EXBI,
        Prefix::ZEBI,
        Prefix::YOBI,
    ];

    /// Every known prefix, metric first
    pub fn all() -> impl Iterator<Item = Prefix> {
        Self::METRIC.into_iter().chain(Self::BINARY)
    }

    /// Find a prefix by symbol. `u` is accepted for micro.
    pub fn from_symbol(symbol: &str) -> Result<Prefix> {
        if symbol.is_empty() {
            return Err(UnitError::invalid("prefix symbol must not be empty"));
        }
        let symbol = if symbol == "u" { "µ" } else { symbol };
        Self::all()
            .find(|p| p.symbol == symbol)
            .ok_or_else(|| UnitError::invalid(format!("unknown prefix '{symbol}'")))
    }

    /// The named prefix for `base ^ exponent`, if there is one
    pub fn lookup(base: u32, exponent: i32) -> Option<Prefix> {
        Self::all().find(|p| p.base == base && p.exponent == exponent)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn symbol(&self) -> &'static str {
        self.symbol
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    pub fn exponent(&self) -> i32 {
        self.exponent
    }

    /// Whether both prefixes scale by powers of the same base
    pub fn same_kind(&self, other: &Prefix) -> bool {
        self.base == other.base
    }

    /// Multiply by `base ^ exponent`
    pub fn converter(&self) -> Converter {
        Converter::power_of(self.base, self.exponent)
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}
