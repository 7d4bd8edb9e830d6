use approx::assert_abs_diff_eq;
use metron_core::{
    BaseDimension, BigRational, Dimension, DimensionAtom, Prefix, Rational, Unit, UnitCatalog,
    UnitError,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::BTreeMap;

fn si() -> UnitCatalog {
    UnitCatalog::si().unwrap()
}

fn dimension_strategy() -> impl Strategy<Value = Dimension> {
    proptest::collection::vec(-3i32..=3, 7).prop_map(|exponents| {
        BaseDimension::ALL
            .iter()
            .zip(exponents)
            .fold(Dimension::none(), |acc, (base, e)| {
                acc.multiply(&Dimension::base(*base).pow(e))
            })
    })
}

#[test]
fn test_rational_basics() {
    assert_eq!(Rational::new(2, 4).unwrap(), Rational::new(1, 2).unwrap());
    assert_eq!(Rational::new(3, 0), Err(UnitError::DivisionByZero));
}

#[test]
fn test_one_third_round_trip() {
    let third = BigRational::from_f64_exact(1.0 / 3.0).unwrap();
    assert_eq!(third.to_string(), "6004799503160661/18014398509481984");
    assert_eq!(third.to_f64().to_bits(), (1.0f64 / 3.0).to_bits());
}

#[test]
fn test_length_squared_base_dimensions() {
    let area = Dimension::length().multiply(&Dimension::length());
    let expected: BTreeMap<DimensionAtom, Rational> =
        [(DimensionAtom::Base(BaseDimension::Length), Rational::integer(2))].into();
    assert_eq!(area.base_dimensions(), expected);
}

#[test]
fn test_kilometre_scenario() {
    let m = si().get("m").unwrap();
    let km = m.with_prefix(Prefix::KILO);
    assert_eq!(km.symbol(), Some("km"));
    assert_eq!(km.converter_to(&m).unwrap().convert(1.0), 1000.0);
}

#[test]
fn test_metre_to_second_is_incommensurable() {
    let si = si();
    let err = si.get("m").unwrap().converter_to(&si.get("s").unwrap());
    assert!(matches!(err, Err(UnitError::Incommensurable { .. })));
}

#[test]
fn test_radian_is_not_one() {
    let si = si();
    let rad = si.get("rad").unwrap();
    assert_eq!(rad.dimension(), Unit::one().dimension());
    assert!(rad.converter_to(&Unit::one()).unwrap().is_identity());
    assert_ne!(rad, Unit::one());
}

#[test]
fn test_cancellation_returns_the_original_instance() {
    let si = si();
    let (m, s, kg) = (si.get("m").unwrap(), si.get("s").unwrap(), si.get("kg").unwrap());
    let speed = m.divide(&s).unwrap();
    let back = speed.multiply(&kg).unwrap().divide(&kg).unwrap();
    assert!(back.ptr_eq(&speed));

    // a dimensionless factor still cancels to an equal unit
    let rad = si.get("rad").unwrap();
    assert_eq!(speed.multiply(&rad).unwrap().divide(&rad).unwrap(), speed);
}

#[test]
fn test_unit_times_inverse_is_one() {
    let si = si();
    for symbol in ["m", "km", "N", "h", "KiB", "mol"] {
        let unit = si.get(symbol).unwrap();
        let product = unit.multiply(&unit.inverse().unwrap()).unwrap();
        assert!(product.dimension().is_none(), "{symbol}");
        assert!(product.system_converter().is_identity(), "{symbol}");
    }
}

#[test]
fn test_prefix_cancellation() {
    let si = si();
    for symbol in ["m", "g", "s", "B", "N"] {
        let unit = si.get(symbol).unwrap();
        let round_trip = unit.with_prefix(Prefix::KILO).with_prefix(Prefix::MILLI);
        assert_eq!(round_trip, unit);
        assert!(round_trip.ptr_eq(&unit));
    }
}

#[test]
fn test_compound_conversion() {
    let si = si();
    let kmh = si
        .get("km")
        .unwrap()
        .divide(&si.get("h").unwrap())
        .unwrap();
    let ms = si.get("m").unwrap().divide(&si.get("s").unwrap()).unwrap();
    let to_ms = kmh.converter_to(&ms).unwrap();
    assert_abs_diff_eq!(to_ms.convert(36.0), 10.0, epsilon = 1e-12);
    assert_eq!(to_ms.scale(), Some(BigRational::new(5, 18).unwrap()));
}

#[test]
fn test_area_from_mixed_prefixes_is_square_metre() {
    let si = si();
    let km = si.get("km").unwrap();
    let mm = si.get("mm").unwrap();
    let area = km.multiply(&mm).unwrap();
    assert!(area.is_system_unit());
    assert_eq!(area, si.get("m").unwrap().pow(2).unwrap());
}

#[test]
fn test_roots_of_units() {
    let si = si();
    let m2 = si.get("m").unwrap().pow(2).unwrap();
    assert_eq!(m2.root(2).unwrap(), si.get("m").unwrap());
    assert!(matches!(m2.root(0), Err(UnitError::InvalidArgument(_))));
    assert!(Dimension::length().root(-1).is_err());

    let sqrt_km = si.get("km").unwrap().root(2).unwrap();
    let sqrt_m = si.get("m").unwrap().root(2).unwrap();
    assert_abs_diff_eq!(
        sqrt_km.converter_to(&sqrt_m).unwrap().convert(1.0),
        1000f64.sqrt(),
        epsilon = 1e-9
    );
}

proptest! {
    #[test]
    fn prop_rational_reduced(n in any::<i32>(), d in any::<i32>().prop_filter("non-zero", |d| *d != 0)) {
        let r = Rational::new(n as i64, d as i64).unwrap();
        prop_assert!(r.denominator() > 0);
        prop_assert_eq!(num::integer::gcd(r.numerator().abs(), r.denominator()), 1);
        prop_assert_eq!(r + r.negate(), Rational::ZERO);
    }

    #[test]
    fn prop_exact_double_round_trip(x in any::<f64>().prop_filter("finite", |x| x.is_finite())) {
        let back = BigRational::from_f64_exact(x).unwrap().to_f64();
        // a rational zero has no sign
        let expected = if x == 0.0 { 0.0f64 } else { x };
        prop_assert_eq!(back.to_bits(), expected.to_bits());
    }

    #[test]
    fn prop_dimension_identity_and_inverse(d in dimension_strategy()) {
        prop_assert_eq!(Dimension::none().multiply(&d), d.clone());
        prop_assert_eq!(d.divide(&d), Dimension::none());
    }

    #[test]
    fn prop_dimension_pow_laws(d in dimension_strategy(), a in -4i32..=4, b in -4i32..=4, n in 1i32..=5) {
        prop_assert_eq!(d.pow(a).pow(b), d.pow(a * b));
        prop_assert_eq!(d.pow(n).root(n).unwrap(), d);
    }

    #[test]
    fn prop_conversion_round_trip(x in -1e6f64..1e6, pair in 0usize..6) {
        let si = UnitCatalog::si().unwrap();
        let (a, b) = [
            ("km", "mm"),
            ("h", "ms"),
            ("°C", "K"),
            ("KiB", "kbit"),
            ("N", "kN"),
            ("g", "kg"),
        ][pair];
        let converter = si.get(a).unwrap().converter_to(&si.get(b).unwrap()).unwrap();
        let back = converter.inverse().convert(converter.convert(x));
        prop_assert!((back - x).abs() <= 1e-9 * x.abs().max(1.0));
    }
}
