use metron_core::{
    ApproxConfig, BigRational, MathContext, Rounding, UnitCatalog, UnitError,
};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use std::str::FromStr;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn convert(from: &str, to: &str, value: &str, ctx: &MathContext) -> Decimal {
    let si = UnitCatalog::si().unwrap();
    si.get(from)
        .unwrap()
        .converter_to(&si.get(to).unwrap())
        .unwrap()
        .convert_decimal(dec(value), ctx)
        .unwrap()
}

#[test]
fn test_exact_decimal_conversions() {
    let ctx = MathContext::default();
    assert_eq!(convert("km", "m", "1.234", &ctx), dec("1234"));
    assert_eq!(convert("°C", "K", "-40", &ctx), dec("233.15"));
    assert_eq!(convert("h", "s", "0.5", &ctx), dec("1800"));
    assert_eq!(convert("MiB", "B", "1", &ctx), dec("1048576"));
}

#[test]
fn test_fahrenheit_through_kelvin() {
    let si = UnitCatalog::si().unwrap();
    let kelvin = si.get("K").unwrap();
    let fahrenheit = kelvin
        .scale(BigRational::new(5, 9).unwrap())
        .unwrap()
        .shift(BigRational::new(45967, 100).unwrap())
        .with_symbol("°F")
        .unwrap();
    let to_celsius = fahrenheit.converter_to(&si.get("°C").unwrap()).unwrap();

    let ctx = MathContext::default();
    assert_eq!(to_celsius.convert_decimal(dec("212"), &ctx).unwrap(), dec("100"));
    assert_eq!(to_celsius.convert_decimal(dec("-40"), &ctx).unwrap(), dec("-40"));
    approx::assert_relative_eq!(to_celsius.convert(98.6), 37.0, epsilon = 1e-9);
}

#[test]
fn test_context_from_config() {
    let ctx: MathContext =
        serde_json::from_str(r#"{ "precision": 6, "rounding": "half_up" }"#).unwrap();
    assert_eq!(ctx, MathContext::new(6, Rounding::HalfUp));
    assert_eq!(convert("min", "h", "1", &ctx), dec("0.0166667"));

    let ctx: MathContext = serde_json::from_str(r#"{ "precision": 3, "rounding": "floor" }"#)
        .unwrap();
    assert_eq!(convert("min", "h", "1", &ctx), dec("0.0166"));
}

#[test]
fn test_decimal_overflow_is_reported() {
    let si = UnitCatalog::si().unwrap();
    let converter = si.get("Qm").unwrap().converter_to(&si.get("qm").unwrap()).unwrap();
    let result = converter.convert_decimal(dec("1"), &MathContext::default());
    assert_eq!(result, Err(UnitError::DecimalOverflow));
}

#[test]
fn test_approximated_factor() {
    let cfg: ApproxConfig = serde_json::from_str(r#"{ "max_iterations": 50 }"#).unwrap();
    let factor = BigRational::from_f64_approx_with(0.3048, &cfg).unwrap();
    let si = UnitCatalog::si().unwrap();
    let foot = si.get("m").unwrap().scale(factor).unwrap();
    let metres = foot
        .converter_to(&si.get("m").unwrap())
        .unwrap()
        .convert_decimal(dec("10"), &MathContext::default())
        .unwrap();
    assert_eq!(metres, dec("3.048"));
}
