use std::sync::Arc;
use std::thread;

use metron_core::{Dimension, Unit, UnitCatalog};

#[test]
fn test_dimension_products_are_shared() {
    let a = Dimension::length().multiply(&Dimension::time());
    let b = Dimension::length().multiply(&Dimension::time());
    assert!(a.ptr_eq(&b));
    assert!(Dimension::mass().divide(&Dimension::mass()).ptr_eq(&Dimension::none()));
}

#[test]
fn test_named_dimension_unwraps() {
    let info = Dimension::named("information").unwrap();
    let per_second = info.divide(&Dimension::time());
    let back = per_second.multiply(&Dimension::time());
    assert!(back.ptr_eq(&info));
}

#[test]
fn test_concurrent_unit_products_agree() {
    let si = Arc::new(UnitCatalog::si().unwrap());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let si = Arc::clone(&si);
            thread::spawn(move || {
                let (kg, m, s) = (
                    si.get("kg").unwrap(),
                    si.get("m").unwrap(),
                    si.get("s").unwrap(),
                );
                // alternate the construction order between threads
                if i % 2 == 0 {
                    kg.multiply(&m).unwrap().divide(&s.pow(2).unwrap()).unwrap()
                } else {
                    s.pow(-2).unwrap().multiply(&kg).unwrap().multiply(&m).unwrap()
                }
            })
        })
        .collect();
    let units: Vec<Unit> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for unit in &units {
        assert!(unit.ptr_eq(&units[0]));
        assert_eq!(unit.symbol(), Some("kg·m/s^2"));
    }
}

#[test]
fn test_concurrent_dimensions_agree() {
    let handles: Vec<_> = (0..8)
        .map(|_| {
            thread::spawn(|| {
                Dimension::mass()
                    .multiply(&Dimension::length().pow(2))
                    .divide(&Dimension::time().pow(3))
            })
        })
        .collect();
    let dims: Vec<Dimension> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for dim in &dims {
        assert!(dim.ptr_eq(&dims[0]));
    }
}
