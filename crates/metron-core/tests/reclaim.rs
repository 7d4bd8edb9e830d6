//! Interning caches hold their values weakly. This binary runs a single test
//! so the live-entry counts are not disturbed by other tests.

use metron_core::{Dimension, Unit};

#[test]
fn test_interned_values_are_reclaimed() {
    let x = Dimension::named("reclaim-x").unwrap();
    let y = Dimension::named("reclaim-y").unwrap();
    let dimensions = Dimension::interned_count();

    let first = x.multiply(&y);
    let second = x.multiply(&y);
    assert!(first.ptr_eq(&second));
    assert_eq!(Dimension::interned_count(), dimensions + 1);

    drop(first);
    drop(second);
    assert_eq!(Dimension::interned_count(), dimensions);

    // Rebuilt on demand, structurally equal to the dropped one
    let again = x.multiply(&y);
    assert_eq!(Dimension::interned_count(), dimensions + 1);
    assert_eq!(again.to_string(), "[reclaim-x]·[reclaim-y]");

    let u = Unit::base("u", x.clone()).unwrap();
    let units = Unit::interned_count();
    let square = u.pow(2).unwrap();
    assert_eq!(Unit::interned_count(), units + 1);
    drop(square);
    assert_eq!(Unit::interned_count(), units);
}
