use powser::config::EngineConfig;
use powser::newton::{inverse, sqrt};
use powser::{Error, FpSeries, MODULUS, NttEngine};

fn engine() -> NttEngine<MODULUS> {
    NttEngine::new(EngineConfig::default()).expect("default engine")
}

#[test]
fn inverse_of_one_plus_x() {
    let a = FpSeries::from_u64s(&[1, 1]);
    let b = inverse(&engine(), &a, 4).expect("inverse");
    let p = MODULUS;
    assert_eq!(b.trimmed(4), FpSeries::from_u64s(&[1, p - 1, 1, p - 1]));
}

#[test]
fn sqrt_of_perfect_square() {
    let a = FpSeries::from_u64s(&[1, 2, 1]);
    let b = sqrt(&engine(), &a, 3).expect("sqrt");
    assert_eq!(b.trimmed(3), FpSeries::from_u64s(&[1, 1, 0]));
}

#[test]
fn inverse_times_series_is_one_for_many_precisions() {
    let engine = engine();
    let a = FpSeries::from_i64s(&[7, -3, 0, 11, 5, 2, -8]);
    for precision in 1..40 {
        let b = inverse(&engine, &a, precision).expect("inverse");
        let check = b.multiply(&a, &engine).expect("multiply").trimmed(precision);
        assert_eq!(check, FpSeries::one().trimmed(precision), "precision {precision}");
    }
}

#[test]
fn sqrt_squared_matches_series_for_many_precisions() {
    let engine = engine();
    let a = FpSeries::from_i64s(&[1, 4, -2, 9, 0, 3]);
    for precision in 1..40 {
        let b = sqrt(&engine, &a, precision).expect("sqrt");
        let check = b.square(&engine).expect("square").trimmed(precision);
        assert_eq!(check, a.prefix(precision), "precision {precision}");
    }
}

#[test]
fn geometric_series_inverse() {
    // 1 / (1 - x) = 1 + x + x^2 + ...
    let a = FpSeries::from_i64s(&[1, -1]);
    let b = inverse(&engine(), &a, 100).expect("inverse").trimmed(100);
    assert_eq!(b, FpSeries::from_u64s(&[1; 100]));
}

#[test]
fn rejects_bad_constant_terms() {
    let engine = engine();
    assert_eq!(
        inverse(&engine, &FpSeries::from_u64s(&[0, 1]), 8),
        Err(Error::ZeroConstantTerm)
    );
    assert_eq!(
        sqrt(&engine, &FpSeries::from_u64s(&[2, 1]), 8),
        Err(Error::NonUnitConstantTerm(2))
    );
    assert_eq!(
        sqrt(&engine, &FpSeries::zero(), 8),
        Err(Error::NonUnitConstantTerm(0))
    );
}
