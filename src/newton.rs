//! Newton iteration over formal power series.
//!
//! Both solvers start from the unique degree-0 solution and double the
//! number of correct leading coefficients each round, trimming the working
//! series back to `2n` terms so products stay short.

use tracing::debug;

use crate::error::{Error, Result};
use crate::field::PrimeField;
use crate::ntt::NttEngine;
use crate::series::PowerSeries;

/// `B` with `A * B == 1 (mod x^precision)`.
///
/// The result may carry more than `precision` terms; trim it if needed.
pub fn inverse<const P: u64>(
    engine: &NttEngine<P>,
    a: &PowerSeries<P>,
    precision: usize,
) -> Result<PowerSeries<P>> {
    let c0 = a.coefficient(0);
    if c0.is_zero() {
        return Err(Error::ZeroConstantTerm);
    }
    let two = PrimeField::<P>::new(2);
    let mut b = PowerSeries::constant(c0.inv()?);
    let mut n = 1usize;
    while n < precision {
        let window = a.prefix(2 * n);
        // B <- 2B - B^2 A
        let correction = b.square_then_multiply(&window, engine)?.trimmed(2 * n);
        b = &(&b * two) - &correction;
        n *= 2;
        debug!(precision = n, "inverse doubling step");
    }
    Ok(b)
}

/// `B` with `B * B == A (mod x^precision)`; only `A(0) == 1` is supported.
pub fn sqrt<const P: u64>(
    engine: &NttEngine<P>,
    a: &PowerSeries<P>,
    precision: usize,
) -> Result<PowerSeries<P>> {
    let c0 = a.coefficient(0);
    if c0 != PrimeField::one() {
        return Err(Error::NonUnitConstantTerm(c0.value()));
    }
    let inv_two = PrimeField::<P>::new(2).inv()?;
    let mut b = PowerSeries::one();
    let mut n = 1usize;
    while n < precision {
        let window = a.prefix(2 * n);
        // B <- (B + A / B) / 2
        let quotient = window.multiply(&inverse(engine, &b, 2 * n)?, engine)?;
        b = (&b + &quotient).trimmed(2 * n) * inv_two;
        n *= 2;
        debug!(precision = n, "sqrt doubling step");
    }
    Ok(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::field::{Fp, MODULUS};

    fn engine() -> NttEngine<MODULUS> {
        NttEngine::new(EngineConfig { max_log: 8 }).expect("engine")
    }

    #[test]
    fn zero_precision_returns_seed() {
        let a = PowerSeries::from_u64s(&[4, 1]);
        let b = inverse(&engine(), &a, 0).expect("inverse");
        assert_eq!(b, PowerSeries::constant(Fp::new(4).inv().expect("inv")));
        let s = sqrt(&engine(), &PowerSeries::from_u64s(&[1, 9]), 1).expect("sqrt");
        assert_eq!(s, PowerSeries::one());
    }

    #[test]
    fn inverse_of_constant_series() {
        let a = PowerSeries::from_u64s(&[3]);
        let b = inverse(&engine(), &a, 5).expect("inverse");
        assert_eq!(b, PowerSeries::constant(Fp::new(3).inv().expect("inv")));
    }

    #[test]
    fn preconditions_are_errors() {
        let e = engine();
        assert_eq!(
            inverse(&e, &PowerSeries::from_u64s(&[0, 1]), 4),
            Err(Error::ZeroConstantTerm)
        );
        assert_eq!(
            inverse(&e, &PowerSeries::zero(), 4),
            Err(Error::ZeroConstantTerm)
        );
        assert_eq!(
            sqrt(&e, &PowerSeries::from_u64s(&[4, 1]), 4),
            Err(Error::NonUnitConstantTerm(4))
        );
    }

    #[test]
    fn capacity_errors_propagate() {
        let small = NttEngine::<MODULUS>::new(EngineConfig { max_log: 2 }).expect("engine");
        let a = PowerSeries::from_u64s(&[1, 1, 1, 1, 1]);
        assert!(matches!(
            inverse(&small, &a, 16),
            Err(Error::CapacityExceeded { .. })
        ));
    }
}
