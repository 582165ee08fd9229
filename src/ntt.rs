use tracing::{debug, trace};

use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::field::PrimeField;

pub fn naive_mul<const P: u64>(a: &[PrimeField<P>], b: &[PrimeField<P>]) -> Vec<PrimeField<P>> {
    if a.is_empty() || b.is_empty() {
        return vec![];
    }
    let mut out = vec![PrimeField::zero(); a.len() + b.len() - 1];
    for i in 0..a.len() {
        for j in 0..b.len() {
            out[i + j] += a[i] * b[j];
        }
    }
    out
}

/// Number-theoretic transform over `PrimeField<P>` with precomputed tables.
///
/// Construction is the one-time initialization step; afterwards the tables are
/// read-only, so a single engine can be shared by reference between callers and
/// threads.
#[derive(Debug, Clone)]
pub struct NttEngine<const P: u64> {
    max_log: usize,
    primitive_root: PrimeField<P>,
    /// `roots[i] = w^i` for a primitive `2^max_log`-th root of unity `w`, `i < N/2`.
    roots: Vec<PrimeField<P>>,
    brev: Vec<u32>,
    inv_capacity: PrimeField<P>,
}

impl<const P: u64> NttEngine<P> {
    pub fn new(cfg: EngineConfig) -> Result<Self> {
        cfg.validate()?;
        let unsupported = Error::UnsupportedModulus {
            modulus: P,
            max_log: cfg.max_log,
        };
        let capacity = cfg.capacity();
        if P < 3 || P >= 1 << 62 || !PrimeField::<P>::is_prime_modulus() {
            return Err(unsupported);
        }
        if (P - 1) % capacity as u64 != 0 {
            return Err(unsupported);
        }

        let g = find_primitive_root::<P>();
        let w = g.pow((P - 1) / capacity as u64);
        let mut roots = Vec::with_capacity(capacity / 2);
        let mut cur = PrimeField::<P>::one();
        for _ in 0..capacity / 2 {
            roots.push(cur);
            cur *= w;
        }

        let mut brev = vec![0u32; capacity];
        for i in 1..capacity {
            brev[i] = (brev[i >> 1] >> 1) | (((i & 1) as u32) << (cfg.max_log - 1));
        }

        let inv_capacity = PrimeField::<P>::new(capacity as u64).inv()?;
        debug!(
            modulus = P,
            max_log = cfg.max_log,
            primitive_root = g.value(),
            "transform tables ready"
        );
        Ok(Self {
            max_log: cfg.max_log,
            primitive_root: g,
            roots,
            brev,
            inv_capacity,
        })
    }

    pub fn max_log(&self) -> usize {
        self.max_log
    }

    pub fn capacity(&self) -> usize {
        1usize << self.max_log
    }

    pub fn primitive_root(&self) -> PrimeField<P> {
        self.primitive_root
    }

    /// In-place forward transform; `values.len()` must be a power of two no
    /// larger than [`capacity`](Self::capacity).
    pub fn forward(&self, values: &mut [PrimeField<P>]) -> Result<()> {
        let n = values.len();
        let log_n = self.log_size(n)?;

        let shift = self.max_log - log_n;
        for i in 0..n {
            let j = (self.brev[i] >> shift) as usize;
            if i < j {
                values.swap(i, j);
            }
        }

        let mut half = 1usize;
        let mut level = 0usize;
        while half < n {
            let log_step = self.max_log - level - 1;
            for start in (0..n).step_by(2 * half) {
                for j in 0..half {
                    let u = values[start + j];
                    let v = values[start + j + half] * self.roots[j << log_step];
                    values[start + j] = u + v;
                    values[start + j + half] = u - v;
                }
            }
            half <<= 1;
            level += 1;
        }
        Ok(())
    }

    /// Inverse of [`forward`](Self::forward): the forward pass evaluates at
    /// `w^-i` once the non-constant outputs are reversed, then scale by `1/n`.
    pub fn inverse(&self, values: &mut [PrimeField<P>]) -> Result<()> {
        self.forward(values)?;
        let n = values.len();
        values[1..].reverse();
        let inv_n = self.inv_capacity * PrimeField::<P>::new((self.capacity() / n) as u64);
        for x in values.iter_mut() {
            *x *= inv_n;
        }
        Ok(())
    }

    pub fn multiply(&self, a: &[PrimeField<P>], b: &[PrimeField<P>]) -> Result<Vec<PrimeField<P>>> {
        if a.is_empty() || b.is_empty() {
            return Ok(vec![]);
        }
        let need = a.len() + b.len() - 1;
        let n = self.transform_len(need)?;
        let mut fa = padded(a, n);
        let mut fb = padded(b, n);
        self.forward(&mut fa)?;
        self.forward(&mut fb)?;
        for (x, y) in fa.iter_mut().zip(&fb) {
            *x *= *y;
        }
        self.inverse(&mut fa)?;
        fa.truncate(need);
        trace!(n, need, "multiply");
        Ok(fa)
    }

    /// `a * a` with a single forward transform.
    pub fn square(&self, a: &[PrimeField<P>]) -> Result<Vec<PrimeField<P>>> {
        if a.is_empty() {
            return Ok(vec![]);
        }
        let need = 2 * a.len() - 1;
        let n = self.transform_len(need)?;
        let mut fa = padded(a, n);
        self.forward(&mut fa)?;
        for x in fa.iter_mut() {
            *x *= *x;
        }
        self.inverse(&mut fa)?;
        fa.truncate(need);
        trace!(n, need, "square");
        Ok(fa)
    }

    /// `a^2 * b` in one transform round.
    pub fn square_then_multiply(
        &self,
        a: &[PrimeField<P>],
        b: &[PrimeField<P>],
    ) -> Result<Vec<PrimeField<P>>> {
        if a.is_empty() || b.is_empty() {
            return Ok(vec![]);
        }
        let need = 2 * a.len() + b.len() - 2;
        let n = self.transform_len(need)?;
        let mut fa = padded(a, n);
        let mut fb = padded(b, n);
        self.forward(&mut fa)?;
        self.forward(&mut fb)?;
        for (x, y) in fa.iter_mut().zip(&fb) {
            *x = *x * *x * *y;
        }
        self.inverse(&mut fa)?;
        fa.truncate(need);
        trace!(n, need, "square_then_multiply");
        Ok(fa)
    }

    fn transform_len(&self, need: usize) -> Result<usize> {
        let n = need.next_power_of_two();
        if n > self.capacity() {
            return Err(Error::CapacityExceeded {
                size: n,
                capacity: self.capacity(),
            });
        }
        Ok(n)
    }

    fn log_size(&self, n: usize) -> Result<usize> {
        if !n.is_power_of_two() {
            return Err(Error::NotPowerOfTwo { size: n });
        }
        if n > self.capacity() {
            return Err(Error::CapacityExceeded {
                size: n,
                capacity: self.capacity(),
            });
        }
        Ok(n.trailing_zeros() as usize)
    }
}

fn padded<const P: u64>(src: &[PrimeField<P>], n: usize) -> Vec<PrimeField<P>> {
    let mut out = vec![PrimeField::zero(); n];
    out[..src.len()].copy_from_slice(src);
    out
}

fn prime_factors(mut n: u64) -> Vec<u64> {
    let mut factors = Vec::new();
    let mut p = 2u64;
    while p.saturating_mul(p) <= n {
        if n % p == 0 {
            factors.push(p);
            while n % p == 0 {
                n /= p;
            }
        }
        p += if p == 2 { 1 } else { 2 };
    }
    if n > 1 {
        factors.push(n);
    }
    factors
}

/// Smallest generator of the multiplicative group modulo the prime `P`.
///
/// Factoring `P - 1` by trial division is bounded by the square root of its
/// odd part, which stays small for NTT-friendly primes.
fn find_primitive_root<const P: u64>() -> PrimeField<P> {
    let phi = P - 1;
    let factors = prime_factors(phi);
    let mut g = 2u64;
    loop {
        let candidate = PrimeField::<P>::new(g);
        if factors
            .iter()
            .all(|&q| candidate.pow(phi / q) != PrimeField::one())
        {
            return candidate;
        }
        g += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Fp, MODULUS, to_field_vec};

    type F17 = PrimeField<17>;

    fn small_engine() -> NttEngine<17> {
        NttEngine::new(EngineConfig { max_log: 4 }).expect("17 supports size 16")
    }

    #[test]
    fn primitive_roots_of_known_primes() {
        assert_eq!(find_primitive_root::<MODULUS>().value(), 3);
        assert_eq!(find_primitive_root::<17>().value(), 3);
        assert_eq!(prime_factors(MODULUS - 1), vec![2, 7, 17]);
    }

    #[test]
    fn root_table_has_full_order() {
        let engine = NttEngine::<MODULUS>::new(EngineConfig { max_log: 10 }).expect("engine");
        let w = engine.roots[1];
        assert_eq!(w.pow(512), -Fp::one());
        assert_eq!(w.pow(1024), Fp::one());
        assert_eq!(engine.roots.len(), 512);
    }

    #[test]
    fn bit_reversal_table() {
        let engine = NttEngine::<17>::new(EngineConfig { max_log: 3 }).expect("engine");
        assert_eq!(engine.brev, vec![0, 4, 2, 6, 1, 5, 3, 7]);
    }

    #[test]
    fn forward_then_inverse_is_identity() {
        let engine = small_engine();
        let original = to_field_vec::<17>(&[3, 1, 4, 1, 5, 9, 2, 6]);
        let mut values = original.clone();
        engine.forward(&mut values).expect("forward");
        assert_ne!(values, original);
        engine.inverse(&mut values).expect("inverse");
        assert_eq!(values, original);
    }

    #[test]
    fn forward_evaluates_at_powers_of_root() {
        let engine = small_engine();
        let coeffs = to_field_vec::<17>(&[1, 2, 3, 4]);
        let mut values = coeffs.clone();
        engine.forward(&mut values).expect("forward");
        let w = engine.roots[4];
        for (i, got) in values.iter().enumerate() {
            let x = w.pow(i as u64);
            let expected = coeffs
                .iter()
                .rev()
                .fold(F17::zero(), |acc, &c| acc * x + c);
            assert_eq!(*got, expected, "point {i}");
        }
    }

    #[test]
    fn rejects_bad_sizes() {
        let engine = small_engine();
        let mut three = vec![F17::one(); 3];
        assert_eq!(
            engine.forward(&mut three),
            Err(Error::NotPowerOfTwo { size: 3 })
        );
        let mut big = vec![F17::one(); 32];
        assert_eq!(
            engine.forward(&mut big),
            Err(Error::CapacityExceeded {
                size: 32,
                capacity: 16
            })
        );
        let a = vec![F17::one(); 9];
        assert!(matches!(
            engine.multiply(&a, &a),
            Err(Error::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn rejects_unfriendly_moduli() {
        assert!(matches!(
            NttEngine::<15>::new(EngineConfig { max_log: 1 }),
            Err(Error::UnsupportedModulus { .. })
        ));
        assert!(matches!(
            NttEngine::<7>::new(EngineConfig { max_log: 2 }),
            Err(Error::UnsupportedModulus { .. })
        ));
        assert!(NttEngine::<7>::new(EngineConfig { max_log: 1 }).is_ok());
    }

    #[test]
    fn builds_quickly_for_a_modulus_near_the_cap() {
        // 29 * 2^57 + 1
        const BIG: u64 = 4_179_340_454_199_820_289;
        let engine = NttEngine::<BIG>::new(EngineConfig { max_log: 10 }).expect("engine");
        let a = to_field_vec::<BIG>(&[BIG - 1, 2, BIG - 3]);
        let b = to_field_vec::<BIG>(&[5, BIG - 7]);
        assert_eq!(engine.multiply(&a, &b).expect("mul"), naive_mul(&a, &b));
    }

    #[test]
    fn small_field_products_match_naive() {
        let engine = small_engine();
        let a = to_field_vec::<17>(&[5, 0, 16, 3]);
        let b = to_field_vec::<17>(&[2, 7, 11]);
        assert_eq!(engine.multiply(&a, &b).expect("mul"), naive_mul(&a, &b));
        assert_eq!(engine.square(&a).expect("square"), naive_mul(&a, &a));
        assert_eq!(
            engine.square_then_multiply(&a, &b).expect("fused"),
            naive_mul(&naive_mul(&a, &a), &b)
        );
    }
}
