use std::fmt::{self, Debug, Display, Formatter};
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::error::{Error, Result};

/// 998244353 = 119 * 2^23 + 1.
pub const MODULUS: u64 = 998_244_353;

/// Residue modulo the prime `P`, always stored in `[0, P)`.
///
/// `P` must be an odd prime below `2^62` so sums never overflow and products
/// fit in `u128`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PrimeField<const P: u64>(u64);

pub type Fp = PrimeField<MODULUS>;

impl<const P: u64> PrimeField<P> {
    pub const fn new(value: u64) -> Self {
        Self(value % P)
    }

    pub fn from_i64(value: i64) -> Self {
        Self((value as i128).rem_euclid(P as i128) as u64)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn one() -> Self {
        Self(1 % P)
    }

    pub const fn modulus() -> u64 {
        P
    }

    pub const fn value(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn pow(self, mut exp: u64) -> Self {
        let mut base = self;
        let mut acc = Self::one();
        while exp > 0 {
            if exp & 1 == 1 {
                acc *= base;
            }
            base *= base;
            exp >>= 1;
        }
        acc
    }

    /// Multiplicative inverse by the extended Euclidean algorithm on `(self, P)`.
    pub fn inv(self) -> Result<Self> {
        let not_invertible = Error::NotInvertible {
            value: self.0,
            modulus: P,
        };
        if self.0 == 0 {
            return Err(not_invertible);
        }
        let (mut t, mut new_t) = (0i128, 1i128);
        let (mut r, mut new_r) = (P as i128, self.0 as i128);
        while new_r != 0 {
            let q = r / new_r;
            (t, new_t) = (new_t, t - q * new_t);
            (r, new_r) = (new_r, r - q * new_r);
        }
        if r != 1 {
            return Err(not_invertible);
        }
        Ok(Self(t.rem_euclid(P as i128) as u64))
    }

    pub fn is_prime_modulus() -> bool {
        is_prime(P)
    }
}

/// Miller-Rabin with the first twelve primes as bases, exact for every `u64`.
pub fn is_prime(n: u64) -> bool {
    const BASES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];
    if n < 2 {
        return false;
    }
    for &p in &BASES {
        if n % p == 0 {
            return n == p;
        }
    }
    let s = (n - 1).trailing_zeros();
    let d = (n - 1) >> s;
    'witness: for &a in &BASES {
        let mut x = pow_mod(a, d, n);
        if x == 1 || x == n - 1 {
            continue;
        }
        for _ in 1..s {
            x = mul_mod(x, x, n);
            if x == n - 1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    (a as u128 * b as u128 % m as u128) as u64
}

fn pow_mod(mut base: u64, mut exp: u64, m: u64) -> u64 {
    let mut acc = 1 % m;
    base %= m;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = mul_mod(acc, base, m);
        }
        base = mul_mod(base, base, m);
        exp >>= 1;
    }
    acc
}

impl<const P: u64> From<u64> for PrimeField<P> {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl<const P: u64> From<i64> for PrimeField<P> {
    fn from(value: i64) -> Self {
        Self::from_i64(value)
    }
}

impl<const P: u64> Display for PrimeField<P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<const P: u64> Debug for PrimeField<P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} (mod {})", self.0, P)
    }
}

impl<const P: u64> Add for PrimeField<P> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        let mut sum = self.0 + rhs.0;
        if sum >= P {
            sum -= P;
        }
        Self(sum)
    }
}

impl<const P: u64> AddAssign for PrimeField<P> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<const P: u64> Sub for PrimeField<P> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        if self.0 >= rhs.0 {
            Self(self.0 - rhs.0)
        } else {
            Self(self.0 + P - rhs.0)
        }
    }
}

impl<const P: u64> SubAssign for PrimeField<P> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<const P: u64> Neg for PrimeField<P> {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self::zero() - self
    }
}

impl<const P: u64> Mul for PrimeField<P> {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        let z = (self.0 as u128 * rhs.0 as u128) % (P as u128);
        Self(z as u64)
    }
}

impl<const P: u64> MulAssign for PrimeField<P> {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

pub fn to_field_vec<const P: u64>(raw: &[u64]) -> Vec<PrimeField<P>> {
    raw.iter().copied().map(PrimeField::new).collect()
}
