//! Truncatable formal power series over `PrimeField<P>`.
//!
//! Construction and `+`/`-` keep the coefficient list canonical (no trailing
//! zeros). Transform-backed products and [`PowerSeries::trim`] do not strip
//! trailing zeros; equality compares the series mathematically, so stored
//! zeros never matter to callers.

use std::fmt::{self, Display, Formatter};
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::error::Result;
use crate::field::PrimeField;
use crate::ntt::NttEngine;

#[derive(Clone, Debug, Default)]
pub struct PowerSeries<const P: u64> {
    coeffs: Vec<PrimeField<P>>,
}

impl<const P: u64> PowerSeries<P> {
    pub fn new(coeffs: Vec<PrimeField<P>>) -> Self {
        let mut out = Self { coeffs };
        out.strip_trailing_zeros();
        out
    }

    pub fn from_u64s(raw: &[u64]) -> Self {
        raw.iter().copied().map(PrimeField::new).collect()
    }

    pub fn from_i64s(raw: &[i64]) -> Self {
        raw.iter().copied().map(PrimeField::from_i64).collect()
    }

    pub fn constant(c: PrimeField<P>) -> Self {
        Self::new(vec![c])
    }

    pub fn zero() -> Self {
        Self { coeffs: vec![] }
    }

    pub fn one() -> Self {
        Self::constant(PrimeField::one())
    }

    /// Keeps transform output as-is, trailing zeros included.
    fn from_raw(coeffs: Vec<PrimeField<P>>) -> Self {
        Self { coeffs }
    }

    /// Coefficient of `x^i`; zero past the stored length.
    pub fn coefficient(&self, i: usize) -> PrimeField<P> {
        self.coeffs.get(i).copied().unwrap_or_default()
    }

    pub fn coeffs(&self) -> &[PrimeField<P>] {
        &self.coeffs
    }

    /// Number of stored coefficients.
    pub fn len(&self) -> usize {
        self.coeffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coeffs.is_empty()
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(|c| c.is_zero())
    }

    pub fn degree(&self) -> Option<usize> {
        self.coeffs.iter().rposition(|c| !c.is_zero())
    }

    /// Drops every coefficient of degree `>= n`. Stored zeros below `n` stay.
    pub fn trim(&mut self, n: usize) -> &mut Self {
        self.coeffs.truncate(n);
        self
    }

    pub fn trimmed(mut self, n: usize) -> Self {
        self.trim(n);
        self
    }

    /// The low `n` coefficients without consuming `self`.
    pub fn prefix(&self, n: usize) -> Self {
        Self::new(self.coeffs[..n.min(self.coeffs.len())].to_vec())
    }

    pub fn evaluate(&self, x: PrimeField<P>) -> PrimeField<P> {
        self.coeffs
            .iter()
            .rev()
            .fold(PrimeField::<P>::zero(), |acc, &c| acc * x + c)
    }

    pub fn multiply(&self, rhs: &Self, engine: &NttEngine<P>) -> Result<Self> {
        Ok(Self::from_raw(engine.multiply(&self.coeffs, &rhs.coeffs)?))
    }

    pub fn square(&self, engine: &NttEngine<P>) -> Result<Self> {
        Ok(Self::from_raw(engine.square(&self.coeffs)?))
    }

    /// `self^2 * rhs`, fused into one transform round.
    pub fn square_then_multiply(&self, rhs: &Self, engine: &NttEngine<P>) -> Result<Self> {
        Ok(Self::from_raw(
            engine.square_then_multiply(&self.coeffs, &rhs.coeffs)?,
        ))
    }

    fn strip_trailing_zeros(&mut self) {
        while self.coeffs.last().is_some_and(|c| c.is_zero()) {
            self.coeffs.pop();
        }
    }

    fn zip_assign(&mut self, rhs: &Self, op: impl Fn(&mut PrimeField<P>, PrimeField<P>)) {
        if self.coeffs.len() < rhs.coeffs.len() {
            self.coeffs.resize(rhs.coeffs.len(), PrimeField::zero());
        }
        for (x, &y) in self.coeffs.iter_mut().zip(&rhs.coeffs) {
            op(x, y);
        }
        self.strip_trailing_zeros();
    }
}

impl<const P: u64> PartialEq for PowerSeries<P> {
    fn eq(&self, other: &Self) -> bool {
        let n = self.coeffs.len().max(other.coeffs.len());
        (0..n).all(|i| self.coefficient(i) == other.coefficient(i))
    }
}

impl<const P: u64> Eq for PowerSeries<P> {}

impl<const P: u64> FromIterator<PrimeField<P>> for PowerSeries<P> {
    fn from_iter<I: IntoIterator<Item = PrimeField<P>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<const P: u64> From<PrimeField<P>> for PowerSeries<P> {
    fn from(c: PrimeField<P>) -> Self {
        Self::constant(c)
    }
}

impl<const P: u64> Display for PowerSeries<P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, c) in self.coeffs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{c}")?;
        }
        write!(f, "]")
    }
}

impl<const P: u64> AddAssign<&PowerSeries<P>> for PowerSeries<P> {
    fn add_assign(&mut self, rhs: &PowerSeries<P>) {
        self.zip_assign(rhs, |x, y| *x += y);
    }
}

impl<const P: u64> SubAssign<&PowerSeries<P>> for PowerSeries<P> {
    fn sub_assign(&mut self, rhs: &PowerSeries<P>) {
        self.zip_assign(rhs, |x, y| *x -= y);
    }
}

impl<const P: u64> Add for &PowerSeries<P> {
    type Output = PowerSeries<P>;
    fn add(self, rhs: Self) -> Self::Output {
        let mut out = self.clone();
        out += rhs;
        out
    }
}

impl<const P: u64> Sub for &PowerSeries<P> {
    type Output = PowerSeries<P>;
    fn sub(self, rhs: Self) -> Self::Output {
        let mut out = self.clone();
        out -= rhs;
        out
    }
}

impl<const P: u64> Neg for &PowerSeries<P> {
    type Output = PowerSeries<P>;
    fn neg(self) -> Self::Output {
        PowerSeries::from_raw(self.coeffs.iter().map(|&c| -c).collect())
    }
}

impl<const P: u64> MulAssign<PrimeField<P>> for PowerSeries<P> {
    fn mul_assign(&mut self, k: PrimeField<P>) {
        if k.is_zero() {
            self.coeffs.clear();
            return;
        }
        for x in &mut self.coeffs {
            *x *= k;
        }
    }
}

impl<const P: u64> Mul<PrimeField<P>> for PowerSeries<P> {
    type Output = Self;
    fn mul(mut self, k: PrimeField<P>) -> Self::Output {
        self *= k;
        self
    }
}

impl<const P: u64> Mul<PrimeField<P>> for &PowerSeries<P> {
    type Output = PowerSeries<P>;
    fn mul(self, k: PrimeField<P>) -> Self::Output {
        self.clone() * k
    }
}
