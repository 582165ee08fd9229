use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid engine config: {0}")]
    InvalidConfig(String),
    #[error("modulus {modulus} does not support transforms of size 2^{max_log}")]
    UnsupportedModulus { modulus: u64, max_log: usize },
    #[error("transform size {size} is not a power of two")]
    NotPowerOfTwo { size: usize },
    #[error("transform size {size} exceeds engine capacity {capacity}")]
    CapacityExceeded { size: usize, capacity: usize },
    #[error("{value} has no multiplicative inverse modulo {modulus}")]
    NotInvertible { value: u64, modulus: u64 },
    #[error("power series with zero constant term has no inverse")]
    ZeroConstantTerm,
    #[error("square root needs constant term 1, got {0}")]
    NonUnitConstantTerm(u64),
}
