//! Power-series arithmetic modulo an NTT-friendly prime.
//!
//! [`NttEngine`] owns the transform tables and is passed to every operation
//! that multiplies series; [`newton`] builds inverse and square root on top.

pub mod bench;
pub mod config;
pub mod error;
pub mod field;
pub mod newton;
pub mod ntt;
pub mod series;

pub use config::EngineConfig;
pub use error::{Error, Result};
pub use field::{Fp, MODULUS, PrimeField};
pub use ntt::NttEngine;
pub use series::PowerSeries;

/// Series over the default 998244353 field.
pub type FpSeries = PowerSeries<MODULUS>;
