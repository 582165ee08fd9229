use crate::error::{Error, Result};

/// Largest log-size accepted by any config. Tables are `O(2^max_log)` words.
pub const MAX_SUPPORTED_LOG: usize = 26;

pub const DEFAULT_MAX_LOG: usize = 19;

/// Sizing for an [`NttEngine`](crate::ntt::NttEngine).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub max_log: usize,
}

impl EngineConfig {
    pub fn new(max_log: usize) -> Result<Self> {
        let cfg = Self { max_log };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_log == 0 {
            return Err(Error::InvalidConfig("max_log must be at least 1".into()));
        }
        if self.max_log > MAX_SUPPORTED_LOG {
            return Err(Error::InvalidConfig(format!(
                "max_log {} exceeds the supported limit {}",
                self.max_log, MAX_SUPPORTED_LOG
            )));
        }
        Ok(())
    }

    /// Largest transform length, `2^max_log`.
    pub fn capacity(&self) -> usize {
        1usize << self.max_log
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_log: DEFAULT_MAX_LOG,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_capacity_is_two_to_the_nineteen() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.capacity(), 524_288);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_zero_and_oversized_logs() {
        assert!(matches!(EngineConfig::new(0), Err(Error::InvalidConfig(_))));
        assert!(matches!(
            EngineConfig::new(MAX_SUPPORTED_LOG + 1),
            Err(Error::InvalidConfig(_))
        ));
        assert_eq!(EngineConfig::new(4).map(|c| c.capacity()), Ok(16));
    }
}
