//! Session configuration.

use derive_builder::Builder;

/// The default cap on correlations per execution.
pub const DEFAULT_MAX_COUNT: u32 = 1 << 24;

/// Configuration for one SSP-COT session.
#[derive(Debug, Clone, Builder)]
pub struct Config {
    /// The maximum number of correlations a single execution may produce.
    #[builder(default = "DEFAULT_MAX_COUNT")]
    max_count: u32,
}

impl Config {
    /// Creates a new builder for the configuration.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Returns the maximum number of correlations a single execution may
    /// produce.
    pub fn max_count(&self) -> u32 {
        self.max_count
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::builder().build().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let config = Config::default();
        assert_eq!(config.max_count(), DEFAULT_MAX_COUNT);

        let config = Config::builder().max_count(64).build().unwrap();
        assert_eq!(config.max_count(), 64);
    }
}
