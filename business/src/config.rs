use std::any::Any;

use qrstudio_states::{State, snapshot_clone};
use serde::Deserialize;

use crate::encoder::QUIET_ZONE_MODULES;
use crate::params::{
    DEFAULT_LOGO_SIZE_PERCENT, DEFAULT_OUTPUT_DIMENSION, clamp_logo_size_percent,
    clamp_output_dimension,
};

const ENV_PREFIX: &str = "QRSTUDIO_";

/// Tunables of the generator, read once at startup.
///
/// Every field can be overridden with a `QRSTUDIO_`-prefixed environment
/// variable, e.g. `QRSTUDIO_DEBOUNCE_MS=250`. User parameters are never
/// stored here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Quiet period of the render debounce.
    pub debounce_ms: u64,
    /// Quiet zone around the symbol, in modules.
    pub margin: u32,
    pub default_dimension: u32,
    pub default_logo_percent: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 100,
            margin: QUIET_ZONE_MODULES,
            default_dimension: DEFAULT_OUTPUT_DIMENSION,
            default_logo_percent: DEFAULT_LOGO_SIZE_PERCENT,
        }
    }
}

impl GeneratorConfig {
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Reads the `QRSTUDIO_*` entries of `vars`; anything else is ignored.
    ///
    /// Invalid values are logged and the defaults are used instead.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let scoped: Vec<(String, String)> = vars
            .into_iter()
            .filter_map(|(key, value)| {
                key.as_ref()
                    .strip_prefix(ENV_PREFIX)
                    .map(|key| (key.to_owned(), value.as_ref().to_owned()))
            })
            .collect();

        if scoped.is_empty() {
            return Self::default();
        }

        let parsed: Result<Self, _> = serde_env::from_iter(scoped);
        match parsed {
            Ok(config) => config.normalized(),
            Err(err) => {
                log::warn!(
                    target: "qrstudio::config",
                    "invalid {ENV_PREFIX}* configuration, using defaults: {err}"
                );
                Self::default()
            }
        }
    }

    /// Snaps the default dimension and logo size onto their slider grids.
    pub fn normalized(self) -> Self {
        Self {
            default_dimension: clamp_output_dimension(self.default_dimension),
            default_logo_percent: clamp_logo_size_percent(self.default_logo_percent),
            ..self
        }
    }

    pub fn debounce(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(i64::try_from(self.debounce_ms).unwrap_or(i64::MAX))
    }
}

impl State for GeneratorConfig {
    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        snapshot_clone(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_generator() {
        let config = GeneratorConfig::default();
        assert_eq!(config.debounce_ms, 100);
        assert_eq!(config.margin, 2);
        assert_eq!(config.default_dimension, 256);
        assert_eq!(config.default_logo_percent, 20);
        assert_eq!(config.debounce(), chrono::Duration::milliseconds(100));
    }

    #[test]
    fn prefixed_vars_override_defaults() {
        let config = GeneratorConfig::from_vars([
            ("QRSTUDIO_DEBOUNCE_MS", "250"),
            ("QRSTUDIO_DEFAULT_DIMENSION", "512"),
            ("PATH", "/usr/bin"),
        ]);
        assert_eq!(config.debounce_ms, 250);
        assert_eq!(config.default_dimension, 512);
        assert_eq!(config.margin, 2);
    }

    #[test]
    fn unrelated_vars_keep_defaults() {
        let config = GeneratorConfig::from_vars([("HOME", "/root"), ("DEBOUNCE_MS", "5")]);
        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = GeneratorConfig::from_vars([("QRSTUDIO_DEBOUNCE_MS", "soon")]);
        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn out_of_range_defaults_are_snapped() {
        let config = GeneratorConfig::from_vars([
            ("QRSTUDIO_DEFAULT_DIMENSION", "4000"),
            ("QRSTUDIO_DEFAULT_LOGO_PERCENT", "3"),
        ]);
        assert_eq!(config.default_dimension, 1024);
        assert_eq!(config.default_logo_percent, 10);
    }
}
