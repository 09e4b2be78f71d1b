//! Runtime configuration.
//!
//! Settings come from an optional `hydrolab.toml` and `HYDROLAB_*`
//! environment variables, in that order of precedence (environment wins).
//!
//! ```toml
//! risk_warning = 0.6
//!
//! [thresholds.ph]
//! min = 6.5
//! max = 8.5
//!
//! [engine]
//! max_activations = 10000
//! ```
//!
//! Nested keys in the environment use a double underscore, e.g.
//! `HYDROLAB_THRESHOLDS__SULFATE__MAX=200`.

use std::collections::BTreeMap;
use std::path::Path;

use hydrolab_engine::EngineConfig;
use hydrolab_foundation::{Error, Result};
use serde::Deserialize;

/// File looked up in the working directory when no path is given.
pub const DEFAULT_FILE: &str = "hydrolab";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "HYDROLAB";

/// Default risk probability above which a warning is shown.
pub const DEFAULT_RISK_WARNING: f64 = 0.6;

/// Settings for the `hydrolab` binary.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Threshold overrides: class -> property -> value.
    pub thresholds: BTreeMap<String, BTreeMap<String, f64>>,

    /// Risk probability above which the report warns.
    pub risk_warning: f64,

    /// Rule engine limits.
    pub engine: EngineSettings,
}

/// Engine section of the configuration file.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Kill switch threshold.
    pub max_activations: usize,
    /// Journal ring buffer size when tracing.
    pub journal_size: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        let defaults = EngineConfig::debug();
        Self {
            max_activations: defaults.max_activations,
            journal_size: defaults.journal_size,
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            thresholds: BTreeMap::new(),
            risk_warning: DEFAULT_RISK_WARNING,
            engine: EngineSettings::default(),
        }
    }
}

impl RuntimeConfig {
    /// Loads the configuration.
    ///
    /// An explicit `path` must exist. Without one, `hydrolab.toml` in the
    /// working directory is used if present.
    ///
    /// # Errors
    /// Returns an invalid configuration error if a source cannot be read or
    /// holds values of the wrong type or range.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_FILE).required(false),
        };
        let environment = config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true);
        let builder = config::Config::builder()
            .add_source(file)
            .add_source(environment);

        let source = match path {
            Some(path) => path.display().to_string(),
            None => format!("{DEFAULT_FILE}.toml"),
        };
        Self::finish(builder, &source)
    }

    /// Parses TOML text, ignoring the environment.
    ///
    /// # Errors
    /// Returns an invalid configuration error on malformed input.
    pub fn from_toml(text: &str) -> Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from_str(text, config::FileFormat::Toml));
        Self::finish(builder, "<inline>")
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        source: &str,
    ) -> Result<Self> {
        let settings: Self = builder
            .build()
            .and_then(config::Config::try_deserialize)
            .map_err(|e| Error::invalid_config(e.to_string()).with_source(source))?;
        settings.validate().map_err(|e| e.with_source(source))?;

        let thresholds: usize = settings.thresholds.values().map(BTreeMap::len).sum();
        tracing::debug!(
            source,
            thresholds,
            risk_warning = settings.risk_warning,
            "configuration loaded"
        );
        Ok(settings)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    /// Returns an invalid configuration error naming the first bad value.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.risk_warning) {
            let message = format!("must be within [0, 1], got {}", self.risk_warning);
            return Err(Error::invalid_config(message).with_key("risk_warning"));
        }
        for (class, properties) in &self.thresholds {
            for (property, value) in properties {
                if !value.is_finite() {
                    let key = format!("thresholds.{class}.{property}");
                    return Err(Error::invalid_config("not a finite number").with_key(key));
                }
            }
        }
        if self.engine.max_activations == 0 {
            let err = Error::invalid_config("must be positive");
            return Err(err.with_key("engine.max_activations"));
        }
        Ok(())
    }

    /// Iterates threshold overrides as `(class, property, value)`.
    pub fn threshold_entries(&self) -> impl Iterator<Item = (&str, &str, f64)> {
        self.thresholds.iter().flat_map(|(class, properties)| {
            properties
                .iter()
                .map(move |(property, value)| (class.as_str(), property.as_str(), *value))
        })
    }

    /// Engine configuration for one run.
    #[must_use]
    pub fn engine_config(&self, trace: bool) -> EngineConfig {
        EngineConfig::default()
            .with_max_activations(self.engine.max_activations)
            .with_journal(trace)
            .with_journal_size(self.engine.journal_size)
    }
}
