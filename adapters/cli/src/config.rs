//! Optional TOML tuning for the generator and the eligibility gate.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use navsurvey_system_eligibility::GateConfig;
use navsurvey_system_generation::GeneratorConfig;
use serde::Deserialize;

/// Tuning loaded from `--config`, defaulting every omitted section.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct CliConfig {
    pub(crate) generator: GeneratorConfig,
    pub(crate) gate: GateConfig,
}

impl CliConfig {
    /// Reads the file at `path`, or returns the defaults when no path is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid config at {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse config toml contents")
    }
}
