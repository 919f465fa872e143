//! Configuration analyzers
//!
//! Each analyzer checks one class of problem across a configuration snapshot. [`all`] returns
//! every analyzer, configured by a shared [`Config`].

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod gateway;

use mesh_config_analyzer_core::{Analyzer, Combined};

/// Settings shared by analyzers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub default_gateway: gateway::DefaultGateway,
}

/// Returns every available analyzer.
pub fn all(config: &Config) -> Vec<Box<dyn Analyzer>> {
    vec![Box::new(gateway::SecretAnalyzer::new(
        config.default_gateway.clone(),
    ))]
}

/// Returns an analyzer that runs every available analyzer.
pub fn combined(config: &Config) -> Combined {
    Combined::new(all(config))
}
