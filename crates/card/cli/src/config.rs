//! Harness configuration
//!
//! Values come from, in increasing priority: built-in defaults, the TOML file,
//! `CARDLAB_*` environment variables, and command-line flags.

use std::path::Path;

use cardlab_engine::{AppletId, SimulatorConfig};
use clap::ValueEnum;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::{Deserialize, Serialize};

const DEFAULT_CONFIG_FILE: &str = "cardlab.toml";
const ENV_PREFIX: &str = "CARDLAB_";

/// A service on the simulated card
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Service {
    CryptoTest,
    Rsa1024,
}

impl From<Service> for AppletId {
    fn from(service: Service) -> Self {
        match service {
            Service::CryptoTest => Self::CryptoTest,
            Service::Rsa1024 => Self::Rsa1024,
        }
    }
}

/// Operations the bench subcommand can time
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BenchOp {
    Echo,
    Aes128,
    Aes192,
    Aes256,
    Sha256,
    EcGenerate,
    Ecdh,
    RsaEncrypt,
    RsaDecrypt,
    RsaSign,
    RsaVerify,
    Des3,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Iterations per bench run
    pub iterations: u32,
    /// Payload size for operations that take one
    pub size: usize,
    /// Log every frame at debug level
    pub log_frames: bool,
    /// Service selected when the simulator powers up
    pub auto_select: Option<Service>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            size: 64,
            log_frames: false,
            auto_select: None,
        }
    }
}

impl BenchConfig {
    /// Load from `path` (or `./cardlab.toml`) and the environment
    ///
    /// A missing file is not an error; defaults apply.
    pub fn load(path: Option<&Path>) -> eyre::Result<Self> {
        let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        if path.is_some() && !file.exists() {
            eyre::bail!("config file {} not found", file.display());
        }

        Ok(Figment::new()
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()?)
    }

    /// Apply command-line overrides
    pub fn with_overrides(mut self, iterations: Option<u32>, size: Option<usize>) -> Self {
        if let Some(iterations) = iterations {
            self.iterations = iterations;
        }
        if let Some(size) = size {
            self.size = size;
        }
        self
    }

    pub fn simulator_config(&self) -> SimulatorConfig {
        SimulatorConfig::new()
            .with_auto_select(self.auto_select.map(Into::into))
            .with_log_frames(self.log_frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        figment::Jail::expect_with(|_| {
            let config = BenchConfig::load(None).unwrap();
            assert_eq!(config.iterations, 100);
            assert_eq!(config.size, 64);
            assert!(config.auto_select.is_none());
            Ok(())
        });
    }

    #[test]
    fn test_toml_and_env_layers() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "bench.toml",
                r#"
                iterations = 5
                size = 32
                auto_select = "rsa1024"
                "#,
            )?;
            jail.set_env("CARDLAB_SIZE", "48");

            let config = BenchConfig::load(Some(Path::new("bench.toml"))).unwrap();
            assert_eq!(config.iterations, 5);
            assert_eq!(config.size, 48);
            assert_eq!(config.auto_select, Some(Service::Rsa1024));

            let config = config.with_overrides(Some(7), None);
            assert_eq!(config.iterations, 7);
            assert_eq!(config.size, 48);
            Ok(())
        });
    }

    #[test]
    fn test_missing_explicit_file() {
        assert!(BenchConfig::load(Some(Path::new("does-not-exist.toml"))).is_err());
    }
}
