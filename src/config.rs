use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AccessError;
use crate::models::PermissionRule;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub global: GlobalConfig,
    #[serde(default)]
    pub distributors: Vec<DistributorConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GlobalConfig {
    /// Reference dataset file or directory
    pub reference: PathBuf,
    /// Reject unknown names and malformed paths instead of degrading
    #[serde(default)]
    pub strict: bool,
    #[serde(default = "default_listen")]
    pub listen: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DistributorConfig {
    pub name: String,
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default)]
    pub excludes: Vec<String>,
}

fn default_listen() -> String {
    "0.0.0.0:3000".to_string()
}

impl DistributorConfig {
    pub fn rule(&self) -> PermissionRule {
        PermissionRule::new(self.includes.iter(), self.excludes.iter())
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let mut config = Self::parse(&content).context("Failed to parse config file")?;

        // Relative reference paths are relative to the config file
        if config.global.reference.is_relative() {
            if let Some(dir) = path.parent() {
                config.global.reference = dir.join(&config.global.reference);
            }
        }

        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;

        let mut names = HashSet::new();
        for distributor in &config.distributors {
            if !names.insert(distributor.name.as_str()) {
                bail!("Duplicate distributor '{}'", distributor.name);
            }
        }

        Ok(config)
    }

    pub fn distributor(&self, name: &str) -> Option<&DistributorConfig> {
        self.distributors.iter().find(|d| d.name == name)
    }

    pub fn rule_for(&self, name: &str) -> Result<PermissionRule, AccessError> {
        self.distributor(name)
            .map(DistributorConfig::rule)
            .ok_or_else(|| AccessError::UnknownDistributor(name.to_string()))
    }
}
