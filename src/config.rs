//! Application configuration
//!
//! Handles the persistent settings that tell terrafs where the Terraform
//! configuration lives and how staged files are named.

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory holding the Terraform definitions; uploads are staged here.
pub const DEFAULT_STAGING_DIR: &str = "fs-terraform-config";

pub const STAGING_DIR_ENV: &str = "TERRAFS_STAGING_DIR";
pub const TERRAFORM_BIN_ENV: &str = "TERRAFS_TERRAFORM_BIN";

/// terrafs configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Terraform working directory, also used as the staging area
    pub staging_dir: PathBuf,
    /// Terraform executable, resolved through `PATH` when not absolute
    pub terraform_bin: String,
    /// Suffix stripped from an uploaded file name to form the workspace name
    pub data_suffix: String,
    /// Extension of the produced columnar artifact
    pub columnar_extension: String,
    /// Terraform variable carrying the uploaded file name
    pub file_name_var: String,
    /// Terraform variable carrying the columnar artifact name
    pub columnar_name_var: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            staging_dir: PathBuf::from(DEFAULT_STAGING_DIR),
            terraform_bin: "terraform".to_owned(),
            data_suffix: ".json".to_owned(),
            columnar_extension: "parquet".to_owned(),
            file_name_var: "file_name".to_owned(),
            columnar_name_var: "parquet_file_name".to_owned(),
        }
    }
}

impl AppConfig {
    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Failed to get config directory")?;
        Ok(config_dir.join("terrafs").join("config.json"))
    }

    /// Load configuration from the default location, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let config = Self::load_from(&path)?;
        Ok(config.with_env_overrides())
    }

    /// Load configuration from a specific file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Self =
            serde_json::from_str(&contents).context("Failed to parse config JSON")?;

        Ok(config)
    }

    /// Apply `TERRAFS_STAGING_DIR` / `TERRAFS_TERRAFORM_BIN` when set.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var_os(STAGING_DIR_ENV).map(PathBuf::from),
            std::env::var(TERRAFORM_BIN_ENV).ok(),
        )
    }

    /// Replace the staging directory and/or terraform binary. Empty values are ignored.
    pub fn with_overrides(
        mut self,
        staging_dir: Option<PathBuf>,
        terraform_bin: Option<String>,
    ) -> Self {
        if let Some(dir) = staging_dir.filter(|d| !d.as_os_str().is_empty()) {
            self.staging_dir = dir;
        }
        if let Some(bin) = terraform_bin.filter(|b| !b.trim().is_empty()) {
            self.terraform_bin = bin;
        }
        self
    }
}
