//! Naming rules tying an uploaded file to its workspace and artifact.

use crate::config::AppConfig;
use crate::error::{Result, TerrafsError};
use crate::workspace::DEFAULT_WORKSPACE;
use std::path::Path;

/// Derives dataset names from the configured suffix and extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetNaming {
    pub data_suffix: String,
    pub columnar_extension: String,
}

impl Default for DatasetNaming {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl DatasetNaming {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            data_suffix: config.data_suffix.clone(),
            columnar_extension: config.columnar_extension.clone(),
        }
    }

    /// Names for an uploaded or deleted file. Only the final path component is used.
    pub fn for_file(&self, file: &str) -> Result<DatasetFiles> {
        let file_name = Path::new(file)
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| TerrafsError::Validation(format!("invalid file name: {file}")))?;

        let workspace = file_name
            .strip_suffix(self.data_suffix.as_str())
            .unwrap_or(file_name);

        self.build(workspace, file_name.to_owned())
    }

    /// Names for an existing workspace, as used by bulk deletion.
    pub fn for_workspace(&self, workspace: &str) -> Result<DatasetFiles> {
        self.build(workspace, format!("{workspace}{}", self.data_suffix))
    }

    fn build(&self, workspace: &str, file_name: String) -> Result<DatasetFiles> {
        if workspace.is_empty() {
            return Err(TerrafsError::Validation(format!(
                "cannot derive a dataset name from {file_name}"
            )));
        }
        if workspace == DEFAULT_WORKSPACE {
            return Err(TerrafsError::Validation(format!(
                "{DEFAULT_WORKSPACE} is reserved and cannot name a dataset"
            )));
        }

        Ok(DatasetFiles {
            workspace: workspace.to_owned(),
            file_name,
            columnar_file_name: format!("{workspace}.{}", self.columnar_extension),
        })
    }
}

/// The workspace name, staged input file and produced artifact of one dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetFiles {
    pub workspace: String,
    pub file_name: String,
    pub columnar_file_name: String,
}
