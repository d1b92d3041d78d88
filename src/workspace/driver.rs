//! The infrastructure tool seam.

use crate::dataset::DatasetFiles;
use crate::error::Result;

/// Workspaces reported by the infrastructure tool, in listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceListing {
    pub names: Vec<String>,
    pub active: Option<String>,
}

impl WorkspaceListing {
    /// Parse `terraform workspace list` output.
    ///
    /// One name per line; the selected workspace is prefixed with `*`.
    pub fn parse(output: &str) -> Self {
        let mut listing = Self::default();
        for line in output.lines() {
            let name = line.replace('*', "");
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            if line.contains('*') {
                listing.active = Some(name.to_owned());
            }
            listing.names.push(name.to_owned());
        }
        listing
    }
}

/// Variables handed to apply/destroy so the tool's definitions can reference them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyVars {
    pub file_name: String,
    pub columnar_file_name: String,
}

impl From<&DatasetFiles> for ApplyVars {
    fn from(files: &DatasetFiles) -> Self {
        Self {
            file_name: files.file_name.clone(),
            columnar_file_name: files.columnar_file_name.clone(),
        }
    }
}

/// State transitions delegated to an external infrastructure-as-code tool.
///
/// Every call is attempted exactly once; implementations never retry.
pub trait InfraDriver {
    /// Prepare the working directory (providers, backend).
    fn init(&mut self) -> Result<()>;

    fn list_workspaces(&mut self) -> Result<WorkspaceListing>;

    /// Create a workspace and make it the selected one.
    fn new_workspace(&mut self, name: &str) -> Result<()>;

    fn select_workspace(&mut self, name: &str) -> Result<()>;

    /// Remove a workspace. It must not be the selected one.
    fn delete_workspace(&mut self, name: &str) -> Result<()>;

    /// Materialize the dataset's resources in the selected workspace.
    fn apply(&mut self, vars: &ApplyVars) -> Result<()>;

    /// Tear down the dataset's resources in the selected workspace.
    fn destroy(&mut self, vars: &ApplyVars) -> Result<()>;
}
