//! `InfraDriver` backed by the `terraform` command line.

use super::driver::{ApplyVars, InfraDriver, WorkspaceListing};
use crate::config::AppConfig;
use crate::error::{Result, TerrafsError};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Runs `terraform` inside the staging directory.
///
/// Stdout and stderr are captured; a non-zero exit becomes
/// [`TerrafsError::ExternalTool`] carrying both.
#[derive(Debug, Clone)]
pub struct TerraformDriver {
    working_dir: PathBuf,
    binary: String,
    file_name_var: String,
    columnar_name_var: String,
}

impl TerraformDriver {
    pub fn new(working_dir: impl Into<PathBuf>, binary: impl Into<String>) -> Self {
        let defaults = AppConfig::default();
        Self {
            working_dir: working_dir.into(),
            binary: binary.into(),
            file_name_var: defaults.file_name_var,
            columnar_name_var: defaults.columnar_name_var,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            working_dir: config.staging_dir.clone(),
            binary: config.terraform_bin.clone(),
            file_name_var: config.file_name_var.clone(),
            columnar_name_var: config.columnar_name_var.clone(),
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Environment contract: `TF_VAR_<name>` for both dataset variables.
    fn var_env(&self, vars: &ApplyVars) -> [(String, String); 2] {
        [
            (
                format!("TF_VAR_{}", self.file_name_var),
                vars.file_name.clone(),
            ),
            (
                format!("TF_VAR_{}", self.columnar_name_var),
                vars.columnar_file_name.clone(),
            ),
        ]
    }

    fn run(&self, args: &[&str], envs: &[(String, String)]) -> Result<String> {
        let command_line = format!("{} {}", self.binary, args.join(" "));
        tracing::debug!(
            "Running `{command_line}` in {}",
            self.working_dir.display()
        );

        let output = Command::new(&self.binary)
            .args(args)
            .current_dir(&self.working_dir)
            .env("TF_IN_AUTOMATION", "1")
            .envs(envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .output()
            .map_err(|e| TerrafsError::ExternalTool {
                command: command_line.clone(),
                status: None,
                stdout: String::new(),
                stderr: format!("failed to execute {}: {e}", self.binary),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if output.status.success() {
            Ok(stdout)
        } else {
            tracing::error!(
                "`{command_line}` failed with status {:?}",
                output.status.code()
            );
            Err(TerrafsError::ExternalTool {
                command: command_line,
                status: output.status.code(),
                stdout,
                stderr,
            })
        }
    }
}

impl InfraDriver for TerraformDriver {
    fn init(&mut self) -> Result<()> {
        self.run(&["init", "-input=false"], &[]).map(drop)
    }

    fn list_workspaces(&mut self) -> Result<WorkspaceListing> {
        let output = self.run(&["workspace", "list"], &[])?;
        Ok(WorkspaceListing::parse(&output))
    }

    fn new_workspace(&mut self, name: &str) -> Result<()> {
        self.run(&["workspace", "new", name], &[]).map(drop)
    }

    fn select_workspace(&mut self, name: &str) -> Result<()> {
        self.run(&["workspace", "select", name], &[]).map(drop)
    }

    fn delete_workspace(&mut self, name: &str) -> Result<()> {
        self.run(&["workspace", "delete", name], &[]).map(drop)
    }

    fn apply(&mut self, vars: &ApplyVars) -> Result<()> {
        let envs = self.var_env(vars);
        self.run(&["apply", "-auto-approve", "-input=false"], &envs)
            .map(drop)
    }

    fn destroy(&mut self, vars: &ApplyVars) -> Result<()> {
        let envs = self.var_env(vars);
        self.run(&["destroy", "-auto-approve", "-input=false"], &envs)
            .map(drop)
    }
}
