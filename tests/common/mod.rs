//! Shared fixtures for integration tests.
//!
//! [`FakeDriver`] mimics Terraform's workspace rules in memory: `new` creates
//! and selects, `select` requires an existing workspace, and `delete` refuses
//! the selected workspace and `default`. Every helper here is used by each
//! test crate that includes this module.

use std::collections::HashSet;
use std::path::PathBuf;
use terrafs::convert::{ConvertReport, convert_file};
use terrafs::error::{Result, TerrafsError};
use terrafs::workspace::{ApplyVars, InfraDriver, WorkspaceListing};

#[derive(Debug)]
pub struct FakeDriver {
    pub workspaces: Vec<String>,
    pub active: String,
    pub calls: Vec<String>,
    pub fail_apply: HashSet<String>,
    pub fail_destroy: HashSet<String>,
    pub fail_delete: HashSet<String>,
    /// When set, `apply` runs the real conversion inside this directory.
    pub staging_dir: Option<PathBuf>,
    pub converted: Vec<ConvertReport>,
}

impl Default for FakeDriver {
    fn default() -> Self {
        Self {
            workspaces: vec!["default".to_owned()],
            active: "default".to_owned(),
            calls: Vec::new(),
            fail_apply: HashSet::new(),
            fail_destroy: HashSet::new(),
            fail_delete: HashSet::new(),
            staging_dir: None,
            converted: Vec::new(),
        }
    }
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workspaces(names: &[&str]) -> Self {
        let mut driver = Self::default();
        driver
            .workspaces
            .extend(names.iter().map(|n| (*n).to_owned()));
        driver
    }

    pub fn converting_in(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = Some(dir.into());
        self
    }

    pub fn has_workspace(&self, name: &str) -> bool {
        self.workspaces.iter().any(|w| w == name)
    }

    /// Calls equal to `call`, e.g. `"workspace select d"`.
    pub fn count_calls(&self, call: &str) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }

    /// Calls of one kind regardless of target, e.g. every `"apply"`.
    pub fn count_calls_of(&self, kind: &str) -> usize {
        self.calls
            .iter()
            .filter(|c| {
                c.as_str() == kind || c.strip_prefix(kind).is_some_and(|rest| rest.starts_with(' '))
            })
            .count()
    }

    fn fail(command: String) -> TerrafsError {
        TerrafsError::ExternalTool {
            command,
            status: Some(1),
            stdout: String::new(),
            stderr: "injected failure".to_owned(),
        }
    }
}

impl InfraDriver for FakeDriver {
    fn init(&mut self) -> Result<()> {
        self.calls.push("init".to_owned());
        Ok(())
    }

    fn list_workspaces(&mut self) -> Result<WorkspaceListing> {
        self.calls.push("workspace list".to_owned());
        Ok(WorkspaceListing {
            names: self.workspaces.clone(),
            active: Some(self.active.clone()),
        })
    }

    fn new_workspace(&mut self, name: &str) -> Result<()> {
        let call = format!("workspace new {name}");
        self.calls.push(call.clone());
        if self.has_workspace(name) {
            return Err(Self::fail(call));
        }
        self.workspaces.push(name.to_owned());
        name.clone_into(&mut self.active);
        Ok(())
    }

    fn select_workspace(&mut self, name: &str) -> Result<()> {
        let call = format!("workspace select {name}");
        self.calls.push(call.clone());
        if !self.has_workspace(name) {
            return Err(Self::fail(call));
        }
        name.clone_into(&mut self.active);
        Ok(())
    }

    fn delete_workspace(&mut self, name: &str) -> Result<()> {
        let call = format!("workspace delete {name}");
        self.calls.push(call.clone());
        if name == "default"
            || name == self.active
            || !self.has_workspace(name)
            || self.fail_delete.contains(name)
        {
            return Err(Self::fail(call));
        }
        self.workspaces.retain(|w| w != name);
        Ok(())
    }

    fn apply(&mut self, vars: &ApplyVars) -> Result<()> {
        let call = format!("apply {}", self.active);
        self.calls.push(call.clone());
        if self.fail_apply.contains(&self.active) {
            return Err(Self::fail(call));
        }
        if let Some(dir) = &self.staging_dir {
            let report = convert_file(
                &dir.join(&vars.file_name),
                &dir.join(&vars.columnar_file_name),
            )?;
            self.converted.push(report);
        }
        Ok(())
    }

    fn destroy(&mut self, _vars: &ApplyVars) -> Result<()> {
        let call = format!("destroy {}", self.active);
        self.calls.push(call.clone());
        if self.fail_destroy.contains(&self.active) {
            return Err(Self::fail(call));
        }
        Ok(())
    }
}
