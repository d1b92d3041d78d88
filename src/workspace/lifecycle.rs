//! Per-dataset workspace state machine.
//!
//! ```text
//!            upsert                    destroy
//!   Absent ─────────▶ PresentActive ───────────▶ Absent
//!                       ▲      │
//!                upsert │      │ another workspace selected
//!                       │      ▼
//!                    PresentInactive
//! ```
//!
//! Every transition refreshes the [`WorkspaceRegistry`] from the driver
//! first, so decisions are made against what the tool actually reports.
//! External calls are attempted once. A failure leaves the registry at the
//! last step that succeeded and is returned to the caller unchanged.

use super::DEFAULT_WORKSPACE;
use super::driver::{ApplyVars, InfraDriver};
use super::registry::{WorkspaceEntry, WorkspaceRegistry, WorkspaceState};
use crate::dataset::{DatasetFiles, DatasetNaming};
use crate::error::{Result, TerrafsError};

/// What `upsert` did to reach `PresentActive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The workspace did not exist and was created
    Created,
    /// The workspace existed; the next apply supersedes its contents
    Rewritten,
}

/// Drives workspaces through create, apply, destroy and delete.
#[derive(Debug)]
pub struct LifecycleManager<D> {
    driver: D,
    naming: DatasetNaming,
}

impl<D: InfraDriver> LifecycleManager<D> {
    pub fn new(driver: D, naming: DatasetNaming) -> Self {
        Self { driver, naming }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn naming(&self) -> &DatasetNaming {
        &self.naming
    }

    /// Initialize the tool and reload the registry from its listing.
    pub fn refresh(&mut self, registry: &mut WorkspaceRegistry) -> Result<()> {
        self.driver.init()?;
        let listing = self.driver.list_workspaces()?;
        registry.refresh(listing);
        Ok(())
    }

    /// Dataset workspaces with the active one marked; `default` is never listed.
    pub fn enumerate(&mut self, registry: &mut WorkspaceRegistry) -> Result<Vec<WorkspaceEntry>> {
        self.refresh(registry)?;
        Ok(registry.entries())
    }

    /// Make `workspace` exist and be the active workspace.
    pub fn upsert(
        &mut self,
        registry: &mut WorkspaceRegistry,
        workspace: &str,
    ) -> Result<UpsertOutcome> {
        if workspace.is_empty() || workspace == DEFAULT_WORKSPACE {
            return Err(TerrafsError::Validation(format!(
                "'{workspace}' cannot be used as a dataset workspace"
            )));
        }

        self.refresh(registry)?;

        if registry.state_of(workspace).exists() {
            tracing::warn!("Workspace {workspace} already exists, rewriting");
            self.driver.select_workspace(workspace)?;
            registry.select(workspace);
            Ok(UpsertOutcome::Rewritten)
        } else {
            self.driver.new_workspace(workspace)?;
            registry.select(workspace);
            tracing::info!("Created workspace {workspace}");
            Ok(UpsertOutcome::Created)
        }
    }

    /// Materialize the dataset in its workspace, which must be active.
    ///
    /// On failure the workspace stays active; nothing is rolled back.
    pub fn apply(&mut self, registry: &WorkspaceRegistry, files: &DatasetFiles) -> Result<()> {
        let state = registry.state_of(&files.workspace);
        if state != WorkspaceState::PresentActive {
            return Err(TerrafsError::Validation(format!(
                "workspace {} must be active before apply (state: {state:?})",
                files.workspace
            )));
        }

        self.driver.apply(&ApplyVars::from(files))?;
        tracing::info!(
            "Applied {} in workspace {}",
            files.file_name,
            files.workspace
        );
        Ok(())
    }

    /// Tear down a dataset and remove its workspace.
    ///
    /// # Errors
    ///
    /// [`TerrafsError::NotFound`] when no workspace exists for the dataset or
    /// it names the reserved `default` workspace; otherwise the first failing
    /// external step.
    pub fn destroy(&mut self, registry: &mut WorkspaceRegistry, files: &DatasetFiles) -> Result<()> {
        if files.workspace == DEFAULT_WORKSPACE {
            return Err(TerrafsError::NotFound(format!(
                "{DEFAULT_WORKSPACE} holds no dataset and cannot be destroyed"
            )));
        }

        self.refresh(registry)?;

        if !registry.datasets().any(|name| name == files.workspace) {
            return Err(TerrafsError::NotFound(format!(
                "terraform workspace for {} not found",
                files.workspace
            )));
        }

        self.destroy_present(registry, files)
    }

    /// Destroy every dataset workspace, stopping at the first failure.
    ///
    /// Returns the names destroyed. Workspaces after a failing one are left
    /// untouched.
    pub fn destroy_all(&mut self, registry: &mut WorkspaceRegistry) -> Result<Vec<String>> {
        let mut destroyed = Vec::new();
        self.destroy_all_with(registry, |name| destroyed.push(name.to_owned()))?;
        Ok(destroyed)
    }

    /// Like [`destroy_all`](Self::destroy_all), reporting each workspace as
    /// soon as it is gone so callers see partial progress on failure.
    pub fn destroy_all_with<F: FnMut(&str)>(
        &mut self,
        registry: &mut WorkspaceRegistry,
        mut on_destroyed: F,
    ) -> Result<()> {
        self.refresh(registry)?;

        let targets: Vec<String> = registry.datasets().map(str::to_owned).collect();
        for workspace in targets {
            let files = self.naming.for_workspace(&workspace)?;
            self.destroy_present(registry, &files)?;
            on_destroyed(&workspace);
        }
        Ok(())
    }

    fn destroy_present(
        &mut self,
        registry: &mut WorkspaceRegistry,
        files: &DatasetFiles,
    ) -> Result<()> {
        let workspace = files.workspace.as_str();

        self.driver.select_workspace(workspace)?;
        registry.select(workspace);

        self.driver.destroy(&ApplyVars::from(files))?;

        self.driver.select_workspace(DEFAULT_WORKSPACE)?;
        registry.select(DEFAULT_WORKSPACE);

        self.driver.delete_workspace(workspace)?;
        registry.remove(workspace);

        tracing::info!("Destroyed workspace {workspace}");
        Ok(())
    }
}
