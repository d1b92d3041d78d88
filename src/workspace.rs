//! Dataset workspaces.
//!
//! Each uploaded dataset lives in its own infrastructure workspace, named
//! after the file without its data suffix. The infrastructure tool's state
//! store is the only durable record of which datasets exist; the
//! [`WorkspaceRegistry`] is a per-session view of it that the
//! [`LifecycleManager`] keeps in step with every transition.
//!
//! The tool itself sits behind the [`InfraDriver`] trait. [`TerraformDriver`]
//! shells out to `terraform`; tests substitute a fake.

pub mod driver;
pub mod lifecycle;
pub mod registry;
pub mod terraform;

pub use driver::{ApplyVars, InfraDriver, WorkspaceListing};
pub use lifecycle::{LifecycleManager, UpsertOutcome};
pub use registry::{WorkspaceEntry, WorkspaceRegistry, WorkspaceState};
pub use terraform::TerraformDriver;

/// Terraform's built-in workspace. Never holds a dataset.
pub const DEFAULT_WORKSPACE: &str = "default";
