//! In-memory view of the workspaces the infrastructure tool knows about.

use super::DEFAULT_WORKSPACE;
use super::driver::WorkspaceListing;
use serde::Serialize;

/// Lifecycle state of one workspace name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WorkspaceState {
    Absent,
    PresentInactive,
    PresentActive,
}

impl WorkspaceState {
    pub fn exists(self) -> bool {
        !matches!(self, Self::Absent)
    }
}

/// A dataset workspace as shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkspaceEntry {
    pub name: String,
    pub is_active: bool,
}

/// Known workspaces plus the single active pointer.
///
/// Created once per session and refreshed from the tool's listing before
/// every lifecycle transition. Only the lifecycle manager mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceRegistry {
    names: Vec<String>,
    active: Option<String>,
}

impl WorkspaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state_of(&self, name: &str) -> WorkspaceState {
        if !self.contains(name) {
            WorkspaceState::Absent
        } else if self.active.as_deref() == Some(name) {
            WorkspaceState::PresentActive
        } else {
            WorkspaceState::PresentInactive
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Dataset workspaces in listing order, `default` excluded.
    pub fn datasets(&self) -> impl Iterator<Item = &str> {
        self.names
            .iter()
            .map(String::as_str)
            .filter(|n| *n != DEFAULT_WORKSPACE)
    }

    pub fn entries(&self) -> Vec<WorkspaceEntry> {
        self.datasets()
            .map(|name| WorkspaceEntry {
                name: name.to_owned(),
                is_active: self.active.as_deref() == Some(name),
            })
            .collect()
    }

    pub(crate) fn refresh(&mut self, listing: WorkspaceListing) {
        self.names = listing.names;
        if !self.names.iter().any(|n| n == DEFAULT_WORKSPACE) {
            self.names.insert(0, DEFAULT_WORKSPACE.to_owned());
        }
        self.active = listing.active.filter(|a| self.contains(a));
    }

    pub(crate) fn insert(&mut self, name: &str) {
        if !self.contains(name) {
            self.names.push(name.to_owned());
        }
    }

    pub(crate) fn select(&mut self, name: &str) {
        self.insert(name);
        self.active = Some(name.to_owned());
    }

    pub(crate) fn remove(&mut self, name: &str) {
        self.names.retain(|n| n != name);
        if self.active.as_deref() == Some(name) {
            self.active = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(names: &[&str], active: Option<&str>) -> WorkspaceListing {
        WorkspaceListing {
            names: names.iter().map(|n| (*n).to_owned()).collect(),
            active: active.map(str::to_owned),
        }
    }

    #[test]
    fn test_states() {
        let mut registry = WorkspaceRegistry::new();
        registry.refresh(listing(&["default", "a", "b"], Some("b")));

        assert_eq!(registry.state_of("a"), WorkspaceState::PresentInactive);
        assert_eq!(registry.state_of("b"), WorkspaceState::PresentActive);
        assert_eq!(registry.state_of("c"), WorkspaceState::Absent);
        assert!(!registry.state_of("c").exists());
    }

    #[test]
    fn test_default_is_hidden_but_always_present() {
        let mut registry = WorkspaceRegistry::new();
        registry.refresh(listing(&["x"], Some("x")));

        assert!(registry.contains(DEFAULT_WORKSPACE));
        assert_eq!(registry.datasets().collect::<Vec<_>>(), vec!["x"]);
        assert_eq!(
            registry.entries(),
            vec![WorkspaceEntry {
                name: "x".to_owned(),
                is_active: true
            }]
        );
    }

    #[test]
    fn test_single_active_pointer() {
        let mut registry = WorkspaceRegistry::new();
        registry.select("a");
        registry.select("b");
        assert_eq!(registry.active(), Some("b"));
        assert_eq!(registry.state_of("a"), WorkspaceState::PresentInactive);

        registry.select("b");
        assert_eq!(registry.datasets().filter(|n| *n == "b").count(), 1);

        registry.remove("b");
        assert_eq!(registry.active(), None);
        assert_eq!(registry.state_of("b"), WorkspaceState::Absent);
    }
}
