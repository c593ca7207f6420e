//! Shared installation registry.
//!
//! Readers take a snapshot of the whole installation list; writers build a
//! new list and swap it in. A reader therefore always sees either the old or
//! the new list, never a mix.

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

use crate::config::schema::ExerunConfig;
use crate::error::{ExerunError, Result};
use crate::registry::installation::InstallationTemplate;

/// Immutable view of the registered installations.
pub type Snapshot = Arc<[InstallationTemplate]>;

/// Registry of named tool installations.
#[derive(Debug)]
pub struct InstallationRegistry {
    current: RwLock<Snapshot>,
}

impl Default for InstallationRegistry {
    fn default() -> Self {
        Self {
            current: RwLock::new(Arc::from(Vec::new())),
        }
    }
}

impl InstallationRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding `installations`.
    pub fn with_installations(installations: Vec<InstallationTemplate>) -> Result<Self> {
        let registry = Self::new();
        registry.replace(installations)?;
        Ok(registry)
    }

    /// Build a registry from the installations in a configuration.
    pub fn from_config(config: &ExerunConfig) -> Result<Self> {
        Self::with_installations(
            config
                .installations
                .iter()
                .map(|i| i.to_template())
                .collect(),
        )
    }

    /// Take a consistent snapshot of the installation list.
    pub fn snapshot(&self) -> Snapshot {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Swap in a new installation list.
    ///
    /// Fails without touching the current list if two installations share a
    /// name.
    pub fn replace(&self, installations: Vec<InstallationTemplate>) -> Result<()> {
        let mut seen = HashSet::new();
        for installation in &installations {
            if !seen.insert(installation.name()) {
                return Err(ExerunError::ConfigValidationError {
                    message: format!("Duplicate installation name '{}'", installation.name()),
                });
            }
        }

        let next: Snapshot = Arc::from(installations);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = next;
        tracing::debug!("Installation registry replaced ({} entries)", guard.len());
        Ok(())
    }

    /// Find an installation by exact, case-sensitive name.
    pub fn find(&self, name: &str) -> Option<InstallationTemplate> {
        if name.is_empty() {
            return None;
        }
        self.snapshot().iter().find(|i| i.name() == name).cloned()
    }

    /// Registered installation names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.snapshot()
            .iter()
            .map(|i| i.name().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn tool(name: &str) -> InstallationTemplate {
        InstallationTemplate::new(name, &format!("/opt/{}", name), None)
    }

    #[test]
    fn empty_registry_finds_nothing() {
        let registry = InstallationRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.find("anything").is_none());
    }

    #[test]
    fn find_is_exact_and_case_sensitive() {
        let registry = InstallationRegistry::with_installations(vec![tool("Tool")]).unwrap();
        assert!(registry.find("Tool").is_some());
        assert!(registry.find("tool").is_none());
        assert!(registry.find("Tool ").is_none());
        assert!(registry.find("").is_none());
    }

    #[test]
    fn replace_rejects_duplicates_and_keeps_old_list() {
        let registry = InstallationRegistry::with_installations(vec![tool("a")]).unwrap();
        let result = registry.replace(vec![tool("b"), tool("b")]);
        assert!(matches!(
            result,
            Err(ExerunError::ConfigValidationError { .. })
        ));
        assert_eq!(registry.names(), vec!["a".to_string()]);
    }

    #[test]
    fn snapshot_is_unaffected_by_later_replace() {
        let registry = InstallationRegistry::with_installations(vec![tool("a")]).unwrap();
        let before = registry.snapshot();
        registry.replace(vec![tool("b"), tool("c")]).unwrap();

        assert_eq!(before.len(), 1);
        assert_eq!(before[0].name(), "a");
        assert_eq!(registry.names(), vec!["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn concurrent_readers_see_whole_lists() {
        let registry = Arc::new(InstallationRegistry::with_installations(vec![tool("a")]).unwrap());

        let writer = {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                for _ in 0..200 {
                    registry.replace(vec![tool("x"), tool("y")]).unwrap();
                    registry.replace(vec![tool("a")]).unwrap();
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    for _ in 0..200 {
                        let names: Vec<_> = registry
                            .snapshot()
                            .iter()
                            .map(|i| i.name().to_string())
                            .collect();
                        assert!(names == ["a"] || names == ["x", "y"], "saw {:?}", names);
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
