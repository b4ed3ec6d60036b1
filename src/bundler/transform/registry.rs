//! Global transform registry.

use super::{CommandTransform, TransformFactory, builtin};
use std::{collections::HashMap, fmt, path::PathBuf, sync::Arc};

/// Named transforms available to every package.
///
/// This is the first place a named transform is looked up, ahead of
/// executables on `PATH` and package-relative paths.
#[derive(Clone, Default)]
pub struct TransformRegistry {
    entries: HashMap<String, Arc<dyn TransformFactory>>,
}

impl TransformRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the builtin transforms.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for (name, factory) in builtin::builtins() {
            registry.entries.insert(name.to_string(), factory);
        }
        registry
    }

    /// Registers a factory under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, factory: Arc<dyn TransformFactory>) {
        self.entries.insert(name.into(), factory);
    }

    /// Registers an external program under `name`.
    pub fn register_command(&mut self, name: impl Into<String>, program: impl Into<PathBuf>) {
        self.register(name, Arc::new(CommandTransform::new(program)));
    }

    /// Looks up a factory by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn TransformFactory>> {
        self.entries.get(name).cloned()
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformRegistry")
            .field("names", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::transform::{STRIP_COMMENTS, TRIM};

    #[test]
    fn builtins_are_registered() {
        let registry = TransformRegistry::with_builtins();
        assert!(registry.contains(STRIP_COMMENTS));
        assert!(registry.contains(TRIM));
        assert!(TransformRegistry::new().names().is_empty());
    }

    #[test]
    fn register_replaces_existing_entry() {
        let mut registry = TransformRegistry::with_builtins();
        registry.register_command(TRIM, "/usr/local/bin/my-trim");
        assert_eq!(registry.names().iter().filter(|n| **n == TRIM).count(), 1);
    }
}
