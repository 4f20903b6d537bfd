//! Suites of scenario files.

use std::path::{Path, PathBuf};

use dbtest_core::{Describe, Service, TypeDescriptor};
use dbtest_registry::RegistryBuilder;
use tracing::debug;

use crate::error::RunResult;
use crate::{Database, Runner, TestSet};

/// Scenario files run together against one service and one database.
///
/// # Example
///
/// ```ignore
/// Suite::new()
///     .file("scenarios/items.yaml")
///     .register_type::<Item>()
///     .run(&mut db, &service)?;
/// ```
#[derive(Debug, Clone)]
pub struct Suite {
    /// Base path for resolving relative file paths.
    base_path: PathBuf,
    files: Vec<PathBuf>,
    /// Types registered on top of those discovered from the service.
    types: Vec<TypeDescriptor>,
}

impl Default for Suite {
    fn default() -> Self {
        Self::new()
    }
}

impl Suite {
    pub fn new() -> Self {
        Self {
            base_path: scenarios_root(),
            files: Vec::new(),
            types: Vec::new(),
        }
    }

    /// Set the base path for resolving relative paths.
    pub fn base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = path.into();
        self
    }

    /// Add a scenario file.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(path.into());
        self
    }

    /// Register a record type that no method signature mentions.
    pub fn register(mut self, ty: TypeDescriptor) -> Self {
        self.types.push(ty);
        self
    }

    pub fn register_type<T: Describe>(self) -> Self {
        self.register(T::describe())
    }

    /// The resolved scenario file paths.
    pub fn files(&self) -> Vec<PathBuf> {
        self.files.iter().map(|p| self.resolve_path(p)).collect()
    }

    /// Load every file, then run them in order, stopping at the first
    /// failure.
    pub fn run(&self, db: &mut dyn Database, service: &dyn Service) -> RunResult<()> {
        let mut builder = RegistryBuilder::new();
        for ty in &self.types {
            builder.register(ty)?;
        }
        let runner = Runner::with_registry(service, builder)?;

        let sets = self
            .files()
            .into_iter()
            .map(|path| TestSet::from_path(&path).map(|set| (path, set)))
            .collect::<Result<Vec<_>, _>>()?;

        for (path, set) in &sets {
            debug!(path = %path.display(), scenarios = set.len(), "running scenario file");
            runner.run_set(db, set)?;
        }
        Ok(())
    }

    /// Resolve a path relative to the base path.
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }
}

/// The default base directory: the crate being tested, else the current
/// directory.
fn scenarios_root() -> PathBuf {
    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        return PathBuf::from(manifest_dir);
    }
    std::env::current_dir().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_paths() {
        let suite = Suite::new()
            .base_path("/srv/app")
            .file("scenarios/a.yaml")
            .file("/abs/b.json");

        assert_eq!(
            suite.files(),
            vec![
                PathBuf::from("/srv/app/scenarios/a.yaml"),
                PathBuf::from("/abs/b.json")
            ]
        );
    }
}
