use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::paths::canonicalize_or_fallback;
use crate::{ImportError, LoadOptions, Workspace};

/// Loaded workspaces keyed by canonical directory.
///
/// Entries live until [`WorkspaceCache::invalidate`] or
/// [`WorkspaceCache::reset`]; nothing is reloaded behind the caller's back.
#[derive(Debug, Default)]
pub struct WorkspaceCache {
    options: LoadOptions,
    workspaces: HashMap<PathBuf, Arc<Workspace>>,
}

impl WorkspaceCache {
    pub fn new(options: LoadOptions) -> Self {
        Self {
            options,
            workspaces: HashMap::new(),
        }
    }

    pub fn get_or_load(&mut self, dir: impl AsRef<Path>) -> Result<Arc<Workspace>, ImportError> {
        let key = canonicalize_or_fallback(dir.as_ref());
        if let Some(workspace) = self.workspaces.get(&key) {
            tracing::trace!(workspace = %key.display(), "workspace cache hit");
            return Ok(Arc::clone(workspace));
        }

        let workspace = Arc::new(Workspace::load_with_options(&key, &self.options)?);
        self.workspaces.insert(key, Arc::clone(&workspace));
        Ok(workspace)
    }

    pub fn get(&self, dir: impl AsRef<Path>) -> Option<Arc<Workspace>> {
        self.workspaces
            .get(&canonicalize_or_fallback(dir.as_ref()))
            .cloned()
    }

    /// Drops the cached workspace for `dir`; returns whether one was cached.
    pub fn invalidate(&mut self, dir: impl AsRef<Path>) -> bool {
        self.workspaces
            .remove(&canonicalize_or_fallback(dir.as_ref()))
            .is_some()
    }

    pub fn reset(&mut self) {
        self.workspaces.clear();
    }

    pub fn len(&self) -> usize {
        self.workspaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workspaces.is_empty()
    }
}
