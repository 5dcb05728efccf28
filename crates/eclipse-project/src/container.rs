//! Expansion of classpath containers into concrete library entries.
//!
//! Containers are opaque unless a [`ContainerResolver`] claims them. The JRE
//! container is never expanded here; it is looked up through the workspace
//! JDK map instead.

use std::fmt;
use std::sync::Arc;

use crate::{Attachments, ClasspathEntry, EntryKind, Workspace};

/// Prefix of user library containers; the library name follows the `/`.
pub const USER_LIBRARY_CONTAINER: &str = "org.eclipse.jdt.USER_LIBRARY";

pub trait ContainerResolver: Send + Sync {
    /// Whether this resolver handles containers with the given path.
    fn accepts(&self, container_path: &str) -> bool;

    /// Expands the container into (unresolved) library entries.
    ///
    /// `None` means the container is known but cannot be expanded in this
    /// workspace; the caller reports it and keeps the container entry.
    fn expand(
        &self,
        container_path: &str,
        workspace: Option<&Workspace>,
    ) -> Option<Vec<ClasspathEntry>>;
}

/// Expands `org.eclipse.jdt.USER_LIBRARY/<name>` from the workspace's user
/// libraries.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserLibraryContainerResolver;

impl ContainerResolver for UserLibraryContainerResolver {
    fn accepts(&self, container_path: &str) -> bool {
        container_path
            .strip_prefix(USER_LIBRARY_CONTAINER)
            .is_some_and(|rest| rest.starts_with('/'))
    }

    fn expand(
        &self,
        container_path: &str,
        workspace: Option<&Workspace>,
    ) -> Option<Vec<ClasspathEntry>> {
        let name = container_path
            .strip_prefix(USER_LIBRARY_CONTAINER)?
            .trim_matches('/');
        let library = workspace?.user_library(name)?;

        Some(
            library
                .archives
                .iter()
                .map(|archive| {
                    ClasspathEntry::new(
                        EntryKind::Library(Attachments {
                            source: archive.source.clone(),
                            javadoc: archive.javadoc.clone(),
                            ..Attachments::default()
                        }),
                        archive.path.clone(),
                    )
                })
                .collect(),
        )
    }
}

/// The set of container resolvers consulted during resolution.
#[derive(Clone)]
pub struct ContainerRegistry {
    resolvers: Vec<Arc<dyn ContainerResolver>>,
}

impl ContainerRegistry {
    /// A registry that expands nothing.
    pub fn empty() -> Self {
        Self {
            resolvers: Vec::new(),
        }
    }

    pub fn with_resolver(mut self, resolver: impl ContainerResolver + 'static) -> Self {
        self.resolvers.push(Arc::new(resolver));
        self
    }

    /// Expands `container_path` with the first resolver that accepts it.
    pub fn expand(
        &self,
        container_path: &str,
        workspace: Option<&Workspace>,
    ) -> Option<Vec<ClasspathEntry>> {
        self.resolvers
            .iter()
            .find(|resolver| resolver.accepts(container_path))
            .and_then(|resolver| resolver.expand(container_path, workspace))
    }
}

impl Default for ContainerRegistry {
    fn default() -> Self {
        Self::empty().with_resolver(UserLibraryContainerResolver)
    }
}

impl fmt::Debug for ContainerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerRegistry")
            .field("resolvers", &self.resolvers.len())
            .finish()
    }
}
