//! Eclipse workspace and project import.
//!
//! This crate turns an Eclipse workspace (or a single project folder) into a
//! [`Workspace`] of [`Project`]s:
//! - source roots and output folder
//! - classpath entries with absolute paths (variables, linked resources,
//!   project references and user libraries resolved)
//! - JDK per project, from the workspace JRE definitions
//! - import problems for anything that could not be resolved

mod cache;
pub mod classpath;
pub mod container;
pub mod descriptor;
mod discover;
mod error;
pub mod launch;
pub mod location;
pub mod metadata;
mod model;
pub mod paths;
mod project;
pub mod resolve;
mod workspace;

pub use cache::WorkspaceCache;
pub use container::{ContainerRegistry, ContainerResolver, UserLibraryContainerResolver};
pub use discover::{load_project, load_project_with_options, LoadOptions, ProjectImport};
pub use error::ImportError;
pub use model::*;
pub use project::{Project, CLASSPATH_FILE, PROJECT_FILE};
pub use resolve::{resolve_javadoc_location, resolve_project, Resolution};
pub use workspace::{Workspace, METADATA_DIR};
