use std::path::Path;

use eclipse_config::{ImportConfig, ResolveConfig};
use serde::Serialize;

use crate::container::ContainerRegistry;
use crate::{ImportError, Project, Workspace};

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub resolve: ResolveConfig,

    /// Resolvers for classpath containers other than the JRE container.
    pub containers: ContainerRegistry,
}

impl LoadOptions {
    pub fn from_config(config: &ImportConfig) -> Self {
        Self {
            resolve: config.resolve.clone(),
            containers: ContainerRegistry::default(),
        }
    }
}

/// A single imported project together with the workspace it was resolved in.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectImport {
    pub project: Project,
    /// `None` when the project is not inside a workspace.
    pub workspace: Option<Workspace>,
}

pub fn load_project(dir: impl AsRef<Path>) -> Result<ProjectImport, ImportError> {
    load_project_with_options(dir, &LoadOptions::default())
}

/// Loads the Eclipse project in `dir`.
///
/// When an ancestor directory is a workspace that contains the project, the
/// whole workspace is loaded so variables, user libraries and project
/// references resolve. Otherwise the project is resolved on its own.
pub fn load_project_with_options(
    dir: impl AsRef<Path>,
    options: &LoadOptions,
) -> Result<ProjectImport, ImportError> {
    let dir = dir.as_ref();
    let dir = dunce::canonicalize(dir).map_err(|source| ImportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    if !Project::is_project_dir(&dir) {
        return Err(ImportError::NotAProject { path: dir });
    }

    if let Some(workspace_dir) = Workspace::find_for_project(&dir) {
        let workspace = Workspace::load_with_options(&workspace_dir, options)?;
        if let Some(project) = workspace.project_for_directory(&dir).cloned() {
            return Ok(ProjectImport {
                project,
                workspace: Some(workspace),
            });
        }
        tracing::debug!(
            project = %dir.display(),
            workspace = %workspace_dir.display(),
            "project is not registered in the enclosing workspace; loading it standalone"
        );
    }

    let name = dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut project = Project::new(name, dir);
    project.read_descriptor(&options.resolve.path_variables, None)?;
    project.read_classpath()?;
    project.resolve(
        None,
        &options.containers,
        options.resolve.validate_source_roots,
    );

    tracing::info!(
        project = %project.name,
        problems = project.import_problems.len(),
        "loaded standalone Eclipse project"
    );
    Ok(ProjectImport {
        project,
        workspace: None,
    })
}
