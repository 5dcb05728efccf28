use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use eclipse_config::ResolveConfig;
use serde::Serialize;
use walkdir::WalkDir;

use crate::container::ContainerRegistry;
use crate::launch::{read_launch_configurations, LAUNCHES_DIR};
use crate::location::read_location_file;
use crate::metadata::{
    parse_core_preferences, parse_launching_preferences, parse_resource_preferences,
    read_preferences, settings_file, CorePreferences, CORE_PREFS, LAUNCHING_PREFS,
    RESOURCES_PREFS,
};
use crate::resolve::resolve_project;
use crate::{ImportError, LaunchConfiguration, LoadOptions, Project, UserLibrary, Variable};

pub const METADATA_DIR: &str = ".metadata";
const PLUGINS_DIR: &str = ".metadata/.plugins";
/// One directory per project; external projects carry a `.location` marker.
const PROJECTS_METADATA_DIR: &str = ".metadata/.plugins/org.eclipse.core.resources/.projects";
const LOCATION_FILE: &str = ".location";

/// An Eclipse workspace: preferences, projects and launch configurations.
///
/// Projects are keyed by name; adding a project with an existing name
/// replaces the old one.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Workspace {
    pub directory: PathBuf,
    pub variables: BTreeMap<String, Variable>,
    pub path_variables: BTreeMap<String, PathBuf>,
    pub user_libraries: BTreeMap<String, UserLibrary>,
    /// JRE container id → JDK home.
    pub jdks: BTreeMap<String, PathBuf>,
    projects: BTreeMap<String, Project>,
    pub launch_configurations: Vec<LaunchConfiguration>,
    /// Workspace-level problems (unreadable markers, broken projects, ...).
    pub problems: Vec<String>,
}

impl Workspace {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..Self::default()
        }
    }

    pub fn is_workspace_dir(dir: &Path) -> bool {
        dir.join(PLUGINS_DIR).is_dir()
    }

    /// Nearest ancestor of `project_dir` that looks like a workspace.
    pub fn find_for_project(project_dir: &Path) -> Option<PathBuf> {
        project_dir
            .ancestors()
            .skip(1)
            .find(|dir| Self::is_workspace_dir(dir))
            .map(Path::to_path_buf)
    }

    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ImportError> {
        Self::load_with_options(dir, &LoadOptions::default())
    }

    /// Reads the workspace metadata, every project and its classpath, then
    /// resolves all projects.
    ///
    /// A project whose `.project` or `.classpath` cannot be parsed is left out
    /// and reported in [`Workspace::problems`]; unreadable preference files
    /// fail the whole load.
    pub fn load_with_options(
        dir: impl AsRef<Path>,
        options: &LoadOptions,
    ) -> Result<Self, ImportError> {
        let dir = dir.as_ref();
        let directory = dunce::canonicalize(dir).map_err(|source| ImportError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut workspace = Workspace::new(directory);
        workspace.read_metadata()?;
        workspace.apply_overrides(&options.resolve);
        workspace.load_projects();

        let launches = workspace.directory.join(LAUNCHES_DIR);
        workspace.launch_configurations =
            read_launch_configurations(&launches, &mut workspace.problems);

        workspace.resolve_all(&options.containers, options.resolve.validate_source_roots);

        tracing::info!(
            workspace = %workspace.directory.display(),
            projects = workspace.projects.len(),
            variables = workspace.variables.len(),
            user_libraries = workspace.user_libraries.len(),
            jdks = workspace.jdks.len(),
            launch_configurations = workspace.launch_configurations.len(),
            problems = workspace.problems.len(),
            "loaded Eclipse workspace"
        );
        Ok(workspace)
    }

    fn read_metadata(&mut self) -> Result<(), ImportError> {
        let core = settings_file(&self.directory, CORE_PREFS);
        if let Some(prefs) = read_preferences(&core)? {
            let CorePreferences {
                variables,
                user_libraries,
            } = parse_core_preferences(&prefs, &core)?;
            self.variables = variables;
            self.user_libraries = user_libraries;
        }

        let launching = settings_file(&self.directory, LAUNCHING_PREFS);
        if let Some(prefs) = read_preferences(&launching)? {
            self.jdks = parse_launching_preferences(&prefs, &launching)?;
        }

        let resources = settings_file(&self.directory, RESOURCES_PREFS);
        if let Some(prefs) = read_preferences(&resources)? {
            self.path_variables = parse_resource_preferences(&prefs);
        }
        Ok(())
    }

    fn apply_overrides(&mut self, config: &ResolveConfig) {
        for (name, location) in &config.variables {
            self.add_variable(Variable::new(name.clone(), location.clone()));
        }
        self.path_variables.extend(
            config
                .path_variables
                .iter()
                .map(|(name, path)| (name.clone(), path.clone())),
        );
        self.jdks.extend(
            config
                .jdks
                .iter()
                .map(|(id, path)| (id.clone(), path.clone())),
        );
    }

    /// Registers every project (descriptor parsed, so names are final) and
    /// reads its classpath. Nothing is resolved yet.
    fn load_projects(&mut self) {
        let mut described = Vec::new();
        for (name, dir) in self.discover_project_dirs() {
            let mut project = Project::new(name, dir);
            match project.read_descriptor(&self.path_variables, Some(&self.directory)) {
                Ok(()) => described.push(project),
                Err(err) => self.report(format!("skipping project: {err}")),
            }
        }

        for mut project in described {
            if let Err(err) = project.read_classpath() {
                self.report(format!("skipping project {}: {err}", project.name));
                continue;
            }
            let directory = project.directory.clone();
            if let Some(previous) = self.add_project(project) {
                tracing::debug!(
                    project = %previous.name,
                    replaced = %previous.directory.display(),
                    by = %directory.display(),
                    "duplicate project name"
                );
            }
        }
    }

    /// Internal project directories first, then external ones from
    /// `.location` markers, each group in file-name order.
    fn discover_project_dirs(&mut self) -> Vec<(String, PathBuf)> {
        let mut found: Vec<(String, PathBuf)> = child_dirs(&self.directory)
            .filter(|(name, path)| name != METADATA_DIR && Project::is_project_dir(path))
            .collect();

        let markers: Vec<_> = child_dirs(&self.directory.join(PROJECTS_METADATA_DIR))
            .map(|(name, path)| (name, path.join(LOCATION_FILE)))
            .filter(|(_, marker)| marker.is_file())
            .collect();

        for (name, marker) in markers {
            let location = match read_location_file(&marker) {
                Ok(location) => location,
                Err(err) => {
                    self.report(err.to_string());
                    continue;
                }
            };
            if !Project::is_project_dir(&location) {
                tracing::debug!(
                    project = %name,
                    location = %location.display(),
                    "external project location has no .project"
                );
                continue;
            }
            if found.iter().any(|(_, dir)| *dir == location) {
                continue;
            }
            found.push((name, location));
        }

        found
    }

    fn report(&mut self, problem: String) {
        tracing::warn!(workspace = %self.directory.display(), "{problem}");
        self.problems.push(problem);
    }

    /// Resolves every project against this workspace.
    pub fn resolve_all(&mut self, containers: &ContainerRegistry, validate_source_roots: bool) {
        let resolutions: Vec<_> = self
            .projects
            .values()
            .map(|project| {
                (
                    project.name.clone(),
                    resolve_project(project, Some(self), containers, validate_source_roots),
                )
            })
            .collect();

        for (name, resolution) in resolutions {
            if let Some(project) = self.projects.get_mut(&name) {
                project.apply_resolution(resolution);
            }
        }
    }

    pub fn add_variable(&mut self, variable: Variable) {
        self.variables.insert(variable.name.clone(), variable);
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    pub fn add_user_library(&mut self, library: UserLibrary) {
        self.user_libraries.insert(library.name.clone(), library);
    }

    pub fn user_library(&self, name: &str) -> Option<&UserLibrary> {
        self.user_libraries.get(name)
    }

    /// Adds `project`, returning the project it replaced.
    pub fn add_project(&mut self, project: Project) -> Option<Project> {
        self.projects.insert(project.name.clone(), project)
    }

    pub fn remove_project(&mut self, name: &str) -> Option<Project> {
        self.projects.remove(name)
    }

    pub fn project(&self, name: &str) -> Option<&Project> {
        self.projects.get(name)
    }

    pub fn project_mut(&mut self, name: &str) -> Option<&mut Project> {
        self.projects.get_mut(name)
    }

    pub fn project_for_directory(&self, dir: &Path) -> Option<&Project> {
        self.projects.values().find(|project| project.directory == dir)
    }

    /// All projects, ordered case-insensitively by name.
    pub fn projects(&self) -> Vec<&Project> {
        let mut projects: Vec<_> = self.projects.values().collect();
        projects.sort();
        projects
    }

    pub fn jdk_dir(&self, container_id: &str) -> Option<&Path> {
        self.jdks.get(container_id).map(PathBuf::as_path)
    }

    /// Number of workspace and project problems.
    pub fn problem_count(&self) -> usize {
        self.problems.len()
            + self
                .projects
                .values()
                .map(|project| project.import_problems.len())
                .sum::<usize>()
    }
}

fn child_dirs(dir: &Path) -> impl Iterator<Item = (String, PathBuf)> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_dir())
        .map(|entry| {
            (
                entry.file_name().to_string_lossy().into_owned(),
                entry.into_path(),
            )
        })
}
