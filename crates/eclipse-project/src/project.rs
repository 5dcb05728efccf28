use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::classpath::{jre_container_key, read_classpath, DotClasspath};
use crate::container::ContainerRegistry;
use crate::descriptor::{
    read_facets, read_project_descriptor, ProjectDescriptor, FACETED_NATURE, FACET_FILE,
    JAVA_NATURE, PARENT_LOC, PROJECT_LOC, WORKSPACE_LOC,
};
use crate::paths::split_project;
use crate::resolve::{resolve_project, Resolution};
use crate::{ClasspathEntry, Facet, ImportError, Link, Workspace};

pub const PROJECT_FILE: &str = ".project";
pub const CLASSPATH_FILE: &str = ".classpath";

/// An Eclipse project.
///
/// Created lightweight (name and directory only), filled in by the descriptor
/// and classpath parsers, then updated in place by the resolver.
///
/// Equality and hashing use the name only; ordering is case-insensitive.
#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub name: String,
    pub directory: PathBuf,
    pub natures: Vec<String>,
    pub facets: Vec<Facet>,
    pub links: BTreeMap<String, Link>,
    pub source_roots: Vec<ClasspathEntry>,
    pub classpath: Vec<ClasspathEntry>,
    pub output: Option<ClasspathEntry>,
    pub jre_container: Option<ClasspathEntry>,
    /// Whether a `.classpath` was found.
    pub has_classpath: bool,
    pub import_problems: Vec<String>,
}

impl Project {
    pub fn new(name: impl Into<String>, directory: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            directory: directory.into(),
            natures: Vec::new(),
            facets: Vec::new(),
            links: BTreeMap::new(),
            source_roots: Vec::new(),
            classpath: Vec::new(),
            output: None,
            jre_container: None,
            has_classpath: false,
            import_problems: Vec::new(),
        }
    }

    pub fn is_project_dir(dir: &Path) -> bool {
        dir.join(PROJECT_FILE).is_file()
    }

    /// Reads `.project` (and the facet file when the faceted nature is set).
    ///
    /// `path_variables` are the workspace resource variables; the built-in
    /// `PROJECT_LOC`, `PARENT_LOC` and `WORKSPACE_LOC` are added here.
    pub fn read_descriptor(
        &mut self,
        path_variables: &BTreeMap<String, PathBuf>,
        workspace_dir: Option<&Path>,
    ) -> Result<(), ImportError> {
        let mut variables = path_variables.clone();
        variables.insert(PROJECT_LOC.to_string(), self.directory.clone());
        if let Some(parent) = self.directory.parent() {
            variables.insert(PARENT_LOC.to_string(), parent.to_path_buf());
        }
        if let Some(workspace_dir) = workspace_dir {
            variables.insert(WORKSPACE_LOC.to_string(), workspace_dir.to_path_buf());
        }

        let descriptor = read_project_descriptor(&self.directory.join(PROJECT_FILE), &variables)?;
        self.apply_descriptor(descriptor);

        if self.has_nature(FACETED_NATURE) {
            let facet_file = self.directory.join(FACET_FILE);
            if facet_file.is_file() {
                self.facets = read_facets(&facet_file)?;
            }
        }
        Ok(())
    }

    pub fn apply_descriptor(&mut self, descriptor: ProjectDescriptor) {
        self.name = descriptor.name;
        self.natures = descriptor.natures;
        self.links = descriptor
            .links
            .into_iter()
            .map(|link| (link.name.clone(), link))
            .collect();
    }

    /// Reads `.classpath` if the project has one.
    pub fn read_classpath(&mut self) -> Result<(), ImportError> {
        let path = self.directory.join(CLASSPATH_FILE);
        if !path.is_file() {
            return Ok(());
        }
        let classpath = read_classpath(&path)?;
        self.apply_classpath(classpath);
        Ok(())
    }

    pub fn apply_classpath(&mut self, classpath: DotClasspath) {
        self.has_classpath = true;
        self.source_roots = classpath.source_roots;
        self.output = classpath.output;
        self.jre_container = classpath.jre_container;
        self.classpath = classpath.entries;
    }

    /// Stores the result of [`crate::resolve_project`].
    ///
    /// Problems already recorded are not duplicated, so applying the same
    /// resolution twice leaves the project unchanged.
    pub fn apply_resolution(&mut self, resolution: Resolution) {
        self.source_roots = resolution.source_roots;
        self.output = resolution.output;
        self.classpath = resolution.classpath;
        for problem in resolution.problems {
            if !self.import_problems.contains(&problem) {
                self.import_problems.push(problem);
            }
        }
    }

    /// Resolves this project in place. Without a workspace, variables and
    /// project references stay unresolved and are reported as problems.
    pub fn resolve(
        &mut self,
        workspace: Option<&Workspace>,
        containers: &ContainerRegistry,
        validate_source_roots: bool,
    ) {
        let resolution = resolve_project(self, workspace, containers, validate_source_roots);
        self.apply_resolution(resolution);
    }

    pub fn has_nature(&self, nature: &str) -> bool {
        self.natures.iter().any(|n| n == nature)
    }

    pub fn is_java_project(&self) -> bool {
        self.has_nature(JAVA_NATURE)
    }

    /// Resolved source roots.
    pub fn source_root_paths(&self) -> Vec<&Path> {
        self.source_roots
            .iter()
            .filter_map(ClasspathEntry::resolved_path)
            .collect()
    }

    pub fn output_dir(&self) -> Option<&Path> {
        self.output.as_ref().and_then(ClasspathEntry::resolved_path)
    }

    /// Key of this project's JRE container in the workspace JDK map.
    pub fn jre_container_id(&self) -> Option<&str> {
        self.jre_container
            .as_ref()
            .map(|entry| jre_container_key(&entry.raw_path))
    }

    pub fn jdk_dir<'w>(&self, workspace: &'w Workspace) -> Option<&'w Path> {
        workspace.jdk_dir(self.jre_container_id()?)
    }

    /// Names of the projects referenced by PROJECT entries, in classpath order.
    pub fn dependency_names(&self) -> Vec<&str> {
        self.classpath
            .iter()
            .filter(|entry| entry.is_project())
            .filter_map(|entry| {
                split_project(&entry.raw_path)
                    .map(|(name, _)| name)
                    .or_else(|| Some(entry.raw_path.as_str()).filter(|raw| !raw.is_empty()))
            })
            .collect()
    }

    /// Projects this project directly depends on that exist in `workspace`.
    ///
    /// Computed on every call, so it always reflects the current project set.
    pub fn projects_we_depend_on<'w>(&self, workspace: &'w Workspace) -> Vec<&'w Project> {
        let mut out: Vec<&Project> = Vec::new();
        for name in self.dependency_names() {
            match workspace.project(name) {
                Some(project) if !out.contains(&project) => out.push(project),
                Some(_) => {}
                None => tracing::debug!(
                    project = %self.name,
                    dependency = name,
                    "referenced project is not part of the workspace"
                ),
            }
        }
        out
    }
}

impl PartialEq for Project {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Project {}

impl Hash for Project {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for Project {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Project {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .to_lowercase()
            .cmp(&other.name.to_lowercase())
            .then_with(|| self.name.cmp(&other.name))
    }
}
