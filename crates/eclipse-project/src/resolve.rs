//! Resolution of raw classpath paths into absolute filesystem paths.
//!
//! Resolution never fails: anything that cannot be resolved is left `None`
//! and described in the returned [`Resolution::problems`].

use std::path::PathBuf;

use crate::container::ContainerRegistry;
use crate::paths::{
    append, file_uri_to_path, is_absolute_path, split_project, split_variable, uri_scheme,
};
use crate::{ClasspathEntry, EntryKind, Project, Workspace};

const PLATFORM_RESOURCE: &str = "platform:/resource";

/// The resolved view of one project, applied with [`Project::apply_resolution`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub source_roots: Vec<ClasspathEntry>,
    pub output: Option<ClasspathEntry>,
    pub classpath: Vec<ClasspathEntry>,
    pub problems: Vec<String>,
}

/// Resolves every entry of `project` against `workspace`.
///
/// Containers accepted by `containers` are replaced in place by the entries
/// they expand to. With `validate_source_roots`, source roots missing on
/// disk are dropped (with a problem unless the root is marked optional).
pub fn resolve_project(
    project: &Project,
    workspace: Option<&Workspace>,
    containers: &ContainerRegistry,
    validate_source_roots: bool,
) -> Resolution {
    let resolver = Resolver { project, workspace };
    let mut problems = Vec::new();

    let mut source_roots = Vec::with_capacity(project.source_roots.len());
    for entry in &project.source_roots {
        let entry = resolver.resolve_entry(entry.clone(), &mut problems);
        if validate_source_roots {
            if let Some(missing) = entry.resolved_path().filter(|path| !path.is_dir()) {
                let optional = matches!(&entry.kind, EntryKind::Source(attrs) if attrs.optional);
                if !optional {
                    problems.push(format!(
                        "source root {} of project {} does not exist: {}",
                        entry.raw_path,
                        project.name,
                        missing.display()
                    ));
                }
                continue;
            }
        }
        source_roots.push(entry);
    }

    let output = project
        .output
        .clone()
        .map(|entry| resolver.resolve_entry(entry, &mut problems));

    let mut classpath = Vec::with_capacity(project.classpath.len());
    for entry in &project.classpath {
        if !entry.is_container() {
            classpath.push(resolver.resolve_entry(entry.clone(), &mut problems));
            continue;
        }

        match containers.expand(&entry.raw_path, workspace) {
            Some(expanded) => {
                tracing::debug!(
                    project = %project.name,
                    container = %entry.raw_path,
                    entries = expanded.len(),
                    "expanded classpath container"
                );
                classpath.extend(
                    expanded
                        .into_iter()
                        .map(|entry| resolver.resolve_entry(entry, &mut problems)),
                );
            }
            None => {
                problems.push(format!(
                    "classpath container {} of project {} could not be resolved",
                    entry.raw_path, project.name
                ));
                classpath.push(entry.clone());
            }
        }
    }

    for problem in &problems {
        tracing::warn!(project = %project.name, "{problem}");
    }

    Resolution {
        source_roots,
        output,
        classpath,
        problems,
    }
}

struct Resolver<'a> {
    project: &'a Project,
    workspace: Option<&'a Workspace>,
}

impl Resolver<'_> {
    fn resolve_entry(
        &self,
        mut entry: ClasspathEntry,
        problems: &mut Vec<String>,
    ) -> ClasspathEntry {
        entry.resolved = match &entry.kind {
            EntryKind::Source(_) | EntryKind::Output | EntryKind::Library(_) => {
                Some(self.resolve_path(&entry.raw_path))
            }
            EntryKind::Variable(_) => self.resolve_variable(&entry.raw_path, problems),
            EntryKind::Project => self.resolve_project_reference(&entry.raw_path, problems),
            EntryKind::Container => None,
        };

        let variable_entry = matches!(entry.kind, EntryKind::Variable(_));
        if let Some(attachments) = entry.attachments_mut() {
            attachments.resolved_source = attachments
                .source
                .as_deref()
                .and_then(|raw| self.resolve_source_attachment(raw, variable_entry, problems));
            attachments.resolved_javadoc = attachments
                .javadoc
                .as_deref()
                .and_then(|raw| resolve_javadoc_location(raw, self.workspace, problems, false));
        }

        entry
    }

    /// `/project/rest` through the workspace (or this project), absolute
    /// paths as-is, anything else relative to this project.
    fn resolve_path(&self, raw: &str) -> PathBuf {
        if let Some((name, rest)) = split_project(raw) {
            if let Some(project) = self.lookup_project(name) {
                return resolve_in_project(project, rest);
            }
        }
        if is_absolute_path(raw) {
            return PathBuf::from(raw);
        }
        resolve_in_project(self.project, raw)
    }

    fn lookup_project(&self, name: &str) -> Option<&Project> {
        if name == self.project.name {
            return Some(self.project);
        }
        self.workspace?.project(name)
    }

    fn resolve_variable(&self, raw: &str, problems: &mut Vec<String>) -> Option<PathBuf> {
        let (name, rest) = split_variable(raw);
        match self.workspace.and_then(|workspace| workspace.variable(name)) {
            Some(variable) => Some(append(&variable.effective_location(), rest)),
            None => {
                problems.push(format!(
                    "classpath variable {name} used by {raw} in project {} is not defined",
                    self.project.name
                ));
                None
            }
        }
    }

    fn resolve_project_reference(&self, raw: &str, problems: &mut Vec<String>) -> Option<PathBuf> {
        let name = split_project(raw).map_or(raw, |(name, _)| name);
        match self.workspace.and_then(|workspace| workspace.project(name)) {
            Some(project) => Some(project.directory.clone()),
            None => {
                problems.push(format!(
                    "project {} depends on project {name}, which is not part of the workspace",
                    self.project.name
                ));
                None
            }
        }
    }

    fn resolve_source_attachment(
        &self,
        raw: &str,
        variable_entry: bool,
        problems: &mut Vec<String>,
    ) -> Option<PathBuf> {
        if uri_scheme(raw) == Some("file") {
            return file_uri_to_path(raw);
        }
        if variable_entry && !raw.starts_with('/') && !is_absolute_path(raw) {
            return self.resolve_variable(raw, problems);
        }
        Some(self.resolve_path(raw))
    }
}

/// Resolves a project-relative path, honouring the project's linked resources.
///
/// When several links match, the longest link name wins.
pub fn resolve_in_project(project: &Project, relative: &str) -> PathBuf {
    let relative = relative.trim_start_matches(['/', '\\']);
    let link = project
        .links
        .values()
        .filter(|link| {
            relative == link.name
                || relative
                    .strip_prefix(link.name.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        })
        .max_by_key(|link| link.name.len());

    match link {
        Some(link) => append(&link.location, &relative[link.name.len()..]),
        None => append(&project.directory, relative),
    }
}

/// Resolves a `javadoc_location` attribute.
///
/// - `platform:/resource/<project>/<path>` goes through the workspace project
///   and its links;
/// - `jar:<archive>!/<entry>` resolves `<archive>` as a path and reattaches
///   `/<entry>`;
/// - `file:` URLs are returned unchanged, or as a filesystem path when
///   `as_path` is set;
/// - paths without a scheme are returned unchanged;
/// - any other protocol is reported in `problems` and yields `None`.
pub fn resolve_javadoc_location(
    location: &str,
    workspace: Option<&Workspace>,
    problems: &mut Vec<String>,
    as_path: bool,
) -> Option<String> {
    let location = location.trim();
    match uri_scheme(location) {
        Some("platform") => {
            let project_path = location
                .strip_prefix(PLATFORM_RESOURCE)
                .and_then(split_project);
            let Some((name, rest)) = project_path else {
                problems.push(format!("unsupported platform URL in javadoc location {location}"));
                return None;
            };
            match workspace.and_then(|workspace| workspace.project(name)) {
                Some(project) => Some(path_string(resolve_in_project(project, rest))),
                None => {
                    problems.push(format!(
                        "javadoc location {location} references project {name}, which is not part of the workspace"
                    ));
                    None
                }
            }
        }
        Some("jar") => {
            let inner = &location["jar:".len()..];
            let (archive, entry) = match inner.split_once("!/") {
                Some((archive, entry)) => (archive, Some(entry)),
                None => (inner.trim_end_matches('!'), None),
            };
            let archive = resolve_javadoc_location(archive, workspace, problems, true)?;
            Some(match entry {
                Some(entry) => format!("{}/{entry}", archive.trim_end_matches('/')),
                None => archive,
            })
        }
        Some("file") if as_path => match file_uri_to_path(location) {
            Some(path) => Some(path_string(path)),
            None => {
                problems.push(format!("malformed file URL in javadoc location {location}"));
                None
            }
        },
        Some("file") => Some(location.to_string()),
        Some(other) => {
            problems.push(format!(
                "unsupported protocol {other}: in javadoc location {location}"
            ));
            None
        }
        None => Some(location.to_string()),
    }
}

fn path_string(path: PathBuf) -> String {
    path.to_string_lossy().into_owned()
}
