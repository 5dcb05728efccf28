use std::path::PathBuf;

use eclipse_project::{ClasspathEntry, LaunchConfiguration, Project, Workspace};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct WorkspaceReport {
    pub directory: PathBuf,
    pub projects: Vec<ProjectReport>,
    pub launch_configurations: Vec<LaunchConfiguration>,
    pub problems: Vec<String>,
    pub summary: Summary,
}

#[derive(Debug, Serialize)]
pub struct ProjectReport {
    pub name: String,
    pub directory: PathBuf,
    pub natures: Vec<String>,
    pub source_roots: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub jdk: Option<PathBuf>,
    pub classpath: Vec<EntryReport>,
    pub dependencies: Vec<String>,
    pub problems: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct EntryReport {
    pub kind: &'static str,
    pub path: String,
    pub resolved: Option<PathBuf>,
    pub exported: bool,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub projects: usize,
    pub problems: usize,
}

impl WorkspaceReport {
    pub fn new(workspace: &Workspace) -> Self {
        let projects: Vec<_> = workspace
            .projects()
            .into_iter()
            .map(|project| ProjectReport::new(project, Some(workspace)))
            .collect();
        Self {
            directory: workspace.directory.clone(),
            summary: Summary {
                projects: projects.len(),
                problems: workspace.problem_count(),
            },
            projects,
            launch_configurations: workspace.launch_configurations.clone(),
            problems: workspace.problems.clone(),
        }
    }
}

impl ProjectReport {
    pub fn new(project: &Project, workspace: Option<&Workspace>) -> Self {
        let dependencies = match workspace {
            Some(workspace) => project
                .projects_we_depend_on(workspace)
                .into_iter()
                .map(|dep| dep.name.clone())
                .collect(),
            None => project
                .dependency_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
        };

        Self {
            name: project.name.clone(),
            directory: project.directory.clone(),
            natures: project.natures.clone(),
            source_roots: project
                .source_root_paths()
                .into_iter()
                .map(PathBuf::from)
                .collect(),
            output: project.output_dir().map(PathBuf::from),
            jdk: workspace
                .and_then(|workspace| project.jdk_dir(workspace))
                .map(PathBuf::from),
            classpath: project.classpath.iter().map(EntryReport::new).collect(),
            dependencies,
            problems: project.import_problems.clone(),
        }
    }

    pub fn print(&self) {
        println!("{} ({})", self.name, self.directory.display());
        if !self.natures.is_empty() {
            println!("  natures: {}", self.natures.join(", "));
        }
        for root in &self.source_roots {
            println!("  source: {}", root.display());
        }
        if let Some(output) = &self.output {
            println!("  output: {}", output.display());
        }
        if let Some(jdk) = &self.jdk {
            println!("  jdk: {}", jdk.display());
        }
        for entry in &self.classpath {
            let resolved = entry
                .resolved
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "(unresolved)".to_string());
            println!("  {}: {} -> {resolved}", entry.kind, entry.path);
        }
        if !self.dependencies.is_empty() {
            println!("  depends on: {}", self.dependencies.join(", "));
        }
        for problem in &self.problems {
            println!("  problem: {problem}");
        }
    }
}

impl EntryReport {
    fn new(entry: &ClasspathEntry) -> Self {
        Self {
            kind: entry.kind.label(),
            path: entry.raw_path.clone(),
            resolved: entry.resolved.clone(),
            exported: entry.exported,
        }
    }
}
