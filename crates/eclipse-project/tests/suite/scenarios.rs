use std::path::{Path, PathBuf};

use eclipse_project::classpath::parse_classpath;
use eclipse_project::{
    resolve_javadoc_location, resolve_project, ContainerRegistry, Project, Variable, Workspace,
};
use pretty_assertions::assert_eq;

use super::support::dot_classpath;

fn project_with_classpath(name: &str, dir: &str, entries: &str) -> Project {
    let classpath = parse_classpath(&dot_classpath(entries), Path::new(".classpath"))
        .expect("parse .classpath");
    let mut project = Project::new(name, dir);
    project.apply_classpath(classpath);
    project
}

#[test]
fn source_and_output_resolve_against_the_project_directory() {
    let mut project = project_with_classpath(
        "proj",
        "/home/u/proj",
        r#"<classpathentry kind="src" path="src"/>
<classpathentry kind="output" path="bin"/>"#,
    );

    project.resolve(None, &ContainerRegistry::default(), false);

    assert_eq!(project.source_root_paths(), vec![Path::new("/home/u/proj/src")]);
    assert_eq!(project.output_dir(), Some(Path::new("/home/u/proj/bin")));
    assert!(project.import_problems.is_empty(), "{:?}", project.import_problems);
}

#[test]
fn variable_entry_resolves_through_the_workspace_variable() {
    let mut workspace = Workspace::new("/w");
    workspace.add_variable(Variable::new("JUNIT_HOME", "/opt/junit"));
    workspace.add_project(project_with_classpath(
        "proj",
        "/w/proj",
        r#"<classpathentry kind="var" path="JUNIT_HOME/junit.jar"/>"#,
    ));

    workspace.resolve_all(&ContainerRegistry::default(), false);

    let project = workspace.project("proj").expect("project");
    assert_eq!(
        project.classpath[0].resolved_path(),
        Some(Path::new("/opt/junit/junit.jar"))
    );
}

#[test]
fn javadoc_jar_location_keeps_the_inner_entry() {
    let mut problems = Vec::new();
    assert_eq!(
        resolve_javadoc_location("jar:file:/opt/doc.zip!/api/", None, &mut problems, false),
        Some("/opt/doc.zip/api/".to_string())
    );
    assert!(problems.is_empty(), "{problems:?}");
}

#[test]
fn bare_jre_container_uses_the_default_jdk() {
    let mut workspace = Workspace::new("/w");
    workspace.jdks.insert(
        "DEFAULT_JRE_CONTAINER".to_string(),
        PathBuf::from("/usr/lib/jvm/jdk17"),
    );
    let project = project_with_classpath(
        "proj",
        "/w/proj",
        r#"<classpathentry kind="con" path="org.eclipse.jdt.launching.JRE_CONTAINER"/>"#,
    );

    assert_eq!(
        project.jdk_dir(&workspace),
        Some(Path::new("/usr/lib/jvm/jdk17"))
    );
    assert!(project.classpath.is_empty(), "JRE container is kept apart");
}

#[test]
fn named_jre_container_uses_its_own_jdk() {
    let mut workspace = Workspace::new("/w");
    workspace.jdks.insert(
        "org.eclipse.jdt.launching.JRE_CONTAINER/org.eclipse.jdt.internal.debug.ui.launcher.StandardVMType/jdk-11".to_string(),
        PathBuf::from("/usr/lib/jvm/jdk11"),
    );
    let project = project_with_classpath(
        "proj",
        "/w/proj",
        r#"<classpathentry kind="con" path="org.eclipse.jdt.launching.JRE_CONTAINER/org.eclipse.jdt.internal.debug.ui.launcher.StandardVMType/jdk-11"/>"#,
    );

    assert_eq!(
        project.jdk_dir(&workspace),
        Some(Path::new("/usr/lib/jvm/jdk11"))
    );
}

#[test]
fn removing_a_dependency_keeps_the_recorded_edge() {
    let mut workspace = Workspace::new("/w");
    workspace.add_project(project_with_classpath(
        "A",
        "/w/A",
        r#"<classpathentry combineaccessrules="false" kind="src" path="/B"/>"#,
    ));
    workspace.add_project(Project::new("B", "/w/B"));
    workspace.resolve_all(&ContainerRegistry::default(), false);

    let a = workspace.project("A").expect("A").clone();
    let deps: Vec<_> = a
        .projects_we_depend_on(&workspace)
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(deps, vec!["B"]);
    assert_eq!(a.classpath[0].resolved_path(), Some(Path::new("/w/B")));

    workspace.remove_project("B");

    let a = workspace.project("A").expect("A");
    assert_eq!(a.dependency_names(), vec!["B"]);
    assert_eq!(a.classpath[0].resolved_path(), Some(Path::new("/w/B")));
    assert!(a.projects_we_depend_on(&workspace).is_empty());
}

#[test]
fn dependency_cycles_are_accepted() {
    let mut workspace = Workspace::new("/w");
    workspace.add_project(project_with_classpath(
        "A",
        "/w/A",
        r#"<classpathentry kind="src" path="/B"/>"#,
    ));
    workspace.add_project(project_with_classpath(
        "B",
        "/w/B",
        r#"<classpathentry kind="src" path="/A"/>"#,
    ));
    workspace.resolve_all(&ContainerRegistry::default(), false);

    let a = workspace.project("A").expect("A");
    let b = workspace.project("B").expect("B");
    assert_eq!(a.projects_we_depend_on(&workspace), vec![b]);
    assert_eq!(b.projects_we_depend_on(&workspace), vec![a]);
}

#[test]
fn resolving_twice_gives_the_same_result() {
    let mut workspace = Workspace::new("/w");
    workspace.add_variable(Variable::new("LIBS", "/opt/libs"));
    let project = project_with_classpath(
        "proj",
        "/w/proj",
        r#"<classpathentry kind="src" path="src"/>
<classpathentry kind="var" path="LIBS/a.jar" sourcepath="LIBS/a-src.jar"/>
<classpathentry kind="var" path="MISSING/b.jar"/>
<classpathentry kind="lib" path="lib/c.jar">
    <attributes>
        <attribute name="javadoc_location" value="http://example.com/api"/>
    </attributes>
</classpathentry>
<classpathentry kind="output" path="bin"/>"#,
    );
    workspace.add_project(project.clone());

    let containers = ContainerRegistry::default();
    let first = resolve_project(&project, Some(&workspace), &containers, false);

    let mut resolved = project.clone();
    resolved.apply_resolution(first.clone());
    let second = resolve_project(&resolved, Some(&workspace), &containers, false);

    assert_eq!(first, second);
    assert_eq!(first.problems.len(), 2, "{:?}", first.problems);

    resolved.apply_resolution(second);
    assert_eq!(resolved.import_problems.len(), 2);
}
