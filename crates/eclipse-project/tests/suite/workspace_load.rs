use std::fs;
use std::path::{Path, PathBuf};

use eclipse_config::ResolveConfig;
use eclipse_project::{
    load_project, load_project_with_options, ImportError, LoadOptions, Workspace, PROJECT_FILE,
};
use pretty_assertions::assert_eq;

use super::support::{
    dot_classpath, dot_project, java_project, workspace_dir, write, write_prefs, JAVA_NATURE,
};

const VM_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"#,
    r#"<vmSettings defaultVM="57,org.eclipse.jdt.internal.debug.ui.launcher.StandardVMType13,1700000000000">"#,
    r#"<vmType id="org.eclipse.jdt.internal.debug.ui.launcher.StandardVMType">"#,
    r#"<vm id="1700000000000" name="jdk-17" path="/usr/lib/jvm/jdk17"/>"#,
    r#"<vm id="1700000000001" name="jdk-11" path="/usr/lib/jvm/jdk11"/>"#,
    r#"</vmType></vmSettings>"#,
);

const COMMONS_LIBRARY: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"#,
    r#"<userlibrary systemlibrary="false" version="2">"#,
    r#"<archive path="/opt/commons/io.jar" sourceattachment="/opt/commons/io-src.jar"/>"#,
    r#"<archive path="/opt/commons/lang.jar"/>"#,
    r#"</userlibrary>"#,
);

/// Two Java projects (`app` in `app-dir`, `core`), a broken project, workspace
/// preferences and one launch configuration.
fn sample_workspace(root: &Path) {
    let libs = root.join("libs");
    let shared = root.join("shared");
    fs::create_dir_all(&libs).expect("libs");
    fs::create_dir_all(&shared).expect("shared");

    write_prefs(
        root,
        "org.eclipse.jdt.core.prefs",
        &[
            (
                "org.eclipse.jdt.core.classpathVariable.LIBS",
                &libs.display().to_string(),
            ),
            ("org.eclipse.jdt.core.userLibrary.commons", COMMONS_LIBRARY),
            ("org.eclipse.jdt.core.userLibrary.old", "IGNORED"),
        ],
    );
    write_prefs(
        root,
        "org.eclipse.jdt.launching.prefs",
        &[("org.eclipse.jdt.launching.PREF_VM_XML", VM_XML)],
    );
    write_prefs(
        root,
        "org.eclipse.core.resources.prefs",
        &[("pathvariable.SHARED", &shared.display().to_string())],
    );

    let app = root.join("app-dir");
    write(
        &app.join(PROJECT_FILE),
        dot_project(
            "app",
            &[JAVA_NATURE],
            "<link><name>shared</name><type>2</type><locationURI>SHARED</locationURI></link>",
        ),
    );
    write(
        &app.join(".classpath"),
        dot_classpath(
            r#"<classpathentry kind="src" path="src"/>
<classpathentry kind="src" path="missing"/>
<classpathentry kind="src" path="generated">
    <attributes><attribute name="optional" value="true"/></attributes>
</classpathentry>
<classpathentry combineaccessrules="false" kind="src" path="/core"/>
<classpathentry kind="var" path="LIBS/guava.jar"/>
<classpathentry kind="con" path="org.eclipse.jdt.USER_LIBRARY/commons"/>
<classpathentry kind="lib" path="/app/shared/x.jar"/>
<classpathentry kind="con" path="org.eclipse.jdt.launching.JRE_CONTAINER"/>
<classpathentry kind="output" path="bin"/>"#,
        ),
    );
    fs::create_dir_all(app.join("src")).expect("src");

    java_project(
        &root.join("core"),
        "core",
        r#"<classpathentry kind="src" path="src"/>
<classpathentry kind="con" path="org.eclipse.jdt.launching.JRE_CONTAINER/org.eclipse.jdt.internal.debug.ui.launcher.StandardVMType/jdk-11"/>
<classpathentry kind="output" path="bin"/>"#,
    );

    let broken = root.join("broken");
    write(&broken.join(PROJECT_FILE), dot_project("broken", &[JAVA_NATURE], ""));
    write(&broken.join(".classpath"), "<classpath><classpathentry");

    write(
        &root.join(".metadata/.plugins/org.eclipse.debug.core/.launches/Run App.launch"),
        r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<launchConfiguration type="org.eclipse.jdt.launching.localJavaApplication">
    <stringAttribute key="org.eclipse.jdt.launching.MAIN_TYPE" value="app.Main"/>
    <stringAttribute key="org.eclipse.jdt.launching.PROJECT_ATTR" value="app"/>
</launchConfiguration>"#,
    );
}

#[test]
fn loads_projects_preferences_and_launches() {
    let (_temp, root) = workspace_dir();
    sample_workspace(&root);

    let workspace = Workspace::load(&root).expect("load workspace");

    assert_eq!(workspace.directory, root);
    let names: Vec<_> = workspace.projects().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["app", "core"]);
    assert_eq!(workspace.user_libraries.keys().collect::<Vec<_>>(), vec!["commons"]);
    assert_eq!(
        workspace.path_variables.get("SHARED"),
        Some(&root.join("shared"))
    );

    assert_eq!(workspace.problems.len(), 1, "{:?}", workspace.problems);
    assert!(workspace.problems[0].contains("broken"), "{:?}", workspace.problems);

    assert_eq!(workspace.launch_configurations.len(), 1);
    let launch = &workspace.launch_configurations[0];
    assert_eq!(launch.id, "Run App");
    assert_eq!(launch.project.as_deref(), Some("app"));
    assert_eq!(launch.main_type.as_deref(), Some("app.Main"));
}

#[test]
fn resolves_every_kind_of_classpath_entry() {
    let (_temp, root) = workspace_dir();
    sample_workspace(&root);

    let workspace = Workspace::load(&root).expect("load workspace");
    let app = workspace.project("app").expect("app");

    assert_eq!(app.directory, root.join("app-dir"));
    assert!(app.is_java_project());
    assert_eq!(app.source_root_paths(), vec![root.join("app-dir/src").as_path()]);
    assert_eq!(app.output_dir(), Some(root.join("app-dir/bin").as_path()));

    let resolved: Vec<Option<PathBuf>> = app.classpath.iter().map(|e| e.resolved.clone()).collect();
    assert_eq!(
        resolved,
        vec![
            Some(root.join("core")),
            Some(root.join("libs/guava.jar")),
            Some(PathBuf::from("/opt/commons/io.jar")),
            Some(PathBuf::from("/opt/commons/lang.jar")),
            Some(root.join("shared/x.jar")),
        ]
    );
    assert_eq!(
        app.classpath[2].attachments().and_then(|a| a.resolved_source.clone()),
        Some(PathBuf::from("/opt/commons/io-src.jar"))
    );

    // Only the non-optional missing source root is reported.
    assert_eq!(app.import_problems.len(), 1, "{:?}", app.import_problems);
    assert!(app.import_problems[0].contains("missing"));

    assert_eq!(app.jdk_dir(&workspace), Some(Path::new("/usr/lib/jvm/jdk17")));
    let core = workspace.project("core").expect("core");
    assert_eq!(core.jdk_dir(&workspace), Some(Path::new("/usr/lib/jvm/jdk11")));

    let deps: Vec<_> = app
        .projects_we_depend_on(&workspace)
        .iter()
        .map(|p| p.name.clone())
        .collect();
    assert_eq!(deps, vec!["core"]);

    let json = serde_json::to_value(app).expect("serialize project");
    assert_eq!(json["name"], "app");
    assert_eq!(json["classpath"][0]["kind"]["type"], "project");
    assert_eq!(json["classpath"][1]["kind"]["type"], "variable");
}

#[test]
fn configured_values_override_workspace_preferences() {
    let (_temp, root) = workspace_dir();
    sample_workspace(&root);
    let other_libs = root.join("other-libs");
    fs::create_dir_all(&other_libs).expect("other libs");

    let mut resolve = ResolveConfig {
        validate_source_roots: false,
        ..ResolveConfig::default()
    };
    resolve.variables.insert("LIBS".to_string(), other_libs.clone());
    resolve
        .jdks
        .insert("DEFAULT_JRE_CONTAINER".to_string(), PathBuf::from("/opt/jdk21"));
    let options = LoadOptions {
        resolve,
        ..LoadOptions::default()
    };

    let workspace = Workspace::load_with_options(&root, &options).expect("load workspace");
    let app = workspace.project("app").expect("app");

    assert_eq!(
        app.classpath[1].resolved_path(),
        Some(other_libs.join("guava.jar").as_path())
    );
    assert_eq!(app.jdk_dir(&workspace), Some(Path::new("/opt/jdk21")));
    assert_eq!(app.source_roots.len(), 3);
    assert!(app.import_problems.is_empty(), "{:?}", app.import_problems);
}

#[test]
fn facets_are_read_only_for_faceted_projects() {
    let (_temp, root) = workspace_dir();
    let facets = r#"<?xml version="1.0" encoding="UTF-8"?>
<faceted-project>
  <installed facet="jst.web" version="3.0"/>
  <installed facet="java" version="1.8"/>
</faceted-project>"#;

    let web = root.join("web");
    write(
        &web.join(PROJECT_FILE),
        dot_project(
            "web",
            &[JAVA_NATURE, "org.eclipse.wst.common.project.facet.core.nature"],
            "",
        ),
    );
    write(
        &web.join(".settings/org.eclipse.wst.common.project.facet.core.xml"),
        facets,
    );

    let plain = root.join("plain");
    write(&plain.join(PROJECT_FILE), dot_project("plain", &[JAVA_NATURE], ""));
    write(
        &plain.join(".settings/org.eclipse.wst.common.project.facet.core.xml"),
        facets,
    );

    let workspace = Workspace::load(&root).expect("load workspace");

    let web = workspace.project("web").expect("web");
    let names: Vec<_> = web
        .facets
        .iter()
        .map(|f| (f.name.as_str(), f.version.as_str()))
        .collect();
    assert_eq!(names, vec![("jst.web", "3.0"), ("java", "1.8")]);
    assert!(!web.has_classpath);
    assert!(workspace.project("plain").expect("plain").facets.is_empty());
}

#[test]
fn project_without_name_is_reported_and_skipped() {
    let (_temp, root) = workspace_dir();
    write(
        &root.join("nameless").join(PROJECT_FILE),
        "<projectDescription><natures/></projectDescription>",
    );
    java_project(&root.join("ok"), "ok", "");

    let workspace = Workspace::load(&root).expect("load workspace");

    assert_eq!(workspace.projects().len(), 1);
    assert_eq!(workspace.problems.len(), 1);
    assert!(workspace.problems[0].contains("<name>"), "{:?}", workspace.problems);
}

#[test]
fn load_project_uses_the_enclosing_workspace() {
    let (_temp, root) = workspace_dir();
    sample_workspace(&root);

    let import = load_project(root.join("app-dir")).expect("load project");

    assert_eq!(import.project.name, "app");
    let workspace = import.workspace.expect("enclosing workspace");
    assert_eq!(workspace.directory, root);
    assert_eq!(
        import.project.classpath[1].resolved_path(),
        Some(root.join("libs/guava.jar").as_path())
    );
}

#[test]
fn standalone_project_resolves_without_a_workspace() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = fs::canonicalize(temp.path()).expect("canonicalize").join("solo");
    java_project(
        &dir,
        "solo",
        r#"<classpathentry kind="src" path="src"/>
<classpathentry kind="lib" path="/solo/lib/own.jar"/>
<classpathentry kind="var" path="M2_REPO/junit.jar"/>
<classpathentry kind="output" path="bin"/>"#,
    );

    let options = LoadOptions::default();
    let import = load_project_with_options(&dir, &options).expect("load project");

    assert!(import.workspace.is_none());
    let project = import.project;
    assert_eq!(project.source_root_paths(), vec![dir.join("src").as_path()]);
    assert_eq!(
        project.classpath[0].resolved_path(),
        Some(dir.join("lib/own.jar").as_path())
    );
    assert_eq!(project.classpath[1].resolved, None);
    assert_eq!(project.import_problems.len(), 1, "{:?}", project.import_problems);
    assert!(project.import_problems[0].contains("M2_REPO"));
}

#[test]
fn load_project_rejects_directories_without_a_project() {
    let temp = tempfile::tempdir().expect("tempdir");
    let err = load_project(temp.path()).expect_err("not a project");
    assert!(matches!(err, ImportError::NotAProject { .. }), "{err:?}");
}
