//! Builders for on-disk Eclipse workspaces.

use std::fs;
use std::path::{Path, PathBuf};

use eclipse_project::{location, CLASSPATH_FILE, PROJECT_FILE};
use tempfile::TempDir;

pub const JAVA_NATURE: &str = "org.eclipse.jdt.core.javanature";

pub fn write(path: &Path, contents: impl AsRef<[u8]>) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(path, contents).expect("write fixture");
}

/// A temp dir with an (empty) `.metadata/.plugins`, canonicalized.
pub fn workspace_dir() -> (TempDir, PathBuf) {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(temp.path().join(".metadata/.plugins")).expect("metadata dir");
    let root = fs::canonicalize(temp.path()).expect("canonicalize");
    (temp, root)
}

pub fn dot_project(name: &str, natures: &[&str], linked_resources: &str) -> String {
    let natures: String = natures
        .iter()
        .map(|nature| format!("<nature>{nature}</nature>"))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<projectDescription>
    <name>{name}</name>
    <comment></comment>
    <projects></projects>
    <natures>{natures}</natures>
    <linkedResources>{linked_resources}</linkedResources>
</projectDescription>
"#
    )
}

pub fn dot_classpath(entries: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<classpath>
{entries}
</classpath>
"#
    )
}

/// Writes a Java project with the given classpath entries and creates `src`.
pub fn java_project(dir: &Path, name: &str, classpath_entries: &str) -> PathBuf {
    write(&dir.join(PROJECT_FILE), dot_project(name, &[JAVA_NATURE], ""));
    write(&dir.join(CLASSPATH_FILE), dot_classpath(classpath_entries));
    fs::create_dir_all(dir.join("src")).expect("src dir");
    dir.to_path_buf()
}

/// Writes a workspace preference file from `key=value` lines.
pub fn write_prefs(workspace: &Path, file: &str, lines: &[(&str, &str)]) {
    let mut text = String::from("eclipse.preferences.version=1\n");
    for (key, value) in lines {
        text.push_str(key);
        text.push('=');
        text.push_str(value);
        text.push('\n');
    }
    write(
        &workspace
            .join(".metadata/.plugins/org.eclipse.core.runtime/.settings")
            .join(file),
        text,
    );
}

/// Registers an external project the way Eclipse does, with a `.location` marker.
pub fn register_external(workspace: &Path, name: &str, location: &Path) {
    let uri = format!("URI//file:{}", location.display());
    write_location_marker(workspace, name, &location::encode_location(&uri));
}

pub fn write_location_marker(workspace: &Path, name: &str, bytes: &[u8]) {
    write(
        &workspace
            .join(".metadata/.plugins/org.eclipse.core.resources/.projects")
            .join(name)
            .join(".location"),
        bytes,
    );
}
