//! `.classpath` parsing.

use std::path::Path;

use crate::error::{expect_root, parse_xml, read_to_string};
use crate::{Attachments, ClasspathEntry, EntryKind, ImportError, SourceAttributes};

/// Prefix shared by every JRE container path.
pub const JRE_CONTAINER: &str = "org.eclipse.jdt.launching.JRE_CONTAINER";

/// Key under which the workspace's default JDK is registered.
pub const DEFAULT_JRE_CONTAINER: &str = "DEFAULT_JRE_CONTAINER";

const JAVADOC_LOCATION_ATTRIBUTE: &str = "javadoc_location";

/// The entries of one `.classpath`, partitioned by role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DotClasspath {
    pub source_roots: Vec<ClasspathEntry>,
    pub output: Option<ClasspathEntry>,
    pub jre_container: Option<ClasspathEntry>,
    /// Everything else, in document order.
    pub entries: Vec<ClasspathEntry>,
}

pub fn read_classpath(path: &Path) -> Result<DotClasspath, ImportError> {
    let text = read_to_string(path)?;
    parse_classpath(&text, path)
}

/// Parses the text of a `.classpath` file. `path` is only used for errors.
pub fn parse_classpath(text: &str, path: &Path) -> Result<DotClasspath, ImportError> {
    let doc = parse_xml(text, path)?;
    let root = expect_root(&doc, "classpath", path)?;

    let mut classpath = DotClasspath::default();
    for node in root
        .children()
        .filter(|n| n.is_element() && n.has_tag_name("classpathentry"))
    {
        let Some(entry) = parse_entry(&node) else {
            continue;
        };

        match entry.kind {
            EntryKind::Source(_) => classpath.source_roots.push(entry),
            EntryKind::Output => {
                if classpath.output.is_none() {
                    classpath.output = Some(entry);
                } else {
                    tracing::debug!(
                        path = %path.display(),
                        ignored = %entry.raw_path,
                        "duplicate output entry; keeping the first one"
                    );
                }
            }
            EntryKind::Container if is_jre_container(&entry.raw_path) => {
                if classpath.jre_container.is_none() {
                    classpath.jre_container = Some(entry);
                } else {
                    tracing::debug!(
                        path = %path.display(),
                        ignored = %entry.raw_path,
                        "duplicate JRE container; keeping the first one"
                    );
                }
            }
            _ => classpath.entries.push(entry),
        }
    }

    Ok(classpath)
}

pub fn is_jre_container(container_path: &str) -> bool {
    container_path.starts_with(JRE_CONTAINER)
}

/// Maps a JRE container path to the key used in the workspace JDK map.
///
/// The bare container (no VM type / name suffix) means "workspace default".
pub fn jre_container_key(container_path: &str) -> &str {
    let trimmed = container_path.trim_end_matches('/');
    if trimmed == JRE_CONTAINER {
        DEFAULT_JRE_CONTAINER
    } else {
        trimmed
    }
}

fn parse_entry(node: &roxmltree::Node<'_, '_>) -> Option<ClasspathEntry> {
    let kind = node.attribute("kind")?;
    let Some(raw_path) = node.attribute("path").map(str::trim).filter(|p| !p.is_empty()) else {
        tracing::warn!(kind, "classpath entry without a path; skipping");
        return None;
    };

    let attributes = EntryAttributes::parse(node);
    let attachments = || Attachments {
        source: non_empty(node.attribute("sourcepath")),
        javadoc: attributes.javadoc.clone(),
        ..Attachments::default()
    };

    let kind = match kind {
        // Eclipse writes project dependencies as workspace-absolute source entries.
        "src" if raw_path.starts_with('/') => EntryKind::Project,
        "src" => EntryKind::Source(SourceAttributes {
            output: non_empty(node.attribute("output")),
            including: non_empty(node.attribute("including")),
            excluding: non_empty(node.attribute("excluding")),
            optional: attributes.optional,
        }),
        "output" => EntryKind::Output,
        "lib" => EntryKind::Library(attachments()),
        "var" => EntryKind::Variable(attachments()),
        "con" => EntryKind::Container,
        "prj" => EntryKind::Project,
        other => {
            tracing::warn!(kind = other, path = raw_path, "unknown classpath entry kind; skipping");
            return None;
        }
    };

    Some(ClasspathEntry {
        kind,
        raw_path: raw_path.to_string(),
        exported: node.attribute("exported") == Some("true"),
        resolved: None,
    })
}

/// The `<attributes>` child of a classpath entry, reduced to what we use.
#[derive(Default)]
struct EntryAttributes {
    javadoc: Option<String>,
    optional: bool,
}

impl EntryAttributes {
    fn parse(node: &roxmltree::Node<'_, '_>) -> Self {
        let mut out = Self::default();
        let attributes = node
            .children()
            .filter(|n| n.is_element() && n.has_tag_name("attributes"))
            .flat_map(|n| n.children())
            .filter(|n| n.is_element() && n.has_tag_name("attribute"));

        for attribute in attributes {
            match (attribute.attribute("name"), attribute.attribute("value")) {
                (Some(JAVADOC_LOCATION_ATTRIBUTE), value) => out.javadoc = non_empty(value),
                (Some("optional"), Some(value)) => out.optional = value == "true",
                _ => {}
            }
        }
        out
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
