//! `.project` and facet file parsing.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{expect_root, parse_xml, read_to_string};
use crate::paths::{append, file_uri_to_path, split_variable};
use crate::{Facet, ImportError, Link};

pub const JAVA_NATURE: &str = "org.eclipse.jdt.core.javanature";
pub const FACETED_NATURE: &str = "org.eclipse.wst.common.project.facet.core.nature";

/// Facet file, relative to the project directory.
pub const FACET_FILE: &str = ".settings/org.eclipse.wst.common.project.facet.core.xml";

/// Built-in link variable naming the project directory.
pub const PROJECT_LOC: &str = "PROJECT_LOC";
/// Built-in link variable naming the parent of the project directory.
pub const PARENT_LOC: &str = "PARENT_LOC";
/// Built-in link variable naming the workspace directory.
pub const WORKSPACE_LOC: &str = "WORKSPACE_LOC";

const LINK_TYPE_FILE: &str = "1";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectDescriptor {
    pub name: String,
    pub natures: Vec<String>,
    pub links: Vec<Link>,
}

pub fn read_project_descriptor(
    path: &Path,
    variables: &BTreeMap<String, PathBuf>,
) -> Result<ProjectDescriptor, ImportError> {
    let text = read_to_string(path)?;
    parse_project_descriptor(&text, path, variables)
}

/// Parses the text of a `.project` file.
///
/// `variables` resolve `locationURI`s of linked resources; see
/// [`resolve_location_uri`].
pub fn parse_project_descriptor(
    text: &str,
    path: &Path,
    variables: &BTreeMap<String, PathBuf>,
) -> Result<ProjectDescriptor, ImportError> {
    let doc = parse_xml(text, path)?;
    let root = expect_root(&doc, "projectDescription", path)?;

    let name = child_text(&root, "name").ok_or_else(|| ImportError::MissingProjectName {
        path: path.to_path_buf(),
    })?;

    let natures = child_element(&root, "natures")
        .map(|natures| {
            natures
                .children()
                .filter(|n| n.is_element() && n.has_tag_name("nature"))
                .filter_map(|n| n.text())
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let links = child_element(&root, "linkedResources")
        .map(|links| {
            links
                .children()
                .filter(|n| n.is_element() && n.has_tag_name("link"))
                .filter_map(|n| parse_link(&n, variables))
                .collect()
        })
        .unwrap_or_default();

    Ok(ProjectDescriptor {
        name,
        natures,
        links,
    })
}

fn parse_link(
    node: &roxmltree::Node<'_, '_>,
    variables: &BTreeMap<String, PathBuf>,
) -> Option<Link> {
    let name = child_text(node, "name")?;
    let is_file = child_text(node, "type").as_deref() == Some(LINK_TYPE_FILE);

    let location = if let Some(location) = child_text(node, "location") {
        PathBuf::from(location)
    } else if let Some(uri) = child_text(node, "locationURI") {
        resolve_location_uri(&uri, variables)
    } else {
        tracing::debug!(link = %name, "linked resource without a location; skipping");
        return None;
    };

    Some(Link {
        name,
        location,
        is_file,
    })
}

/// Resolves a linked-resource `locationURI`.
///
/// Supported forms: `file:` URIs, `VAR/rest` and `PARENT-<n>-VAR/rest`. A
/// variable missing from `variables` leaves the literal URI as the location.
pub fn resolve_location_uri(uri: &str, variables: &BTreeMap<String, PathBuf>) -> PathBuf {
    if uri.starts_with("file:") {
        return file_uri_to_path(uri).unwrap_or_else(|| PathBuf::from(uri));
    }

    let (variable, rest) = split_variable(uri);
    let base = match parse_parent_variable(variable) {
        Some((levels, inner)) => variables
            .get(inner)
            .and_then(|base| base.ancestors().nth(levels)),
        None => variables.get(variable).map(PathBuf::as_path),
    };

    match base {
        Some(base) => append(base, rest),
        None => {
            tracing::debug!(uri, variable, "unresolved link variable; keeping literal location");
            PathBuf::from(uri)
        }
    }
}

/// `PARENT-2-PROJECT_LOC` → `(2, "PROJECT_LOC")`.
fn parse_parent_variable(variable: &str) -> Option<(usize, &str)> {
    let rest = variable.strip_prefix("PARENT-")?;
    let (levels, inner) = rest.split_once('-')?;
    Some((levels.parse().ok()?, inner))
}

pub fn read_facets(path: &Path) -> Result<Vec<Facet>, ImportError> {
    let text = read_to_string(path)?;
    parse_facets(&text, path)
}

/// Parses `faceted-project/installed{facet,version}`.
pub fn parse_facets(text: &str, path: &Path) -> Result<Vec<Facet>, ImportError> {
    let doc = parse_xml(text, path)?;
    let root = expect_root(&doc, "faceted-project", path)?;

    Ok(root
        .children()
        .filter(|n| n.is_element() && n.has_tag_name("installed"))
        .filter_map(|n| {
            Some(Facet {
                name: n.attribute("facet")?.to_string(),
                version: n.attribute("version").unwrap_or_default().to_string(),
            })
        })
        .collect())
}

fn child_element<'a, 'input>(
    node: &roxmltree::Node<'a, 'input>,
    name: &str,
) -> Option<roxmltree::Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

fn child_text(node: &roxmltree::Node<'_, '_>, name: &str) -> Option<String> {
    child_element(node, name)
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
