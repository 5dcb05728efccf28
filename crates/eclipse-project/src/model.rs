use std::path::{Path, PathBuf};

use serde::Serialize;

/// One `<classpathentry>` of a `.classpath` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClasspathEntry {
    pub kind: EntryKind,
    /// The `path` attribute exactly as written in `.classpath`.
    pub raw_path: String,
    pub exported: bool,
    /// Absolute path computed by the resolver; `None` until resolved or when
    /// resolution failed.
    pub resolved: Option<PathBuf>,
}

impl ClasspathEntry {
    pub fn new(kind: EntryKind, raw_path: impl Into<String>) -> Self {
        Self {
            kind,
            raw_path: raw_path.into(),
            exported: false,
            resolved: None,
        }
    }

    pub fn library(raw_path: impl Into<String>) -> Self {
        Self::new(EntryKind::Library(Attachments::default()), raw_path)
    }

    pub fn resolved_path(&self) -> Option<&Path> {
        self.resolved.as_deref()
    }

    pub fn attachments(&self) -> Option<&Attachments> {
        match &self.kind {
            EntryKind::Library(attachments) | EntryKind::Variable(attachments) => {
                Some(attachments)
            }
            _ => None,
        }
    }

    pub(crate) fn attachments_mut(&mut self) -> Option<&mut Attachments> {
        match &mut self.kind {
            EntryKind::Library(attachments) | EntryKind::Variable(attachments) => {
                Some(attachments)
            }
            _ => None,
        }
    }

    pub fn is_source(&self) -> bool {
        matches!(self.kind, EntryKind::Source(_))
    }

    pub fn is_project(&self) -> bool {
        matches!(self.kind, EntryKind::Project)
    }

    pub fn is_container(&self) -> bool {
        matches!(self.kind, EntryKind::Container)
    }
}

/// Entry kind together with the attributes that are meaningful for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntryKind {
    Source(SourceAttributes),
    Output,
    Library(Attachments),
    Project,
    Variable(Attachments),
    Container,
}

impl EntryKind {
    /// The `kind` attribute value Eclipse uses for this entry.
    pub fn label(&self) -> &'static str {
        match self {
            EntryKind::Source(_) => "src",
            EntryKind::Output => "output",
            EntryKind::Library(_) => "lib",
            EntryKind::Project => "prj",
            EntryKind::Variable(_) => "var",
            EntryKind::Container => "con",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceAttributes {
    /// Per-root output folder (`output` attribute).
    pub output: Option<String>,
    pub including: Option<String>,
    pub excluding: Option<String>,
    /// `optional=true` in the entry's attributes: a missing root is expected.
    pub optional: bool,
}

/// Source and javadoc attachments of a library or variable entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Attachments {
    /// `sourcepath` attribute.
    pub source: Option<String>,
    /// `javadoc_location` attribute.
    pub javadoc: Option<String>,
    pub resolved_source: Option<PathBuf>,
    pub resolved_javadoc: Option<String>,
}

/// An Eclipse linked resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub name: String,
    pub location: PathBuf,
    pub is_file: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Facet {
    pub name: String,
    pub version: String,
}

/// A workspace classpath variable.
///
/// When the configured location is an existing regular file, the variable is
/// stored as its parent directory plus [`Variable::file_name`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variable {
    pub name: String,
    pub location: PathBuf,
    pub file_name: Option<String>,
}

impl Variable {
    pub fn new(name: impl Into<String>, location: impl Into<PathBuf>) -> Self {
        let name = name.into();
        let location = location.into();

        if location.is_file() {
            if let (Some(parent), Some(file_name)) = (location.parent(), location.file_name()) {
                return Self {
                    name,
                    location: parent.to_path_buf(),
                    file_name: Some(file_name.to_string_lossy().into_owned()),
                };
            }
        }

        Self {
            name,
            location,
            file_name: None,
        }
    }

    pub fn is_file_variable(&self) -> bool {
        self.file_name.is_some()
    }

    /// The location entries referencing this variable are resolved against.
    pub fn effective_location(&self) -> PathBuf {
        match &self.file_name {
            Some(file_name) => self.location.join(file_name),
            None => self.location.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserLibrary {
    pub name: String,
    pub system: bool,
    pub archives: Vec<UserLibraryArchive>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserLibraryArchive {
    pub path: String,
    pub source: Option<String>,
    pub javadoc: Option<String>,
}

impl UserLibrary {
    pub fn jars(&self) -> impl Iterator<Item = &str> {
        self.archives.iter().map(|a| a.path.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LaunchConfiguration {
    /// File name of the `.launch` file without extension.
    pub id: String,
    pub launch_type: Option<String>,
    pub project: Option<String>,
    pub main_type: Option<String>,
    pub program_arguments: Option<String>,
    pub vm_arguments: Option<String>,
}
