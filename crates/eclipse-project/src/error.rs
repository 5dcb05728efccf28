use std::path::PathBuf;

/// Structural failures that abort the current parse step.
///
/// Resolution failures (missing variables, unknown projects, unsupported
/// javadoc protocols, ...) are not errors: they end up as strings in the
/// owning project's `import_problems`.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse XML in {path}: {source}")]
    Xml {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },

    #[error("unexpected root element <{found}> in {path} (expected <{expected}>)")]
    UnexpectedRoot {
        path: PathBuf,
        expected: &'static str,
        found: String,
    },

    #[error("project description {path} has no <name>")]
    MissingProjectName { path: PathBuf },

    #[error("unreadable project location marker {path}: {source}")]
    Location {
        path: PathBuf,
        #[source]
        source: crate::location::LocationFormatError,
    },

    #[error("no Eclipse project found at {path}")]
    NotAProject { path: PathBuf },
}

pub(crate) fn read_to_string(path: &std::path::Path) -> Result<String, ImportError> {
    std::fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn parse_xml<'input>(
    text: &'input str,
    path: &std::path::Path,
) -> Result<roxmltree::Document<'input>, ImportError> {
    roxmltree::Document::parse(text).map_err(|source| ImportError::Xml {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn expect_root<'a, 'input>(
    doc: &'a roxmltree::Document<'input>,
    expected: &'static str,
    path: &std::path::Path,
) -> Result<roxmltree::Node<'a, 'input>, ImportError> {
    let root = doc.root_element();
    if root.tag_name().name() == expected {
        Ok(root)
    } else {
        Err(ImportError::UnexpectedRoot {
            path: path.to_path_buf(),
            expected,
            found: root.tag_name().name().to_string(),
        })
    }
}
