//! Importer configuration and logging setup.
//!
//! The configuration is read from `eclipse-import.toml` (or the file named by
//! the `ECLIPSE_IMPORT_CONFIG` environment variable). Every section is
//! optional; a missing file means [`ImportConfig::default`].

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt, TestWriter};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Environment variable that points at an explicit config file.
pub const CONFIG_ENV_VAR: &str = "ECLIPSE_IMPORT_CONFIG";

const DEFAULT_LEVEL: &str = "info";

const CONFIG_FILE_NAMES: [&str; 2] = ["eclipse-import.toml", ".eclipse-import.toml"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub resolve: ResolveConfig,
}

/// Knobs for the path resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolveConfig {
    /// Drop source roots that do not exist on disk (recording an import problem).
    #[serde(default = "default_true")]
    pub validate_source_roots: bool,

    /// Classpath variables added on top of (and overriding) the workspace ones.
    #[serde(default)]
    pub variables: BTreeMap<String, PathBuf>,

    /// Resource path variables used by linked resources.
    #[serde(default)]
    pub path_variables: BTreeMap<String, PathBuf>,

    /// JRE container id → JDK home, merged over the workspace launching prefs.
    #[serde(default)]
    pub jdks: BTreeMap<String, PathBuf>,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            validate_source_roots: true,
            variables: BTreeMap::new(),
            path_variables: BTreeMap::new(),
            jdks: BTreeMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// A level (`info`, `debug`, ...) or a full `EnvFilter` directive string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs in JSON format.
    #[serde(default)]
    pub json: bool,

    /// Mirror logs to stderr.
    #[serde(default = "default_true")]
    pub stderr: bool,

    /// Append logs to the given file path.
    ///
    /// If the file cannot be opened, file logging is disabled while stderr
    /// logging stays active.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    fn default_level() -> String {
        DEFAULT_LEVEL.to_owned()
    }

    /// Filter directives for `level`; bare level names are case-insensitive
    /// and `warning` is accepted for `warn`.
    fn directives(&self) -> String {
        let level = self.level.trim();
        match level.to_ascii_lowercase().as_str() {
            "" => DEFAULT_LEVEL.to_owned(),
            "warning" => "warn".to_owned(),
            name @ ("off" | "error" | "warn" | "info" | "debug" | "trace") => name.to_owned(),
            _ => level.to_owned(),
        }
    }

    /// The effective filter: the configured level merged with `RUST_LOG`.
    ///
    /// Falls back to `RUST_LOG` alone, then to the configured level, then to
    /// `info` when a combination does not parse.
    pub fn env_filter(&self) -> EnvFilter {
        let configured = self.directives();
        let from_env = std::env::var("RUST_LOG")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        let candidates = match from_env {
            Some(env) => vec![format!("{configured},{env}"), env, configured],
            None => vec![configured],
        };
        candidates
            .into_iter()
            .find_map(|directives| EnvFilter::try_new(directives).ok())
            .unwrap_or_else(|| EnvFilter::new(DEFAULT_LEVEL))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
            stderr: true,
            file: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // The `Display` impl embeds a source snippet; keep just the message and span.
        let message = err.message().trim().to_owned();
        match err.span() {
            Some(span) => Self::Toml(format!("{message} (at bytes {}..{})", span.start, span.end)),
            None => Self::Toml(message),
        }
    }
}

impl ImportConfig {
    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::load_from_str(&text)
    }
}

/// Find the config file that applies to `dir`.
pub fn discover_config_path(dir: &Path) -> Option<PathBuf> {
    if let Some(value) = std::env::var_os(CONFIG_ENV_VAR) {
        let candidate = PathBuf::from(value);
        let path = if candidate.is_absolute() {
            candidate
        } else {
            dir.join(candidate)
        };
        return Some(path);
    }

    CONFIG_FILE_NAMES
        .into_iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Load the config that applies to `dir`.
///
/// If no config is present, returns [`ImportConfig::default`] and `None`.
pub fn load_for_dir(dir: &Path) -> Result<(ImportConfig, Option<PathBuf>), ConfigError> {
    let Some(path) = discover_config_path(dir) else {
        return Ok((ImportConfig::default(), None));
    };
    let config = ImportConfig::load_from_path(&path)?;
    Ok((config, Some(path)))
}

static TRACING_INIT: Once = Once::new();

/// Installs the global `tracing` subscriber.
///
/// Safe to call more than once; only the first call has an effect.
pub fn init_tracing(config: &LoggingConfig) {
    TRACING_INIT.call_once(|| {
        let (log_file, open_error) = match &config.file {
            Some(path) => match open_log_file(path) {
                Ok(file) => (Some(file), None),
                Err(err) => (None, Some((path, err))),
            },
            None => (None, None),
        };

        let fmt = tracing_subscriber::fmt::layer()
            .with_writer(log_writer(config.stderr, log_file))
            .with_ansi(false);
        let layer: Box<dyn tracing_subscriber::Layer<_> + Send + Sync> = if config.json {
            fmt.json().boxed()
        } else {
            fmt.boxed()
        };

        let subscriber = tracing_subscriber::registry()
            .with(config.env_filter())
            .with(layer);
        let installed = tracing::subscriber::set_global_default(subscriber).is_ok();
        if let (true, Some((path, err))) = (installed, open_error) {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "failed to open log file; logging to stderr only"
            );
        }
    });
}

fn open_log_file(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Stderr and/or the log file; discards everything when neither is enabled.
fn log_writer(stderr: bool, file: Option<File>) -> BoxMakeWriter {
    let stderr = stderr.then(|| {
        // `TestWriter` keeps `cargo test` output captured in debug builds.
        if cfg!(debug_assertions) {
            BoxMakeWriter::new(TestWriter::with_stderr)
        } else {
            BoxMakeWriter::new(io::stderr)
        }
    });
    let file = file.map(|file| BoxMakeWriter::new(Mutex::new(file)));

    match (stderr, file) {
        (Some(stderr), Some(file)) => BoxMakeWriter::new(stderr.and(file)),
        (Some(writer), None) | (None, Some(writer)) => writer,
        (None, None) => BoxMakeWriter::new(io::sink),
    }
}
