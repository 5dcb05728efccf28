//! `*.launch` configuration files.

use std::path::Path;

use crate::error::{parse_xml, read_to_string};
use crate::{ImportError, LaunchConfiguration};

/// Launch configurations directory, relative to the workspace.
pub const LAUNCHES_DIR: &str = ".metadata/.plugins/org.eclipse.debug.core/.launches";

const PROJECT_ATTR: &str = "org.eclipse.jdt.launching.PROJECT_ATTR";
const MAIN_TYPE: &str = "org.eclipse.jdt.launching.MAIN_TYPE";
const PROGRAM_ARGUMENTS: &str = "org.eclipse.jdt.launching.PROGRAM_ARGUMENTS";
const VM_ARGUMENTS: &str = "org.eclipse.jdt.launching.VM_ARGUMENTS";

pub fn parse_launch_configuration(
    id: &str,
    text: &str,
    path: &Path,
) -> Result<LaunchConfiguration, ImportError> {
    let doc = parse_xml(text, path)?;
    let root = doc.root_element();

    let mut config = LaunchConfiguration {
        id: id.to_string(),
        launch_type: root.attribute("type").map(str::to_string),
        ..LaunchConfiguration::default()
    };

    for attr in root
        .children()
        .filter(|n| n.is_element() && n.has_tag_name("stringAttribute"))
    {
        let (Some(key), Some(value)) = (attr.attribute("key"), attr.attribute("value")) else {
            continue;
        };
        let slot = match key {
            PROJECT_ATTR => &mut config.project,
            MAIN_TYPE => &mut config.main_type,
            PROGRAM_ARGUMENTS => &mut config.program_arguments,
            VM_ARGUMENTS => &mut config.vm_arguments,
            _ => continue,
        };
        *slot = Some(value.to_string());
    }

    Ok(config)
}

/// Reads every `*.launch` file in `dir`, sorted by id.
///
/// Files that cannot be parsed are reported in `problems` and skipped.
pub fn read_launch_configurations(
    dir: &Path,
    problems: &mut Vec<String>,
) -> Vec<LaunchConfiguration> {
    if !dir.is_dir() {
        return Vec::new();
    }

    let mut configs = Vec::new();
    for entry in walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "launch") {
            continue;
        }
        let Some(id) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
            continue;
        };

        let parsed =
            read_to_string(path).and_then(|text| parse_launch_configuration(&id, &text, path));
        match parsed {
            Ok(config) => configs.push(config),
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "skipping launch configuration"
                );
                problems.push(err.to_string());
            }
        }
    }

    configs
}
