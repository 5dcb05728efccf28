//! Workspace-level preference files under `.metadata/.plugins`.
//!
//! Every file here is optional: a missing file yields empty results.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use eclipse_properties::PropertiesFile;

use crate::classpath::{DEFAULT_JRE_CONTAINER, JRE_CONTAINER};
use crate::error::{expect_root, parse_xml};
use crate::{ImportError, UserLibrary, UserLibraryArchive, Variable};

const SETTINGS_DIR: &str = ".metadata/.plugins/org.eclipse.core.runtime/.settings";
pub const CORE_PREFS: &str = "org.eclipse.jdt.core.prefs";
pub const LAUNCHING_PREFS: &str = "org.eclipse.jdt.launching.prefs";
pub const RESOURCES_PREFS: &str = "org.eclipse.core.resources.prefs";

const CLASSPATH_VARIABLE_PREFIX: &str = "org.eclipse.jdt.core.classpathVariable.";
const USER_LIBRARY_PREFIX: &str = "org.eclipse.jdt.core.userLibrary.";
const PATH_VARIABLE_PREFIX: &str = "pathvariable.";
const VM_XML_KEY: &str = "org.eclipse.jdt.launching.PREF_VM_XML";

/// Value Eclipse stores for user libraries that were removed.
pub const IGNORED_USER_LIBRARY: &str = "IGNORED";

pub fn settings_file(workspace_dir: &Path, name: &str) -> PathBuf {
    workspace_dir.join(SETTINGS_DIR).join(name)
}

/// Reads a `.prefs` file; `Ok(None)` when it does not exist.
pub fn read_preferences(path: &Path) -> Result<Option<PropertiesFile>, ImportError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(eclipse_properties::parse_bytes(&bytes))),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ImportError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorePreferences {
    pub variables: BTreeMap<String, Variable>,
    pub user_libraries: BTreeMap<String, UserLibrary>,
}

/// Extracts classpath variables and user libraries from the JDT core prefs.
pub fn parse_core_preferences(
    prefs: &PropertiesFile,
    path: &Path,
) -> Result<CorePreferences, ImportError> {
    let mut out = CorePreferences::default();

    for (name, location) in prefs.with_prefix(CLASSPATH_VARIABLE_PREFIX) {
        if name.is_empty() || location.trim().is_empty() {
            continue;
        }
        out.variables
            .insert(name.to_string(), Variable::new(name, location.trim()));
    }

    for (name, xml) in prefs.with_prefix(USER_LIBRARY_PREFIX) {
        if name.is_empty() || xml.trim() == IGNORED_USER_LIBRARY {
            continue;
        }
        let library = parse_user_library(name, xml, path)?;
        out.user_libraries.insert(name.to_string(), library);
    }

    Ok(out)
}

/// Parses the `userlibrary` XML Eclipse embeds as a preference value.
pub fn parse_user_library(name: &str, xml: &str, path: &Path) -> Result<UserLibrary, ImportError> {
    let doc = parse_xml(xml, path)?;
    let root = expect_root(&doc, "userlibrary", path)?;

    let archives = root
        .children()
        .filter(|n| n.is_element() && n.has_tag_name("archive"))
        .filter_map(|archive| {
            let path = archive.attribute("path")?.trim();
            if path.is_empty() {
                return None;
            }
            let javadoc = archive
                .descendants()
                .filter(|n| n.is_element() && n.has_tag_name("attribute"))
                .find(|n| n.attribute("name") == Some("javadoc_location"))
                .and_then(|n| n.attribute("value"))
                .or_else(|| archive.attribute("javadoc"))
                .map(str::to_string);
            Some(UserLibraryArchive {
                path: path.to_string(),
                source: archive
                    .attribute("sourceattachment")
                    .filter(|s| !s.trim().is_empty())
                    .map(str::to_string),
                javadoc,
            })
        })
        .collect();

    Ok(UserLibrary {
        name: name.to_string(),
        system: root.attribute("systemlibrary") == Some("true"),
        archives,
    })
}

/// Extracts the JRE container → JDK directory map from the launching prefs.
pub fn parse_launching_preferences(
    prefs: &PropertiesFile,
    path: &Path,
) -> Result<BTreeMap<String, PathBuf>, ImportError> {
    match prefs.get(VM_XML_KEY) {
        Some(xml) if !xml.trim().is_empty() => parse_vm_settings(xml, path),
        _ => Ok(BTreeMap::new()),
    }
}

/// Parses the `vmSettings` XML into container id → JDK home.
///
/// Every VM is registered as `JRE_CONTAINER/<vm type>/<vm name>`; the
/// default VM is additionally registered under [`DEFAULT_JRE_CONTAINER`].
pub fn parse_vm_settings(xml: &str, path: &Path) -> Result<BTreeMap<String, PathBuf>, ImportError> {
    let doc = parse_xml(xml, path)?;
    let root = expect_root(&doc, "vmSettings", path)?;

    let default_vm = root.attribute("defaultVM").and_then(decode_default_vm);
    let mut jdks = BTreeMap::new();

    for vm_type in root
        .children()
        .filter(|n| n.is_element() && n.has_tag_name("vmType"))
    {
        let Some(type_id) = vm_type.attribute("id") else {
            continue;
        };
        for vm in vm_type
            .children()
            .filter(|n| n.is_element() && n.has_tag_name("vm"))
        {
            let (Some(name), Some(home)) = (vm.attribute("name"), vm.attribute("path")) else {
                continue;
            };
            let home = PathBuf::from(home);
            jdks.insert(format!("{JRE_CONTAINER}/{type_id}/{name}"), home.clone());

            let is_default = default_vm.as_ref().is_some_and(|(default_type, default_id)| {
                default_type == type_id && vm.attribute("id") == Some(default_id.as_str())
            });
            if is_default {
                jdks.insert(DEFAULT_JRE_CONTAINER.to_string(), home);
            }
        }
    }

    if default_vm.is_some() && !jdks.contains_key(DEFAULT_JRE_CONTAINER) {
        tracing::debug!(path = %path.display(), "default VM not found among installed VMs");
    }

    Ok(jdks)
}

/// Decodes Eclipse's composite VM id, `<len>,<vm type id><len>,<vm id>`.
///
/// `"57,org.eclipse.jdt.internal.debug.ui.launcher.StandardVMType13,1700000000000"`
/// decodes to the VM type and `"1700000000000"`.
pub fn decode_default_vm(composite: &str) -> Option<(String, String)> {
    fn take_counted(input: &str) -> Option<(&str, &str)> {
        let (len, rest) = input.split_once(',')?;
        let len: usize = len.trim().parse().ok()?;
        Some((rest.get(..len)?, rest.get(len..)?))
    }

    let (type_id, rest) = take_counted(composite)?;
    let (vm_id, _) = take_counted(rest)?;
    Some((type_id.to_string(), vm_id.to_string()))
}

/// Extracts `pathvariable.*` entries from the resources prefs.
pub fn parse_resource_preferences(prefs: &PropertiesFile) -> BTreeMap<String, PathBuf> {
    prefs
        .with_prefix(PATH_VARIABLE_PREFIX)
        .filter(|(name, value)| !name.is_empty() && !value.trim().is_empty())
        .map(|(name, value)| (name.to_string(), PathBuf::from(value.trim())))
        .collect()
}
