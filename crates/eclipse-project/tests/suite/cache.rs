use std::sync::Arc;

use eclipse_project::WorkspaceCache;

use super::support::{java_project, workspace_dir};

#[test]
fn hands_out_the_same_workspace_until_invalidated() {
    let (_temp, root) = workspace_dir();
    java_project(&root.join("a"), "a", "");

    let mut cache = WorkspaceCache::default();
    let first = cache.get_or_load(&root).expect("load");
    let second = cache.get_or_load(root.join("a/..")).expect("cached");
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);

    java_project(&root.join("b"), "b", "");
    assert_eq!(cache.get(&root).expect("cached").projects().len(), 1);

    assert!(cache.invalidate(&root));
    assert!(!cache.invalidate(&root));
    let reloaded = cache.get_or_load(&root).expect("reload");
    assert!(!Arc::ptr_eq(&first, &reloaded));
    assert_eq!(reloaded.projects().len(), 2);
}

#[test]
fn reset_forgets_every_workspace() {
    let (_temp_a, root_a) = workspace_dir();
    let (_temp_b, root_b) = workspace_dir();

    let mut cache = WorkspaceCache::default();
    cache.get_or_load(&root_a).expect("load a");
    cache.get_or_load(&root_b).expect("load b");
    assert_eq!(cache.len(), 2);

    cache.reset();
    assert!(cache.is_empty());
    assert!(cache.get(&root_a).is_none());
}

#[test]
fn failed_loads_are_not_cached() {
    let temp = tempfile::tempdir().expect("tempdir");
    let missing = temp.path().join("does-not-exist");

    let mut cache = WorkspaceCache::default();
    assert!(cache.get_or_load(&missing).is_err());
    assert!(cache.is_empty());
}
