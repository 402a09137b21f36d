//! Resolve a directory tree against a [`CheckStateStore`] into a nested
//! keep/delete document.
//!
//! The document mirrors the directory hierarchy. Every directory node has a
//! reserved `"."` key mapping each file name to its relative path and
//! resolved state, and one key per subdirectory holding that subdirectory's
//! node:
//!
//! ```json
//! { "project": {
//!     ".": { "a.txt": { "rel_path": "a.txt", "state": "keep" } },
//!     "sub": { ".": { "b.txt": { "rel_path": "sub/b.txt", "state": "delete" } } }
//! } }
//! ```

use crate::check_state::{CheckState, CheckStateStore};
use crate::dir_list::{DirListError, EntryKind, list_directory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf, StripPrefixError};
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum WalkError {
    #[error("Directory listing error: {0}")]
    DirList(#[from] DirListError),
    #[error("Path error: {0}")]
    StripPrefix(#[from] StripPrefixError),
    #[error("Path contains non-UTF-8 characters: {0}")]
    NonUtf8(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Disposition {
    Keep,
    Delete,
}

impl Disposition {
    pub fn from_check_state(state: CheckState) -> Self {
        match state {
            CheckState::Checked => Disposition::Delete,
            CheckState::Unchecked | CheckState::Inherited => Disposition::Keep,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Disposition::Keep => "keep",
            Disposition::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileRecord {
    pub rel_path: String,
    pub state: Disposition,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirNode {
    #[serde(rename = ".")]
    pub files: BTreeMap<String, FileRecord>,
    #[serde(flatten)]
    pub dirs: BTreeMap<String, DirNode>,
}

impl DirNode {
    fn collect_records<'a>(&'a self, out: &mut Vec<&'a FileRecord>) {
        out.extend(self.files.values());
        for child in self.dirs.values() {
            child.collect_records(out);
        }
    }
}

/// The resolved document. Holds at most one entry: the root directory's
/// name mapped to its node. An empty document means the root was missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatternDocument {
    pub roots: BTreeMap<String, DirNode>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatternCounts {
    pub keep: usize,
    pub delete: usize,
}

impl PatternDocument {
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// All file records, depth first, in document order.
    pub fn records(&self) -> Vec<&FileRecord> {
        let mut records = Vec::new();
        for node in self.roots.values() {
            node.collect_records(&mut records);
        }
        records
    }

    pub fn counts(&self) -> PatternCounts {
        let mut counts = PatternCounts::default();
        for record in self.records() {
            match record.state {
                Disposition::Keep => counts.keep += 1,
                Disposition::Delete => counts.delete += 1,
            }
        }
        counts
    }
}

/// Files whose relative path mentions `REST` are left out of the pattern
/// unless the path also contains a `1`.
pub fn is_included(rel_path: &str) -> bool {
    !rel_path.contains("REST") || rel_path.contains('1')
}

/// Walk `root` and resolve every file against `store`.
///
/// The store is queried with `root.join(<relative path>)`, using `root`
/// exactly as given, so overrides must be keyed the same way.
///
/// A `root` that does not exist or is not a directory yields an empty
/// document rather than an error. Any failure while listing a directory
/// inside the tree aborts the whole walk.
pub fn build_pattern(root: &Path, store: &CheckStateStore) -> Result<PatternDocument, WalkError> {
    if !root.is_dir() {
        warn!("{} is not a directory, nothing to record", root.display());
        return Ok(PatternDocument::default());
    }

    let root_name = root_name(root)?;

    let mut node = DirNode::default();
    walk_directory(root, root, &mut node, store)?;

    let mut document = PatternDocument::default();
    document.roots.insert(root_name, node);
    Ok(document)
}

fn root_name(root: &Path) -> Result<String, WalkError> {
    let canonical = root.canonicalize().map_err(|e| {
        if e.kind() == std::io::ErrorKind::PermissionDenied {
            DirListError::PermissionDenied(root.to_path_buf())
        } else {
            DirListError::Io(e)
        }
    })?;

    Ok(match canonical.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => canonical.display().to_string(),
    })
}

/// Names become JSON keys, so a lossy conversion could merge two distinct
/// files into one record. `full` is only used for the error.
fn path_to_str<'a>(full: &Path, part: &'a Path) -> Result<&'a str, WalkError> {
    part.to_str().ok_or_else(|| WalkError::NonUtf8(full.to_path_buf()))
}

fn walk_directory(
    tree_root: &Path,
    current_dir: &Path,
    node: &mut DirNode,
    store: &CheckStateStore,
) -> Result<(), WalkError> {
    info!("Walking {}", current_dir.display());

    for entry in list_directory(current_dir)? {
        let path = current_dir.join(&entry.name);
        let name = path_to_str(&path, Path::new(&entry.name))?.to_string();

        match entry.kind {
            EntryKind::Dir => {
                let child = node.dirs.entry(name).or_default();
                walk_directory(tree_root, &path, child, store)?;
            }
            EntryKind::File => {
                let rel_path = path_to_str(&path, path.strip_prefix(tree_root)?)?.to_string();

                if !is_included(&rel_path) {
                    debug!("Skipping {}", rel_path);
                    continue;
                }

                let state = Disposition::from_check_state(store.effective_state(&path));
                debug!("Recording {} as {}", rel_path, state.as_str());

                node.files.insert(name, FileRecord { rel_path, state });
            }
        }
    }

    Ok(())
}
