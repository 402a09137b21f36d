//! TOML list of toggles, replayed in order into a [`CheckStateStore`].
//!
//! ```toml
//! [[set]]
//! path = "build"
//! state = "delete"
//!
//! [[set]]
//! path = "build/keep-me.txt"
//! state = "keep"
//! ```

use crate::check_state::{CheckState, CheckStateStore};
use serde::Deserialize;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum SelectionFileError {
    #[error("IO error: {0}")]
    Io(std::io::Error),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Toggle path must not contain '..': {0}")]
    ParentDir(PathBuf),
}

/// One toggle. `path` is relative to the root being picked; `.` is the
/// root itself.
///
/// `..` is rejected: the store compares paths component by component
/// without resolving it, so such a toggle would never match a walked file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Toggle {
    pub path: PathBuf,
    pub state: CheckState,
}

impl std::str::FromStr for Toggle {
    type Err = String;

    /// Parses `PATH=STATE`, splitting on the last `=` so paths may contain
    /// `=` themselves.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, state) = s
            .rsplit_once('=')
            .ok_or_else(|| format!("expected PATH=STATE, got {s:?}"))?;
        if path.is_empty() {
            return Err(format!("missing path in {s:?}"));
        }
        let path = PathBuf::from(path);
        if has_parent_dir(&path) {
            return Err(format!("'..' is not allowed in toggle paths, got {s:?}"));
        }
        let state = state.parse::<CheckState>().map_err(|e| e.to_string())?;
        Ok(Toggle { path, state })
    }
}

fn has_parent_dir(path: &Path) -> bool {
    path.components().any(|c| c == Component::ParentDir)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelectionFile {
    #[serde(default, rename = "set")]
    pub toggles: Vec<Toggle>,
}

impl SelectionFile {
    pub fn from_toml(content: &str) -> Result<Self, SelectionFileError> {
        let selection: SelectionFile = toml::from_str(content)?;

        if let Some(toggle) = selection.toggles.iter().find(|t| has_parent_dir(&t.path)) {
            return Err(SelectionFileError::ParentDir(toggle.path.clone()));
        }

        Ok(selection)
    }

    pub fn load(path: &Path) -> Result<Self, SelectionFileError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::PermissionDenied {
                SelectionFileError::PermissionDenied(path.to_path_buf())
            } else {
                SelectionFileError::Io(e)
            }
        })?;

        Self::from_toml(&content)
    }
}

/// Apply `toggles` to `store` in order, resolving each path against `root`.
pub fn apply_toggles<'a>(
    store: &mut CheckStateStore,
    root: &Path,
    toggles: impl IntoIterator<Item = &'a Toggle>,
) {
    for toggle in toggles {
        store.set(&root.join(&toggle.path), toggle.state);
    }
}
