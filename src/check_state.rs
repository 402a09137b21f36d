//! Sparse check-state overrides with ancestor inheritance.
//!
//! Only paths the user explicitly toggled are stored. Every other path takes
//! the state of its nearest ancestor that has an override, or `Unchecked` if
//! there is none. Checking a directory therefore checks everything below it.

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckState {
    #[serde(alias = "keep")]
    Unchecked,
    /// Partially checked. Recorded like any other override, but only
    /// `Checked` marks a file for deletion.
    #[serde(alias = "partial")]
    Inherited,
    #[serde(alias = "delete")]
    Checked,
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown check state: {0} (expected checked, unchecked or inherited)")]
pub struct ParseCheckStateError(String);

impl std::str::FromStr for CheckState {
    type Err = ParseCheckStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "checked" | "delete" => Ok(CheckState::Checked),
            "unchecked" | "keep" => Ok(CheckState::Unchecked),
            "inherited" | "partial" => Ok(CheckState::Inherited),
            _ => Err(ParseCheckStateError(s.to_string())),
        }
    }
}

impl fmt::Display for CheckState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CheckState::Unchecked => "unchecked",
            CheckState::Inherited => "inherited",
            CheckState::Checked => "checked",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckStateStore {
    overrides: HashMap<PathBuf, CheckState>,
}

impl CheckStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an explicit override at `path`.
    ///
    /// Any existing override at `path` or below it is dropped first, since
    /// the new override now decides their effective state.
    pub fn set(&mut self, path: &Path, state: CheckState) {
        let path = normalize(path);
        self.overrides.retain(|existing, _| !existing.starts_with(&path));
        self.overrides.insert(path, state);
    }

    /// Resolve the state that applies to `path`.
    ///
    /// Walks upward from `path` through its parents and returns the first
    /// override found, or `Unchecked` if no ancestor has one.
    pub fn effective_state(&self, path: &Path) -> CheckState {
        let path = normalize(path);
        let mut current = Some(path.as_path());
        while let Some(p) = current {
            if let Some(state) = self.overrides.get(p) {
                return *state;
            }
            current = p.parent();
        }
        CheckState::Unchecked
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    pub fn overrides(&self) -> impl Iterator<Item = (&Path, CheckState)> {
        self.overrides.iter().map(|(p, s)| (p.as_path(), *s))
    }
}

/// Rebuild a path from its components so that `a/./b`, `a/b/` and `a/b`
/// map to the same key.
fn normalize(path: &Path) -> PathBuf {
    path.components().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_store_is_unchecked() {
        let store = CheckStateStore::new();
        assert_eq!(
            store.effective_state(Path::new("root/a.txt")),
            CheckState::Unchecked
        );
        assert_eq!(store.effective_state(Path::new("/")), CheckState::Unchecked);
        assert!(store.is_empty());
    }

    #[test]
    fn test_set_then_get() {
        let mut store = CheckStateStore::new();
        store.set(Path::new("root/sub"), CheckState::Checked);
        assert_eq!(
            store.effective_state(Path::new("root/sub")),
            CheckState::Checked
        );
    }

    #[test]
    fn test_descendants_inherit_from_nearest_override() {
        let mut store = CheckStateStore::new();
        store.set(Path::new("root"), CheckState::Checked);
        store.set(Path::new("root/sub/keep"), CheckState::Unchecked);

        assert_eq!(
            store.effective_state(Path::new("root/a.txt")),
            CheckState::Checked
        );
        assert_eq!(
            store.effective_state(Path::new("root/sub/b.txt")),
            CheckState::Checked
        );
        assert_eq!(
            store.effective_state(Path::new("root/sub/keep/c.txt")),
            CheckState::Unchecked
        );
        assert_eq!(
            store.effective_state(Path::new("other/d.txt")),
            CheckState::Unchecked
        );
    }

    #[test]
    fn test_ancestor_set_prunes_descendant_overrides() {
        let mut store = CheckStateStore::new();
        store.set(Path::new("root/sub/b.txt"), CheckState::Unchecked);
        store.set(Path::new("root/sub/c.txt"), CheckState::Checked);
        store.set(Path::new("root/other"), CheckState::Checked);
        assert_eq!(store.len(), 3);

        store.set(Path::new("root/sub"), CheckState::Checked);

        assert_eq!(store.len(), 2);
        assert_eq!(
            store.effective_state(Path::new("root/sub/b.txt")),
            CheckState::Checked
        );
        assert_eq!(
            store.effective_state(Path::new("root/other")),
            CheckState::Checked
        );
    }

    #[test]
    fn test_prefix_that_is_not_an_ancestor_is_kept() {
        let mut store = CheckStateStore::new();
        store.set(Path::new("root/subdir"), CheckState::Checked);
        store.set(Path::new("root/sub"), CheckState::Unchecked);

        assert_eq!(store.len(), 2);
        assert_eq!(
            store.effective_state(Path::new("root/subdir/x")),
            CheckState::Checked
        );
    }

    #[test]
    fn test_set_same_path_replaces() {
        let mut store = CheckStateStore::new();
        store.set(Path::new("root/a"), CheckState::Checked);
        store.set(Path::new("root/a"), CheckState::Inherited);

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.effective_state(Path::new("root/a")),
            CheckState::Inherited
        );
    }

    #[test]
    fn test_equivalent_spellings_share_a_key() {
        let mut store = CheckStateStore::new();
        store.set(Path::new("root/./sub/"), CheckState::Checked);

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.effective_state(Path::new("root/sub/x")),
            CheckState::Checked
        );
        store.set(Path::new("root/sub"), CheckState::Unchecked);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_parse_check_state() {
        assert_eq!("delete".parse::<CheckState>().unwrap(), CheckState::Checked);
        assert_eq!("keep".parse::<CheckState>().unwrap(), CheckState::Unchecked);
        assert_eq!(
            "partial".parse::<CheckState>().unwrap(),
            CheckState::Inherited
        );
        assert!("maybe".parse::<CheckState>().is_err());
    }

    fn check_state() -> impl Strategy<Value = CheckState> {
        prop_oneof![
            Just(CheckState::Unchecked),
            Just(CheckState::Inherited),
            Just(CheckState::Checked),
        ]
    }

    fn rel_path() -> impl Strategy<Value = PathBuf> {
        prop::collection::vec("[a-c]{1,2}", 1..5).prop_map(|parts| parts.iter().collect())
    }

    proptest! {
        #[test]
        fn prop_set_is_visible(path in rel_path(), state in check_state()) {
            let mut store = CheckStateStore::new();
            store.set(&path, state);
            prop_assert_eq!(store.effective_state(&path), state);
        }

        #[test]
        fn prop_set_is_idempotent(
            earlier in prop::collection::vec((rel_path(), check_state()), 0..8),
            path in rel_path(),
            state in check_state(),
        ) {
            let mut once = CheckStateStore::new();
            for (p, s) in &earlier {
                once.set(p, *s);
            }
            let mut twice = once.clone();

            once.set(&path, state);
            twice.set(&path, state);
            twice.set(&path, state);

            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_ancestor_supersedes_descendant(
            ancestor in rel_path(),
            tail in rel_path(),
            first in check_state(),
            second in check_state(),
        ) {
            let descendant = ancestor.join(&tail);
            let mut store = CheckStateStore::new();
            store.set(&descendant, first);
            store.set(&ancestor, second);
            prop_assert_eq!(store.effective_state(&descendant), second);
        }
    }
}
