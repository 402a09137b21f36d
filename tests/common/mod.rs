use assert_cmd::{Command, cargo::cargo_bin_cmd};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn cleanpick_cmd(cwd: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("cleanpick");
    cmd.arg("-C").arg(cwd);
    cmd
}

/// Creates `<tmp>/example/{a.txt, sub/b.txt}`.
pub fn example_tree() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("example");
    fs::create_dir_all(root.join("sub")).unwrap();
    fs::write(root.join("a.txt"), "a").unwrap();
    fs::write(root.join("sub/b.txt"), "b").unwrap();
    temp
}

// Only the pick tests read pattern files back.
#[allow(dead_code)]
pub fn read_json(path: &Path) -> serde_json::Value {
    let content = fs::read_to_string(path).expect("pattern file should exist");
    serde_json::from_str(&content).expect("pattern file should be valid JSON")
}

#[allow(dead_code)]
pub fn rel(parts: &[&str]) -> String {
    parts.iter().collect::<PathBuf>().to_string_lossy().into_owned()
}
