use crate::pattern::PatternDocument;
use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

const PATTERN_EXTENSION: &str = ".json";

#[derive(Debug, thiserror::Error)]
pub enum PatternFileError {
    #[error("IO error: {0}")]
    Io(std::io::Error),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PatternFileError {
    fn from_io(e: std::io::Error, path: &Path) -> Self {
        if e.kind() == std::io::ErrorKind::PermissionDenied {
            PatternFileError::PermissionDenied(path.to_path_buf())
        } else {
            PatternFileError::Io(e)
        }
    }
}

/// Result of [`write`]. The cause of a failure is deliberately not carried;
/// callers only learn whether the pattern file exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Created(PathBuf),
    Failed,
}

/// Append `.json` to `path` unless it already ends with it.
pub fn with_json_extension(path: &Path) -> PathBuf {
    if path.to_string_lossy().ends_with(PATTERN_EXTENSION) {
        return path.to_path_buf();
    }
    let mut s = OsString::from(path.as_os_str());
    s.push(PATTERN_EXTENSION);
    PathBuf::from(s)
}

/// Serialize with 4-space indentation.
pub fn to_json(document: &PatternDocument) -> Result<String, PatternFileError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    document.serialize(&mut serializer)?;
    buf.push(b'\n');
    String::from_utf8(buf)
        .map_err(|e| PatternFileError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Write `document` to `destination` (with `.json` appended if missing).
///
/// Every failure collapses into [`WriteOutcome::Failed`]; the detail is only
/// logged at debug level.
pub fn write(document: &PatternDocument, destination: &Path) -> WriteOutcome {
    let path = with_json_extension(destination);
    match save(document, &path) {
        Ok(()) => WriteOutcome::Created(path),
        Err(e) => {
            debug!("Writing {} failed: {}", path.display(), e);
            WriteOutcome::Failed
        }
    }
}

/// Save a pattern document to `path` atomically.
///
/// Writes to a temporary file next to `path`, fsyncs it, then renames it into
/// place. On failure the temporary file is removed and `path` is untouched.
pub fn save(document: &PatternDocument, path: &Path) -> Result<(), PatternFileError> {
    use std::io::Write;

    let content = to_json(document)?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut temp_file = tempfile::NamedTempFile::new_in(parent)
        .map_err(|e| PatternFileError::from_io(e, parent))?;

    temp_file
        .write_all(content.as_bytes())
        .map_err(|e| PatternFileError::from_io(e, path))?;

    temp_file
        .as_file()
        .sync_all()
        .map_err(PatternFileError::Io)?;

    temp_file
        .persist(path)
        .map_err(|e| PatternFileError::from_io(e.error, path))?;

    Ok(())
}

pub fn load(path: &Path) -> Result<PatternDocument, PatternFileError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| PatternFileError::from_io(e, path))?;
    Ok(serde_json::from_str(&content)?)
}
