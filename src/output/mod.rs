//! Document output.
//!
//! # Data Flow
//! ```text
//! App
//!     → encode (JSON, two-space indent, no HTML escaping, trailing newline)
//!     → persist (truncate or create, mode 0644)
//! ```

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::model::types::{GeneratorError, GeneratorResult};

/// Permissions of a newly created document.
pub const FILE_MODE: u32 = 0o644;

/// Encode `value` as indented JSON.
///
/// `<`, `>` and `&` are written verbatim.
pub fn encode<T: Serialize>(value: &T) -> GeneratorResult<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(value)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Write `bytes` to `path`, replacing any existing content.
pub fn persist(path: &Path, bytes: &[u8]) -> GeneratorResult<()> {
    let persistence = |source: std::io::Error| GeneratorError::Persistence {
        path: path.to_path_buf(),
        source,
    };

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(FILE_MODE);
    }

    let mut file = options.open(path).map_err(persistence)?;
    file.write_all(bytes).map_err(persistence)?;
    file.flush().map_err(persistence)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_keeps_html_characters() {
        let bytes = encode(&json!({"a": "<b>&</b>"})).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "{\n  \"a\": \"<b>&</b>\"\n}\n");
    }

    #[test]
    fn test_persist_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        persist(&path, b"first, and longer").unwrap();
        persist(&path, b"second").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"second");
    }

    #[cfg(unix)]
    #[test]
    fn test_persist_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        persist(&path, b"{}").unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0);
    }

    #[test]
    fn test_persist_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.json");
        let err = persist(&path, b"{}").unwrap_err();
        match err {
            GeneratorError::Persistence { path: failed, .. } => assert_eq!(failed, path),
            other => panic!("unexpected error: {}", other),
        }
    }
}
