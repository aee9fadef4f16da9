use crate::error::{AnalyzeError, Result};
use serde::Serialize;
use std::fs;
use std::path::{Component, Path};

/// Invalid UTF-8 (e.g. Latin-1 sources) is replaced rather than rejected.
pub fn read_to_string(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|err| AnalyzeError::io(path, err))?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    })
}

pub fn normalize_rel_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    Some(normalize_path(rel))
}

pub fn normalize_path(path: &Path) -> String {
    let mut parts = Vec::new();
    for comp in path.components() {
        match comp {
            Component::Normal(os) => parts.push(os.to_string_lossy().to_string()),
            Component::ParentDir => parts.push("..".to_string()),
            Component::CurDir => {}
            _ => {}
        }
    }
    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

pub fn slice_bytes(content: &str, start: usize, end: usize) -> Option<&str> {
    if end < start || start > content.len() {
        return None;
    }
    content.get(start..end.min(content.len()))
}

pub fn line_span(text: &str) -> usize {
    text.lines().count().max(1)
}

pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if parent.as_os_str().is_empty() {
            return Ok(());
        }
        fs::create_dir_all(parent).map_err(|err| AnalyzeError::io(parent, err))?;
    }
    Ok(())
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path)?;
    let body = serde_json::to_string_pretty(value)?;
    fs::write(path, body).map_err(|err| AnalyzeError::io(path, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn normalizes_relative_paths_with_forward_slashes() {
        let root = PathBuf::from("/repo");
        let path = root.join("src").join("main").join("Foo.java");
        assert_eq!(
            normalize_rel_path(&root, &path).as_deref(),
            Some("src/main/Foo.java")
        );
        assert_eq!(normalize_rel_path(&root, Path::new("/elsewhere/Foo.java")), None);
    }

    #[test]
    fn slice_bytes_clamps_and_rejects() {
        let text = "class Foo {}";
        assert_eq!(slice_bytes(text, 6, 9), Some("Foo"));
        assert_eq!(slice_bytes(text, 6, 400), Some("Foo {}"));
        assert_eq!(slice_bytes(text, 9, 6), None);
        assert_eq!(slice_bytes(text, 40, 50), None);
    }

    #[test]
    fn read_replaces_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Old.java");
        fs::write(&path, b"// caf\xE9\nclass Old {}").unwrap();
        let text = read_to_string(&path).unwrap();
        assert_eq!(text, "// caf\u{FFFD}\nclass Old {}");
        assert!(read_to_string(&dir.path().join("missing.java")).is_err());
    }

    #[test]
    fn line_span_is_at_least_one() {
        assert_eq!(line_span(""), 1);
        assert_eq!(line_span("{\n  return 1;\n}"), 3);
    }
}
