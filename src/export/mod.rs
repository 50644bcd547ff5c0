//! Style export ("download").
//!
//! Writes the current style as `<id>.json` into the export directory,
//! pretty-printed with 4-space indentation. An existing file with the same
//! name is replaced.

pub mod sanitize;

use crate::style::{StyleDocument, StyleError};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Media type of exported style files.
pub const EXPORT_MEDIA_TYPE: &str = "application/json;charset=utf-8";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not serialize style: {0}")]
    Serialize(#[from] StyleError),
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Path the style would be exported to inside `dir`.
pub fn export_path(dir: &Path, style: &StyleDocument) -> PathBuf {
    dir.join(sanitize::style_file_name(&style.id))
}

/// Write `style` into `dir` and return the file's path.
pub fn write_style_file(dir: &Path, style: &StyleDocument) -> Result<PathBuf, ExportError> {
    let json = style.to_pretty_json()?;
    let path = export_path(dir, style);

    std::fs::create_dir_all(dir).map_err(|source| ExportError::Write {
        path: dir.to_path_buf(),
        source,
    })?;
    std::fs::write(&path, json.as_bytes()).map_err(|source| ExportError::Write {
        path: path.clone(),
        source,
    })?;

    tracing::info!(
        path = %path.display(),
        media_type = EXPORT_MEDIA_TYPE,
        "exported style"
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::default_style;

    #[test]
    fn export_is_named_after_the_style_id_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let style = default_style();

        let path = write_style_file(dir.path(), &style).unwrap();
        assert_eq!(path.file_name().unwrap(), "basic.json");

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed, serde_json::to_value(&style).unwrap());
        assert!(contents.contains("\n    \"layers\": ["));
    }

    #[test]
    fn export_overwrites_previous_download() {
        let dir = tempfile::tempdir().unwrap();
        let style = StyleDocument::empty();
        write_style_file(dir.path(), &style).unwrap();

        let renamed = StyleDocument {
            name: Some("Renamed".into()),
            ..style.clone()
        };
        let path = write_style_file(dir.path(), &renamed).unwrap();

        let reread = crate::style::load_style_file(&path).unwrap();
        assert_eq!(reread, renamed);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn export_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("exports").join("today");
        let path = write_style_file(&nested, &StyleDocument::empty()).unwrap();
        assert!(path.starts_with(&nested));
        assert!(path.exists());
    }
}
