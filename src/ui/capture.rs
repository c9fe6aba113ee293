//! Export of the drawing surface as timestamped image files

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::ui::surface::RenderError;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("could not write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Writes captures as `air-art-<epoch-ms>.png` into one directory
#[derive(Debug, Clone)]
pub struct CaptureExporter {
    dir: PathBuf,
}

impl CaptureExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `png` under a name derived from the wall clock
    pub fn export(&self, png: &[u8]) -> Result<PathBuf, CaptureError> {
        self.export_at(png, chrono::Utc::now().timestamp_millis())
    }

    /// Writes `png` under a name derived from `epoch_ms`
    ///
    /// Several captures in the same millisecond get a numeric suffix
    /// instead of overwriting each other.
    pub fn export_at(&self, png: &[u8], epoch_ms: i64) -> Result<PathBuf, CaptureError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| CaptureError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let mut path = self.dir.join(format!("air-art-{epoch_ms}.png"));
        let mut suffix = 1;
        while path.exists() {
            path = self.dir.join(format!("air-art-{epoch_ms}-{suffix}.png"));
            suffix += 1;
        }

        std::fs::write(&path, png).map_err(|source| CaptureError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn names_file_after_timestamp() {
        let dir = tempdir().unwrap();
        let exporter = CaptureExporter::new(dir.path());
        let path = exporter.export_at(b"png", 1_700_000_000_000).unwrap();
        assert!(path.ends_with("air-art-1700000000000.png"));
        assert_eq!(std::fs::read(path).unwrap(), b"png");
    }

    #[test]
    fn same_millisecond_does_not_overwrite() {
        let dir = tempdir().unwrap();
        let exporter = CaptureExporter::new(dir.path());
        let first = exporter.export_at(b"a", 42).unwrap();
        let second = exporter.export_at(b"b", 42).unwrap();
        assert_ne!(first, second);
        assert_eq!(std::fs::read(first).unwrap(), b"a");
    }

    #[test]
    fn unwritable_directory_is_reported() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"").unwrap();

        let exporter = CaptureExporter::new(&blocker);
        assert!(matches!(exporter.export(b"png"), Err(CaptureError::Io { .. })));
    }
}
