//! Test helpers writing catalog and visit fixtures to a temporary directory.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

/// Catalog with three attractions spaced one degree apart along the equator.
pub(super) const LINE_CATALOG: &str = r#"{
  "attractions": [
    { "id": "00000000-0000-0000-0000-000000000001", "name": "A", "latitude": 0.0, "longitude": 0.0, "reward_points": 10 },
    { "id": "00000000-0000-0000-0000-000000000002", "name": "B", "latitude": 0.0, "longitude": 1.0, "reward_points": 20 },
    { "id": "00000000-0000-0000-0000-000000000003", "name": "C", "latitude": 0.0, "longitude": 2.0, "reward_points": 30 }
  ]
}"#;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write fixture file");
}

/// Temporary directory holding the CLI input files.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    pub(super) fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.path(name);
        write_utf8(&path, contents.as_bytes());
        path
    }

    pub(super) fn line_catalog(&self) -> Utf8PathBuf {
        self.write("catalog.json", LINE_CATALOG)
    }
}
