//! Shared `cover.jpg` written into album folders.
//!
//! The copy happens at most once per folder per run. The first track of an
//! album to reach [`FolderCovers::ensure`] claims the folder; later tracks
//! (including concurrent ones) see the claim and skip the filesystem check.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, ResultExt};
use crate::organizer::FOLDER_COVER_NAME;

/// Per-folder creation tokens for the shared cover file.
#[derive(Default)]
pub struct FolderCovers {
    claimed: Mutex<HashSet<PathBuf>>,
}

impl FolderCovers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy `cached_cover` to `folder/cover.jpg` unless it already exists.
    ///
    /// Returns `true` if this call wrote the file.
    pub fn ensure(&self, folder: &Path, cached_cover: &Path) -> Result<bool> {
        let mut claimed = self.claimed.lock();
        if claimed.contains(folder) {
            return Ok(false);
        }

        let target = folder.join(FOLDER_COVER_NAME);
        let written = if target.exists() {
            tracing::debug!("{:?} already present", target);
            false
        } else {
            fs::copy(cached_cover, &target).with_context(format!("copying cover to {}", target.display()))?;
            tracing::debug!("Wrote {:?}", target);
            true
        };

        claimed.insert(folder.to_path_buf());
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_cover_written_once() {
        let temp = TempDir::new().unwrap();
        let cached = temp.path().join("temp_7.jpg");
        fs::write(&cached, b"cover").unwrap();
        let folder = temp.path().join("Artist - Album (2024)");
        fs::create_dir_all(&folder).unwrap();

        let covers = FolderCovers::new();
        assert!(covers.ensure(&folder, &cached).unwrap());
        assert!(!covers.ensure(&folder, &cached).unwrap());
        assert_eq!(fs::read(folder.join("cover.jpg")).unwrap(), b"cover");
    }

    #[test]
    fn test_existing_cover_is_kept() {
        let temp = TempDir::new().unwrap();
        let cached = temp.path().join("temp_7.jpg");
        fs::write(&cached, b"new").unwrap();
        let folder = temp.path().join("album");
        fs::create_dir_all(&folder).unwrap();
        fs::write(folder.join("cover.jpg"), b"old").unwrap();

        let covers = FolderCovers::new();
        assert!(!covers.ensure(&folder, &cached).unwrap());
        assert_eq!(fs::read(folder.join("cover.jpg")).unwrap(), b"old");
    }

    #[test]
    fn test_failed_copy_does_not_claim() {
        let temp = TempDir::new().unwrap();
        let folder = temp.path().join("album");
        fs::create_dir_all(&folder).unwrap();

        let covers = FolderCovers::new();
        assert!(covers.ensure(&folder, &temp.path().join("missing.jpg")).is_err());

        let cached = temp.path().join("temp_1.jpg");
        fs::write(&cached, b"x").unwrap();
        assert!(covers.ensure(&folder, &cached).unwrap());
    }
}
