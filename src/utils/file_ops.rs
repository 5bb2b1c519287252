use std::fs;
use std::path::{Path, PathBuf};
use log::debug;
use walkdir::WalkDir;
use crate::{Result, TagCopyError};

/// File operations rooted at one directory, used to assemble the
/// package staging tree.
pub struct FileManager {
    root: PathBuf,
}

impl FileManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn ensure_directory(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::create_dir_all(path.as_ref())?;
        Ok(())
    }

    /// Copy a single file to `relative` under the root, creating parents.
    pub fn copy_file(&self, file_path: impl AsRef<Path>, relative: impl AsRef<Path>) -> Result<PathBuf> {
        let file_path = file_path.as_ref();
        if !file_path.is_file() {
            return Err(TagCopyError::InvalidPath(file_path.to_path_buf()));
        }

        let destination = self.root.join(relative);
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(file_path, &destination)?;
        Ok(destination)
    }

    /// Write `contents` to `relative` under the root. `executable` sets mode 0755.
    pub fn write_file(&self, relative: impl AsRef<Path>, contents: &str, executable: bool) -> Result<PathBuf> {
        let destination = self.root.join(relative);
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&destination, contents)?;
        if executable {
            make_executable(&destination)?;
        }
        Ok(destination)
    }

    /// Recursively copy `source` to `relative` under the root. Symlinks are
    /// recreated, not followed. Returns the number of files copied.
    pub fn copy_tree(&self, source: impl AsRef<Path>, relative: impl AsRef<Path>) -> Result<usize> {
        let source = source.as_ref();
        let target = self.root.join(relative);
        let mut copied = 0;

        for entry in WalkDir::new(source).follow_links(false) {
            let entry = entry?;
            let rel = entry
                .path()
                .strip_prefix(source)
                .map_err(|_| TagCopyError::InvalidPath(entry.path().to_path_buf()))?;
            let destination = target.join(rel);
            let file_type = entry.file_type();

            if file_type.is_dir() {
                fs::create_dir_all(&destination)?;
            } else if file_type.is_symlink() {
                copy_symlink(entry.path(), &destination)?;
                copied += 1;
            } else {
                fs::copy(entry.path(), &destination)?;
                copied += 1;
            }
        }

        debug!("Copied {} files from {} to {}", copied, source.display(), target.display());
        Ok(copied)
    }
}

#[cfg(unix)]
pub fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
pub fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(link: &Path, destination: &Path) -> Result<()> {
    let target = fs::read_link(link)?;
    if destination.symlink_metadata().is_ok() {
        fs::remove_file(destination)?;
    }
    std::os::unix::fs::symlink(target, destination)?;
    Ok(())
}

#[cfg(not(unix))]
fn copy_symlink(link: &Path, destination: &Path) -> Result<()> {
    fs::copy(link, destination)?;
    Ok(())
}
