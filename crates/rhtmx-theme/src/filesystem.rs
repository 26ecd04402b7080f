//! Filesystem operations used by the asset installer

use crate::error::{Result, ThemeError};
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Version-control metadata names never copied by a mirror
pub const VCS_NAMES: &[&str] = &[
    ".git",
    ".svn",
    ".hg",
    ".bzr",
    "_darcs",
    "CVS",
    ".arch-params",
    ".monotone",
];

/// Returns true for version-control metadata entries
pub fn is_vcs_entry(path: &Path) -> bool {
    path.file_name()
        .and_then(OsStr::to_str)
        .is_some_and(|name| VCS_NAMES.contains(&name))
}

/// Trait for the filesystem the installer mutates
pub trait Filesystem {
    fn exists(&self, path: &Path) -> bool;

    /// True for directories and links to directories
    fn is_dir(&self, path: &Path) -> bool;

    /// True when `path` itself is a symbolic link
    fn is_link(&self, path: &Path) -> bool;

    /// True when the current process can create entries inside `dir`
    fn is_writable(&self, dir: &Path) -> bool;

    /// Create a directory and its parents
    fn mkdir(&self, path: &Path) -> Result<()>;

    /// Remove a file, a link or a whole directory tree
    fn remove(&self, path: &Path) -> Result<()>;

    /// Make `target` a symbolic link to `origin`, replacing whatever is at `target`
    ///
    /// Fails with [`ThemeError::SymlinkUnsupported`] when the platform refuses
    /// to create links.
    fn symlink(&self, origin: &Path, target: &Path) -> Result<()>;

    /// Copy the tree under `origin` into `target`, skipping entries for which
    /// `exclude` returns true. Returns the number of files copied.
    fn mirror(&self, origin: &Path, target: &Path, exclude: &dyn Fn(&Path) -> bool) -> Result<u64>;
}

/// Filesystem backed by `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists() || path.is_symlink()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_link(&self, path: &Path) -> bool {
        path.is_symlink()
    }

    /// Permission bits alone miss ownership and read-only mounts, so an
    /// anonymous temp file is created and dropped inside `dir`.
    fn is_writable(&self, dir: &Path) -> bool {
        match fs::metadata(dir) {
            Ok(meta) if !meta.permissions().readonly() => match tempfile::tempfile_in(dir) {
                Ok(_) => true,
                Err(e) => {
                    debug!("{} is not writable: {}", dir.display(), e);
                    false
                }
            },
            _ => false,
        }
    }

    fn mkdir(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        Ok(())
    }

    fn remove(&self, path: &Path) -> Result<()> {
        let meta = match fs::symlink_metadata(path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        if meta.is_dir() {
            fs::remove_dir_all(path)?;
        } else {
            remove_link_or_file(path)?;
        }
        Ok(())
    }

    fn symlink(&self, origin: &Path, target: &Path) -> Result<()> {
        if target.is_symlink() {
            if fs::read_link(target)? == origin {
                return Ok(());
            }
            remove_link_or_file(target)?;
        } else if target.exists() {
            self.remove(target)?;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        create_dir_link(origin, target).map_err(|source| {
            if is_unsupported(&source) {
                ThemeError::SymlinkUnsupported {
                    origin: origin.to_path_buf(),
                    target: target.to_path_buf(),
                    source,
                }
            } else {
                ThemeError::Io(source)
            }
        })
    }

    fn mirror(&self, origin: &Path, target: &Path, exclude: &dyn Fn(&Path) -> bool) -> Result<u64> {
        fs::create_dir_all(target)?;
        let mut copied = 0;

        let walker = WalkDir::new(origin)
            .min_depth(1)
            .into_iter()
            .filter_entry(|e| !exclude(e.path()));

        for entry in walker {
            let entry = entry?;
            let path = entry.path();
            let relative = path.strip_prefix(origin).unwrap_or(path);
            let dest = target.join(relative);

            if entry.file_type().is_dir() {
                if dest.is_symlink() {
                    remove_link_or_file(&dest)?;
                }
                fs::create_dir_all(&dest)?;
            } else if entry.file_type().is_symlink() {
                copy_link(path, &dest)?;
                copied += 1;
            } else {
                if dest.is_symlink() {
                    remove_link_or_file(&dest)?;
                }
                fs::copy(path, &dest)?;
                copied += 1;
            }
        }

        debug!("Mirrored {} file(s) from {} to {}", copied, origin.display(), target.display());
        Ok(copied)
    }
}

/// Windows `ERROR_PRIVILEGE_NOT_HELD`, returned without the symlink privilege
const ERROR_PRIVILEGE_NOT_HELD: i32 = 1314;

/// Errors meaning the platform refuses links, as opposed to a bad target
fn is_unsupported(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::Unsupported
        || (cfg!(windows) && err.raw_os_error() == Some(ERROR_PRIVILEGE_NOT_HELD))
}

#[cfg(unix)]
fn create_dir_link(origin: &Path, target: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(origin, target)
}

#[cfg(windows)]
fn create_dir_link(origin: &Path, target: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(origin, target)
}

#[cfg(not(any(unix, windows)))]
fn create_dir_link(_origin: &Path, _target: &Path) -> io::Result<()> {
    Err(io::Error::from(io::ErrorKind::Unsupported))
}

/// Removes a file or a link, including directory links on Windows
fn remove_link_or_file(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        #[cfg(windows)]
        Err(_) if path.is_dir() => fs::remove_dir(path),
        Err(e) => Err(e),
    }
}

/// Recreates a link found in a mirrored tree
#[cfg(unix)]
fn copy_link(path: &Path, dest: &Path) -> io::Result<()> {
    if dest.is_symlink() || dest.is_file() {
        remove_link_or_file(dest)?;
    }
    std::os::unix::fs::symlink(fs::read_link(path)?, dest)
}

/// Copies the link target where links cannot be recreated
#[cfg(not(unix))]
fn copy_link(path: &Path, dest: &Path) -> io::Result<()> {
    if dest.is_symlink() || dest.is_file() {
        remove_link_or_file(dest)?;
    }
    fs::copy(path, dest).map(|_| ())
}
