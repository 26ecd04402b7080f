// File: src/installer.rs
// Purpose: Installs the public assets of a theme into a web directory

use crate::bundle::normalize_bundle_name;
use crate::error::{Result, ThemeError};
use crate::filesystem::{is_vcs_entry, Filesystem, LocalFilesystem};
use crate::locator::ThemeLocator;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Install root used when the caller does not pick one
pub const DEFAULT_INSTALL_DIR: &str = "web/themes";

/// How the public folder of a theme lands in the install root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMethod {
    Symlink,
    HardCopy,
}

impl fmt::Display for InstallMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallMethod::Symlink => write!(f, "symbolic link"),
            InstallMethod::HardCopy => write!(f, "hard copy"),
        }
    }
}

/// Why a theme was not installed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No bundle and no app directory holds the theme
    ThemeNotFound,
    /// The theme exists but has no `public` folder
    NoInstallableAssets { origin: PathBuf },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::ThemeNotFound => write!(f, "theme not found"),
            SkipReason::NoInstallableAssets { origin } => {
                write!(f, "no assets to install ({} is missing)", origin.display())
            }
        }
    }
}

/// Result of a single theme install
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed {
        origin: PathBuf,
        target: PathBuf,
        method: InstallMethod,
    },
    Skipped(SkipReason),
}

impl InstallOutcome {
    pub fn is_installed(&self) -> bool {
        matches!(self, InstallOutcome::Installed { .. })
    }
}

/// Theme asset installer
///
/// Looks a theme up through the [`ThemeLocator`] (bundles first, then the app
/// directory) and links or mirrors its `public` folder:
///
/// - bundle themes go to `<base>/<bundle name, lower-cased, without "bundle">/<theme>`
/// - app themes go to `<base>/<theme>`
///
/// Existing content is overwritten in place; nothing outside the theme's own
/// target directory is removed.
pub struct Installer<F: Filesystem = LocalFilesystem> {
    locator: ThemeLocator,
    filesystem: F,
}

impl Installer<LocalFilesystem> {
    pub fn new(locator: ThemeLocator) -> Self {
        Self::with_filesystem(locator, LocalFilesystem)
    }
}

impl<F: Filesystem> Installer<F> {
    pub fn with_filesystem(locator: ThemeLocator, filesystem: F) -> Self {
        Self {
            locator,
            filesystem,
        }
    }

    pub fn locator(&self) -> &ThemeLocator {
        &self.locator
    }

    /// Install into [`DEFAULT_INSTALL_DIR`]
    pub fn install_assets_default(&self, theme: &str, method: InstallMethod) -> Result<InstallOutcome> {
        self.install_assets(theme, Path::new(DEFAULT_INSTALL_DIR), method)
    }

    /// Install assets for `theme` under `base_path`
    ///
    /// A missing theme or a theme without a `public` folder is reported as
    /// [`InstallOutcome::Skipped`]. An unwritable `base_path` is an error, and
    /// so is a refused symlink ([`ThemeError::SymlinkUnsupported`]), which the
    /// caller may answer by retrying with [`InstallMethod::HardCopy`].
    pub fn install_assets(
        &self,
        theme: &str,
        base_path: &Path,
        method: InstallMethod,
    ) -> Result<InstallOutcome> {
        if self.filesystem.exists(base_path) {
            if !self.filesystem.is_writable(base_path) {
                return Err(ThemeError::TargetNotWritable(base_path.to_path_buf()));
            }
        } else {
            self.filesystem.mkdir(base_path)?;
        }

        let (origin, target) = if let Some(found) = self.locator.locate_theme_in_bundles(theme, None) {
            let bundle_dir = bundle_themes_assets_path(base_path, found.bundle.name());
            if !self.filesystem.is_dir(&bundle_dir) {
                self.filesystem.mkdir(&bundle_dir)?;
            }
            let target = bundle_dir.join(theme);

            info!(
                "Found theme {} in bundle {} installing in {}",
                theme,
                found.bundle.name(),
                target.display()
            );
            (found.path, target)
        } else if let Some(path) = self.locator.locate_theme_in_app(theme) {
            let target = base_path.join(theme);

            info!(
                "Found theme {} in {} installing in {}",
                theme,
                path.display(),
                target.display()
            );
            (path, target)
        } else {
            warn!("Theme {} not found. Skipping.", theme);
            return Ok(InstallOutcome::Skipped(SkipReason::ThemeNotFound));
        };

        // Only the public folder is installed.
        let origin = fs::canonicalize(&origin)?.join("public");
        if !self.filesystem.is_dir(&origin) {
            warn!("No assets to install for theme {}. Skipping.", theme);
            return Ok(InstallOutcome::Skipped(SkipReason::NoInstallableAssets { origin }));
        }

        match method {
            InstallMethod::Symlink => self.filesystem.symlink(&origin, &target)?,
            InstallMethod::HardCopy => self.hard_copy(&origin, &target)?,
        }

        Ok(InstallOutcome::Installed {
            origin,
            target,
            method,
        })
    }

    /// Mirrors `origin` into `target`, leaving VCS metadata behind
    fn hard_copy(&self, origin: &Path, target: &Path) -> Result<()> {
        // A previous symlink install would make the mirror write into the origin.
        if self.filesystem.is_link(target) {
            self.filesystem.remove(target)?;
        }
        self.filesystem.mkdir(target)?;
        self.filesystem.mirror(origin, target, &is_vcs_entry)?;
        Ok(())
    }
}

/// Directory holding the installed themes of a bundle
pub fn bundle_themes_assets_path(base_path: &Path, bundle_name: &str) -> PathBuf {
    base_path.join(normalize_bundle_name(bundle_name))
}
