//! # RHTMX Theme
//!
//! Multi-theme support for RHTMX applications.
//!
//! ## Features
//!
//! - **Theme Discovery**: Finds every theme shipped by the app or by a bundle
//! - **Path Patterns**: `%placeholder%` patterns decide where themed resources live
//! - **Asset Installation**: Symlinks or mirrors `<theme>/public` into a web directory
//! - **Resource Lookup**: Resolves templates and assets with theme overrides first
//!
//! ## Example
//!
//! ```no_run
//! use rhtmx_theme::{BundleDescriptor, InstallMethod, Installer, ThemeLocator};
//! use rhtmx_theme::pattern::PathPatternSet;
//! use std::path::Path;
//!
//! let locator = ThemeLocator::new(
//!     Some("app/Resources".into()),
//!     vec![BundleDescriptor::new("AcmeBlogBundle", "src/Acme/BlogBundle")],
//!     PathPatternSet::default(),
//! );
//!
//! let installer = Installer::new(locator);
//! let outcome = installer
//!     .install_assets("dark", Path::new("web/themes"), InstallMethod::HardCopy)
//!     .unwrap();
//! assert!(outcome.is_installed());
//! ```

pub mod active;
pub mod bundle;
pub mod config;
pub mod error;
pub mod filesystem;
pub mod installer;
pub mod locator;
pub mod pattern;
pub mod resolver;

pub use active::{ActiveTheme, DeviceDetection, StaticDevice};
pub use bundle::BundleDescriptor;
pub use config::{PathPatternConfig, ThemeSettings};
pub use error::{Result, ThemeError};
pub use filesystem::{Filesystem, LocalFilesystem};
pub use installer::{InstallMethod, InstallOutcome, Installer, SkipReason, DEFAULT_INSTALL_DIR};
pub use locator::{BundleMatch, ThemeLocator};
pub use pattern::{Parameters, PathPatternSet, Placeholder};
pub use resolver::AssetPathResolver;
