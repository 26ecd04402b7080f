// File: src/config.rs
// Purpose: Theme configuration parsing from the [theme] table of rhtmx.toml

use crate::active::{ActiveTheme, DeviceDetection};
use crate::bundle::BundleDescriptor;
use crate::error::{Result, ThemeError};
use crate::locator::ThemeLocator;
use crate::pattern::PathPatternSet;
use crate::resolver::AssetPathResolver;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Top-level file layout; only the `[theme]` table is read
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    theme: ThemeSettings,
}

/// Theme configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeSettings {
    /// Known themes; discovered from the project when empty
    #[serde(default)]
    pub themes: Vec<String>,

    #[serde(default)]
    pub active_theme: Option<String>,

    /// App resource directory substituted for `%app_path%`
    #[serde(default = "default_app_path")]
    pub app_path: Option<PathBuf>,

    /// Cookie the request layer reads the theme from
    #[serde(default)]
    pub theme_cookie: Option<String>,

    /// Switch to the theme named after the detected device type
    #[serde(default = "default_false")]
    pub autodetect_theme: bool,

    /// Warm template caches for every theme, not only the active one
    #[serde(default = "default_true")]
    pub cache_warming: bool,

    #[serde(default)]
    pub path_patterns: PathPatternConfig,

    /// Bundles in registration order
    #[serde(default)]
    pub bundles: Vec<BundleDescriptor>,
}

/// Caller path patterns, merged in front of the defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathPatternConfig {
    #[serde(default)]
    pub app_resource: Vec<String>,

    #[serde(default)]
    pub bundle_resource: Vec<String>,

    #[serde(default)]
    pub bundle_resource_dir: Vec<String>,
}

// Default values
fn default_app_path() -> Option<PathBuf> {
    Some(PathBuf::from("app/Resources"))
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            themes: Vec::new(),
            active_theme: None,
            app_path: default_app_path(),
            theme_cookie: None,
            autodetect_theme: false,
            cache_warming: true,
            path_patterns: PathPatternConfig::default(),
            bundles: Vec::new(),
        }
    }
}

impl ThemeSettings {
    /// Load the `[theme]` table from a TOML file
    ///
    /// A missing or empty file yields the defaults. Relative app and bundle
    /// paths are taken relative to the file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let mut settings = Self::from_toml(&content).map_err(|source| ThemeError::Config {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(base) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            settings.rebase(base);
        }

        Ok(settings)
    }

    /// Load from the default path (./rhtmx.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("rhtmx.toml")
    }

    /// Parse a whole rhtmx.toml document
    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let file: ConfigFile = toml::from_str(content)?;
        Ok(file.theme)
    }

    /// Resolve relative app and bundle paths against `base`
    pub fn rebase(&mut self, base: &Path) {
        if let Some(app_path) = self.app_path.as_mut() {
            if app_path.is_relative() {
                *app_path = base.join(&*app_path);
            }
        }
        for bundle in &mut self.bundles {
            if bundle.path.is_relative() {
                bundle.path = base.join(&bundle.path);
            }
        }
    }

    /// Defaults merged with the configured path patterns
    pub fn path_pattern_set(&self) -> PathPatternSet {
        PathPatternSet::with_overrides(
            self.path_patterns.app_resource.clone(),
            self.path_patterns.bundle_resource.clone(),
            self.path_patterns.bundle_resource_dir.clone(),
        )
    }

    pub fn locator(&self) -> ThemeLocator {
        ThemeLocator::new(
            self.app_path.clone(),
            self.bundles.clone(),
            self.path_pattern_set(),
        )
    }

    /// Active theme holder; the theme list is discovered when none is configured
    ///
    /// With `autodetect_theme` the device type picks the theme when it names
    /// a known one.
    pub fn active_theme(&self, device_detection: Option<Box<dyn DeviceDetection>>) -> Result<ActiveTheme> {
        let mut active = ActiveTheme::new(
            self.active_theme.as_deref(),
            self.themes.clone(),
            device_detection,
            Some(&self.locator()),
        )?;

        if self.autodetect_theme && active.autodetect() {
            debug!("Autodetected theme {}", active.name().unwrap_or_default());
        }
        Ok(active)
    }

    pub fn resolver(&self, device_detection: Option<Box<dyn DeviceDetection>>) -> Result<AssetPathResolver> {
        Ok(AssetPathResolver::new(
            self.locator(),
            self.active_theme(device_detection)?,
        ))
    }
}
