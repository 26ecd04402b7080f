// File: src/active.rs
// Purpose: Holds the currently active theme and the detected device type

use crate::error::{Result, ThemeError};
use crate::locator::ThemeLocator;
use std::fmt;

/// Detects the device type of the current client (`phone`, `tablet`, ...)
pub trait DeviceDetection: Send + Sync {
    fn device_type(&self) -> String;
}

/// Device detection that always reports the same type
#[derive(Debug, Clone, Default)]
pub struct StaticDevice(pub String);

impl StaticDevice {
    pub fn new(device_type: impl Into<String>) -> Self {
        Self(device_type.into())
    }
}

impl DeviceDetection for StaticDevice {
    fn device_type(&self) -> String {
        self.0.clone()
    }
}

/// Currently active theme, validated against the list of known themes
pub struct ActiveTheme {
    name: Option<String>,
    themes: Vec<String>,
    device_detection: Option<Box<dyn DeviceDetection>>,
}

impl ActiveTheme {
    /// Create the active theme holder
    ///
    /// When `themes` is empty and a locator is given, the list is discovered
    /// from the project. A given `name` must be part of the list.
    pub fn new(
        name: Option<&str>,
        themes: Vec<String>,
        device_detection: Option<Box<dyn DeviceDetection>>,
        locator: Option<&ThemeLocator>,
    ) -> Result<Self> {
        let themes = match locator {
            Some(locator) if themes.is_empty() => locator.discover_themes()?.into_iter().collect(),
            _ => themes,
        };

        let mut active = Self {
            name: None,
            themes,
            device_detection,
        };

        if let Some(name) = name.filter(|n| !n.is_empty()) {
            active.set_name(name)?;
        }

        Ok(active)
    }

    pub fn themes(&self) -> &[String] {
        &self.themes
    }

    pub fn set_themes(&mut self, themes: Vec<String>) {
        self.themes = themes;
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Switch the active theme
    pub fn set_name(&mut self, name: &str) -> Result<()> {
        if !self.themes.iter().any(|t| t == name) {
            return Err(ThemeError::InvalidTheme {
                name: name.to_string(),
                themes: self.themes.clone(),
            });
        }

        self.name = Some(name.to_string());
        Ok(())
    }

    /// Switch to the theme named after the detected device type
    ///
    /// Does nothing without device detection or when the device type is not
    /// a known theme. Returns true when the active theme changed.
    pub fn autodetect(&mut self) -> bool {
        let device_type = self.device_type();
        if device_type.is_empty() || self.name() == Some(device_type.as_str()) {
            return false;
        }
        if !self.themes.contains(&device_type) {
            return false;
        }

        self.name = Some(device_type);
        true
    }

    pub fn device_detection(&self) -> Option<&dyn DeviceDetection> {
        self.device_detection.as_deref()
    }

    /// Detected device type, empty without device detection
    pub fn device_type(&self) -> String {
        self.device_detection
            .as_ref()
            .map(|d| d.device_type())
            .unwrap_or_default()
    }
}

impl fmt::Debug for ActiveTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveTheme")
            .field("name", &self.name)
            .field("themes", &self.themes)
            .field("device_type", &self.device_type())
            .finish()
    }
}
