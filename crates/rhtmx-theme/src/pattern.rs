//! Path pattern expansion for theme lookups
//!
//! A path pattern is a plain path template with `%name%` placeholders, e.g.
//! `%app_path%/themes/%current_theme%/%template%`. Expansion is a pure string
//! substitution: no filesystem access, no validation.
//!
//! Placeholders that have no value in the [`Parameters`] are left in the
//! output verbatim. Such candidates simply never exist on disk, so lookups
//! skip them like any other miss. Placeholders set to an empty string are
//! substituted with nothing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Fixed placeholder vocabulary understood by theme path patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Placeholder {
    AppPath,
    Dir,
    OverridePath,
    CurrentTheme,
    CurrentDevice,
    Template,
    BundlePath,
    BundleName,
}

impl Placeholder {
    pub const ALL: [Placeholder; 8] = [
        Placeholder::AppPath,
        Placeholder::Dir,
        Placeholder::OverridePath,
        Placeholder::CurrentTheme,
        Placeholder::CurrentDevice,
        Placeholder::Template,
        Placeholder::BundlePath,
        Placeholder::BundleName,
    ];

    /// Name without delimiters (`app_path`)
    pub fn name(self) -> &'static str {
        match self {
            Placeholder::AppPath => "app_path",
            Placeholder::Dir => "dir",
            Placeholder::OverridePath => "override_path",
            Placeholder::CurrentTheme => "current_theme",
            Placeholder::CurrentDevice => "current_device",
            Placeholder::Template => "template",
            Placeholder::BundlePath => "bundle_path",
            Placeholder::BundleName => "bundle_name",
        }
    }

    /// Token as written in a pattern (`%app_path%`)
    pub fn token(self) -> String {
        format!("%{}%", self.name())
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}%", self.name())
    }
}

/// Values for the placeholders of a single expansion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    values: BTreeMap<Placeholder, String>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, placeholder: Placeholder, value: impl Into<String>) -> Self {
        self.set(placeholder, value);
        self
    }

    pub fn set(&mut self, placeholder: Placeholder, value: impl Into<String>) {
        self.values.insert(placeholder, value.into());
    }

    pub fn get(&self, placeholder: Placeholder) -> Option<&str> {
        self.values.get(&placeholder).map(String::as_str)
    }

    /// True when the placeholder is set to a non-empty value
    pub fn is_present(&self, placeholder: Placeholder) -> bool {
        self.get(placeholder).is_some_and(|v| !v.is_empty())
    }
}

/// Expands every known `%name%` token of `pattern` (pure function)
///
/// The scan is left to right and never re-scans substituted text, so a value
/// that itself contains `%dir%` is copied as-is.
///
/// # Examples
///
/// ```
/// use rhtmx_theme::pattern::{expand, Parameters, Placeholder};
///
/// let params = Parameters::new()
///     .with(Placeholder::AppPath, "/srv/app")
///     .with(Placeholder::CurrentTheme, "dark");
///
/// assert_eq!(
///     expand("%app_path%/themes/%current_theme%/%template%", &params),
///     "/srv/app/themes/dark/%template%"
/// );
/// ```
pub fn expand(pattern: &str, parameters: &Parameters) -> String {
    let mut output = String::with_capacity(pattern.len());
    let mut rest = pattern;

    while let Some(start) = rest.find('%') {
        output.push_str(&rest[..start]);
        let candidate = &rest[start..];

        match match_token(candidate, parameters) {
            Some((len, value)) => {
                output.push_str(value);
                rest = &candidate[len..];
            }
            None => {
                output.push('%');
                rest = &candidate[1..];
            }
        }
    }

    output.push_str(rest);
    output
}

/// Finds the placeholder token with a value at the start of `input`
fn match_token<'a>(input: &str, parameters: &'a Parameters) -> Option<(usize, &'a str)> {
    let inner = &input[1..];
    let end = inner.find('%')?;
    let placeholder = Placeholder::from_name(&inner[..end])?;
    let value = parameters.get(placeholder)?;
    Some((end + 2, value))
}

/// Ordered pattern lists keyed by purpose
///
/// Built once, never mutated afterwards. Caller-supplied patterns are merged
/// in front of the defaults for each key (see [`PathPatternSet::with_overrides`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathPatternSet {
    pub app_resource: Vec<String>,
    pub bundle_resource: Vec<String>,
    pub bundle_resource_dir: Vec<String>,
}

impl Default for PathPatternSet {
    fn default() -> Self {
        Self {
            app_resource: vec![
                "%app_path%/themes/%current_theme%/%template%".to_string(),
                "%app_path%/views/%template%".to_string(),
            ],
            bundle_resource: vec![
                "%bundle_path%/Resources/themes/%current_theme%/%template%".to_string(),
            ],
            bundle_resource_dir: vec![
                "%dir%/themes/%current_theme%/%bundle_name%/%template%".to_string(),
                "%dir%/%bundle_name%/%override_path%".to_string(),
            ],
        }
    }
}

impl PathPatternSet {
    /// Defaults with `overrides` evaluated first for every key
    ///
    /// Empty override strings are dropped. Nothing is replaced: a default
    /// pattern is still tried after the caller's patterns.
    pub fn with_overrides(
        app_resource: Vec<String>,
        bundle_resource: Vec<String>,
        bundle_resource_dir: Vec<String>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            app_resource: merge(app_resource, defaults.app_resource),
            bundle_resource: merge(bundle_resource, defaults.bundle_resource),
            bundle_resource_dir: merge(bundle_resource_dir, defaults.bundle_resource_dir),
        }
    }

    /// Candidate paths inside a bundle
    ///
    /// `bundle_resource_dir` patterns come first, and only when `%dir%` has a
    /// non-empty value; `bundle_resource` patterns follow.
    pub fn paths_for_bundle(&self, parameters: &Parameters) -> Vec<PathBuf> {
        let dir_patterns: &[String] = if parameters.is_present(Placeholder::Dir) {
            &self.bundle_resource_dir
        } else {
            &[]
        };

        dir_patterns
            .iter()
            .chain(self.bundle_resource.iter())
            .map(|pattern| PathBuf::from(expand(pattern, parameters)))
            .collect()
    }

    /// Candidate paths under the app resource directory
    pub fn paths_for_app_resource(&self, parameters: &Parameters) -> Vec<PathBuf> {
        self.app_resource
            .iter()
            .map(|pattern| PathBuf::from(expand(pattern, parameters)))
            .collect()
    }
}

fn merge(overrides: Vec<String>, defaults: Vec<String>) -> Vec<String> {
    overrides
        .into_iter()
        .filter(|p| !p.is_empty())
        .chain(defaults)
        .collect()
}
