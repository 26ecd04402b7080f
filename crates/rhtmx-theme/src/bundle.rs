use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A host bundle: a named module with its own resource tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleDescriptor {
    pub name: String,
    pub path: PathBuf,
}

impl BundleDescriptor {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory name used for this bundle's installed theme assets
    ///
    /// Lower-cased with a trailing `bundle` suffix removed, so
    /// `AcmeBlogBundle` installs under `acmeblog/`.
    pub fn assets_dir_name(&self) -> String {
        normalize_bundle_name(&self.name)
    }
}

pub fn normalize_bundle_name(name: &str) -> String {
    let lower = name.to_lowercase();
    match lower.strip_suffix("bundle") {
        Some(stripped) => stripped.to_string(),
        None => lower,
    }
}
