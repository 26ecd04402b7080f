//! Error types for theme lookup and installation

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ThemeError>;

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("The active theme \"{name}\" must be in the themes list ({})", .themes.join(","))]
    InvalidTheme { name: String, themes: Vec<String> },

    #[error("Install directory {} is not writable", .0.display())]
    TargetNotWritable(PathBuf),

    #[error(
        "\"{resource}\" resource is hidden by a resource from the \"{bundle}\" derived bundle ({}). Create a \"{}\" file to override the bundle resource.",
        .shadowed.display(),
        .conflicting.display()
    )]
    AmbiguousResource {
        resource: String,
        bundle: String,
        shadowed: PathBuf,
        conflicting: PathBuf,
    },

    #[error("Unable to find file \"{0}\".")]
    ResourceNotFound(String),

    #[error("Cannot link {} to {}: symbolic links are not supported here", .target.display(), .origin.display())]
    SymlinkUnsupported {
        origin: PathBuf,
        target: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("File name \"{0}\" contains invalid characters (..).")]
    InvalidResourceName(String),

    #[error("Resource \"{0}\" is not inside a Resources directory.")]
    NotInResources(String),

    #[error("Failed to parse config file {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

impl ThemeError {
    /// Whether the error only affects a single theme and a batch install may continue.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ThemeError::SymlinkUnsupported { .. })
    }
}
