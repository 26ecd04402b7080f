// File: src/locator.rs
// Purpose: Finds themes shipped by the app and by bundles

use crate::bundle::BundleDescriptor;
use crate::error::Result;
use crate::pattern::{Parameters, PathPatternSet, Placeholder};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Everything up to and including the last `/themes/` segment
static THEMES_ROOT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.*/themes/).*$").unwrap());

/// A theme directory found inside a bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleMatch {
    pub path: PathBuf,
    pub bundle: BundleDescriptor,
}

/// Theme locator
///
/// Expands the configured path patterns against the app directory and every
/// registered bundle. Bundles are searched in registration order; within a
/// bundle `bundle_resource_dir` patterns (when a dir is given) come before
/// `bundle_resource` patterns, each list in declaration order.
#[derive(Debug, Clone)]
pub struct ThemeLocator {
    app_path: Option<PathBuf>,
    bundles: Vec<BundleDescriptor>,
    patterns: PathPatternSet,
}

impl ThemeLocator {
    pub fn new(
        app_path: Option<PathBuf>,
        bundles: Vec<BundleDescriptor>,
        patterns: PathPatternSet,
    ) -> Self {
        Self {
            app_path,
            bundles,
            patterns,
        }
    }

    pub fn app_path(&self) -> Option<&Path> {
        self.app_path.as_deref()
    }

    pub fn bundles(&self) -> &[BundleDescriptor] {
        &self.bundles
    }

    pub fn patterns(&self) -> &PathPatternSet {
        &self.patterns
    }

    /// Value substituted for `%app_path%` (empty when unset)
    pub(crate) fn app_path_value(&self) -> String {
        self.app_path
            .as_deref()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Lists every theme available in the project
    ///
    /// Expands all patterns with an empty theme, keeps the candidates that
    /// exist and contain a `/themes/` segment, cuts them back to that themes
    /// root and collects the names of its immediate subdirectories. A project
    /// without any themes root yields an empty set.
    pub fn discover_themes(&self) -> Result<BTreeSet<String>> {
        let bundle_params = Parameters::new()
            .with(Placeholder::AppPath, self.app_path_value())
            .with(Placeholder::Dir, "")
            .with(Placeholder::OverridePath, "")
            .with(Placeholder::CurrentTheme, "")
            .with(Placeholder::CurrentDevice, "")
            .with(Placeholder::Template, "");

        let mut candidates = Vec::new();
        for bundle in &self.bundles {
            candidates.extend(
                self.patterns
                    .paths_for_bundle(&with_bundle(bundle_params.clone(), bundle)),
            );
        }

        let app_params = Parameters::new()
            .with(Placeholder::AppPath, self.app_path_value())
            .with(Placeholder::CurrentTheme, "")
            .with(Placeholder::CurrentDevice, "")
            .with(Placeholder::Template, "");
        candidates.extend(self.patterns.paths_for_app_resource(&app_params));

        let mut roots = BTreeSet::new();
        for candidate in candidates {
            let candidate = candidate.to_string_lossy().into_owned();
            let Some(caps) = THEMES_ROOT.captures(&candidate) else {
                continue;
            };
            if !Path::new(&candidate).exists() {
                continue;
            }
            roots.insert(PathBuf::from(&caps[1]));
        }

        let mut themes = BTreeSet::new();
        for root in roots {
            debug!("Scanning themes root {}", root.display());
            for entry in fs::read_dir(&root)? {
                let entry = entry?;
                // Follows links: a linked theme directory is a theme too.
                if !entry.path().is_dir() {
                    continue;
                }
                let name = entry.file_name().to_string_lossy().into_owned();
                if name.starts_with('.') {
                    continue;
                }
                themes.insert(name);
            }
        }

        Ok(themes)
    }

    /// First bundle directory holding `theme`, if any
    pub fn locate_theme_in_bundles(&self, theme: &str, dir: Option<&Path>) -> Option<BundleMatch> {
        self.bundle_matches(theme, dir).next()
    }

    /// Every bundle directory holding `theme`, in search order
    pub fn locate_all_themes_in_bundles(&self, theme: &str, dir: Option<&Path>) -> Vec<BundleMatch> {
        self.bundle_matches(theme, dir).collect()
    }

    /// First app directory holding `theme`, if any
    pub fn locate_theme_in_app(&self, theme: &str) -> Option<PathBuf> {
        self.app_matches(theme).next()
    }

    /// Every app directory holding `theme`, in pattern order
    pub fn locate_all_themes_in_app(&self, theme: &str) -> Vec<PathBuf> {
        self.app_matches(theme).collect()
    }

    fn bundle_matches<'a>(
        &'a self,
        theme: &str,
        dir: Option<&Path>,
    ) -> impl Iterator<Item = BundleMatch> + 'a {
        let params = Parameters::new()
            .with(Placeholder::AppPath, self.app_path_value())
            .with(
                Placeholder::Dir,
                dir.map(|d| d.to_string_lossy().into_owned()).unwrap_or_default(),
            )
            .with(Placeholder::OverridePath, theme)
            .with(Placeholder::CurrentTheme, theme)
            .with(Placeholder::CurrentDevice, "")
            .with(Placeholder::Template, "");

        self.bundles.iter().flat_map(move |bundle| {
            self.patterns
                .paths_for_bundle(&with_bundle(params.clone(), bundle))
                .into_iter()
                .filter(|path| probe(path))
                .map(move |path| BundleMatch {
                    path,
                    bundle: bundle.clone(),
                })
        })
    }

    fn app_matches(&self, theme: &str) -> impl Iterator<Item = PathBuf> {
        // App resources are dir agnostic: bundle placeholders stay unresolved.
        let params = Parameters::new()
            .with(Placeholder::AppPath, self.app_path_value())
            .with(Placeholder::CurrentTheme, theme)
            .with(Placeholder::CurrentDevice, "")
            .with(Placeholder::Template, "");

        self.patterns
            .paths_for_app_resource(&params)
            .into_iter()
            .filter(|path| probe(path))
    }
}

pub(crate) fn with_bundle(params: Parameters, bundle: &BundleDescriptor) -> Parameters {
    params
        .with(Placeholder::BundlePath, bundle.path.to_string_lossy().into_owned())
        .with(Placeholder::BundleName, bundle.name.clone())
}

pub(crate) fn probe(path: &Path) -> bool {
    let found = path.exists();
    debug!("Probing {} -> {}", path.display(), if found { "found" } else { "missing" });
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn mkdirs(root: &Path, dirs: &[&str]) {
        for dir in dirs {
            fs::create_dir_all(root.join(dir)).unwrap();
        }
    }

    #[test]
    fn test_discover_themes_from_app_and_bundles() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        mkdirs(
            root,
            &[
                "app/themes/dark/public",
                "app/themes/light",
                "blog/Resources/themes/classic/public",
                "blog/Resources/themes/dark",
            ],
        );
        fs::write(root.join("app/themes/README"), "not a theme").unwrap();

        let locator = ThemeLocator::new(
            Some(root.join("app")),
            vec![BundleDescriptor::new("BlogBundle", root.join("blog"))],
            PathPatternSet::default(),
        );

        let themes: Vec<String> = locator.discover_themes().unwrap().into_iter().collect();
        assert_eq!(themes, vec!["classic", "dark", "light"]);
    }

    #[test]
    fn test_discover_themes_skips_hidden_directories() {
        let temp_dir = TempDir::new().unwrap();
        mkdirs(temp_dir.path(), &["app/themes/.git", "app/themes/dark"]);

        let locator = ThemeLocator::new(
            Some(temp_dir.path().join("app")),
            vec![],
            PathPatternSet::default(),
        );

        assert_eq!(
            locator.discover_themes().unwrap(),
            BTreeSet::from(["dark".to_string()])
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_discover_themes_follows_linked_theme_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        mkdirs(root, &["app/themes/dark", "shared/neon/public"]);
        std::os::unix::fs::symlink(root.join("shared/neon"), root.join("app/themes/neon")).unwrap();
        std::os::unix::fs::symlink(root.join("shared/missing"), root.join("app/themes/broken"))
            .unwrap();

        let locator = ThemeLocator::new(Some(root.join("app")), vec![], PathPatternSet::default());

        let themes: Vec<String> = locator.discover_themes().unwrap().into_iter().collect();
        assert_eq!(themes, vec!["dark", "neon"]);
    }

    #[test]
    fn test_discover_themes_without_themes_root() {
        let temp_dir = TempDir::new().unwrap();
        mkdirs(temp_dir.path(), &["app/views"]);

        let locator = ThemeLocator::new(
            Some(temp_dir.path().join("app")),
            vec![BundleDescriptor::new("BlogBundle", temp_dir.path().join("blog"))],
            PathPatternSet::default(),
        );

        assert!(locator.discover_themes().unwrap().is_empty());
    }

    #[test]
    fn test_locate_theme_in_bundles_follows_registration_order() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        mkdirs(
            root,
            &["first/Resources/themes/dark", "second/Resources/themes/dark"],
        );

        let locator = ThemeLocator::new(
            None,
            vec![
                BundleDescriptor::new("FirstBundle", root.join("first")),
                BundleDescriptor::new("SecondBundle", root.join("second")),
            ],
            PathPatternSet::default(),
        );

        let found = locator.locate_theme_in_bundles("dark", None).unwrap();
        assert_eq!(found.bundle.name, "FirstBundle");

        let all = locator.locate_all_themes_in_bundles("dark", None);
        let names: Vec<&str> = all.iter().map(|m| m.bundle.name.as_str()).collect();
        assert_eq!(names, vec!["FirstBundle", "SecondBundle"]);
    }

    #[test]
    fn test_locate_theme_in_bundles_no_match_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let locator = ThemeLocator::new(
            None,
            vec![BundleDescriptor::new("BlogBundle", temp_dir.path().join("blog"))],
            PathPatternSet::default(),
        );

        assert_eq!(locator.locate_theme_in_bundles("ghost", None), None);
        assert!(locator.locate_all_themes_in_bundles("ghost", None).is_empty());
    }

    #[test]
    fn test_locate_theme_in_bundles_with_dir_checks_overrides_first() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        mkdirs(
            root,
            &["override/BlogBundle/dark", "blog/Resources/themes/dark"],
        );

        let locator = ThemeLocator::new(
            None,
            vec![BundleDescriptor::new("BlogBundle", root.join("blog"))],
            PathPatternSet::default(),
        );

        let found = locator
            .locate_theme_in_bundles("dark", Some(&root.join("override")))
            .unwrap();
        assert_eq!(found.path, root.join("override/BlogBundle/dark"));
    }

    #[test]
    fn test_locate_theme_in_app() {
        let temp_dir = TempDir::new().unwrap();
        mkdirs(temp_dir.path(), &["app/themes/dark/public"]);

        let locator = ThemeLocator::new(
            Some(temp_dir.path().join("app")),
            vec![],
            PathPatternSet::default(),
        );

        let found = locator.locate_theme_in_app("dark").unwrap();
        assert!(found.starts_with(temp_dir.path().join("app/themes/dark")));
        assert_eq!(locator.locate_theme_in_app("ghost"), None);
    }
}
