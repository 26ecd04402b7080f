// File: src/resolver.rs
// Purpose: Theme-aware lookup of bundle templates and assets

use crate::active::ActiveTheme;
use crate::error::{Result, ThemeError};
use crate::locator::{probe, with_bundle, ThemeLocator};
use crate::pattern::{Parameters, Placeholder};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

const RESOURCES_PREFIX: &str = "Resources/";
const VIEWS_PREFIX: &str = "Resources/views/";

/// `%theme_dir%/<relative path>` references in asset inputs
static THEME_DIR_REF: Lazy<Regex> = Lazy::new(|| Regex::new(r"%%|%([^%\s]+)%/(.+)$").unwrap());

/// Resolves `@Bundle/Resources/...` names to files, theme overrides first
///
/// For every bundle the override candidates (`bundle_resource_dir` patterns
/// when a dir is given, then `bundle_resource`) are checked before the
/// bundle's own `Resources/` file. The active theme and device type feed the
/// `%current_theme%` and `%current_device%` placeholders.
///
/// Only files count as matches: a candidate that exists as a directory is
/// skipped.
#[derive(Debug)]
pub struct AssetPathResolver {
    locator: ThemeLocator,
    active_theme: ActiveTheme,
}

impl AssetPathResolver {
    pub fn new(locator: ThemeLocator, active_theme: ActiveTheme) -> Self {
        Self {
            locator,
            active_theme,
        }
    }

    pub fn locator(&self) -> &ThemeLocator {
        &self.locator
    }

    pub fn active_theme(&self) -> &ActiveTheme {
        &self.active_theme
    }

    pub fn active_theme_mut(&mut self) -> &mut ActiveTheme {
        &mut self.active_theme
    }

    /// First file for a bundle resource name like `@BlogBundle/Resources/views/post.html`
    pub fn locate(&self, name: &str, dir: Option<&Path>) -> Result<PathBuf> {
        let mut found = self.search(name, dir, true)?;
        Ok(found.remove(0))
    }

    /// Every file for a bundle resource name, in lookup order
    ///
    /// Fails with [`ThemeError::AmbiguousResource`] when a theme override
    /// shows up after another bundle already provided the resource itself.
    pub fn locate_all(&self, name: &str, dir: Option<&Path>) -> Result<Vec<PathBuf>> {
        self.search(name, dir, false)
    }

    /// First file for a template path relative to `Resources/views/`
    pub fn locate_template(&self, template: &str, dir: Option<&Path>) -> Result<PathBuf> {
        let name = format!("@%bundle_name%/{}{}", VIEWS_PREFIX, template);
        self.locate(&name, dir).map_err(|err| match err {
            ThemeError::ResourceNotFound(_) => ThemeError::ResourceNotFound(template.to_string()),
            other => other,
        })
    }

    /// Resolves a `%theme_dir%/<template>` asset input; any other input is returned as is
    pub fn resolve_value(&self, input: &str) -> Result<String> {
        if let Some(caps) = THEME_DIR_REF.captures(input) {
            if caps.get(1).map(|m| m.as_str()) == Some("theme_dir") {
                let path = self.locate_template(&caps[2], None)?;
                return Ok(path.to_string_lossy().into_owned());
            }
        }
        Ok(input.to_string())
    }

    fn search(&self, name: &str, dir: Option<&Path>, first: bool) -> Result<Vec<PathBuf>> {
        if name.contains("..") {
            return Err(ThemeError::InvalidResourceName(name.to_string()));
        }

        let path = match name.split_once('/') {
            Some((_bundle, path)) if path.starts_with("Resources") => path,
            _ => return Err(ThemeError::NotInResources(name.to_string())),
        };

        // Fixed-width cuts: a resource outside Resources/views/ keeps its tail
        // (`Resources/public/a.css` gives `/a.css`), so it never expands to a
        // bare theme directory.
        let params = Parameters::new()
            .with(Placeholder::AppPath, self.locator.app_path_value())
            .with(
                Placeholder::Dir,
                dir.map(|d| d.to_string_lossy().into_owned()).unwrap_or_default(),
            )
            .with(
                Placeholder::OverridePath,
                path.get(RESOURCES_PREFIX.len()..).unwrap_or(""),
            )
            .with(
                Placeholder::CurrentTheme,
                self.active_theme.name().unwrap_or_default(),
            )
            .with(Placeholder::CurrentDevice, self.active_theme.device_type())
            .with(
                Placeholder::Template,
                path.get(VIEWS_PREFIX.len()..).unwrap_or(""),
            );

        let mut files = Vec::new();
        // Bundle that already provided the plain resource, with that file.
        let mut resource_owner: Option<(&str, PathBuf)> = None;

        let patterns = self.locator.patterns();
        for bundle in self.locator.bundles() {
            for candidate in patterns.paths_for_bundle(&with_bundle(params.clone(), bundle)) {
                if !is_file(&candidate) {
                    continue;
                }
                if let Some((owner, shadowed)) = &resource_owner {
                    return Err(ThemeError::AmbiguousResource {
                        resource: path.to_string(),
                        bundle: owner.to_string(),
                        shadowed: shadowed.clone(),
                        conflicting: candidate,
                    });
                }
                if first {
                    return Ok(vec![candidate]);
                }
                files.push(candidate);
            }

            let file = bundle.path.join(path);
            if is_file(&file) {
                if first {
                    return Ok(vec![file]);
                }
                resource_owner = Some((bundle.name(), file.clone()));
                files.push(file);
            }
        }

        if files.is_empty() {
            return Err(ThemeError::ResourceNotFound(name.to_string()));
        }
        Ok(files)
    }
}

fn is_file(path: &Path) -> bool {
    probe(path) && !path.is_dir()
}
