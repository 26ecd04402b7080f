//! Integration tests for theme discovery and asset installation
//!
//! Every test builds a small project tree in a temporary directory:
//! - `app/themes/<theme>/...` for app themes
//! - `<Bundle>/Resources/themes/<theme>/...` for bundle themes

use pretty_assertions::assert_eq;
use rhtmx_theme::pattern::PathPatternSet;
use rhtmx_theme::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn locator(root: &Path, bundles: &[&str]) -> ThemeLocator {
    ThemeLocator::new(
        Some(root.join("app")),
        bundles
            .iter()
            .map(|name| BundleDescriptor::new(*name, root.join(name)))
            .collect(),
        PathPatternSet::default(),
    )
}

/// Relative path -> file contents, for every regular file under `dir`
fn snapshot(dir: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            (
                e.path().strip_prefix(dir).unwrap().to_path_buf(),
                fs::read(e.path()).unwrap(),
            )
        })
        .collect()
}

#[test]
fn test_app_theme_hard_copy() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(&root.join("app/themes/dark/public/style.css"), "body { color: #fff }");
    let out = root.join("out");

    let outcome = Installer::new(locator(root, &[]))
        .install_assets("dark", &out, InstallMethod::HardCopy)
        .unwrap();

    assert!(outcome.is_installed());
    assert_eq!(
        fs::read_to_string(out.join("dark/style.css")).unwrap(),
        "body { color: #fff }"
    );
}

#[test]
fn test_missing_theme_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("out");

    let outcome = Installer::new(locator(temp_dir.path(), &["BlogBundle"]))
        .install_assets("ghost", &out, InstallMethod::Symlink)
        .unwrap();

    assert!(!outcome.is_installed());
    assert_eq!(outcome, InstallOutcome::Skipped(SkipReason::ThemeNotFound));
    assert!(out.is_dir());
    assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
}

#[test]
fn test_bundle_theme_target_directory() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(
        &root.join("AcmeBlogBundle/Resources/themes/classic/public/js/app.js"),
        "init();",
    );
    let out = root.join("out");

    let outcome = Installer::new(locator(root, &["AcmeBlogBundle"]))
        .install_assets("classic", &out, InstallMethod::HardCopy)
        .unwrap();

    match outcome {
        InstallOutcome::Installed { target, method, .. } => {
            assert_eq!(target, out.join("acmeblog/classic"));
            assert_eq!(method, InstallMethod::HardCopy);
        }
        other => panic!("expected an install, got {:?}", other),
    }
    assert_eq!(
        fs::read_to_string(out.join("acmeblog/classic/js/app.js")).unwrap(),
        "init();"
    );
}

#[test]
fn test_bundle_theme_shadows_app_theme() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(&root.join("app/themes/dark/public/app.css"), "app");
    write(&root.join("BlogBundle/Resources/themes/dark/public/bundle.css"), "bundle");
    let out = root.join("out");

    Installer::new(locator(root, &["BlogBundle"]))
        .install_assets("dark", &out, InstallMethod::HardCopy)
        .unwrap();

    assert!(out.join("blog/dark/bundle.css").is_file());
    assert!(!out.join("dark").exists());
}

#[test]
fn test_hard_copy_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(&root.join("app/themes/dark/public/style.css"), "a {}");
    write(&root.join("app/themes/dark/public/img/logo.svg"), "<svg/>");
    write(&root.join("app/themes/dark/public/.well-known/security.txt"), "contact");
    write(&root.join("app/themes/dark/public/.git/HEAD"), "ref: refs/heads/main");
    let out = root.join("out");
    let installer = Installer::new(locator(root, &[]));

    installer
        .install_assets("dark", &out, InstallMethod::HardCopy)
        .unwrap();
    let first = snapshot(&out);

    let second_outcome = installer
        .install_assets("dark", &out, InstallMethod::HardCopy)
        .unwrap();
    assert!(second_outcome.is_installed());
    assert_eq!(snapshot(&out), first);

    let expected: Vec<PathBuf> = vec![
        PathBuf::from("dark/.well-known/security.txt"),
        PathBuf::from("dark/img/logo.svg"),
        PathBuf::from("dark/style.css"),
    ];
    assert_eq!(first.keys().cloned().collect::<Vec<_>>(), expected);
}

#[test]
fn test_symlink_points_at_public_folder() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(&root.join("app/themes/dark/public/style.css"), "a {}");
    let out = root.join("out");

    let result = Installer::new(locator(root, &[]))
        .install_assets("dark", &out, InstallMethod::Symlink);

    match result {
        Ok(outcome) => {
            assert!(outcome.is_installed());
            let target = out.join("dark");
            assert!(target.is_symlink());
            assert_eq!(
                fs::canonicalize(&target).unwrap(),
                fs::canonicalize(root.join("app/themes/dark/public")).unwrap()
            );
        }
        // Platforms without symlink support report a recoverable error.
        Err(err) => assert!(err.is_recoverable(), "unexpected error: {}", err),
    }
}

#[test]
fn test_discovery_reports_each_theme_once() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("app/themes/dark")).unwrap();
    fs::create_dir_all(root.join("BlogBundle/Resources/themes/dark")).unwrap();
    fs::create_dir_all(root.join("ShopBundle/Resources/themes/dark")).unwrap();

    let themes = locator(root, &["BlogBundle", "ShopBundle"])
        .discover_themes()
        .unwrap();

    assert_eq!(themes.into_iter().collect::<Vec<_>>(), vec!["dark".to_string()]);
}

#[test]
fn test_install_every_discovered_theme() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(&root.join("app/themes/dark/public/style.css"), "dark");
    write(&root.join("app/themes/light/public/style.css"), "light");
    fs::create_dir_all(root.join("app/themes/draft/views")).unwrap();
    let out = root.join("web/themes");

    let installer = Installer::new(locator(root, &[]));
    let themes = installer.locator().discover_themes().unwrap();

    let installed: Vec<String> = themes
        .iter()
        .filter(|theme| {
            installer
                .install_assets(theme, &out, InstallMethod::HardCopy)
                .unwrap()
                .is_installed()
        })
        .cloned()
        .collect();

    assert_eq!(installed, vec!["dark".to_string(), "light".to_string()]);
}
