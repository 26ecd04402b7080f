use anyhow::{Context, Result};
use colored::Colorize;
use rhtmx_theme::{InstallMethod, InstallOutcome, Installer, SkipReason, ThemeSettings};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Per-theme results of an install run
#[derive(Debug, Default)]
pub struct InstallSummary {
    pub installed: Vec<String>,
    pub skipped: Vec<(String, SkipReason)>,
}

/// Install the assets of every known theme into `<target>/themes`
///
/// Skipped themes are reported but never fail the run. The themes directory
/// is not cleared first: each theme's target is overwritten in place.
pub fn install(settings: &ThemeSettings, target: &str, symlink: bool) -> Result<InstallSummary> {
    let target_arg = match target.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };
    if !Path::new(target_arg).is_dir() {
        anyhow::bail!("The target directory \"{}\" does not exist.", target);
    }

    let themes_dir = Path::new(target_arg).join("themes");
    let active = settings
        .active_theme(None)
        .context("Failed to load the themes list")?;
    let installer = Installer::new(settings.locator());

    if symlink {
        println!(
            "Trying to install theme assets as {} in {}.",
            "symbolic links".yellow(),
            themes_dir.display().to_string().green()
        );
    } else {
        println!(
            "Installing theme assets as {} in {}.",
            "hard copies".yellow(),
            themes_dir.display().to_string().green()
        );
    }

    println!(
        "Found following theme(s) to install: {}.",
        active.themes().join(", ").yellow()
    );
    println!();

    let method = if symlink {
        InstallMethod::Symlink
    } else {
        InstallMethod::HardCopy
    };

    let mut summary = InstallSummary::default();
    for theme in active.themes() {
        let outcome = match installer.install_assets(theme, &themes_dir, method) {
            Err(err) if err.is_recoverable() => {
                warn!("{}; falling back to a hard copy", err);
                installer.install_assets(theme, &themes_dir, InstallMethod::HardCopy)?
            }
            result => result?,
        };

        match outcome {
            InstallOutcome::Installed { target, method, .. } => {
                println!(
                    "  {} {} -> {} ({})",
                    "✓".green(),
                    theme.bold(),
                    target.display(),
                    method
                );
                summary.installed.push(theme.clone());
            }
            InstallOutcome::Skipped(reason) => {
                println!("  {} {} skipped: {}", "⚠".yellow(), theme.bold(), reason);
                summary.skipped.push((theme.clone(), reason));
            }
        }
    }

    println!();
    println!(
        "{}",
        format!(
            "Successfully installed assets for {} theme(s).",
            summary.installed.len()
        )
        .green()
        .bold()
    );

    Ok(summary)
}

#[derive(Debug, Serialize)]
struct ThemeListing {
    themes: Vec<String>,
    discovered: Vec<String>,
    active_theme: Option<String>,
    theme_cookie: Option<String>,
    autodetect_theme: bool,
    cache_warming: bool,
}

fn listing(settings: &ThemeSettings) -> Result<ThemeListing> {
    let active = settings.active_theme(None)?;
    Ok(ThemeListing {
        themes: active.themes().to_vec(),
        discovered: settings.locator().discover_themes()?.into_iter().collect(),
        active_theme: active.name().map(str::to_string),
        theme_cookie: settings.theme_cookie.clone(),
        autodetect_theme: settings.autodetect_theme,
        cache_warming: settings.cache_warming,
    })
}

/// Print configured and discovered themes
pub fn list(settings: &ThemeSettings, json: bool) -> Result<()> {
    let listing = listing(settings)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    println!("{}", "Themes".green().bold());
    println!();
    for theme in &listing.themes {
        let marker = if listing.active_theme.as_deref() == Some(theme.as_str()) {
            "*".green()
        } else {
            " ".normal()
        };
        let origin = if listing.discovered.contains(theme) {
            "".normal()
        } else {
            "(not found on disk)".yellow()
        };
        println!("  {} {} {}", marker, theme.cyan(), origin);
    }

    if listing.themes.is_empty() {
        println!("  {} No themes configured or discovered", "ℹ".cyan());
    }

    println!();
    println!(
        "Theme cookie: {}",
        listing.theme_cookie.as_deref().unwrap_or("(none)")
    );
    println!(
        "Autodetect theme: {}",
        if listing.autodetect_theme { "Yes" } else { "No" }
    );
    println!(
        "Cache warming: {}",
        if listing.cache_warming { "Yes" } else { "No" }
    );

    Ok(())
}

/// Resolve a template through the active theme and print the match(es)
pub fn locate(settings: &ThemeSettings, template: &str, dir: Option<&Path>, all: bool) -> Result<()> {
    let resolver = settings.resolver(None)?;

    let paths: Vec<PathBuf> = if all {
        resolver.locate_all(&format!("@%bundle_name%/Resources/views/{}", template), dir)?
    } else {
        vec![resolver.locate_template(template, dir)?]
    };

    for path in paths {
        println!("{}", path.display());
    }

    Ok(())
}
