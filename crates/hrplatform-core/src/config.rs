//! Site configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{Language, Theme};

pub const CONFIG_FILE: &str = "hrplatform.toml";
pub const ENV_DATA_DIR: &str = "HRPLATFORM_DATA_DIR";
pub const ENV_DATA_URL: &str = "HRPLATFORM_DATA_URL";

/// Top-level hrplatform configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Directory holding the JSON resources.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Base URL to fetch resources from instead of `data_dir`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_url: Option<String>,
    /// Where `build` writes the site.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Key-value file backing progress and preferences.
    #[serde(default = "default_progress_file")]
    pub progress_file: PathBuf,
    #[serde(default)]
    pub default_language: Language,
    #[serde(default)]
    pub default_theme: Theme,
    #[serde(default = "default_site_title")]
    pub site_title: String,
    /// HTML study guides copied into the site.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guides_dir: Option<PathBuf>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./site")
}
fn default_progress_file() -> PathBuf {
    PathBuf::from("./.hrplatform/progress.json")
}
fn default_site_title() -> String {
    "International Human Rights Atlas".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            data_url: None,
            output_dir: default_output_dir(),
            progress_file: default_progress_file(),
            default_language: Language::default(),
            default_theme: Theme::default(),
            site_title: default_site_title(),
            guides_dir: None,
        }
    }
}

impl SiteConfig {
    /// Replace `${VAR}` references and apply `HRPLATFORM_*` overrides,
    /// looking variables up through `lookup`.
    pub fn resolve_with(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(url) = lookup(ENV_DATA_URL) {
            self.data_url = Some(url);
        }

        let resolve_path = |p: &Path| PathBuf::from(resolve_vars(&p.to_string_lossy(), &lookup));
        self.data_dir = resolve_path(&self.data_dir);
        self.output_dir = resolve_path(&self.output_dir);
        self.progress_file = resolve_path(&self.progress_file);
        self.guides_dir = self.guides_dir.as_deref().map(resolve_path);
        self.data_url = self.data_url.as_deref().map(|u| resolve_vars(u, &lookup));
        self.site_title = resolve_vars(&self.site_title, &lookup);
        self
    }
}

/// Resolve `${VAR_NAME}` references in `s`. Unknown variables become empty.
fn resolve_vars(s: &str, lookup: &impl Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        result.push_str(&lookup(&rest[start + 2..start + end]).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `path`, when given (must exist)
/// 2. `hrplatform.toml` in the current directory
/// 3. `~/.config/hrplatform/config.toml`
///
/// Environment overrides: `HRPLATFORM_DATA_DIR`, `HRPLATFORM_DATA_URL`.
pub fn load_config_from(path: Option<&Path>) -> Result<SiteConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from(CONFIG_FILE);
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<SiteConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => SiteConfig::default(),
    };

    Ok(config.resolve_with(|name| std::env::var(name).ok()))
}

/// Contents of a fresh `hrplatform.toml`.
pub fn starter_config() -> Result<String> {
    toml::to_string_pretty(&SiteConfig::default()).context("failed to serialize default config")
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("hrplatform"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn resolve_vars_basic() {
        let lookup = env(&[("ROOT", "/srv")]);
        assert_eq!(resolve_vars("${ROOT}/data", &lookup), "/srv/data");
        assert_eq!(resolve_vars("${MISSING}x", &lookup), "x");
        assert_eq!(resolve_vars("${unterminated", &lookup), "${unterminated");
    }

    #[test]
    fn resolved_values_are_not_expanded_again() {
        let lookup = env(&[("SELF", "${SELF}"), ("A", "${B}"), ("B", "b")]);
        assert_eq!(resolve_vars("${SELF}x", &lookup), "${SELF}x");
        assert_eq!(resolve_vars("${A}/${B}", &lookup), "${B}/b");
        assert_eq!(resolve_vars("a${B}${unterminated", &lookup), "ab${unterminated");
    }

    #[test]
    fn default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.default_theme, Theme::Light);
        assert!(config.data_url.is_none());
    }

    #[test]
    fn parse_partial_config() {
        let config: SiteConfig = toml::from_str(
            r#"
data_dir = "${ROOT}/json"
default_language = "sl"
site_title = "Atlas"
"#,
        )
        .unwrap();
        let config = config.resolve_with(env(&[("ROOT", "/srv")]));
        assert_eq!(config.data_dir, PathBuf::from("/srv/json"));
        assert_eq!(config.default_language, Language::Sl);
        assert_eq!(config.output_dir, PathBuf::from("./site"));
    }

    #[test]
    fn env_overrides_win() {
        let config = SiteConfig::default().resolve_with(env(&[
            (ENV_DATA_DIR, "/tmp/data"),
            (ENV_DATA_URL, "https://example.org/data/"),
        ]));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/data"));
        assert_eq!(config.data_url.as_deref(), Some("https://example.org/data/"));
    }

    #[test]
    fn explicit_missing_path_fails() {
        let err = load_config_from(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_file_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "output_dir = \"out\"\ndefault_theme = \"dark\"\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.default_theme, Theme::Dark);
    }

    #[test]
    fn starter_config_parses_back() {
        let text = starter_config().unwrap();
        let parsed: SiteConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, SiteConfig::default());
    }
}
