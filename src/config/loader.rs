//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::value_objects::ConfigWarning;
use crate::error::{StrataError, StrataResult};

use super::types::{Config, LoadedConfig, RECIPE_FILE};

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> StrataResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;
    parse_with_warnings(path, &content)
}

/// Parse recipe text; `path` is only used for messages.
pub fn parse_with_warnings(path: &Path, content: &str) -> StrataResult<(Config, Vec<ConfigWarning>)> {
    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| StrataError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                line: find_line_number(content, &key),
                suggestion: suggest_key(&key),
                key: path_str,
                file: path.to_path_buf(),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Context recipe first, then the user config, then built-in defaults.
///
/// Unlike lookups of optional settings, a recipe that exists but does not
/// parse is an error: building the wrong image silently is worse than not
/// building.
pub fn load_for_context(context: &Path) -> StrataResult<LoadedConfig> {
    let mut candidates = vec![context.join(RECIPE_FILE)];
    if let Some(user_dir) = user_config_dir() {
        candidates.push(user_dir.join("strata").join("config.toml"));
    }

    for candidate in candidates {
        if !candidate.is_file() {
            continue;
        }
        let (mut config, warnings) = load_with_warnings(&candidate)?;
        for warning in &warnings {
            tracing::warn!("{}", warning);
        }
        if let (Some(store), Some(dir)) = (config.store.path.as_ref(), candidate.parent()) {
            if store.is_relative() {
                config.store.path = Some(dir.join(store));
            }
        }
        tracing::debug!(recipe = %candidate.display(), "loaded recipe");
        return Ok(LoadedConfig {
            config: with_env_overrides(config),
            source: Some(candidate),
            warnings,
        });
    }

    tracing::debug!("no recipe found, using built-in defaults");
    Ok(LoadedConfig {
        config: with_env_overrides(Config::default()),
        source: None,
        warnings: Vec::new(),
    })
}

/// Apply environment variable overrides (STRATA_* prefix)
pub fn with_env_overrides(mut config: Config) -> Config {
    if let Some(store) = non_empty_env("STRATA_STORE") {
        config.store.path = Some(PathBuf::from(store));
    }

    if let Some(shell) = non_empty_env("STRATA_SHELL") {
        config.store.shell = shell;
    }

    config
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// XDG config directory
fn user_config_dir() -> Option<PathBuf> {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| {
            let trimmed = line.trim_start();
            trimmed.starts_with(needle)
                || trimmed
                    .strip_prefix('[')
                    .is_some_and(|rest| rest.trim_start().starts_with(needle))
        })
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "image",
        "name",
        "base",
        "workdir",
        "system",
        "packages",
        "install",
        "clean",
        "dependencies",
        "manifest",
        "require_pins",
        "source",
        "ignore_file",
        "entry",
        "command",
        "env",
        "store",
        "path",
        "shell",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 && candidate != unknown => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = usize::from(ac != bc);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
