//! Tests for the config module

use super::types::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

#[test]
fn test_config_default_reproduces_bot_image() {
    let config = Config::default();

    assert_eq!(config.image.base, "python:3.10-slim");
    assert_eq!(config.image.workdir, "/app");
    assert_eq!(config.system.packages, vec!["gcc", "build-essential"]);
    assert_eq!(config.system.clean, "rm -rf {layer}/var/lib/apt/lists/* {layer}/var/cache/apt");
    assert!(config.dependencies.install.contains("--target {layer}{workdir}/.deps"));
    assert_eq!(config.dependencies.manifest, PathBuf::from("requirements.txt"));
    assert!(!config.dependencies.require_pins);
    assert_eq!(config.entry.command, vec!["python", "telegram_bot.py"]);
    assert!(config.entry.env.is_empty());
    assert_eq!(config.store.shell, "/bin/sh");
}

#[test]
fn test_config_parse_partial_toml_keeps_other_defaults() {
    let toml = r#"
[image]
name = "echo-bot"
base = "python:3.11-slim"

[system]
packages = ["libpq-dev"]

[entry]
command = ["python", "-m", "bot"]

[entry.env]
PYTHONUNBUFFERED = "1"
"#;

    let config: Config = toml::from_str(toml).unwrap();

    assert_eq!(config.image.name.as_deref(), Some("echo-bot"));
    assert_eq!(config.image.base, "python:3.11-slim");
    assert_eq!(config.image.workdir, "/app");
    assert_eq!(config.system.packages, vec!["libpq-dev"]);
    assert!(config.system.install.contains("{packages}"));
    assert_eq!(config.entry.command, vec!["python", "-m", "bot"]);
    assert_eq!(
        config.entry.env.get("PYTHONUNBUFFERED").map(String::as_str),
        Some("1")
    );
}

#[test]
fn test_config_load_with_warnings_reports_unknown_key_with_suggestion() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("strata.toml");

    fs::write(&path, "[system]\npakages = [\"gcc\"]\n").unwrap();

    let (config, warnings) = Config::load_with_warnings(&path).unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].key, "system.pakages");
    assert_eq!(warnings[0].line, Some(2));
    assert_eq!(warnings[0].suggestion, Some("packages".to_string()));
    // Unknown key is ignored, default stays
    assert_eq!(config.system.packages, vec!["gcc", "build-essential"]);
}

#[test]
fn test_config_load_rejects_wrong_types() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("strata.toml");

    fs::write(&path, "[entry]\ncommand = \"python telegram_bot.py\"\n").unwrap();

    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, crate::error::StrataError::InvalidConfig { .. }));
    assert!(err.to_string().contains("strata.toml"));
}

#[test]
fn test_load_for_context_prefers_context_recipe() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join(RECIPE_FILE),
        "[image]\nworkdir = \"/srv/bot\"\n",
    )
    .unwrap();

    let loaded = Config::load_for_context(dir.path()).unwrap();
    assert_eq!(loaded.source.as_deref(), Some(dir.path().join(RECIPE_FILE).as_path()));
    assert_eq!(loaded.config.image.workdir, "/srv/bot");
    assert!(loaded.warnings.is_empty());
}

#[test]
fn test_load_for_context_fails_on_broken_recipe() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(RECIPE_FILE), "[image\nbase = \n").unwrap();

    assert!(Config::load_for_context(dir.path()).is_err());
}

#[test]
fn test_env_override_store_and_shell() {
    // SAFETY: only this test touches STRATA_STORE / STRATA_SHELL
    unsafe { std::env::set_var("STRATA_STORE", "/tmp/strata-env-store") };
    unsafe { std::env::set_var("STRATA_SHELL", "/bin/bash") };
    let config = Config::default().with_env_overrides();
    unsafe { std::env::remove_var("STRATA_STORE") };
    unsafe { std::env::remove_var("STRATA_SHELL") };

    assert_eq!(config.store_path(), Path::new("/tmp/strata-env-store"));
    assert_eq!(config.store.shell, "/bin/bash");
}

#[test]
fn test_image_name_falls_back_to_context_dir() {
    let dir = tempdir().unwrap();
    let context = dir.path().join("Telegram Bot");
    fs::create_dir(&context).unwrap();

    let config = Config::default();
    assert_eq!(config.image_name(&context), "telegram-bot");

    let mut named = Config::default();
    named.image.name = Some("Echo_Bot".to_string());
    assert_eq!(named.image_name(&context), "echo_bot");
}

#[test]
fn test_sanitize_image_name() {
    assert_eq!(sanitize_image_name("my bot!"), "my-bot");
    assert_eq!(sanitize_image_name("..hidden"), "hidden");
    assert_eq!(sanitize_image_name("///"), "image");
}
