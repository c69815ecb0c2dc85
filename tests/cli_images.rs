//! Integration tests for `strata images` and `strata inspect`

mod common;

use common::*;

#[test]
fn images_lists_built_images_sorted() {
    let env = TestEnv::bot();
    assert_success!(env.run(&["build", "-t", "zeta"]));
    assert_success!(env.run(&["build", "-t", "alpha"]));

    let result = env.run(&["images", "--json"]);

    assert_success!(result);
    let events = result.json_lines();
    assert_eq!(events[0]["count"], 2);
    assert_eq!(events[0]["images"][0]["name"], "alpha");
    assert_eq!(events[0]["images"][1]["name"], "zeta");
    // Same inputs, same image
    assert_eq!(events[0]["images"][0]["key"], events[0]["images"][1]["key"]);
}

#[test]
fn images_on_empty_store() {
    let env = TestEnv::bot();

    let result = env.run(&["images"]);

    assert_success!(result);
    assert_output_contains!(result, "No images");
}

#[test]
fn inspect_shows_layers_and_dependencies() {
    let env = TestEnv::bot();
    assert_success!(env.run(&["build"]));

    let result = env.run(&["inspect", "bot"]);

    assert_success!(result);
    assert_output_contains!(result, "Entry:        sh telegram_bot.py");
    assert_output_contains!(result, "requests==2.31.0");
    assert_output_contains!(result, "install-dependencies");
    assert_output_not_contains!(result, "MISSING");
}

#[test]
fn inspect_json_marks_missing_layers() {
    let env = TestEnv::bot();
    assert_success!(env.run(&["build"]));
    let record = std::fs::read_to_string(env.store_path("images/bot.toml")).unwrap();
    let value: toml::Value = toml::from_str(&record).unwrap();
    let source_key = value["layers"]
        .as_array()
        .unwrap()
        .iter()
        .find(|l| l["stage"].as_str() == Some("stage-source"))
        .and_then(|l| l["key"].as_str())
        .unwrap()
        .to_string();
    std::fs::remove_dir_all(env.store_path(&format!("layers/{}", source_key))).unwrap();

    let result = env.run(&["inspect", "bot", "--json"]);

    assert_success!(result);
    let events = result.json_lines();
    assert_eq!(events[0]["complete"], false);

    let run = env.run(&["run"]);
    assert_eq!(run.exit_code, 1);
    assert_output_contains!(run, "missing from the store");
}

#[test]
fn inspect_unknown_image_fails() {
    let env = TestEnv::bot();

    let result = env.run(&["inspect", "ghost"]);

    assert_eq!(result.exit_code, 1);
    assert_output_contains!(result, "image 'ghost' not found");
}
