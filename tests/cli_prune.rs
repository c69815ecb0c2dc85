//! Integration tests for `strata prune`

mod common;

use common::*;

#[test]
fn prune_removes_superseded_layers_only() {
    let env = TestEnv::bot();
    assert_success!(env.run(&["build"]));
    env.write_context_file("telegram_bot.py", "echo v2\n");
    assert_success!(env.run(&["build"]));
    assert_eq!(env.layer_count(), 9);

    let dry = env.run(&["prune", "--dry-run"]);
    assert_success!(dry);
    assert_output_contains!(dry, "Would remove 2 layers");
    assert_eq!(env.layer_count(), 9);

    let result = env.run(&["prune"]);
    assert_success!(result);
    assert_output_contains!(result, "Removed 2 layers");
    assert_eq!(env.layer_count(), 7);

    // The current image still runs
    assert_eq!(env.run(&["run"]).exit_code, 3);
}

#[test]
fn prune_keeps_layers_of_failed_builds_out() {
    let env = TestEnv::builder()
        .with_file("requirements.txt", "requests==99.0.0\n")
        .build();
    assert!(!env.run(&["build"]).is_success());
    assert_eq!(env.layer_count(), 4);

    let result = env.run(&["prune", "--json"]);

    assert_success!(result);
    let events = result.json_lines();
    assert_eq!(events[0]["layers"].as_array().unwrap().len(), 4);
    assert_eq!(events[0]["kept"], 0);
    assert_eq!(env.layer_count(), 0);
}

#[test]
fn prune_on_empty_store() {
    let env = TestEnv::bot();

    let result = env.run(&["prune"]);

    assert_success!(result);
    assert_output_contains!(result, "Nothing to prune");
}
