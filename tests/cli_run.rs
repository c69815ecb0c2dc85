//! Integration tests for `strata run`

mod common;

use common::*;

#[test]
fn run_starts_entry_in_workdir_and_mirrors_exit_code() {
    let env = TestEnv::bot();
    assert_success!(env.run(&["build"]));

    let result = env.run(&["run", "--", "--polling"]);

    assert_eq!(result.exit_code, 3);
    assert!(result.stdout.contains("bot started --polling"), "{}", result.stdout);
}

#[test]
fn run_by_name_from_anywhere() {
    let env = TestEnv::bot();
    assert_success!(env.run(&["build", "-t", "support-bot"]));
    let elsewhere = tempfile::tempdir().unwrap();

    let result = env.run_from(elsewhere.path(), &["run", "support-bot"]);

    assert_eq!(result.exit_code, 3);
}

#[test]
fn run_sees_installed_dependency_layer() {
    let env = TestEnv::builder()
        .with_file(
            "telegram_bot.py",
            "test -f \"$STRATA_ROOT/installed.txt\" && echo deps-present\n",
        )
        .build();
    assert_success!(env.run(&["build"]));

    let result = env.run(&["run"]);

    assert_success!(result);
    assert!(result.stdout.contains("deps-present"), "{}", result.stdout);
}

#[test]
fn run_before_build_fails() {
    let env = TestEnv::bot();

    let result = env.run(&["run"]);

    assert_eq!(result.exit_code, 1);
    assert_output_contains!(result, "image 'bot' not found");
}

#[test]
fn renamed_entry_script_builds_with_warning_and_fails_at_run() {
    let env = TestEnv::bot();
    env.rename_context_file("telegram_bot.py", "bot.py");

    let build = env.run(&["build"]);
    assert_success!(build);
    assert_output_contains!(build, "warning:");

    let run = env.run(&["run"]);
    assert_eq!(run.exit_code, 1);
    assert_output_contains!(run, "entry script not found: telegram_bot.py");
}
