//! Property tests for stage cache keys.
//!
//! Keys chain: every stage key folds in its parent's key, so a change to a
//! stage's inputs moves that key and every key after it, and nothing before.

use proptest::prelude::*;

use strata::application::resolve_recipe;
use strata::domain::entities::{Manifest, SourceFile, SourceTree};
use strata::domain::services::plan_stages;
use strata::domain::value_objects::{CacheKey, ContentHash};
use strata::Config;

fn tree(files: &[(String, String)]) -> SourceTree {
    SourceTree::new(
        "/ctx",
        files
            .iter()
            .map(|(path, content)| SourceFile {
                rel_path: path.clone(),
                hash: ContentHash::from_content(content),
                size: content.len() as u64,
                executable: false,
            })
            .collect(),
    )
}

fn keys(manifest: &str, files: &[(String, String)]) -> Vec<CacheKey> {
    let recipe = resolve_recipe(&Config::default()).unwrap();
    let manifest = Manifest::parse("requirements.txt", manifest).unwrap();
    plan_stages(&recipe, &manifest, &tree(files))
        .stages()
        .iter()
        .map(|s| s.key.clone())
        .collect()
}

fn source_files() -> impl Strategy<Value = Vec<(String, String)>> {
    proptest::collection::vec(("[a-z]{1,8}\\.py", "[ -~]{0,40}"), 1..5)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Editing source never moves the keys of the dependency stages.
    #[test]
    fn property_source_edit_keeps_dependency_keys(
        files in source_files(),
        edit in "[ -~]{1,40}",
    ) {
        let before = keys("requests==2.31.0\n", &files);

        let mut edited = files.clone();
        edited[0].1.push_str(&edit);
        let after = keys("requests==2.31.0\n", &edited);

        prop_assert_eq!(&before[..5], &after[..5]);
        prop_assert_ne!(&before[5], &after[5]);
        prop_assert_ne!(&before[6], &after[6]);
    }

    /// PROPERTY: Changing a pinned version moves the manifest stage and
    /// everything after it, but not the system stages.
    #[test]
    fn property_manifest_edit_keeps_system_keys(
        files in source_files(),
        minor in 0u32..50,
        bump in 1u32..50,
    ) {
        let before = keys(&format!("requests==2.{}.0\n", minor), &files);
        let after = keys(&format!("requests==2.{}.0\n", minor + bump), &files);

        prop_assert_eq!(&before[..3], &after[..3]);
        for i in 3..7 {
            prop_assert_ne!(&before[i], &after[i]);
        }
    }

    /// PROPERTY: Key derivation is deterministic and never collides across
    /// stages of one plan.
    #[test]
    fn property_keys_are_stable_and_distinct(files in source_files()) {
        let first = keys("requests==2.31.0\n", &files);
        let second = keys("requests==2.31.0\n", &files);
        prop_assert_eq!(&first, &second);

        let unique: std::collections::HashSet<_> = first.iter().collect();
        prop_assert_eq!(unique.len(), first.len());
        for key in &first {
            prop_assert_eq!(key.as_str().len(), 64);
        }
    }
}
