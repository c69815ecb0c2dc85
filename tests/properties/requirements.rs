//! Property tests for requirements manifest parsing.

use proptest::prelude::*;

use strata::domain::services::{normalize_name, parse_manifest, ManifestLine};

fn package_name() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z][A-Za-z0-9]{0,8}([-_.][A-Za-z0-9]{1,6}){0,2}").unwrap()
}

fn version() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[0-9]{1,3}(\\.[0-9]{1,3}){0,3}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: The manifest parser never panics on arbitrary input.
    #[test]
    fn property_parse_manifest_never_panics(content in "(?s).{0,256}") {
        let _ = parse_manifest(&content);
    }

    /// PROPERTY: `name==version` lines always parse as pinned requirements,
    /// one per line, in order.
    #[test]
    fn property_pinned_lines_parse_as_pinned(
        entries in proptest::collection::btree_map(package_name(), version(), 1..6)
    ) {
        // Normalized names must be unique or the parser rejects duplicates
        let mut seen = std::collections::HashSet::new();
        let entries: Vec<(String, String)> = entries
            .into_iter()
            .filter(|(name, _)| seen.insert(normalize_name(name)))
            .collect();
        let content: String = entries
            .iter()
            .map(|(name, version)| format!("{}=={}\n", name, version))
            .collect();

        let lines = parse_manifest(&content).unwrap();

        prop_assert_eq!(lines.len(), entries.len());
        for (line, (name, version)) in lines.iter().zip(&entries) {
            match line {
                ManifestLine::Requirement(req) => {
                    prop_assert_eq!(&req.name, name);
                    prop_assert!(req.is_pinned());
                    prop_assert_eq!(req.specifiers[0].version.as_str(), version.as_str());
                }
                other => prop_assert!(false, "unexpected line {:?}", other),
            }
        }
    }

    /// PROPERTY: Comments and blank lines never change the parsed requirements.
    #[test]
    fn property_comments_are_transparent(
        name in package_name(),
        version in version(),
        comment in "[A-Za-z0-9 ]{0,20}",
    ) {
        let plain = parse_manifest(&format!("{}=={}\n", name, version)).unwrap();
        let commented = parse_manifest(&format!(
            "# {}\n\n{}=={}  # {}\n",
            comment, name, version, comment
        ))
        .unwrap();

        let strip_line = |lines: Vec<ManifestLine>| -> Vec<String> {
            lines
                .into_iter()
                .map(|l| match l {
                    ManifestLine::Requirement(r) => format!("{}{:?}", r.name, r.specifiers),
                    ManifestLine::Option { text, .. } => text,
                })
                .collect()
        };
        prop_assert_eq!(strip_line(plain), strip_line(commented));
    }

    /// PROPERTY: Name normalization is idempotent.
    #[test]
    fn property_normalize_name_idempotent(name in "[A-Za-z0-9._-]{0,30}") {
        let once = normalize_name(&name);
        prop_assert_eq!(normalize_name(&once), once);
    }
}
