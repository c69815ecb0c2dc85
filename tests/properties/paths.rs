//! Property tests for image working directories.

use std::path::Path;

use proptest::prelude::*;

use strata::domain::value_objects::Workdir;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: A parsed workdir always lands under the root it is placed in.
    #[test]
    fn property_workdir_never_escapes_root(raw in "[a-z./]{0,30}") {
        let root = Path::new("/store/tmp/stage-1");
        if let Ok(workdir) = Workdir::parse(&raw) {
            let placed = workdir.under(root);
            prop_assert!(placed.starts_with(root));
            prop_assert!(!placed.components().any(|c| c.as_os_str() == ".."));
        }
    }

    /// PROPERTY: Parsing is idempotent on its own output.
    #[test]
    fn property_workdir_parse_idempotent(raw in "/[a-z./]{0,30}") {
        if let Ok(workdir) = Workdir::parse(&raw) {
            let again = Workdir::parse(workdir.as_str()).unwrap();
            prop_assert_eq!(again, workdir);
        }
    }
}
