//! Property tests for matching, grouping and pagination invariants

use std::collections::BTreeMap;
use std::path::PathBuf;

use proptest::prelude::*;
use tempfile::tempdir;

use filehound::core::{CancelToken, NameQuery, NullSink, ResultPages, ScanContext, ScanRequest};
use filehound::dedup::find_duplicates;

proptest! {
    #[test]
    fn wildcard_extension_matches_whole_name(stem in "[a-z0-9_]{1,12}") {
        let query = NameQuery::parse("*.txt").unwrap();
        let plain = format!("{}.txt", stem);
        let backup = format!("{}.txt.bak", stem);
        prop_assert!(query.matches(&plain));
        prop_assert!(!query.matches(&backup));
    }

    #[test]
    fn literal_query_is_case_insensitive_substring(
        prefix in "[A-Za-z]{0,5}",
        suffix in "[A-Za-z_.]{0,6}",
    ) {
        let query = NameQuery::parse("Report").unwrap();
        let name = format!("{}REPORT{}", prefix, suffix);
        prop_assert!(query.matches(&name.to_lowercase()));
        let truncated = format!("{}repo", prefix.to_lowercase());
        prop_assert!(!query.matches(&truncated));
    }

    #[test]
    fn pages_never_repeat_and_cap_at_len(len in 0usize..200, page_size in 1usize..60) {
        let items: Vec<usize> = (0..len).collect();
        let mut pages = ResultPages::new(items.clone(), page_size);

        let mut seen = Vec::new();
        let mut last = 0;
        for _ in 0..(len / page_size + 3) {
            let page = pages.next_page().to_vec();
            prop_assert!(page.len() <= page_size);
            seen.extend(page);

            let rendered = pages.rendered().len();
            prop_assert!(rendered >= last);
            prop_assert!(rendered <= len);
            last = rendered;
        }
        prop_assert_eq!(seen, items);
        prop_assert!(!pages.has_more());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn groups_partition_files_by_content(contents in prop::collection::vec("[ab]{0,3}", 1..10)) {
        let dir = tempdir().unwrap();
        let mut expected: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
        for (i, content) in contents.iter().enumerate() {
            let path = dir.path().join(format!("f{:02}.dat", i));
            std::fs::write(&path, content).unwrap();
            expected.entry(content.clone()).or_default().push(path);
        }

        let request = ScanRequest::builder().root(dir.path()).build().unwrap();
        let cancel = CancelToken::new();
        let ctx = ScanContext::new(&cancel, &NullSink);
        let groups = find_duplicates(&request, &ctx, 1).into_results().unwrap();

        let mut expected: Vec<Vec<PathBuf>> = expected
            .into_values()
            .filter(|paths| paths.len() > 1)
            .collect();
        expected.sort();
        let mut actual: Vec<Vec<PathBuf>> = groups.iter().map(|g| g.paths.clone()).collect();
        actual.sort();
        prop_assert_eq!(actual, expected);

        for group in &groups {
            for path in &group.paths {
                let len = std::fs::metadata(path).unwrap().len();
                prop_assert_eq!(len, group.size);
            }
        }
    }
}
