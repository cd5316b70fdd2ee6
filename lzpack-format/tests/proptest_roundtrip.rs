//! Property-based round-trip tests.

use std::collections::BTreeMap;
use std::fs;

use lzpack_format::{build, compress_one, extract_all, extract_one, list, read_single};
use lzpack_format::{CompressOptions, DecompressOptions};
use proptest::prelude::*;
use tempfile::TempDir;

/// Distinct, filesystem-safe names mapped to arbitrary contents.
fn entries_strategy() -> impl Strategy<Value = BTreeMap<String, Vec<u8>>> {
    proptest::collection::btree_map(
        "[a-z0-9][a-z0-9_-]{0,11}",
        proptest::collection::vec(any::<u8>(), 0..2048),
        1..6,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn single_file_roundtrip(
        name in "[a-zA-Z0-9][a-zA-Z0-9_-]{0,15}",
        data in proptest::collection::vec(any::<u8>(), 0..4096),
    ) {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        let src = dir.path().join("src").join(&name);
        fs::write(&src, &data).unwrap();

        let archive = compress_one(&src, &CompressOptions::with_output(dir.path().join("archive"))).unwrap();
        let entry = read_single(&archive).unwrap();
        prop_assert_eq!(entry.name.as_deref(), Some(name.as_str()));
        prop_assert_eq!(&entry.data, &data);

        let out = dir.path().join("restored");
        extract_one(&archive, &DecompressOptions::with_output(&out)).unwrap();
        prop_assert_eq!(fs::read(&out).unwrap(), data);
    }

    #[test]
    fn multi_file_roundtrip(entries in entries_strategy()) {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(&src).unwrap();

        // Shuffle away from sorted order so ordering is actually exercised.
        let mut order = entries.keys().cloned().collect::<Vec<_>>();
        order.reverse();

        let sources = order.iter().map(|name| {
            let path = src.join(name);
            fs::write(&path, &entries[name]).unwrap();
            path
        }).collect::<Vec<_>>();

        let archive = dir.path().join("pack.lzma");
        build(&sources, &archive).unwrap();

        let listed = list(&archive).unwrap().into_iter().map(|x| x.name).collect::<Vec<_>>();
        prop_assert_eq!(&listed, &order);

        let out = dir.path().join("out");
        let written = extract_all(&archive, &out).unwrap();
        prop_assert_eq!(written.len(), entries.len());
        for (name, data) in entries.iter() {
            prop_assert_eq!(&fs::read(out.join(name)).unwrap(), data);
        }
    }
}
