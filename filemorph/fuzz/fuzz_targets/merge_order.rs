#![no_main]

use filemorph::merge::{MergeKey, sort_for_merge};
use libfuzzer_sys::fuzz_target;
use std::path::PathBuf;

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);

    let mut paths: Vec<PathBuf> = s.split_whitespace().map(PathBuf::from).collect();
    sort_for_merge(&mut paths);

    let keys: Vec<MergeKey> = paths.iter().map(|p| MergeKey::from_path(p)).collect();

    // Sorted keys never decrease, and unnumbered names come last.
    assert!(keys.windows(2).all(|w| w[0] <= w[1]));
    if let Some(first_unnumbered) = keys.iter().position(|k| *k == MergeKey::Unnumbered) {
        assert!(keys[first_unnumbered..].iter().all(|k| *k == MergeKey::Unnumbered));
    }
});
