// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Fixed-width histograms and word counting

use crate::model::StatisticItem;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("word pattern is valid"));

/// Count the frequency of values per bucket of width `width`
///
/// A value `v` falls into the smallest positive multiple of `width` that is
/// not less than `v`, so 0 lands in the first bucket. Buckets are returned in
/// ascending order and each item carries `total`.
pub fn bucketize(values: &[u64], width: u64, total: Option<u64>) -> Vec<StatisticItem> {
    if width == 0 {
        return Vec::new();
    }

    let mut buckets: BTreeMap<u64, u64> = BTreeMap::new();
    for &value in values {
        let bucket = value.div_ceil(width).max(1) * width;
        *buckets.entry(bucket).or_insert(0) += 1;
    }

    buckets
        .into_iter()
        .map(|(bucket, count)| StatisticItem::new(bucket.to_string(), count).with_total(total))
        .collect()
}

/// Number of `\w+` runs in a text
pub fn word_count(text: &str) -> u64 {
    WORD.find_iter(text).count() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERSIONS: [u64; 10] = [1, 2, 3, 5, 11, 15, 17, 19, 20, 50];

    fn keys(items: &[StatisticItem]) -> Vec<&str> {
        items.iter().map(|i| i.key.as_str()).collect()
    }

    #[test]
    fn test_bucket_counts_for_versions() {
        let expected = [(1, 10), (2, 8), (3, 7), (4, 6), (5, 4), (10, 3), (20, 2), (50, 1)];
        for (width, buckets) in expected {
            assert_eq!(
                bucketize(&VERSIONS, width, None).len(),
                buckets,
                "width {}",
                width
            );
        }
    }

    #[test]
    fn test_buckets_are_multiples_in_ascending_order() {
        let items = bucketize(&VERSIONS, 5, Some(42));
        assert_eq!(keys(&items), vec!["5", "15", "20", "50"]);
        assert_eq!(
            items.iter().map(|i| i.value).collect::<Vec<_>>(),
            vec![4, 2, 3, 1]
        );
        assert!(items.iter().all(|i| i.total == Some(42)));
    }

    #[test]
    fn test_frequencies_sum_to_input_length() {
        for width in 1..=60 {
            let items = bucketize(&VERSIONS, width, None);
            let sum: u64 = items.iter().map(|i| i.value).sum();
            assert_eq!(sum, VERSIONS.len() as u64);
            for item in &items {
                let bucket: u64 = item.key.parse().unwrap();
                assert_eq!(bucket % width, 0);
            }
        }
    }

    #[test]
    fn test_zero_goes_to_first_bucket() {
        let items = bucketize(&[0, 0, 3], 5, None);
        assert_eq!(keys(&items), vec!["5"]);
        assert_eq!(items[0].value, 3);
    }

    #[test]
    fn test_empty_input_and_zero_width() {
        assert!(bucketize(&[], 5, None).is_empty());
        assert!(bucketize(&VERSIONS, 0, None).is_empty());
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("Lorem ipsum dolor sit"), 4);
        assert_eq!(word_count("  data-set  v2.0, final! "), 5);
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   "), 0);
        assert_eq!(word_count("Größe der Datei"), 3);
    }

    #[test]
    fn test_word_count_histogram() {
        let texts = [
            "one two three four",
            "one two three four",
            "one two three four",
            "a b c d e f g h",
            "a b c d e f g h",
            "a b c d e f g h",
            "a b c d e f g h",
            "a b c d e f g h",
            "a b c d e f g h",
            "a b c d e f g h i j k l m n o p",
            "a b c d e f g h i j k l m n o p q r s",
            "a b c d e f g h i j k l m n o p q r s",
            "a b c d e f g h i j k l m n o p q r s",
            "a b c d e f g h i j k l m n o p q r s",
        ];
        let counts: Vec<u64> = texts.iter().map(|t| word_count(t)).collect();
        assert_eq!(bucketize(&counts, 1, None).len(), 4);
        assert_eq!(bucketize(&counts, 2, None).len(), 4);
        assert_eq!(bucketize(&counts, 5, None).len(), 3);
        assert_eq!(bucketize(&counts, 10, None).len(), 2);
    }
}
