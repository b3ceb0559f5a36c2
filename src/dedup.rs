use std::collections::HashSet;

use crate::records::DealRecord;

/// Collapse records to unique (title, url) pairs, keeping the first
/// occurrence and preserving input order. The key is the exact string pair,
/// case-sensitive; any normalization has already happened upstream.
pub fn dedup_records(records: Vec<DealRecord>) -> Vec<DealRecord> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    records
        .into_iter()
        .filter(|r| seen.insert((r.title.clone(), r.url.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(title: &str, url: &str) -> DealRecord {
        DealRecord::new(title.to_string(), url.to_string(), None)
    }

    #[test]
    fn test_first_occurrence_wins() {
        let first = DealRecord::new(
            "만두 세트".to_string(),
            "https://x.kr/p/1".to_string(),
            Some("10% 할인".to_string()),
        );
        let dup = rec("만두 세트", "https://x.kr/p/1");
        let out = dedup_records(vec![first.clone(), dup]);
        assert_eq!(out.len(), 1);
        // First-seen record kept verbatim, label included
        assert_eq!(out[0].discount_label.as_deref(), Some("10% 할인"));
    }

    #[test]
    fn test_unique_input_passes_through_unchanged() {
        let input = vec![
            rec("상품 하나", "https://x.kr/p/1"),
            rec("상품 둘", "https://x.kr/p/2"),
            rec("상품 셋", "https://x.kr/p/3"),
        ];
        assert_eq!(dedup_records(input.clone()), input);
    }

    #[test]
    fn test_idempotent() {
        let input = vec![
            rec("상품 하나", "https://x.kr/p/1"),
            rec("상품 하나", "https://x.kr/p/1"),
            rec("상품 둘", "https://x.kr/p/2"),
            rec("상품 하나", "https://x.kr/p/1"),
        ];
        let once = dedup_records(input);
        let twice = dedup_records(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_key_is_case_sensitive() {
        let input = vec![
            rec("Sale Item", "https://x.kr/p/1"),
            rec("sale item", "https://x.kr/p/1"),
        ];
        assert_eq!(dedup_records(input).len(), 2);
    }

    #[test]
    fn test_same_title_different_url_kept() {
        let input = vec![
            rec("주말 특가", "https://x.kr/p/1"),
            rec("주말 특가", "https://x.kr/p/2"),
        ];
        assert_eq!(dedup_records(input).len(), 2);
    }
}
