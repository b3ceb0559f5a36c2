use regex::Regex;
use std::sync::LazyLock;

// Won amounts: "₩12,000", "3,000원 할인", "15000원 쿠폰". Comma-grouped
// amounts may drop the 원; bare digit runs (2-6 digits) must carry it.
static KRW_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)([₩￦]?[0-9]{1,3}(?:,[0-9]{3})+\s*원?\s*(?:할인|쿠폰|즉시할인)?|[0-9]{2,6}\s*원\s*(?:할인|쿠폰|즉시할인)?)",
    )
    .expect("krw pattern should be valid")
});

// Percent-off: "10% 할인", "25 % OFF"
static PERCENT_OFF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9]{1,2}\s*%\s*(?:할인|off))").expect("percent pattern should be valid")
});

// Costco-style "Instant Savings: ₩5,000" labels
static INSTANT_SAVINGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(Instant\s+Savings\s*[:\-]?\s*[₩￦]?[0-9,]+)")
        .expect("instant savings pattern should be valid")
});

/// Finds a human-readable discount label in a text fragment.
///
/// Pattern categories are tried in a fixed priority order - currency amount,
/// then percent-off, then "Instant Savings" - and the FIRST category with a
/// match wins; later categories are not consulted even if they would match
/// earlier in the text. `None` means "no recognizable discount", which is a
/// normal outcome, not an error; callers render a placeholder for it.
pub fn extract_label(text: &str) -> Option<String> {
    for pattern in [&*KRW_AMOUNT, &*PERCENT_OFF, &*INSTANT_SAVINGS] {
        if let Some(m) = pattern.find(text) {
            return Some(normalize_label(m.as_str()));
        }
    }
    None
}

/// Collapse internal whitespace runs to single spaces and trim
fn normalize_label(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_won_amount_with_qualifier() {
        assert_eq!(
            extract_label("신라면 멀티팩 3,000원 할인 행사"),
            Some("3,000원 할인".to_string())
        );
        assert_eq!(
            extract_label("즉시할인 쿠폰: 15000원 쿠폰 증정"),
            Some("15000원 쿠폰".to_string())
        );
    }

    #[test]
    fn test_won_symbol_amount() {
        assert_eq!(extract_label("가격 ₩12,000 한정"), Some("₩12,000".to_string()));
    }

    #[test]
    fn test_percent_off() {
        assert_eq!(extract_label("전 품목 15% 할인"), Some("15% 할인".to_string()));
        assert_eq!(extract_label("Up to 25 % OFF today"), Some("25 % OFF".to_string()));
    }

    #[test]
    fn test_instant_savings() {
        assert_eq!(
            extract_label("Member only Instant Savings: ₩5,000 at checkout"),
            Some("Instant Savings: ₩5,000".to_string())
        );
    }

    #[test]
    fn test_currency_category_beats_percent() {
        // Both categories match; the currency category is tried first and
        // wins regardless of position in the text.
        assert_eq!(
            extract_label("3,000원 할인 (10% off 별도)"),
            Some("3,000원 할인".to_string())
        );
        assert_eq!(
            extract_label("10% off 쿠폰 적용 시 3,000원 할인"),
            Some("3,000원 할인".to_string())
        );
    }

    #[test]
    fn test_no_discount_yields_none() {
        assert_eq!(extract_label("코스트코 신상품 입고 안내"), None);
        assert_eq!(extract_label(""), None);
    }

    #[test]
    fn test_whitespace_collapsed_and_trimmed() {
        assert_eq!(
            extract_label("가전 기획전  5,000원 \n 즉시할인  "),
            Some("5,000원 즉시할인".to_string())
        );
    }
}
