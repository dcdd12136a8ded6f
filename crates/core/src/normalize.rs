use std::sync::OnceLock;

use regex::Regex;

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

// "2x9.99", "1.5kg-4.20", "3 BUC X 2.50": leading amount, optional unit
// letters, any separator, trailing amount.
re!(re_quantity_unit_price, r"^([\d.]+)[A-Za-z\-]*[^\d]*([\d.]+)$");
re!(re_number_run, r"[\d.]+");

/// Drop spaces and turn decimal commas into dots.
fn clean(text: &str) -> String {
    text.replace(',', ".").replace(' ', "")
}

/// Split a quantity fragment into `(quantity, unit_price)`.
///
/// Never fails: when the fragment does not carry two numeric groups the
/// cleaned text is returned as the quantity and the unit price is `None`.
pub fn split_quantity(text: &str) -> (String, Option<String>) {
    let cleaned = clean(text);
    match re_quantity_unit_price().captures(&cleaned) {
        Some(c) => {
            let quantity = c.get(1).map_or("", |m| m.as_str()).to_string();
            let unit_price = c.get(2).map(|m| m.as_str().to_string());
            (quantity, unit_price)
        }
        None => (cleaned, None),
    }
}

/// Pull the first numeric run out of a price fragment.
///
/// Returns `text` unchanged when it contains no digits or dots at all.
pub fn clean_price(text: &str) -> String {
    let cleaned = clean(text);
    match re_number_run().find(&cleaned) {
        Some(m) => m.as_str().to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── split_quantity ───────────────────────────────────────────────────────

    #[test]
    fn split_quantity_times_unit_price() {
        assert_eq!(split_quantity("2x9,99"), ("2".to_string(), Some("9.99".to_string())));
    }

    #[test]
    fn split_quantity_with_unit_and_spaces() {
        assert_eq!(
            split_quantity("1,500 KG X 4,20"),
            ("1.500".to_string(), Some("4.20".to_string()))
        );
        assert_eq!(
            split_quantity("3 BUC x 2.50"),
            ("3".to_string(), Some("2.50".to_string()))
        );
    }

    #[test]
    fn split_quantity_single_group_is_unparsed() {
        assert_eq!(split_quantity("3 buc"), ("3buc".to_string(), None));
    }

    #[test]
    fn split_quantity_without_digits_is_unparsed() {
        assert_eq!(split_quantity("buc"), ("buc".to_string(), None));
        assert_eq!(split_quantity(""), (String::new(), None));
    }

    #[test]
    fn split_quantity_bare_number_splits_greedily() {
        // No separator: the leading group keeps all but the last digit.
        assert_eq!(split_quantity("29.99"), ("29.9".to_string(), Some("9".to_string())));
    }

    // ── clean_price ──────────────────────────────────────────────────────────

    #[test]
    fn clean_price_strips_currency() {
        assert_eq!(clean_price("9,99 RON"), "9.99");
        assert_eq!(clean_price("TOTAL 1 234,50"), "1234.50");
    }

    #[test]
    fn clean_price_takes_first_run() {
        assert_eq!(clean_price("12.00 A 3.00"), "12.00");
    }

    #[test]
    fn clean_price_without_digits_returns_input() {
        assert_eq!(clean_price("RON"), "RON");
        assert_eq!(clean_price("lei lei"), "lei lei");
    }
}
