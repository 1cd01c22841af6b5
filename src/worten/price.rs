//! Price text parsing for Portuguese and mixed-locale formats.

use regex_lite::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

/// First numeric substring, sign included so negatives are rejected below
/// instead of being read as positive.
static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-?\d+(\.\d+)?").unwrap());

/// Parses a price from display text like `"12,50€"`, `"1.234,56 EUR"` or
/// `"19.99"`.
///
/// Currency symbols and whitespace are stripped first. When both `,` and `.`
/// are present, `.` is a thousands separator and `,` the decimal separator;
/// a lone `,` is the decimal separator. Returns `None` when no positive
/// number can be extracted.
pub fn parse_price(text: &str) -> Option<Decimal> {
    if text.is_empty() {
        return None;
    }

    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(*c, '€' | 'E' | 'U' | 'R') && !c.is_whitespace())
        .collect();

    let normalized = if cleaned.contains(',') && cleaned.contains('.') {
        // EU format: 1.234,56 -> 1234.56
        cleaned.replace('.', "").replace(',', ".")
    } else if cleaned.contains(',') {
        cleaned.replace(',', ".")
    } else {
        cleaned
    };

    let matched = NUMBER.find(&normalized)?;
    let value = Decimal::from_str(matched.as_str()).ok()?;

    (value > Decimal::ZERO).then_some(value)
}
