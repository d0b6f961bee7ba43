//! Raw price text to integer conversion.

/// Reserved price meaning "the page showed no parseable price".
///
/// A product carrying this value never satisfies a range filter.
pub const UNPARSEABLE_PRICE: i64 = i64::MIN;

/// Parses scraped price text into an integer price.
///
/// All whitespace is removed first (prices are rendered with thin or
/// non-breaking group separators). What remains must be a non-empty run of
/// ASCII digits that fits in `i64`; anything else yields
/// [`UNPARSEABLE_PRICE`].
#[must_use]
pub fn parse_price(raw: &str) -> i64 {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

    if compact.is_empty() || !compact.bytes().all(|b| b.is_ascii_digit()) {
        return UNPARSEABLE_PRICE;
    }

    compact.parse().unwrap_or(UNPARSEABLE_PRICE)
}
