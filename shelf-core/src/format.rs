//! Display formatting helpers.

/// Format a price with thousands separators, e.g. `15000` → `"15,000"`.
pub fn format_price(price: i64) -> String {
    let digits = price.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if price < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Format the price a buyer pays: the sale price when positive, otherwise
/// the list price.
pub fn format_sale_price(sale_price: i64, price: i64) -> String {
    let effective = if sale_price > 0 { sale_price } else { price };
    format_price(effective)
}

/// Extract the date part of an ISO-8601-like publication date.
///
/// The remote API reports timestamps like `2023-12-25T00:00:00.000+09:00`,
/// but the field is free-form and occasionally malformed. Returns the
/// leading `YYYY-MM-DD` when the string starts with one, otherwise the raw
/// input unchanged.
pub fn format_publication_date(raw: &str) -> &str {
    let Some(prefix) = raw.get(..10) else {
        return raw;
    };
    let bytes = prefix.as_bytes();
    let well_formed = bytes
        .iter()
        .enumerate()
        .all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if well_formed {
        prefix
    } else {
        raw
    }
}
