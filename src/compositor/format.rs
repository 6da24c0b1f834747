//! Value formatting shared by the document routines.

use super::glyphs::fold_to_ascii;
use crate::record::FieldValue;

/// Format a record value as dollars, e.g. `$1,234.50`.
///
/// Anything that does not parse as a finite number renders as `$0.00`.
pub fn format_currency(value: &FieldValue) -> String {
    format_amount(value.as_number().unwrap_or(0.0))
}

/// Format an amount with thousands separators and two decimals.
pub fn format_amount(amount: f64) -> String {
    if !amount.is_finite() {
        return "$0.00".to_string();
    }

    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let negative = amount < 0.0 && fixed != "0.00";
    format!("{}${}.{}", if negative { "-" } else { "" }, grouped, cents)
}

/// Reduce a party name to a lowercase, dash-separated file name stem.
///
/// Accented letters are folded to ASCII first.
pub fn sanitize_filename(name: &str, fallback: &str) -> String {
    let stem = fold_to_ascii(name)
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-");

    if stem.is_empty() {
        return fallback.to_string();
    }
    stem.chars().take(60).collect::<String>().trim_end_matches('-').to_string()
}
