//! Brazilian real amounts as typed into RD forms.
//!
//! Amounts arrive as `"R$ 1.234,56"` style strings: `.` groups thousands and
//! `,` separates decimals. Anything that does not parse is `None`; the
//! aggregator treats that like a non-positive amount and skips it.

use serde::{Deserialize, Serialize};

/// Parse a locale-formatted amount.
///
/// Strips the currency symbol and whitespace, drops every `.`, then reads
/// `,` as the decimal separator.
///
/// ```
/// use canteiro::costs::parse_brl;
///
/// assert_eq!(parse_brl("R$ 1.234,56"), Some(1234.56));
/// assert_eq!(parse_brl("abc"), None);
/// ```
pub fn parse_brl(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .replace("R$", "")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    parse_finite(&cleaned)
}

/// Parse a plain decimal string such as `"150.5"`.
fn parse_plain(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    parse_finite(&cleaned)
}

fn parse_finite(cleaned: &str) -> Option<f64> {
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// An amount that may be stored either as a JSON number or as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MoneyValue {
    Number(f64),
    Text(String),
}

impl MoneyValue {
    /// Numeric value, if any.
    ///
    /// Text containing a `,` or the `R$` symbol is read in locale format;
    /// bare text is read as a plain decimal, so `"150.50"` is 150.5.
    pub fn amount(&self) -> Option<f64> {
        match self {
            MoneyValue::Number(n) => Some(*n).filter(|v| v.is_finite()),
            MoneyValue::Text(s) if s.contains(',') || s.contains("R$") => parse_brl(s),
            MoneyValue::Text(s) => parse_plain(s),
        }
    }
}

impl From<f64> for MoneyValue {
    fn from(value: f64) -> Self {
        MoneyValue::Number(value)
    }
}

impl From<&str> for MoneyValue {
    fn from(value: &str) -> Self {
        MoneyValue::Text(value.to_string())
    }
}

/// Render as `R$ 1.234,56`.
pub fn format_brl(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let (whole, frac) = (cents / 100, cents % 100);

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}R$ {grouped},{frac:02}")
}
