//! Human-readable figures for KPI cards and chart labels.

use rust_decimal::{Decimal, RoundingStrategy};

const MILLION: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);
const THOUSAND: Decimal = Decimal::from_parts(1_000, 0, 0, false, 0);

/// Compact currency: `$1.5M`, `$2.5K`, `$42.50`.
///
/// Thresholds apply to the magnitude, so negatives render as `-$1.5M`.
/// Exact ties round to even: `1250` is `$1.2K`.
pub fn format_value(value: Decimal) -> String {
    let magnitude = value.abs();
    let body = if magnitude >= MILLION {
        format!("{}M", fixed(magnitude / MILLION, 1))
    } else if magnitude >= THOUSAND {
        format!("{}K", fixed(magnitude / THOUSAND, 1))
    } else {
        fixed(magnitude, 2)
    };
    signed(value, body)
}

/// Full currency with separators: `$1,234.56`.
pub fn format_currency(value: Decimal) -> String {
    let text = fixed(value.abs(), 2);
    let body = match text.split_once('.') {
        Some((whole, frac)) => format!("{}.{}", group_thousands(whole), frac),
        None => group_thousands(&text),
    };
    signed(value, body)
}

/// Integer with separators: `12,345`.
pub fn format_count(count: usize) -> String {
    group_thousands(&count.to_string())
}

fn signed(value: Decimal, body: String) -> String {
    if value.is_sign_negative() && !value.is_zero() {
        format!("-${}", body)
    } else {
        format!("${}", body)
    }
}

fn fixed(value: Decimal, dp: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(dp);
    rounded.to_string()
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
