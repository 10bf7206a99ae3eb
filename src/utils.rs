//! Utility functions

use crate::constants::{APP_NAME, EUR_TO_IDR};
use std::path::PathBuf;

/// Get the app data directory (settings, logs)
pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Millisecond timestamp appended to chart URLs so each visit gets fresh images
pub fn cache_bust_token() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Group an integer with `.` thousands separators
fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    if value < 0 {
        out.insert(0, '-');
    }
    out
}

/// Format a reference-currency (EUR) price as rupiah, e.g. `Rp 17.000.000`. `-` when absent.
pub fn format_idr_from_eur(value: Option<f64>) -> String {
    match value {
        Some(eur) => format!("Rp {}", group_thousands((eur * EUR_TO_IDR).round() as i64)),
        None => "-".to_string(),
    }
}

/// Format a reference-currency price with two decimals, e.g. `€ 1,234.50`.
pub fn format_eur(value: Option<f64>) -> String {
    match value {
        Some(eur) => {
            let cents = (eur * 100.0).round() as i64;
            let whole = group_thousands(cents / 100).replace('.', ",");
            format!("€ {}.{:02}", whole, (cents % 100).abs())
        }
        None => "-".to_string(),
    }
}
