// Utility helpers for parsing and basic statistics.
//
// This module centralizes all the "dirty" cell/number/date handling so the
// rest of the code can assume clean, typed values.
use chrono::{NaiveDate, NaiveDateTime};
use num_format::{Locale, ToFormattedString};
use std::cmp::Ordering;

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that are common in spreadsheet exports.
///
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters.
/// - Strips thousands separators like `","` before parsing.
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
                .map(|dt| dt.date())
        })
}

/// Trimmed text, or `fallback` when the cell is empty.
pub fn text_or(s: Option<&str>, fallback: &str) -> String {
    match s.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => fallback.to_string(),
    }
}

pub fn mean(v: &[f64]) -> Option<f64> {
    if v.is_empty() {
        return None;
    }
    let sum: f64 = v.iter().copied().sum();
    Some(sum / v.len() as f64)
}

pub fn median(mut v: Vec<f64>) -> Option<f64> {
    // Takes the vector by value so it can be sorted in place.
    if v.is_empty() {
        return None;
    }
    v.sort_by(f64::total_cmp);
    let mid = v.len() / 2;
    if v.len() % 2 == 1 {
        Some(v[mid])
    } else {
        Some((v[mid - 1] + v[mid]) / 2.0)
    }
}

/// Most frequent value; among equally frequent values the smallest wins.
pub fn mode(mut v: Vec<f64>) -> Option<f64> {
    if v.is_empty() {
        return None;
    }
    v.sort_by(f64::total_cmp);
    let mut best = v[0];
    let mut best_count = 0usize;
    let mut i = 0usize;
    while i < v.len() {
        let mut j = i + 1;
        while j < v.len() && v[j].total_cmp(&v[i]) == Ordering::Equal {
            j += 1;
        }
        // Strictly greater keeps the first (smallest) run on ties.
        if j - i > best_count {
            best = v[i];
            best_count = j - i;
        }
        i = j;
    }
    Some(best)
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals with locale-aware thousands separators, e.g. `1,234,567.89`.
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    // Only a value that still shows a non-zero digit keeps its sign.
    let shows_nonzero = s.chars().any(|c| c.is_ascii_digit() && c != '0');
    if n.is_sign_negative() && shows_nonzero {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

/// Shortest plain rendering of a number (`1200` rather than `1200.0`).
pub fn format_plain(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    n.to_string()
}

/// Abbreviate a large number with a K/M/B/T suffix, dropping trailing
/// zeros from the fractional part (`1,250,000` -> `1.25M`, `2,000` -> `2K`).
pub fn abbreviate(n: f64, decimals: usize) -> String {
    let sign = if n < 0.0 { "-" } else { "" };
    let abs_n = n.abs();
    let (scaled, suffix) = if abs_n < 1e3 {
        (abs_n, "")
    } else if abs_n < 1e6 {
        (abs_n / 1e3, "K")
    } else if abs_n < 1e9 {
        (abs_n / 1e6, "M")
    } else if abs_n < 1e12 {
        (abs_n / 1e9, "B")
    } else if abs_n < 1e15 {
        (abs_n / 1e12, "T")
    } else {
        return format!("{}{}", sign, format_plain(abs_n));
    };
    let digits = format!("{:.*}", decimals, scaled);
    let digits = if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        digits
    };
    if digits == "0" {
        return digits;
    }
    format!("{}{}{}", sign, digits, suffix)
}
