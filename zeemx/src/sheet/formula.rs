//! Formula evaluation
//!
//! The only supported formula is a single-column range sum,
//! `=SUM(A1:A5)`. Evaluation is a flat scan of the referenced raw cells;
//! referenced formulas are not evaluated, so self-references cannot loop.

use super::Grid;
use crate::config::{FORMULA_ERROR, FORMULA_MARKER, SHEET_COLS, SHEET_ROWS};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SUM_RANGE: Regex = Regex::new(r"SUM\(([A-Z])(\d+):([A-Z])(\d+)\)").unwrap();
}

/// Display value for a raw cell string
pub fn evaluate(raw: &str, grid: &Grid) -> String {
    let Some(body) = raw.strip_prefix(FORMULA_MARKER) else {
        return raw.to_string();
    };

    match sum_range(&body.to_uppercase(), grid) {
        Some(total) => format_number(total),
        None => FORMULA_ERROR.to_string(),
    }
}

fn sum_range(body: &str, grid: &Grid) -> Option<f64> {
    if !body.starts_with("SUM(") {
        return None;
    }
    let caps = SUM_RANGE.captures(body)?;

    let col = column_index(&caps[1])?;
    if column_index(&caps[3])? != col {
        return None;
    }
    let row_start: usize = caps[2].parse().ok()?;
    let row_end: usize = caps[4].parse().ok()?;

    // Reversed range: nothing to add
    if row_end < row_start {
        return Some(0.0);
    }
    if row_start == 0 || row_end > SHEET_ROWS {
        return None;
    }

    let total: f64 = (row_start - 1..row_end)
        .filter_map(|row| grid.get(row, col))
        .filter_map(parse_float)
        .sum();
    Some(total)
}

fn column_index(letter: &str) -> Option<usize> {
    let byte = *letter.as_bytes().first()?;
    let col = byte.checked_sub(b'A')? as usize;
    (col < SHEET_COLS).then_some(col)
}

/// Parse the longest numeric prefix, the way JavaScript's `parseFloat`
/// does: leading whitespace skipped, optional sign, `Infinity` accepted,
/// trailing garbage ignored. `None` when no number starts the string.
pub fn parse_float(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return Some(if bytes[0] == b'-' {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - end - 1;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

/// Format a number the way JavaScript prints it (`5`, `2.5`, `1e+21`)
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return value.to_string();
    }

    let formatted = format!("{:e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => formatted,
    }
}
