//! Exponential decay calculator: `Vi = V0 · (1+K)^(−i)` for `i ∈ [0, N]`.

use serde::{Deserialize, Serialize};

use crate::{Locale, PhytoError};

pub const V0_MIN: f64 = 0.0;
pub const V0_MAX: f64 = 1e9;
pub const K_MIN: f64 = -0.99;
pub const K_MAX: f64 = 1e6;
pub const N_MIN: i64 = 0;
pub const N_MAX: i64 = 20;

/// Restrict `v` to `[min, max]`. Unlike `f64::clamp` this never panics, and
/// a NaN input stays NaN so callers can reject it afterwards.
pub fn clamp(v: f64, min: f64, max: f64) -> f64 {
    if v.is_nan() {
        return v;
    }
    v.max(min).min(max)
}

/// Parse the longest numeric prefix of `text` (`" 12.5kg"` → 12.5). Returns
/// NaN when no prefix parses.
pub fn parse_float(text: &str) -> f64 {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return f64::NAN;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].trim_end_matches('.').parse().unwrap_or(f64::NAN)
}

/// Parse the leading base-10 integer of `text` (`"7.9"` → 7). Values outside
/// the `i64` range saturate.
pub fn parse_int(text: &str) -> Option<i64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    let negative = bytes.first() == Some(&b'-');
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    Some(s[..end].parse().unwrap_or(if negative { i64::MIN } else { i64::MAX }))
}

/// Validated calculator input, every value already within its bounds.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct CalcInput {
    pub v0: f64,
    pub k: f64,
    pub n: u32,
}

impl CalcInput {
    /// Clamp raw values to their bounds. Fails when V0 or K is NaN after
    /// clamping; infinities clamp to the nearest bound.
    pub fn new(v0: f64, k: f64, n: i64) -> Result<Self, PhytoError> {
        let v0 = clamp(v0, V0_MIN, V0_MAX);
        let k = clamp(k, K_MIN, K_MAX);
        if !v0.is_finite() {
            return Err(PhytoError::InvalidInput("V0 is not a number".into()));
        }
        if !k.is_finite() {
            return Err(PhytoError::InvalidInput("K is not a number".into()));
        }
        let n = n.clamp(N_MIN, N_MAX) as u32;
        Ok(Self { v0, k, n })
    }

    /// Build the input from the three raw form fields.
    pub fn from_fields(v0: &str, k: &str, n: &str) -> Result<Self, PhytoError> {
        let n = parse_int(n)
            .ok_or_else(|| PhytoError::InvalidInput(format!("N '{}' is not an integer", n.trim())))?;
        Self::new(parse_float(v0), parse_float(k), n)
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct SeriesPoint {
    pub i: u32,
    pub vi: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Series {
    pub input: CalcInput,
    pub points: Vec<SeriesPoint>,
}

impl Series {
    pub fn last(&self) -> Option<&SeriesPoint> {
        self.points.last()
    }

    pub fn is_decreasing(&self) -> bool {
        self.input.k >= 0.0
    }
}

pub fn compute_series(input: &CalcInput) -> Result<Series, PhytoError> {
    let base = 1.0 + input.k;
    let mut points = Vec::with_capacity(input.n as usize + 1);
    for i in 0..=input.n {
        let vi = input.v0 * base.powf(-(i as f64));
        if !vi.is_finite() {
            return Err(PhytoError::NonFinite(i));
        }
        points.push(SeriesPoint { i, vi });
    }
    Ok(Series {
        input: *input,
        points,
    })
}

/// One rendered row of the results table.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TableRow {
    pub index: String,
    pub value: String,
}

pub fn table_rows(series: &Series) -> Vec<TableRow> {
    series
        .points
        .iter()
        .map(|p| TableRow {
            index: p.i.to_string(),
            value: to_fixed4(p.vi),
        })
        .collect()
}

/// Summary sentence shown under the chart.
pub fn conclusion(series: &Series, locale: Locale) -> String {
    let input = &series.input;
    let last = to_fixed4(series.last().map(|p| p.vi).unwrap_or(input.v0));
    let decreasing = series.is_decreasing();
    let v0 = format_number(input.v0);
    let k = format_number(input.k);
    match locale {
        Locale::Ru => {
            let trend = if decreasing { "снижается" } else { "возрастает" };
            format!(
                "После {} обработок уровень Vi {trend} от начального V0={v0} до ~{last} при коэффициенте K={k}.",
                input.n
            )
        }
        Locale::En => {
            let trend = if decreasing { "decreases" } else { "increases" };
            format!(
                "After {} treatments the level Vi {trend} from the initial V0={v0} to ~{last} with coefficient K={k}.",
                input.n
            )
        }
    }
}

/// Shortest round-trip rendering, switching to exponent notation for very
/// small or very large magnitudes (`1e-7`, `2.5e+21`).
pub fn format_number(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    if !v.is_finite() {
        return non_finite(v).to_string();
    }
    let magnitude = v.abs();
    if magnitude < 1e-6 || magnitude >= 1e21 {
        exponent_form(v)
    } else {
        format!("{v}")
    }
}

/// Four fixed decimals, rounding exact ties away from zero (`0.03125` →
/// `0.0313`). Magnitudes of 1e21 and above use [`format_number`].
pub fn to_fixed4(v: f64) -> String {
    if !v.is_finite() || v.abs() >= 1e21 {
        return format_number(v);
    }
    if v == 0.0 {
        return "0.0000".to_string();
    }
    // A tie at the fifth decimal is exactly an odd multiple of 1/32.
    let thirty_seconds = v.abs() * 32.0;
    if thirty_seconds.fract() == 0.0 && thirty_seconds % 2.0 == 1.0 {
        let units = (thirty_seconds as u64 * 625 + 1) / 2;
        let sign = if v < 0.0 { "-" } else { "" };
        return format!("{sign}{}.{:04}", units / 10_000, units % 10_000);
    }
    format!("{v:.4}")
}

fn exponent_form(v: f64) -> String {
    let text = format!("{v:e}");
    match text.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => text,
    }
}

fn non_finite(v: f64) -> &'static str {
    if v.is_nan() {
        "NaN"
    } else if v > 0.0 {
        "Infinity"
    } else {
        "-Infinity"
    }
}
