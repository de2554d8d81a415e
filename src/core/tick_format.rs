//! Tick generation and tiered tick-label formatting.
//!
//! Label tiers trade density for precision and are kept byte-for-byte stable
//! because saved charts are compared visually against earlier exports.

use super::scale::ScaleKind;

/// Tick values in data units for one axis.
///
/// Log scales emit every power of ten between `floor(log10 min)` and
/// `ceil(log10 max)` that falls inside `[min, max]`; `frequency` is ignored.
/// Linear scales emit exactly `frequency` evenly spaced ticks including both
/// endpoints.
///
/// # Preconditions
///
/// Linear mode divides by `frequency - 1`: callers must pass `frequency >= 2`
/// (the settings layer enforces this). `frequency == 1` yields a `NaN` tick.
#[must_use]
pub fn generate_ticks(min: f64, max: f64, frequency: usize, scale: ScaleKind) -> Vec<f64> {
    match scale {
        ScaleKind::Log => {
            let low = min.log10().floor();
            let high = max.log10().ceil();
            if !low.is_finite() || !high.is_finite() {
                return Vec::new();
            }

            let mut ticks = Vec::new();
            let mut exponent = low as i32;
            while f64::from(exponent) <= high {
                let value = 10f64.powf(f64::from(exponent));
                if value >= min && value <= max {
                    ticks.push(value);
                }
                exponent += 1;
            }
            ticks
        }
        ScaleKind::Linear => {
            let step = (max - min) / (frequency as f64 - 1.0);
            (0..frequency).map(|i| min + step * i as f64).collect()
        }
    }
}

/// Formats a tick value for display.
///
/// * `0` is always `"0"`.
/// * Log: `>= 1000` or `<= 0.001` use one-significant-digit exponent
///   notation (`1e+3`), everything else plain decimal.
/// * Linear: `< 0.01` → `1.23e-3`, `< 1` → three decimals, `< 100` → two
///   decimals, otherwise a rounded integer.
#[must_use]
pub fn format_tick_label(value: f64, scale: ScaleKind) -> String {
    if value == 0.0 {
        return "0".to_owned();
    }

    match scale {
        ScaleKind::Log => {
            if value >= 1000.0 || value <= 0.001 {
                format_exponential(value, 0)
            } else {
                format_plain(value)
            }
        }
        ScaleKind::Linear => {
            let magnitude = value.abs();
            if magnitude < 0.01 {
                format_exponential(value, 2)
            } else if magnitude < 1.0 {
                format_fixed(value, 3)
            } else if magnitude < 100.0 {
                format_fixed(value, 2)
            } else {
                format_plain(round_half_up(value))
            }
        }
    }
}

/// Shortest round-trip decimal (`10`, `0.5`, `133.33333333333334`).
#[must_use]
pub fn format_plain(value: f64) -> String {
    if value == 0.0 {
        // Avoid "-0".
        return "0".to_owned();
    }
    format!("{value}")
}

/// Fraction digits that print any finite `f64` exactly.
const EXACT_FRACTION_DIGITS: usize = 1074;

/// Significant digits that print any finite `f64` exactly.
const EXACT_SIGNIFICANT_DIGITS: usize = 767;

/// Exponent notation with `digits` fraction digits and an explicitly signed
/// exponent (`5.00e-3`, `1e+3`). Exact ties round away from zero.
#[must_use]
pub fn format_exponential(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return format_plain(value);
    }

    let magnitude = value.abs();
    let exact = format!("{:.*e}", EXACT_SIGNIFICANT_DIGITS, magnitude);
    let fraction = exact
        .split_once('e')
        .and_then(|(mantissa, _)| mantissa.split_once('.'))
        .map_or("", |(_, fraction)| fraction);
    let magnitude = away_from_zero_on_tie(magnitude, fraction, digits);

    let raw = format!("{:.*e}", digits, magnitude);
    let sign = if value < 0.0 { "-" } else { "" };
    match raw.split_once('e') {
        Some((mantissa, exponent)) if exponent.starts_with('-') => {
            format!("{sign}{mantissa}e{exponent}")
        }
        Some((mantissa, exponent)) => format!("{sign}{mantissa}e+{exponent}"),
        None => format!("{sign}{raw}"),
    }
}

/// Fixed-point decimal with exact ties rounded away from zero.
///
/// Ties are decided on the exact binary value, so `1.115` (stored just below
/// the tie) gives `"1.11"` while `1.125` gives `"1.13"`.
#[must_use]
pub fn format_fixed(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return format_plain(value);
    }

    let magnitude = value.abs();
    let exact = format!("{:.*}", EXACT_FRACTION_DIGITS, magnitude);
    let fraction = exact.split_once('.').map_or("", |(_, fraction)| fraction);
    let magnitude = away_from_zero_on_tie(magnitude, fraction, digits);

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{:.*}", digits, magnitude)
}

/// Nudges a non-negative `magnitude` one ulp up when its exact decimal
/// `fraction` sits on a tie after `digits` places. The formatter rounds ties
/// to even; any value past the tie rounds away from zero instead.
fn away_from_zero_on_tie(magnitude: f64, fraction: &str, digits: usize) -> f64 {
    let mut dropped = fraction.get(digits..).unwrap_or("").chars();
    let is_tie = dropped.next() == Some('5') && dropped.all(|c| c == '0');
    if !is_tie {
        return magnitude;
    }

    let next = f64::from_bits(magnitude.to_bits() + 1);
    if next.is_finite() { next } else { magnitude }
}

fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}
