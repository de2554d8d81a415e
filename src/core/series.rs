use serde::{Deserialize, Serialize};

/// Raw tabular input: column 0 is X, the remaining columns are Y series.
///
/// Headers are index-aligned with columns but may be shorter; missing labels
/// fall back to [`DataSeries::series_label`]'s generated name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataSeries {
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub columns: Vec<Vec<String>>,
}

impl DataSeries {
    #[must_use]
    pub fn new(columns: Vec<Vec<String>>, headers: Vec<String>) -> Self {
        Self { headers, columns }
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn y_series_count(&self) -> usize {
        self.columns.len().saturating_sub(1)
    }

    /// X column parsed to `f64`, `NaN` for unparsable cells.
    #[must_use]
    pub fn parsed_x(&self) -> Vec<f64> {
        self.columns
            .first()
            .map(|column| parse_column(column))
            .unwrap_or_default()
    }

    /// Every Y column parsed to `f64`, in series order.
    #[must_use]
    pub fn parsed_y(&self) -> Vec<Vec<f64>> {
        self.columns
            .iter()
            .skip(1)
            .map(|column| parse_column(column))
            .collect()
    }

    /// Label of Y series `index` (0-based over Y series).
    #[must_use]
    pub fn series_label(&self, index: usize) -> String {
        match self.headers.get(index + 1) {
            Some(header) if !header.is_empty() => header.clone(),
            _ => format!("Series {}", index + 1),
        }
    }

    /// X axis label: header 0, if present.
    #[must_use]
    pub fn x_label(&self) -> Option<&str> {
        self.headers
            .first()
            .map(String::as_str)
            .filter(|label| !label.is_empty())
    }

    /// Y axis label: headers 1.. joined with `", "`.
    #[must_use]
    pub fn y_label(&self) -> Option<String> {
        if self.headers.len() > 1 {
            Some(self.headers[1..].join(", "))
        } else {
            None
        }
    }
}

#[must_use]
pub fn parse_column(column: &[String]) -> Vec<f64> {
    column.iter().map(|cell| parse_float_lenient(cell)).collect()
}

/// Parses the longest leading decimal literal of `input`, ignoring leading
/// whitespace and trailing garbage (`"12px"` → `12`). `Infinity` is accepted
/// with an optional sign. Anything without a numeric prefix is `NaN`.
#[must_use]
pub fn parse_float_lenient(input: &str) -> f64 {
    let text = input.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    if text[end..].starts_with("Infinity") {
        return if bytes.first() == Some(&b'-') {
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

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
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

    text[..end].parse().unwrap_or(f64::NAN)
}

/// `(min, max)` over the finite values of `values`, `None` when there are
/// none.
#[must_use]
pub fn finite_bounds<'a>(values: impl IntoIterator<Item = &'a f64>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .copied()
        .filter(|value| value.is_finite())
        .fold(None, |acc, value| match acc {
            None => Some((value, value)),
            Some((min, max)) => Some((min.min(value), max.max(value))),
        })
}
