/// Top of the value axis: 10% headroom over the largest value, never below
/// `floor`, and never a degenerate zero-height axis.
pub fn value_axis_max(values: impl IntoIterator<Item = f64>, floor: Option<f64>) -> f64 {
    let max = values.into_iter().filter(|v| v.is_finite()).fold(0.0_f64, f64::max);
    let padded = if max > 0.0 { max * 1.1 } else { 1.0 };
    floor.map_or(padded, |f| padded.max(f))
}

/// Axis bounds that keep every x value half a unit away from the edge.
pub fn x_bounds(xs: impl IntoIterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = xs
        .into_iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| (lo.min(x), hi.max(x)));
    if lo > hi {
        (0.0, 1.0)
    } else {
        (lo - 0.5, hi + 0.5)
    }
}

/// Label of the category at axis position `x`, empty between categories.
pub fn category_label(x: f64, labels: &[String]) -> String {
    let idx = x.round();
    if (x - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

/// Whole-number tick label, empty for fractional positions.
pub fn integer_label(x: f64) -> String {
    if (x - x.round()).abs() < 1e-6 {
        format!("{}", x.round() as i64)
    } else {
        String::new()
    }
}
