//! Utility functions for visualization: colors, axis ranges, tick labels.

use crate::format::format_number;
use chrono::{Duration, NaiveDate};
use plotters::prelude::*;

use super::text::estimate_text_width_px;

/// Microsoft Office (2013+) chart series palette.
/// Order: Blue, Orange, Gray, Gold, Light Blue, Green, Dark Blue, Dark Orange, Dark Gray, Brownish Gold.
const OFFICE10: [RGBColor; 10] = [
    RGBColor(68, 114, 196),  // blue      (#4472C4)
    RGBColor(237, 125, 49),  // orange    (#ED7D31)
    RGBColor(165, 165, 165), // gray      (#A5A5A5)
    RGBColor(255, 192, 0),   // gold      (#FFC000)
    RGBColor(91, 155, 213),  // light blue(#5B9BD5)
    RGBColor(112, 173, 71),  // green     (#70AD47)
    RGBColor(38, 68, 120),   // dark blue (#264478)
    RGBColor(158, 72, 14),   // dark org. (#9E480E)
    RGBColor(99, 99, 99),    // dark gray (#636363)
    RGBColor(153, 115, 0),   // brownish  (#997300)
];

/// Get a color from the Office palette.
#[inline]
pub fn office_color(idx: usize) -> RGBColor {
    OFFICE10[idx % OFFICE10.len()]
}

/// Tick label for the value axis: fewer decimals for larger magnitudes.
pub fn format_value_tick(v: f64) -> String {
    let a = v.abs();
    let prec = if a >= 100.0 {
        0
    } else if a >= 10.0 {
        1
    } else {
        2
    };
    format_number(v, prec)
}

/// Y range for a line chart: data range with 5% headroom, never degenerate.
pub fn padded_range(values: &[f64]) -> Option<(f64, f64)> {
    let (min, max) = finite_bounds(values)?;
    if (max - min).abs() < f64::EPSILON {
        let pad = if min == 0.0 { 1.0 } else { min.abs() * 0.01 };
        return Some((min - pad, max + pad));
    }
    let pad = (max - min) * 0.05;
    Some((min - pad, max + pad))
}

/// Y range for a bar chart: bars start at zero, like a spreadsheet chart.
pub fn bar_range(values: &[f64]) -> Option<(f64, f64)> {
    let (min, max) = finite_bounds(values)?;
    let lo = min.min(0.0);
    let hi = max.max(0.0);
    if (hi - lo).abs() < f64::EPSILON {
        return Some((-1.0, 1.0));
    }
    let pad = (hi - lo) * 0.05;
    Some((if lo < 0.0 { lo - pad } else { lo }, if hi > 0.0 { hi + pad } else { hi }))
}

fn finite_bounds(values: &[f64]) -> Option<(f64, f64)> {
    let mut it = values.iter().copied().filter(|v| v.is_finite());
    let first = it.next()?;
    Some(it.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
}

/// Dates become day offsets from the first date so they fit a numeric axis.
pub fn day_offsets(dates: &[NaiveDate]) -> Option<(NaiveDate, Vec<f64>)> {
    let origin = *dates.iter().min()?;
    let xs = dates
        .iter()
        .map(|d| (*d - origin).num_days() as f64)
        .collect();
    Some((origin, xs))
}

/// Inverse of [`day_offsets`] for tick labels.
pub fn format_day_tick(origin: NaiveDate, offset: f64) -> String {
    (origin + Duration::days(offset.round() as i64))
        .format("%Y-%m-%d")
        .to_string()
}

/// Compute a tight left label area width for the Y axis (in pixels),
/// based on the formatted tick labels that will appear.
///
/// Returns a width clamped to a sensible range to avoid extremes.
pub fn compute_left_label_area_px(ymin: f64, ymax: f64, ticks: usize, font_px: u32) -> u32 {
    let mut max_px = 0u32;
    for i in 0..=ticks {
        let t = if ticks == 0 {
            0.0
        } else {
            i as f64 / ticks as f64
        };
        let v = ymin + (ymax - ymin) * t;
        max_px = max_px.max(estimate_text_width_px(&format_value_tick(v), font_px));
    }
    // tick marks + axis title
    max_px.saturating_add(34).clamp(56, 160)
}
