//! Chilean number formatting (`36.003,33`) for tables, metrics and chart labels.

use num_format::{Locale, ToFormattedString};

const LOCALE: Locale = Locale::es_CL;

/// Format with a fixed number of decimals, `.` as thousands separator and `,` as decimal mark.
pub fn format_number(v: f64, decimals: usize) -> String {
    if !v.is_finite() {
        return "NA".to_string();
    }
    let decimals = decimals.min(9);
    let factor = 10u64.pow(decimals as u32);
    let scaled = (v.abs() * factor as f64).round() as u64;
    let int_part = scaled / factor;
    let frac_part = scaled % factor;

    let mut out = String::new();
    if v < 0.0 && scaled != 0 {
        out.push_str(LOCALE.minus_sign());
    }
    out.push_str(&int_part.to_formatted_string(&LOCALE));
    if decimals > 0 {
        out.push_str(LOCALE.decimal());
        out.push_str(&format!("{:0width$}", frac_part, width = decimals));
    }
    out
}

/// Two decimals, then trim trailing zeros and a dangling decimal mark.
pub fn format_metric(v: f64) -> String {
    let s = format_number(v, 2);
    let dec = LOCALE.decimal();
    if s.contains(dec) {
        s.trim_end_matches('0').trim_end_matches(dec).to_string()
    } else {
        s
    }
}
