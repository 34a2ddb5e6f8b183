//! Text measurement and truncation.

/// Heuristic: estimate pixel width of text (Plotters has no built-in text measuring).
pub fn estimate_text_width_px(text: &str, font_px: u32) -> u32 {
    ((text.chars().count() as f32) * (font_px as f32) * 0.60).ceil() as u32
}

/// Truncate to fit `max_px` and add a single ellipsis if needed.
pub fn truncate_to_width(text: &str, font_px: u32, max_px: u32) -> String {
    if estimate_text_width_px(text, font_px) <= max_px {
        return text.to_string();
    }
    let mut out = String::new();
    for ch in text.chars() {
        let candidate = format!("{out}{ch}…");
        if estimate_text_width_px(&candidate, font_px) > max_px {
            break;
        }
        out.push(ch);
    }
    if out.is_empty() {
        return String::new();
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_to_width("36.000", 12, 200), "36.000");
    }

    #[test]
    fn long_text_gets_one_ellipsis() {
        let t = truncate_to_width("Serie de tiempo del indicador UF (2024)", 12, 100);
        assert!(t.ends_with('…'));
        assert_eq!(t.matches('…').count(), 1);
        assert!(estimate_text_width_px(&t, 12) <= 100);
    }
}
