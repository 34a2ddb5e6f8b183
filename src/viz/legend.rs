//! Right-hand legend panel for the distribution chart.

use anyhow::Result;
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::text::truncate_to_width;

/// Draw a single-column list of colored squares and labels.
pub fn draw_legend_panel<DB: DrawingBackend>(
    legend_area: &DrawingArea<DB, Shift>,
    items: &[(String, RGBColor)],
    title: &str, // pass "" to omit
) -> Result<()> {
    legend_area
        .fill(&WHITE)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let (w_u32, _) = legend_area.dim_in_pixel();
    let w = w_u32 as i32;

    let font_px: u32 = 14;
    let line_h: i32 = font_px as i32 + 8;
    let pad_x: i32 = 6;
    let marker_half: i32 = 5;

    let title_font_px: u32 = 15;
    let title_style: TextStyle = TextStyle::from((FontFamily::SansSerif, title_font_px))
        .pos(Pos::new(HPos::Left, VPos::Top));
    let label_style: TextStyle =
        TextStyle::from((FontFamily::SansSerif, font_px)).pos(Pos::new(HPos::Left, VPos::Center));

    let mut y = 40;
    if !title.trim().is_empty() {
        legend_area
            .draw(&Text::new(title, (pad_x, y), title_style))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        y += title_font_px as i32 + 10;
    }

    let text_x = pad_x + 2 * marker_half + 10;
    let max_text_w = (w - text_x - pad_x).max(40) as u32;

    for (label, color) in items {
        let center_y = y + line_h / 2;
        legend_area
            .draw(&Rectangle::new(
                [
                    (pad_x, center_y - marker_half),
                    (pad_x + 2 * marker_half, center_y + marker_half),
                ],
                color.filled(),
            ))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        let text = truncate_to_width(label, font_px, max_text_w);
        legend_area
            .draw(&Text::new(text, (text_x, center_y), label_style.clone()))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        y += line_h;
    }
    Ok(())
}
