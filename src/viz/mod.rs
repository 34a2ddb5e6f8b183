//! Visualization: render the dashboard datasets to **SVG**, **PNG** or an in-memory RGB buffer.
//!
//! - Bar chart and line + markers chart over dates
//! - Donut chart of the most frequent values with a legend panel
//! - Chilean number formatting on the value axis (`36.000`)

pub mod legend;
pub mod text;
pub mod types;
pub mod util;

pub use types::{Chart, ChartFormat, ChartSlot, DEFAULT_HEIGHT, DEFAULT_WIDTH, chart_path};

use crate::dashboard::{PieChart, XyChart, XyStyle};
use anyhow::{Context, Result, anyhow, bail};

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::path::{Path, PathBuf};
use std::sync::Once;

use legend::draw_legend_panel;
use util::{
    bar_range, compute_left_label_area_px, day_offsets, format_day_tick, format_value_tick,
    office_color, padded_range,
};

/// One-time registration for a fallback "sans-serif" font when using the `ab_glyph` text path.
/// Required because `ab_glyph` doesn't discover OS fonts.
static INIT_FONTS: Once = Once::new();

fn ensure_fonts_registered() {
    INIT_FONTS.call_once(|| {
        if plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            include_bytes!("../../assets/DejaVuSans.ttf"),
        )
        .is_err()
        {
            log::warn!("bundled font rejected; chart text may be missing");
        }
    });
}

/// Render any chart to a file; `.svg` paths produce SVG, anything else PNG.
pub fn render_chart<P: AsRef<Path>>(
    chart: Chart<'_>,
    out_path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    ensure_fonts_registered();
    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();

    match ChartFormat::from_path(out_path) {
        ChartFormat::Svg => {
            let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
            draw_chart(root, chart)?;
        }
        ChartFormat::Png => {
            let root =
                BitMapBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
            draw_chart(root, chart)?;
        }
    }
    Ok(())
}

/// Bar or line chart to a file.
pub fn render_xy<P: AsRef<Path>>(
    chart: &XyChart,
    out_path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    render_chart(Chart::Xy(chart), out_path, width, height)
}

/// Distribution donut chart to a file.
pub fn render_pie<P: AsRef<Path>>(
    chart: &PieChart,
    out_path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    render_chart(Chart::Pie(chart), out_path, width, height)
}

/// Render into a packed RGB buffer (`width * height * 3` bytes), e.g. for a GUI texture.
pub fn render_rgb(chart: Chart<'_>, width: u32, height: u32) -> Result<Vec<u8>> {
    ensure_fonts_registered();
    let mut buf = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buf, (width, height)).into_drawing_area();
        draw_chart(root, chart)?;
    }
    Ok(buf)
}

/// Write the bar, line and pie charts of one query into `dir`.
///
/// Files are named `{stem}_barras.{ext}`, `{stem}_lineas.{ext}` and `{stem}_torta.{ext}`.
#[allow(clippy::too_many_arguments)]
pub fn write_dashboard_charts(
    bar: &XyChart,
    line: &XyChart,
    pie: &PieChart,
    dir: &Path,
    stem: &str,
    format: ChartFormat,
    width: u32,
    height: u32,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let targets = [
        (Chart::Xy(bar), ChartSlot::Bar),
        (Chart::Xy(line), ChartSlot::Line),
        (Chart::Pie(pie), ChartSlot::Pie),
    ];
    let mut written = Vec::with_capacity(targets.len());
    for (chart, slot) in targets {
        let path = chart_path(dir, stem, slot, format);
        render_chart(chart, &path, width, height)
            .with_context(|| format!("render {}", path.display()))?;
        log::debug!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

fn draw_chart<DB>(root: DrawingArea<DB, Shift>, chart: Chart<'_>) -> Result<()>
where
    DB: DrawingBackend,
{
    match chart {
        Chart::Xy(c) => draw_xy(root, c),
        Chart::Pie(c) => draw_pie(root, c),
    }
}

fn draw_xy<DB>(root: DrawingArea<DB, Shift>, chart: &XyChart) -> Result<()>
where
    DB: DrawingBackend,
{
    if chart.is_empty() {
        bail!("no data to plot");
    }
    let n = chart.len();
    let (origin, xs) = day_offsets(&chart.x[..n]).ok_or_else(|| anyhow!("no valid dates"))?;
    let ys = &chart.y[..n];

    let (y_min, y_max) = match chart.style {
        XyStyle::Bars => bar_range(ys),
        XyStyle::LinePoints => padded_range(ys),
    }
    .ok_or_else(|| anyhow!("no numeric values to plot"))?;

    let x_last = xs.iter().cloned().fold(0.0f64, f64::max);
    let (x_min, x_max) = match chart.style {
        // half a bar of room on each side
        XyStyle::Bars => (-0.5, x_last + 0.5),
        XyStyle::LinePoints if x_last == 0.0 => (-1.0, 1.0),
        XyStyle::LinePoints => (0.0, x_last),
    };

    let x_label_fmt = |x: &f64| format_day_tick(origin, *x);
    let y_label_fmt = |v: &f64| format_value_tick(*v);
    let x_label_count = n.clamp(2, 8);
    let y_label_count = 8usize;
    let left_label_width_px = compute_left_label_area_px(y_min, y_max, y_label_count, 12);

    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    let mut ctx = ChartBuilder::on(&root)
        .margin(16)
        .caption(chart.title.as_str(), (FontFamily::SansSerif, 22))
        .set_label_area_size(LabelAreaPosition::Left, left_label_width_px)
        .set_label_area_size(LabelAreaPosition::Bottom, 48)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(|e| anyhow!("{:?}", e))?;

    ctx.configure_mesh()
        .x_desc(chart.x_title)
        .y_desc(chart.y_title)
        .x_labels(x_label_count)
        .y_labels(y_label_count)
        .x_label_formatter(&x_label_fmt)
        .y_label_formatter(&y_label_fmt)
        .label_style((FontFamily::SansSerif, 12))
        .axis_desc_style((FontFamily::SansSerif, 15))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    let color = office_color(0);
    let points: Vec<(f64, f64)> = xs.iter().copied().zip(ys.iter().copied()).collect();

    match chart.style {
        XyStyle::Bars => {
            let half = 0.4f64;
            ctx.draw_series(points.iter().map(|(x, v)| {
                let y0 = 0.0f64.min(*v);
                let y1 = 0.0f64.max(*v);
                Rectangle::new([(x - half, y0), (x + half, y1)], color.filled())
            }))
            .map_err(|e| anyhow!("{:?}", e))?;
        }
        XyStyle::LinePoints => {
            let style = ShapeStyle {
                color: color.to_rgba(),
                filled: false,
                stroke_width: 2,
            };
            ctx.draw_series(LineSeries::new(points.clone(), style))
                .map_err(|e| anyhow!("{:?}", e))?;
            // thinner markers on dense daily series
            let radius = if n > 60 { 2 } else { 3 };
            ctx.draw_series(
                points
                    .iter()
                    .map(|(x, y)| Circle::new((*x, *y), radius, color.filled())),
            )
            .map_err(|e| anyhow!("{:?}", e))?;
        }
    }

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

fn draw_pie<DB>(root: DrawingArea<DB, Shift>, chart: &PieChart) -> Result<()>
where
    DB: DrawingBackend,
{
    if chart.sizes.is_empty() || chart.total() == 0 {
        bail!("no data to plot");
    }
    if chart.sizes.len() != chart.labels.len() {
        bail!(
            "pie has {} sizes but {} labels",
            chart.sizes.len(),
            chart.labels.len()
        );
    }

    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
    let body = root
        .titled(chart.title.as_str(), (FontFamily::SansSerif, 22))
        .map_err(|e| anyhow!("{:?}", e))?;

    let (body_w, _) = body.dim_in_pixel();
    let (pie_area, legend_area) = body.split_horizontally((body_w as f64 * 0.72) as i32);

    let (w, h) = pie_area.dim_in_pixel();
    // Pie takes backend coordinates, not area-relative ones
    let (x0, y0) = pie_area.get_base_pixel();
    let center = (x0 + w as i32 / 2, y0 + h as i32 / 2);
    // leave room for the outside labels
    let radius = (w.min(h) as f64 / 2.0 * 0.72).max(10.0);
    let sizes: Vec<f64> = chart.sizes.iter().map(|s| *s as f64).collect();
    let colors: Vec<RGBColor> = (0..sizes.len()).map(office_color).collect();
    let labels = chart.label_texts();

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.start_angle(-90.0);
    pie.label_style((FontFamily::SansSerif, 13).into_font().color(&BLACK));
    pie.percentages((FontFamily::SansSerif, 12).into_font().color(&WHITE));
    pie.donut_hole(radius * chart.hole);
    pie_area.draw(&pie).map_err(|e| anyhow!("{:?}", e))?;

    let items: Vec<(String, RGBColor)> = labels
        .iter()
        .zip(chart.sizes.iter())
        .zip(colors.iter())
        .map(|((label, count), color)| (format!("{label} ({count})"), *color))
        .collect();
    draw_legend_panel(&legend_area, &items, "Valor (frecuencia)")?;

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}
