//! Public types for the visualization module.

use crate::dashboard::{PieChart, XyChart};
use std::path::{Path, PathBuf};

/// Output file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartFormat {
    #[default]
    Svg,
    Png,
}

impl ChartFormat {
    /// SVG for `.svg` paths, PNG for anything else.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => ChartFormat::Svg,
            _ => ChartFormat::Png,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ChartFormat::Svg => "svg",
            ChartFormat::Png => "png",
        }
    }
}

/// The three chart positions of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartSlot {
    Bar,
    Line,
    Pie,
}

impl ChartSlot {
    pub fn file_suffix(&self) -> &'static str {
        match self {
            ChartSlot::Bar => "barras",
            ChartSlot::Line => "lineas",
            ChartSlot::Pie => "torta",
        }
    }
}

/// `{dir}/{stem}_{suffix}.{ext}`, e.g. `out/uf_2024_barras.svg`.
pub fn chart_path(dir: &Path, stem: &str, slot: ChartSlot, format: ChartFormat) -> PathBuf {
    dir.join(format!("{stem}_{}.{}", slot.file_suffix(), format.extension()))
}

/// A chart dataset to render.
#[derive(Debug, Clone, Copy)]
pub enum Chart<'a> {
    Xy(&'a XyChart),
    Pie(&'a PieChart),
}

impl Chart<'_> {
    pub fn title(&self) -> &str {
        match self {
            Chart::Xy(c) => &c.title,
            Chart::Pie(c) => &c.title,
        }
    }
}

/// Default canvas size, in pixels.
pub const DEFAULT_WIDTH: u32 = 900;
pub const DEFAULT_HEIGHT: u32 = 500;
