use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Years offered by the dashboard selectors.
pub const SUPPORTED_YEARS: [i32; 4] = [2021, 2022, 2023, 2024];

/// Year selected when nothing else was chosen.
pub const DEFAULT_YEAR: i32 = 2024;

/// Chilean economic indicators served by mindicador.cl.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Indicator {
    /// Unidad de Fomento
    Uf,
    /// Índice de Precios al Consumidor
    Ipc,
    /// Unidad Tributaria Mensual
    Utm,
}

impl Indicator {
    /// All indicators in selector order.
    pub const ALL: [Indicator; 3] = [Indicator::Uf, Indicator::Ipc, Indicator::Utm];

    /// Path segment used by the API (`"uf"`, `"ipc"`, `"utm"`).
    pub fn code(&self) -> &'static str {
        match self {
            Indicator::Uf => "uf",
            Indicator::Ipc => "ipc",
            Indicator::Utm => "utm",
        }
    }

    /// Upper-case code used in titles (`"UF"`).
    pub fn label(&self) -> &'static str {
        match self {
            Indicator::Uf => "UF",
            Indicator::Ipc => "IPC",
            Indicator::Utm => "UTM",
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Indicator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uf" => Ok(Indicator::Uf),
            "ipc" => Ok(Indicator::Ipc),
            "utm" => Ok(Indicator::Utm),
            other => Err(format!("unknown indicator '{other}', expected uf, ipc or utm")),
        }
    }
}

/// Parameters of one user-triggered query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Query {
    pub indicator: Indicator,
    pub year: i32,
}

impl Query {
    pub fn new(indicator: Indicator, year: i32) -> Self {
        Self { indicator, year }
    }

    /// `"UF (2024)"`, the suffix shared by every title of a query.
    pub fn title_suffix(&self) -> String {
        format!("{} ({})", self.indicator.label(), self.year)
    }

    /// `"uf_2024"`, used to name exported chart files.
    pub fn file_stem(&self) -> String {
        format!("{}_{}", self.indicator.code(), self.year)
    }
}

impl Default for Query {
    fn default() -> Self {
        Self::new(Indicator::Uf, DEFAULT_YEAR)
    }
}

/// Raw entry of the `serie` array.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawObservation {
    pub fecha: String,
    pub valor: f64,
}

/// Body returned by `GET /api/{indicator}/{year}`.
///
/// Only `serie` matters for the pipeline; a body without it is an empty series.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndicatorResponse {
    #[serde(default)]
    pub codigo: Option<String>,
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub unidad_medida: Option<String>,
    #[serde(default)]
    pub serie: Vec<RawObservation>,
}

impl IndicatorResponse {
    pub fn meta(&self) -> IndicatorMeta {
        IndicatorMeta {
            name: non_empty(self.nombre.as_deref()),
            unit: non_empty(self.unidad_medida.as_deref()),
        }
    }
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(String::from)
}

/// Descriptive metadata shown next to the heading when the API provides it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndicatorMeta {
    pub name: Option<String>,
    pub unit: Option<String>,
}

/// One dated value of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}
