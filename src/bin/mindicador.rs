use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use mindicador_rs::api::DEFAULT_BASE_URL;
use mindicador_rs::dashboard::{self, DisplaySink, Metric, PieChart, XyChart};
use mindicador_rs::format::format_number;
use mindicador_rs::models::{DEFAULT_YEAR, SUPPORTED_YEARS};
use mindicador_rs::viz::{self, ChartFormat, ChartSlot};
use mindicador_rs::{Client, Indicator, Observation, Query, QueryState};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "mindicador",
    version,
    about = "Fetch, summarize & chart Chilean economic indicators (UF, IPC, UTM)"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Query one indicator for one year (table, metrics, and optionally charts).
    Get(GetArgs),
    /// List the indicators and years that can be queried.
    List,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutFormat {
    Svg,
    Png,
}

impl From<OutFormat> for ChartFormat {
    fn from(f: OutFormat) -> Self {
        match f {
            OutFormat::Svg => ChartFormat::Svg,
            OutFormat::Png => ChartFormat::Png,
        }
    }
}

#[derive(Args, Debug)]
struct GetArgs {
    /// Indicator code (uf, ipc or utm)
    #[arg(short, long, default_value = "uf")]
    indicator: Indicator,
    /// Year to query (2021-2024)
    #[arg(short, long, default_value_t = DEFAULT_YEAR, value_parser = parse_year)]
    year: i32,
    /// Write the bar, line and pie charts into this directory.
    #[arg(long)]
    charts: Option<PathBuf>,
    /// Chart file format.
    #[arg(long, value_enum, default_value_t = OutFormat::Svg)]
    format: OutFormat,
    /// Width of each chart (default 900).
    #[arg(long, default_value_t = viz::DEFAULT_WIDTH)]
    width: u32,
    /// Height of each chart (default 500).
    #[arg(long, default_value_t = viz::DEFAULT_HEIGHT)]
    height: u32,
    /// API root.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,
}

fn parse_year(s: &str) -> Result<i32, String> {
    let year: i32 = s.trim().parse().map_err(|_| format!("invalid year '{s}'"))?;
    if SUPPORTED_YEARS.contains(&year) {
        Ok(year)
    } else {
        Err(format!("year must be one of {SUPPORTED_YEARS:?}"))
    }
}

/// Prints to the terminal; charts go to files when a directory was given.
struct TerminalSink {
    charts: Option<PathBuf>,
    stem: String,
    format: ChartFormat,
    width: u32,
    height: u32,
}

impl TerminalSink {
    fn chart_target(&self, slot: ChartSlot) -> Option<PathBuf> {
        self.charts
            .as_deref()
            .map(|dir| viz::chart_path(dir, &self.stem, slot, self.format))
    }

    fn ensure_dir(&self) -> Result<()> {
        if let Some(dir) = &self.charts {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    fn xy(&self, chart: &XyChart, slot: ChartSlot) -> Result<()> {
        if let Some(path) = self.chart_target(slot) {
            self.ensure_dir()?;
            viz::render_xy(chart, &path, self.width, self.height)?;
            eprintln!("Wrote {} to {}", chart.title, path.display());
        }
        Ok(())
    }
}

impl DisplaySink for TerminalSink {
    fn error(&mut self, message: &str) {
        eprintln!("error: {message}");
    }

    fn warning(&mut self, message: &str) {
        eprintln!("warning: {message}");
    }

    fn heading(&mut self, text: &str) -> Result<()> {
        println!("{text}");
        println!("{}", "=".repeat(text.chars().count()));
        Ok(())
    }

    fn table(&mut self, rows: &[Observation]) -> Result<()> {
        println!("{:<12} {:>14}", "fecha", "valor");
        for o in rows {
            println!("{:<12} {:>14}", o.date.format("%Y-%m-%d"), format_number(o.value, 2));
        }
        println!();
        Ok(())
    }

    fn metrics(&mut self, metrics: &[Metric]) -> Result<()> {
        let line = metrics
            .iter()
            .map(|m| format!("{}={}", m.label, m.display_value()))
            .collect::<Vec<_>>()
            .join("  ");
        println!("{line}");
        println!();
        Ok(())
    }

    fn bar_chart(&mut self, chart: &XyChart) -> Result<()> {
        self.xy(chart, ChartSlot::Bar)
    }

    fn line_chart(&mut self, chart: &XyChart) -> Result<()> {
        self.xy(chart, ChartSlot::Line)
    }

    fn pie_chart(&mut self, chart: &PieChart) -> Result<()> {
        println!("{}", chart.title);
        for (label, count) in chart.label_texts().iter().zip(&chart.sizes) {
            println!("  {label:>14}  {count}");
        }
        if let Some(path) = self.chart_target(ChartSlot::Pie) {
            self.ensure_dir()?;
            viz::render_pie(chart, &path, self.width, self.height)?;
            eprintln!("Wrote {} to {}", chart.title, path.display());
        }
        Ok(())
    }
}

fn main() -> Result<ExitCode> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Get(args) => cmd_get(args),
        Command::List => {
            for ind in Indicator::ALL {
                println!("{}", ind.code());
            }
            println!(
                "years: {}",
                SUPPORTED_YEARS.map(|y| y.to_string()).join(", ")
            );
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn cmd_get(args: GetArgs) -> Result<ExitCode> {
    let client = Client::with_base_url(args.base_url);
    let query = Query::new(args.indicator, args.year);
    let mut sink = TerminalSink {
        charts: args.charts,
        stem: query.file_stem(),
        format: args.format.into(),
        width: args.width,
        height: args.height,
    };

    eprintln!("{}", dashboard::LOADING_MESSAGE);
    let state = dashboard::run_query(&client, query, &mut sink)?;
    Ok(match state {
        QueryState::ErrorShown => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}
