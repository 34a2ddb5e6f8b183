/*!
 * Desktop dashboard for mindicador-rs - Chilean economic indicators viewer
 *
 * - Sidebar: indicator selector, year selector and the query trigger
 * - Main panel: preview table, summary metrics and bar / line / donut charts
 * - Charts can be exported as SVG into a folder of your choice
 */

use anyhow::Result;
use mindicador_rs::dashboard::{self, DashboardPanel, QueryOutcome, QueryState};
use mindicador_rs::format::format_number;
use mindicador_rs::models::SUPPORTED_YEARS;
use mindicador_rs::viz::{self, Chart, ChartFormat};
use mindicador_rs::{Client, Indicator, Query};
use std::sync::mpsc;
use std::thread;

const CHART_W: u32 = 900;
const CHART_H: u32 = 460;

fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1180.0, 820.0])
            .with_min_inner_size([760.0, 480.0])
            .with_title("Visualizador de Indicadores Económicos"),
        ..Default::default()
    };

    eframe::run_native(
        "Visualizador de Indicadores Económicos",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new()))),
    )
}

/// Textures for the three charts of the current result.
struct ChartTextures {
    bar: egui::TextureHandle,
    line: egui::TextureHandle,
    pie: egui::TextureHandle,
}

struct DashboardApp {
    // Query selection
    indicator: Indicator,
    year: i32,

    // UI state
    state: QueryState,
    panel: DashboardPanel,
    shown_query: Option<Query>,
    textures: Option<ChartTextures>,
    status_message: String,

    // Background query
    operation_receiver: Option<(Query, mpsc::Receiver<QueryOutcome>)>,
}

impl DashboardApp {
    fn new() -> Self {
        let default = Query::default();
        Self {
            indicator: default.indicator,
            year: default.year,
            state: QueryState::Idle,
            panel: DashboardPanel::default(),
            shown_query: None,
            textures: None,
            status_message: String::new(),
            operation_receiver: None,
        }
    }

    fn start_query(&mut self) {
        let Some(next) = self.state.begin() else {
            return;
        };
        let query = Query::new(self.indicator, self.year);
        self.state = next;
        self.status_message.clear();

        let (sender, receiver) = mpsc::channel();
        self.operation_receiver = Some((query, receiver));

        thread::spawn(move || {
            let outcome = dashboard::fetch_outcome(&Client::default(), &query);
            let _ = sender.send(outcome);
        });
    }

    fn check_query_result(&mut self, ctx: &egui::Context) {
        let Some((query, receiver)) = &self.operation_receiver else {
            return;
        };
        let query = *query;
        // a dead worker comes back as a failure, so Querying always resolves
        let Some(outcome) = dashboard::poll_outcome(receiver) else {
            return;
        };
        self.operation_receiver = None;
        self.panel.clear();
        self.textures = None;

        self.state = match dashboard::present(&outcome, &query, &mut self.panel) {
            Ok(state) => state,
            Err(err) => {
                self.panel.error = Some(format!("{err:#}"));
                QueryState::ErrorShown
            }
        };
        self.shown_query = Some(query);

        if self.state == QueryState::Displaying {
            match self.build_textures(ctx) {
                Ok(textures) => self.textures = Some(textures),
                Err(err) => {
                    log::warn!("chart rendering failed: {err:#}");
                    self.status_message = format!("No se pudieron dibujar los gráficos: {err}");
                }
            }
        }
        // the cycle is over; the result stays on screen until the next trigger
        self.state = self.state.next();
    }

    fn build_textures(&self, ctx: &egui::Context) -> Result<ChartTextures> {
        let (Some(bar), Some(line), Some(pie)) =
            (&self.panel.bar, &self.panel.line, &self.panel.pie)
        else {
            anyhow::bail!("missing chart data");
        };
        let load = |name: &str, chart: Chart<'_>| -> Result<egui::TextureHandle> {
            let rgb = viz::render_rgb(chart, CHART_W, CHART_H)?;
            let image = egui::ColorImage::from_rgb([CHART_W as usize, CHART_H as usize], &rgb);
            Ok(ctx.load_texture(name, image, egui::TextureOptions::LINEAR))
        };
        Ok(ChartTextures {
            bar: load("chart_bar", Chart::Xy(bar))?,
            line: load("chart_line", Chart::Xy(line))?,
            pie: load("chart_pie", Chart::Pie(pie))?,
        })
    }

    fn export_charts(&mut self) {
        let (Some(query), Some(bar), Some(line), Some(pie)) = (
            self.shown_query,
            &self.panel.bar,
            &self.panel.line,
            &self.panel.pie,
        ) else {
            return;
        };
        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return;
        };
        self.status_message = match viz::write_dashboard_charts(
            bar,
            line,
            pie,
            &dir,
            &query.file_stem(),
            ChartFormat::Svg,
            CHART_W,
            CHART_H,
        ) {
            Ok(paths) => format!(
                "Gráficos guardados:\n{}",
                paths
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join("\n")
            ),
            Err(err) => format!("Error al guardar los gráficos: {err:#}"),
        };
    }

    fn sidebar(&mut self, ui: &mut egui::Ui) {
        ui.heading("Configuración de consulta");
        ui.add_space(8.0);

        ui.label("Seleccione el indicador económico:");
        egui::ComboBox::from_id_salt("indicator")
            .selected_text(self.indicator.code())
            .show_ui(ui, |ui| {
                for ind in Indicator::ALL {
                    ui.selectable_value(&mut self.indicator, ind, ind.code());
                }
            })
            .response
            .on_hover_text("Seleccione un indicador para consultar sus datos.");

        ui.add_space(8.0);
        ui.label("Seleccione el año:");
        for year in SUPPORTED_YEARS {
            ui.radio_value(&mut self.year, year, year.to_string());
        }

        ui.add_space(12.0);
        let busy = self.state == QueryState::Querying;
        if ui
            .add_enabled(!busy, egui::Button::new("Consultar Indicador"))
            .clicked()
        {
            self.start_query();
        }
        if busy {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(dashboard::LOADING_MESSAGE);
            });
        }

        if self.panel.has_content() {
            ui.add_space(12.0);
            if ui.button("Guardar gráficos…").clicked() {
                self.export_charts();
            }
        }
        if !self.status_message.is_empty() {
            ui.add_space(6.0);
            ui.small(&self.status_message);
        }
    }

    fn main_panel(&self, ui: &mut egui::Ui) {
        ui.heading("Visualizador de Indicadores Económicos");
        ui.label(
            "Esta herramienta permite consultar y analizar indicadores económicos clave de Chile \
             (UF, IPC, UTM) durante un año específico.",
        );
        ui.add_space(10.0);

        if let Some(err) = &self.panel.error {
            ui.colored_label(egui::Color32::RED, err);
        }
        if let Some(warn) = &self.panel.warning {
            ui.colored_label(egui::Color32::from_rgb(200, 140, 0), warn);
        }

        if let Some(heading) = &self.panel.heading {
            ui.heading(heading);
        }

        if let Some(rows) = &self.panel.table {
            egui::Grid::new("preview_table")
                .striped(true)
                .num_columns(2)
                .show(ui, |ui| {
                    ui.strong("fecha");
                    ui.strong("valor");
                    ui.end_row();
                    for o in rows {
                        ui.monospace(o.date.format("%Y-%m-%d").to_string());
                        ui.monospace(format_number(o.value, 2));
                        ui.end_row();
                    }
                });
            ui.add_space(10.0);
        }

        if let Some(metrics) = &self.panel.metrics {
            ui.columns(metrics.len().max(1), |cols| {
                for (col, m) in cols.iter_mut().zip(metrics) {
                    col.label(m.label);
                    col.heading(m.display_value());
                }
            });
            ui.add_space(10.0);
        }

        if let Some(textures) = &self.textures {
            let width = ui.available_width().min(CHART_W as f32);
            for (title, tex) in [
                ("Gráfico de barras", &textures.bar),
                ("Gráfico lineal (Serie de tiempo)", &textures.line),
                ("Gráfico de torta (Distribución)", &textures.pie),
            ] {
                ui.strong(title);
                ui.add(
                    egui::Image::from_texture(egui::load::SizedTexture::from_handle(tex))
                        .max_width(width),
                );
                ui.add_space(8.0);
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_query_result(ctx);

        // keep the spinner animated
        if self.state == QueryState::Querying {
            ctx.request_repaint();
        }

        egui::SidePanel::left("query_panel")
            .resizable(false)
            .default_width(240.0)
            .show(ctx, |ui| self.sidebar(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| self.main_panel(ui));
        });
    }
}
