mod common;

use common::{MockApi, indicator_body, scenario_serie};
use mindicador_rs::dashboard::{
    self, DashboardPanel, DashboardView, EMPTY_MESSAGE, ERROR_MESSAGE, QueryOutcome, QueryState,
    XyStyle,
};
use mindicador_rs::models::{IndicatorMeta, RawObservation};
use mindicador_rs::{Client, Indicator, Query, stats};
use serde_json::json;
use std::sync::mpsc;
use std::thread;

fn uf_2024() -> Query {
    Query::new(Indicator::Uf, 2024)
}

#[test]
fn not_found_shows_error_and_nothing_else() {
    let api = MockApi::status("/uf/2024", 404);
    let mut panel = DashboardPanel::default();

    let state = dashboard::run_query(&Client::with_base_url(api.uri()), uf_2024(), &mut panel)
        .unwrap();

    assert_eq!(state, QueryState::ErrorShown);
    assert_eq!(state.next(), QueryState::Idle);
    assert_eq!(panel.error.as_deref(), Some(ERROR_MESSAGE));
    assert!(panel.warning.is_none());
    assert!(panel.heading.is_none());
    assert!(!panel.has_content());
}

#[test]
fn empty_serie_shows_warning_and_no_charts() {
    let api = MockApi::json("/ipc/2021", json!({ "codigo": "ipc", "serie": [] }));
    let mut panel = DashboardPanel::default();

    let state = dashboard::run_query(
        &Client::with_base_url(api.uri()),
        Query::new(Indicator::Ipc, 2021),
        &mut panel,
    )
    .unwrap();

    assert_eq!(state, QueryState::EmptyWarningShown);
    assert_eq!(state.next(), QueryState::Idle);
    assert_eq!(panel.warning.as_deref(), Some(EMPTY_MESSAGE));
    assert!(panel.error.is_none());
    assert!(!panel.has_content());
}

#[test]
fn successful_query_fills_every_view() {
    let api = MockApi::json("/uf/2024", indicator_body("uf", &scenario_serie()));
    let mut panel = DashboardPanel::default();

    let state = dashboard::run_query(&Client::with_base_url(api.uri()), uf_2024(), &mut panel)
        .unwrap();
    assert_eq!(state, QueryState::Displaying);
    assert!(panel.error.is_none() && panel.warning.is_none());

    let heading = panel.heading.as_deref().unwrap();
    assert!(heading.starts_with("Datos del indicador: UF (2024)"));
    assert!(heading.contains("Pesos"));

    assert_eq!(panel.table.as_ref().unwrap().len(), 3);

    let metrics = panel.metrics.as_ref().unwrap();
    let labels: Vec<&str> = metrics.iter().map(|m| m.label).collect();
    assert_eq!(labels, vec!["Promedio", "Máximo", "Mínimo"]);
    assert_eq!(metrics[0].value, 36003.33);
    assert_eq!(metrics[0].display_value(), "36.003,33");
    assert_eq!(metrics[1].display_value(), "36.010");

    let bar = panel.bar.as_ref().unwrap();
    assert_eq!(bar.style, XyStyle::Bars);
    assert_eq!(bar.title, "Valores del indicador UF (2024)");
    assert_eq!(bar.y, vec![36000.0, 36010.0, 36000.0]);
    assert_eq!((bar.x_title, bar.y_title), ("Fecha", "Valor"));

    let line = panel.line.as_ref().unwrap();
    assert_eq!(line.style, XyStyle::LinePoints);
    assert_eq!(line.title, "Serie de tiempo del indicador UF (2024)");
    assert_eq!(line.x, bar.x);

    let pie = panel.pie.as_ref().unwrap();
    assert_eq!(pie.labels, vec![36000.0, 36010.0]);
    assert_eq!(pie.sizes, vec![2, 1]);
    assert_eq!(pie.label_texts(), vec!["36.000", "36.010"]);
    assert_eq!(pie.hole, 0.3);
}

#[test]
fn charts_cover_the_full_series_while_the_table_is_a_preview() {
    let serie: Vec<RawObservation> = (1..=25)
        .map(|d| RawObservation {
            fecha: format!("2024-01-{d:02}"),
            valor: 36000.0 + d as f64,
        })
        .collect();
    let report = stats::process(&serie).unwrap();
    let view = DashboardView::build(&report, &uf_2024(), &IndicatorMeta::default());

    assert_eq!(view.heading, "Datos del indicador: UF (2024)");
    assert_eq!(view.table.len(), 10);
    assert_eq!(view.bar.len(), 25);
    assert_eq!(view.line.len(), 25);
    assert_eq!(view.pie.labels.len(), 5);
    assert_eq!(view.pie.total(), 5);
}

#[test]
fn invalid_dates_surface_as_errors() {
    let outcome = QueryOutcome::from_fetch(Ok(serde_json::from_value(json!({
        "serie": [ { "fecha": "mañana", "valor": 1.0 } ]
    }))
    .unwrap()));
    assert!(matches!(outcome, QueryOutcome::InvalidData(_)));
    assert!(outcome.is_failure());

    let mut panel = DashboardPanel::default();
    let state = dashboard::present(&outcome, &uf_2024(), &mut panel).unwrap();
    assert_eq!(state, QueryState::ErrorShown);
    assert_eq!(panel.error.as_deref(), Some(ERROR_MESSAGE));
    assert!(!panel.has_content());
}

#[test]
fn transport_failure_surfaces_as_error() {
    let mut panel = DashboardPanel::default();
    let state = dashboard::run_query(
        &Client::with_base_url("http://127.0.0.1:9"),
        uf_2024(),
        &mut panel,
    )
    .unwrap();
    assert_eq!(state, QueryState::ErrorShown);
    assert_eq!(panel.error.as_deref(), Some(ERROR_MESSAGE));
    assert!(!panel.has_content());
}

#[test]
fn each_query_starts_from_a_clean_panel() {
    let ok = MockApi::json("/uf/2024", indicator_body("uf", &scenario_serie()));
    let mut panel = DashboardPanel::default();
    dashboard::run_query(&Client::with_base_url(ok.uri()), uf_2024(), &mut panel).unwrap();
    assert!(panel.has_content());

    panel.clear();
    let missing = MockApi::status("/uf/2024", 503);
    dashboard::run_query(&Client::with_base_url(missing.uri()), uf_2024(), &mut panel).unwrap();
    assert!(panel.error.is_some());
    assert!(!panel.has_content());
}

#[test]
fn state_transitions_only_start_from_idle() {
    assert_eq!(QueryState::Idle.begin(), Some(QueryState::Querying));
    for busy in [
        QueryState::Querying,
        QueryState::Displaying,
        QueryState::ErrorShown,
        QueryState::EmptyWarningShown,
    ] {
        assert_eq!(busy.begin(), None, "{busy:?}");
    }
    // an in-flight query resolves through `present`, not `next`
    assert_eq!(QueryState::Querying.next(), QueryState::Querying);
    assert_eq!(QueryState::Idle.next(), QueryState::Idle);
}

#[test]
fn pending_worker_is_polled_until_it_answers() {
    let (sender, receiver) = mpsc::channel();
    assert!(dashboard::poll_outcome(&receiver).is_none());

    sender.send(QueryOutcome::EmptyInput).unwrap();
    assert_eq!(dashboard::poll_outcome(&receiver), Some(QueryOutcome::EmptyInput));
}

#[test]
fn dead_worker_surfaces_as_an_error_and_returns_to_idle() {
    let (sender, receiver) = mpsc::channel::<QueryOutcome>();
    let worker = thread::spawn(move || {
        let _sender = sender;
        panic!("worker died before answering");
    });
    assert!(worker.join().is_err());

    let outcome = dashboard::poll_outcome(&receiver).unwrap();
    assert!(matches!(outcome, QueryOutcome::TransportFailure(_)));

    let mut panel = DashboardPanel::default();
    let state = dashboard::present(&outcome, &uf_2024(), &mut panel).unwrap();
    assert_eq!(state, QueryState::ErrorShown);
    assert_eq!(state.next(), QueryState::Idle);
    assert_eq!(panel.error.as_deref(), Some(ERROR_MESSAGE));
    assert!(!panel.has_content());
}
