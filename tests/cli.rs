mod common;

use assert_cmd::Command;
use common::{MockApi, indicator_body, scenario_serie};
use predicates::prelude::*;
use tempfile::tempdir;

fn mindicador() -> Command {
    Command::cargo_bin("mindicador").unwrap()
}

#[test]
fn help_mentions_the_subcommands() {
    mindicador()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("get").and(predicate::str::contains("list")));
}

#[test]
fn list_prints_indicators_and_years() {
    mindicador()
        .arg("list")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("uf")
                .and(predicate::str::contains("ipc"))
                .and(predicate::str::contains("utm"))
                .and(predicate::str::contains("2021, 2022, 2023, 2024")),
        );
}

#[test]
fn unsupported_year_is_rejected_by_the_parser() {
    mindicador()
        .args(["get", "--year", "2019"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("year must be one of"));
}

#[test]
fn unknown_indicator_is_rejected_by_the_parser() {
    mindicador()
        .args(["get", "--indicator", "dolar"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown indicator"));
}

#[test]
fn get_prints_heading_table_and_metrics() {
    let api = MockApi::json("/uf/2024", indicator_body("uf", &scenario_serie()));
    mindicador()
        .args(["get", "--indicator", "uf", "--year", "2024", "--base-url"])
        .arg(api.uri())
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Datos del indicador: UF (2024)")
                .and(predicate::str::contains("2024-01-02"))
                .and(predicate::str::contains("Promedio=36.003,33"))
                .and(predicate::str::contains("Distribución de valores más frecuentes")),
        );
}

#[test]
fn get_writes_charts_when_asked() {
    let api = MockApi::json("/uf/2024", indicator_body("uf", &scenario_serie()));
    let dir = tempdir().unwrap();
    let out = dir.path().join("charts");

    mindicador()
        .args(["get", "--base-url", api.uri().as_str(), "--charts"])
        .arg(&out)
        .args(["--width", "640", "--height", "400"])
        .assert()
        .success();

    for name in ["uf_2024_barras.svg", "uf_2024_lineas.svg", "uf_2024_torta.svg"] {
        let path = out.join(name);
        assert!(path.exists(), "missing {}", path.display());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}

#[test]
fn empty_year_warns_but_succeeds() {
    let api = MockApi::json("/utm/2021", serde_json::json!({ "serie": [] }));
    mindicador()
        .args(["get", "-i", "utm", "-y", "2021", "--base-url", api.uri().as_str()])
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "No se encontraron datos para los parámetros seleccionados.",
        ))
        .stdout(predicate::str::contains("Datos del indicador").not());
}

#[test]
fn api_error_fails_the_process() {
    let api = MockApi::status("/ipc/2022", 404);
    mindicador()
        .args(["get", "-i", "ipc", "-y", "2022", "--base-url", api.uri().as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Error al consultar la API. Verifique la conexión o los parámetros.",
        ));
}
