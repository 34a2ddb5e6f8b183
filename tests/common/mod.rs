//! Local mock of the mindicador.cl API for integration tests.
//!
//! The blocking client must not run inside an async context, so the mock server lives on a
//! multi-threaded runtime and tests call the client from the plain test thread.
#![allow(dead_code)]

use serde_json::{Value, json};
use tokio::runtime::Runtime;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct MockApi {
    pub server: MockServer,
    // keeps the server's worker threads alive
    _rt: Runtime,
}

impl MockApi {
    /// Serve `template` for `GET {route}`; anything else is a 404.
    pub fn serve(route: &str, template: ResponseTemplate) -> Self {
        let rt = Runtime::new().expect("tokio runtime");
        let server = rt.block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path(route))
                .respond_with(template)
                .mount(&server)
                .await;
            server
        });
        Self { server, _rt: rt }
    }

    pub fn json(route: &str, body: Value) -> Self {
        Self::serve(route, ResponseTemplate::new(200).set_body_json(body))
    }

    pub fn status(route: &str, status: u16) -> Self {
        Self::serve(route, ResponseTemplate::new(status))
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }
}

/// Body shaped like the live API, with `serie` built from (fecha, valor) pairs.
pub fn indicator_body(codigo: &str, serie: &[(&str, f64)]) -> Value {
    json!({
        "version": "1.7.0",
        "autor": "mindicador.cl",
        "codigo": codigo,
        "nombre": "Unidad de fomento (UF)",
        "unidad_medida": "Pesos",
        "serie": serie
            .iter()
            .map(|(fecha, valor)| json!({ "fecha": fecha, "valor": valor }))
            .collect::<Vec<_>>(),
    })
}

/// The three-observation scenario used across suites.
pub fn scenario_serie() -> Vec<(&'static str, f64)> {
    vec![
        ("2024-01-01", 36000.0),
        ("2024-01-02", 36010.0),
        ("2024-01-03", 36000.0),
    ]
}
