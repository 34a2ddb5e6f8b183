use mindicador_rs::Indicator;
use mindicador_rs::models::{IndicatorResponse, Query};

#[test]
fn parse_sample_json() {
    let sample = r#"
    {
      "version": "1.7.0",
      "autor": "mindicador.cl",
      "codigo": "ipc",
      "nombre": "Indice de Precios al Consumidor (IPC)",
      "unidad_medida": "Porcentaje",
      "serie": [
        { "fecha": "2023-12-01T03:00:00.000Z", "valor": -0.5 },
        { "fecha": "2023-11-01T03:00:00.000Z", "valor": 0.7 }
      ]
    }
    "#;

    let resp: IndicatorResponse = serde_json::from_str(sample).unwrap();
    assert_eq!(resp.codigo.as_deref(), Some("ipc"));
    assert_eq!(resp.serie.len(), 2);
    assert_eq!(resp.serie[0].valor, -0.5);
    assert_eq!(resp.meta().unit.as_deref(), Some("Porcentaje"));
}

#[test]
fn blank_metadata_is_dropped() {
    let resp: IndicatorResponse =
        serde_json::from_str(r#"{ "nombre": "  ", "serie": [] }"#).unwrap();
    let meta = resp.meta();
    assert_eq!(meta.name, None);
    assert_eq!(meta.unit, None);
}

#[test]
fn indicator_codes_parse_case_insensitively() {
    assert_eq!("UF".parse::<Indicator>().unwrap(), Indicator::Uf);
    assert_eq!(" ipc ".parse::<Indicator>().unwrap(), Indicator::Ipc);
    assert_eq!("utm".parse::<Indicator>().unwrap(), Indicator::Utm);
    assert!("dolar".parse::<Indicator>().is_err());
    assert_eq!(
        Indicator::ALL.map(|i| i.code()),
        ["uf", "ipc", "utm"]
    );
}

#[test]
fn query_titles_and_file_stems() {
    let q = Query::new(Indicator::Utm, 2022);
    assert_eq!(q.title_suffix(), "UTM (2022)");
    assert_eq!(q.file_stem(), "utm_2022");
    assert_eq!(Query::default(), Query::new(Indicator::Uf, 2024));
}
