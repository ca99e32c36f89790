// ============================================================================
// API Client : IEX Cloud (endpoint batch)
// ============================================================================
// Récupère prix + statistiques pour plusieurs tickers en un seul appel, puis
// transforme la réponse imbriquée en ReportTable (une ligne par ticker).
//
// CONCEPTS RUST :
// 1. async/await : la requête HTTP est non-bloquante (mais unique)
// 2. Serde : désérialisation JSON vers des structures typées
// 3. Option<T> : champs que l'API peut omettre ou renvoyer à null
// ============================================================================

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};

use crate::config::Config;
use crate::error::{ReportError, Result};
use crate::models::{join_endpoints, ReportRow, ReportTable};

// ============================================================================
// Structures pour parser la réponse JSON d'IEX Cloud
// ============================================================================
// Forme de la réponse :
// {
//   "AAPL": { "price": 185.2, "stats": { "companyName": "Apple Inc.", "dividendYield": 0.005, ... } },
//   "MSFT": { ... }
// }
// Les champs non listés ici sont ignorés par serde.
// ============================================================================

/// Réponse batch : symbole -> données
pub type BatchResponse = HashMap<String, BatchEntry>;

/// Données d'un ticker dans la réponse batch
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BatchEntry {
    /// Endpoint "price" : un nombre brut
    pub price: Option<f64>,

    /// Endpoint "stats"
    pub stats: Option<Stats>,
}

/// Sous-ensemble de l'endpoint "stats" utilisé par le rapport
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub company_name: Option<String>,

    /// Fraction (0.015 = 1.5%), null pour les sociétés sans dividende
    pub dividend_yield: Option<f64>,
}

// ============================================================================
// Fonctions publiques de l'API
// ============================================================================

/// Construit l'URL de l'appel batch
///
/// Les symboles sont joints par des virgules, sans séparateur final et sans
/// échappement.
pub fn build_batch_url(config: &Config) -> String {
    format!(
        "{}/stock/market/batch?symbols={}&types={}&range={}&token={}",
        config.base_url.trim_end_matches('/'),
        config.tickers.join(","),
        join_endpoints(&config.endpoints),
        config.range.as_iex_str(),
        config.token
    )
}

/// Parse le corps JSON d'une réponse batch
pub fn parse_batch_response(body: &str) -> Result<BatchResponse> {
    let response: BatchResponse = serde_json::from_str(body)?;
    Ok(response)
}

/// Envoie la requête batch et retourne la réponse parsée
///
/// Une seule tentative : une erreur réseau, un statut non 2xx ou un JSON
/// invalide sont remontés tels quels à l'appelant.
#[instrument(skip(config), fields(tickers = config.tickers.len()))]
pub async fn fetch_batch(config: &Config) -> Result<BatchResponse> {
    let url = build_batch_url(config);
    debug!(url = %redact_token(&url), "Built IEX batch URL");

    let client = reqwest::Client::builder()
        .user_agent(concat!("stocksheet/", env!("CARGO_PKG_VERSION")))
        .build()?;

    debug!("Sending batch request to IEX Cloud");
    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| ReportError::Transport(e.without_url()))?;

    let status = response.status();
    debug!(status = %status, "Received HTTP response");

    if !status.is_success() {
        error!(status = %status, "IEX Cloud returned error status");
        return Err(ReportError::HttpStatus { status });
    }

    let body = response
        .text()
        .await
        .map_err(|e| ReportError::Transport(e.without_url()))?;
    debug!(bytes = body.len(), "Parsing JSON response");
    let batch = parse_batch_response(&body)?;

    info!(symbols = batch.len(), "Fetched batch response");
    Ok(batch)
}

/// Transforme la réponse batch en table, dans l'ordre des tickers demandés
///
/// - un ticker absent de la réponse est ignoré (warning)
/// - un dividendYield absent ou null vaut 0
/// - un prix ou un nom de société manquant est une erreur de schéma
pub fn shape_report<S: AsRef<str>>(tickers: &[S], batch: &BatchResponse) -> Result<ReportTable> {
    let mut table = ReportTable::new();
    let mut missing = 0;

    for ticker in tickers {
        let ticker = ticker.as_ref();
        let entry = match batch.get(ticker) {
            Some(entry) => entry,
            None => {
                warn!(ticker = %ticker, "Ticker missing from batch response");
                missing += 1;
                continue;
            }
        };

        let price = entry.price.ok_or_else(|| schema_error(ticker, "price"))?;
        let stats = entry
            .stats
            .as_ref()
            .ok_or_else(|| schema_error(ticker, "stats"))?;
        let company_name = stats
            .company_name
            .clone()
            .ok_or_else(|| schema_error(ticker, "stats.companyName"))?;
        let dividend_yield = stats.dividend_yield.unwrap_or(0.0);

        table.push(ReportRow::new(
            ticker.to_string(),
            company_name,
            price,
            dividend_yield,
        ));
    }

    debug!(rows = table.len(), missing, "Shaped report table");
    Ok(table)
}

fn schema_error(ticker: &str, field: &'static str) -> ReportError {
    error!(ticker = %ticker, field, "Required field missing from batch response");
    ReportError::Schema {
        ticker: ticker.to_string(),
        field,
    }
}

/// Masque la valeur du paramètre `token=` avant de logger une URL
///
/// Seule la valeur du paramètre est remplacée : un token court ("1") ne doit
/// pas modifier les symboles.
fn redact_token(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };

    let params: Vec<String> = query
        .split('&')
        .map(|param| match param.split_once('=') {
            Some(("token", value)) if !value.is_empty() => "token=***".to_string(),
            _ => param.to_string(),
        })
        .collect();

    format!("{}?{}", base, params.join("&"))
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Endpoint;

    const CANNED: &str = r#"{
        "AAA": {"price": 10.5, "stats": {"companyName": "Alpha Co", "dividendYield": 0.02}},
        "BBB": {"price": 20.0, "stats": {"companyName": "Beta Co", "dividendYield": null}}
    }"#;

    fn test_config() -> Config {
        Config {
            tickers: vec!["AAA".to_string(), "BBB".to_string()],
            token: "tok123".to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_build_batch_url() {
        let url = build_batch_url(&test_config());
        assert_eq!(
            url,
            "https://cloud.iexapis.com/stable/stock/market/batch?symbols=AAA,BBB&types=price,stats&range=1y&token=tok123"
        );
    }

    #[test]
    fn test_build_batch_url_reference_tickers() {
        let config = Config {
            token: "t".to_string(),
            ..Config::default()
        };
        let url = build_batch_url(&config);
        assert!(url.contains("symbols=MSFT,AAPL,AMZN,GOOG,FB,BRK.B,JNJ,WMT,V,PG&"));
    }

    #[test]
    fn test_build_batch_url_custom_endpoints() {
        let config = Config {
            endpoints: vec![Endpoint::Stats],
            base_url: "http://localhost:8080/".to_string(),
            ..test_config()
        };
        let url = build_batch_url(&config);
        assert!(url.starts_with("http://localhost:8080/stock/market/batch?"));
        assert!(url.contains("&types=stats&"));
    }

    #[test]
    fn test_redact_token() {
        let url = build_batch_url(&test_config());
        let redacted = redact_token(&url);
        assert!(!redacted.contains("tok123"));
        assert!(redacted.ends_with("token=***"));
    }

    #[test]
    fn test_redact_short_token_keeps_symbols() {
        let config = Config {
            tickers: vec!["T1".to_string(), "A1B".to_string()],
            token: "1".to_string(),
            ..Config::default()
        };
        let redacted = redact_token(&build_batch_url(&config));
        assert!(redacted.contains("symbols=T1,A1B&"));
        assert!(redacted.contains("range=1y&"));
        assert!(redacted.ends_with("&token=***"));
    }

    #[test]
    fn test_redact_without_query() {
        assert_eq!(redact_token("http://localhost/batch"), "http://localhost/batch");
    }

    #[test]
    fn test_shape_end_to_end_scenario() {
        let batch = parse_batch_response(CANNED).unwrap();
        let table = shape_report(&["AAA", "BBB"], &batch).unwrap();

        let expected = ReportTable::from(vec![
            ReportRow::new("AAA".into(), "Alpha Co".into(), 10.5, 0.02),
            ReportRow::new("BBB".into(), "Beta Co".into(), 20.0, 0.0),
        ]);
        assert_eq!(table, expected);
    }

    #[test]
    fn test_shape_follows_input_order() {
        let batch = parse_batch_response(CANNED).unwrap();
        let table = shape_report(&["BBB", "AAA"], &batch).unwrap();
        assert_eq!(table.tickers(), vec!["BBB", "AAA"]);
    }

    #[test]
    fn test_shape_missing_yield_defaults_to_zero() {
        let batch = parse_batch_response(
            r#"{"CCC": {"price": 5.0, "stats": {"companyName": "Gamma"}}}"#,
        )
        .unwrap();
        let table = shape_report(&["CCC"], &batch).unwrap();
        assert_eq!(table.rows()[0].dividend_yield, 0.0);
    }

    #[test]
    fn test_shape_skips_tickers_absent_from_response() {
        let batch = parse_batch_response(CANNED).unwrap();
        let table = shape_report(&["AAA", "ZZZ", "BBB"], &batch).unwrap();
        assert_eq!(table.tickers(), vec!["AAA", "BBB"]);
    }

    #[test]
    fn test_shape_duplicate_input_gives_duplicate_rows() {
        let batch = parse_batch_response(CANNED).unwrap();
        let table = shape_report(&["AAA", "AAA"], &batch).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_shape_missing_price_is_schema_error() {
        let batch = parse_batch_response(
            r#"{"AAA": {"stats": {"companyName": "Alpha Co", "dividendYield": 0.01}}}"#,
        )
        .unwrap();
        let err = shape_report(&["AAA"], &batch).unwrap_err();
        assert!(matches!(err, ReportError::Schema { field: "price", .. }));
    }

    #[test]
    fn test_shape_missing_company_name_is_schema_error() {
        let batch =
            parse_batch_response(r#"{"AAA": {"price": 1.0, "stats": {"dividendYield": 0.01}}}"#)
                .unwrap();
        let err = shape_report(&["AAA"], &batch).unwrap_err();
        assert!(matches!(
            err,
            ReportError::Schema { field: "stats.companyName", .. }
        ));
    }

    #[test]
    fn test_shape_is_idempotent() {
        let batch = parse_batch_response(CANNED).unwrap();
        let first = shape_report(&["AAA", "BBB"], &batch).unwrap();
        let second = shape_report(&["AAA", "BBB"], &batch).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_shape_row_count_matches_input() {
        let body: String = {
            let entries: Vec<String> = (0..10)
                .map(|i| {
                    format!(
                        r#""T{i}": {{"price": {i}.0, "stats": {{"companyName": "Co {i}", "dividendYield": 0.01}}}}"#
                    )
                })
                .collect();
            format!("{{{}}}", entries.join(","))
        };
        let batch = parse_batch_response(&body).unwrap();
        let tickers: Vec<String> = (0..10).map(|i| format!("T{i}")).collect();

        let table = shape_report(&tickers, &batch).unwrap();
        assert_eq!(table.len(), 10);
        assert_eq!(table.tickers(), tickers.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn test_parse_malformed_json() {
        let err = parse_batch_response("not json").unwrap_err();
        assert!(matches!(err, ReportError::Json(_)));
    }

    #[test]
    fn test_parse_unexpected_schema() {
        // Un tableau au lieu d'un objet indexé par symbole
        let err = parse_batch_response("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, ReportError::Json(_)));
    }

    #[tokio::test]
    async fn test_fetch_batch_transport_error() {
        // Port 1 sur localhost : connexion refusée
        let config = Config {
            base_url: "http://127.0.0.1:1".to_string(),
            ..test_config()
        };
        let err = fetch_batch(&config).await.unwrap_err();
        assert!(matches!(err, ReportError::Transport(_)));
    }

    #[tokio::test]
    async fn test_transport_error_hides_token() {
        let config = Config {
            base_url: "http://127.0.0.1:1".to_string(),
            token: "SECRETTOKEN".to_string(),
            ..test_config()
        };
        let err = fetch_batch(&config).await.unwrap_err();

        // Ce qui finit dans les logs (Debug) et sur stderr (Display)
        assert!(!err.to_string().contains("SECRETTOKEN"));
        assert!(!format!("{:?}", err).contains("SECRETTOKEN"));
    }
}
