use std::sync::Arc;

use async_trait::async_trait;
use spotter_core::{Airport, AutocompleteOption, OptionSource};

use crate::error::Result;
use crate::http::RateLimitedClient;

/// `GET /api/lookup/airports` and friends.
pub struct AirportLookup {
    client: Arc<RateLimitedClient>,
}

impl AirportLookup {
    pub fn new(client: Arc<RateLimitedClient>) -> Self {
        Self { client }
    }

    /// Airports whose ICAO, IATA, name, city or country match `query`.
    pub async fn search(&self, query: &str) -> Result<Vec<Airport>> {
        let mut url = self.client.endpoint(&["api", "lookup", "airports"])?;
        url.query_pairs_mut().append_pair("q", query);
        self.client.get_json(&url).await
    }

    /// A single airport by ICAO or IATA code.
    pub async fn by_code(&self, code: &str) -> Result<Airport> {
        let url = self
            .client
            .endpoint(&["api", "lookup", "airports", code.trim()])?;
        self.client.get_json(&url).await
    }
}

/// `LIS / LPPT - Humberto Delgado`, with `Lisbon, Portugal` underneath.
pub fn airport_option(airport: Airport) -> AutocompleteOption<Airport> {
    let label = match airport.iata.as_deref().map(str::trim) {
        Some(iata) if !iata.is_empty() => format!("{iata} / {} - {}", airport.icao, airport.name),
        _ => format!("{} - {}", airport.icao, airport.name),
    };
    let mut option = AutocompleteOption::new(airport.icao.clone(), label);
    let location = airport.location_text();
    if !location.is_empty() {
        option = option.with_sublabel(location);
    }
    option.with_data(airport)
}

#[async_trait]
impl OptionSource<Airport> for AirportLookup {
    async fn fetch_options(&self, query: &str) -> anyhow::Result<Vec<AutocompleteOption<Airport>>> {
        let airports = self.search(query).await?;
        Ok(airports.into_iter().map(airport_option).collect())
    }
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server};

    use super::*;
    use crate::error::LookupError;
    use crate::http::client_for_tests;

    const LISBON: &str = r#"{"icao":"LPPT","iata":"LIS","name":"Humberto Delgado",
        "city":"Lisbon","country":"Portugal","latitude":38.7813,"longitude":-9.1359}"#;

    fn lookup(server: &Server) -> AirportLookup {
        AirportLookup::new(Arc::new(client_for_tests(&server.url())))
    }

    #[tokio::test]
    async fn test_search_encodes_query() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/api/lookup/airports")
            .match_query(Matcher::UrlEncoded("q".into(), "São Paulo".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let airports = lookup(&server).search("São Paulo").await.unwrap();
        assert!(airports.is_empty());
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_options_shapes_labels() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/api/lookup/airports")
            .match_query(Matcher::UrlEncoded("q".into(), "lis".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!("[{LISBON}]"))
            .create_async()
            .await;

        let options = lookup(&server).fetch_options("lis").await.unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].value, "LPPT");
        assert_eq!(options[0].label, "LIS / LPPT - Humberto Delgado");
        assert_eq!(options[0].sublabel.as_deref(), Some("Lisbon, Portugal"));
        assert_eq!(options[0].data.as_ref().map(|a| a.city.as_str()), Some("Lisbon"));
    }

    #[tokio::test]
    async fn test_by_code_not_found() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/api/lookup/airports/ZZZZ")
            .with_status(404)
            .create_async()
            .await;

        let err = lookup(&server).by_code("ZZZZ").await.unwrap_err();
        assert!(matches!(err, LookupError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_server_failure_surfaces_as_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/api/lookup/airports")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        assert!(lookup(&server).fetch_options("lis").await.is_err());
    }

    #[test]
    fn test_option_without_iata() {
        let airport: Airport =
            serde_json::from_str(r#"{"icao":"LPFR","name":"Faro","city":"","country":""}"#).unwrap();
        let option = airport_option(airport);
        assert_eq!(option.label, "LPFR - Faro");
        assert!(option.sublabel.is_none());
    }
}
