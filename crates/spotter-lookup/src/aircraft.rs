use std::sync::Arc;

use async_trait::async_trait;
use spotter_core::{Aircraft, Airport, AutocompleteOption, OptionSource};

use crate::error::Result;
use crate::http::RateLimitedClient;

/// Live aircraft search, optionally anchored at an airport.
///
/// The backend searches a small radius around the given coordinates, and
/// the whole of Europe when none are sent. As an [`OptionSource`] the
/// lookup only answers once it has an anchor airport.
pub struct AircraftLookup {
    client: Arc<RateLimitedClient>,
    anchor: Option<Airport>,
}

impl AircraftLookup {
    pub fn new(client: Arc<RateLimitedClient>) -> Self {
        Self {
            client,
            anchor: None,
        }
    }

    pub fn near(client: Arc<RateLimitedClient>, airport: Airport) -> Self {
        Self {
            client,
            anchor: Some(airport),
        }
    }

    pub fn anchor(&self) -> Option<&Airport> {
        self.anchor.as_ref()
    }

    /// Search around the anchor airport, or everywhere without one.
    pub async fn search(&self, query: &str) -> Result<Vec<Aircraft>> {
        let coordinates = self.anchor.as_ref().and_then(Airport::coordinates);
        self.search_at(query, coordinates).await
    }

    /// Search around explicit `(lat, lon)` coordinates.
    pub async fn search_at(
        &self,
        query: &str,
        coordinates: Option<(f64, f64)>,
    ) -> Result<Vec<Aircraft>> {
        let mut url = self.client.endpoint(&["api", "lookup", "aircraft"])?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", query);
            if let Some((lat, lon)) = coordinates {
                pairs
                    .append_pair("lat", &lat.to_string())
                    .append_pair("lon", &lon.to_string());
            }
        }
        self.client.get_json(&url).await
    }

    pub async fn by_icao24(&self, icao24: &str) -> Result<Aircraft> {
        let hex = icao24.trim().to_ascii_lowercase();
        let url = self.client.endpoint(&["api", "lookup", "aircraft", &hex])?;
        self.client.get_json(&url).await
    }
}

/// `RYR12AB (EI-DCL)`, with `ICAO24: 4ca7b4 • 737-8AS • Ryanair • Ireland`
/// underneath. Unknown parts are left out.
pub fn aircraft_option(aircraft: Aircraft) -> AutocompleteOption<Aircraft> {
    let mut label = aircraft.callsign.trim().to_string();
    if let Some(registration) = present(&aircraft.registration) {
        label.push_str(&format!(" ({registration})"));
    }

    let mut details = vec![format!("ICAO24: {}", aircraft.icao24)];
    details.extend(
        [&aircraft.model, &aircraft.operator, &aircraft.origin_country]
            .into_iter()
            .filter_map(present)
            .map(ToOwned::to_owned),
    );

    AutocompleteOption::new(aircraft.callsign.clone(), label)
        .with_sublabel(details.join(" • "))
        .with_data(aircraft)
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[async_trait]
impl OptionSource<Aircraft> for AircraftLookup {
    async fn fetch_options(&self, query: &str) -> anyhow::Result<Vec<AutocompleteOption<Aircraft>>> {
        if self.anchor.is_none() {
            return Ok(Vec::new());
        }
        let aircraft = self.search(query).await?;
        tracing::debug!(query, count = aircraft.len(), "aircraft lookup");
        Ok(aircraft.into_iter().map(aircraft_option).collect())
    }
}
