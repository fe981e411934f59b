use serde::{Deserialize, Serialize};

/// An airport as returned by `GET /api/lookup/airports`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Airport {
    pub icao: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iata: Option<String>,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub city: String,

    #[serde(default)]
    pub country: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl Airport {
    /// Both coordinates, when the backend knows them.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    /// "City, Country", used to pre-fill the sighting location.
    pub fn location_text(&self) -> String {
        match (self.city.is_empty(), self.country.is_empty()) {
            (false, false) => format!("{}, {}", self.city, self.country),
            (false, true) => self.city.clone(),
            (true, false) => self.country.clone(),
            (true, true) => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_payload() {
        let airport: Airport = serde_json::from_str(
            r#"{"icao":"LPPT","iata":"LIS","name":"Humberto Delgado","city":"Lisbon",
                "country":"Portugal","latitude":38.7813,"longitude":-9.1359}"#,
        )
        .unwrap();
        assert_eq!(airport.iata.as_deref(), Some("LIS"));
        assert_eq!(airport.coordinates(), Some((38.7813, -9.1359)));
        assert_eq!(airport.location_text(), "Lisbon, Portugal");
    }

    #[test]
    fn test_missing_fields_default() {
        let airport: Airport = serde_json::from_str(r#"{"icao":"EGLL","iata":null}"#).unwrap();
        assert!(airport.iata.is_none());
        assert!(airport.coordinates().is_none());
        assert_eq!(airport.location_text(), "");
    }
}
