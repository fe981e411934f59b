use serde::{Deserialize, Serialize};

/// A live aircraft as returned by `GET /api/lookup/aircraft`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aircraft {
    pub icao24: String,

    #[serde(default)]
    pub callsign: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_country: Option<String>,
}

impl Aircraft {
    /// "Manufacturer Model", or just the model when the maker is unknown.
    pub fn full_model(&self) -> Option<String> {
        let model = non_empty(self.model.as_deref())?;
        let maker = non_empty(self.manufacturer.as_deref()).unwrap_or_default();
        Some(format!("{maker} {model}").trim().to_string())
    }
}

pub(crate) fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case() {
        let aircraft: Aircraft = serde_json::from_str(
            r#"{"icao24":"4ca7b4","callsign":"RYR12AB ","originCountry":"Ireland",
                "model":"737-8AS","manufacturer":"Boeing"}"#,
        )
        .unwrap();
        assert_eq!(aircraft.origin_country.as_deref(), Some("Ireland"));
        assert_eq!(aircraft.full_model().as_deref(), Some("Boeing 737-8AS"));
    }

    #[test]
    fn test_full_model_without_manufacturer() {
        let aircraft = Aircraft {
            icao24: "abc123".into(),
            callsign: "TAP123".into(),
            registration: None,
            model: Some("A320".into()),
            manufacturer: Some("  ".into()),
            operator: None,
            origin_country: None,
        };
        assert_eq!(aircraft.full_model().as_deref(), Some("A320"));
    }
}
