use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::aircraft::non_empty;
use super::{Aircraft, Airport};
use crate::error::{Result, SpotterError};

/// Format used by the timestamp input (minute precision, no zone).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Who can see a sighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    pub fn toggle(self) -> Self {
        match self {
            Self::Public => Self::Private,
            Self::Private => Self::Public,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "PUBLIC",
            Self::Private => "PRIVATE",
        }
    }
}

/// The "new sighting" form as the user fills it in.
///
/// Autocomplete selections feed in through [`apply_airport`](Self::apply_airport)
/// and [`apply_aircraft`](Self::apply_aircraft), which also fill the
/// related fields from the selected record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SightingDraft {
    pub timestamp: String,
    pub airport_iata_or_icao: String,
    pub location_text: String,
    pub airline: String,
    pub callsign: String,
    pub icao24: String,
    pub registration: String,
    pub aircraft_model: String,
    pub notes: String,
    pub visibility: Visibility,
}

/// Body of `POST /api/sightings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SightingRequest {
    pub timestamp: NaiveDateTime,
    pub airport_iata_or_icao: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub airline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callsign: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icao24: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aircraft_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub visibility: Visibility,
}

impl SightingDraft {
    /// A blank draft stamped with the current local time.
    pub fn new() -> Self {
        Self {
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            ..Self::default()
        }
    }

    /// Airport picked from the autocomplete.
    pub fn apply_airport(&mut self, value: &str, airport: Option<&Airport>) {
        self.airport_iata_or_icao = value.to_string();
        if let Some(airport) = airport {
            let location = airport.location_text();
            if !location.is_empty() {
                self.location_text = location;
            }
        }
    }

    /// Aircraft picked from the autocomplete. Fields the record does not
    /// know keep whatever the user had typed.
    pub fn apply_aircraft(&mut self, value: &str, aircraft: Option<&Aircraft>) {
        self.callsign = value.trim().to_string();
        let Some(aircraft) = aircraft else {
            return;
        };

        if let Some(icao24) = non_empty(Some(&aircraft.icao24)) {
            self.icao24 = icao24.to_string();
        }
        if let Some(registration) = non_empty(aircraft.registration.as_deref()) {
            self.registration = registration.to_string();
        }
        if let Some(model) = aircraft.full_model() {
            self.aircraft_model = model;
        }
        if let Some(operator) = non_empty(aircraft.operator.as_deref()) {
            self.airline = operator.to_string();
        }
    }

    pub fn parsed_timestamp(&self) -> Result<NaiveDateTime> {
        let raw = self.timestamp.trim();
        NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
            .map_err(|_| {
                SpotterError::ValidationError(format!(
                    "timestamp must look like 2024-05-01T14:30, got {raw:?}"
                ))
            })
    }

    pub fn validate(&self) -> Result<()> {
        self.parsed_timestamp()?;
        if self.airport_iata_or_icao.trim().is_empty() {
            return Err(SpotterError::ValidationError(
                "an airport is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Validate and convert into the request body, dropping empty optionals.
    pub fn to_request(&self) -> Result<SightingRequest> {
        self.validate()?;
        let opt = |s: &str| non_empty(Some(s)).map(ToOwned::to_owned);
        Ok(SightingRequest {
            timestamp: self.parsed_timestamp()?,
            airport_iata_or_icao: self.airport_iata_or_icao.trim().to_string(),
            location_text: opt(&self.location_text),
            airline: opt(&self.airline),
            callsign: opt(&self.callsign),
            icao24: opt(&self.icao24),
            registration: opt(&self.registration),
            aircraft_model: opt(&self.aircraft_model),
            notes: opt(&self.notes),
            visibility: self.visibility,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lisbon() -> Airport {
        Airport {
            icao: "LPPT".into(),
            iata: Some("LIS".into()),
            name: "Humberto Delgado".into(),
            city: "Lisbon".into(),
            country: "Portugal".into(),
            latitude: Some(38.78),
            longitude: Some(-9.13),
        }
    }

    fn ryanair() -> Aircraft {
        Aircraft {
            icao24: "4ca7b4".into(),
            callsign: "RYR12AB".into(),
            registration: Some("EI-DCL".into()),
            model: Some("737-8AS".into()),
            manufacturer: Some("Boeing".into()),
            operator: Some("Ryanair".into()),
            origin_country: Some("Ireland".into()),
        }
    }

    #[test]
    fn test_apply_airport_fills_location() {
        let mut draft = SightingDraft::new();
        draft.apply_airport("LPPT", Some(&lisbon()));
        assert_eq!(draft.airport_iata_or_icao, "LPPT");
        assert_eq!(draft.location_text, "Lisbon, Portugal");
    }

    #[test]
    fn test_apply_airport_without_data_keeps_location() {
        let mut draft = SightingDraft::new();
        draft.location_text = "Rooftop".into();
        draft.apply_airport("LPPT", None);
        assert_eq!(draft.location_text, "Rooftop");
    }

    #[test]
    fn test_apply_aircraft_autofills() {
        let mut draft = SightingDraft::new();
        draft.apply_aircraft("RYR12AB", Some(&ryanair()));
        assert_eq!(draft.callsign, "RYR12AB");
        assert_eq!(draft.icao24, "4ca7b4");
        assert_eq!(draft.registration, "EI-DCL");
        assert_eq!(draft.aircraft_model, "Boeing 737-8AS");
        assert_eq!(draft.airline, "Ryanair");
    }

    #[test]
    fn test_apply_aircraft_keeps_previous_for_missing_fields() {
        let mut draft = SightingDraft::new();
        draft.registration = "CS-TNP".into();
        draft.airline = "TAP".into();
        let mut aircraft = ryanair();
        aircraft.registration = None;
        aircraft.operator = None;
        draft.apply_aircraft("RYR12AB", Some(&aircraft));
        assert_eq!(draft.registration, "CS-TNP");
        assert_eq!(draft.airline, "TAP");
    }

    #[test]
    fn test_validate_requires_airport() {
        let draft = SightingDraft::new();
        assert!(matches!(draft.validate(), Err(SpotterError::ValidationError(_))));
    }

    #[test]
    fn test_validate_rejects_bad_timestamp() {
        let mut draft = SightingDraft::new();
        draft.airport_iata_or_icao = "LPPT".into();
        draft.timestamp = "yesterday".into();
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_to_request_omits_empty_optionals() {
        let mut draft = SightingDraft::new();
        draft.timestamp = "2024-05-01T14:30".into();
        draft.apply_airport("LPPT", Some(&lisbon()));
        draft.visibility = Visibility::Private;

        let request = draft.to_request().unwrap();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["airportIataOrIcao"], "LPPT");
        assert_eq!(json["locationText"], "Lisbon, Portugal");
        assert_eq!(json["visibility"], "PRIVATE");
        assert_eq!(json["timestamp"], "2024-05-01T14:30:00");
        assert!(json.get("callsign").is_none());
        assert!(json.get("notes").is_none());
    }
}
