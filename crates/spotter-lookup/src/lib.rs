//! Spotter Lookup: airport and live-aircraft search against the logbook backend.

pub mod aircraft;
pub mod airports;
pub mod error;
pub mod http;

pub use aircraft::{AircraftLookup, aircraft_option};
pub use airports::{AirportLookup, airport_option};
pub use error::{LookupError, Result};
pub use http::RateLimitedClient;
