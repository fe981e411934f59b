pub mod aircraft;
pub mod airport;
pub mod sighting;

pub use aircraft::Aircraft;
pub use airport::Airport;
pub use sighting::{SightingDraft, SightingRequest, Visibility};
