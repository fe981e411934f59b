pub mod autocomplete;
pub mod config;
pub mod error;
pub mod models;

pub use config::{AppConfig, AutocompleteFieldConfig, BackendConfig};
pub use error::{ExitCode, Result, SpotterError};
pub use models::*;

pub use autocomplete::{
    Autocomplete, AutocompleteOption, AutocompleteProps, ControllerEvent, KeyResponse, NavKey,
    OnChange, OptionSource, PointerDown, PointerListeners, source_fn,
};
