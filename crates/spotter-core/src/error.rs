use thiserror::Error;

/// All errors that can occur in spotter-core.
#[derive(Debug, Error)]
pub enum SpotterError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("No async runtime available: {0}")]
    Runtime(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Exit codes used by the `spotter` binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    NotFound = 2,
    InvalidArgs = 3,
    NetworkError = 6,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl SpotterError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::ValidationError(_) | Self::ConfigError(_) => ExitCode::InvalidArgs,
            _ => ExitCode::GeneralError,
        }
    }
}

pub type Result<T> = std::result::Result<T, SpotterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitCode::NetworkError.code(), 6);
        let err = SpotterError::ValidationError("bad".into());
        assert_eq!(err.exit_code(), ExitCode::InvalidArgs);
        assert_eq!(err.to_string(), "Validation error: bad");
    }
}
