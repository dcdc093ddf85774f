use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::snapshot::SnapshotError;
use std::fmt;

/// Fatal failures surfaced to the command line as a non-zero exit.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Snapshot(SnapshotError),
    Io(std::io::Error),
    Serialization(serde_json::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Snapshot(err) => write!(f, "snapshot error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Serialization(err) => write!(f, "could not serialize brief: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Snapshot(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Serialization(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<SnapshotError> for AppError {
    fn from(value: SnapshotError) -> Self {
        Self::Snapshot(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn snapshot_errors_keep_their_cause() {
        let error = AppError::from(SnapshotError::SourceUnavailable {
            path: "data/missing.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        });

        let message = error.to_string();
        assert!(message.starts_with("snapshot error: snapshot source unavailable at data/missing.json"));
        assert!(error.source().is_some());
    }

    #[test]
    fn config_errors_are_described() {
        let error = AppError::from(ConfigError::NoCompanies);
        assert_eq!(
            error.to_string(),
            "configuration error: configuration must list at least one [[company]]"
        );
    }
}
