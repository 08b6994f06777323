//! Defines [`GeoFixtureError`], representing all errors returned by this crate.

use std::fmt::Debug;
use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GeoFixtureError {
    /// A polygon or rectangle was requested with parameters that cannot produce a valid ring.
    #[error("Invalid geometry configuration: {0}")]
    InvalidGeometryConfig(String),

    /// A pipe edge carried a material or diameter outside the allowed catalog.
    #[error("Invalid network attribute: {0}")]
    InvalidNetworkAttribute(String),

    /// The persistence sink rejected a write or commit while a scenario was being persisted.
    ///
    /// Everything recorded for `scenario` was rolled back before this error was returned.
    #[error("Persisting scenario '{scenario}' failed after {attempted} feature(s): {source}")]
    PersistenceFailure {
        scenario: String,
        attempted: usize,
        #[source]
        source: Box<GeoFixtureError>,
    },

    /// Configuration could not be parsed or failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error raised by a persistence sink.
    #[error("Sink error: {0}")]
    Sink(String),

    /// General error.
    #[error("General error: {0}")]
    General(String),

    /// Error returned while parsing well-known text.
    #[error("WKT error: {0}")]
    WktStrError(&'static str),

    /// [std::io::Error]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// [serde_json::Error]
    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),

    /// [sqlx::Error]
    #[cfg(feature = "postgis")]
    #[error(transparent)]
    SqlxError(#[from] sqlx::Error),
}

impl GeoFixtureError {
    /// Wrap a sink error with the scenario it interrupted.
    pub(crate) fn persistence(scenario: &str, attempted: usize, source: GeoFixtureError) -> Self {
        GeoFixtureError::PersistenceFailure {
            scenario: scenario.to_string(),
            attempted,
            source: Box::new(source),
        }
    }
}

/// Crate-specific result type.
pub type Result<T> = std::result::Result<T, GeoFixtureError>;
