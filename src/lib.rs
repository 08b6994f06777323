//! Synthetic GIS fixtures in a projected coordinate system.
//!
//! `geofixture` builds plausible buildings, parcels, hazard zones, stations, house connections
//! and pipe networks around a configurable origin, either as randomized bulk batches or as
//! hand-authored scenarios with known spatial relationships, and writes each scenario
//! atomically through a [`PersistenceSink`](sink::PersistenceSink).
//!
//! ```
//! use geofixture::composer::ScenarioComposer;
//! use geofixture::config::{GeneratorConfig, RunMode};
//! use geofixture::sink::MemorySink;
//!
//! let config = GeneratorConfig {
//!     mode: RunMode::Scenarios,
//!     seed: Some(7),
//!     ..Default::default()
//! };
//! let mut sink = MemorySink::new();
//! let report = ScenarioComposer::from_config(config)?.run(&mut sink)?;
//! assert_eq!(report.total_features(), sink.committed().len());
//! # Ok::<_, geofixture::error::GeoFixtureError>(())
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(not(test), deny(unused_crate_dependencies))]

// Only the seeding binary installs a subscriber.
#[cfg(feature = "postgis")]
use tracing_subscriber as _;

pub use composer::{RunReport, Scenario, ScenarioComposer};
pub use config::GeneratorConfig;
pub use error::{GeoFixtureError, Result};
pub use geometry::Geometry;

pub mod algorithm;
pub mod composer;
pub mod config;
pub mod error;
pub mod feature;
pub mod frame;
pub mod geometry;
pub mod schema;
pub mod sink;
#[cfg(test)]
pub(crate) mod test;
