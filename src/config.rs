//! Runtime configuration.
//!
//! Values are layered: built-in defaults, then an optional JSON file named by
//! `GEOFIXTURE_CONFIG`, then individual `GEOFIXTURE_*` environment variables.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::algorithm::JitterRange;
use crate::error::{GeoFixtureError, Result};
use crate::frame::CoordinateFrame;

pub const CONFIG_PATH_ENV: &str = "GEOFIXTURE_CONFIG";

/// LV95 (Swiss projected) reference system used for every table.
pub const DEFAULT_SRID: i32 = 2056;

/// A planar position in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    pub x: f64,
    pub y: f64,
}

/// Which feature sets a run produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Randomized categories only.
    Bulk,
    /// The five authored scenarios only.
    Scenarios,
    #[default]
    All,
}

impl FromStr for RunMode {
    type Err = GeoFixtureError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bulk" => Ok(RunMode::Bulk),
            "scenarios" => Ok(RunMode::Scenarios),
            "all" => Ok(RunMode::All),
            other => Err(GeoFixtureError::InvalidConfig(format!(
                "unknown run mode '{}', expected bulk, scenarios or all",
                other
            ))),
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunMode::Bulk => "bulk",
            RunMode::Scenarios => "scenarios",
            RunMode::All => "all",
        };
        f.write_str(s)
    }
}

/// How many features each bulk category (and the residential street) produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureCounts {
    pub buildings: usize,
    pub parcels: usize,
    pub house_connections: usize,
    pub pipe_segments: usize,
    pub street_buildings: usize,
}

impl Default for FeatureCounts {
    fn default() -> Self {
        Self {
            buildings: 200,
            parcels: 100,
            house_connections: 150,
            pipe_segments: 80,
            street_buildings: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Center of the bulk population.
    pub origin: Origin,
    /// Origin the authored scenarios are laid out from.
    pub scenario_origin: Origin,
    /// Bulk features are placed within this distance of `origin`.
    pub bounding_radius: f64,
    pub jitter: JitterRange,
    pub srid: i32,
    pub counts: FeatureCounts,
    /// Seed for the random source. A fresh seed is drawn when absent.
    pub seed: Option<u64>,
    pub mode: RunMode,
    /// Date that generated lay dates count back from. Defaults to today.
    pub reference_date: Option<NaiveDate>,
    /// Empty every fixture table before seeding.
    pub reset: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            origin: Origin {
                x: 2683000.,
                y: 1248000.,
            },
            scenario_origin: Origin {
                x: 2697000.,
                y: 1262000.,
            },
            bounding_radius: 3000.,
            jitter: JitterRange::default(),
            srid: DEFAULT_SRID,
            counts: FeatureCounts::default(),
            seed: None,
            mode: RunMode::default(),
            reference_date: None,
            reset: true,
        }
    }
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| GeoFixtureError::InvalidConfig(format!("{}: cannot parse '{}'", key, value)))
}

impl GeneratorConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, then the JSON file in `GEOFIXTURE_CONFIG`, then `GEOFIXTURE_*` overrides.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self> {
        let mut config = match lookup(CONFIG_PATH_ENV) {
            Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
            None => Self::default(),
        };
        config.apply_overrides(&lookup)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides<F: Fn(&str) -> Option<String>>(&mut self, lookup: &F) -> Result<()> {
        macro_rules! set {
            ($key:literal => $($field:ident).+) => {
                if let Some(value) = lookup($key) {
                    self.$($field).+ = parse_env($key, &value)?;
                }
            };
        }

        set!("GEOFIXTURE_ORIGIN_X" => origin.x);
        set!("GEOFIXTURE_ORIGIN_Y" => origin.y);
        set!("GEOFIXTURE_SCENARIO_ORIGIN_X" => scenario_origin.x);
        set!("GEOFIXTURE_SCENARIO_ORIGIN_Y" => scenario_origin.y);
        set!("GEOFIXTURE_BOUNDING_RADIUS" => bounding_radius);
        set!("GEOFIXTURE_SRID" => srid);
        set!("GEOFIXTURE_MODE" => mode);
        set!("GEOFIXTURE_COUNT_BUILDINGS" => counts.buildings);
        set!("GEOFIXTURE_COUNT_PARCELS" => counts.parcels);
        set!("GEOFIXTURE_COUNT_HOUSE_CONNECTIONS" => counts.house_connections);
        set!("GEOFIXTURE_COUNT_PIPE_SEGMENTS" => counts.pipe_segments);
        set!("GEOFIXTURE_COUNT_STREET_BUILDINGS" => counts.street_buildings);
        set!("GEOFIXTURE_RESET" => reset);

        if let Some(value) = lookup("GEOFIXTURE_SEED") {
            self.seed = Some(parse_env("GEOFIXTURE_SEED", &value)?);
        }
        if let Some(value) = lookup("GEOFIXTURE_REFERENCE_DATE") {
            self.reference_date = Some(parse_env("GEOFIXTURE_REFERENCE_DATE", &value)?);
        }
        if let Some(value) = lookup("GEOFIXTURE_JITTER") {
            let (lo, hi) = value.split_once(',').ok_or_else(|| {
                GeoFixtureError::InvalidConfig(format!(
                    "GEOFIXTURE_JITTER: expected 'lo,hi', got '{}'",
                    value
                ))
            })?;
            self.jitter = JitterRange {
                lo: parse_env("GEOFIXTURE_JITTER", lo)?,
                hi: parse_env("GEOFIXTURE_JITTER", hi)?,
            };
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !self.bounding_radius.is_finite() || self.bounding_radius <= 0. {
            return Err(GeoFixtureError::InvalidConfig(format!(
                "bounding_radius must be positive, got {}",
                self.bounding_radius
            )));
        }
        if self.srid <= 0 {
            return Err(GeoFixtureError::InvalidConfig(format!(
                "srid must be positive, got {}",
                self.srid
            )));
        }
        // The street only exists in runs that build the authored scenes.
        if self.mode != RunMode::Bulk && self.counts.street_buildings == 0 {
            return Err(GeoFixtureError::InvalidConfig(
                "counts.street_buildings must be at least 1".to_string(),
            ));
        }
        self.jitter
            .validate()
            .map_err(|e| GeoFixtureError::InvalidConfig(e.to_string()))
    }

    pub fn bulk_frame(&self) -> CoordinateFrame {
        CoordinateFrame::new(self.origin.x, self.origin.y, self.bounding_radius)
    }

    pub fn scenario_frame(&self) -> CoordinateFrame {
        CoordinateFrame::new(
            self.scenario_origin.x,
            self.scenario_origin.y,
            self.bounding_radius,
        )
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

/// Connection settings for the PostGIS sink, read from `DB_*` variables.
#[derive(Clone, PartialEq, Eq)]
pub struct PostgisConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl fmt::Debug for PostgisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgisConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

impl PostgisConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self> {
        let password = lookup("DB_PASSWORD").ok_or_else(|| {
            GeoFixtureError::InvalidConfig("DB_PASSWORD is not set".to_string())
        })?;
        let port = match lookup("DB_PORT") {
            Some(port) => parse_env("DB_PORT", &port)?,
            None => 5432,
        };
        Ok(Self {
            host: lookup("DB_HOST").unwrap_or_else(|| "localhost".to_string()),
            port,
            database: lookup("DB_NAME").unwrap_or_else(|| "gis".to_string()),
            user: lookup("DB_USER").unwrap_or_else(|| "postgres".to_string()),
            password,
        })
    }
}
