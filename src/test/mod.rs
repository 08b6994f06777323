//! Shared fixtures for unit tests.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{FeatureCounts, GeneratorConfig};
use crate::frame::CoordinateFrame;

pub(crate) fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub(crate) fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

/// Default config with small bulk counts and a fixed seed and date.
pub(crate) fn small_config() -> GeneratorConfig {
    GeneratorConfig {
        counts: FeatureCounts {
            buildings: 60,
            parcels: 12,
            house_connections: 10,
            pipe_segments: 15,
            ..Default::default()
        },
        seed: Some(42),
        reference_date: Some(reference_date()),
        ..Default::default()
    }
}

pub(crate) fn scenario_frame() -> CoordinateFrame {
    GeneratorConfig::default().scenario_frame()
}
