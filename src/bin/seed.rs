//! Seed a PostGIS database with fixture data.
//!
//! Generator settings come from `GEOFIXTURE_*` variables (and an optional JSON file named by
//! `GEOFIXTURE_CONFIG`); connection settings come from `DB_*` variables. Set `RUST_LOG` to
//! `debug` to see bulk progress. Tables are truncated first unless `GEOFIXTURE_RESET=false`.

use geofixture::config::{GeneratorConfig, PostgisConfig};
use geofixture::sink::postgis::PostgisSink;
use geofixture::{Result, ScenarioComposer};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = GeneratorConfig::from_env()?;
    let db = PostgisConfig::from_env()?;
    info!(?db, mode = %config.mode, "seeding");

    let mut sink = PostgisSink::connect(&db)?;
    sink.ensure_schema(config.srid)?;
    if config.reset {
        sink.reset_tables()?;
    }

    let report = ScenarioComposer::from_config(config)?.run(&mut sink)?;
    for scenario in &report.scenarios {
        info!("{}", scenario);
    }
    info!(
        scenarios = report.scenarios.len(),
        features = report.total_features(),
        "done"
    );
    Ok(())
}
