//! Assembles features into scenarios and persists each one atomically.
//!
//! Two kinds of scenario exist: randomized bulk batches, one per feature category, and five
//! authored scenes whose features are placed in deliberate relation to each other. Both are
//! fully built in memory and then written through a [`PersistenceSink`] as one unit.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use crate::algorithm::{NetworkTopologyBuilder, PolygonSynthesizer};
use crate::config::{GeneratorConfig, RunMode};
use crate::error::{GeoFixtureError, Result};
use crate::feature::SpatialFeature;
use crate::schema::Table;
use crate::sink::PersistenceSink;

pub mod authored;
pub mod bulk;

pub use authored::{
    AuthoredScenario, FloodHazard, NeighborhoodBuildout, ResidentialStreet, TransitDevelopment,
    UtilityNetwork,
};
pub use bulk::BulkBatch;

/// A named bundle of features that is committed as one transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    name: String,
    features: Vec<SpatialFeature>,
}

impl Scenario {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            features: vec![],
        }
    }

    pub fn push(&mut self, feature: impl Into<SpatialFeature>) {
        self.features.push(feature.into());
    }

    pub fn extend<I>(&mut self, features: I)
    where
        I: IntoIterator,
        I::Item: Into<SpatialFeature>,
    {
        self.features.extend(features.into_iter().map(Into::into));
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn features(&self) -> &[SpatialFeature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn features_in(&self, table: Table) -> impl Iterator<Item = &SpatialFeature> {
        self.features.iter().filter(move |f| f.table() == table)
    }

    pub fn count_by_table(&self) -> BTreeMap<Table, usize> {
        let mut counts = BTreeMap::new();
        for feature in &self.features {
            *counts.entry(feature.table()).or_insert(0) += 1;
        }
        counts
    }
}

/// What was committed for one scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioSummary {
    pub name: String,
    pub per_table: BTreeMap<Table, usize>,
}

impl ScenarioSummary {
    pub fn total(&self) -> usize {
        self.per_table.values().sum()
    }
}

impl fmt::Display for ScenarioSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.per_table.is_empty() {
            return write!(f, "{}: 0 features", self.name);
        }
        write!(
            f,
            "{}: {}",
            self.name,
            self.per_table
                .iter()
                .map(|(table, count)| format!("{} {}", count, table))
                .join(", ")
        )
    }
}

/// Scenarios committed by a run, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub scenarios: Vec<ScenarioSummary>,
}

impl RunReport {
    pub fn total_features(&self) -> usize {
        self.scenarios.iter().map(ScenarioSummary::total).sum()
    }
}

fn record_all<S: PersistenceSink + ?Sized>(
    sink: &mut S,
    scenario: &Scenario,
    srid: i32,
    attempted: &mut usize,
) -> Result<()> {
    for feature in scenario.features() {
        *attempted += 1;
        sink.record_feature(
            feature.table(),
            feature.attributes(),
            &feature.geometry().to_wkt(),
            srid,
        )?;
    }
    sink.commit()
}

/// Write `scenario` as one transaction.
///
/// On any sink error the scenario is rolled back and the error is returned as
/// [`GeoFixtureError::PersistenceFailure`] carrying the scenario name and how many features
/// had been attempted.
pub fn persist<S: PersistenceSink + ?Sized>(
    sink: &mut S,
    scenario: &Scenario,
    srid: i32,
) -> Result<ScenarioSummary> {
    sink.begin(scenario.name())
        .map_err(|e| GeoFixtureError::persistence(scenario.name(), 0, e))?;

    let mut attempted = 0;
    if let Err(e) = record_all(sink, scenario, srid, &mut attempted) {
        warn!(
            scenario = scenario.name(),
            attempted, "rolling back scenario: {}", e
        );
        if let Err(rollback_error) = sink.rollback() {
            warn!(scenario = scenario.name(), "rollback failed: {}", rollback_error);
        }
        return Err(GeoFixtureError::persistence(scenario.name(), attempted, e));
    }

    info!(
        scenario = scenario.name(),
        features = scenario.len(),
        "scenario committed"
    );
    Ok(ScenarioSummary {
        name: scenario.name().to_string(),
        per_table: scenario.count_by_table(),
    })
}

/// Builds bulk batches and authored scenarios from a [`GeneratorConfig`] and writes them to a
/// sink in a fixed order.
#[derive(Debug)]
pub struct ScenarioComposer<R: Rng = StdRng> {
    config: GeneratorConfig,
    synthesizer: PolygonSynthesizer,
    reference_date: NaiveDate,
    rng: R,
}

impl ScenarioComposer<StdRng> {
    /// Seed from `config.seed`, or from entropy when no seed is configured.
    pub fn from_config(config: GeneratorConfig) -> Result<Self> {
        let seed = config.seed.unwrap_or_else(rand::random);
        info!(seed, "random source seeded");
        Self::new(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> ScenarioComposer<R> {
    pub fn new(config: GeneratorConfig, rng: R) -> Result<Self> {
        config.validate()?;
        let synthesizer = PolygonSynthesizer::new(config.jitter)?;
        let reference_date = config.reference_date();
        Ok(Self {
            config,
            synthesizer,
            reference_date,
            rng,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Build one authored scenario.
    pub fn authored(&self, which: AuthoredScenario) -> Result<Scenario> {
        let frame = self.config.scenario_frame();
        let network = NetworkTopologyBuilder::default();
        let scenario = match which {
            AuthoredScenario::ResidentialStreet => {
                ResidentialStreet::build(&frame, &network, self.config.counts.street_buildings)?
                    .into_scenario()
            }
            AuthoredScenario::FloodHazard => FloodHazard::build(&frame)?.into_scenario(),
            AuthoredScenario::TransitDevelopment => {
                TransitDevelopment::build(&frame)?.into_scenario()
            }
            AuthoredScenario::UtilityNetwork => {
                UtilityNetwork::build(&frame, &network)?.into_scenario()
            }
            AuthoredScenario::NeighborhoodBuildout => {
                NeighborhoodBuildout::build(&frame)?.into_scenario()
            }
        };
        Ok(scenario)
    }

    /// Build, then persist, each scenario the configured [`RunMode`] selects.
    ///
    /// Scenarios are built one at a time right before they are written, so a failure leaves
    /// every earlier scenario committed and nothing of the failing one.
    pub fn run<S: PersistenceSink + ?Sized>(&mut self, sink: &mut S) -> Result<RunReport> {
        let mode = self.config.mode;
        let srid = self.config.srid;
        info!(%mode, srid, "starting fixture run");

        let mut report = RunReport::default();
        if matches!(mode, RunMode::Bulk | RunMode::All) {
            for batch in BulkBatch::ALL {
                let scenario = self.bulk(batch)?;
                report.scenarios.push(persist(sink, &scenario, srid)?);
            }
        }
        if matches!(mode, RunMode::Scenarios | RunMode::All) {
            for which in AuthoredScenario::ALL {
                let scenario = self.authored(which)?;
                report.scenarios.push(persist(sink, &scenario, srid)?);
            }
        }

        info!(
            scenarios = report.scenarios.len(),
            features = report.total_features(),
            "fixture run finished"
        );
        Ok(report)
    }
}
