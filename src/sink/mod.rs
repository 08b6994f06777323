//! Persistence sinks: where finished scenarios are written.
//!
//! A sink sees one scenario at a time as `begin` → `record_feature`* → `commit`, or `rollback`
//! when anything in between fails. Nothing recorded after `begin` may become visible unless the
//! matching `commit` succeeds.

use crate::error::{GeoFixtureError, Result};
use crate::feature::Attributes;
use crate::schema::Table;

#[cfg(feature = "postgis")]
pub mod postgis;

/// The write side of a fixture run.
pub trait PersistenceSink {
    /// Open the scope for `scenario`.
    fn begin(&mut self, scenario: &str) -> Result<()>;

    /// Stage one row. `geometry_wkt` is well-known text in the reference system `srid`.
    fn record_feature(
        &mut self,
        table: Table,
        attributes: &Attributes,
        geometry_wkt: &str,
        srid: i32,
    ) -> Result<()>;

    /// Make everything staged since `begin` visible.
    fn commit(&mut self) -> Result<()>;

    /// Discard everything staged since `begin`.
    fn rollback(&mut self) -> Result<()>;
}

/// A row as a sink received it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedFeature {
    pub scenario: String,
    pub table: Table,
    pub attributes: Attributes,
    pub geometry_wkt: String,
    pub srid: i32,
}

/// Keeps committed rows in memory.
///
/// Failures can be injected to exercise rollback: [`fail_on_record`](Self::fail_on_record)
/// rejects the n-th `record_feature` call (counted over the sink's lifetime, starting at 1) and
/// [`fail_on_commit`](Self::fail_on_commit) rejects the commit of a named scenario.
#[derive(Debug, Default)]
pub struct MemorySink {
    committed: Vec<RecordedFeature>,
    staged: Vec<RecordedFeature>,
    open: Option<String>,
    records_seen: usize,
    fail_on_record: Option<usize>,
    fail_on_commit: Option<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on_record(mut self, n: usize) -> Self {
        self.fail_on_record = Some(n);
        self
    }

    pub fn fail_on_commit(mut self, scenario: impl Into<String>) -> Self {
        self.fail_on_commit = Some(scenario.into());
        self
    }

    pub fn committed(&self) -> &[RecordedFeature] {
        &self.committed
    }

    pub fn committed_in(&self, table: Table) -> impl Iterator<Item = &RecordedFeature> {
        self.committed.iter().filter(move |f| f.table == table)
    }

    pub fn committed_for<'a>(
        &'a self,
        scenario: &'a str,
    ) -> impl Iterator<Item = &'a RecordedFeature> {
        self.committed.iter().filter(move |f| f.scenario == scenario)
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }
}

impl PersistenceSink for MemorySink {
    fn begin(&mut self, scenario: &str) -> Result<()> {
        if let Some(open) = &self.open {
            return Err(GeoFixtureError::Sink(format!(
                "cannot begin '{}' while '{}' is open",
                scenario, open
            )));
        }
        self.open = Some(scenario.to_string());
        Ok(())
    }

    fn record_feature(
        &mut self,
        table: Table,
        attributes: &Attributes,
        geometry_wkt: &str,
        srid: i32,
    ) -> Result<()> {
        let scenario = self
            .open
            .clone()
            .ok_or_else(|| GeoFixtureError::Sink("record outside of a scenario".to_string()))?;
        self.records_seen += 1;
        if self.fail_on_record == Some(self.records_seen) {
            return Err(GeoFixtureError::Sink(format!(
                "injected failure on record {}",
                self.records_seen
            )));
        }
        self.staged.push(RecordedFeature {
            scenario,
            table,
            attributes: attributes.clone(),
            geometry_wkt: geometry_wkt.to_string(),
            srid,
        });
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        let scenario = self
            .open
            .as_deref()
            .ok_or_else(|| GeoFixtureError::Sink("commit without begin".to_string()))?;
        if self.fail_on_commit.as_deref() == Some(scenario) {
            return Err(GeoFixtureError::Sink(format!(
                "injected failure committing '{}'",
                scenario
            )));
        }
        self.committed.append(&mut self.staged);
        self.open = None;
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        self.staged.clear();
        self.open = None;
        Ok(())
    }
}
