//! A [`PersistenceSink`] writing to PostGIS through `sqlx`.
//!
//! Every scenario runs inside one database transaction. Attribute values are bound as query
//! parameters and geometries are passed through `ST_GeomFromText`.

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Executor, PgPool, Postgres, Transaction};
use tokio::runtime::Runtime;
use tracing::{debug, info};

use super::PersistenceSink;
use crate::config::PostgisConfig;
use crate::error::{GeoFixtureError, Result};
use crate::feature::{AttributeValue, Attributes};
use crate::schema::Table;

/// Build `INSERT INTO <table> (<columns>, geom) VALUES ($1, ..., ST_GeomFromText($n, srid))`.
///
/// Column names must belong to `table`; they come from [`Table::columns`], never from free
/// text.
pub fn insert_statement<'a>(
    table: Table,
    columns: impl IntoIterator<Item = &'a str>,
    srid: i32,
) -> Result<String> {
    let mut names = vec![];
    for name in columns {
        let column = table.column(name).ok_or_else(|| {
            GeoFixtureError::Sink(format!("table {} has no column '{}'", table, name))
        })?;
        names.push(column.name);
    }
    let placeholders: Vec<String> = (1..=names.len()).map(|i| format!("${}", i)).collect();
    names.push("geom");
    Ok(format!(
        "INSERT INTO {} ({}) VALUES ({}{}ST_GeomFromText(${}, {}))",
        table.name(),
        names.join(", "),
        placeholders.join(", "),
        if placeholders.is_empty() { "" } else { ", " },
        placeholders.len() + 1,
        srid
    ))
}

pub struct PostgisSink {
    runtime: Runtime,
    pool: PgPool,
    tx: Option<(String, Transaction<'static, Postgres>)>,
}

impl PostgisSink {
    /// Connect using `config`. The sink owns a single-threaded runtime and blocks on every call.
    pub fn connect(config: &PostgisConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.database)
            .username(&config.user)
            .password(&config.password);
        let pool = runtime.block_on(
            PgPoolOptions::new()
                .max_connections(1)
                .connect_with(options),
        )?;
        info!(host = %config.host, database = %config.database, "connected to PostGIS");
        Ok(Self {
            runtime,
            pool,
            tx: None,
        })
    }

    /// Create every fixture table and its spatial index if missing.
    pub fn ensure_schema(&self, srid: i32) -> Result<()> {
        let pool = &self.pool;
        self.runtime.block_on(async move {
            for table in Table::ALL {
                pool.execute(table.create_statement(srid).as_str()).await?;
                pool.execute(table.index_statement().as_str()).await?;
                debug!(table = table.name(), "table ready");
            }
            Ok::<_, GeoFixtureError>(())
        })
    }

    /// Delete every row from the fixture tables so a run starts from empty tables.
    pub fn reset_tables(&self) -> Result<()> {
        self.runtime
            .block_on(self.pool.execute(Table::truncate_statement().as_str()))?;
        info!(tables = Table::ALL.len(), "fixture tables truncated");
        Ok(())
    }
}

impl PersistenceSink for PostgisSink {
    fn begin(&mut self, scenario: &str) -> Result<()> {
        if let Some((open, _)) = &self.tx {
            return Err(GeoFixtureError::Sink(format!(
                "cannot begin '{}' while '{}' is open",
                scenario, open
            )));
        }
        let tx = self.runtime.block_on(self.pool.begin())?;
        self.tx = Some((scenario.to_string(), tx));
        Ok(())
    }

    fn record_feature(
        &mut self,
        table: Table,
        attributes: &Attributes,
        geometry_wkt: &str,
        srid: i32,
    ) -> Result<()> {
        let (_, tx) = self
            .tx
            .as_mut()
            .ok_or_else(|| GeoFixtureError::Sink("record outside of a scenario".to_string()))?;
        let sql = insert_statement(table, attributes.keys().map(String::as_str), srid)?;

        let mut query = sqlx::query::<Postgres>(&sql);
        for value in attributes.values() {
            query = match value {
                AttributeValue::Text(v) => query.bind(v.clone()),
                AttributeValue::Integer(v) => query.bind(*v),
                AttributeValue::Float(v) => query.bind(*v),
                AttributeValue::Date(v) => query.bind(*v),
            };
        }
        query = query.bind(geometry_wkt.to_string());

        self.runtime.block_on(query.execute(&mut **tx))?;
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        let (_, tx) = self
            .tx
            .take()
            .ok_or_else(|| GeoFixtureError::Sink("commit without begin".to_string()))?;
        self.runtime.block_on(tx.commit())?;
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        if let Some((_, tx)) = self.tx.take() {
            self.runtime.block_on(tx.rollback())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn insert_binds_every_attribute() {
        let sql = insert_statement(Table::HazardZones, ["severity", "return_period_years"], 2056)
            .unwrap();
        assert_eq!(
            sql,
            "INSERT INTO hazard_zones (severity, return_period_years, geom) \
             VALUES ($1, $2, ST_GeomFromText($3, 2056))"
        );
    }

    #[test]
    fn insert_rejects_unknown_columns() {
        assert!(insert_statement(Table::Stations, ["name; DROP TABLE stations"], 2056).is_err());
    }
}
