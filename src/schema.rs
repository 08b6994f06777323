//! Table and column definitions for the fixture tables.
//!
//! The crate never migrates schemas; these definitions describe the shape a persistence sink
//! is expected to accept and let a sink create missing tables before a run.

use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::geometry::GeometryType;

/// Column types used by the fixture tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text(u16),
    Integer,
    Numeric,
    Date,
}

impl ColumnType {
    pub fn sql(&self) -> String {
        match self {
            ColumnType::Text(len) => format!("VARCHAR({})", len),
            ColumnType::Integer => "INTEGER".to_string(),
            ColumnType::Numeric => "NUMERIC".to_string(),
            ColumnType::Date => "DATE".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub data_type: ColumnType,
    pub default: Option<&'static str>,
}

const fn col(name: &'static str, data_type: ColumnType) -> ColumnDef {
    ColumnDef {
        name,
        data_type,
        default: None,
    }
}

const BOUNDARY_COLUMNS: &[ColumnDef] = &[col("name", ColumnType::Text(100))];

const NEIGHBORHOOD_COLUMNS: &[ColumnDef] = &[
    col("name", ColumnType::Text(100)),
    col("area_ha", ColumnType::Numeric),
];

const BUILDING_COLUMNS: &[ColumnDef] = &[
    col("address", ColumnType::Text(200)),
    col("usage", ColumnType::Text(50)),
    col("construction_year", ColumnType::Integer),
    col("floor_count", ColumnType::Integer),
    col("floor_area_m2", ColumnType::Numeric),
    col("vacancy_rate", ColumnType::Numeric),
];

const HAZARD_ZONE_COLUMNS: &[ColumnDef] = &[
    col("severity", ColumnType::Text(20)),
    col("return_period_years", ColumnType::Integer),
];

const PARCEL_COLUMNS: &[ColumnDef] = &[
    col("parcel_number", ColumnType::Text(50)),
    col("owner", ColumnType::Text(200)),
    col("area_m2", ColumnType::Numeric),
    col("zoning", ColumnType::Text(50)),
];

const STATION_COLUMNS: &[ColumnDef] = &[col("name", ColumnType::Text(100))];

const HOUSE_CONNECTION_COLUMNS: &[ColumnDef] = &[
    col("address", ColumnType::Text(200)),
    col("occupants", ColumnType::Integer),
];

const PIPE_COLUMNS: &[ColumnDef] = &[
    col("pipe_id", ColumnType::Text(50)),
    col("material", ColumnType::Text(20)),
    col("diameter_mm", ColumnType::Integer),
    col("laid_on", ColumnType::Date),
    col("note", ColumnType::Text(200)),
    col("from_node", ColumnType::Text(50)),
    col("to_node", ColumnType::Text(50)),
    ColumnDef {
        name: "status",
        data_type: ColumnType::Text(20),
        default: Some("'active'"),
    },
];

/// Every table a fixture feature can land in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Boundaries,
    Neighborhoods,
    Buildings,
    HazardZones,
    Parcels,
    Stations,
    HouseConnections,
    Pipes,
}

impl Table {
    pub const ALL: [Table; 8] = [
        Table::Boundaries,
        Table::Neighborhoods,
        Table::Buildings,
        Table::HazardZones,
        Table::Parcels,
        Table::Stations,
        Table::HouseConnections,
        Table::Pipes,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Table::Boundaries => "boundaries",
            Table::Neighborhoods => "neighborhoods",
            Table::Buildings => "buildings",
            Table::HazardZones => "hazard_zones",
            Table::Parcels => "parcels",
            Table::Stations => "stations",
            Table::HouseConnections => "house_connections",
            Table::Pipes => "pipes",
        }
    }

    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Table::Stations | Table::HouseConnections => GeometryType::Point,
            Table::Pipes => GeometryType::LineString,
            _ => GeometryType::Polygon,
        }
    }

    /// Attribute columns, excluding the surrogate key and the geometry column.
    pub fn columns(&self) -> &'static [ColumnDef] {
        match self {
            Table::Boundaries => BOUNDARY_COLUMNS,
            Table::Neighborhoods => NEIGHBORHOOD_COLUMNS,
            Table::Buildings => BUILDING_COLUMNS,
            Table::HazardZones => HAZARD_ZONE_COLUMNS,
            Table::Parcels => PARCEL_COLUMNS,
            Table::Stations => STATION_COLUMNS,
            Table::HouseConnections => HOUSE_CONNECTION_COLUMNS,
            Table::Pipes => PIPE_COLUMNS,
        }
    }

    pub fn column(&self, name: &str) -> Option<&'static ColumnDef> {
        self.columns().iter().find(|c| c.name == name)
    }

    /// `CREATE TABLE IF NOT EXISTS` for this table with a geometry column in `srid`.
    pub fn create_statement(&self, srid: i32) -> String {
        let mut columns = vec!["id SERIAL PRIMARY KEY".to_string()];
        for c in self.columns() {
            let mut def = format!("{} {}", c.name, c.data_type.sql());
            if let Some(default) = c.default {
                def.push_str(" DEFAULT ");
                def.push_str(default);
            }
            columns.push(def);
        }
        columns.push(format!(
            "geom GEOMETRY({}, {})",
            self.geometry_type().postgis_name(),
            srid
        ));
        format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            self.name(),
            columns.join(", ")
        )
    }

    /// GiST index on the geometry column.
    pub fn index_statement(&self) -> String {
        format!(
            "CREATE INDEX IF NOT EXISTS idx_{0}_geom ON {0} USING GIST (geom)",
            self.name()
        )
    }

    /// Empties every table in one statement and restarts the `id` sequences.
    pub fn truncate_statement() -> String {
        let names = Table::ALL.iter().map(|table| table.name()).join(", ");
        format!("TRUNCATE {} RESTART IDENTITY", names)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
