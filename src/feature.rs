//! Feature records handed to a persistence sink.
//!
//! Each typed record (buildings, parcels, ...) converts into a [`SpatialFeature`]: a table, an
//! ordered attribute map matching that table's columns, and a geometry.

use std::fmt;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::algorithm::network::PipeEdge;
use crate::error::{GeoFixtureError, Result};
use crate::geometry::Geometry;
use crate::schema::{ColumnType, Table};

/// A scalar attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Date(NaiveDate),
}

impl AttributeValue {
    fn fits(&self, column_type: ColumnType) -> bool {
        matches!(
            (self, column_type),
            (AttributeValue::Text(_), ColumnType::Text(_))
                | (AttributeValue::Integer(_), ColumnType::Integer)
                | (AttributeValue::Integer(_), ColumnType::Numeric)
                | (AttributeValue::Float(_), ColumnType::Numeric)
                | (AttributeValue::Date(_), ColumnType::Date)
        )
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttributeValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Integer(v) => Some(*v as f64),
            AttributeValue::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Text(v) => write!(f, "{}", v),
            AttributeValue::Integer(v) => write!(f, "{}", v),
            AttributeValue::Float(v) => write!(f, "{}", v),
            AttributeValue::Date(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Integer(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Integer(value.into())
    }
}

impl From<u32> for AttributeValue {
    fn from(value: u32) -> Self {
        AttributeValue::Integer(value.into())
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

impl From<NaiveDate> for AttributeValue {
    fn from(value: NaiveDate) -> Self {
        AttributeValue::Date(value)
    }
}

pub type Attributes = IndexMap<String, AttributeValue>;

/// One row destined for a fixture table.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialFeature {
    table: Table,
    attributes: Attributes,
    geometry: Geometry,
}

impl SpatialFeature {
    /// Build a feature, checking the geometry kind and every attribute against the table.
    pub fn try_new(table: Table, attributes: Attributes, geometry: Geometry) -> Result<Self> {
        let feature = Self {
            table,
            attributes,
            geometry,
        };
        feature.validate()?;
        Ok(feature)
    }

    fn from_parts<const N: usize>(
        table: Table,
        attributes: [(&'static str, AttributeValue); N],
        geometry: Geometry,
    ) -> Self {
        Self {
            table,
            attributes: attributes
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            geometry,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.geometry.geometry_type() != self.table.geometry_type() {
            return Err(GeoFixtureError::General(format!(
                "table {} stores {:?} geometries, got {:?}",
                self.table,
                self.table.geometry_type(),
                self.geometry.geometry_type()
            )));
        }
        for (name, value) in &self.attributes {
            let column = self.table.column(name).ok_or_else(|| {
                GeoFixtureError::General(format!("table {} has no column '{}'", self.table, name))
            })?;
            if !value.fits(column.data_type) {
                return Err(GeoFixtureError::General(format!(
                    "value {:?} does not fit column {}.{}",
                    value, self.table, name
                )));
            }
        }
        Ok(())
    }

    pub fn table(&self) -> Table {
        self.table
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }
}

/// Building usage categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingUsage {
    Residential,
    Commercial,
    School,
    Hospital,
    Office,
    Industrial,
}

impl BuildingUsage {
    pub const ALL: [BuildingUsage; 6] = [
        BuildingUsage::Residential,
        BuildingUsage::Commercial,
        BuildingUsage::School,
        BuildingUsage::Hospital,
        BuildingUsage::Office,
        BuildingUsage::Industrial,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            BuildingUsage::Residential => "residential",
            BuildingUsage::Commercial => "commercial",
            BuildingUsage::School => "school",
            BuildingUsage::Hospital => "hospital",
            BuildingUsage::Office => "office",
            BuildingUsage::Industrial => "industrial",
        }
    }
}

/// Hazard severity levels, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn code(&self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

/// Zoning categories for parcels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zoning {
    Residential,
    Commercial,
    Industrial,
    Mixed,
    Agricultural,
}

impl Zoning {
    pub const ALL: [Zoning; 5] = [
        Zoning::Residential,
        Zoning::Commercial,
        Zoning::Industrial,
        Zoning::Mixed,
        Zoning::Agricultural,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Zoning::Residential => "residential",
            Zoning::Commercial => "commercial",
            Zoning::Industrial => "industrial",
            Zoning::Mixed => "mixed",
            Zoning::Agricultural => "agricultural",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    pub name: String,
    pub outline: Geometry,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Neighborhood {
    pub name: String,
    pub area_ha: f64,
    pub outline: Geometry,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Building {
    pub address: String,
    pub usage: BuildingUsage,
    pub construction_year: i32,
    pub floors: i32,
    pub floor_area_m2: f64,
    /// Fraction of floor area that is vacant, in `[0, 1]`.
    pub vacancy_rate: f64,
    pub footprint: Geometry,
}

/// A hazard zone polygon.
///
/// Zones sharing a center are conventionally nested with larger outlines carrying lower
/// severity. Nothing here enforces that nesting.
#[derive(Debug, Clone, PartialEq)]
pub struct HazardZone {
    pub severity: Severity,
    pub return_period_years: i32,
    pub outline: Geometry,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parcel {
    pub parcel_number: String,
    pub owner: String,
    pub area_m2: f64,
    pub zoning: Zoning,
    pub outline: Geometry,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub name: String,
    pub location: Geometry,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HouseConnection {
    pub address: String,
    pub occupants: i32,
    pub location: Geometry,
}

impl From<Boundary> for SpatialFeature {
    fn from(value: Boundary) -> Self {
        SpatialFeature::from_parts(
            Table::Boundaries,
            [("name", value.name.into())],
            value.outline,
        )
    }
}

impl From<Neighborhood> for SpatialFeature {
    fn from(value: Neighborhood) -> Self {
        SpatialFeature::from_parts(
            Table::Neighborhoods,
            [("name", value.name.into()), ("area_ha", value.area_ha.into())],
            value.outline,
        )
    }
}

impl From<Building> for SpatialFeature {
    fn from(value: Building) -> Self {
        SpatialFeature::from_parts(
            Table::Buildings,
            [
                ("address", value.address.into()),
                ("usage", value.usage.code().into()),
                ("construction_year", value.construction_year.into()),
                ("floor_count", value.floors.into()),
                ("floor_area_m2", value.floor_area_m2.into()),
                ("vacancy_rate", value.vacancy_rate.into()),
            ],
            value.footprint,
        )
    }
}

impl From<HazardZone> for SpatialFeature {
    fn from(value: HazardZone) -> Self {
        SpatialFeature::from_parts(
            Table::HazardZones,
            [
                ("severity", value.severity.code().into()),
                ("return_period_years", value.return_period_years.into()),
            ],
            value.outline,
        )
    }
}

impl From<Parcel> for SpatialFeature {
    fn from(value: Parcel) -> Self {
        SpatialFeature::from_parts(
            Table::Parcels,
            [
                ("parcel_number", value.parcel_number.into()),
                ("owner", value.owner.into()),
                ("area_m2", value.area_m2.into()),
                ("zoning", value.zoning.code().into()),
            ],
            value.outline,
        )
    }
}

impl From<Station> for SpatialFeature {
    fn from(value: Station) -> Self {
        SpatialFeature::from_parts(Table::Stations, [("name", value.name.into())], value.location)
    }
}

impl From<HouseConnection> for SpatialFeature {
    fn from(value: HouseConnection) -> Self {
        SpatialFeature::from_parts(
            Table::HouseConnections,
            [
                ("address", value.address.into()),
                ("occupants", value.occupants.into()),
            ],
            value.location,
        )
    }
}

impl From<PipeEdge> for SpatialFeature {
    fn from(value: PipeEdge) -> Self {
        let attrs = value.attributes;
        SpatialFeature::from_parts(
            Table::Pipes,
            [
                ("pipe_id", value.id.into()),
                ("material", attrs.material.code().into()),
                ("diameter_mm", attrs.diameter_mm.into()),
                ("laid_on", attrs.laid_on.into()),
                ("note", attrs.note.into()),
                ("from_node", value.from_node.into()),
                ("to_node", value.to_node.into()),
                ("status", attrs.status.code().into()),
            ],
            value.geometry,
        )
    }
}
