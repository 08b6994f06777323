use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use geo::{coord, Coord};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{GeoFixtureError, Result};
use crate::frame::CoordinateFrame;
use crate::geometry::Geometry;

/// Pipe materials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipeMaterial {
    Polyethylene,
    Pvc,
    CastIron,
    Steel,
}

impl PipeMaterial {
    pub const ALL: [PipeMaterial; 4] = [
        PipeMaterial::Polyethylene,
        PipeMaterial::Pvc,
        PipeMaterial::CastIron,
        PipeMaterial::Steel,
    ];

    /// Short code written to the `material` column.
    pub fn code(&self) -> &'static str {
        match self {
            PipeMaterial::Polyethylene => "PE",
            PipeMaterial::Pvc => "PVC",
            PipeMaterial::CastIron => "CI",
            PipeMaterial::Steel => "ST",
        }
    }
}

impl fmt::Display for PipeMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for PipeMaterial {
    type Err = GeoFixtureError;

    fn from_str(s: &str) -> Result<Self> {
        PipeMaterial::ALL
            .into_iter()
            .find(|m| m.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                GeoFixtureError::InvalidNetworkAttribute(format!("unknown pipe material '{}'", s))
            })
    }
}

/// Operational status of a pipe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipeStatus {
    #[default]
    Active,
    RenewalPlanned,
}

impl PipeStatus {
    pub fn code(&self) -> &'static str {
        match self {
            PipeStatus::Active => "active",
            PipeStatus::RenewalPlanned => "renewal_planned",
        }
    }
}

/// Allowed materials and nominal diameters. Edges outside the catalog are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkCatalog {
    pub materials: Vec<PipeMaterial>,
    pub diameters_mm: Vec<u32>,
}

impl Default for NetworkCatalog {
    fn default() -> Self {
        Self {
            materials: PipeMaterial::ALL.to_vec(),
            diameters_mm: vec![32, 100, 150, 200, 250, 300, 400],
        }
    }
}

impl NetworkCatalog {
    pub fn check(&self, material: PipeMaterial, diameter_mm: u32) -> Result<()> {
        if !self.materials.contains(&material) {
            return Err(GeoFixtureError::InvalidNetworkAttribute(format!(
                "material {} is not in the catalog",
                material
            )));
        }
        if !self.diameters_mm.contains(&diameter_mm) {
            return Err(GeoFixtureError::InvalidNetworkAttribute(format!(
                "diameter {} mm is not in the catalog {:?}",
                diameter_mm, self.diameters_mm
            )));
        }
        Ok(())
    }
}

/// Attributes shared by every pipe edge apart from its identity, topology and geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct PipeAttributes {
    pub material: PipeMaterial,
    pub diameter_mm: u32,
    pub laid_on: NaiveDate,
    pub note: String,
    pub status: PipeStatus,
}

impl PipeAttributes {
    pub fn new(material: PipeMaterial, diameter_mm: u32, laid_on: NaiveDate) -> Self {
        Self {
            material,
            diameter_mm,
            laid_on,
            note: String::new(),
            status: PipeStatus::default(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn with_status(mut self, status: PipeStatus) -> Self {
        self.status = status;
        self
    }
}

/// One pipe segment between two named nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct PipeEdge {
    pub id: String,
    pub from_node: String,
    pub to_node: String,
    pub attributes: PipeAttributes,
    pub geometry: Geometry,
}

/// Mints node and edge names for bulk chains.
pub trait NodeNamer {
    fn node_name(&self, index: u64) -> String;

    fn edge_id(&self, index: u64) -> String;
}

/// `K_0001`, `K_0002`, ... for nodes and `L_00001`, ... for edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequentialNamer {
    pub node_prefix: String,
    pub edge_prefix: String,
}

impl Default for SequentialNamer {
    fn default() -> Self {
        Self {
            node_prefix: "K".to_string(),
            edge_prefix: "L".to_string(),
        }
    }
}

impl NodeNamer for SequentialNamer {
    fn node_name(&self, index: u64) -> String {
        format!("{}_{:04}", self.node_prefix, index)
    }

    fn edge_id(&self, index: u64) -> String {
        format!("{}_{:05}", self.edge_prefix, index)
    }
}

/// Parameters for a randomized bulk chain.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkNetworkParams {
    /// Node the first segment starts from.
    pub root: String,
    /// Segment start points are drawn within this distance of the frame origin.
    pub spread: f64,
    pub min_length: f64,
    pub max_length: f64,
    pub materials: Vec<PipeMaterial>,
    pub diameters_mm: Vec<u32>,
    pub note: String,
    /// Lay dates fall between `reference_date - max_age_days` and `reference_date`.
    pub reference_date: NaiveDate,
    pub max_age_days: i64,
}

impl BulkNetworkParams {
    pub fn new(reference_date: NaiveDate) -> Self {
        Self {
            root: "HV_001".to_string(),
            spread: 2000.,
            min_length: 30.,
            max_length: 150.,
            materials: PipeMaterial::ALL.to_vec(),
            diameters_mm: vec![100, 150, 200, 250, 300],
            note: "network test".to_string(),
            reference_date,
            max_age_days: 25000,
        }
    }

    fn validate(&self, catalog: &NetworkCatalog) -> Result<()> {
        if self.materials.is_empty() || self.diameters_mm.is_empty() {
            return Err(GeoFixtureError::InvalidNetworkAttribute(
                "bulk network needs at least one material and one diameter".to_string(),
            ));
        }
        for material in &self.materials {
            for diameter in &self.diameters_mm {
                catalog.check(*material, *diameter)?;
            }
        }
        if !(self.min_length.is_finite() && self.max_length.is_finite())
            || self.min_length <= 0.
            || self.min_length > self.max_length
        {
            return Err(GeoFixtureError::InvalidGeometryConfig(format!(
                "segment length range must satisfy 0 < min <= max, got [{}, {}]",
                self.min_length, self.max_length
            )));
        }
        if self.max_age_days < 0 {
            return Err(GeoFixtureError::InvalidNetworkAttribute(format!(
                "max_age_days must not be negative, got {}",
                self.max_age_days
            )));
        }
        Ok(())
    }
}

/// Builds pipe edges with consistent node references.
///
/// Bulk chains mint fresh `to` nodes from a counter owned by this builder, so two chains built
/// by the same instance never share a minted node. Authored edges take their node names from
/// the caller verbatim; repeating a name is how a branch is expressed.
#[derive(Debug, Clone)]
pub struct NetworkTopologyBuilder<N: NodeNamer = SequentialNamer> {
    catalog: NetworkCatalog,
    namer: N,
    node_counter: u64,
    edge_counter: u64,
}

impl NetworkTopologyBuilder<SequentialNamer> {
    pub fn new(catalog: NetworkCatalog) -> Self {
        Self::with_namer(catalog, SequentialNamer::default())
    }
}

impl Default for NetworkTopologyBuilder<SequentialNamer> {
    fn default() -> Self {
        Self::new(NetworkCatalog::default())
    }
}

impl<N: NodeNamer> NetworkTopologyBuilder<N> {
    pub fn with_namer(catalog: NetworkCatalog, namer: N) -> Self {
        Self {
            catalog,
            namer,
            node_counter: 0,
            edge_counter: 0,
        }
    }

    pub fn catalog(&self) -> &NetworkCatalog {
        &self.catalog
    }

    fn mint_node(&mut self) -> String {
        self.node_counter += 1;
        self.namer.node_name(self.node_counter)
    }

    fn mint_edge_id(&mut self) -> String {
        self.edge_counter += 1;
        self.namer.edge_id(self.edge_counter)
    }

    /// A simple path of `count` randomly placed segments starting at `params.root`.
    ///
    /// Each segment's `from` node is the previous segment's `to` node. A `count` of zero
    /// returns no edges.
    pub fn bulk_chain<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        frame: &CoordinateFrame,
        params: &BulkNetworkParams,
        count: usize,
    ) -> Result<Vec<PipeEdge>> {
        if count == 0 {
            return Ok(vec![]);
        }
        params.validate(&self.catalog)?;

        let mut edges = Vec::with_capacity(count);
        let mut from_node = params.root.clone();
        for _ in 0..count {
            let start = frame.random_offset_within(rng, params.spread);
            let length = rng.gen_range(params.min_length..=params.max_length);
            let bearing = rng.gen_range(0.0..360.0);
            let end = segment_end(start, length, bearing);

            // validated non-empty above
            let material = *params
                .materials
                .choose(rng)
                .unwrap_or(&PipeMaterial::Polyethylene);
            let diameter_mm = *params.diameters_mm.choose(rng).unwrap_or(&100);
            let laid_on =
                params.reference_date - Duration::days(rng.gen_range(0..=params.max_age_days));

            let to_node = self.mint_node();
            let edge = PipeEdge {
                id: self.mint_edge_id(),
                from_node: std::mem::replace(&mut from_node, to_node.clone()),
                to_node,
                attributes: PipeAttributes::new(material, diameter_mm, laid_on)
                    .with_note(params.note.clone()),
                geometry: Geometry::line_string(vec![start, end])?,
            };
            edges.push(edge);
        }
        Ok(edges)
    }

    /// An edge whose id and node names are supplied by the caller.
    pub fn authored_edge(
        &self,
        id: impl Into<String>,
        from_node: impl Into<String>,
        to_node: impl Into<String>,
        path: Vec<Coord>,
        attributes: PipeAttributes,
    ) -> Result<PipeEdge> {
        let (id, from_node, to_node) = (id.into(), from_node.into(), to_node.into());
        if from_node.is_empty() || to_node.is_empty() {
            return Err(GeoFixtureError::InvalidNetworkAttribute(format!(
                "edge {} needs both node names",
                id
            )));
        }
        self.catalog
            .check(attributes.material, attributes.diameter_mm)?;
        Ok(PipeEdge {
            id,
            from_node,
            to_node,
            attributes,
            geometry: Geometry::line_string(path)?,
        })
    }
}

/// Endpoint of a segment of `length` leaving `start` at `bearing_deg` (counter-clockwise from
/// the x axis).
pub fn segment_end(start: Coord, length: f64, bearing_deg: f64) -> Coord {
    let theta = bearing_deg.to_radians();
    coord! {
        x: start.x + length * theta.cos(),
        y: start.y + length * theta.sin(),
    }
}

/// All nodes reachable from `root` following edges in either direction.
pub fn reachable_nodes(edges: &[PipeEdge], root: &str) -> HashSet<String> {
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in edges {
        adjacency
            .entry(edge.from_node.as_str())
            .or_default()
            .push(edge.to_node.as_str());
        adjacency
            .entry(edge.to_node.as_str())
            .or_default()
            .push(edge.from_node.as_str());
    }

    let mut seen = HashSet::from([root.to_string()]);
    let mut queue = VecDeque::from([root]);
    while let Some(node) = queue.pop_front() {
        for &next in adjacency.get(node).into_iter().flatten() {
            if seen.insert(next.to_string()) {
                queue.push_back(next);
            }
        }
    }
    seen
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::{reference_date, seeded_rng};
    use approx::assert_relative_eq;

    fn frame() -> CoordinateFrame {
        CoordinateFrame::new(2683000., 1248000., 3000.)
    }

    #[test]
    fn bulk_chain_is_simple_path() {
        let mut builder = NetworkTopologyBuilder::default();
        let params = BulkNetworkParams::new(reference_date());
        let edges = builder
            .bulk_chain(&mut seeded_rng(3), &frame(), &params, 80)
            .unwrap();
        assert_eq!(edges.len(), 80);
        assert_eq!(edges[0].from_node, "HV_001");

        let to_nodes: HashSet<_> = edges.iter().map(|e| e.to_node.clone()).collect();
        assert_eq!(to_nodes.len(), edges.len());
        for pair in edges.windows(2) {
            assert_eq!(pair[1].from_node, pair[0].to_node);
        }
        assert_eq!(reachable_nodes(&edges, "HV_001").len(), 81);
    }

    #[test]
    fn bulk_segments_respect_length_and_catalog() {
        let mut builder = NetworkTopologyBuilder::default();
        let params = BulkNetworkParams::new(reference_date());
        let edges = builder
            .bulk_chain(&mut seeded_rng(11), &frame(), &params, 50)
            .unwrap();
        for edge in &edges {
            let coords = edge.geometry.coords();
            let length = (coords[1].x - coords[0].x).hypot(coords[1].y - coords[0].y);
            assert!((30. - 1e-6..=150. + 1e-6).contains(&length));
            assert!(params.diameters_mm.contains(&edge.attributes.diameter_mm));
            assert!(edge.attributes.laid_on <= reference_date());
            assert_eq!(edge.attributes.status, PipeStatus::Active);
        }
    }

    #[test]
    fn zero_edges_is_noop() {
        let mut builder = NetworkTopologyBuilder::default();
        let params = BulkNetworkParams::new(reference_date());
        let edges = builder
            .bulk_chain(&mut seeded_rng(0), &frame(), &params, 0)
            .unwrap();
        assert!(edges.is_empty());
    }

    #[test]
    fn counter_is_per_builder() {
        let params = BulkNetworkParams::new(reference_date());
        let mut builder = NetworkTopologyBuilder::default();
        let first = builder
            .bulk_chain(&mut seeded_rng(1), &frame(), &params, 3)
            .unwrap();
        let second = builder
            .bulk_chain(&mut seeded_rng(1), &frame(), &params, 3)
            .unwrap();
        assert_eq!(first[2].to_node, "K_0003");
        assert_eq!(second[0].to_node, "K_0004");
        assert_eq!(second[0].from_node, "HV_001");

        let fresh = NetworkTopologyBuilder::default()
            .bulk_chain(&mut seeded_rng(1), &frame(), &params, 1)
            .unwrap();
        assert_eq!(fresh[0].to_node, "K_0001");
        assert_eq!(fresh[0].id, "L_00001");
    }

    #[test]
    fn custom_namer() {
        struct Prefixed;
        impl NodeNamer for Prefixed {
            fn node_name(&self, index: u64) -> String {
                format!("J{}", index)
            }
            fn edge_id(&self, index: u64) -> String {
                format!("E{}", index)
            }
        }
        let mut builder = NetworkTopologyBuilder::with_namer(NetworkCatalog::default(), Prefixed);
        let edges = builder
            .bulk_chain(
                &mut seeded_rng(2),
                &frame(),
                &BulkNetworkParams::new(reference_date()),
                2,
            )
            .unwrap();
        assert_eq!(edges[1].from_node, "J1");
        assert_eq!(edges[1].id, "E2");
    }

    #[test]
    fn invalid_attributes_are_rejected() {
        let builder = NetworkTopologyBuilder::default();
        let path = vec![coord! { x: 0., y: 0. }, coord! { x: 0., y: 10. }];
        let bad_diameter = PipeAttributes::new(PipeMaterial::Steel, 123, reference_date());
        assert!(matches!(
            builder.authored_edge("X", "A", "B", path.clone(), bad_diameter),
            Err(GeoFixtureError::InvalidNetworkAttribute(_))
        ));

        let limited = NetworkTopologyBuilder::new(NetworkCatalog {
            materials: vec![PipeMaterial::Polyethylene],
            diameters_mm: vec![100],
        });
        let steel = PipeAttributes::new(PipeMaterial::Steel, 100, reference_date());
        assert!(limited.authored_edge("X", "A", "B", path, steel).is_err());

        let mut params = BulkNetworkParams::new(reference_date());
        params.diameters_mm = vec![999];
        let mut builder = NetworkTopologyBuilder::default();
        assert!(matches!(
            builder.bulk_chain(&mut seeded_rng(0), &frame(), &params, 1),
            Err(GeoFixtureError::InvalidNetworkAttribute(_))
        ));

        assert!(matches!(
            "copper".parse::<PipeMaterial>(),
            Err(GeoFixtureError::InvalidNetworkAttribute(_))
        ));
        assert_eq!("pvc".parse::<PipeMaterial>().unwrap(), PipeMaterial::Pvc);
    }

    #[test]
    fn bearing_is_in_degrees() {
        let end = segment_end(coord! { x: 10., y: 10. }, 100., 90.);
        assert_relative_eq!(end.x, 10., epsilon = 1e-9);
        assert_relative_eq!(end.y, 110., epsilon = 1e-9);
    }

    #[test]
    fn authored_names_are_kept() {
        let builder = NetworkTopologyBuilder::default();
        let attrs = PipeAttributes::new(PipeMaterial::Polyethylene, 200, reference_date())
            .with_note("distribution");
        let edge = builder
            .authored_edge(
                "L_D1",
                "HUB",
                "D1",
                vec![coord! { x: 0., y: 0. }, coord! { x: 0., y: 300. }],
                attrs,
            )
            .unwrap();
        assert_eq!((edge.from_node.as_str(), edge.to_node.as_str()), ("HUB", "D1"));
        assert_eq!(edge.attributes.note, "distribution");
    }
}
