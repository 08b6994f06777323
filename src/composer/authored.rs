//! Hand-authored scenarios with known spatial relationships.
//!
//! Every scene is deterministic: coordinates are fixed offsets from the scenario frame origin,
//! so tests can assert containment, distance and connectivity outcomes exactly.

use std::fmt;

use chrono::NaiveDate;
use geo::coord;

use super::Scenario;
use crate::algorithm::network::{PipeAttributes, PipeMaterial, PipeStatus};
use crate::algorithm::{NetworkTopologyBuilder, PipeEdge, PolygonSynthesizer};
use crate::error::{GeoFixtureError, Result};
use crate::feature::{
    Building, BuildingUsage, HazardZone, HouseConnection, Neighborhood, Parcel, Severity, Station,
    Zoning,
};
use crate::frame::CoordinateFrame;
use crate::geometry::Geometry;

/// The five authored scenes, in the order a run persists them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthoredScenario {
    ResidentialStreet,
    FloodHazard,
    TransitDevelopment,
    UtilityNetwork,
    NeighborhoodBuildout,
}

impl AuthoredScenario {
    pub const ALL: [AuthoredScenario; 5] = [
        AuthoredScenario::ResidentialStreet,
        AuthoredScenario::FloodHazard,
        AuthoredScenario::TransitDevelopment,
        AuthoredScenario::UtilityNetwork,
        AuthoredScenario::NeighborhoodBuildout,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AuthoredScenario::ResidentialStreet => "residential street",
            AuthoredScenario::FloodHazard => "flood hazard",
            AuthoredScenario::TransitDevelopment => "transit development",
            AuthoredScenario::UtilityNetwork => "utility network",
            AuthoredScenario::NeighborhoodBuildout => "neighborhood buildout",
        }
    }
}

impl fmt::Display for AuthoredScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        GeoFixtureError::General(format!("invalid date {}-{}-{}", year, month, day))
    })
}

const STREET_NAME: &str = "Mill Lane";
const HOUSE_SPACING: f64 = 40.;
const HOUSE_WIDTH: f64 = 10.;
const HOUSE_DEPTH: f64 = 15.;
/// The trunk runs this far south of the house row.
const TRUNK_SETBACK: f64 = 5.;
/// Connection points sit this far south of the house row.
const CONNECTION_SETBACK: f64 = 3.;

/// A row of houses along one street, each tied to a shared trunk main by its own service line.
///
/// `services[i]` starts on the trunk and ends exactly at `connections[i]`, which serves
/// `buildings[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidentialStreet {
    pub buildings: Vec<Building>,
    pub connections: Vec<HouseConnection>,
    pub trunk: PipeEdge,
    pub services: Vec<PipeEdge>,
}

impl ResidentialStreet {
    pub fn build(
        frame: &CoordinateFrame,
        network: &NetworkTopologyBuilder,
        houses: usize,
    ) -> Result<Self> {
        if houses == 0 {
            return Err(GeoFixtureError::InvalidGeometryConfig(
                "a residential street needs at least one house".to_string(),
            ));
        }
        let origin = frame.origin();
        let trunk_y = origin.y - TRUNK_SETBACK;

        let mut buildings = Vec::with_capacity(houses);
        let mut connections = Vec::with_capacity(houses);
        let mut services = Vec::with_capacity(houses);
        for i in 0..houses {
            let x = origin.x + HOUSE_SPACING * i as f64;
            let address = format!("{} {}", STREET_NAME, 2 * (i + 1));
            let tap = coord! { x: x + HOUSE_WIDTH / 2., y: trunk_y };
            let connection = coord! { x: tap.x, y: origin.y - CONNECTION_SETBACK };

            buildings.push(Building {
                address: address.clone(),
                usage: BuildingUsage::Residential,
                construction_year: 1970 + 5 * i as i32,
                floors: 2,
                floor_area_m2: 2. * HOUSE_WIDTH * HOUSE_DEPTH,
                vacancy_rate: 0.,
                footprint: PolygonSynthesizer::rectangle(
                    coord! { x: x, y: origin.y },
                    HOUSE_WIDTH,
                    HOUSE_DEPTH,
                )?,
            });
            connections.push(HouseConnection {
                address,
                occupants: 2 + (i % 4) as i32,
                location: Geometry::point(connection),
            });
            services.push(network.authored_edge(
                format!("MILL_S{:02}", i + 1),
                format!("MILL_TAP_{:02}", i + 1),
                format!("MILL_HOUSE_{:02}", i + 1),
                vec![tap, connection],
                PipeAttributes::new(PipeMaterial::Polyethylene, 32, date(1986, 4, 1)?)
                    .with_note("house service"),
            )?);
        }

        let trunk = network.authored_edge(
            "MILL_T01",
            "MILL_HV",
            "MILL_END",
            vec![
                coord! { x: origin.x - 20., y: trunk_y },
                coord! { x: origin.x + HOUSE_SPACING * houses as f64 + 20., y: trunk_y },
            ],
            PipeAttributes::new(PipeMaterial::Pvc, 150, date(1985, 6, 15)?)
                .with_note("street trunk main"),
        )?;

        Ok(Self {
            buildings,
            connections,
            trunk,
            services,
        })
    }

    pub fn into_scenario(self) -> Scenario {
        let mut scenario = Scenario::new(AuthoredScenario::ResidentialStreet.name());
        scenario.extend(self.buildings);
        scenario.extend(self.connections);
        scenario.push(self.trunk);
        scenario.extend(self.services);
        scenario
    }
}

const RIVER_OFFSET: (f64, f64) = (500., 200.);
const RIVER_HALF_LENGTH: f64 = 200.;
/// Severity, return period and half-width of each band around the river axis.
const FLOOD_BANDS: [(Severity, i32, f64); 2] =
    [(Severity::High, 30, 15.), (Severity::Medium, 100, 50.)];

/// Nested flood bands along a north-south river with one building in each containment class.
#[derive(Debug, Clone, PartialEq)]
pub struct FloodHazard {
    /// Highest severity first; each zone lies inside the next.
    pub zones: Vec<HazardZone>,
    pub inside_high: Building,
    pub inside_lower: Building,
    pub outside: Building,
}

impl FloodHazard {
    pub fn build(frame: &CoordinateFrame) -> Result<Self> {
        let river = frame.offset(RIVER_OFFSET.0, RIVER_OFFSET.1);
        let zones = FLOOD_BANDS
            .iter()
            .map(|&(severity, return_period_years, half_width)| {
                Ok(HazardZone {
                    severity,
                    return_period_years,
                    outline: PolygonSynthesizer::rectangle(
                        coord! { x: river.x - half_width, y: river.y - RIVER_HALF_LENGTH },
                        2. * half_width,
                        2. * RIVER_HALF_LENGTH,
                    )?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let building = |address: &str,
                        usage: BuildingUsage,
                        (dx, dy): (f64, f64),
                        (w, h): (f64, f64),
                        year: i32|
         -> Result<Building> {
            Ok(Building {
                address: address.to_string(),
                usage,
                construction_year: year,
                floors: 2,
                floor_area_m2: w * h * 2.,
                vacancy_rate: 0.,
                footprint: PolygonSynthesizer::rectangle(
                    coord! { x: river.x + dx, y: river.y + dy },
                    w,
                    h,
                )?,
            })
        };

        Ok(Self {
            zones,
            inside_high: building(
                "River Road 1",
                BuildingUsage::School,
                (-10., -20.),
                (20., 40.),
                1962,
            )?,
            inside_lower: building(
                "Bank Path 23",
                BuildingUsage::Residential,
                (-40., 50.),
                (10., 15.),
                1988,
            )?,
            outside: building(
                "Hospital Street 1",
                BuildingUsage::Hospital,
                (-120., 0.),
                (40., 40.),
                1975,
            )?,
        })
    }

    pub fn zone(&self, severity: Severity) -> Option<&HazardZone> {
        self.zones.iter().find(|z| z.severity == severity)
    }

    pub fn into_scenario(self) -> Scenario {
        let mut scenario = Scenario::new(AuthoredScenario::FloodHazard.name());
        scenario.extend(self.zones);
        scenario.extend([self.inside_high, self.inside_lower, self.outside]);
        scenario
    }
}

const STATION_OFFSET: (f64, f64) = (1000., 500.);
const STATION_NAME: &str = "Hardbruecke";

/// Parcel number, owner, zoning, lower-left corner and size relative to the station.
const TRANSIT_PARCELS: [(&str, &str, Zoning, (f64, f64), (f64, f64)); 4] = [
    ("TOD-01", "City of Zurich", Zoning::Industrial, (50., -25.), (50., 50.)),
    ("TOD-02", "Housing Cooperative", Zoning::Residential, (-130., -20.), (40., 40.)),
    ("TOD-03", "Private AG", Zoning::Commercial, (-30., -190.), (60., 60.)),
    ("TOD-04", "Rail Estates AG", Zoning::Mixed, (150., 150.), (50., 50.)),
];

/// A station surrounded by parcels in increasing distance bands, each with its own zoning.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitDevelopment {
    pub station: Station,
    /// Nearest first.
    pub parcels: Vec<Parcel>,
}

impl TransitDevelopment {
    pub fn build(frame: &CoordinateFrame) -> Result<Self> {
        let local = frame.shifted(STATION_OFFSET.0, STATION_OFFSET.1);
        let parcels = TRANSIT_PARCELS
            .iter()
            .map(|&(number, owner, zoning, (dx, dy), (w, h))| {
                Ok(Parcel {
                    parcel_number: number.to_string(),
                    owner: owner.to_string(),
                    area_m2: w * h,
                    zoning,
                    outline: PolygonSynthesizer::rectangle(local.offset(dx, dy), w, h)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            station: Station {
                name: STATION_NAME.to_string(),
                location: Geometry::point(local.origin()),
            },
            parcels,
        })
    }

    pub fn into_scenario(self) -> Scenario {
        let mut scenario = Scenario::new(AuthoredScenario::TransitDevelopment.name());
        scenario.push(self.station);
        scenario.extend(self.parcels);
        scenario
    }
}

const NETWORK_OFFSET: (f64, f64) = (1500., 0.);
pub const RESERVOIR_NODE: &str = "RESERVOIR_HILL";
pub const HUB_NODE: &str = "HUB_CENTRAL";
/// Line name, end node offset from the hub, lay date, and service end offsets from that node.
const DISTRIBUTION_LINES: [(&str, (f64, f64), (i32, u32, u32), &[(f64, f64)]); 2] = [
    (
        "NORTH",
        (0., 300.),
        (1995, 3, 20),
        &[(-150., 0.), (-100., 100.), (0., 150.)],
    ),
    ("EAST", (400., 0.), (1995, 3, 25), &[(0., 120.), (150., 0.)]),
];

/// A small supply tree: a transport main from a reservoir to a hub, two distribution mains
/// leaving the hub, several service lines fanning out from the end of each distribution main,
/// and one old cast-iron main that is not connected to the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct UtilityNetwork {
    pub transport: PipeEdge,
    pub distribution: Vec<PipeEdge>,
    pub services: Vec<PipeEdge>,
    pub degraded: PipeEdge,
}

impl UtilityNetwork {
    pub fn build(frame: &CoordinateFrame, network: &NetworkTopologyBuilder) -> Result<Self> {
        let hub = frame.shifted(NETWORK_OFFSET.0, NETWORK_OFFSET.1);
        let at = |dx: f64, dy: f64| hub.offset(dx, dy);

        let transport = network.authored_edge(
            "UN_T01",
            RESERVOIR_NODE,
            HUB_NODE,
            vec![at(-500., 1000.), at(0., 0.)],
            PipeAttributes::new(PipeMaterial::Steel, 400, date(1978, 5, 10)?)
                .with_note("transport main"),
        )?;

        let mut distribution = vec![];
        let mut services = vec![];
        for (line, (dx, dy), (year, month, day), taps) in DISTRIBUTION_LINES {
            let node = format!("DIST_{}", line);
            let node_at = at(dx, dy);
            distribution.push(network.authored_edge(
                format!("UN_D_{}", line),
                HUB_NODE,
                node.clone(),
                vec![at(0., 0.), node_at],
                PipeAttributes::new(PipeMaterial::Polyethylene, 200, date(year, month, day)?)
                    .with_note(format!("distribution {}", line.to_lowercase())),
            )?);
            for (i, &(tx, ty)) in taps.iter().enumerate() {
                services.push(network.authored_edge(
                    format!("UN_S_{}{:02}", line, i + 1),
                    node.clone(),
                    format!("SVC_{}{:02}", line, i + 1),
                    vec![node_at, coord! { x: node_at.x + tx, y: node_at.y + ty }],
                    PipeAttributes::new(PipeMaterial::Polyethylene, 100, date(2008, 6, 15)?)
                        .with_note("service"),
                )?);
            }
        }

        let degraded = network.authored_edge(
            "UN_X01",
            "OLD_CI_START",
            "OLD_CI_END",
            vec![at(200., -50.), at(200., -200.)],
            PipeAttributes::new(PipeMaterial::CastIron, 150, date(1925, 8, 10)?)
                .with_note("cast iron main, renewal planned")
                .with_status(PipeStatus::RenewalPlanned),
        )?;

        Ok(Self {
            transport,
            distribution,
            services,
            degraded,
        })
    }

    /// Edges reachable from the reservoir.
    pub fn supply_tree(&self) -> Vec<PipeEdge> {
        std::iter::once(&self.transport)
            .chain(&self.distribution)
            .chain(&self.services)
            .cloned()
            .collect()
    }

    pub fn into_scenario(self) -> Scenario {
        let mut scenario = Scenario::new(AuthoredScenario::UtilityNetwork.name());
        scenario.push(self.transport);
        scenario.extend(self.distribution);
        scenario.extend(self.services);
        scenario.push(self.degraded);
        scenario
    }
}

const BUILDOUT_OFFSET: (f64, f64) = (2000., 1000.);
const BUILDOUT_EXTENT: (f64, f64) = (400., 300.);

/// A rectangular neighborhood holding a row of historic buildings and a few recent ones.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborhoodBuildout {
    pub neighborhood: Neighborhood,
    pub historic: Vec<Building>,
    pub modern: Vec<Building>,
}

impl NeighborhoodBuildout {
    pub fn build(frame: &CoordinateFrame) -> Result<Self> {
        let local = frame.shifted(BUILDOUT_OFFSET.0, BUILDOUT_OFFSET.1);
        let corner = local.origin();
        let (width, height) = BUILDOUT_EXTENT;
        let at = |dx: f64, dy: f64| local.offset(dx, dy);

        let neighborhood = Neighborhood {
            name: "Sunnyside".to_string(),
            area_ha: width * height / 10_000.,
            outline: PolygonSynthesizer::rectangle(corner, width, height)?,
        };

        let historic = (0..4)
            .map(|i| {
                Ok(Building {
                    address: format!("Meadow Road {}", 2 * i + 1),
                    usage: BuildingUsage::Residential,
                    construction_year: 1920 + 5 * i,
                    floors: 3,
                    floor_area_m2: 400.,
                    vacancy_rate: 0.05 + 0.01 * i as f64,
                    footprint: PolygonSynthesizer::rectangle(at(50. + 80. * i as f64, 50.), 12., 20.)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let modern = [BuildingUsage::Residential, BuildingUsage::Commercial]
            .into_iter()
            .enumerate()
            .map(|(i, usage)| {
                Ok(Building {
                    address: format!("Meadow Park {}", i + 1),
                    usage,
                    construction_year: 2015 + 3 * i as i32,
                    floors: 5,
                    floor_area_m2: 1200.,
                    vacancy_rate: 0.,
                    footprint: PolygonSynthesizer::rectangle(
                        at(100. + 150. * i as f64, 200.),
                        25.,
                        30.,
                    )?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            neighborhood,
            historic,
            modern,
        })
    }

    pub fn into_scenario(self) -> Scenario {
        let mut scenario = Scenario::new(AuthoredScenario::NeighborhoodBuildout.name());
        scenario.push(self.neighborhood);
        scenario.extend(self.historic);
        scenario.extend(self.modern);
        scenario
    }
}

#[cfg(test)]
mod test {
    use std::collections::{HashMap, HashSet};

    use approx::assert_relative_eq;
    use geo::{Coord, EuclideanDistance, Rect};

    use super::*;
    use crate::algorithm::network::reachable_nodes;
    use crate::schema::Table;
    use crate::test::scenario_frame;

    fn rect(geometry: &Geometry) -> Rect {
        geometry.bounding_rect().unwrap()
    }

    fn within(inner: Rect, outer: Rect) -> bool {
        inner.min().x >= outer.min().x
            && inner.min().y >= outer.min().y
            && inner.max().x <= outer.max().x
            && inner.max().y <= outer.max().y
    }

    fn overlaps(a: Rect, b: Rect) -> bool {
        a.min().x < b.max().x && b.min().x < a.max().x && a.min().y < b.max().y && b.min().y < a.max().y
    }

    #[test]
    fn street_services_end_at_connections() {
        let frame = scenario_frame();
        let street = ResidentialStreet::build(&frame, &NetworkTopologyBuilder::default(), 8).unwrap();
        assert_eq!(street.buildings.len(), 8);
        assert_eq!(street.connections.len(), 8);
        assert_eq!(street.services.len(), 8);

        let trunk = street.trunk.geometry.coords();
        for (service, connection) in street.services.iter().zip(&street.connections) {
            let end = service.geometry.last_coord().unwrap();
            assert_eq!(Some(end), connection.location.first_coord());
            // service starts on the trunk line
            let start = service.geometry.first_coord().unwrap();
            assert_relative_eq!(start.y, trunk[0].y);
            assert!(start.x > trunk[0].x && start.x < trunk[1].x);
        }
        assert_eq!(street.buildings[0].address, street.connections[0].address);
        assert_eq!(street.buildings[7].construction_year, 2005);

        let scenario = street.into_scenario();
        assert_eq!(scenario.features_in(Table::Pipes).count(), 9);
        assert_eq!(scenario.len(), 8 * 3 + 1);
    }

    #[test]
    fn street_scales_with_house_count() {
        let frame = scenario_frame();
        let network = NetworkTopologyBuilder::default();
        let street = ResidentialStreet::build(&frame, &network, 1).unwrap();
        assert_eq!(street.into_scenario().len(), 4);
        assert!(ResidentialStreet::build(&frame, &network, 0).is_err());

        let long = ResidentialStreet::build(&frame, &network, 20).unwrap();
        let trunk_end = long.trunk.geometry.last_coord().unwrap();
        let last_tap = long.services[19].geometry.first_coord().unwrap();
        assert!(last_tap.x < trunk_end.x);
    }

    #[test]
    fn flood_buildings_fall_in_expected_bands() {
        let flood = FloodHazard::build(&scenario_frame()).unwrap();
        let high = rect(&flood.zone(Severity::High).unwrap().outline);
        let medium = rect(&flood.zone(Severity::Medium).unwrap().outline);
        assert!(within(high, medium));

        assert!(within(rect(&flood.inside_high.footprint), high));

        let lower = rect(&flood.inside_lower.footprint);
        assert!(within(lower, medium));
        assert!(!overlaps(lower, high));

        let outside = rect(&flood.outside.footprint);
        assert!(!overlaps(outside, medium));
    }

    #[test]
    fn transit_parcels_move_outward() {
        let transit = TransitDevelopment::build(&scenario_frame()).unwrap();
        let station = *transit.station.location.as_point().unwrap();
        let distances: Vec<f64> = transit
            .parcels
            .iter()
            .map(|p| station.euclidean_distance(p.outline.as_polygon().unwrap()))
            .collect();
        assert_relative_eq!(distances[0], 50.);
        assert!(distances.windows(2).all(|w| w[0] < w[1]), "{distances:?}");

        let zonings: HashSet<_> = transit.parcels.iter().map(|p| p.zoning).collect();
        assert_eq!(zonings.len(), transit.parcels.len());
        for parcel in &transit.parcels {
            let area = geo::Area::unsigned_area(parcel.outline.as_polygon().unwrap());
            assert_relative_eq!(area, parcel.area_m2);
        }
    }

    #[test]
    fn utility_tree_is_connected_except_old_main() {
        let network = UtilityNetwork::build(&scenario_frame(), &NetworkTopologyBuilder::default())
            .unwrap();
        let tree = network.supply_tree();
        let reached = reachable_nodes(&tree, RESERVOIR_NODE);
        for edge in &tree {
            assert!(reached.contains(&edge.from_node), "{}", edge.id);
            assert!(reached.contains(&edge.to_node), "{}", edge.id);
        }
        assert!(!reached.contains(&network.degraded.from_node));
        assert_eq!(network.degraded.attributes.status, PipeStatus::RenewalPlanned);
        assert_eq!(network.degraded.attributes.material, PipeMaterial::CastIron);
        assert!(network.degraded.attributes.laid_on < network.transport.attributes.laid_on);

        assert_eq!(network.distribution.len(), 2);
        for edge in &network.distribution {
            assert_eq!(edge.from_node, HUB_NODE);
            let fan_out = network
                .services
                .iter()
                .filter(|s| s.from_node == edge.to_node)
                .count();
            assert!(fan_out >= 2, "{} feeds {} services", edge.to_node, fan_out);
        }
    }

    #[test]
    fn utility_nodes_have_one_position() {
        let network = UtilityNetwork::build(&scenario_frame(), &NetworkTopologyBuilder::default())
            .unwrap();
        let mut positions: HashMap<String, Coord> = HashMap::new();
        for edge in network.supply_tree() {
            let ends = [
                (&edge.from_node, edge.geometry.first_coord().unwrap()),
                (&edge.to_node, edge.geometry.last_coord().unwrap()),
            ];
            for (node, at) in ends {
                let known = *positions.entry(node.clone()).or_insert(at);
                assert_eq!(known, at, "node {node}");
            }
        }
    }

    #[test]
    fn buildout_stays_inside_neighborhood() {
        let buildout = NeighborhoodBuildout::build(&scenario_frame()).unwrap();
        let outline = rect(&buildout.neighborhood.outline);
        assert_relative_eq!(buildout.neighborhood.area_ha, 12.);
        assert_eq!(buildout.historic.len(), 4);
        assert_eq!(buildout.modern.len(), 2);
        for building in buildout.historic.iter().chain(&buildout.modern) {
            assert!(within(rect(&building.footprint), outline), "{}", building.address);
        }
        assert!(buildout.historic.iter().all(|b| b.construction_year < 1950));
        assert!(buildout.modern.iter().all(|b| b.construction_year >= 2015));
    }

    #[test]
    fn scenes_are_anchored_at_their_offsets() {
        let frame = scenario_frame();
        let transit = TransitDevelopment::build(&frame).unwrap();
        assert_eq!(
            transit.station.location.first_coord(),
            Some(frame.offset(STATION_OFFSET.0, STATION_OFFSET.1))
        );

        let network = UtilityNetwork::build(&frame, &NetworkTopologyBuilder::default()).unwrap();
        assert_eq!(
            network.transport.geometry.last_coord(),
            Some(frame.offset(NETWORK_OFFSET.0, NETWORK_OFFSET.1))
        );

        let buildout = NeighborhoodBuildout::build(&frame).unwrap();
        assert_eq!(
            rect(&buildout.neighborhood.outline).min(),
            frame.offset(BUILDOUT_OFFSET.0, BUILDOUT_OFFSET.1)
        );
    }

    #[test]
    fn authored_scenes_do_not_overlap() {
        let frame = scenario_frame();
        let network = NetworkTopologyBuilder::default();
        let street = ResidentialStreet::build(&frame, &network, 8).unwrap().into_scenario();
        let flood = FloodHazard::build(&frame).unwrap().into_scenario();
        let buildout = NeighborhoodBuildout::build(&frame).unwrap().into_scenario();
        let extent = |s: &Scenario| {
            s.features()
                .iter()
                .filter_map(|f| f.geometry().bounding_rect())
                .reduce(|a, b| {
                    Rect::new(
                        coord! { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
                        coord! { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
                    )
                })
                .unwrap()
        };
        assert!(!overlaps(extent(&street), extent(&flood)));
        assert!(!overlaps(extent(&flood), extent(&buildout)));
    }
}
