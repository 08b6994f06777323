//! Randomized bulk batches, one scenario per feature category.

use std::fmt;

use rand::Rng;
use tracing::debug;

use super::{Scenario, ScenarioComposer};
use crate::algorithm::network::BulkNetworkParams;
use crate::algorithm::{NetworkTopologyBuilder, PolygonSynthesizer};
use crate::error::Result;
use crate::feature::{
    Boundary, Building, BuildingUsage, HazardZone, HouseConnection, Neighborhood, Parcel, Severity,
    Station, Zoning,
};
use crate::frame::CoordinateFrame;
use crate::geometry::Geometry;

const PROGRESS_INTERVAL: usize = 50;

const BOUNDARY_NAME: &str = "Zurich";
const BOUNDARY_RADIUS: f64 = 5000.;
const BOUNDARY_VERTICES: usize = 12;

const NEIGHBORHOODS: [(&str, f64, f64); 5] = [
    ("Altstadt", 0., 0.),
    ("Industriequartier", 1000., 500.),
    ("Wollishofen", -1500., -1000.),
    ("Seefeld", 1500., 0.),
    ("Wipkingen", -500., 1500.),
];
const NEIGHBORHOOD_RADIUS: f64 = 800.;
const NEIGHBORHOOD_VERTICES: usize = 6;

const STREETS: [&str; 5] = [
    "Main Street",
    "Station Street",
    "Lake Street",
    "Hill Street",
    "Village Street",
];

/// Severity, return period and radius of the nested bulk hazard zones, innermost first.
const HAZARD_RINGS: [(Severity, i32, f64); 3] = [
    (Severity::High, 30, 300.),
    (Severity::Medium, 100, 500.),
    (Severity::Low, 300, 700.),
];
const HAZARD_CENTER: (f64, f64) = (0., -500.);

const OWNER_KINDS: [&str; 3] = ["AG", "GmbH", "Private"];

const STATIONS: [(&str, f64, f64); 5] = [
    ("Zurich HB", 0., 0.),
    ("Stadelhofen", 1200., 300.),
    ("Enge", -800., -600.),
    ("Oerlikon", -400., 2000.),
    ("Altstetten", -2500., 500.),
];

/// The bulk feature categories, in the order a run persists them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BulkBatch {
    Boundary,
    Neighborhoods,
    Buildings,
    HazardZones,
    Parcels,
    Stations,
    HouseConnections,
    PipeNetwork,
}

impl BulkBatch {
    pub const ALL: [BulkBatch; 8] = [
        BulkBatch::Boundary,
        BulkBatch::Neighborhoods,
        BulkBatch::Buildings,
        BulkBatch::HazardZones,
        BulkBatch::Parcels,
        BulkBatch::Stations,
        BulkBatch::HouseConnections,
        BulkBatch::PipeNetwork,
    ];

    /// Scenario name of the batch.
    pub fn name(&self) -> &'static str {
        match self {
            BulkBatch::Boundary => "bulk boundary",
            BulkBatch::Neighborhoods => "bulk neighborhoods",
            BulkBatch::Buildings => "bulk buildings",
            BulkBatch::HazardZones => "bulk hazard zones",
            BulkBatch::Parcels => "bulk parcels",
            BulkBatch::Stations => "bulk stations",
            BulkBatch::HouseConnections => "bulk house connections",
            BulkBatch::PipeNetwork => "bulk pipe network",
        }
    }
}

impl fmt::Display for BulkBatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn pick<T: Copy, R: Rng + ?Sized>(rng: &mut R, items: &[T]) -> T {
    items[rng.gen_range(0..items.len())]
}

fn log_progress(batch: BulkBatch, done: usize, total: usize) {
    if done % PROGRESS_INTERVAL == 0 || done == total {
        debug!(batch = batch.name(), done, total, "generating");
    }
}

impl<R: Rng> ScenarioComposer<R> {
    /// Generate one bulk batch. Randomized features are placed in the bulk frame.
    pub fn bulk(&mut self, batch: BulkBatch) -> Result<Scenario> {
        let frame = self.config.bulk_frame();
        let mut scenario = Scenario::new(batch.name());
        match batch {
            BulkBatch::Boundary => scenario.push(self.boundary(&frame)?),
            BulkBatch::Neighborhoods => scenario.extend(self.neighborhoods(&frame)?),
            BulkBatch::Buildings => scenario.extend(self.buildings(&frame)?),
            BulkBatch::HazardZones => scenario.extend(self.hazard_zones(&frame)?),
            BulkBatch::Parcels => scenario.extend(self.parcels(&frame)?),
            BulkBatch::Stations => scenario.extend(stations(&frame)),
            BulkBatch::HouseConnections => scenario.extend(self.house_connections(&frame)),
            BulkBatch::PipeNetwork => {
                let params = BulkNetworkParams::new(self.reference_date);
                let mut network = NetworkTopologyBuilder::default();
                scenario.extend(network.bulk_chain(
                    &mut self.rng,
                    &frame,
                    &params,
                    self.config.counts.pipe_segments,
                )?);
            }
        }
        debug!(batch = batch.name(), features = scenario.len(), "batch generated");
        Ok(scenario)
    }

    fn boundary(&mut self, frame: &CoordinateFrame) -> Result<Boundary> {
        Ok(Boundary {
            name: BOUNDARY_NAME.to_string(),
            outline: self.synthesizer.irregular(
                &mut self.rng,
                frame.origin(),
                BOUNDARY_RADIUS,
                BOUNDARY_VERTICES,
            )?,
        })
    }

    fn neighborhoods(&mut self, frame: &CoordinateFrame) -> Result<Vec<Neighborhood>> {
        NEIGHBORHOODS
            .iter()
            .map(|&(name, dx, dy)| {
                Ok(Neighborhood {
                    name: name.to_string(),
                    area_ha: self.rng.gen_range(50..=200) as f64,
                    outline: self.synthesizer.irregular(
                        &mut self.rng,
                        frame.offset(dx, dy),
                        NEIGHBORHOOD_RADIUS,
                        NEIGHBORHOOD_VERTICES,
                    )?,
                })
            })
            .collect()
    }

    fn buildings(&mut self, frame: &CoordinateFrame) -> Result<Vec<Building>> {
        let total = self.config.counts.buildings;
        let mut buildings = Vec::with_capacity(total);
        for i in 0..total {
            let center = frame.random_offset(&mut self.rng);
            let radius = self.rng.gen_range(10.0..=30.0);
            buildings.push(Building {
                address: format!(
                    "{} {}",
                    pick(&mut self.rng, &STREETS),
                    self.rng.gen_range(1..=200)
                ),
                usage: pick(&mut self.rng, &BuildingUsage::ALL),
                construction_year: self.rng.gen_range(1850..=2024),
                floors: self.rng.gen_range(1..=8),
                floor_area_m2: self.rng.gen_range(200..=5000) as f64,
                vacancy_rate: self.rng.gen_range(0.0..=0.15),
                footprint: self.synthesizer.irregular(&mut self.rng, center, radius, 4)?,
            });
            log_progress(BulkBatch::Buildings, i + 1, total);
        }
        Ok(buildings)
    }

    fn hazard_zones(&mut self, frame: &CoordinateFrame) -> Result<Vec<HazardZone>> {
        let center = frame.offset(HAZARD_CENTER.0, HAZARD_CENTER.1);
        HAZARD_RINGS
            .iter()
            .map(|&(severity, return_period_years, radius)| {
                Ok(HazardZone {
                    severity,
                    return_period_years,
                    outline: self.synthesizer.irregular(
                        &mut self.rng,
                        center,
                        radius,
                        PolygonSynthesizer::DEFAULT_VERTICES,
                    )?,
                })
            })
            .collect()
    }

    fn parcels(&mut self, frame: &CoordinateFrame) -> Result<Vec<Parcel>> {
        let total = self.config.counts.parcels;
        let mut parcels = Vec::with_capacity(total);
        for i in 0..total {
            let center = frame.random_offset(&mut self.rng);
            let radius = self.rng.gen_range(20.0..=50.0);
            parcels.push(Parcel {
                parcel_number: format!("P-{:04}", i + 1),
                owner: format!("Owner {} {}", pick(&mut self.rng, &OWNER_KINDS), i + 1),
                area_m2: self.rng.gen_range(400..=3000) as f64,
                zoning: pick(&mut self.rng, &Zoning::ALL),
                outline: self.synthesizer.irregular(&mut self.rng, center, radius, 6)?,
            });
            log_progress(BulkBatch::Parcels, i + 1, total);
        }
        Ok(parcels)
    }

    fn house_connections(&mut self, frame: &CoordinateFrame) -> Vec<HouseConnection> {
        let total = self.config.counts.house_connections;
        (0..total)
            .map(|i| {
                let location = Geometry::point(frame.random_offset(&mut self.rng));
                log_progress(BulkBatch::HouseConnections, i + 1, total);
                HouseConnection {
                    address: format!("Sample Street {}", i + 1),
                    occupants: self.rng.gen_range(1..=6),
                    location,
                }
            })
            .collect()
    }
}

fn stations(frame: &CoordinateFrame) -> Vec<Station> {
    STATIONS
        .iter()
        .map(|&(name, dx, dy)| Station {
            name: name.to_string(),
            location: Geometry::point(frame.offset(dx, dy)),
        })
        .collect()
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use super::*;
    use crate::feature::SpatialFeature;
    use crate::schema::Table;
    use crate::test::{seeded_rng, small_config};

    fn composer() -> ScenarioComposer<rand::rngs::StdRng> {
        ScenarioComposer::new(small_config(), seeded_rng(3)).unwrap()
    }

    #[test]
    fn batch_counts_follow_config() {
        let mut composer = composer();
        let counts = composer.config().counts;
        let expect = [
            (BulkBatch::Boundary, Table::Boundaries, 1),
            (BulkBatch::Neighborhoods, Table::Neighborhoods, NEIGHBORHOODS.len()),
            (BulkBatch::Buildings, Table::Buildings, counts.buildings),
            (BulkBatch::HazardZones, Table::HazardZones, HAZARD_RINGS.len()),
            (BulkBatch::Parcels, Table::Parcels, counts.parcels),
            (BulkBatch::Stations, Table::Stations, STATIONS.len()),
            (
                BulkBatch::HouseConnections,
                Table::HouseConnections,
                counts.house_connections,
            ),
            (BulkBatch::PipeNetwork, Table::Pipes, counts.pipe_segments),
        ];
        for (batch, table, n) in expect {
            let scenario = composer.bulk(batch).unwrap();
            assert_eq!(scenario.name(), batch.name());
            assert_eq!(scenario.features_in(table).count(), n, "{batch}");
            assert_eq!(scenario.len(), n, "{batch}");
            for feature in scenario.features() {
                feature.validate().unwrap();
            }
        }
    }

    #[test]
    fn randomized_features_stay_in_frame() {
        let mut composer = composer();
        let frame = composer.config().bulk_frame();
        for batch in [BulkBatch::Buildings, BulkBatch::HouseConnections] {
            for feature in composer.bulk(batch).unwrap().features() {
                // footprints are centered inside; allow for their radius
                let rect = feature.geometry().bounding_rect().unwrap();
                let center = rect.center();
                assert!(
                    (center.x - frame.origin().x).hypot(center.y - frame.origin().y)
                        <= frame.spread() + 30. * 1.2,
                    "{batch} feature at {center:?}"
                );
            }
        }
    }

    #[test]
    fn buildings_have_plausible_attributes() {
        let mut composer = composer();
        for feature in composer.bulk(BulkBatch::Buildings).unwrap().features() {
            let year = feature.attribute("construction_year").unwrap().as_i64().unwrap();
            assert!((1850..=2024).contains(&year));
            let floors = feature.attribute("floor_count").unwrap().as_i64().unwrap();
            assert!((1..=8).contains(&floors));
            let vacancy = feature.attribute("vacancy_rate").unwrap().as_f64().unwrap();
            assert!((0.0..=0.15).contains(&vacancy));
            assert_eq!(feature.geometry().coords().len(), 5);
        }
    }

    #[test]
    fn parcel_numbers_are_unique_and_padded() {
        let mut composer = composer();
        let scenario = composer.bulk(BulkBatch::Parcels).unwrap();
        let numbers: HashSet<_> = scenario
            .features()
            .iter()
            .map(|f| f.attribute("parcel_number").unwrap().to_string())
            .collect();
        assert_eq!(numbers.len(), scenario.len());
        assert!(numbers.contains("P-0001"));
    }

    #[test]
    fn pipe_network_is_one_path_from_root() {
        let mut composer = composer();
        let scenario = composer.bulk(BulkBatch::PipeNetwork).unwrap();
        let node = |f: &SpatialFeature, column: &str| f.attribute(column).unwrap().to_string();
        let features = scenario.features();
        assert_eq!(node(&features[0], "from_node"), "HV_001");
        for pair in features.windows(2) {
            assert_eq!(node(&pair[0], "to_node"), node(&pair[1], "from_node"));
        }
        let minted: HashSet<_> = features.iter().map(|f| node(f, "to_node")).collect();
        assert_eq!(minted.len(), features.len());
    }

    #[test]
    fn hazard_zones_share_a_center() {
        let mut composer = composer();
        let scenario = composer.bulk(BulkBatch::HazardZones).unwrap();
        let severities: Vec<_> = scenario
            .features()
            .iter()
            .map(|f| f.attribute("severity").unwrap().to_string())
            .collect();
        assert_eq!(severities, ["high", "medium", "low"]);
        for zone in scenario.features() {
            assert_eq!(
                zone.geometry().coords().len(),
                PolygonSynthesizer::DEFAULT_VERTICES + 1
            );
        }
    }
}
