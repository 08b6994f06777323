//! Procedural geometry and topology generators.

/// Pipe network chains with stable node naming.
pub mod network;
pub use network::{NetworkTopologyBuilder, NodeNamer, PipeEdge, PipeMaterial, SequentialNamer};

/// Jittered polygons and exact rectangles.
pub mod polygon;
pub use polygon::{JitterRange, PolygonSynthesizer};
