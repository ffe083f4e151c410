//! # Dwellmap
//!
//! Density clustering and trail construction for tracked session recordings.
//!
//! A session is a batch of timestamped samples, each carrying a 3D position
//! and a 3D gaze point. This library provides:
//! - Loading of delimited session logs into a schema-checked [`RecordSet`]
//! - Culling by index range and by axis-aligned bounding volume
//! - Neighbor-density clustering of points into clustered/isolated, with a
//!   heat-style colour gradient
//! - Ordered trail polylines with optional suppression of large jumps
//! - A pipeline producing render-ready points and trails
//!
//! ## Features
//!
//! - **`parallel`** - Parallel neighbor scans with rayon (default)
//! - **`synthetic`** - Seeded synthetic gaze sessions for benchmarks
//!
//! ## Quick Start
//!
//! ```rust
//! use dwellmap::{ReaderConfig, VisualizerConfig, read_records, run_pipeline};
//!
//! let csv = "xpos,ypos,zpos,EtPositionX,EtPositionY,EtPositionZ\n\
//!            0,0,0,0,0,0\n\
//!            0,0,0,0.01,0,0\n\
//!            0,0,0,10,10,10\n";
//!
//! let records = read_records(csv.as_bytes(), &ReaderConfig::default()).unwrap();
//!
//! let config = VisualizerConfig {
//!     min_cluster_size: 1,
//!     ..VisualizerConfig::default()
//! };
//! let output = run_pipeline(&records, &config).unwrap();
//! assert_eq!(output.points.len(), 3);
//! ```

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{DwellMapError, FieldError, OptionExt, ParseError, Result};

// Geometry helpers (distance, bounds, colour interpolation)
pub mod geometry;

// Schema-checked record storage
pub mod records;
pub use records::{FieldMap, FieldValue, PointSource, Record, RecordSet, Schema};

// Delimited text record source
pub mod reader;
pub use reader::{ReaderConfig, read_records, read_records_from_path};

// Range and volume culling
pub mod culling;
pub use culling::{CullConfig, cull, range_cull, volume_cull};

// Neighbor-density clustering
pub mod cluster;
pub use cluster::{
    Classification, ClusterAnalysis, ClusterAnalyzer, ClusterResult, ClusterStats, ScanStrategy,
};

// Trail polylines
pub mod trail;
pub use trail::{GapPolicy, Trail, TrailBuilder};

// Immutable run configuration
pub mod config;
pub use config::VisualizerConfig;

// End-to-end pipeline
pub mod pipeline;
pub use pipeline::{PipelineOutput, RenderPoint, TrailOutput, VisualizationMode, run_pipeline};

// Synthetic session generator for benchmarks and stress tests
#[cfg(feature = "synthetic")]
pub mod synthetic;

// ============================================================================
// Core Types
// ============================================================================

/// A point in 3D scene space (1 unit = 1 meter).
///
/// # Example
/// ```
/// use dwellmap::Point3;
/// let a = Point3::new(0.0, 0.0, 0.0);
/// let b = Point3::new(3.0, 4.0, 0.0);
/// assert_eq!(a.distance(&b), 5.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    /// The scene origin.
    pub const ORIGIN: Point3 = Point3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point3) -> f64 {
        geometry::euclidean_distance(self, other)
    }

    /// Check that all coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

/// An RGBA colour with components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    pub const RED: Rgba = Rgba::new(1.0, 0.0, 0.0, 1.0);
    pub const GRAY: Rgba = Rgba::new(0.5, 0.5, 0.5, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Linear interpolation towards `other`. `t` is clamped to [0, 1].
    pub fn lerp(&self, other: &Rgba, t: f64) -> Rgba {
        geometry::lerp_color(self, other, t)
    }
}

/// Axis-aligned box used as a containment predicate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingVolume {
    pub min: Point3,
    pub max: Point3,
}

impl BoundingVolume {
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Create the smallest volume containing all points.
    pub fn from_points(points: &[Point3]) -> Option<Self> {
        geometry::compute_bounds(points)
    }

    /// Inclusive containment test, each axis against its own bounds.
    pub fn contains(&self, p: &Point3) -> bool {
        (self.min.x <= p.x && p.x <= self.max.x)
            && (self.min.y <= p.y && p.y <= self.max.y)
            && (self.min.z <= p.z && p.z <= self.max.z)
    }

    /// A volume is degenerate when a corner is non-finite or `min > max` on any axis.
    pub fn is_degenerate(&self) -> bool {
        !self.min.is_finite()
            || !self.max.is_finite()
            || self.min.x > self.max.x
            || self.min.y > self.max.y
            || self.min.z > self.max.z
    }

    /// Get the center point of the volume.
    pub fn center(&self) -> Point3 {
        Point3::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
            (self.min.z + self.max.z) / 2.0,
        )
    }
}
