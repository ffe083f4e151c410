//! Neighbor-density clustering.
//!
//! Every point is compared against every other point to find its nearest
//! neighbor distance and the number of neighbors closer than
//! `max_point_distance`. Once all points are scanned, counts are normalized
//! by the global maximum and each point is classified as clustered (coloured
//! on a low/high gradient by density) or isolated (failed colour).
//!
//! Normalization is global, so classification only starts after the whole
//! neighbor scan has finished.

use crate::error::FieldError;
use crate::geometry::euclidean_distance;
use crate::records::{PointSource, RecordSet};
use crate::{Point3, Rgba};
use log::debug;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use rstar::{AABB, PointDistance, RTree, RTreeObject};
use serde::{Deserialize, Serialize};

/// Outcome of density classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Classification {
    Clustered,
    Isolated,
}

/// How neighbor statistics are computed. Both strategies give identical results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScanStrategy {
    /// Full O(n^2) scan over all pairs.
    #[default]
    Pairwise,
    /// R-tree radius and nearest-neighbor queries.
    RTree,
}

/// Per-point result, in input order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterResult {
    /// Other points strictly closer than `max_point_distance`
    pub neighbor_count: usize,
    /// Distance to the nearest other point (infinite when there is none)
    pub nearest_distance: f64,
    /// `neighbor_count / global max` for clustered points, 0 for isolated ones
    pub density: f64,
    pub classification: Classification,
    pub color: Rgba,
}

/// Aggregate figures for one analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterStats {
    pub point_count: usize,
    pub global_max_neighbor_count: usize,
    pub clustered: usize,
    pub isolated: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClusterAnalysis {
    pub results: Vec<ClusterResult>,
    pub stats: ClusterStats,
}

/// Density classifier parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterAnalyzer {
    /// Neighbor radius in meters. Default: 0.05
    pub max_point_distance: f64,
    /// Minimum neighbor count for a point to be clustered. Default: 5
    pub min_cluster_size: usize,
    pub color_low: Rgba,
    pub color_high: Rgba,
    pub failed_color: Rgba,
    pub strategy: ScanStrategy,
}

impl Default for ClusterAnalyzer {
    fn default() -> Self {
        Self::new(0.05, 5)
    }
}

/// Neighbor statistics for one point, from the scan phase.
#[derive(Debug, Clone, Copy)]
struct NeighborStats {
    neighbor_count: usize,
    nearest_distance: f64,
}

impl ClusterAnalyzer {
    pub fn new(max_point_distance: f64, min_cluster_size: usize) -> Self {
        Self {
            max_point_distance,
            min_cluster_size,
            color_low: Rgba::WHITE,
            color_high: Rgba::RED,
            failed_color: Rgba::GRAY,
            strategy: ScanStrategy::default(),
        }
    }

    pub fn with_colors(mut self, low: Rgba, high: Rgba, failed: Rgba) -> Self {
        self.color_low = low;
        self.color_high = high;
        self.failed_color = failed;
        self
    }

    pub fn with_strategy(mut self, strategy: ScanStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Classify every record of a set by the density around its chosen point.
    pub fn analyze(
        &self,
        set: &RecordSet,
        source: PointSource,
    ) -> Result<ClusterAnalysis, FieldError> {
        let points = set.points(source)?;
        Ok(self.analyze_points(&points))
    }

    /// Classify a point cloud. One result per point, same order.
    pub fn analyze_points(&self, points: &[Point3]) -> ClusterAnalysis {
        let neighbors = match self.strategy {
            ScanStrategy::Pairwise => scan_pairwise(points, self.max_point_distance),
            ScanStrategy::RTree => scan_rtree(points, self.max_point_distance),
        };

        // Barrier: the global maximum must be known before any point is coloured
        let global_max = neighbors
            .iter()
            .map(|n| n.neighbor_count)
            .max()
            .unwrap_or(0);

        let results: Vec<ClusterResult> = neighbors
            .iter()
            .map(|n| self.classify(n, global_max))
            .collect();

        let clustered = results
            .iter()
            .filter(|r| r.classification == Classification::Clustered)
            .count();
        let stats = ClusterStats {
            point_count: points.len(),
            global_max_neighbor_count: global_max,
            clustered,
            isolated: points.len() - clustered,
        };

        debug!(
            "Cluster analysis: {} points, max {} neighbors, {} clustered, {} isolated",
            stats.point_count, stats.global_max_neighbor_count, stats.clustered, stats.isolated
        );

        ClusterAnalysis { results, stats }
    }

    fn classify(&self, n: &NeighborStats, global_max: usize) -> ClusterResult {
        let isolated = !n.nearest_distance.is_finite()
            || n.nearest_distance > self.max_point_distance
            || n.neighbor_count < self.min_cluster_size;

        if isolated {
            return ClusterResult {
                neighbor_count: n.neighbor_count,
                nearest_distance: n.nearest_distance,
                density: 0.0,
                classification: Classification::Isolated,
                color: self.failed_color,
            };
        }

        let density = if global_max == 0 {
            0.0
        } else {
            (n.neighbor_count as f64 / global_max as f64).min(1.0)
        };

        ClusterResult {
            neighbor_count: n.neighbor_count,
            nearest_distance: n.nearest_distance,
            density,
            classification: Classification::Clustered,
            color: self.color_low.lerp(&self.color_high, density),
        }
    }
}

// ============================================================================
// Pairwise scan
// ============================================================================

fn pairwise_stats(points: &[Point3], i: usize, max_distance: f64) -> NeighborStats {
    let p = &points[i];
    let mut nearest_distance = f64::INFINITY;
    let mut neighbor_count = 0;

    for (j, q) in points.iter().enumerate() {
        if i == j {
            continue;
        }
        let d = euclidean_distance(p, q);
        if d < nearest_distance {
            nearest_distance = d;
        }
        if d < max_distance {
            neighbor_count += 1;
        }
    }

    NeighborStats {
        neighbor_count,
        nearest_distance,
    }
}

fn scan_pairwise(points: &[Point3], max_distance: f64) -> Vec<NeighborStats> {
    #[cfg(feature = "parallel")]
    let stats: Vec<NeighborStats> = (0..points.len())
        .into_par_iter()
        .map(|i| pairwise_stats(points, i, max_distance))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let stats: Vec<NeighborStats> = (0..points.len())
        .map(|i| pairwise_stats(points, i, max_distance))
        .collect();

    stats
}

// ============================================================================
// R-tree scan
// ============================================================================

/// A 3D point with its input index for R-tree queries
#[derive(Debug, Clone, Copy)]
struct IndexedPoint3 {
    idx: usize,
    pos: [f64; 3],
}

impl RTreeObject for IndexedPoint3 {
    type Envelope = AABB<[f64; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.pos)
    }
}

impl PointDistance for IndexedPoint3 {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.pos[0] - point[0];
        let dy = self.pos[1] - point[1];
        let dz = self.pos[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

fn build_rtree(points: &[Point3]) -> RTree<IndexedPoint3> {
    let indexed: Vec<IndexedPoint3> = points
        .iter()
        .enumerate()
        .map(|(idx, p)| IndexedPoint3 {
            idx,
            pos: p.to_array(),
        })
        .collect();
    RTree::bulk_load(indexed)
}

fn rtree_stats(
    tree: &RTree<IndexedPoint3>,
    points: &[Point3],
    i: usize,
    max_distance: f64,
) -> NeighborStats {
    let p = &points[i];
    let query = p.to_array();

    let nearest_distance = tree
        .nearest_neighbor_iter(&query)
        .find(|q| q.idx != i)
        .map_or(f64::INFINITY, |q| euclidean_distance(p, &points[q.idx]));

    // The index only narrows candidates; the strict test uses the same
    // distance as the pairwise scan.
    let neighbor_count = if max_distance.is_nan() || max_distance <= 0.0 {
        0
    } else if max_distance.is_infinite() {
        points.len() - 1
    } else {
        let radius = max_distance * (1.0 + 1e-9);
        tree.locate_within_distance(query, radius * radius)
            .filter(|q| q.idx != i && euclidean_distance(p, &points[q.idx]) < max_distance)
            .count()
    };

    NeighborStats {
        neighbor_count,
        nearest_distance,
    }
}

fn scan_rtree(points: &[Point3], max_distance: f64) -> Vec<NeighborStats> {
    let tree = build_rtree(points);

    #[cfg(feature = "parallel")]
    let stats: Vec<NeighborStats> = (0..points.len())
        .into_par_iter()
        .map(|i| rtree_stats(&tree, points, i, max_distance))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let stats: Vec<NeighborStats> = (0..points.len())
        .map(|i| rtree_stats(&tree, points, i, max_distance))
        .collect();

    stats
}
