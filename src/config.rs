//! Immutable run configuration.
//!
//! Built once before a run and passed explicitly to every stage. Loadable
//! from JSON; any key left out keeps its default.

use crate::cluster::{ClusterAnalyzer, ScanStrategy};
use crate::culling::CullConfig;
use crate::error::Result;
use crate::pipeline::VisualizationMode;
use crate::reader::ReaderConfig;
use crate::records::PointSource;
use crate::trail::{GapPolicy, TrailBuilder};
use crate::{BoundingVolume, Rgba};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VisualizerConfig {
    /// Heatmap (gaze points, density colours) or path (positions, uniform colour).
    pub mode: VisualizationMode,

    /// Delimiter, decimal separator and column names of the session log.
    pub reader: ReaderConfig,

    // Culling
    pub cull_by_range: bool,
    pub cull_from: i64,
    pub cull_to: i64,
    pub cull_by_volume: bool,
    pub cull_volume: Option<BoundingVolume>,

    /// Neighbor radius in meters. Default: 0.05
    pub max_point_distance: f64,
    /// Neighbors required for a point to count as clustered. Values below 0
    /// behave like 0. Default: 5
    pub min_cluster_size: i64,
    pub scan_strategy: ScanStrategy,

    // Colouring
    /// Default: white
    pub color_low: Rgba,
    /// Default: red
    pub color_high: Rgba,
    /// Default: gray
    pub failed_color: Rgba,
    /// Uniform point colour in path mode. Default: white
    pub point_color: Rgba,
    /// Point diameter in meters. Default: 0.075
    pub point_size: f64,

    // Trail
    pub draw_trail: bool,
    pub close_trail_only: bool,
    /// Default: white
    pub trail_color: Rgba,
    /// Longest visible segment when `close_trail_only` is set. Default: 1.0
    pub max_segment_distance: f64,
    pub gap_policy: GapPolicy,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            mode: VisualizationMode::default(),
            reader: ReaderConfig::default(),
            cull_by_range: false,
            cull_from: 0,
            cull_to: 0,
            cull_by_volume: false,
            cull_volume: None,
            max_point_distance: 0.05,
            min_cluster_size: 5,
            scan_strategy: ScanStrategy::default(),
            color_low: Rgba::WHITE,
            color_high: Rgba::RED,
            failed_color: Rgba::GRAY,
            point_color: Rgba::WHITE,
            point_size: 0.075,
            draw_trail: false,
            close_trail_only: false,
            trail_color: Rgba::WHITE,
            max_segment_distance: 1.0,
            gap_policy: GapPolicy::default(),
        }
    }
}

impl VisualizerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The point field every stage of this run reads.
    pub fn point_source(&self) -> PointSource {
        self.mode.point_source()
    }

    pub fn cull_config(&self) -> CullConfig {
        CullConfig {
            by_range: self.cull_by_range,
            from: self.cull_from,
            to: self.cull_to,
            by_volume: self.cull_by_volume,
            volume: self.cull_volume,
        }
    }

    pub fn cluster_analyzer(&self) -> ClusterAnalyzer {
        let min_cluster_size = usize::try_from(self.min_cluster_size).unwrap_or(0);
        ClusterAnalyzer::new(self.max_point_distance, min_cluster_size)
            .with_colors(self.color_low, self.color_high, self.failed_color)
            .with_strategy(self.scan_strategy)
    }

    pub fn trail_builder(&self) -> TrailBuilder {
        TrailBuilder::new(self.close_trail_only, self.max_segment_distance)
            .with_gap_policy(self.gap_policy)
    }
}
