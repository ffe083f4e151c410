//! End-to-end pipeline: cull, then cluster and trail the culled set.
//!
//! The output is render-ready: one `(position, colour, size)` per surviving
//! point and an optional trail with its colour and width. Creating and
//! placing renderable objects is left to the consumer.

use crate::cluster::ClusterStats;
use crate::config::VisualizerConfig;
use crate::culling::cull;
use crate::error::Result;
use crate::records::{PointSource, RecordSet};
use crate::trail::Trail;
use crate::{Point3, Rgba};
use log::info;
use serde::{Deserialize, Serialize};

/// Line width of the dwell trail in heatmap mode, in meters.
pub const HEATMAP_TRAIL_WIDTH: f64 = 0.02;

/// What a run visualizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VisualizationMode {
    /// Gaze points coloured by neighbor density, with an optional dwell trail.
    #[default]
    Heatmap,
    /// Tracked positions in a uniform colour, with an optional path trail.
    Path,
}

impl VisualizationMode {
    pub fn point_source(&self) -> PointSource {
        match self {
            VisualizationMode::Heatmap => PointSource::Gaze,
            VisualizationMode::Path => PointSource::Position,
        }
    }
}

/// One point for point-cloud rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RenderPoint {
    pub position: Point3,
    pub color: Rgba,
    pub size: f64,
}

/// A trail plus its line style.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrailOutput {
    pub trail: Trail,
    pub color: Rgba,
    pub width: f64,
}

/// Everything one run produces.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineOutput {
    pub mode: VisualizationMode,
    /// Records in the input set
    pub input_count: usize,
    /// Records left after culling
    pub culled_count: usize,
    pub points: Vec<RenderPoint>,
    /// Present only when the trail is enabled
    pub trail: Option<TrailOutput>,
    /// Present only in heatmap mode
    pub cluster_stats: Option<ClusterStats>,
}

/// Run the configured pipeline over a record set.
///
/// Field errors abort the run; no partial output is returned.
pub fn run_pipeline(set: &RecordSet, config: &VisualizerConfig) -> Result<PipelineOutput> {
    let source = config.point_source();
    let culled = cull(set, &config.cull_config(), source)?;
    let positions = culled.points(source)?;

    let (points, cluster_stats) = match config.mode {
        VisualizationMode::Heatmap => {
            let analysis = config.cluster_analyzer().analyze_points(&positions);
            let points = positions
                .iter()
                .zip(&analysis.results)
                .map(|(p, r)| RenderPoint {
                    position: *p,
                    color: r.color,
                    size: config.point_size,
                })
                .collect();
            (points, Some(analysis.stats))
        }
        VisualizationMode::Path => {
            let points = positions
                .iter()
                .map(|p| RenderPoint {
                    position: *p,
                    color: config.point_color,
                    size: config.point_size,
                })
                .collect();
            (points, None)
        }
    };

    let trail = config.draw_trail.then(|| {
        let width = match config.mode {
            VisualizationMode::Heatmap => HEATMAP_TRAIL_WIDTH,
            VisualizationMode::Path => config.point_size / 2.0,
        };
        TrailOutput {
            trail: config.trail_builder().build_points(&positions),
            color: config.trail_color,
            width,
        }
    });

    info!(
        "Pipeline ({:?}): {} records, {} after culling, trail: {}",
        config.mode,
        set.len(),
        culled.len(),
        trail
            .as_ref()
            .map_or("off".to_string(), |t| format!("{} vertices", t.trail.len()))
    );

    Ok(PipelineOutput {
        mode: config.mode,
        input_count: set.len(),
        culled_count: culled.len(),
        points,
        trail,
        cluster_stats,
    })
}
