//! Trail polylines over samples in temporal order.
//!
//! With `close_only` set, a sample further than `max_segment_distance` from
//! the sample before it breaks the trail. Distance is always measured to the
//! true previous sample, not the last one kept.

use crate::Point3;
use crate::error::FieldError;
use crate::geometry::polyline_length;
use crate::records::{PointSource, RecordSet};
use serde::{Deserialize, Serialize};

/// What to emit for a sample that breaks the trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GapPolicy {
    /// Drop the vertex.
    #[default]
    Compact,
    /// Legacy mode: keep one vertex per sample and put broken samples at the
    /// origin. Renderers that ignore `segment_visible` will draw spurious
    /// lines to the origin.
    ZeroFill,
}

/// An ordered polyline with one visibility flag per adjacent vertex pair.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trail {
    pub vertices: Vec<Point3>,
    /// `segment_visible[k]` covers `vertices[k]` to `vertices[k + 1]`
    pub segment_visible: Vec<bool>,
    /// Input index each vertex was taken from
    pub source_indices: Vec<usize>,
    pub policy: GapPolicy,
}

impl Trail {
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn visible_segment_count(&self) -> usize {
        self.segment_visible.iter().filter(|v| **v).count()
    }

    /// Total length of the visible segments.
    pub fn visible_length(&self) -> f64 {
        self.runs().iter().map(|run| polyline_length(run)).sum()
    }

    /// Split the trail into maximal polylines of consecutive visible segments.
    ///
    /// Every run has at least two vertices, so each can be drawn as its own
    /// line without bridging a suppressed jump.
    pub fn runs(&self) -> Vec<Vec<Point3>> {
        let mut runs = Vec::new();
        let Some(first) = self.vertices.first() else {
            return runs;
        };

        let mut current = vec![*first];
        for (k, visible) in self.segment_visible.iter().enumerate() {
            let next = self.vertices[k + 1];
            if *visible {
                current.push(next);
            } else {
                if current.len() >= 2 {
                    runs.push(std::mem::take(&mut current));
                }
                current = vec![next];
            }
        }
        if current.len() >= 2 {
            runs.push(current);
        }
        runs
    }
}

/// Trail gating parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailBuilder {
    /// Suppress segments longer than `max_segment_distance`.
    pub close_only: bool,
    /// Maximum segment length in meters when `close_only` is set. Default: 1.0
    pub max_segment_distance: f64,
    pub gap_policy: GapPolicy,
}

impl Default for TrailBuilder {
    fn default() -> Self {
        Self::new(false, 1.0)
    }
}

impl TrailBuilder {
    pub fn new(close_only: bool, max_segment_distance: f64) -> Self {
        Self {
            close_only,
            max_segment_distance,
            gap_policy: GapPolicy::default(),
        }
    }

    pub fn with_gap_policy(mut self, policy: GapPolicy) -> Self {
        self.gap_policy = policy;
        self
    }

    /// Build the trail over one point field of a record set.
    pub fn build(&self, set: &RecordSet, source: PointSource) -> Result<Trail, FieldError> {
        let points = set.points(source)?;
        Ok(self.build_points(&points))
    }

    /// Build the trail over points in temporal order.
    pub fn build_points(&self, points: &[Point3]) -> Trail {
        let connected: Vec<bool> = (0..points.len())
            .map(|i| i == 0 || self.is_connected(&points[i - 1], &points[i]))
            .collect();

        match self.gap_policy {
            GapPolicy::Compact => compact_trail(points, &connected),
            GapPolicy::ZeroFill => zero_fill_trail(points, &connected),
        }
    }

    fn is_connected(&self, prev: &Point3, cur: &Point3) -> bool {
        !self.close_only || cur.distance(prev) <= self.max_segment_distance
    }
}

fn compact_trail(points: &[Point3], connected: &[bool]) -> Trail {
    let source_indices: Vec<usize> = (0..points.len()).filter(|&i| connected[i]).collect();
    let vertices = source_indices.iter().map(|&i| points[i]).collect();
    let segment_visible = source_indices
        .windows(2)
        .map(|w| w[1] == w[0] + 1)
        .collect();

    Trail {
        vertices,
        segment_visible,
        source_indices,
        policy: GapPolicy::Compact,
    }
}

fn zero_fill_trail(points: &[Point3], connected: &[bool]) -> Trail {
    let vertices = points
        .iter()
        .zip(connected)
        .map(|(p, &ok)| if ok { *p } else { Point3::ORIGIN })
        .collect();
    let segment_visible = connected.windows(2).map(|w| w[0] && w[1]).collect();

    Trail {
        vertices,
        segment_visible,
        source_indices: (0..points.len()).collect(),
        policy: GapPolicy::ZeroFill,
    }
}
