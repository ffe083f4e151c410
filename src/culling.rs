//! Culling: reduce a record set by index range and/or bounding volume.
//!
//! Culling never mutates its input and never fails on configuration.
//! An invalid range or a degenerate volume skips that reduction and
//! returns the input unchanged.

use crate::BoundingVolume;
use crate::error::{FieldError, Result};
use crate::records::{PointSource, RecordSet};
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Which reductions to apply, and their parameters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CullConfig {
    /// Keep only records with index in `[from, to]`.
    pub by_range: bool,
    pub from: i64,
    pub to: i64,
    /// Keep only records whose point lies inside `volume`.
    pub by_volume: bool,
    pub volume: Option<BoundingVolume>,
}

impl CullConfig {
    pub fn is_enabled(&self) -> bool {
        self.by_range || self.by_volume
    }
}

/// Resolve a cull range against a set length.
///
/// The range is accepted only if `from < to`, `len > from` and `len >= to`.
/// `to == len` is tolerated and clamps to the last record.
fn resolve_range(len: usize, from: i64, to: i64) -> Option<(usize, usize)> {
    let from = usize::try_from(from).ok()?;
    let to = usize::try_from(to).ok()?;
    if len > from && len >= to && from < to {
        Some((from, to.min(len - 1)))
    } else {
        None
    }
}

/// Keep the contiguous records with indices in `[from, to]`, inclusive.
///
/// An invalid range returns the input unchanged.
pub fn range_cull(set: &RecordSet, from: i64, to: i64) -> RecordSet {
    let Some((start, end)) = resolve_range(set.len(), from, to) else {
        warn!(
            "Ignoring cull range [{}, {}] for {} records",
            from,
            to,
            set.len()
        );
        return set.clone();
    };

    let culled = set.with_records(set.shared_records()[start..=end].to_vec());
    info!(
        "Culled by range from {} to {} records",
        set.len(),
        culled.len()
    );
    culled
}

/// Keep the records whose point lies inside `volume` on all three axes, bounds inclusive.
///
/// A degenerate volume returns the input unchanged.
pub fn volume_cull(
    set: &RecordSet,
    volume: &BoundingVolume,
    source: PointSource,
) -> std::result::Result<RecordSet, FieldError> {
    if volume.is_degenerate() {
        warn!("Ignoring degenerate cull volume {:?}", volume);
        return Ok(set.clone());
    }

    let points = set.points(source)?;
    let kept = set
        .shared_records()
        .iter()
        .zip(&points)
        .filter(|(_, p)| volume.contains(p))
        .map(|(r, _)| r.clone())
        .collect();

    let culled = set.with_records(kept);
    info!(
        "Culled by volume from {} to {} records",
        set.len(),
        culled.len()
    );
    Ok(culled)
}

/// Apply the enabled reductions: range first, then volume on the range's result.
///
/// With nothing enabled this is the identity.
pub fn cull(set: &RecordSet, config: &CullConfig, source: PointSource) -> Result<RecordSet> {
    if !config.is_enabled() {
        return Ok(set.clone());
    }

    let mut working = if config.by_range {
        range_cull(set, config.from, config.to)
    } else {
        set.clone()
    };

    if config.by_volume {
        match &config.volume {
            Some(volume) => working = volume_cull(&working, volume, source)?,
            None => warn!("Volume culling enabled without a volume, skipping"),
        }
    }

    Ok(working)
}
