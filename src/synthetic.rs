//! Synthetic gaze session generator for stress testing and benchmarking.
//!
//! A session is a walk through a room while the gaze dwells on a set of
//! targets: runs of samples scattered tightly around one target (fixations)
//! separated by jumps to the next target (saccades). The targets are the
//! ground truth for density clustering.
//!
//! Feature-gated behind `synthetic`.
//!
//! # Example
//!
//! ```rust
//! use dwellmap::synthetic::SyntheticSession;
//!
//! let session = SyntheticSession::default();
//! let dataset = session.generate();
//! assert_eq!(dataset.records.len(), session.sample_count);
//! ```

use crate::Point3;
use crate::records::RecordSet;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

/// Parameters for a generated session.
#[derive(Debug, Clone)]
pub struct SyntheticSession {
    /// Total samples.
    pub sample_count: usize,
    /// Number of gaze targets placed in the room.
    pub target_count: usize,
    /// Samples per fixation before the gaze jumps to another target.
    pub fixation_length: usize,
    /// Gaze scatter around a target, standard deviation in meters.
    pub fixation_sigma: f64,
    /// Half-extent of the cubic room targets are placed in, in meters.
    pub room_half_extent: f64,
    /// Walking speed of the tracked position, meters per sample.
    pub walk_step: f64,
    /// RNG seed for deterministic reproduction.
    pub seed: u64,
}

impl Default for SyntheticSession {
    fn default() -> Self {
        Self {
            sample_count: 1_000,
            target_count: 8,
            fixation_length: 40,
            fixation_sigma: 0.01,
            room_half_extent: 5.0,
            walk_step: 0.01,
            seed: 42,
        }
    }
}

/// A generated session with its ground truth.
pub struct SyntheticDataset {
    pub records: RecordSet,
    /// Gaze targets in placement order.
    pub targets: Vec<Point3>,
    /// Target index each sample was fixating.
    pub fixation_targets: Vec<usize>,
}

/// One standard normal sample (Box-Muller).
fn standard_normal(rng: &mut StdRng) -> f64 {
    let u1: f64 = rng.gen_range(0.0001..1.0);
    let u2: f64 = rng.gen_range(0.0..1.0);
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

impl SyntheticSession {
    /// Session sized for scaling benchmarks.
    pub fn with_samples(sample_count: usize) -> Self {
        Self {
            sample_count,
            ..Self::default()
        }
    }

    pub fn generate(&self) -> SyntheticDataset {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let extent = self.room_half_extent.max(f64::EPSILON);

        let targets: Vec<Point3> = (0..self.target_count.max(1))
            .map(|_| {
                Point3::new(
                    rng.gen_range(-extent..extent),
                    rng.gen_range(0.0..extent),
                    rng.gen_range(-extent..extent),
                )
            })
            .collect();

        let mut samples = Vec::with_capacity(self.sample_count);
        let mut fixation_targets = Vec::with_capacity(self.sample_count);
        let mut position = Point3::new(0.0, 1.7, 0.0);
        let mut heading: f64 = 0.0;
        let mut target = 0;
        let fixation_length = self.fixation_length.max(1);

        for i in 0..self.sample_count {
            if i > 0 && i % fixation_length == 0 {
                target = rng.gen_range(0..targets.len());
            }

            heading += rng.gen_range(-0.2..0.2);
            position.x = (position.x + heading.cos() * self.walk_step).clamp(-extent, extent);
            position.z = (position.z + heading.sin() * self.walk_step).clamp(-extent, extent);

            let t = targets[target];
            let gaze = Point3::new(
                t.x + standard_normal(&mut rng) * self.fixation_sigma,
                t.y + standard_normal(&mut rng) * self.fixation_sigma,
                t.z + standard_normal(&mut rng) * self.fixation_sigma,
            );

            samples.push((position, gaze));
            fixation_targets.push(target);
        }

        SyntheticDataset {
            records: RecordSet::from_samples(&samples),
            targets,
            fixation_targets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::PointSource;

    #[test]
    fn test_deterministic_generation() {
        let session = SyntheticSession::default();
        let a = session.generate();
        let b = session.generate();

        let pa = a.records.points(PointSource::Gaze).unwrap();
        let pb = b.records.points(PointSource::Gaze).unwrap();
        assert_eq!(pa, pb);
        assert_eq!(a.targets, b.targets);
    }

    #[test]
    fn test_gaze_stays_near_targets() {
        let session = SyntheticSession::default();
        let dataset = session.generate();
        let gaze = dataset.records.points(PointSource::Gaze).unwrap();

        for (p, &t) in gaze.iter().zip(&dataset.fixation_targets) {
            // u1 >= 1e-4 bounds each axis at ~4.3 sigma
            assert!(p.distance(&dataset.targets[t]) < session.fixation_sigma * 10.0);
        }
    }
}
