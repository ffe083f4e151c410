//! Tests for trail module

use dwellmap::{GapPolicy, Point3, PointSource, RecordSet, TrailBuilder};

fn scenario_points() -> Vec<Point3> {
    vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(0.01, 0.0, 0.0),
        Point3::new(10.0, 10.0, 10.0),
    ]
}

fn x_line(xs: &[f64]) -> Vec<Point3> {
    xs.iter().map(|&x| Point3::new(x, 0.0, 0.0)).collect()
}

#[test]
fn test_ungated_trail_keeps_every_sample() {
    let points = scenario_points();
    let trail = TrailBuilder::new(false, 1.0).build_points(&points);

    assert_eq!(trail.vertices, points);
    assert_eq!(trail.segment_visible, vec![true, true]);
    assert_eq!(trail.source_indices, vec![0, 1, 2]);
}

#[test]
fn test_close_only_compacts_long_jump() {
    let points = scenario_points();
    let trail = TrailBuilder::new(true, 1.0).build_points(&points);

    assert_eq!(trail.policy, GapPolicy::Compact);
    assert_eq!(trail.vertices, points[..2].to_vec());
    assert_eq!(trail.segment_visible, vec![true]);
    assert_eq!(trail.source_indices, vec![0, 1]);
}

#[test]
fn test_close_only_zero_fill_legacy() {
    let points = scenario_points();
    let trail = TrailBuilder::new(true, 1.0)
        .with_gap_policy(GapPolicy::ZeroFill)
        .build_points(&points);

    assert_eq!(trail.len(), 3);
    assert_eq!(trail.vertices[0], points[0]);
    assert_eq!(trail.vertices[1], points[1]);
    assert_eq!(trail.vertices[2], Point3::ORIGIN);
    assert_eq!(trail.segment_visible, vec![true, false]);
}

#[test]
fn test_gating_measures_from_true_previous_sample() {
    // The third sample is far from the first but close to the dropped second
    let points = x_line(&[0.0, 5.0, 5.5]);
    let trail = TrailBuilder::new(true, 1.0).build_points(&points);

    assert_eq!(trail.source_indices, vec![0, 2]);
    // Vertices 0 and 2 were never adjacent, so the bridge stays hidden
    assert_eq!(trail.segment_visible, vec![false]);
}

#[test]
fn test_segment_at_exact_limit_is_visible() {
    let points = x_line(&[0.0, 1.0]);
    let trail = TrailBuilder::new(true, 1.0).build_points(&points);
    assert_eq!(trail.len(), 2);
    assert_eq!(trail.segment_visible, vec![true]);
}

#[test]
fn test_segment_flags_length() {
    let points = x_line(&[0.0, 0.5, 3.0, 3.2, 9.0, 9.1, 9.2]);
    for policy in [GapPolicy::Compact, GapPolicy::ZeroFill] {
        for close_only in [false, true] {
            let trail = TrailBuilder::new(close_only, 1.0)
                .with_gap_policy(policy)
                .build_points(&points);
            assert_eq!(trail.segment_visible.len(), trail.len() - 1);
            assert_eq!(trail.source_indices.len(), trail.len());
            assert!(trail.len() <= points.len());
        }
    }
}

#[test]
fn test_empty_and_single_point() {
    let builder = TrailBuilder::new(true, 1.0);

    let empty = builder.build_points(&[]);
    assert!(empty.is_empty());
    assert!(empty.segment_visible.is_empty());
    assert!(empty.runs().is_empty());

    let single = builder.build_points(&[Point3::new(1.0, 1.0, 1.0)]);
    assert_eq!(single.len(), 1);
    assert!(single.segment_visible.is_empty());
    assert!(single.runs().is_empty());
}

#[test]
fn test_runs_split_at_suppressed_jumps() {
    let points = x_line(&[0.0, 0.1, 0.2, 10.0, 10.1, 10.2]);
    let trail = TrailBuilder::new(true, 1.0).build_points(&points);

    assert_eq!(trail.source_indices, vec![0, 1, 2, 4, 5]);
    assert_eq!(trail.segment_visible, vec![true, true, false, true]);
    assert_eq!(trail.visible_segment_count(), 3);

    let runs = trail.runs();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0], x_line(&[0.0, 0.1, 0.2]));
    assert_eq!(runs[1], x_line(&[10.1, 10.2]));
}

#[test]
fn test_ungated_trail_is_single_run() {
    let points = x_line(&[0.0, 50.0, 100.0]);
    let runs = TrailBuilder::default().build_points(&points).runs();
    assert_eq!(runs, vec![points]);
}

#[test]
fn test_build_from_record_set_uses_point_source() {
    let set = RecordSet::from_samples(&[
        (Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 0.0, 0.0)),
        (Point3::new(0.1, 0.0, 0.0), Point3::new(20.0, 0.0, 0.0)),
    ]);
    let builder = TrailBuilder::new(true, 1.0);

    assert_eq!(builder.build(&set, PointSource::Position).unwrap().len(), 2);
    assert_eq!(builder.build(&set, PointSource::Gaze).unwrap().len(), 1);
}
