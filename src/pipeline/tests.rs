use super::*;
use crate::clusterer::euclidean;
use crate::diagnostics::RecordingDiagnostics;
use tracing::Level;

/// Ten points around the origin and one far outlier (1/11 < 10%)
fn origin_with_outlier() -> Vec<Point> {
    let mut points = vec![
        Point::new(0.01, 0.02),
        Point::new(0.0, 0.0),
        Point::new(0.0, 0.01),
        Point::new(0.01, 0.0),
        Point::new(0.01, 0.01),
        Point::new(0.005, 0.005),
        Point::new(0.0, 0.02),
        Point::new(0.02, 0.0),
        Point::new(0.02, 0.02),
        Point::new(0.015, 0.005),
    ];
    points.push(Point::new(10.0, 10.0));
    points
}

/// Three well separated blobs of 20, 15 and 2 points
fn three_blobs() -> Vec<Point> {
    let mut points = Vec::new();
    for i in 0..20 {
        points.push(Point::new(40.0 + (i % 5) as f64 * 0.01, -74.0 + (i / 5) as f64 * 0.01));
    }
    for i in 0..15 {
        points.push(Point::new(41.0 + (i % 5) as f64 * 0.01, -73.0 + (i / 5) as f64 * 0.01));
    }
    points.push(Point::new(44.0, -70.0));
    points.push(Point::new(44.01, -70.01));
    points
}

fn percentage_sum(clusters: &[Cluster]) -> f64 {
    clusters.iter().map(|c| c.percentage).sum()
}

#[test]
fn test_outlier_cluster_is_pruned_and_reassigned() {
    let points = origin_with_outlier();
    let diag = RecordingDiagnostics::new();

    let report = run(&points, &RunConfig::new(2), &diag).unwrap();

    assert_eq!(report.clusters.len(), 1);
    assert_eq!(report.pruned_labels.len(), 1);
    assert_eq!(report.clusters[0].count, points.len());
    assert!((report.clusters[0].percentage - 1.0).abs() < 1e-12);

    // Centroid is the mean of the origin group only, untouched by the outlier
    assert!(report.clusters[0].centroid.lat < 0.02);
    assert!(report.clusters[0].centroid.lng < 0.02);
}

#[test]
fn test_single_cluster_has_no_orphans() {
    let points = origin_with_outlier();
    let diag = RecordingDiagnostics::new();

    let pruned = partition(&points, &RunConfig::new(1), &diag)
        .unwrap()
        .prune(&points, DEFAULT_MIN_SHARE, &diag)
        .unwrap();

    assert!(pruned.orphans().is_empty());
    assert!(pruned.pruned_labels().is_empty());

    let before = pruned.registry().clone();
    let reassigned = pruned.reassign(&diag).unwrap();
    assert_eq!(reassigned.placements().count(), 0);
    assert_eq!(
        reassigned.registry().iter().collect::<Vec<_>>(),
        before.iter().collect::<Vec<_>>()
    );

    let report = reassigned.finalize();
    assert_eq!(report.clusters.len(), 1);
    assert_eq!(report.clusters[0].count, points.len());
}

#[test]
fn test_k_above_distinct_points_is_invalid() {
    let points = vec![Point::new(1.0, 1.0), Point::new(1.0, 1.0)];
    let err = run(&points, &RunConfig::new(2), &RecordingDiagnostics::new()).unwrap_err();

    assert!(matches!(err, ClusterError::InvalidParameter { .. }));
    assert_eq!(err.stage(), Stage::Partition);
}

#[test]
fn test_counts_balance_after_prune() {
    let points = three_blobs();
    let diag = RecordingDiagnostics::new();

    let partitioned = partition(&points, &RunConfig::new(3), &diag).unwrap();
    assert_eq!(partitioned.registry().len(), 3);
    assert_eq!(partitioned.registry().total_count(), points.len());

    let pruned = partitioned.prune(&points, DEFAULT_MIN_SHARE, &diag).unwrap();
    assert_eq!(
        pruned.registry().total_count() + pruned.orphans().len(),
        points.len()
    );
    assert_eq!(pruned.orphans().len(), 2);
    assert_eq!(pruned.registry().len(), 2);
}

#[test]
fn test_counts_and_shares_complete_after_reassign() {
    let points = three_blobs();
    let report = run(&points, &RunConfig::new(3), &RecordingDiagnostics::new()).unwrap();

    let total: usize = report.clusters.iter().map(|c| c.count).sum();
    assert_eq!(total, points.len());
    assert_eq!(report.total_points, points.len());
    assert!((percentage_sum(&report.clusters) - 1.0).abs() < 1e-9);
}

#[test]
fn test_orphans_go_to_nearest_centroid() {
    let points = three_blobs();
    let diag = RecordingDiagnostics::new();

    let reassigned = partition(&points, &RunConfig::new(3), &diag)
        .unwrap()
        .prune(&points, DEFAULT_MIN_SHARE, &diag)
        .unwrap()
        .reassign(&diag)
        .unwrap();

    let registry = reassigned.registry();
    for (orphan, label) in reassigned.placements() {
        let chosen = registry.get(label).unwrap();
        let chosen_dist = euclidean(orphan, &chosen.centroid);
        for other in registry.iter() {
            assert!(chosen_dist <= euclidean(orphan, &other.centroid));
        }
    }
}

#[test]
fn test_reassign_is_repeatable() {
    let points = three_blobs();
    let diag = RecordingDiagnostics::new();

    let pruned = partition(&points, &RunConfig::new(3), &diag)
        .unwrap()
        .prune(&points, DEFAULT_MIN_SHARE, &diag)
        .unwrap();

    let first = pruned.clone().reassign(&diag).unwrap().finalize();
    let second = pruned.reassign(&diag).unwrap().finalize();

    assert_eq!(first.clusters, second.clusters);
}

#[test]
fn test_reassign_keeps_centroids() {
    let points = three_blobs();
    let diag = RecordingDiagnostics::new();

    let pruned = partition(&points, &RunConfig::new(3), &diag)
        .unwrap()
        .prune(&points, DEFAULT_MIN_SHARE, &diag)
        .unwrap();
    let before: Vec<Point> = pruned.registry().iter().map(|c| c.centroid).collect();

    let after: Vec<Point> = pruned
        .reassign(&diag)
        .unwrap()
        .registry()
        .iter()
        .map(|c| c.centroid)
        .collect();

    assert_eq!(before, after);
}

#[test]
fn test_everything_pruned_is_an_error() {
    let points = three_blobs();
    let diag = RecordingDiagnostics::new();

    // The largest blob holds 20/37 of the points, well under 0.9
    let pruned = partition(&points, &RunConfig::new(3), &diag)
        .unwrap()
        .prune(&points, 0.9, &diag)
        .unwrap();
    assert!(pruned.registry().is_empty());
    assert_eq!(pruned.orphans().len(), points.len());

    let err = pruned.reassign(&diag).unwrap_err();
    assert!(matches!(
        err,
        ClusterError::NoSurvivingClusters { pruned: 3, .. }
    ));
    assert_eq!(err.stage(), Stage::Reassign);
}

#[test]
fn test_tie_goes_to_first_in_registry() {
    // Two equal blobs, and an orphan exactly between their centroids
    let mut points = Vec::new();
    for _ in 0..10 {
        points.push(Point::new(-1.0, 0.0));
        points.push(Point::new(1.0, 0.0));
    }
    points.push(Point::new(0.0, 50.0));
    let diag = RecordingDiagnostics::new();

    let reassigned = partition(&points, &RunConfig::new(3), &diag)
        .unwrap()
        .prune(&points, DEFAULT_MIN_SHARE, &diag)
        .unwrap()
        .reassign(&diag)
        .unwrap();

    let first_label = reassigned.registry().labels()[0];
    let placed: Vec<ClusterLabel> = reassigned.placements().map(|(_, l)| l).collect();
    assert_eq!(placed, vec![first_label]);
}

#[test]
fn test_strict_convergence_fails_at_cap() {
    let points = three_blobs();
    let config = RunConfig::new(3)
        .max_iterations(1)
        .convergence(ConvergencePolicy::Fail);

    let err = run(&points, &config, &RecordingDiagnostics::new()).unwrap_err();
    assert!(matches!(
        err,
        ClusterError::ConvergenceNotReached { iterations: 1 }
    ));
    assert_eq!(err.stage(), Stage::Partition);
}

#[test]
fn test_lenient_convergence_warns_and_continues() {
    let points = three_blobs();
    let diag = RecordingDiagnostics::new();
    let config = RunConfig::new(3).max_iterations(1);

    let report = run(&points, &config, &diag).unwrap();

    assert!(!report.converged);
    assert!(diag.has_level(Level::WARN));
    let total: usize = report.clusters.iter().map(|c| c.count).sum();
    assert_eq!(total, points.len());
}

#[test]
fn test_invalid_min_share() {
    let points = three_blobs();
    for share in [-0.1, 1.5, f64::NAN] {
        let err = run(
            &points,
            &RunConfig::new(3).min_share(share),
            &RecordingDiagnostics::new(),
        )
        .unwrap_err();
        assert_eq!(err.stage(), Stage::Prune);
    }
}

#[test]
fn test_prune_rejects_mismatched_points() {
    let points = three_blobs();
    let diag = RecordingDiagnostics::new();
    let partitioned = partition(&points, &RunConfig::new(2), &diag).unwrap();

    let err = partitioned
        .prune(&points[1..], DEFAULT_MIN_SHARE, &diag)
        .unwrap_err();
    assert_eq!(err.stage(), Stage::Prune);
}

#[test]
fn test_stages_report_through_sink() {
    let points = three_blobs();
    let diag = RecordingDiagnostics::new();

    run(&points, &RunConfig::new(3), &diag).unwrap();

    assert!(!diag.messages_for(Stage::Partition).is_empty());
    assert!(diag
        .messages_for(Stage::Prune)
        .iter()
        .any(|m| m.contains("2 points orphaned")));
    assert!(!diag.messages_for(Stage::Reassign).is_empty());
}

fn assert_assignments_match_clusters(points: &[Point], report: &ClusterReport) {
    assert_eq!(report.assignments.len(), points.len());
    assert!(report
        .assignments
        .iter()
        .all(|label| !report.pruned_labels.contains(label)));

    for cluster in &report.clusters {
        let members = report
            .assignments
            .iter()
            .filter(|&&a| a == cluster.label)
            .count();
        assert_eq!(members, cluster.count, "cluster {}", cluster.label);
    }
}

#[test]
fn test_final_assignments_cover_surviving_clusters() {
    for (points, k) in [(three_blobs(), 3), (origin_with_outlier(), 2)] {
        let report = run(&points, &RunConfig::new(k), &RecordingDiagnostics::new()).unwrap();

        assert!(!report.pruned_labels.is_empty());
        assert_assignments_match_clusters(&points, &report);
    }
}

#[test]
fn test_only_orphans_change_label() {
    let points = three_blobs();
    let diag = RecordingDiagnostics::new();

    let partitioned = partition(&points, &RunConfig::new(3), &diag).unwrap();
    let initial = partitioned.assignments().to_vec();
    assert_eq!(initial.len(), points.len());

    let pruned = partitioned.prune(&points, DEFAULT_MIN_SHARE, &diag).unwrap();
    let pruned_labels = pruned.pruned_labels().to_vec();
    let reassigned = pruned.reassign(&diag).unwrap();

    for (before, after) in initial.iter().zip(reassigned.assignments()) {
        if pruned_labels.contains(before) {
            assert_ne!(before, after);
        } else {
            assert_eq!(before, after);
        }
    }

    // Orphan points are the blob far from both large ones
    let moved: Vec<ClusterLabel> = reassigned.assignments()[35..].to_vec();
    let placed: Vec<ClusterLabel> = reassigned.placements().map(|(_, l)| l).collect();
    assert_eq!(moved, placed);
}
