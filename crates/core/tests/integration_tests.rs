//! Integration tests for u-stow-core.

use nalgebra::Vector3;
use u_stow_core::aabb::Aabb3;
use u_stow_core::placement::{Placement, PlacementStats};
use u_stow_core::result::{ContainerResult, SolveResult, SolveSummary, UnfittedUnit};
use u_stow_core::solver::{Config, DistributionMode};

mod aabb_tests {
    use super::*;

    #[test]
    fn test_aabb_basic_measures() {
        let b: Aabb3<f64> = Aabb3::new(0.0, 0.0, 0.0, 10.0, 8.0, 6.0);

        assert!((b.width() - 10.0).abs() < 1e-10);
        assert!((b.depth() - 8.0).abs() < 1e-10);
        assert!((b.height() - 6.0).abs() < 1e-10);
        assert!((b.volume() - 480.0).abs() < 1e-10);
        assert!((b.footprint_area() - 80.0).abs() < 1e-10);
    }

    #[test]
    fn test_touching_faces_do_not_overlap() {
        let a: Aabb3<f64> = Aabb3::new(0.0, 0.0, 0.0, 5.0, 5.0, 5.0);
        let b: Aabb3<f64> = Aabb3::new(5.0, 0.0, 0.0, 10.0, 5.0, 5.0);

        // Closed intersection sees the shared face, strict overlap does not
        assert!(a.intersects(&b));
        assert!(!a.overlaps(&b, 1e-9));
    }

    #[test]
    fn test_strict_overlap_detected() {
        let a: Aabb3<f64> = Aabb3::new(0.0, 0.0, 0.0, 5.0, 5.0, 5.0);
        let b: Aabb3<f64> = Aabb3::new(4.9, 0.0, 0.0, 9.9, 5.0, 5.0);

        assert!(a.overlaps(&b, 1e-9));
    }

    #[test]
    fn test_from_position_dims_and_containment() {
        let pos = Vector3::new(1.0, 2.0, 3.0);
        let dims = Vector3::new(4.0, 4.0, 4.0);
        let b: Aabb3<f64> = Aabb3::from_position_dims(&pos, &dims);

        assert!((b.max_x - 5.0).abs() < 1e-10);
        assert!((b.max_y - 6.0).abs() < 1e-10);
        assert!((b.max_z - 7.0).abs() < 1e-10);

        let outer: Aabb3<f64> = Aabb3::new(0.0, 0.0, 0.0, 10.0, 10.0, 10.0);
        assert!(outer.contains_box(&b, 1e-9));
        assert!(!b.contains_box(&outer, 1e-9));

        assert!(b.contains_point(1.0, 2.0, 3.0));
        assert!(!b.contains_point(0.5, 2.0, 3.0));
    }

    #[test]
    fn test_footprint_overlap_area() {
        let a: Aabb3<f64> = Aabb3::new(0.0, 0.0, 0.0, 5.0, 5.0, 1.0);
        let b: Aabb3<f64> = Aabb3::new(3.0, 3.0, 5.0, 8.0, 8.0, 6.0);
        let c: Aabb3<f64> = Aabb3::new(6.0, 0.0, 0.0, 9.0, 5.0, 1.0);

        // Heights are ignored, only the XY projections matter
        assert!((a.footprint_overlap_area(&b) - 4.0).abs() < 1e-10);
        assert!((a.footprint_overlap_area(&c) - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_footprint_contains_tolerates_edges() {
        let b: Aabb3<f64> = Aabb3::new(0.0, 0.0, 0.0, 5.0, 5.0, 5.0);

        assert!(b.footprint_contains(0.0, 0.0, 1e-9));
        assert!(b.footprint_contains(5.0, 5.0, 1e-9));
        assert!(!b.footprint_contains(5.1, 5.0, 1e-9));
    }
}

mod placement_tests {
    use super::*;

    #[test]
    fn test_placement_accessors() {
        let p: Placement<f64> = Placement::new(
            "box",
            2,
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(4.0, 5.0, 6.0),
            1,
        )
        .with_container(3);

        assert_eq!(p.unit_id, "box");
        assert_eq!(p.instance, 2);
        assert_eq!(p.container_index, 3);
        assert!((p.x() - 1.0).abs() < 1e-10);
        assert!((p.y() - 2.0).abs() < 1e-10);
        assert!((p.z() - 3.0).abs() < 1e-10);

        let corner = p.max_corner();
        assert!((corner.x - 5.0).abs() < 1e-10);
        assert!((corner.y - 7.0).abs() < 1e-10);
        assert!((corner.z - 9.0).abs() < 1e-10);
        assert!((p.volume() - 120.0).abs() < 1e-10);

        let aabb = p.aabb();
        assert!((aabb.min_x - 1.0).abs() < 1e-10);
        assert!((aabb.max_z - 9.0).abs() < 1e-10);
    }

    #[test]
    fn test_placement_stats_computation() {
        let zero = Vector3::new(0.0, 0.0, 0.0);
        let dims = Vector3::new(1.0, 1.0, 1.0);
        let placements = vec![
            Placement::new("a", 1, zero, dims, 0),
            Placement::new("a", 2, zero, dims, 0).with_container(1),
            Placement::new("b", 1, zero, dims, 1).with_container(1),
            Placement::new("c", 1, zero, dims, 3),
        ];

        let stats = PlacementStats::from_placements(&placements);

        assert_eq!(stats.count, 4);
        assert_eq!(stats.orientation_distribution.get(&0), Some(&2));
        assert_eq!(stats.orientation_distribution.get(&1), Some(&1));
        assert_eq!(stats.orientation_distribution.get(&3), Some(&1));
        assert_eq!(stats.container_distribution.get(&0), Some(&2));
        assert_eq!(stats.container_distribution.get(&1), Some(&2));
    }
}

mod config_tests {
    use super::*;

    #[test]
    fn test_config_builder_chain() {
        let config = Config::new()
            .with_mode(DistributionMode::IndependentTrial)
            .with_larger_first(false)
            .with_gravity(false)
            .with_stability(true)
            .with_support_ratio(0.6)
            .with_binding(vec!["fragile".to_string(), "base".to_string()])
            .with_time_limit(2_000);

        assert_eq!(config.mode, DistributionMode::IndependentTrial);
        assert!(!config.larger_first);
        assert!(!config.gravity);
        assert!(config.stability);
        assert!((config.support_ratio - 0.6).abs() < 1e-10);
        assert_eq!(config.bindings.len(), 1);
        assert_eq!(config.time_limit_ms, 2_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_support_ratio_clamped_by_builder() {
        let high = Config::new().with_support_ratio(1.5);
        assert!((high.support_ratio - 1.0).abs() < 1e-10);

        let low = Config::new().with_support_ratio(-0.2);
        assert!((low.support_ratio - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_validate_rejects_out_of_range_support_ratio() {
        let mut config = Config::default();
        config.support_ratio = 0.0;
        assert!(config.validate().is_err());

        config.support_ratio = 1.5;
        assert!(config.validate().is_err());

        config.support_ratio = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_binding_group() {
        let config = Config::default().with_binding(vec![]);
        assert!(config.validate().is_err());
    }
}

mod result_tests {
    use super::*;

    fn sample_result() -> SolveResult<f64> {
        let dims = Vector3::new(2.0, 2.0, 2.0);
        let origin = Vector3::new(0.0, 0.0, 0.0);

        let full = ContainerResult {
            index: 0,
            container_id: "A".to_string(),
            put_order: 0,
            placements: vec![
                Placement::new("box", 1, origin, dims, 0),
                Placement::new("box", 2, Vector3::new(2.0, 0.0, 0.0), dims, 0),
            ],
            unfitted: vec![UnfittedUnit::new("box", 3, "no viable position")],
            placed_volume: 16.0,
            placed_weight: 4.0,
            utilization: 0.16,
        };
        let empty = ContainerResult {
            index: 1,
            container_id: "B".to_string(),
            put_order: 1,
            placements: vec![],
            unfitted: vec![],
            placed_volume: 0.0,
            placed_weight: 0.0,
            utilization: 0.0,
        };

        SolveResult {
            containers: vec![full, empty],
            unfitted: vec![UnfittedUnit::new("box", 3, "no viable position")],
            containers_used: 1,
            utilization: 0.08,
            computation_time_ms: 12,
            mode: "spillover".to_string(),
            cancelled: false,
        }
    }

    #[test]
    fn test_result_aggregation() {
        let result = sample_result();

        assert!(!result.all_placed());
        assert!(result.is_successful());
        assert!(result.completed_normally());
        assert_eq!(result.placed_count(), 2);
        assert_eq!(result.unfitted_count(), 1);
        assert_eq!(result.placements().count(), 2);
        assert_eq!(result.container("A").unwrap().placed_count(), 2);
        assert!(result.container("B").unwrap().is_empty());
        assert!(result.container("missing").is_none());
    }

    #[test]
    fn test_deduplicate_unfitted() {
        let mut result = sample_result();
        result.unfitted.push(UnfittedUnit::new("box", 3, "duplicate entry"));
        result.unfitted.push(UnfittedUnit::new("box", 4, "no viable position"));

        result.deduplicate_unfitted();

        assert_eq!(result.unfitted.len(), 2);
        assert_eq!(result.unfitted[0].instance, 3);
        assert_eq!(result.unfitted[1].instance, 4);
    }

    #[test]
    fn test_summary_from_result() {
        let result = sample_result();
        let summary = SolveSummary::from(&result);

        assert_eq!(summary.total_requested, 3);
        assert_eq!(summary.total_placed, 2);
        assert_eq!(summary.containers_used, 1);
        assert_eq!(summary.time_ms, 12);
        assert_eq!(summary.mode, "spillover");
    }
}

#[cfg(feature = "serde")]
mod serde_tests {
    use super::*;

    #[test]
    fn test_config_round_trip() {
        let config = Config::default()
            .with_gravity(false)
            .with_stability(true)
            .with_larger_first(false)
            .with_time_limit(2_500);

        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();

        assert!(!back.gravity);
        assert!(back.stability);
        assert!(!back.larger_first);
        assert_eq!(back.time_limit_ms, 2_500);
        assert_eq!(back.mode, DistributionMode::Spillover);
    }

    #[test]
    fn test_placement_round_trip() {
        let placement = Placement::new(
            "box",
            1,
            Vector3::new(1.0, 2.0, 0.0),
            Vector3::new(4.0, 3.0, 2.0),
            5,
        )
        .with_container(2);

        let json = serde_json::to_string(&placement).unwrap();
        let back: Placement<f64> = serde_json::from_str(&json).unwrap();

        assert_eq!(back.unit_id, "box");
        assert_eq!(back.instance, 1);
        assert_eq!(back.position, Vector3::new(1.0, 2.0, 0.0));
        assert_eq!(back.dimensions, Vector3::new(4.0, 3.0, 2.0));
        assert_eq!(back.orientation, 5);
        assert_eq!(back.container_index, 2);
    }

    #[test]
    fn test_result_round_trip() {
        let result = SolveResult {
            containers: vec![ContainerResult {
                index: 0,
                container_id: "A".to_string(),
                put_order: 0,
                placements: vec![Placement::new(
                    "box",
                    1,
                    Vector3::new(0.0, 0.0, 0.0),
                    Vector3::new(2.0, 2.0, 2.0),
                    0,
                )],
                unfitted: vec![UnfittedUnit::new("pallet", 1, "no viable position")],
                placed_volume: 8.0,
                placed_weight: 3.0,
                utilization: 0.08,
            }],
            unfitted: vec![UnfittedUnit::new("pallet", 1, "no viable position")],
            containers_used: 1,
            utilization: 0.08,
            computation_time_ms: 7,
            mode: "spillover".to_string(),
            cancelled: false,
        };

        let json = serde_json::to_string(&result).unwrap();
        let back: SolveResult<f64> = serde_json::from_str(&json).unwrap();

        assert_eq!(back.placed_count(), 1);
        assert_eq!(back.unfitted[0].unit_id, "pallet");
        assert_eq!(back.container("A").unwrap().put_order, 0);
        assert!((back.utilization - 0.08).abs() < 1e-10);
        assert!(!back.cancelled);
    }
}
