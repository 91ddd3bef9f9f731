//! Per-container placement engine.
//!
//! `LoadState` holds the working state of one container during packing: the
//! committed units, the occupancy arena, and the running weight total. The
//! arena is seeded with a zero-height floor slab and the corner reservations;
//! committed boxes are appended in commit order, so rolling back a group of
//! placements is a pair of truncations plus a weight adjustment.

use crate::container::Container3D;
use crate::support;
use crate::unit::Unit3D;
use nalgebra::Vector3;
use u_stow_core::aabb::Aabb3;
use u_stow_core::geometry::{Container, Unit, UnitId};
use u_stow_core::result::{ContainerResult, UnfittedUnit};
use u_stow_core::solver::Config;
use u_stow_core::Placement;

/// Geometric comparison tolerance.
pub(crate) const EPS: f64 = 1e-9;

/// What an occupied region represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    /// Zero-height slab spanning the container footprint.
    Floor,
    /// Reserved corner cube. Blocks placement, never supports.
    Reserved,
    /// A committed unit's oriented box.
    Unit,
}

/// One entry in the occupancy arena.
#[derive(Debug, Clone)]
pub struct Region {
    pub kind: RegionKind,
    pub aabb: Aabb3<f64>,
}

/// A unit committed to a container.
#[derive(Debug, Clone)]
pub struct PlacedUnit {
    /// Copy of the unit taken at commit time.
    pub unit: Unit3D,
    /// Instance index (0-based).
    pub instance: usize,
    /// Index into the unit's allowed-orientation set.
    pub orientation: usize,
    /// Settled min-corner position.
    pub position: Vector3<f64>,
    /// Oriented dimensions.
    pub dimensions: Vector3<f64>,
}

impl PlacedUnit {
    /// Returns the occupied box.
    pub fn aabb(&self) -> Aabb3<f64> {
        Aabb3::from_position_dims(&self.position, &self.dimensions)
    }
}

/// Working state of one container during a packing pass.
#[derive(Debug, Clone)]
pub struct LoadState {
    container: Container3D,
    container_index: usize,
    committed: Vec<PlacedUnit>,
    occupied: Vec<Region>,
    /// Arena length before any unit is committed (floor + reservations).
    occupied_base: usize,
    placed_weight: f64,
    unfitted: Vec<UnfittedUnit>,
}

impl LoadState {
    /// Creates the working state for a container, seeding the occupancy
    /// arena with the floor slab and the corner reservations.
    pub fn new(container: &Container3D, container_index: usize) -> Self {
        let mut occupied = Vec::with_capacity(9);
        occupied.push(Region {
            kind: RegionKind::Floor,
            aabb: Aabb3::new(0.0, 0.0, 0.0, container.width(), container.depth(), 0.0),
        });
        for aabb in container.corner_regions() {
            occupied.push(Region {
                kind: RegionKind::Reserved,
                aabb,
            });
        }
        let occupied_base = occupied.len();

        Self {
            container: container.clone(),
            container_index,
            committed: Vec::new(),
            occupied,
            occupied_base,
            placed_weight: 0.0,
            unfitted: Vec::new(),
        }
    }

    /// Returns the container being filled.
    pub fn container(&self) -> &Container3D {
        &self.container
    }

    /// Returns the committed units in commit order.
    pub fn committed(&self) -> &[PlacedUnit] {
        &self.committed
    }

    /// Returns the units rejected by this container so far.
    pub fn unfitted(&self) -> &[UnfittedUnit] {
        &self.unfitted
    }

    /// Returns the total weight committed so far.
    pub fn placed_weight(&self) -> f64 {
        self.placed_weight
    }

    /// Returns the total volume committed so far.
    pub fn placed_volume(&self) -> f64 {
        self.committed
            .iter()
            .map(|p| p.dimensions.x * p.dimensions.y * p.dimensions.z)
            .sum()
    }

    /// Returns the weight capacity still available.
    pub fn remaining_capacity(&self) -> f64 {
        self.container.max_weight() - self.placed_weight
    }

    /// Generates the candidate pivots for the next placement attempt.
    ///
    /// For each spatial axis (x, then y, then z), every placed item
    /// contributes the point on its far face along that axis. Corner
    /// reservations are pre-placed items for this purpose; the floor slab is
    /// not. An empty container yields the single origin pivot.
    pub fn pivots(&self) -> Vec<Vector3<f64>> {
        let items: Vec<&Aabb3<f64>> = self
            .occupied
            .iter()
            .filter(|r| r.kind != RegionKind::Floor)
            .map(|r| &r.aabb)
            .collect();

        if items.is_empty() {
            return vec![Vector3::new(0.0, 0.0, 0.0)];
        }

        let mut pivots = Vec::with_capacity(3 * items.len());
        for axis in 0..3 {
            for aabb in &items {
                let mut pivot = Vector3::new(aabb.min_x, aabb.min_y, aabb.min_z);
                pivot[axis] += [aabb.width(), aabb.depth(), aabb.height()][axis];
                pivots.push(pivot);
            }
        }
        pivots
    }

    /// Checks that a box lies within the container bounds.
    fn fits_bounds(&self, aabb: &Aabb3<f64>) -> bool {
        aabb.max_x <= self.container.width() + EPS
            && aabb.max_y <= self.container.depth() + EPS
            && aabb.max_z <= self.container.height() + EPS
    }

    /// Checks the box against every occupied region. Touching faces do not
    /// collide, so the zero-height floor slab never triggers this.
    fn collides(&self, aabb: &Aabb3<f64>) -> bool {
        self.occupied.iter().any(|r| aabb.overlaps(&r.aabb, EPS))
    }

    /// Attempts to place one unit instance, committing it on success.
    ///
    /// The weight check runs once up front; it is position-independent and
    /// aborts the whole search. Orientations are tried in their fixed order,
    /// and every pivot is tried for one orientation before the next
    /// orientation is considered. The first position that passes bounds,
    /// collision, settling and stability wins; a failed search records the
    /// instance in this container's unfitted list.
    pub fn try_place(&mut self, unit: &Unit3D, instance: usize, config: &Config) -> bool {
        if unit.weight() > self.remaining_capacity() + EPS {
            self.record_unfitted(unit.id().clone(), instance, "exceeds remaining weight capacity");
            return false;
        }

        let pivots = self.pivots();
        let orientation_count = unit.allowed_orientations().len();

        for orientation in 0..orientation_count {
            let dims = unit.dimensions_for_orientation(orientation);

            for pivot in &pivots {
                let mut position = *pivot;
                let mut candidate = Aabb3::from_position_dims(&position, &dims);

                if !self.fits_bounds(&candidate) {
                    continue;
                }
                if self.collides(&candidate) {
                    continue;
                }

                if config.gravity {
                    let settled = support::settle_z(&self.occupied, &candidate);
                    if settled < position.z - EPS {
                        position.z = settled;
                        candidate = Aabb3::from_position_dims(&position, &dims);
                        // A box dropped into a reservation or out of bounds
                        // rejects this pivot outright.
                        if !self.fits_bounds(&candidate) || self.collides(&candidate) {
                            continue;
                        }
                    }
                }

                if config.stability {
                    if support::support_ratio(&self.occupied, &candidate) < config.support_ratio {
                        continue;
                    }
                    if !support::corners_supported(&self.occupied, &candidate) {
                        continue;
                    }
                }

                self.commit(unit, instance, orientation, position, dims);
                return true;
            }
        }

        self.record_unfitted(unit.id().clone(), instance, "no viable position");
        false
    }

    fn commit(
        &mut self,
        unit: &Unit3D,
        instance: usize,
        orientation: usize,
        position: Vector3<f64>,
        dimensions: Vector3<f64>,
    ) {
        self.placed_weight += unit.weight();
        self.occupied.push(Region {
            kind: RegionKind::Unit,
            aabb: Aabb3::from_position_dims(&position, &dimensions),
        });
        self.committed.push(PlacedUnit {
            unit: unit.clone(),
            instance,
            orientation,
            position,
            dimensions,
        });
    }

    /// Returns a marker for the current commit count, for later rollback.
    pub fn checkpoint(&self) -> usize {
        self.committed.len()
    }

    /// Rolls back every commit made after the checkpoint, restoring the
    /// occupancy arena and the weight total.
    pub fn rollback_to(&mut self, checkpoint: usize) {
        while self.committed.len() > checkpoint {
            if let Some(placed) = self.committed.pop() {
                self.placed_weight -= placed.unit.weight();
            }
        }
        self.occupied.truncate(self.occupied_base + checkpoint);
    }

    /// Records an instance this container rejected.
    pub fn record_unfitted(
        &mut self,
        unit_id: UnitId,
        instance: usize,
        reason: impl Into<String>,
    ) {
        self.unfitted.push(UnfittedUnit::new(unit_id, instance, reason));
    }

    /// Returns the committed units as placements.
    pub fn placements(&self) -> Vec<Placement<f64>> {
        self.committed
            .iter()
            .map(|p| {
                Placement::new(
                    p.unit.id().clone(),
                    p.instance,
                    p.position,
                    p.dimensions,
                    p.orientation,
                )
                .with_container(self.container_index)
            })
            .collect()
    }

    /// Consumes the state into a per-container result.
    pub fn into_result(self) -> ContainerResult<f64> {
        let placements = self.placements();
        let placed_volume = self.placed_volume();
        let container_volume = self.container.measure();
        let utilization = if container_volume > 0.0 {
            placed_volume / container_volume
        } else {
            0.0
        };

        ContainerResult {
            index: self.container_index,
            container_id: self.container.id().to_string(),
            put_order: self.container.put_order(),
            placements,
            unfitted: self.unfitted,
            placed_volume,
            placed_weight: self.placed_weight,
            utilization,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn place(state: &mut LoadState, unit: &Unit3D, config: &Config) -> bool {
        state.try_place(unit, 0, config)
    }

    #[test]
    fn test_empty_container_has_origin_pivot() {
        let container = Container3D::new("C1", 10.0, 10.0, 10.0);
        let state = LoadState::new(&container, 0);
        assert_eq!(state.pivots(), vec![Vector3::new(0.0, 0.0, 0.0)]);
    }

    #[test]
    fn test_pivot_order_after_first_commit() {
        let container = Container3D::new("C1", 10.0, 10.0, 10.0);
        let config = Config::default();
        let mut state = LoadState::new(&container, 0);

        assert!(place(&mut state, &Unit3D::new("A", 4.0, 3.0, 2.0), &config));
        assert_eq!(
            state.pivots(),
            vec![
                Vector3::new(4.0, 0.0, 0.0),
                Vector3::new(0.0, 3.0, 0.0),
                Vector3::new(0.0, 0.0, 2.0),
            ]
        );
    }

    #[test]
    fn test_two_cubes_side_by_side() {
        let container = Container3D::new("C1", 10.0, 10.0, 10.0);
        let config = Config::default();
        let mut state = LoadState::new(&container, 0);

        let cube = Unit3D::new("cube", 5.0, 5.0, 5.0);
        assert!(state.try_place(&cube, 0, &config));
        assert!(state.try_place(&cube, 1, &config));

        let committed = state.committed();
        assert_eq!(committed[0].position, Vector3::new(0.0, 0.0, 0.0));
        // x-axis pivots come first
        assert_eq!(committed[1].position, Vector3::new(5.0, 0.0, 0.0));
        assert!(!committed[0].aabb().overlaps(&committed[1].aabb(), EPS));
    }

    #[test]
    fn test_third_cube_takes_depth_pivot() {
        let container = Container3D::new("C1", 10.0, 10.0, 10.0);
        let config = Config::default();
        let mut state = LoadState::new(&container, 0);

        let cube = Unit3D::new("cube", 5.0, 5.0, 5.0);
        for instance in 0..3 {
            assert!(state.try_place(&cube, instance, &config));
        }

        // The x pivot of the first cube is blocked by the second, so the
        // first open candidate is its y pivot on the floor.
        assert_eq!(state.committed()[2].position, Vector3::new(0.0, 5.0, 0.0));
        assert!(state.unfitted().is_empty());
    }

    #[test]
    fn test_weight_check_short_circuits() {
        let container = Container3D::new("C1", 10.0, 10.0, 10.0).with_max_weight(25.0);
        let config = Config::default();
        let mut state = LoadState::new(&container, 0);

        let heavy = Unit3D::new("heavy", 2.0, 2.0, 2.0).with_weight(30.0);
        assert!(!place(&mut state, &heavy, &config));
        assert_eq!(state.unfitted().len(), 1);
        assert!(state.unfitted()[0].reason.contains("weight"));

        let light = Unit3D::new("light", 2.0, 2.0, 2.0).with_weight(25.0);
        assert!(place(&mut state, &light, &config));
        assert_relative_eq!(state.remaining_capacity(), 0.0);
    }

    #[test]
    fn test_settle_drops_elevated_pivot() {
        let container = Container3D::new("C1", 9.0, 5.0, 10.0);
        let config = Config::default();
        let mut state = LoadState::new(&container, 0);

        // Tower of two 5x5x2 slabs at the origin, a 4x4x1 plinth beside it
        assert!(place(&mut state, &Unit3D::new("A", 5.0, 5.0, 2.0), &config));
        assert!(place(&mut state, &Unit3D::new("X", 5.0, 5.0, 2.0), &config));
        assert!(place(&mut state, &Unit3D::new("E", 4.0, 4.0, 1.0), &config));
        assert_eq!(state.committed()[1].position, Vector3::new(0.0, 0.0, 2.0));
        assert_eq!(state.committed()[2].position, Vector3::new(5.0, 0.0, 0.0));

        // The floor slot beside the tower is blocked by the plinth, so the
        // next candidate comes from the tower's upper level and settles
        // down onto the plinth top.
        assert!(place(&mut state, &Unit3D::new("D", 4.0, 4.0, 2.0), &config));
        assert_eq!(state.committed()[3].position, Vector3::new(5.0, 0.0, 1.0));
    }

    #[test]
    fn test_no_settle_when_gravity_disabled() {
        let container = Container3D::new("C1", 9.0, 5.0, 10.0);
        let config = Config::default().with_gravity(false);
        let mut state = LoadState::new(&container, 0);

        assert!(place(&mut state, &Unit3D::new("A", 5.0, 5.0, 2.0), &config));
        assert!(place(&mut state, &Unit3D::new("X", 5.0, 5.0, 2.0), &config));
        assert!(place(&mut state, &Unit3D::new("E", 4.0, 4.0, 1.0), &config));

        // Same setup as the settling test, but the elevated pivot is kept
        assert!(place(&mut state, &Unit3D::new("D", 4.0, 4.0, 2.0), &config));
        assert_eq!(state.committed()[3].position, Vector3::new(5.0, 0.0, 2.0));
    }

    #[test]
    fn test_corner_reservations_block_and_seed_pivots() {
        let container = Container3D::new("C1", 10.0, 10.0, 10.0).with_corner_size(2.0);
        let config = Config::default();
        let mut state = LoadState::new(&container, 0);

        // 8 reservations, 3 pivots each
        assert_eq!(state.pivots().len(), 24);

        let unit = Unit3D::new("U", 3.0, 3.0, 3.0);
        assert!(place(&mut state, &unit, &config));

        // The origin corner is reserved; the first viable pivot sits on its
        // far x face.
        let placed = &state.committed()[0];
        assert_eq!(placed.position, Vector3::new(2.0, 0.0, 0.0));
        for region in container.corner_regions() {
            assert!(!placed.aabb().overlaps(&region, EPS));
        }
    }

    #[test]
    fn test_flip_restriction_rejects_tall_unit() {
        let container = Container3D::new("C1", 5.0, 5.0, 3.0);
        let config = Config::default();

        // Upright the vertical extent stays 4 > 3; tipping exposes 2
        let tall = Unit3D::new("tall", 2.0, 2.0, 4.0).with_flip(false);
        let mut state = LoadState::new(&container, 0);
        assert!(!place(&mut state, &tall, &config));
        assert_eq!(state.unfitted().len(), 1);

        let tippable = Unit3D::new("tall", 2.0, 2.0, 4.0);
        let mut state = LoadState::new(&container, 0);
        assert!(place(&mut state, &tippable, &config));
        let placed = &state.committed()[0];
        assert!(placed.dimensions.z <= 3.0);
        assert_ne!(placed.orientation, 0);
    }

    #[test]
    fn test_stability_rejects_overhang() {
        let container = Container3D::new("C1", 8.0, 8.0, 10.0);
        let config = Config::default()
            .with_stability(true)
            .with_support_ratio(0.5);
        let mut state = LoadState::new(&container, 0);

        // 2x2 pedestal fills nothing like the 8x8 top's footprint
        assert!(place(
            &mut state,
            &Unit3D::new("pedestal", 2.0, 2.0, 2.0),
            &config
        ));

        // The only pivots leading on top of the pedestal give ratio
        // 4/64; floor pivots collide or run out of bounds.
        let top = Unit3D::new("top", 8.0, 8.0, 2.0).with_flip(false);
        assert!(!state.try_place(&top, 0, &config));
    }

    #[test]
    fn test_rollback_restores_state() {
        let container = Container3D::new("C1", 10.0, 10.0, 10.0).with_max_weight(100.0);
        let config = Config::default();
        let mut state = LoadState::new(&container, 0);

        assert!(place(
            &mut state,
            &Unit3D::new("A", 5.0, 5.0, 5.0).with_weight(10.0),
            &config
        ));
        let checkpoint = state.checkpoint();

        assert!(place(
            &mut state,
            &Unit3D::new("B", 5.0, 5.0, 5.0).with_weight(20.0),
            &config
        ));
        assert!(place(
            &mut state,
            &Unit3D::new("C", 5.0, 5.0, 2.0).with_weight(5.0),
            &config
        ));
        assert_eq!(state.committed().len(), 3);
        assert_relative_eq!(state.placed_weight(), 35.0);

        state.rollback_to(checkpoint);
        assert_eq!(state.committed().len(), 1);
        assert_relative_eq!(state.placed_weight(), 10.0);

        // The freed space accepts placements again, at the same position
        assert!(place(
            &mut state,
            &Unit3D::new("B2", 5.0, 5.0, 5.0).with_weight(20.0),
            &config
        ));
        assert_eq!(state.committed()[1].position, Vector3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_into_result() {
        let container = Container3D::new("C1", 10.0, 10.0, 10.0).with_put_order(3);
        let config = Config::default();
        let mut state = LoadState::new(&container, 1);

        assert!(place(
            &mut state,
            &Unit3D::new("A", 5.0, 5.0, 5.0).with_weight(2.0),
            &config
        ));
        assert!(!place(
            &mut state,
            &Unit3D::new("B", 11.0, 1.0, 1.0),
            &config
        ));

        let result = state.into_result();
        assert_eq!(result.index, 1);
        assert_eq!(result.container_id, "C1");
        assert_eq!(result.put_order, 3);
        assert_eq!(result.placements.len(), 1);
        assert_eq!(result.placements[0].container_index, 1);
        assert_eq!(result.unfitted.len(), 1);
        assert_relative_eq!(result.placed_volume, 125.0);
        assert_relative_eq!(result.placed_weight, 2.0);
        assert_relative_eq!(result.utilization, 0.125);
    }
}
