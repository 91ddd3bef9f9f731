//! Placement representation for committed units.

use crate::aabb::Aabb3;
use crate::geometry::UnitId;
use nalgebra::{RealField, Scalar, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A committed placement of one unit instance inside a container.
///
/// The placement records the unit by value at commit time: `dimensions` is
/// the oriented extent actually occupied, which together with `position`
/// fully describes the box independent of the caller's unit object.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placement<S: Scalar> {
    /// The ID of the placed unit.
    pub unit_id: UnitId,

    /// Instance index (0-based) when multiple copies exist.
    pub instance: usize,

    /// Min-corner position inside the container.
    pub position: Vector3<S>,

    /// Oriented dimensions (width, depth, height after rotation).
    pub dimensions: Vector3<S>,

    /// Index into the unit's allowed-orientation set.
    pub orientation: usize,

    /// Index of the container this unit is placed in.
    pub container_index: usize,
}

impl<S: Scalar + Copy> Placement<S> {
    /// Creates a new placement in container 0.
    pub fn new(
        unit_id: impl Into<UnitId>,
        instance: usize,
        position: Vector3<S>,
        dimensions: Vector3<S>,
        orientation: usize,
    ) -> Self {
        Self {
            unit_id: unit_id.into(),
            instance,
            position,
            dimensions,
            orientation,
            container_index: 0,
        }
    }

    /// Sets the container index.
    pub fn with_container(mut self, index: usize) -> Self {
        self.container_index = index;
        self
    }

    /// Returns the x coordinate.
    pub fn x(&self) -> S {
        self.position.x
    }

    /// Returns the y coordinate.
    pub fn y(&self) -> S {
        self.position.y
    }

    /// Returns the z coordinate.
    pub fn z(&self) -> S {
        self.position.z
    }
}

impl<S: RealField + Copy> Placement<S> {
    /// Returns the max corner of the occupied box.
    pub fn max_corner(&self) -> Vector3<S> {
        self.position + self.dimensions
    }

    /// Returns the occupied volume.
    pub fn volume(&self) -> S {
        self.dimensions.x * self.dimensions.y * self.dimensions.z
    }

    /// Returns the occupied box.
    pub fn aabb(&self) -> Aabb3<S> {
        Aabb3::from_position_dims(&self.position, &self.dimensions)
    }
}

/// Placement statistics for a set of placements.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacementStats {
    /// Total number of placements.
    pub count: usize,
    /// Distribution of orientation indices used.
    pub orientation_distribution: std::collections::HashMap<usize, usize>,
    /// Distribution of placements per container.
    pub container_distribution: std::collections::HashMap<usize, usize>,
}

impl PlacementStats {
    /// Computes statistics from a set of placements.
    pub fn from_placements<S: Scalar>(placements: &[Placement<S>]) -> Self {
        let mut stats = Self {
            count: placements.len(),
            ..Default::default()
        };

        for p in placements {
            *stats
                .orientation_distribution
                .entry(p.orientation)
                .or_insert(0) += 1;
            *stats
                .container_distribution
                .entry(p.container_index)
                .or_insert(0) += 1;
        }

        stats
    }
}
