//! Axis-aligned box primitives.
//!
//! Every shape the engine reasons about (candidate placements, committed
//! boxes, reserved corner regions, the container interior itself) is an
//! axis-aligned box, so this is the entire geometric vocabulary of the
//! solver.

use nalgebra::{RealField, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in 3D.
///
/// Axes follow the engine convention: x = width, y = depth, z = height,
/// with z vertical.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb3<S> {
    /// Minimum x coordinate.
    pub min_x: S,
    /// Minimum y coordinate.
    pub min_y: S,
    /// Minimum z coordinate.
    pub min_z: S,
    /// Maximum x coordinate.
    pub max_x: S,
    /// Maximum y coordinate.
    pub max_y: S,
    /// Maximum z coordinate.
    pub max_z: S,
}

impl<S: RealField + Copy> Aabb3<S> {
    /// Creates a new box from min/max coordinates.
    pub fn new(min_x: S, min_y: S, min_z: S, max_x: S, max_y: S, max_z: S) -> Self {
        Self {
            min_x,
            min_y,
            min_z,
            max_x,
            max_y,
            max_z,
        }
    }

    /// Creates a box from a min corner and extents.
    pub fn from_position_dims(position: &Vector3<S>, dims: &Vector3<S>) -> Self {
        Self {
            min_x: position.x,
            min_y: position.y,
            min_z: position.z,
            max_x: position.x + dims.x,
            max_y: position.y + dims.y,
            max_z: position.z + dims.z,
        }
    }

    /// Returns the width (x extent).
    pub fn width(&self) -> S {
        self.max_x - self.min_x
    }

    /// Returns the depth (y extent).
    pub fn depth(&self) -> S {
        self.max_y - self.min_y
    }

    /// Returns the height (z extent).
    pub fn height(&self) -> S {
        self.max_z - self.min_z
    }

    /// Returns the volume.
    pub fn volume(&self) -> S {
        self.width() * self.depth() * self.height()
    }

    /// Returns the area of the base rectangle.
    pub fn footprint_area(&self) -> S {
        self.width() * self.depth()
    }

    /// Checks if this box contains a point (closed bounds).
    pub fn contains_point(&self, x: S, y: S, z: S) -> bool {
        x >= self.min_x
            && x <= self.max_x
            && y >= self.min_y
            && y <= self.max_y
            && z >= self.min_z
            && z <= self.max_z
    }

    /// Checks if this box intersects another with closed bounds, so boxes
    /// that merely share a face are reported as intersecting.
    pub fn intersects(&self, other: &Self) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
            && self.min_z <= other.max_z
            && self.max_z >= other.min_z
    }

    /// Checks if this box strictly overlaps another on all three axes.
    ///
    /// Touching faces (zero-width overlap, within `eps`) do not count. This
    /// is the collision predicate: placements may share faces but never
    /// interpenetrate.
    pub fn overlaps(&self, other: &Self, eps: S) -> bool {
        let no_overlap_x = self.min_x >= other.max_x - eps || other.min_x >= self.max_x - eps;
        let no_overlap_y = self.min_y >= other.max_y - eps || other.min_y >= self.max_y - eps;
        let no_overlap_z = self.min_z >= other.max_z - eps || other.min_z >= self.max_z - eps;

        !(no_overlap_x || no_overlap_y || no_overlap_z)
    }

    /// Checks if `other` lies entirely within this box, with `eps` slack on
    /// every face.
    pub fn contains_box(&self, other: &Self, eps: S) -> bool {
        other.min_x >= self.min_x - eps
            && other.max_x <= self.max_x + eps
            && other.min_y >= self.min_y - eps
            && other.max_y <= self.max_y + eps
            && other.min_z >= self.min_z - eps
            && other.max_z <= self.max_z + eps
    }

    /// Returns the overlap area of the two boxes' base rectangles in the
    /// x,y plane, zero when they do not overlap.
    pub fn footprint_overlap_area(&self, other: &Self) -> S {
        let x_overlap = (self.max_x.min(other.max_x) - self.min_x.max(other.min_x)).max(S::zero());
        let y_overlap = (self.max_y.min(other.max_y) - self.min_y.max(other.min_y)).max(S::zero());
        x_overlap * y_overlap
    }

    /// Checks if the point (x, y) lies within the base rectangle (closed
    /// bounds with `eps` slack).
    pub fn footprint_contains(&self, x: S, y: S, eps: S) -> bool {
        x >= self.min_x - eps && x <= self.max_x + eps && y >= self.min_y - eps && y <= self.max_y + eps
    }
}
