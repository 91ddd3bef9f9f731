//! Core traits for placeable units and containers.

use crate::Result;
use nalgebra::{Scalar, Vector3};

/// Unique identifier for a unit.
pub type UnitId = String;

/// Trait for items that can be placed by a solver.
pub trait Unit {
    /// The scalar type for dimensions and weights.
    type Scalar: Scalar;

    /// Returns the unique identifier.
    fn id(&self) -> &UnitId;

    /// Returns the number of copies to place.
    fn quantity(&self) -> usize;

    /// Returns the volume of the unit's bounding box.
    fn measure(&self) -> Self::Scalar;

    /// Returns the weight of one instance.
    fn weight(&self) -> Self::Scalar;

    /// Validates the unit definition.
    fn validate(&self) -> Result<()>;
}

/// Trait for spaces that units are placed into.
pub trait Container {
    /// The scalar type for dimensions and weights.
    type Scalar: Scalar;

    /// Returns the unique identifier.
    fn id(&self) -> &str;

    /// Returns the internal volume.
    fn measure(&self) -> Self::Scalar;

    /// Validates the container definition.
    fn validate(&self) -> Result<()>;

    /// Returns true if the point lies within the internal bounds.
    fn contains_point(&self, point: &Vector3<Self::Scalar>) -> bool;
}
