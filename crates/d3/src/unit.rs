//! Packable 3D unit types.

use nalgebra::Vector3;
use u_stow_core::geometry::{Unit, UnitId};
use u_stow_core::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Physical form of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Shape {
    /// Rectangular box.
    #[default]
    Cuboid,
    /// Cylinder standing on its base, packed by its bounding box.
    /// Cylinders are never tipped onto their side.
    Cylinder,
}

/// A 3D unit that can be packed into a container.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Unit3D {
    /// Unique identifier.
    id: UnitId,

    /// Group/type name used for binding constraints.
    group: String,

    /// Dimensions (width, depth, height) in the unrotated frame.
    dimensions: Vector3<f64>,

    /// Number of copies to place.
    quantity: usize,

    /// Weight of one instance.
    weight: f64,

    /// Priority level; lower levels are packed earlier.
    level: i32,

    /// Load-bearing capacity: max weight that may rest on top.
    /// Higher capacity sorts earlier within a level.
    load_capacity: f64,

    /// Whether vertical reorientation (tipping) is allowed.
    flip: bool,

    /// Physical form.
    shape: Shape,

    /// Opaque display tag carried through to the output.
    tag: Option<String>,
}

impl Unit3D {
    /// Creates a new cuboid unit with the given ID and dimensions.
    pub fn new(id: impl Into<UnitId>, width: f64, depth: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            group: String::new(),
            dimensions: Vector3::new(width, depth, height),
            quantity: 1,
            weight: 0.0,
            level: 0,
            load_capacity: 0.0,
            flip: true,
            shape: Shape::default(),
            tag: None,
        }
    }

    /// Creates a cylinder unit from its bounding box.
    /// `width` and `depth` are the base diameters; `height` is the axis length.
    pub fn cylinder(id: impl Into<UnitId>, width: f64, depth: f64, height: f64) -> Self {
        Self::new(id, width, depth, height).with_shape(Shape::Cylinder)
    }

    /// Sets the group/type name.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    /// Sets the quantity to place.
    pub fn with_quantity(mut self, n: usize) -> Self {
        self.quantity = n;
        self
    }

    /// Sets the weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Sets the priority level (lower packs earlier).
    pub fn with_level(mut self, level: i32) -> Self {
        self.level = level;
        self
    }

    /// Sets the load-bearing capacity.
    pub fn with_load_capacity(mut self, capacity: f64) -> Self {
        self.load_capacity = capacity;
        self
    }

    /// Sets whether vertical reorientation is allowed.
    /// Ignored for cylinders, which always stand upright.
    pub fn with_flip(mut self, flip: bool) -> Self {
        self.flip = flip;
        self
    }

    /// Sets the physical form.
    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    /// Sets the display tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Returns the dimensions (width, depth, height).
    pub fn dimensions(&self) -> &Vector3<f64> {
        &self.dimensions
    }

    /// Returns the width.
    pub fn width(&self) -> f64 {
        self.dimensions.x
    }

    /// Returns the depth.
    pub fn depth(&self) -> f64 {
        self.dimensions.y
    }

    /// Returns the height.
    pub fn height(&self) -> f64 {
        self.dimensions.z
    }

    /// Returns the group/type name.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Returns the priority level.
    pub fn level(&self) -> i32 {
        self.level
    }

    /// Returns the load-bearing capacity.
    pub fn load_capacity(&self) -> f64 {
        self.load_capacity
    }

    /// Returns whether vertical reorientation is allowed.
    pub fn flip_allowed(&self) -> bool {
        self.flip && self.shape != Shape::Cylinder
    }

    /// Returns the physical form.
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Returns the display tag.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Returns the allowed orientations for this unit.
    /// Each orientation is (width_axis, depth_axis, height_axis).
    pub fn allowed_orientations(&self) -> Vec<(usize, usize, usize)> {
        if self.flip_allowed() {
            vec![
                (0, 1, 2), // Original
                (0, 2, 1), // Rotated 90° around X
                (1, 0, 2), // Rotated 90° around Z
                (1, 2, 0), // Rotated 90° around X then Z
                (2, 0, 1), // Rotated 90° around Y
                (2, 1, 0), // Rotated 90° around Y then X
            ]
        } else {
            // Upright only: original and 90° around Z.
            vec![(0, 1, 2), (1, 0, 2)]
        }
    }

    /// Returns dimensions for a given orientation index.
    pub fn dimensions_for_orientation(&self, orientation: usize) -> Vector3<f64> {
        let orientations = self.allowed_orientations();
        if orientation >= orientations.len() {
            return self.dimensions;
        }

        let (x_idx, y_idx, z_idx) = orientations[orientation];
        Vector3::new(
            self.dimensions[x_idx],
            self.dimensions[y_idx],
            self.dimensions[z_idx],
        )
    }
}

impl Unit for Unit3D {
    type Scalar = f64;

    fn id(&self) -> &UnitId {
        &self.id
    }

    fn quantity(&self) -> usize {
        self.quantity
    }

    fn measure(&self) -> f64 {
        self.dimensions.x * self.dimensions.y * self.dimensions.z
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn validate(&self) -> Result<()> {
        if self.dimensions.x <= 0.0 || self.dimensions.y <= 0.0 || self.dimensions.z <= 0.0 {
            return Err(Error::InvalidUnit(format!(
                "All dimensions for '{}' must be positive",
                self.id
            )));
        }

        if self.quantity == 0 {
            return Err(Error::InvalidUnit(format!(
                "Quantity for '{}' must be at least 1",
                self.id
            )));
        }

        if self.weight < 0.0 {
            return Err(Error::InvalidUnit(format!(
                "Weight for '{}' cannot be negative",
                self.id
            )));
        }

        if self.load_capacity < 0.0 {
            return Err(Error::InvalidUnit(format!(
                "Load capacity for '{}' cannot be negative",
                self.id
            )));
        }

        Ok(())
    }
}
