//! 3D container types.

use nalgebra::Vector3;
use u_stow_core::aabb::Aabb3;
use u_stow_core::geometry::Container;
use u_stow_core::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A 3D container for bin packing.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Container3D {
    /// Unique identifier.
    id: String,

    /// Internal dimensions (width, depth, height).
    dimensions: Vector3<f64>,

    /// Maximum total weight allowed.
    max_weight: f64,

    /// Side length of the cube reserved at each of the 8 corners.
    corner_size: f64,

    /// Fill priority tag. Affects only output ordering, never fit.
    put_order: usize,
}

impl Container3D {
    /// Creates a new container with the given ID and internal dimensions.
    pub fn new(id: impl Into<String>, width: f64, depth: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            dimensions: Vector3::new(width, depth, height),
            max_weight: f64::INFINITY,
            corner_size: 0.0,
            put_order: 0,
        }
    }

    /// Sets the maximum allowed total weight.
    pub fn with_max_weight(mut self, weight: f64) -> Self {
        self.max_weight = weight;
        self
    }

    /// Sets the corner reservation size.
    pub fn with_corner_size(mut self, size: f64) -> Self {
        self.corner_size = size;
        self
    }

    /// Sets the fill priority tag.
    pub fn with_put_order(mut self, order: usize) -> Self {
        self.put_order = order;
        self
    }

    /// Returns the internal dimensions (width, depth, height).
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

    /// Returns the maximum allowed total weight.
    pub fn max_weight(&self) -> f64 {
        self.max_weight
    }

    /// Returns the corner reservation size.
    pub fn corner_size(&self) -> f64 {
        self.corner_size
    }

    /// Returns the fill priority tag.
    pub fn put_order(&self) -> usize {
        self.put_order
    }

    /// Returns the reserved cube at each of the 8 corners.
    /// Empty when no corner reservation is configured.
    pub fn corner_regions(&self) -> Vec<Aabb3<f64>> {
        if self.corner_size <= 0.0 {
            return Vec::new();
        }

        let c = self.corner_size;
        let (w, d, h) = (self.dimensions.x, self.dimensions.y, self.dimensions.z);
        let mut regions = Vec::with_capacity(8);
        for &z in &[0.0, h - c] {
            for &y in &[0.0, d - c] {
                for &x in &[0.0, w - c] {
                    regions.push(Aabb3::new(x, y, z, x + c, y + c, z + c));
                }
            }
        }
        regions
    }
}

impl Container for Container3D {
    type Scalar = f64;

    fn id(&self) -> &str {
        &self.id
    }

    fn measure(&self) -> f64 {
        self.dimensions.x * self.dimensions.y * self.dimensions.z
    }

    fn validate(&self) -> Result<()> {
        if self.dimensions.x <= 0.0 || self.dimensions.y <= 0.0 || self.dimensions.z <= 0.0 {
            return Err(Error::InvalidContainer(format!(
                "All dimensions for '{}' must be positive",
                self.id
            )));
        }

        if self.max_weight <= 0.0 {
            return Err(Error::InvalidContainer(format!(
                "Maximum weight for '{}' must be positive",
                self.id
            )));
        }

        if self.corner_size < 0.0 {
            return Err(Error::InvalidContainer(format!(
                "Corner size for '{}' cannot be negative",
                self.id
            )));
        }

        Ok(())
    }

    fn contains_point(&self, point: &Vector3<f64>) -> bool {
        point.x >= 0.0
            && point.x <= self.dimensions.x
            && point.y >= 0.0
            && point.y <= self.dimensions.y
            && point.z >= 0.0
            && point.z <= self.dimensions.z
    }
}
