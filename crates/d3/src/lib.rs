//! # U-Stow 3D
//!
//! Constrained 3D bin packing for the U-Stow loading engine.
//!
//! This crate packs cuboid and cylindrical units into containers with
//! rotation search, gravity settling, stability checking, weight capacities,
//! binding groups and multi-container distribution.

pub mod container;
pub mod engine;
pub mod packer;
pub mod sorting;
pub mod support;
pub mod unit;

// Re-exports
pub use container::Container3D;
pub use packer::Packer3D;
pub use unit::{Shape, Unit3D};
pub use u_stow_core::{Config, DistributionMode, Error, Placement, Result, SolveResult, Solver};
