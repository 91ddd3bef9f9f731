//! # U-Stow
//!
//! Constrained 3D container loading engine.
//!
//! This crate packs cuboid and cylindrical units into containers while
//! honoring:
//! - **Gravity**: units settle downward onto the floor or other units
//! - **Stability**: support-ratio and corner checks for elevated units
//! - **Weight**: per-container weight capacity
//! - **Bindings**: groups of units that must share a container
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use u_stow::d3::{Container3D, Packer3D, Unit3D};
//! use u_stow::{Config, Solver};
//!
//! // Describe the cargo and the container
//! let units = vec![Unit3D::new("box", 30.0, 20.0, 15.0).with_quantity(4)];
//! let containers = vec![Container3D::new("C1", 120.0, 80.0, 90.0)];
//!
//! // Solve
//! let packer = Packer3D::new(Config::default());
//! let result = packer.solve(&units, &containers)?;
//! ```
//!
//! ## Feature Flags
//!
//! - `d3` (default): 3D packing engine
//! - `serde`: Serialization support

/// Core traits and abstractions.
pub use u_stow_core as core;

/// Constrained 3D packing engine.
#[cfg(feature = "d3")]
pub use u_stow_d3 as d3;

// Re-export commonly used types at root level
pub use u_stow_core::{Config, DistributionMode, Placement, SolveResult, Solver};
