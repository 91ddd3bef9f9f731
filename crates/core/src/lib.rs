//! # U-Stow Core
//!
//! Core traits and abstractions for the U-Stow constrained bin packing engine.
//!
//! This crate provides the foundational types and traits that are shared by
//! the dimension-specific packing modules.
//!
//! ## Core Components
//!
//! - **Geometry traits**: `Unit`, `Container`
//! - **Solver trait**: Common interface for packing solvers
//! - **Axis-aligned boxes**: `Aabb3` with strict/closed overlap predicates
//! - **Results**: `Placement`, `ContainerResult`, `SolveResult`
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod aabb;
pub mod error;
pub mod geometry;
pub mod placement;
pub mod result;
pub mod solver;

// Re-exports
pub use aabb::Aabb3;
pub use error::{Error, Result};
pub use geometry::{Container, Unit, UnitId};
pub use placement::{Placement, PlacementStats};
pub use result::{ContainerResult, SolveResult, SolveSummary, UnfittedUnit};
pub use solver::{Config, DistributionMode, ProgressCallback, ProgressInfo, Solver};
