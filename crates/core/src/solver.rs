//! Solver traits and configuration.

use crate::error::Error;
use crate::geometry::{Container, Unit};
use crate::result::SolveResult;
use crate::Result;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Multi-container distribution mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DistributionMode {
    /// Containers are filled in sequence; units rejected by one container
    /// spill over to the next.
    #[default]
    Spillover,
    /// Every container independently tries the full unit list, for
    /// comparing how each container would fare on its own.
    IndependentTrial,
}

impl DistributionMode {
    /// Returns a stable lowercase name for reporting.
    pub fn as_str(&self) -> &'static str {
        match self {
            DistributionMode::Spillover => "spillover",
            DistributionMode::IndependentTrial => "independent_trial",
        }
    }
}

/// Common configuration for packing solvers.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Multi-container distribution mode.
    pub mode: DistributionMode,

    /// Sort units by descending volume within each priority level.
    /// When false, ascending volume (small units first).
    pub larger_first: bool,

    /// Settle each unit downward onto the highest surface below it.
    pub gravity: bool,

    /// Require placements to rest on sufficiently supported footprints.
    pub stability: bool,

    /// Minimum supported footprint fraction (0.0 - 1.0) when `stability`
    /// is enabled.
    pub support_ratio: f64,

    /// Lists of unit group names whose members must share a container.
    /// Each list is placed atomically: all member instances or none.
    pub bindings: Vec<Vec<String>>,

    /// Maximum computation time in milliseconds (0 = unlimited).
    pub time_limit_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: DistributionMode::default(),
            larger_first: true,
            gravity: true,
            stability: false,
            support_ratio: 0.75,
            bindings: Vec::new(),
            time_limit_ms: 0,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the distribution mode.
    pub fn with_mode(mut self, mode: DistributionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets whether larger units are packed first.
    pub fn with_larger_first(mut self, larger_first: bool) -> Self {
        self.larger_first = larger_first;
        self
    }

    /// Enables or disables gravity settling.
    pub fn with_gravity(mut self, gravity: bool) -> Self {
        self.gravity = gravity;
        self
    }

    /// Enables or disables the stability requirement.
    pub fn with_stability(mut self, stability: bool) -> Self {
        self.stability = stability;
        self
    }

    /// Sets the minimum supported footprint fraction.
    pub fn with_support_ratio(mut self, ratio: f64) -> Self {
        self.support_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Adds a list of group names that must share a container.
    pub fn with_binding(mut self, groups: Vec<String>) -> Self {
        self.bindings.push(groups);
        self
    }

    /// Sets the time limit in milliseconds.
    pub fn with_time_limit(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.support_ratio <= 0.0 || self.support_ratio > 1.0 {
            return Err(Error::ConfigError(format!(
                "support_ratio must be in (0, 1], got {}",
                self.support_ratio
            )));
        }
        for (i, group) in self.bindings.iter().enumerate() {
            if group.is_empty() {
                return Err(Error::ConfigError(format!(
                    "binding group {} is empty",
                    i
                )));
            }
        }
        Ok(())
    }
}

/// Progress callback for long-running operations.
pub type ProgressCallback = Box<dyn Fn(ProgressInfo) + Send + Sync>;

/// Progress information during solving.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// Placement attempts made so far. A unit offered to several
    /// containers counts once per container.
    pub processed: usize,
    /// Upper bound on placement attempts for this solve.
    pub total: usize,
    /// Unit instances placed so far.
    pub placed: usize,
    /// Current overall utilization.
    pub utilization: f64,
    /// Elapsed time in milliseconds.
    pub elapsed_ms: u64,
    /// Whether the solver is still running.
    pub running: bool,
}

/// Trait for packing solvers.
pub trait Solver {
    /// The unit type this solver packs.
    type Unit: Unit;
    /// The container type this solver fills.
    type Container: Container;
    /// The scalar type for coordinates.
    type Scalar: nalgebra::Scalar;

    /// Solves the packing problem.
    fn solve(
        &self,
        units: &[Self::Unit],
        containers: &[Self::Container],
    ) -> Result<SolveResult<Self::Scalar>>;

    /// Solves with a progress callback.
    fn solve_with_progress(
        &self,
        units: &[Self::Unit],
        containers: &[Self::Container],
        callback: ProgressCallback,
    ) -> Result<SolveResult<Self::Scalar>>;

    /// Cancels an ongoing solve operation.
    fn cancel(&self);
}
