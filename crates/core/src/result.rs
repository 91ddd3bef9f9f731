//! Solve result representation.

use crate::geometry::UnitId;
use crate::placement::{Placement, PlacementStats};
use nalgebra::Scalar;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A unit instance that could not be placed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnfittedUnit {
    /// ID of the rejected unit.
    pub unit_id: UnitId,
    /// Instance index (0-based) when multiple copies were requested.
    pub instance: usize,
    /// Coarse diagnostic label, one of "no viable position", "exceeds
    /// remaining weight capacity", or "binding group incomplete". The
    /// placement outcome itself is defined by list membership alone;
    /// individual pivot/orientation failures are never surfaced.
    pub reason: String,
}

impl UnfittedUnit {
    pub fn new(unit_id: impl Into<UnitId>, instance: usize, reason: impl Into<String>) -> Self {
        Self {
            unit_id: unit_id.into(),
            instance,
            reason: reason.into(),
        }
    }
}

/// Outcome for a single container.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContainerResult<S: Scalar> {
    /// Index of the container in the input list.
    pub index: usize,

    /// ID of the container.
    pub container_id: String,

    /// Output ordering tag carried over from the container definition.
    pub put_order: usize,

    /// Units committed to this container, in commit order.
    pub placements: Vec<Placement<S>>,

    /// Units this container rejected during its own trial.
    ///
    /// Under spillover distribution a rejected unit moves on to the next
    /// container, so only the last container's list equals the global one.
    pub unfitted: Vec<UnfittedUnit>,

    /// Total volume of the committed units.
    pub placed_volume: f64,

    /// Total weight of the committed units.
    pub placed_weight: f64,

    /// Volume utilization ratio (0.0 - 1.0) for this container.
    pub utilization: f64,
}

impl<S: Scalar> ContainerResult<S> {
    /// Returns true if no unit was committed to this container.
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Returns the number of committed units.
    pub fn placed_count(&self) -> usize {
        self.placements.len()
    }

    /// Returns utilization as a percentage string.
    pub fn utilization_percent(&self) -> String {
        format!("{:.1}%", self.utilization * 100.0)
    }
}

/// Result of a packing solve operation.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolveResult<S: Scalar> {
    /// Per-container outcomes, ordered by put order tag, then input index.
    pub containers: Vec<ContainerResult<S>>,

    /// Unit instances not placed in any container.
    pub unfitted: Vec<UnfittedUnit>,

    /// Number of containers holding at least one unit.
    pub containers_used: usize,

    /// Overall utilization ratio (0.0 - 1.0).
    /// Calculated as: total_placed_volume / total_container_volume
    pub utilization: f64,

    /// Computation time in milliseconds.
    pub computation_time_ms: u64,

    /// Distribution mode used for solving.
    pub mode: String,

    /// Whether the solve was cancelled early.
    pub cancelled: bool,
}

impl<S: Scalar> SolveResult<S> {
    /// Creates a new empty result.
    pub fn new() -> Self {
        Self {
            containers: Vec::new(),
            unfitted: Vec::new(),
            containers_used: 0,
            utilization: 0.0,
            computation_time_ms: 0,
            mode: String::new(),
            cancelled: false,
        }
    }

    /// Returns true if all requested unit instances were placed.
    pub fn all_placed(&self) -> bool {
        self.unfitted.is_empty()
    }

    /// Returns the total number of placed unit instances.
    pub fn placed_count(&self) -> usize {
        self.containers.iter().map(|c| c.placements.len()).sum()
    }

    /// Returns the number of unfitted unit instances.
    pub fn unfitted_count(&self) -> usize {
        self.unfitted.len()
    }

    /// Returns true if the solve was successful (at least one placement).
    pub fn is_successful(&self) -> bool {
        self.containers.iter().any(|c| !c.placements.is_empty())
    }

    /// Returns true if the solve completed within the time limit.
    pub fn completed_normally(&self) -> bool {
        !self.cancelled
    }

    /// Iterates over all placements across all containers.
    pub fn placements(&self) -> impl Iterator<Item = &Placement<S>> {
        self.containers.iter().flat_map(|c| c.placements.iter())
    }

    /// Returns the outcome for a container by its ID, if present.
    pub fn container(&self, container_id: &str) -> Option<&ContainerResult<S>> {
        self.containers.iter().find(|c| c.container_id == container_id)
    }

    /// Removes duplicate entries from the unfitted list.
    /// Useful when multiple trials rejected the same unit instance.
    pub fn deduplicate_unfitted(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.unfitted
            .retain(|u| seen.insert((u.unit_id.clone(), u.instance)));
    }

    /// Computes placement statistics across all containers.
    pub fn placement_stats(&self) -> PlacementStats {
        let all: Vec<Placement<S>> = self.placements().cloned().collect();
        PlacementStats::from_placements(&all)
    }

    /// Returns utilization as a percentage string.
    pub fn utilization_percent(&self) -> String {
        format!("{:.1}%", self.utilization * 100.0)
    }
}

impl<S: Scalar> Default for SolveResult<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary statistics for a solve result.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolveSummary {
    /// Total unit instances requested.
    pub total_requested: usize,
    /// Total unit instances placed.
    pub total_placed: usize,
    /// Utilization percentage.
    pub utilization_percent: f64,
    /// Number of containers used.
    pub containers_used: usize,
    /// Computation time in milliseconds.
    pub time_ms: u64,
    /// Distribution mode used.
    pub mode: String,
}

impl<S: Scalar> From<&SolveResult<S>> for SolveSummary {
    fn from(result: &SolveResult<S>) -> Self {
        Self {
            total_requested: result.placed_count() + result.unfitted.len(),
            total_placed: result.placed_count(),
            utilization_percent: result.utilization * 100.0,
            containers_used: result.containers_used,
            time_ms: result.computation_time_ms,
            mode: result.mode.clone(),
        }
    }
}
