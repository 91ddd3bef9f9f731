//! Constrained 3D bin packing solver.

use crate::container::Container3D;
use crate::engine::LoadState;
use crate::sorting::{self, InstanceInfo};
use crate::unit::Unit3D;
use u_stow_core::geometry::{Container, Unit};
use u_stow_core::result::{ContainerResult, UnfittedUnit};
use u_stow_core::solver::{Config, DistributionMode, ProgressCallback, ProgressInfo, Solver};
use u_stow_core::{Result, SolveResult};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Constrained 3D bin packing solver.
///
/// Packs units into containers with pivot-candidate search, rotation
/// enumeration, gravity settling, optional stability checking, weight
/// capacities and binding groups, under a spillover or independent-trial
/// distribution across containers.
pub struct Packer3D {
    config: Config,
    cancelled: Arc<AtomicBool>,
}

/// Bookkeeping shared by all container trials of one solve call.
struct PassContext<'a> {
    start: Instant,
    deadline: Option<Instant>,
    cancelled: &'a AtomicBool,
    callback: Option<&'a ProgressCallback>,
    processed: usize,
    total: usize,
    placed: usize,
    placed_volume: f64,
    total_capacity: f64,
    truncated: bool,
}

impl PassContext<'_> {
    /// Samples the cancellation flag and the deadline. Once either has
    /// triggered the pass stays truncated.
    fn should_stop(&mut self) -> bool {
        if self.truncated {
            return true;
        }
        if self.cancelled.load(Ordering::Relaxed) {
            self.truncated = true;
            return true;
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                self.truncated = true;
                return true;
            }
        }
        false
    }

    fn report(&self) {
        if let Some(cb) = self.callback {
            let utilization = if self.total_capacity > 0.0 {
                self.placed_volume / self.total_capacity
            } else {
                0.0
            };
            cb(ProgressInfo {
                processed: self.processed,
                total: self.total,
                placed: self.placed,
                utilization,
                elapsed_ms: self.start.elapsed().as_millis() as u64,
                running: true,
            });
        }
    }
}

impl Packer3D {
    /// Creates a new packer with the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Creates a packer with default configuration.
    pub fn default_config() -> Self {
        Self::new(Config::default())
    }

    /// Offers the pending instances to one container.
    ///
    /// Returns the container's final state and a mask marking which pending
    /// instances were committed. Binding batches run at the sorted position
    /// of their earliest member; later members are consumed with the batch
    /// and skipped when their own slots come up.
    fn fill_container(
        &self,
        container: &Container3D,
        container_index: usize,
        units: &[Unit3D],
        pending: &[InstanceInfo],
        batch_of: &[Option<usize>],
        ctx: &mut PassContext<'_>,
    ) -> (LoadState, Vec<bool>) {
        let mut state = LoadState::new(container, container_index);
        let mut consumed = vec![false; pending.len()];
        let mut placed = vec![false; pending.len()];

        for i in 0..pending.len() {
            if consumed[i] {
                continue;
            }
            if ctx.should_stop() {
                break;
            }

            let info = pending[i];
            let unit = &units[info.unit_idx];

            match batch_of[info.unit_idx] {
                None => {
                    consumed[i] = true;
                    ctx.processed += 1;
                    if state.try_place(unit, info.instance_num, &self.config) {
                        placed[i] = true;
                        ctx.placed += 1;
                        ctx.placed_volume += unit.measure();
                    }
                    ctx.report();
                }
                Some(batch) => {
                    let members: Vec<usize> = (i..pending.len())
                        .filter(|&j| !consumed[j] && batch_of[pending[j].unit_idx] == Some(batch))
                        .collect();
                    for &j in &members {
                        consumed[j] = true;
                    }

                    let checkpoint = state.checkpoint();
                    let mut failed_at: Option<usize> = None;
                    let mut stopped = false;

                    for &j in &members {
                        if ctx.should_stop() {
                            stopped = true;
                            break;
                        }
                        let info = pending[j];
                        ctx.processed += 1;
                        let ok = state.try_place(&units[info.unit_idx], info.instance_num, &self.config);
                        ctx.report();
                        if !ok {
                            failed_at = Some(j);
                            break;
                        }
                    }

                    if stopped || failed_at.is_some() {
                        // All or nothing: undo the partial batch.
                        state.rollback_to(checkpoint);
                        if !stopped {
                            for &j in &members {
                                if failed_at == Some(j) {
                                    continue;
                                }
                                let info = pending[j];
                                state.record_unfitted(
                                    units[info.unit_idx].id().clone(),
                                    info.instance_num,
                                    "binding group incomplete",
                                );
                            }
                        }
                    } else {
                        for &j in &members {
                            placed[j] = true;
                            ctx.placed += 1;
                            ctx.placed_volume += units[pending[j].unit_idx].measure();
                        }
                    }
                }
            }
        }

        (state, placed)
    }

    fn solve_impl(
        &self,
        units: &[Unit3D],
        containers: &[Container3D],
        callback: Option<ProgressCallback>,
    ) -> Result<SolveResult<f64>> {
        let start = Instant::now();

        self.config.validate()?;
        for unit in units {
            unit.validate()?;
        }
        for container in containers {
            container.validate()?;
        }

        // Reset cancellation flag
        self.cancelled.store(false, Ordering::Relaxed);

        // Map each unit to the binding batch its group belongs to.
        let mut batch_of: Vec<Option<usize>> = vec![None; units.len()];
        for (batch, group_names) in self.config.bindings.iter().enumerate() {
            let mut matched = false;
            for (u, unit) in units.iter().enumerate() {
                if batch_of[u].is_none() && group_names.iter().any(|g| g == unit.group()) {
                    batch_of[u] = Some(batch);
                    matched = true;
                }
            }
            if !matched {
                log::warn!("binding group {:?} matches no units", group_names);
            }
        }

        let mut instances = sorting::build_instances(units);
        sorting::sort_instances(units, &mut instances, self.config.larger_first);
        let container_order = sorting::sort_containers(containers, self.config.larger_first);

        let total_capacity: f64 = containers.iter().map(|c| c.measure()).sum();
        // A limit too large to represent as an Instant is no limit at all
        let deadline = if self.config.time_limit_ms > 0 {
            start.checked_add(Duration::from_millis(self.config.time_limit_ms))
        } else {
            None
        };

        let mut ctx = PassContext {
            start,
            deadline,
            cancelled: self.cancelled.as_ref(),
            callback: callback.as_ref(),
            processed: 0,
            total: instances.len() * containers.len(),
            placed: 0,
            placed_volume: 0.0,
            total_capacity,
            truncated: false,
        };

        let mut trial_results: Vec<ContainerResult<f64>> = Vec::new();
        let mut last_trial: Option<usize> = None;

        match self.config.mode {
            DistributionMode::Spillover => {
                let mut pending = instances;
                for &ci in &container_order {
                    if ctx.truncated {
                        trial_results.push(LoadState::new(&containers[ci], ci).into_result());
                        continue;
                    }
                    let (state, placed_mask) =
                        self.fill_container(&containers[ci], ci, units, &pending, &batch_of, &mut ctx);
                    log::debug!(
                        "container '{}': {} placed, {} rejected",
                        containers[ci].id(),
                        state.committed().len(),
                        state.unfitted().len()
                    );
                    last_trial = Some(trial_results.len());
                    pending = pending
                        .iter()
                        .zip(placed_mask.iter())
                        .filter(|&(_, &was_placed)| !was_placed)
                        .map(|(info, _)| *info)
                        .collect();
                    trial_results.push(state.into_result());
                }
            }
            DistributionMode::IndependentTrial => {
                for &ci in &container_order {
                    if ctx.truncated {
                        trial_results.push(LoadState::new(&containers[ci], ci).into_result());
                        continue;
                    }
                    let (state, _) =
                        self.fill_container(&containers[ci], ci, units, &instances, &batch_of, &mut ctx);
                    log::debug!(
                        "container '{}': {} placed, {} rejected",
                        containers[ci].id(),
                        state.committed().len(),
                        state.unfitted().len()
                    );
                    last_trial = Some(trial_results.len());
                    trial_results.push(state.into_result());
                }
            }
        }

        // The last trial's rejections are the globally unfitted set: under
        // spillover everything it saw had already spilled through every
        // earlier container.
        let unfitted: Vec<UnfittedUnit> = last_trial
            .map(|i| trial_results[i].unfitted.clone())
            .unwrap_or_default();

        // Output order follows the fill priority tag, never the fill order.
        trial_results.sort_by_key(|c| (c.put_order, c.index));

        let placed_volume: f64 = trial_results.iter().map(|c| c.placed_volume).sum();
        let utilization = if total_capacity > 0.0 {
            placed_volume / total_capacity
        } else {
            0.0
        };
        let containers_used = trial_results
            .iter()
            .filter(|c| !c.placements.is_empty())
            .count();

        if ctx.truncated {
            log::warn!(
                "packing stopped early after {} of {} attempts",
                ctx.processed,
                ctx.total
            );
        }

        let result = SolveResult {
            containers: trial_results,
            unfitted,
            containers_used,
            utilization,
            computation_time_ms: start.elapsed().as_millis() as u64,
            mode: self.config.mode.as_str().to_string(),
            cancelled: ctx.truncated,
        };

        if let Some(cb) = &callback {
            cb(ProgressInfo {
                processed: ctx.processed,
                total: ctx.total,
                placed: ctx.placed,
                utilization: result.utilization,
                elapsed_ms: start.elapsed().as_millis() as u64,
                running: false,
            });
        }

        Ok(result)
    }
}

impl Solver for Packer3D {
    type Unit = Unit3D;
    type Container = Container3D;
    type Scalar = f64;

    fn solve(
        &self,
        units: &[Self::Unit],
        containers: &[Self::Container],
    ) -> Result<SolveResult<f64>> {
        self.solve_impl(units, containers, None)
    }

    fn solve_with_progress(
        &self,
        units: &[Self::Unit],
        containers: &[Self::Container],
        callback: ProgressCallback,
    ) -> Result<SolveResult<f64>> {
        self.solve_impl(units, containers, Some(callback))
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}
