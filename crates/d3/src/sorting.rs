//! Processing order for units and containers.

use crate::container::Container3D;
use crate::unit::Unit3D;
use std::cmp::Ordering;
use u_stow_core::geometry::{Container, Unit};

/// Instance information mapping expanded instances to source units.
///
/// When a unit has quantity > 1, it expands into multiple instances. This
/// struct tracks which unit each instance belongs to and its ordinal within
/// that unit's quantity.
#[derive(Debug, Clone, Copy)]
pub struct InstanceInfo {
    /// Index into the units array.
    pub unit_idx: usize,
    /// Instance number within this unit's quantity.
    pub instance_num: usize,
}

/// Builds the instance mapping from units.
pub fn build_instances(units: &[Unit3D]) -> Vec<InstanceInfo> {
    let mut instances = Vec::new();
    for (unit_idx, unit) in units.iter().enumerate() {
        for instance_num in 0..unit.quantity() {
            instances.push(InstanceInfo {
                unit_idx,
                instance_num,
            });
        }
    }
    instances
}

/// Compares two units with the composite packing-order key: priority level
/// ascending, then load-bearing capacity descending, then volume
/// (descending when `larger_first`, ascending otherwise).
pub fn compare_units(a: &Unit3D, b: &Unit3D, larger_first: bool) -> Ordering {
    let level = a.level().cmp(&b.level());
    if level != Ordering::Equal {
        return level;
    }

    let load = b
        .load_capacity()
        .partial_cmp(&a.load_capacity())
        .unwrap_or(Ordering::Equal);
    if load != Ordering::Equal {
        return load;
    }

    let (va, vb) = (a.measure(), b.measure());
    if larger_first {
        vb.partial_cmp(&va).unwrap_or(Ordering::Equal)
    } else {
        va.partial_cmp(&vb).unwrap_or(Ordering::Equal)
    }
}

/// Orders the expanded instances for packing. The sort is stable, so equal
/// keys preserve input order.
pub fn sort_instances(units: &[Unit3D], instances: &mut [InstanceInfo], larger_first: bool) {
    instances.sort_by(|a, b| compare_units(&units[a.unit_idx], &units[b.unit_idx], larger_first));
}

/// Returns container indices ordered by volume under the same
/// `larger_first` flag. Stable, so equal volumes preserve input order.
pub fn sort_containers(containers: &[Container3D], larger_first: bool) -> Vec<usize> {
    let mut order: Vec<usize> = (0..containers.len()).collect();
    order.sort_by(|&a, &b| {
        let (ma, mb) = (containers[a].measure(), containers[b].measure());
        let cmp = if larger_first {
            mb.partial_cmp(&ma)
        } else {
            ma.partial_cmp(&mb)
        };
        cmp.unwrap_or(Ordering::Equal)
    });
    order
}
