//! Gravity settling and stability evaluation.

use crate::engine::{Region, RegionKind, EPS};
use u_stow_core::aabb::Aabb3;

/// Tolerance for treating a top face as in contact with a base plane.
pub(crate) const CONTACT_EPS: f64 = 1e-6;

/// Returns the z the candidate box settles to: the highest top face at or
/// below the candidate's base among regions whose footprint strictly
/// overlaps the candidate's footprint. Reserved regions never support.
pub(crate) fn settle_z(occupied: &[Region], candidate: &Aabb3<f64>) -> f64 {
    let mut base = 0.0;
    for region in occupied {
        if region.kind == RegionKind::Reserved {
            continue;
        }
        let top = region.aabb.max_z;
        if top <= candidate.min_z + EPS && top > base && footprints_overlap(&region.aabb, candidate)
        {
            base = top;
        }
    }
    base
}

/// Returns the fraction of the candidate's base area resting on support
/// surfaces at its base z. Overlapping supports are not double-counted.
pub(crate) fn support_ratio(occupied: &[Region], candidate: &Aabb3<f64>) -> f64 {
    let footprint_area = candidate.footprint_area();
    if footprint_area <= 0.0 {
        return 1.0;
    }

    let rects = support_rects(occupied, candidate);
    union_area(&rects) / footprint_area
}

/// Returns true if all four corners of the candidate's base rectangle rest
/// on some support surface at its base z.
pub(crate) fn corners_supported(occupied: &[Region], candidate: &Aabb3<f64>) -> bool {
    let base = candidate.min_z;
    let corners = [
        (candidate.min_x, candidate.min_y),
        (candidate.max_x, candidate.min_y),
        (candidate.min_x, candidate.max_y),
        (candidate.max_x, candidate.max_y),
    ];

    corners.iter().all(|&(x, y)| {
        occupied.iter().any(|region| {
            region.kind != RegionKind::Reserved
                && (region.aabb.max_z - base).abs() <= CONTACT_EPS
                && region.aabb.footprint_contains(x, y, EPS)
        })
    })
}

/// Strict footprint overlap: touching edges do not count.
fn footprints_overlap(a: &Aabb3<f64>, b: &Aabb3<f64>) -> bool {
    let no_overlap_x = a.min_x >= b.max_x - EPS || b.min_x >= a.max_x - EPS;
    let no_overlap_y = a.min_y >= b.max_y - EPS || b.min_y >= a.max_y - EPS;
    !(no_overlap_x || no_overlap_y)
}

/// Intersections of the candidate footprint with every top face in contact
/// with the candidate's base plane, as (min_x, min_y, max_x, max_y).
fn support_rects(occupied: &[Region], candidate: &Aabb3<f64>) -> Vec<(f64, f64, f64, f64)> {
    let base = candidate.min_z;
    let mut rects = Vec::new();
    for region in occupied {
        if region.kind == RegionKind::Reserved {
            continue;
        }
        if (region.aabb.max_z - base).abs() > CONTACT_EPS {
            continue;
        }

        let x0 = region.aabb.min_x.max(candidate.min_x);
        let x1 = region.aabb.max_x.min(candidate.max_x);
        let y0 = region.aabb.min_y.max(candidate.min_y);
        let y1 = region.aabb.max_y.min(candidate.max_y);
        if x1 - x0 > EPS && y1 - y0 > EPS {
            rects.push((x0, y0, x1, y1));
        }
    }
    rects
}

/// Exact union area of axis-aligned rectangles by coordinate compression.
fn union_area(rects: &[(f64, f64, f64, f64)]) -> f64 {
    if rects.is_empty() {
        return 0.0;
    }

    let mut xs: Vec<f64> = rects.iter().flat_map(|r| [r.0, r.2]).collect();
    let mut ys: Vec<f64> = rects.iter().flat_map(|r| [r.1, r.3]).collect();
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    ys.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    xs.dedup_by(|a, b| (*a - *b).abs() < EPS);
    ys.dedup_by(|a, b| (*a - *b).abs() < EPS);

    let mut area = 0.0;
    for xi in 0..xs.len().saturating_sub(1) {
        let cx = (xs[xi] + xs[xi + 1]) / 2.0;
        for yi in 0..ys.len().saturating_sub(1) {
            let cy = (ys[yi] + ys[yi + 1]) / 2.0;
            // Every rect edge lies on a grid line, so the cell center
            // decides membership for the whole cell.
            if rects
                .iter()
                .any(|r| cx > r.0 && cx < r.2 && cy > r.1 && cy < r.3)
            {
                area += (xs[xi + 1] - xs[xi]) * (ys[yi + 1] - ys[yi]);
            }
        }
    }
    area
}
