//! Perturbation, mutation and crossover operators
//!
//! All operators draw from an explicit RNG passed by the caller; nothing in
//! this module touches global random state. Positions produced by an operator
//! are always clipped into the site eroded by the moved building's margin
//! (`radius + 5 m`), so solutions never leave the box.

use std::f64::consts::TAU;

use rand::Rng;

use campusplan_model::{Bounds, Building, DEFAULT_SAFETY_MARGIN, Point, Solution};

/// Sample a zero-mean normal deviate with the given sigma (Box–Muller).
pub fn sample_normal<R: Rng + ?Sized>(rng: &mut R, sigma: f64) -> f64 {
    let u1: f64 = rng.random::<f64>().max(f64::MIN_POSITIVE);
    let u2: f64 = rng.random();
    sigma * (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}

fn margin_for(building: &Building) -> f64 {
    building.radius() + DEFAULT_SAFETY_MARGIN
}

/// Uniform position inside the site eroded by `margin` on every side.
///
/// If the margin swallows an axis the coordinate collapses to the center of
/// that axis.
fn uniform_in<R: Rng + ?Sized>(bounds: Bounds, margin: f64, rng: &mut R) -> Point {
    let x = if bounds.x_min + margin < bounds.x_max - margin {
        rng.random_range(bounds.x_min + margin..bounds.x_max - margin)
    } else {
        (bounds.x_min + bounds.x_max) / 2.0
    };
    let y = if bounds.y_min + margin < bounds.y_max - margin {
        rng.random_range(bounds.y_min + margin..bounds.y_max - margin)
    } else {
        (bounds.y_min + bounds.y_max) / 2.0
    };
    Point::new(x, y)
}

/// Sample a fresh solution: every building placed independently, uniformly in
/// the eroded site. Overlap is not rejected here; it is penalized by fitness.
pub fn random_solution<R: Rng + ?Sized>(
    buildings: &[Building],
    bounds: Bounds,
    rng: &mut R,
) -> Solution {
    let mut solution = Solution::with_capacity(buildings.len());
    for building in buildings {
        let p = uniform_in(bounds, margin_for(building), rng);
        solution.set_position(&building.id, p);
    }
    solution
}

/// Jitter one randomly chosen building by N(0, sigma) on both axes.
pub fn gaussian_move<R: Rng + ?Sized>(
    solution: &mut Solution,
    buildings: &[Building],
    bounds: Bounds,
    sigma: f64,
    rng: &mut R,
) {
    let building = &buildings[rng.random_range(0..buildings.len())];
    let Some(p) = solution.position(&building.id) else {
        return;
    };
    let dx = sample_normal(rng, sigma);
    let dy = sample_normal(rng, sigma);
    let moved = bounds.clamp_with_margin(Point::new(p.x + dx, p.y + dy), margin_for(building));
    solution.set_position(&building.id, moved);
}

/// Exchange the positions of two distinct randomly chosen buildings.
pub fn swap_move<R: Rng + ?Sized>(solution: &mut Solution, buildings: &[Building], rng: &mut R) {
    let n = buildings.len();
    if n < 2 {
        return;
    }
    let i = rng.random_range(0..n);
    let mut j = rng.random_range(0..n - 1);
    if j >= i {
        j += 1;
    }
    solution.swap_positions(&buildings[i].id, &buildings[j].id);
}

/// Resample one randomly chosen building uniformly in the eroded site.
pub fn reset_move<R: Rng + ?Sized>(
    solution: &mut Solution,
    buildings: &[Building],
    bounds: Bounds,
    rng: &mut R,
) {
    let building = &buildings[rng.random_range(0..buildings.len())];
    let p = uniform_in(bounds, margin_for(building), rng);
    solution.set_position(&building.id, p);
}

/// Uniform position crossover.
///
/// With probability `crossover_rate` the pair exchanges positions per
/// building (each with probability `swap_probability`); otherwise the
/// children are clones of their parents. Children are always returned with
/// invalidated fitness.
pub fn uniform_crossover<R: Rng + ?Sized>(
    a: &Solution,
    b: &Solution,
    buildings: &[Building],
    crossover_rate: f64,
    swap_probability: f64,
    rng: &mut R,
) -> (Solution, Solution) {
    let mut child_a = a.clone();
    let mut child_b = b.clone();

    if rng.random::<f64>() < crossover_rate {
        for building in buildings {
            if rng.random::<f64>() < swap_probability {
                if let (Some(pa), Some(pb)) = (
                    child_a.position(&building.id),
                    child_b.position(&building.id),
                ) {
                    child_a.set_position(&building.id, pb);
                    child_b.set_position(&building.id, pa);
                }
            }
        }
    }

    child_a.invalidate();
    child_b.invalidate();
    (child_a, child_b)
}
