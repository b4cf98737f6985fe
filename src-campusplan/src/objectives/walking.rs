//! Walking distance objective
//!
//! Mean pairwise Euclidean distance between all placed buildings, normalized
//! by the site diagonal. Compact layouts score high; a layout spanning the
//! full diagonal scores zero.

use campusplan_model::Solution;

use crate::fitness::EvalContext;
use crate::objectives::Objective;

#[derive(Debug, Clone, Copy, Default)]
pub struct WalkingObjective;

impl Objective for WalkingObjective {
    fn name(&self) -> &'static str {
        "walking"
    }

    fn score(&self, solution: &Solution, ctx: &EvalContext) -> f64 {
        let mut total = 0.0;
        let mut pairs = 0usize;

        for (i, a) in ctx.buildings.iter().enumerate() {
            let Some(pa) = solution.position(&a.id) else {
                continue;
            };
            for b in &ctx.buildings[i + 1..] {
                let Some(pb) = solution.position(&b.id) else {
                    continue;
                };
                total += pa.distance(pb);
                pairs += 1;
            }
        }

        if pairs == 0 {
            return 1.0;
        }

        let mean = total / pairs as f64;
        (1.0 - mean / ctx.bounds.diagonal()).clamp(0.0, 1.0)
    }
}
