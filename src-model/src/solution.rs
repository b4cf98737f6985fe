//! Candidate solutions (placement vectors)
//!
//! A solution assigns one position per building id and caches the fitness of
//! that assignment. The cache discipline is enforced here: every mutation of
//! a position goes through a method that resets the cached fitness and the
//! per-objective breakdown.
//!
//! Determinism note: code that needs a reproducible order (operators,
//! objectives) must index through the ordered building slice of the input,
//! never iterate `positions` directly.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::Point;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Solution {
    positions: HashMap<String, Point>,
    /// Cached fitness; `None` means "not evaluated since the last mutation".
    pub fitness: Option<f64>,
    /// Per-objective breakdown filled by the evaluator alongside `fitness`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub objectives: BTreeMap<String, f64>,
}

impl Solution {
    pub fn new(positions: HashMap<String, Point>) -> Self {
        Self {
            positions,
            fitness: None,
            objectives: BTreeMap::new(),
        }
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            positions: HashMap::with_capacity(n),
            fitness: None,
            objectives: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    pub fn position(&self, id: &str) -> Option<Point> {
        self.positions.get(id).copied()
    }

    pub fn positions(&self) -> &HashMap<String, Point> {
        &self.positions
    }

    /// Set or replace a position. Invalidates the fitness cache.
    pub fn set_position(&mut self, id: impl Into<String>, p: Point) {
        self.positions.insert(id.into(), p);
        self.invalidate();
    }

    /// Exchange the positions of two buildings. Invalidates the fitness cache.
    ///
    /// No-op if either id is missing.
    pub fn swap_positions(&mut self, a: &str, b: &str) {
        let (Some(pa), Some(pb)) = (self.position(a), self.position(b)) else {
            return;
        };
        self.positions.insert(a.to_string(), pb);
        self.positions.insert(b.to_string(), pa);
        self.invalidate();
    }

    /// Drop the cached fitness and breakdown.
    pub fn invalidate(&mut self) {
        self.fitness = None;
        self.objectives.clear();
    }

    /// Fitness with the ⊥ sentinel mapped to −∞, for sorting and max-selection.
    pub fn fitness_key(&self) -> f64 {
        self.fitness.unwrap_or(f64::NEG_INFINITY)
    }
}

/// Sort solutions by fitness, best first, ⊥ treated as worst.
pub fn sort_by_fitness_desc(solutions: &mut [Solution]) {
    solutions.sort_by(|a, b| {
        b.fitness_key()
            .partial_cmp(&a.fitness_key())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placed(pairs: &[(&str, f64, f64)]) -> Solution {
        let mut s = Solution::with_capacity(pairs.len());
        for (id, x, y) in pairs {
            s.set_position(*id, Point::new(*x, *y));
        }
        s
    }

    #[test]
    fn test_mutation_invalidates_cache() {
        let mut s = placed(&[("a", 1.0, 2.0)]);
        s.fitness = Some(0.7);
        s.objectives.insert("walking".into(), 0.9);

        s.set_position("a", Point::new(3.0, 4.0));
        assert_eq!(s.fitness, None);
        assert!(s.objectives.is_empty());
    }

    #[test]
    fn test_swap_positions() {
        let mut s = placed(&[("a", 0.0, 0.0), ("b", 10.0, 10.0)]);
        s.fitness = Some(0.5);
        s.swap_positions("a", "b");
        assert_eq!(s.position("a").unwrap(), Point::new(10.0, 10.0));
        assert_eq!(s.position("b").unwrap(), Point::new(0.0, 0.0));
        assert_eq!(s.fitness, None);
    }

    #[test]
    fn test_swap_missing_id_is_noop() {
        let mut s = placed(&[("a", 0.0, 0.0)]);
        s.fitness = Some(0.5);
        s.swap_positions("a", "nope");
        assert_eq!(s.position("a").unwrap(), Point::new(0.0, 0.0));
        assert_eq!(s.fitness, Some(0.5));
    }

    #[test]
    fn test_fitness_key_sentinel() {
        let mut s = placed(&[("a", 0.0, 0.0)]);
        assert_eq!(s.fitness_key(), f64::NEG_INFINITY);
        s.fitness = Some(0.25);
        assert_eq!(s.fitness_key(), 0.25);
    }

    #[test]
    fn test_sort_desc_with_bottom() {
        let mut a = placed(&[("a", 0.0, 0.0)]);
        a.fitness = Some(0.2);
        let mut b = placed(&[("a", 0.0, 0.0)]);
        b.fitness = Some(0.9);
        let c = placed(&[("a", 0.0, 0.0)]); // ⊥

        let mut v = vec![a, c, b];
        sort_by_fitness_desc(&mut v);
        assert_eq!(v[0].fitness, Some(0.9));
        assert_eq!(v[1].fitness, Some(0.2));
        assert_eq!(v[2].fitness, None);
    }
}
