//! Selection contract and tournament selection
//!
//! Individuals expose a [`FitnessRank`]; the tournament compares ranks with a
//! total order instead of probing for optional attributes. The single-scalar
//! pipeline only produces [`FitnessRank::Scalar`]; the dominated variant
//! carries the (rank, crowding) pair a multi-objective caller would use.

use std::cmp::Ordering;

use rand::Rng;

use campusplan_model::Solution;

/// Comparable fitness of an individual. Greater means better.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FitnessRank {
    /// Scalar fitness; the ⊥ sentinel maps to −∞ before it gets here.
    Scalar(f64),
    /// Pareto rank (lower better) with crowding distance as tiebreak.
    Dominated { rank: u32, crowding: f64 },
}

impl FitnessRank {
    /// Total order on ranks of the same variant; mixed variants compare equal
    /// (populations are homogeneous by construction).
    pub fn compare(&self, other: &FitnessRank) -> Ordering {
        match (self, other) {
            (FitnessRank::Scalar(a), FitnessRank::Scalar(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (
                FitnessRank::Dominated { rank: ra, crowding: ca },
                FitnessRank::Dominated { rank: rb, crowding: cb },
            ) => match rb.cmp(ra) {
                Ordering::Equal => ca.partial_cmp(cb).unwrap_or(Ordering::Equal),
                ord => ord,
            },
            _ => Ordering::Equal,
        }
    }
}

/// Capability required by the tournament.
pub trait Individual {
    fn rank(&self) -> FitnessRank;
}

impl Individual for Solution {
    fn rank(&self) -> FitnessRank {
        FitnessRank::Scalar(self.fitness_key())
    }
}

/// Tournament selection: draw `size` individuals with replacement and return
/// the one with the best rank.
pub fn tournament<'a, T: Individual, R: Rng + ?Sized>(
    population: &'a [T],
    size: usize,
    rng: &mut R,
) -> &'a T {
    assert!(!population.is_empty(), "tournament over empty population");
    let mut winner = &population[rng.random_range(0..population.len())];
    for _ in 1..size.max(1) {
        let challenger = &population[rng.random_range(0..population.len())];
        if challenger.rank().compare(&winner.rank()) == Ordering::Greater {
            winner = challenger;
        }
    }
    winner
}
