use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::AssignmentError;
use crate::scope::ScopeTarget;

use super::Policy;

/// Picks a non-empty random subset of the candidate pool per repository,
/// preserving pool order within the subset.
///
/// Deterministic when the run supplies a seed; otherwise seeded from entropy
/// and explicitly non-deterministic across runs.
#[derive(Debug)]
pub struct RandomSubset {
    rng: StdRng,
}

impl RandomSubset {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl Policy for RandomSubset {
    fn name(&self) -> &'static str {
        "random"
    }

    fn assign(
        &mut self,
        target: &ScopeTarget,
        candidates: &[String],
    ) -> Result<Vec<String>, AssignmentError> {
        if candidates.is_empty() {
            return Err(AssignmentError::EmptyCandidates(target.to_string()));
        }

        let take = self.rng.gen_range(1..=candidates.len());
        let mut indices = rand::seq::index::sample(&mut self.rng, candidates.len(), take)
            .into_vec();
        indices.sort_unstable();

        Ok(indices.into_iter().map(|i| candidates[i].clone()).collect())
    }
}
