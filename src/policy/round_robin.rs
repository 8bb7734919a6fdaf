use crate::error::AssignmentError;
use crate::scope::ScopeTarget;

use super::Policy;

/// Cycles through the candidate pool across successive repositories, one
/// reviewer each. The cursor survives between calls within a run so the
/// rotation continues where the previous repository left off.
#[derive(Debug)]
pub struct RoundRobin {
    cursor: usize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self { cursor: 0 }
    }
}

impl Policy for RoundRobin {
    fn name(&self) -> &'static str {
        "round-robin"
    }

    fn assign(
        &mut self,
        target: &ScopeTarget,
        candidates: &[String],
    ) -> Result<Vec<String>, AssignmentError> {
        if candidates.is_empty() {
            return Err(AssignmentError::EmptyCandidates(target.to_string()));
        }

        let picked = candidates[self.cursor % candidates.len()].clone();
        self.cursor += 1;
        Ok(vec![picked])
    }
}
