use crate::error::AssignmentError;
use crate::scope::ScopeTarget;

use super::Policy;

/// Assigns the entire candidate pool to every repository.
#[derive(Debug)]
pub struct Fixed;

impl Policy for Fixed {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn assign(
        &mut self,
        target: &ScopeTarget,
        candidates: &[String],
    ) -> Result<Vec<String>, AssignmentError> {
        if candidates.is_empty() {
            return Err(AssignmentError::EmptyCandidates(target.to_string()));
        }
        Ok(candidates.to_vec())
    }
}
