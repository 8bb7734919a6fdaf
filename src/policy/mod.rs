mod fixed;
mod random;
mod round_robin;

pub use fixed::Fixed;
pub use random::RandomSubset;
pub use round_robin::RoundRobin;

use crate::error::{AssignmentError, PolicyError};
use crate::scope::ScopeTarget;

/// Names accepted in the config's `plugin` field.
pub const POLICY_NAMES: &[&str] = &["round-robin", "random", "fixed"];

/// An assignment strategy: given a repository and the candidate pool, pick
/// an ordered subset of reviewers for it.
///
/// Policies are stateless across runs; anything a policy accumulates (the
/// round-robin cursor) lives for a single dispatch execution and is
/// discarded with the boxed instance.
pub trait Policy: Send + std::fmt::Debug {
    #[allow(dead_code)]
    fn name(&self) -> &'static str;

    fn assign(
        &mut self,
        target: &ScopeTarget,
        candidates: &[String],
    ) -> Result<Vec<String>, AssignmentError>;
}

pub fn is_registered(name: &str) -> bool {
    POLICY_NAMES.contains(&name)
}

/// Create a fresh policy instance for one run.
pub fn create_policy(name: &str, seed: Option<u64>) -> Result<Box<dyn Policy>, PolicyError> {
    match name {
        "round-robin" => Ok(Box::new(RoundRobin::new())),
        "random" => Ok(Box::new(RandomSubset::new(seed))),
        "fixed" => Ok(Box::new(Fixed)),
        other => Err(PolicyError::Unknown(other.to_string())),
    }
}
