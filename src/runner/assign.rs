use crate::error::AssignmentError;
use crate::policy::Policy;
use crate::scope::{Assignment, ScopeTarget};
use tracing::debug;

/// Apply the policy to every target, strictly in resolved order.
///
/// This loop is the single owner of the policy's intra-run state (the
/// round-robin cursor), so assignment order stays deterministic no matter
/// how the submissions fan out afterwards. A failed invocation records the
/// error for that target and moves on.
pub fn compute_assignments(
    policy: &mut dyn Policy,
    targets: &[ScopeTarget],
    candidates: &[String],
) -> Vec<(ScopeTarget, Result<Assignment, AssignmentError>)> {
    targets
        .iter()
        .map(|target| {
            let outcome = policy.assign(target, candidates).map(|reviewers| {
                debug!("Assigned {:?} to {}", reviewers, target);
                Assignment {
                    target: target.clone(),
                    reviewers,
                }
            });
            (target.clone(), outcome)
        })
        .collect()
}
