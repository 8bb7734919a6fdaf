mod assign;
pub mod retry;

pub use assign::compute_assignments;

use crate::config::Config;
use crate::error::{RotorError, RunnerError};
use crate::policy;
use crate::provider::ProviderClient;
use crate::scope::{self, ScopeTarget};
use chrono::{DateTime, Utc};
use futures::stream::{FuturesUnordered, StreamExt};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use retry::retry_with_backoff;

/// Phases of one dispatch execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Resolving,
    Assigning,
    Submitting,
    Done,
    PartiallyFailed,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunPhase::Idle => "idle",
            RunPhase::Resolving => "resolving",
            RunPhase::Assigning => "assigning",
            RunPhase::Submitting => "submitting",
            RunPhase::Done => "done",
            RunPhase::PartiallyFailed => "partially_failed",
        };
        f.write_str(s)
    }
}

struct PhaseTracker(RunPhase);

impl PhaseTracker {
    fn enter(&mut self, next: RunPhase) {
        debug!("Run phase {} -> {}", self.0, next);
        self.0 = next;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TargetOutcome {
    pub target: ScopeTarget,
    pub status: TargetStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TargetStatus {
    Submitted { reviewers: Vec<String> },
    AssignmentFailed { error: String },
    SubmissionFailed { error: String },
}

impl TargetStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, TargetStatus::Submitted { .. })
    }

    fn error(&self) -> Option<&str> {
        match self {
            TargetStatus::Submitted { .. } => None,
            TargetStatus::AssignmentFailed { error } | TargetStatus::SubmissionFailed { error } => {
                Some(error)
            }
        }
    }
}

#[derive(Debug)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub outcomes: Vec<TargetOutcome>,
    pub total_duration: Duration,
    pub state: RunPhase,
}

impl RunReport {
    /// The caller-visible result: empty on full success, otherwise one line
    /// per failed target.
    pub fn summary(&self) -> String {
        self.outcomes
            .iter()
            .filter_map(|o| o.status.error().map(|e| format!("{}: {}", o.target, e)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Runs one full pipeline execution: resolve scope, apply the policy
/// sequentially, then submit assignments through a bounded worker pool.
pub struct Dispatcher {
    config: Arc<Config>,
    provider: Arc<dyn ProviderClient>,
    semaphore: Arc<Semaphore>,
}

impl Dispatcher {
    pub fn new(config: Arc<Config>, provider: Arc<dyn ProviderClient>) -> Self {
        let semaphore = Arc::new(Semaphore::new(config.concurrency.max(1)));
        Self {
            config,
            provider,
            semaphore,
        }
    }

    pub async fn run(&self) -> Result<RunReport, RotorError> {
        let start = std::time::Instant::now();
        let started_at = Utc::now();
        let mut phase = PhaseTracker(RunPhase::Idle);

        phase.enter(RunPhase::Resolving);
        let targets = scope::resolve_targets(&self.config);
        info!("Resolved {} target(s)", targets.len());

        phase.enter(RunPhase::Assigning);
        let mut policy = policy::create_policy(&self.config.plugin, self.config.seed)?;
        let assigned = compute_assignments(policy.as_mut(), &targets, &self.config.reviews);

        phase.enter(RunPhase::Submitting);
        // Outcomes keep resolved-target order regardless of completion order.
        let mut slots: Vec<Option<TargetOutcome>> = Vec::new();
        slots.resize_with(assigned.len(), || None);

        let mut futures = FuturesUnordered::new();
        for (idx, (target, outcome)) in assigned.into_iter().enumerate() {
            let assignment = match outcome {
                Ok(assignment) => assignment,
                Err(e) => {
                    warn!("Assignment failed for {}: {}", target, e);
                    slots[idx] = Some(TargetOutcome {
                        target,
                        status: TargetStatus::AssignmentFailed {
                            error: e.to_string(),
                        },
                    });
                    continue;
                }
            };

            let permit = self
                .semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(RunnerError::from)?;
            let provider = self.provider.clone();
            let retry = self.config.retry.clone();

            futures.push(tokio::spawn(async move {
                let _permit = permit; // hold until done
                let result = retry_with_backoff(&retry, || {
                    let provider = provider.clone();
                    let assignment = assignment.clone();
                    async move { provider.submit(&assignment).await }
                })
                .await;
                (idx, assignment, result)
            }));
        }

        while let Some(joined) = futures.next().await {
            let (idx, assignment, result) = joined.map_err(RunnerError::from)?;
            let status = match result {
                Ok(()) => {
                    info!(
                        "Submitted {:?} for {}",
                        assignment.reviewers, assignment.target
                    );
                    TargetStatus::Submitted {
                        reviewers: assignment.reviewers,
                    }
                }
                Err(e) => {
                    warn!("Submission failed for {}: {}", assignment.target, e);
                    TargetStatus::SubmissionFailed {
                        error: e.to_string(),
                    }
                }
            };
            slots[idx] = Some(TargetOutcome {
                target: assignment.target,
                status,
            });
        }

        let outcomes: Vec<TargetOutcome> = slots.into_iter().flatten().collect();
        let final_phase = if outcomes.iter().all(|o| o.status.is_success()) {
            RunPhase::Done
        } else {
            RunPhase::PartiallyFailed
        };
        phase.enter(final_phase);

        Ok(RunReport {
            started_at,
            outcomes,
            total_duration: start.elapsed(),
            state: final_phase,
        })
    }
}
