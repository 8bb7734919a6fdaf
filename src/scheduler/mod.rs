use crate::config::{Config, RunMode};
use crate::provider::ProviderClient;
use crate::runner::Dispatcher;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Lifecycle of a registered dispatch job. A recurring job cycles
/// `Running -> {ScheduledNext, Failed}` per tick and ends `Completed` when
/// cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Running,
    Completed,
    ScheduledNext,
    Failed,
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobState::Pending => "pending",
            JobState::Running => "running",
            JobState::Completed => "completed",
            JobState::ScheduledNext => "scheduled_next",
            JobState::Failed => "failed",
        };
        f.write_str(s)
    }
}

struct DispatchJob {
    id: Uuid,
    config: Arc<Config>,
    state: JobState,
}

impl DispatchJob {
    fn transition(&mut self, next: JobState) {
        debug!("Job {} state {} -> {}", self.id, self.state, next);
        self.state = next;
    }

    /// One pipeline execution inside a recurring job. Failures are logged
    /// and swallowed; they never reach the caller that registered the job.
    async fn run_tick(&mut self, provider: Arc<dyn ProviderClient>) {
        self.transition(JobState::Running);

        let dispatcher = Dispatcher::new(self.config.clone(), provider);
        match dispatcher.run().await {
            Ok(report) => {
                let summary = report.summary();
                if summary.is_empty() {
                    info!(
                        "Job {} run started {} complete: {} target(s) in {:?}",
                        self.id,
                        report.started_at.format("%H:%M:%S"),
                        report.outcomes.len(),
                        report.total_duration
                    );
                    self.transition(JobState::ScheduledNext);
                } else {
                    warn!("Job {} run had failures:\n{}", self.id, summary);
                    self.transition(JobState::Failed);
                }
            }
            Err(e) => {
                error!("Job {} run aborted: {}", self.id, e);
                self.transition(JobState::Failed);
            }
        }
    }
}

/// Handle to a registered recurring job.
pub struct JobHandle {
    id: Uuid,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl JobHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Stop future scheduled runs. A run already executing finishes; the
    /// loop only observes cancellation between ticks.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Cancel and wait for the background task to wind down.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        let _ = self.task.await;
    }
}

/// Decides whether the pipeline runs immediately (`done`) or is armed to
/// run periodically (`create`).
pub struct Scheduler {
    provider: Arc<dyn ProviderClient>,
}

impl Scheduler {
    pub fn new(provider: Arc<dyn ProviderClient>) -> Self {
        Self { provider }
    }

    /// Run the one-shot pipeline.
    ///
    /// Returns the empty string on full success, otherwise a newline-joined
    /// list of per-target failures. Fatal config errors short-circuit to
    /// their message; nothing is submitted in that case.
    pub async fn done(&self, mut config: Config) -> String {
        config.normalize();
        if let Err(e) = config.validate(RunMode::OneShot) {
            warn!("Rejected one-shot dispatch: {}", e);
            return e.to_string();
        }

        let dispatcher = Dispatcher::new(Arc::new(config), self.provider.clone());
        match dispatcher.run().await {
            Ok(report) => report.summary(),
            Err(e) => e.to_string(),
        }
    }

    /// Register the pipeline to run every `config.dispatch` minutes.
    ///
    /// The first execution fires after one full interval elapses, not at
    /// registration. Returns the empty string plus a cancellable handle on
    /// success, or the error message and no handle if registration fails.
    /// Per-run failures after registration are logged, never returned.
    pub fn create(&self, mut config: Config) -> (String, Option<JobHandle>) {
        config.normalize();
        if let Err(e) = config.validate(RunMode::Recurring) {
            warn!("Rejected recurring dispatch: {}", e);
            return (e.to_string(), None);
        }

        // Validation guarantees a positive interval here.
        let minutes = config.dispatch.interval_minutes().unwrap_or(0);
        if minutes == 0 {
            return (
                crate::error::ConfigError::InvalidInterval.to_string(),
                None,
            );
        }

        let handle = self.spawn_job(Arc::new(config), Duration::from_secs(minutes.saturating_mul(60)));
        (String::new(), Some(handle))
    }

    fn spawn_job(&self, config: Arc<Config>, every: Duration) -> JobHandle {
        let id = Uuid::new_v4();
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let provider = self.provider.clone();

        info!("Registered recurring dispatch {} every {:?}", id, every);

        let task = tokio::spawn(async move {
            let mut job = DispatchJob {
                id,
                config,
                state: JobState::Pending,
            };

            let mut interval = tokio::time::interval(every);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // An interval's first tick completes immediately; consume it so
            // the first run lands one full interval after registration.
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        job.transition(JobState::Completed);
                        info!("Recurring dispatch {} cancelled", id);
                        break;
                    }
                    _ = interval.tick() => {
                        job.run_tick(provider.clone()).await;
                    }
                }
            }
        });

        JobHandle { id, cancel, task }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Dispatch, Owner, RetryConfig};
    use crate::testutil::MockProvider;

    fn config(dispatch: Dispatch) -> Config {
        Config {
            plugin: "fixed".to_string(),
            token: "tok".to_string(),
            owners: Owner {
                name: "octo".to_string(),
                repos: vec!["app".to_string()],
            },
            reviews: vec!["alice".to_string()],
            dispatch,
            retry: RetryConfig {
                max_attempts: 2,
                backoff_base_ms: 10,
            },
            ..Config::default()
        }
    }

    /// Let spawned tasks run until they block again.
    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    async fn advance_minutes(minutes: u64) {
        tokio::time::advance(Duration::from_secs(minutes * 60)).await;
        settle().await;
    }

    #[tokio::test(start_paused = true)]
    async fn done_returns_empty_string_on_success() {
        let provider = Arc::new(MockProvider::new());
        let scheduler = Scheduler::new(provider.clone());

        let result = scheduler.done(config(Dispatch::Now)).await;

        assert_eq!(result, "");
        assert_eq!(provider.submitted().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn done_with_empty_plugin_submits_nothing() {
        let provider = Arc::new(MockProvider::new());
        let scheduler = Scheduler::new(provider.clone());

        let mut cfg = config(Dispatch::Now);
        cfg.plugin = String::new();
        let result = scheduler.done(cfg).await;

        assert_eq!(result, "plugin not allowed empty");
        assert!(provider.submitted().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn done_ignores_the_dispatch_field() {
        let provider = Arc::new(MockProvider::new());
        let scheduler = Scheduler::new(provider.clone());

        let result = scheduler.done(config(Dispatch::Every(0))).await;

        assert_eq!(result, "");
        assert_eq!(provider.submitted().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn done_twice_is_idempotent() {
        let provider = Arc::new(MockProvider::new());
        let scheduler = Scheduler::new(provider.clone());

        scheduler.done(config(Dispatch::Now)).await;
        scheduler.done(config(Dispatch::Now)).await;

        let submitted = provider.submitted();
        assert_eq!(submitted.len(), 2);
        assert_eq!(submitted[0], submitted[1]);
    }

    #[tokio::test(start_paused = true)]
    async fn create_rejects_a_missing_interval() {
        let provider = Arc::new(MockProvider::new());
        let scheduler = Scheduler::new(provider.clone());

        let (result, handle) = scheduler.create(config(Dispatch::Now));
        assert!(result.contains("dispatch"));
        assert!(handle.is_none());

        let (result, handle) = scheduler.create(config(Dispatch::Every(0)));
        assert!(result.contains("dispatch"));
        assert!(handle.is_none());
        assert!(provider.submitted().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn create_accepts_an_enormous_interval_without_overflow() {
        let provider = Arc::new(MockProvider::new());
        let scheduler = Scheduler::new(provider.clone());

        let (result, handle) = scheduler.create(config(Dispatch::Every(u64::MAX)));
        assert_eq!(result, "");
        let handle = handle.unwrap();

        // Far-future first tick: nothing fires in any observable window.
        advance_minutes(120).await;
        assert_eq!(provider.submitted().len(), 0);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn recurring_job_runs_twice_in_sixty_one_minutes() {
        let provider = Arc::new(MockProvider::new());
        let scheduler = Scheduler::new(provider.clone());

        let (result, handle) = scheduler.create(config(Dispatch::Every(30)));
        assert_eq!(result, "");
        let handle = handle.unwrap();

        // Nothing fires at registration.
        settle().await;
        assert_eq!(provider.submitted().len(), 0);

        advance_minutes(30).await;
        assert_eq!(provider.submitted().len(), 1);

        advance_minutes(30).await;
        assert_eq!(provider.submitted().len(), 2);

        advance_minutes(1).await;
        assert_eq!(provider.submitted().len(), 2);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_stops_future_runs() {
        let provider = Arc::new(MockProvider::new());
        let scheduler = Scheduler::new(provider.clone());

        let (_, handle) = scheduler.create(config(Dispatch::Every(30)));
        let handle = handle.unwrap();
        settle().await;

        advance_minutes(30).await;
        assert_eq!(provider.submitted().len(), 1);

        handle.cancel();
        settle().await;

        advance_minutes(90).await;
        assert_eq!(provider.submitted().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn recurring_failures_do_not_stop_later_runs() {
        let provider = Arc::new(
            MockProvider::new().fail_times("app", crate::testutil::FailKind::Transient, 2),
        );
        let scheduler = Scheduler::new(provider.clone());

        let (_, handle) = scheduler.create(config(Dispatch::Every(30)));
        let handle = handle.unwrap();
        settle().await;

        // First tick exhausts its 2-attempt budget and fails.
        advance_minutes(30).await;
        assert_eq!(provider.submitted().len(), 0);

        // Second tick succeeds; the job kept going.
        advance_minutes(30).await;
        assert_eq!(provider.submitted().len(), 1);

        handle.shutdown().await;
    }
}
