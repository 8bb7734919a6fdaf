use std::path::PathBuf;
use thiserror::Error;

#[allow(dead_code)]
#[derive(Error, Debug)]
pub enum RotorError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),

    #[error("Assignment error: {0}")]
    Assignment(#[from] AssignmentError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Runner error: {0}")]
    Runner(#[from] RunnerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fatal input errors: nothing runs when one of these fires.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("token not allowed empty")]
    EmptyToken,

    #[error("plugin not allowed empty")]
    EmptyPlugin,

    #[error("plugin '{0}' is not a registered policy")]
    UnknownPolicy(String),

    #[error("reviews not allowed empty")]
    NoReviewers,

    #[error("owner/repos or orgs/repos not allowed empty")]
    EmptyScope,

    #[error("dispatch must be a positive interval in minutes")]
    InvalidInterval,
}

#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("Unknown policy '{0}'")]
    Unknown(String),
}

/// One target's policy invocation failed; the run continues past it.
#[derive(Error, Debug)]
pub enum AssignmentError {
    #[error("No candidate reviewers available for {0}")]
    EmptyCandidates(String),
}

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limited by provider")]
    RateLimited,

    #[error("Transient provider failure: {0}")]
    Transient(String),
}

impl ProviderError {
    /// Only rate limits and transient faults are worth retrying; bad
    /// credentials and missing repositories don't self-correct.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProviderError::RateLimited | ProviderError::Transient(_)
        )
    }
}

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Failed to acquire semaphore: {0}")]
    Semaphore(#[from] tokio::sync::AcquireError),

    #[error("Submission task panicked: {0}")]
    Join(#[from] tokio::task::JoinError),
}
