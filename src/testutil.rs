//! Test doubles shared by the runner and scheduler tests.

use crate::error::ProviderError;
use crate::provider::ProviderClient;
use crate::scope::Assignment;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

#[allow(dead_code)]
#[derive(Debug, Clone, Copy)]
pub enum FailKind {
    Unauthorized,
    NotFound,
    RateLimited,
    Transient,
}

impl FailKind {
    fn to_error(self, context: &str) -> ProviderError {
        match self {
            FailKind::Unauthorized => ProviderError::Unauthorized(context.to_string()),
            FailKind::NotFound => ProviderError::NotFound(context.to_string()),
            FailKind::RateLimited => ProviderError::RateLimited,
            FailKind::Transient => ProviderError::Transient(context.to_string()),
        }
    }
}

/// Records every accepted submission; failures are scripted per repository,
/// either for the first N attempts or forever.
#[derive(Default)]
pub struct MockProvider {
    submitted: Mutex<Vec<Assignment>>,
    attempts: Mutex<HashMap<String, u32>>,
    failures: HashMap<String, (FailKind, Option<u32>)>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_always(mut self, repo: &str, kind: FailKind) -> Self {
        self.failures.insert(repo.to_string(), (kind, None));
        self
    }

    pub fn fail_times(mut self, repo: &str, kind: FailKind, times: u32) -> Self {
        self.failures.insert(repo.to_string(), (kind, Some(times)));
        self
    }

    pub fn submitted(&self) -> Vec<Assignment> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn submitted_repos(&self) -> Vec<String> {
        let mut repos: Vec<String> = self
            .submitted()
            .iter()
            .map(|a| a.target.to_string())
            .collect();
        repos.sort();
        repos
    }

    pub fn attempts_for(&self, repo: &str) -> u32 {
        self.attempts
            .lock()
            .unwrap()
            .get(repo)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl ProviderClient for MockProvider {
    async fn submit(&self, assignment: &Assignment) -> Result<(), ProviderError> {
        let repo = assignment.target.repo.clone();
        let attempt = {
            let mut attempts = self.attempts.lock().unwrap();
            let n = attempts.entry(repo.clone()).or_insert(0);
            *n += 1;
            *n
        };

        if let Some((kind, limit)) = self.failures.get(&repo) {
            let fails = match limit {
                None => true,
                Some(times) => attempt <= *times,
            };
            if fails {
                return Err(kind.to_error(&assignment.target.to_string()));
            }
        }

        self.submitted.lock().unwrap().push(assignment.clone());
        Ok(())
    }
}
