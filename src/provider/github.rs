use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use super::ProviderClient;
use crate::error::ProviderError;
use crate::scope::{Assignment, ScopeTarget};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// GitHub review-request client: for each open pull request in the
/// assignment's repository, requests review from the assigned reviewers.
pub struct GitHubClient {
    http: reqwest::Client,
    api_base: String,
}

#[derive(Debug, Deserialize)]
struct PullRequest {
    number: u64,
    title: String,
    user: User,
}

#[derive(Debug, Deserialize)]
struct User {
    login: String,
}

#[derive(Serialize)]
struct ReviewRequestBody<'a> {
    reviewers: &'a [String],
}

impl GitHubClient {
    pub fn new(token: &str, api_base: &str) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::new();
        let auth: HeaderValue = format!("Bearer {}", token)
            .parse()
            .map_err(|_| ProviderError::Unauthorized("token contains invalid characters".into()))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("rotor"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::Transient(e.to_string()))?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    fn pulls_url(&self, target: &ScopeTarget) -> String {
        format!(
            "{}/repos/{}/{}/pulls?state=open&per_page=100",
            self.api_base, target.owner, target.repo
        )
    }

    fn reviewers_url(&self, target: &ScopeTarget, number: u64) -> String {
        format!(
            "{}/repos/{}/{}/pulls/{}/requested_reviewers",
            self.api_base, target.owner, target.repo, number
        )
    }

    async fn open_pulls(&self, target: &ScopeTarget) -> Result<Vec<PullRequest>, ProviderError> {
        let rsp = self
            .http
            .get(self.pulls_url(target))
            .send()
            .await
            .map_err(request_error)?;

        let status = rsp.status();
        if !status.is_success() {
            return Err(status_error(status, &target.to_string()));
        }

        rsp.json().await.map_err(request_error)
    }

    async fn request_reviewers(
        &self,
        target: &ScopeTarget,
        number: u64,
        reviewers: &[String],
    ) -> Result<(), ProviderError> {
        let rsp = self
            .http
            .post(self.reviewers_url(target, number))
            .json(&ReviewRequestBody { reviewers })
            .send()
            .await
            .map_err(request_error)?;

        let status = rsp.status();
        if !status.is_success() {
            return Err(status_error(status, &format!("{}#{}", target, number)));
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl ProviderClient for GitHubClient {
    /// A failure on one PR aborts the rest of the repository's PRs, and a
    /// retried attempt re-requests reviewers on PRs the failed attempt
    /// already covered. The requested_reviewers endpoint is idempotent
    /// (re-adding an existing requested reviewer is a no-op), so the repeat
    /// is safe.
    async fn submit(&self, assignment: &Assignment) -> Result<(), ProviderError> {
        let target = &assignment.target;
        let pulls = self.open_pulls(target).await?;

        if pulls.is_empty() {
            debug!("No open pull requests in {}", target);
            return Ok(());
        }

        for pr in &pulls {
            let reviewers = eligible_reviewers(&pr.user.login, &assignment.reviewers);
            if reviewers.is_empty() {
                debug!(
                    "Skipping {}#{} - every assigned reviewer authored it",
                    target, pr.number
                );
                continue;
            }

            self.request_reviewers(target, pr.number, &reviewers).await?;
            info!(
                "Requested {} reviewer(s) on {}#{} ({})",
                reviewers.len(),
                target,
                pr.number,
                pr.title
            );
        }

        Ok(())
    }
}

/// GitHub rejects a review request naming the PR author, so drop the author
/// from the assigned set for that PR.
fn eligible_reviewers(author: &str, reviewers: &[String]) -> Vec<String> {
    reviewers
        .iter()
        .filter(|r| r.as_str() != author)
        .cloned()
        .collect()
}

fn status_error(status: StatusCode, context: &str) -> ProviderError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ProviderError::Unauthorized(context.to_string())
        }
        StatusCode::NOT_FOUND => ProviderError::NotFound(context.to_string()),
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited,
        other => ProviderError::Transient(format!("{} returned {}", context, other)),
    }
}

fn request_error(e: reqwest::Error) -> ProviderError {
    ProviderError::Transient(e.to_string())
}
