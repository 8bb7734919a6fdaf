mod github;

pub use github::GitHubClient;

use crate::error::ProviderError;
use crate::scope::Assignment;
use async_trait::async_trait;

/// The hosting provider's review-request surface. Submissions are
/// independent per repository; there is no cross-repository transaction.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    async fn submit(&self, assignment: &Assignment) -> Result<(), ProviderError>;
}
