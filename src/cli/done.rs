use crate::cli::DispatchArgs;
use crate::provider::GitHubClient;
use crate::scheduler::Scheduler;
use std::sync::Arc;
use tracing::info;

pub async fn execute(args: DispatchArgs) -> anyhow::Result<()> {
    let config = args.into_config()?;
    let client = GitHubClient::new(&config.token, &config.api_base)?;
    let scheduler = Scheduler::new(Arc::new(client));

    let summary = scheduler.done(config).await;
    if summary.is_empty() {
        info!("All review requests submitted");
        return Ok(());
    }

    // The engine's contract: a non-empty string is the failure summary,
    // rendered verbatim.
    println!("{}", summary);
    std::process::exit(1);
}
