use crate::cli::DispatchArgs;
use crate::provider::GitHubClient;
use crate::scheduler::Scheduler;
use std::sync::Arc;
use tracing::info;

pub async fn execute(args: DispatchArgs) -> anyhow::Result<()> {
    let config = args.into_config()?;
    let client = GitHubClient::new(&config.token, &config.api_base)?;
    let scheduler = Scheduler::new(Arc::new(client));

    let (result, handle) = scheduler.create(config);
    let Some(handle) = handle else {
        eprintln!("{}", result);
        std::process::exit(1);
    };

    info!(
        "Recurring dispatch {} registered; press Ctrl-C to stop",
        handle.id()
    );
    tokio::signal::ctrl_c().await?;

    info!("Shutting down");
    handle.shutdown().await;
    Ok(())
}
