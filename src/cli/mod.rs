pub mod create;
pub mod done;

use crate::config::{Config, Dispatch};
use crate::error::ConfigError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rotor")]
#[command(
    author,
    version,
    about = "Policy-driven reviewer assignment dispatcher for GitHub repositories"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the assignment pipeline once
    Done(DispatchArgs),

    /// Register a recurring assignment pipeline
    Create(DispatchArgs),
}

#[derive(Parser, Clone)]
pub struct DispatchArgs {
    /// Path to config file (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Provider access token
    #[arg(long, env = "ROTOR_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Assignment policy: round-robin, random, or fixed
    #[arg(long)]
    pub policy: Option<String>,

    /// Candidate reviewers (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub reviewers: Option<Vec<String>>,

    /// Owner account name
    #[arg(long)]
    pub owner: Option<String>,

    /// Owner repositories (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub repos: Option<Vec<String>>,

    /// Organization repositories as NAME=repo1,repo2 (repeatable)
    #[arg(long = "org", value_parser = parse_org)]
    pub orgs: Vec<(String, Vec<String>)>,

    /// Dispatch interval in minutes (create only)
    #[arg(long)]
    pub every: Option<u64>,

    /// Override max parallel submissions
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Seed for the random policy
    #[arg(long)]
    pub seed: Option<u64>,
}

impl DispatchArgs {
    /// Merge the config file (when given) with flag overrides. Splitting and
    /// trimming of comma-separated input ends here; the engine only ever
    /// sees clean sequences.
    pub fn into_config(self) -> Result<Config, ConfigError> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(token) = self.token {
            config.token = token;
        }
        if let Some(policy) = self.policy {
            config.plugin = policy;
        }
        if let Some(reviewers) = self.reviewers {
            config.reviews = reviewers;
        }
        if let Some(owner) = self.owner {
            config.owners.name = owner;
        }
        if let Some(repos) = self.repos {
            config.owners.repos = repos;
        }
        for (org, repos) in self.orgs {
            config.orgs.insert(org, repos);
        }
        if let Some(every) = self.every {
            config.dispatch = Dispatch::Every(every);
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }

        Ok(config)
    }
}

fn parse_org(s: &str) -> Result<(String, Vec<String>), String> {
    let (name, repos) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=repo1,repo2, got '{}'", s))?;

    let name = name.trim().to_string();
    if name.is_empty() {
        return Err("organization name must not be empty".to_string());
    }

    let repos: Vec<String> = repos
        .split(',')
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .collect();
    if repos.is_empty() {
        return Err(format!("no repositories listed for organization '{}'", name));
    }

    Ok((name, repos))
}
