use crate::config::Config;
use std::collections::HashSet;
use std::fmt;

/// One resolved unit of work: a repository under the account that controls
/// it (the direct owner or an organization).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopeTarget {
    pub owner: String,
    pub repo: String,
}

impl ScopeTarget {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

impl fmt::Display for ScopeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// One policy decision: the reviewers chosen for a repository. Immutable
/// once produced and consumed exactly once by the provider client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub target: ScopeTarget,
    pub reviewers: Vec<String>,
}

/// Expand the owner's repositories and every organization's repositories
/// into a flat, de-duplicated sequence: owner repos first in input order,
/// then org repos grouped by organization (map order), repos in input order
/// within each. Duplicate (owner, repo) pairs keep their first occurrence.
pub fn resolve_targets(config: &Config) -> Vec<ScopeTarget> {
    let mut seen: HashSet<ScopeTarget> = HashSet::new();
    let mut targets = Vec::new();

    if !config.owners.name.is_empty() {
        for repo in &config.owners.repos {
            push_unique(&mut targets, &mut seen, ScopeTarget::new(&config.owners.name, repo));
        }
    }

    for (org, repos) in &config.orgs {
        for repo in repos {
            push_unique(&mut targets, &mut seen, ScopeTarget::new(org, repo));
        }
    }

    targets
}

fn push_unique(targets: &mut Vec<ScopeTarget>, seen: &mut HashSet<ScopeTarget>, t: ScopeTarget) {
    if seen.insert(t.clone()) {
        targets.push(t);
    }
}
