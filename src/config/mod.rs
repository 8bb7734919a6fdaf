mod defaults;
mod types;

pub use types::*;

use crate::error::ConfigError;
use crate::policy;
use defaults::*;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

impl Default for Config {
    fn default() -> Self {
        Self {
            plugin: String::new(),
            token: String::new(),
            owners: Owner::default(),
            reviews: Vec::new(),
            dispatch: Dispatch::Now,
            orgs: BTreeMap::new(),
            concurrency: default_concurrency(),
            retry: RetryConfig::default(),
            seed: None,
            api_base: default_api_base(),
        }
    }
}

impl Config {
    /// Load config from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Trim every repository and reviewer entry, drop empties, and
    /// de-duplicate preserving first occurrence. Organizations left with no
    /// repositories (or a blank name) are removed entirely.
    pub fn normalize(&mut self) {
        clean_list(&mut self.reviews);
        self.owners.name = self.owners.name.trim().to_string();
        clean_list(&mut self.owners.repos);

        let orgs = std::mem::take(&mut self.orgs);
        for (name, mut repos) in orgs {
            let name = name.trim().to_string();
            clean_list(&mut repos);
            if !name.is_empty() && !repos.is_empty() {
                self.orgs.insert(name, repos);
            }
        }
    }

    /// Validate for the requested mode; the first violated field wins.
    pub fn validate(&self, mode: RunMode) -> Result<(), ConfigError> {
        if self.token.is_empty() {
            return Err(ConfigError::EmptyToken);
        }

        if self.plugin.is_empty() {
            return Err(ConfigError::EmptyPlugin);
        }

        if !policy::is_registered(&self.plugin) {
            return Err(ConfigError::UnknownPolicy(self.plugin.clone()));
        }

        if self.reviews.is_empty() {
            return Err(ConfigError::NoReviewers);
        }

        let owner_in_scope = !self.owners.name.is_empty() && !self.owners.repos.is_empty();
        let orgs_in_scope = self.orgs.values().any(|repos| !repos.is_empty());
        if !owner_in_scope && !orgs_in_scope {
            return Err(ConfigError::EmptyScope);
        }

        // `done` ignores the dispatch field; only a recurring registration
        // needs a real interval.
        if mode == RunMode::Recurring && !matches!(self.dispatch, Dispatch::Every(m) if m > 0) {
            return Err(ConfigError::InvalidInterval);
        }

        Ok(())
    }
}

fn clean_list(items: &mut Vec<String>) {
    let mut seen = HashSet::new();
    let cleaned: Vec<String> = items
        .drain(..)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.clone()))
        .collect();
    *items = cleaned;
}
