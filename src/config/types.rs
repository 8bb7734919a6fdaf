use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use super::defaults::*;

/// The wire shape accepted from the caller. Field names are the contract;
/// the extra engine knobs all have defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Name of the assignment policy to run.
    #[serde(default)]
    pub plugin: String,

    /// Provider access token.
    #[serde(default)]
    pub token: String,

    #[serde(default)]
    pub owners: Owner,

    /// Candidate reviewer identifiers, in priority order.
    #[serde(default)]
    pub reviews: Vec<String>,

    #[serde(default)]
    pub dispatch: Dispatch,

    /// Organization name -> repositories under it. BTreeMap keeps the
    /// resolved scope order deterministic.
    #[serde(default)]
    pub orgs: BTreeMap<String, Vec<String>>,

    /// Max parallel submissions per run.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    #[serde(default)]
    pub retry: RetryConfig,

    /// Seed for the random policy; omit for non-deterministic picks.
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default = "default_api_base")]
    pub api_base: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Owner {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub repos: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
        }
    }
}

/// Which command the configuration is being validated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    OneShot,
    Recurring,
}

/// Scheduling input: the `"now"` sentinel, or an interval in minutes.
///
/// The wire value is a string or an integer; `done` ignores it, `create`
/// requires a strictly positive interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Dispatch {
    #[default]
    Now,
    Every(u64),
}

impl Dispatch {
    pub fn interval_minutes(&self) -> Option<u64> {
        match self {
            Dispatch::Now => None,
            Dispatch::Every(m) => Some(*m),
        }
    }
}

impl fmt::Display for Dispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dispatch::Now => write!(f, "now"),
            Dispatch::Every(m) => write!(f, "every {}m", m),
        }
    }
}

impl Serialize for Dispatch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Dispatch::Now => serializer.serialize_str("now"),
            Dispatch::Every(m) => serializer.serialize_u64(*m),
        }
    }
}

impl<'de> Deserialize<'de> for Dispatch {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DispatchVisitor;

        impl<'de> Visitor<'de> for DispatchVisitor {
            type Value = Dispatch;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("\"now\" or a number of minutes")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Dispatch, E> {
                Ok(Dispatch::Every(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Dispatch, E> {
                u64::try_from(v)
                    .map(Dispatch::Every)
                    .map_err(|_| E::custom("dispatch interval must not be negative"))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Dispatch, E> {
                let v = v.trim();
                if v.eq_ignore_ascii_case("now") {
                    return Ok(Dispatch::Now);
                }
                v.parse::<u64>().map(Dispatch::Every).map_err(|_| {
                    E::custom(format!("dispatch must be \"now\" or minutes, got '{}'", v))
                })
            }
        }

        deserializer.deserialize_any(DispatchVisitor)
    }
}
