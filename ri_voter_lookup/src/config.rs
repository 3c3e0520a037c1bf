//! Optional run settings, read from `config.toml` in the working directory.

use std::path::Path;
use std::time::Duration;
use anyhow::Context;
use serde::{Serialize,Deserialize};

pub const CONFIG_FILE_NAME: &str = "config.toml";

const DEFAULT_USER_AGENT : &str = "ri-voter-lookup/0.1 (member district lookup)";

#[derive(Serialize,Deserialize,Debug,Clone,PartialEq,Eq)]
#[serde(default)]
pub struct Config {
    /// Seconds to wait between consecutive lookups in recursive mode.
    pub delay_seconds : u64,
    /// Exclusive upper bound on the member index reached in recursive mode, unless `--max` is given.
    pub max_queries : usize,
    pub user_agent : String,
    /// If absent, a hung request stalls the run.
    pub request_timeout_seconds : Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            delay_seconds: 5,
            max_queries: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_seconds: None,
        }
    }
}

impl Config {
    pub fn delay(&self) -> Duration { Duration::from_secs(self.delay_seconds) }
    pub fn request_timeout(&self) -> Option<Duration> { self.request_timeout_seconds.map(Duration::from_secs) }

    pub fn from_toml(text:&str) -> anyhow::Result<Config> {
        Ok(toml::de::from_str(text)?)
    }

    /// Read the config file if present. A missing file means all defaults; a malformed one is an error.
    pub fn load(path:&Path) -> anyhow::Result<Config> {
        if !path.exists() { return Ok(Config::default()); }
        let text = std::fs::read_to_string(path).with_context(||format!("Could not read {}",path.display()))?;
        Config::from_toml(&text).with_context(||format!("Could not parse {}",path.display()))
    }
}
