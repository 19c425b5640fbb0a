use crate::config::cli::Args;
use crate::error::{Result, ScrapeError};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, Level};

pub(crate) mod cli;

#[derive(Debug, Clone, Deserialize)]
pub struct UrlList {
    pub urls: Vec<String>,
}

impl UrlList {
    pub fn load(path: &Path) -> Result<Self> {
        let list: UrlList = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        info!("Loaded {} contest URLs from {:?}", list.urls.len(), path);
        Ok(list)
    }
}

pub struct Config {
    pub args: Args,
    pub url_list: UrlList,
}

impl Config {
    pub fn new(args: Args) -> Result<Self> {
        let url_list = UrlList::load(&args.urls_file)?;
        Ok(Self { args, url_list })
    }

    pub fn ready_timeout(&self) -> Duration {
        Duration::from_secs(self.args.ready_timeout_secs)
    }

    pub fn settle_timeout(&self) -> Duration {
        Duration::from_secs(self.args.settle_timeout_secs)
    }
}

pub fn parse_log_level(level: &str) -> Result<Level> {
    Level::from_str(level)
        .map_err(|_| ScrapeError::Config(format!("unknown log level '{}'", level)))
}
