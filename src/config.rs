//! Support for library configuration options

use std::sync::{Arc, Mutex};
use once_cell::sync::Lazy;
use url::Url;

use crate::error::{Result, TrackerError};

/// The commit message used when the tracker is pushed to a repository.
/// Feel free to override it when initing this library.
pub static COMMIT_MESSAGE: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("Update tracker".to_string())));

/// The `User-Agent` header sent to the remote API (GitHub rejects requests without one).
/// Feel free to override it when initing this library.
pub static USER_AGENT: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new(format!("weekly-tracker/{}", env!("CARGO_PKG_VERSION")))));

pub const DEFAULT_API_URL: &str = "https://api.github.com/";
pub const DEFAULT_PATH: &str = "tracker.json";
pub const DEFAULT_BRANCH: &str = "main";

/// Read the current value of one of the overridable settings of this module
pub fn get(setting: &Lazy<Arc<Mutex<String>>>) -> String {
    match setting.lock() {
        Ok(value) => value.clone(),
        // a poisoned mutex still holds a valid String
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}


/// Where the tracker is stored in a remote repository
#[derive(Clone, Debug, PartialEq)]
pub struct RemoteConfig {
    pub api_url: Url,
    pub owner: String,
    pub repo: String,
    /// Path of the document in the repository
    pub path: String,
    pub branch: String,
    pub token: Option<String>,
}

impl RemoteConfig {
    pub fn new<O: ToString, R: ToString>(owner: O, repo: R) -> Result<Self> {
        let api_url = Url::parse(DEFAULT_API_URL)
            .map_err(|err| TrackerError::Config(format!("Invalid API URL: {}", err)))?;
        Ok(Self {
            api_url,
            owner: owner.to_string(),
            repo: repo.to_string(),
            path: DEFAULT_PATH.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            token: None,
        })
    }

    /// Build a configuration from the `TRACKER_GITHUB_*` environment variables.
    ///
    /// `TRACKER_GITHUB_OWNER` and `TRACKER_GITHUB_REPO` are required.
    /// `TRACKER_GITHUB_TOKEN`, `TRACKER_GITHUB_PATH`, `TRACKER_GITHUB_BRANCH` and `TRACKER_GITHUB_API` are optional.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| value.trim().is_empty() == false);
        let required = |name: &str| non_empty(name)
            .ok_or_else(|| TrackerError::Config(format!("Missing environment variable {}", name)));

        let mut config = Self::new(required("TRACKER_GITHUB_OWNER")?, required("TRACKER_GITHUB_REPO")?)?;
        config.token = non_empty("TRACKER_GITHUB_TOKEN");
        if let Some(path) = non_empty("TRACKER_GITHUB_PATH") {
            config.path = path;
        }
        if let Some(branch) = non_empty("TRACKER_GITHUB_BRANCH") {
            config.branch = branch;
        }
        if let Some(api) = non_empty("TRACKER_GITHUB_API") {
            config.api_url = Url::parse(&api)
                .map_err(|err| TrackerError::Config(format!("Invalid TRACKER_GITHUB_API {:?}: {}", api, err)))?;
        }
        Ok(config)
    }
}
