//! This module provides a client to store the tracker document in a GitHub repository
//!
//! It uses the [contents API](https://docs.github.com/en/rest/repos/contents), that reads and commits single files.

use async_trait::async_trait;
use base64::Engine;
use reqwest::{Method, StatusCode};
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::{self, RemoteConfig};
use crate::error::{Result, TrackerError};
use crate::item::VersionTag;
use crate::traits::{RemoteDocument, RemoteStore};


#[derive(Deserialize)]
struct ContentsResponse {
    sha: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: String,
}

#[derive(Serialize)]
struct UpdateRequest<'a> {
    message: String,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Deserialize)]
struct UpdateResponse {
    content: UpdatedContent,
}

#[derive(Deserialize)]
struct UpdatedContent {
    sha: String,
}


/// A [`RemoteStore`] backed by a GitHub repository
#[derive(Debug)]
pub struct Client {
    api_url: Url,
    owner: String,
    repo: String,
    token: Option<String>,

    http: reqwest::Client,
}

impl Client {
    /// Create a client. This does not start a connection
    pub fn new<S: AsRef<str>, O: ToString, R: ToString>(api_url: S, owner: O, repo: R, token: Option<String>) -> Result<Self> {
        let api_url = Url::parse(api_url.as_ref())
            .map_err(|err| TrackerError::Config(format!("Invalid API URL {:?}: {}", api_url.as_ref(), err)))?;
        if api_url.cannot_be_a_base() {
            return Err(TrackerError::Config(format!("Invalid API URL {:?}", api_url.as_str())));
        }

        Ok(Self{
            api_url,
            owner: owner.to_string(),
            repo: repo.to_string(),
            token,
            http: reqwest::Client::new(),
        })
    }

    pub fn from_config(config: &RemoteConfig) -> Result<Self> {
        Self::new(config.api_url.as_str(), &config.owner, &config.repo, config.token.clone())
    }

    /// `{api}/repos/{owner}/{repo}/contents/{path}`
    fn contents_url(&self, path: &str) -> Result<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| TrackerError::Config(format!("Invalid API URL {:?}", self.api_url.as_str())))?
            .pop_if_empty()
            .push("repos")
            .push(&self.owner)
            .push(&self.repo)
            .push("contents")
            .extend(path.split('/').filter(|segment| segment.is_empty() == false));
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        let builder = self.http
            .request(method, url)
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, config::get(&config::USER_AGENT));

        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

#[async_trait]
impl RemoteStore for Client {
    async fn fetch(&mut self, path: &str, branch: &str) -> Result<Option<RemoteDocument>> {
        let mut url = self.contents_url(path)?;
        url.query_pairs_mut().append_pair("ref", branch);
        log::debug!("Fetching {}", url);

        let response = self.request(Method::GET, url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            log::debug!("{} does not exist on branch {}", path, branch);
            return Ok(None);
        }
        if response.status().is_success() == false {
            return Err(TrackerError::Transport(format!("Unexpected HTTP status code {:?} when fetching {}", response.status(), path)));
        }

        let contents: ContentsResponse = response.json().await?;
        if contents.encoding != "base64" {
            return Err(TrackerError::Transport(format!("Unsupported encoding {:?} for {} (is it a large file, or a folder?)", contents.encoding, path)));
        }
        // GitHub wraps the base64 text in lines
        let stripped: String = contents.content.chars().filter(|c| c.is_whitespace() == false).collect();
        let content = base64::engine::general_purpose::STANDARD.decode(stripped)
            .map_err(|err| TrackerError::Transport(format!("Invalid base64 content for {}: {}", path, err)))?;

        Ok(Some(RemoteDocument {
            content,
            version: VersionTag::from(contents.sha),
        }))
    }

    async fn push(&mut self, path: &str, branch: &str, content: Vec<u8>, known_version: Option<&VersionTag>) -> Result<VersionTag> {
        let url = self.contents_url(path)?;
        let body = UpdateRequest {
            message: config::get(&config::COMMIT_MESSAGE),
            content: base64::engine::general_purpose::STANDARD.encode(&content),
            branch,
            sha: known_version.map(|v| v.as_str()),
        };
        log::debug!("Pushing {} bytes to {} (previous version {:?})", content.len(), url, body.sha);

        let response = self.request(Method::PUT, url).json(&body).send().await?;
        match response.status() {
            StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                return Err(TrackerError::Transport(format!("{} has been changed on branch {} since it was fetched ({:?})", path, branch, response.status())));
            },
            status if status.is_success() == false => {
                return Err(TrackerError::Transport(format!("Unexpected HTTP status code {:?} when pushing {}", status, path)));
            },
            _ => (),
        }

        let updated: UpdateResponse = response.json().await?;
        Ok(VersionTag::from(updated.content.sha))
    }
}
