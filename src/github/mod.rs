pub mod types;
pub mod username;

#[cfg(test)]
pub mod fake;

pub use types::{CommitRecord, LanguageMap, Profile, RateLimitInfo, Repository};
pub use username::{validate_username, UsernameError};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, ACCEPT};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::ApiConfig;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("GitHub resource not found: {path}")]
    NotFound { path: String },

    #[error("GitHub API rate limit exceeded")]
    RateLimited { reset: Option<RateLimitInfo> },

    #[error("GitHub API request failed with status {status}")]
    RequestFailed { status: u16 },

    #[error("GitHub API request could not be sent: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected GitHub API response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("GitHub API request timed out after {after:?}: {path}")]
    Timeout { path: String, after: std::time::Duration },
}

/// Read-only access to the GitHub REST API.
///
/// `path` is everything after the base URL, including the leading slash
/// and any query string.
#[async_trait]
pub trait GithubApi: Send + Sync {
    async fn get(&self, path: &str) -> Result<Value, ApiError>;
}

/// Unauthenticated `GithubApi` over reqwest.
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl GithubApi for HttpClient {
    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET");
        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let err = classify_failure(path, status, response.headers());
            debug!(%url, status = status.as_u16(), error = %err, "request rejected");
            return Err(err);
        }

        let body = response.bytes().await?;
        debug!(%url, body_bytes = body.len(), "response received");
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Map a non-success response onto the error taxonomy.
///
/// 429 is always a rate limit. 403 counts as one only when GitHub reports
/// zero remaining requests; other 403s are plain request failures.
pub fn classify_failure(path: &str, status: StatusCode, headers: &HeaderMap) -> ApiError {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

    if status == StatusCode::NOT_FOUND {
        return ApiError::NotFound {
            path: path.to_string(),
        };
    }

    let quota_exhausted = header("x-ratelimit-remaining").map(str::trim) == Some("0");
    if status == StatusCode::TOO_MANY_REQUESTS || (status == StatusCode::FORBIDDEN && quota_exhausted) {
        return ApiError::RateLimited {
            reset: header("x-ratelimit-reset").and_then(RateLimitInfo::from_reset_header),
        };
    }

    ApiError::RequestFailed {
        status: status.as_u16(),
    }
}

async fn get_typed<A, T>(api: &A, path: &str) -> Result<T, ApiError>
where
    A: GithubApi + ?Sized,
    T: DeserializeOwned,
{
    let value = api.get(path).await?;
    Ok(serde_json::from_value(value)?)
}

#[instrument(skip(api))]
pub async fn fetch_profile<A: GithubApi + ?Sized>(api: &A, username: &str) -> Result<Profile, ApiError> {
    get_typed(api, &format!("/users/{}", username)).await
}

/// Fetch one page of a user's repositories, ranked by star count (descending).
///
/// This endpoint cannot sort by stars, so the page is requested by recent
/// update and sorted here. For users with more than `per_page` repositories,
/// a highly starred repository outside the most recently updated page is
/// missed. The sort is stable, so repositories with equal stars keep the
/// order GitHub returned them in.
#[instrument(skip(api))]
pub async fn fetch_repositories<A: GithubApi + ?Sized>(
    api: &A,
    username: &str,
    per_page: usize,
) -> Result<Vec<Repository>, ApiError> {
    let path = format!("/users/{}/repos?per_page={}&sort=updated", username, per_page);
    let mut repos: Vec<Repository> = get_typed(api, &path).await?;
    repos.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count));
    debug!(count = repos.len(), "fetched repositories");
    Ok(repos)
}

#[instrument(skip(api, repo), fields(repo = %repo.name))]
pub async fn fetch_languages<A: GithubApi + ?Sized>(
    api: &A,
    repo: &Repository,
) -> Result<LanguageMap, ApiError> {
    get_typed(api, &format!("/repos/{}/{}/languages", repo.owner, repo.name)).await
}

/// Most recent `per_page` commits of a repository, optionally only those by `author`.
#[instrument(skip(api, repo), fields(repo = %repo.name))]
pub async fn fetch_commits<A: GithubApi + ?Sized>(
    api: &A,
    repo: &Repository,
    author: Option<&str>,
    per_page: usize,
) -> Result<Vec<CommitRecord>, ApiError> {
    let mut path = format!("/repos/{}/{}/commits?per_page={}", repo.owner, repo.name, per_page);
    if let Some(author) = author {
        path.push_str(&format!("&author={}", author));
    }
    get_typed(api, &path).await
}
