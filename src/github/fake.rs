//! Scripted `GithubApi` used by unit tests across the crate.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::{ApiError, GithubApi, RateLimitInfo, Repository};

#[derive(Clone)]
enum Scripted {
    Ok(Value),
    Delayed(Duration, Value),
    NotFound,
    RateLimited(Option<RateLimitInfo>),
    Status(u16),
    Hang,
}

/// Answers from a fixed path -> response table and records every path asked for.
/// Unscripted paths answer 404.
#[derive(Default)]
pub struct FakeApi {
    responses: HashMap<String, Scripted>,
    requested: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ok(mut self, path: &str, body: Value) -> Self {
        self.responses.insert(path.to_string(), Scripted::Ok(body));
        self
    }

    pub fn with_delayed(mut self, path: &str, delay: Duration, body: Value) -> Self {
        self.responses
            .insert(path.to_string(), Scripted::Delayed(delay, body));
        self
    }

    pub fn with_not_found(mut self, path: &str) -> Self {
        self.responses.insert(path.to_string(), Scripted::NotFound);
        self
    }

    pub fn with_rate_limit(mut self, path: &str, reset: Option<RateLimitInfo>) -> Self {
        self.responses
            .insert(path.to_string(), Scripted::RateLimited(reset));
        self
    }

    pub fn with_status(mut self, path: &str, status: u16) -> Self {
        self.responses.insert(path.to_string(), Scripted::Status(status));
        self
    }

    pub fn with_hang(mut self, path: &str) -> Self {
        self.responses.insert(path.to_string(), Scripted::Hang);
        self
    }

    /// Paths requested so far, in call order.
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl GithubApi for FakeApi {
    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.requested.lock().unwrap().push(path.to_string());
        let scripted = self.responses.get(path).cloned();
        match scripted {
            Some(Scripted::Ok(body)) => Ok(body),
            Some(Scripted::Delayed(delay, body)) => {
                tokio::time::sleep(delay).await;
                Ok(body)
            }
            Some(Scripted::RateLimited(reset)) => Err(ApiError::RateLimited { reset }),
            Some(Scripted::Status(status)) => Err(ApiError::RequestFailed { status }),
            Some(Scripted::Hang) => futures::future::pending().await,
            Some(Scripted::NotFound) | None => Err(ApiError::NotFound {
                path: path.to_string(),
            }),
        }
    }
}

/// Repository owned by "octocat" with the given star count.
pub fn repo(name: &str, stars: u64) -> Repository {
    Repository {
        name: name.to_string(),
        owner: "octocat".to_string(),
        stargazers_count: stars,
        forks_count: 0,
        description: None,
        fork: false,
        html_url: format!("https://github.com/octocat/{}", name),
    }
}

pub fn fork(name: &str, stars: u64) -> Repository {
    Repository {
        fork: true,
        ..repo(name, stars)
    }
}
