pub mod types;

pub use types::{Dashboard, DerivedStats, ProfileSummary, QueryPhase};

use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::aggregate::{aggregate_commit_hours, aggregate_languages};
use crate::config::{Config, HourZone, Limits};
use crate::github::{
    fetch_profile, fetch_repositories, validate_username, ApiError, GithubApi, Profile, Repository,
    UsernameError,
};

/// Terminal failure of a query. Only validation and the profile/repository
/// fetches can produce one; per-repository failures are absorbed earlier.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Invalid username: {0}")]
    Validation(#[from] UsernameError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    RateLimited,
    RequestFailed,
    Network,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Validation => write!(f, "VALIDATION"),
            ErrorKind::NotFound => write!(f, "NOT FOUND"),
            ErrorKind::RateLimited => write!(f, "RATE LIMITED"),
            ErrorKind::RequestFailed => write!(f, "REQUEST FAILED"),
            ErrorKind::Network => write!(f, "NETWORK"),
        }
    }
}

impl QueryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            QueryError::Validation(_) => ErrorKind::Validation,
            QueryError::Api(ApiError::NotFound { .. }) => ErrorKind::NotFound,
            QueryError::Api(ApiError::RateLimited { .. }) => ErrorKind::RateLimited,
            QueryError::Api(ApiError::RequestFailed { .. }) => ErrorKind::RequestFailed,
            QueryError::Api(_) => ErrorKind::Network,
        }
    }

    /// Message for the person at the terminal. `now` anchors the rate-limit wait estimate.
    pub fn user_message(&self, now: DateTime<Utc>) -> String {
        match self {
            QueryError::Validation(err) => err.to_string(),
            QueryError::Api(ApiError::NotFound { .. }) => "GitHub user not found.".to_string(),
            QueryError::Api(ApiError::RateLimited { reset: Some(info) }) => info.wait_message(now),
            QueryError::Api(ApiError::RateLimited { reset: None }) => {
                "GitHub API rate limit exceeded. Please try again later.".to_string()
            }
            QueryError::Api(ApiError::RequestFailed { status }) => {
                format!("GitHub API request failed (HTTP {}).", status)
            }
            QueryError::Api(err) => err.to_string(),
        }
    }
}

/// Rendering collaborator notified at each checkpoint of a query.
pub trait DashboardSink {
    /// A new query begins; any previous output or error should be discarded.
    fn query_started(&mut self, username: &str);

    fn phase_changed(&mut self, phase: QueryPhase);

    /// Profile and repository summary are ready, before the derived stats.
    fn profile_ready(&mut self, summary: &ProfileSummary);

    fn derived_ready(&mut self, derived: &DerivedStats);

    fn failed(&mut self, error: &QueryError);
}

/// Drives one query at a time against a `GithubApi`.
pub struct Pipeline<A> {
    api: A,
    limits: Limits,
    hour_zone: HourZone,
    aux_timeout: Option<Duration>,
}

impl<A: GithubApi> Pipeline<A> {
    pub fn new(api: A, config: &Config) -> Self {
        Self {
            api,
            limits: config.limits.clone(),
            hour_zone: config.display.hour_zone,
            aux_timeout: config.api.aux_timeout(),
        }
    }

    #[cfg(test)]
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Run a full query for `username`, reporting progress to `sink`.
    ///
    /// The profile and repository list are fetched in order and both must
    /// succeed. The summary is then handed to the sink before the language
    /// and commit-hour aggregators run concurrently. The aggregators cannot fail.
    #[instrument(skip(self, sink))]
    pub async fn run_query<S>(&self, username: &str, sink: &mut S) -> Result<Dashboard, QueryError>
    where
        S: DashboardSink + ?Sized,
    {
        sink.query_started(username);
        sink.phase_changed(QueryPhase::Idle);

        let username = match validate_username(username) {
            Ok(name) => name,
            Err(err) => {
                let err = QueryError::from(err);
                warn!(error = %err, "rejected username");
                sink.failed(&err);
                return Err(err);
            }
        };

        let (profile, repos) = match self.fetch_load_bearing(username, sink).await {
            Ok(fetched) => fetched,
            Err(err) => {
                let err = QueryError::from(err);
                warn!(kind = %err.kind(), error = %err, "query aborted");
                sink.phase_changed(QueryPhase::Errored);
                sink.failed(&err);
                return Err(err);
            }
        };

        let summary = summarize(profile, &repos, self.limits.top_repos);
        info!(
            repos = summary.repo_count,
            stars = summary.total_stars,
            "profile ready"
        );
        sink.phase_changed(QueryPhase::ProfileReady);
        sink.profile_ready(&summary);

        sink.phase_changed(QueryPhase::AggregatingDerived);
        let (languages, commit_hours) = tokio::join!(
            aggregate_languages(&self.api, &repos, username, &self.limits, self.aux_timeout),
            aggregate_commit_hours(
                &self.api,
                &repos,
                username,
                &self.limits,
                self.hour_zone,
                self.aux_timeout
            ),
        );
        let derived = DerivedStats {
            languages,
            commit_hours,
        };
        info!(
            languages = derived.languages.len(),
            commits = derived.commit_hours.total(),
            "derived stats ready"
        );
        sink.derived_ready(&derived);
        sink.phase_changed(QueryPhase::Complete);

        Ok(Dashboard { summary, derived })
    }

    async fn fetch_load_bearing<S>(
        &self,
        username: &str,
        sink: &mut S,
    ) -> Result<(Profile, Vec<Repository>), ApiError>
    where
        S: DashboardSink + ?Sized,
    {
        sink.phase_changed(QueryPhase::FetchingProfile);
        let profile = fetch_profile(&self.api, username).await?;
        debug!(login = %profile.login, public_repos = profile.public_repos, "fetched profile");

        sink.phase_changed(QueryPhase::FetchingRepos);
        let repos = fetch_repositories(&self.api, username, self.limits.repos_per_page).await?;
        Ok((profile, repos))
    }
}

/// Non-fork repositories, first `n` in their existing order.
pub fn select_top_repositories(repos: &[Repository], n: usize) -> Vec<Repository> {
    repos.iter().filter(|r| !r.fork).take(n).cloned().collect()
}

fn summarize(profile: Profile, repos: &[Repository], top_n: usize) -> ProfileSummary {
    ProfileSummary {
        profile,
        total_stars: repos.iter().map(|r| r.stargazers_count).sum(),
        total_forks: repos.iter().map(|r| r.forks_count).sum(),
        repo_count: repos.len(),
        top_repositories: select_top_repositories(repos, top_n),
    }
}
