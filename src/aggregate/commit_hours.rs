use std::time::Duration;

use chrono::{Local, TimeZone, Timelike, Utc};
use futures::future::join_all;
use tracing::{debug, instrument, warn};

use super::types::CommitHourHistogram;
use super::with_deadline;
use crate::config::{HourZone, Limits};
use crate::github::{fetch_commits, ApiError, CommitRecord, GithubApi, Repository};

/// Histogram of recent commit hours over the first `limits.commit_repos`
/// repositories. With `limits.own_commits_only`, only commits authored by
/// `username` are requested.
///
/// Failed repositories contribute no commits. The result always has 24 buckets.
#[instrument(skip_all, fields(username = %username, zone = ?zone))]
pub async fn aggregate_commit_hours<A: GithubApi + ?Sized>(
    api: &A,
    repos: &[Repository],
    username: &str,
    limits: &Limits,
    zone: HourZone,
    deadline: Option<Duration>,
) -> CommitHourHistogram {
    let batch: Vec<&Repository> = repos.iter().take(limits.commit_repos).collect();
    debug!(repos = batch.len(), per_repo = limits.commits_per_repo, "fetching recent commits");

    let author = limits.own_commits_only.then_some(username);
    let results = join_all(batch.iter().map(|repo| {
        with_deadline(
            repo,
            deadline,
            fetch_commits(api, repo, author, limits.commits_per_repo),
        )
    }))
    .await;

    for (repo, result) in batch.iter().zip(&results) {
        if let Err(err) = result {
            warn!(repo = %repo.name, error = %err, "commit fetch failed, skipping repository");
        }
    }

    let histogram = match zone {
        HourZone::Local => bucket_commit_hours(results, &Local),
        HourZone::Utc => bucket_commit_hours(results, &Utc),
    };
    debug!(commits = histogram.total(), peak = ?histogram.peak_hour(), "commit hours ready");
    histogram
}

/// Count commits by author hour in `tz`. `Err` entries and commits without
/// a parseable author date are skipped.
pub fn bucket_commit_hours<I, Tz>(results: I, tz: &Tz) -> CommitHourHistogram
where
    I: IntoIterator<Item = Result<Vec<CommitRecord>, ApiError>>,
    Tz: TimeZone,
{
    let mut histogram = CommitHourHistogram::new();
    results
        .into_iter()
        .filter_map(Result::ok)
        .flatten()
        .filter_map(|commit| commit.authored_at())
        .for_each(|at| histogram.record(at.with_timezone(tz).hour()));
    histogram
}
