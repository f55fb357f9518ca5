pub mod colors;
pub mod commit_hours;
pub mod languages;
pub mod types;

pub use commit_hours::aggregate_commit_hours;
pub use languages::aggregate_languages;
pub use types::{CommitHourHistogram, LanguageEntry};

use std::future::Future;
use std::time::Duration;

use crate::github::{ApiError, Repository};

/// Await a per-repository fetch, turning an expired deadline into `ApiError::Timeout`.
pub(crate) async fn with_deadline<T, F>(
    repo: &Repository,
    deadline: Option<Duration>,
    fetch: F,
) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    let Some(after) = deadline else {
        return fetch.await;
    };
    match tokio::time::timeout(after, fetch).await {
        Ok(result) => result,
        Err(_) => Err(ApiError::Timeout {
            path: format!("{}/{}", repo.owner, repo.name),
            after,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::fake::repo;

    #[tokio::test]
    async fn test_deadline_expiry_is_timeout() {
        let result: Result<(), ApiError> = with_deadline(
            &repo("slow", 0),
            Some(Duration::from_millis(20)),
            futures::future::pending(),
        )
        .await;
        assert!(matches!(result, Err(ApiError::Timeout { path, .. }) if path == "octocat/slow"));
    }

    #[tokio::test]
    async fn test_no_deadline_passes_through() {
        let result = with_deadline(&repo("fast", 0), None, async { Ok::<_, ApiError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }
}
