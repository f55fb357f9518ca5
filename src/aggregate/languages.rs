use std::collections::HashMap;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, instrument, warn};

use super::colors::language_color;
use super::types::LanguageEntry;
use super::with_deadline;
use crate::config::Limits;
use crate::github::{fetch_languages, ApiError, GithubApi, LanguageMap, Repository};

/// Build the language distribution for the first `limits.language_repos` repositories.
///
/// All requests go out as one batch and are awaited together. A repository
/// whose request fails contributes nothing; the failure is logged and
/// never returned.
#[instrument(skip_all, fields(username = %username))]
pub async fn aggregate_languages<A: GithubApi + ?Sized>(
    api: &A,
    repos: &[Repository],
    username: &str,
    limits: &Limits,
    deadline: Option<Duration>,
) -> Vec<LanguageEntry> {
    let batch: Vec<&Repository> = repos.iter().take(limits.language_repos).collect();
    debug!(repos = batch.len(), "fetching language bytes");

    let results = join_all(
        batch
            .iter()
            .map(|repo| with_deadline(repo, deadline, fetch_languages(api, repo))),
    )
    .await;

    for (repo, result) in batch.iter().zip(&results) {
        if let Err(err) = result {
            warn!(repo = %repo.name, error = %err, "language fetch failed, skipping repository");
        }
    }

    let entries = merge_language_maps(results, limits.top_languages);
    debug!(languages = entries.len(), "language distribution ready");
    entries
}

/// Merge per-repository language maps into a ranked, truncated distribution.
///
/// `Err` entries count as empty maps. Languages are ranked by summed bytes;
/// equal totals keep first-seen order. Percentages are relative to the
/// retained `top_n` entries, so they sum to ~100 even after truncation.
pub fn merge_language_maps<I>(results: I, top_n: usize) -> Vec<LanguageEntry>
where
    I: IntoIterator<Item = Result<LanguageMap, ApiError>>,
{
    let mut merged: Vec<(String, u64)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for map in results.into_iter().filter_map(Result::ok) {
        for (name, bytes) in map {
            match index.get(&name) {
                Some(&slot) => merged[slot].1 = merged[slot].1.saturating_add(bytes),
                None => {
                    index.insert(name.clone(), merged.len());
                    merged.push((name, bytes));
                }
            }
        }
    }

    merged.sort_by(|a, b| b.1.cmp(&a.1));
    merged.truncate(top_n);

    // Summed as f64 so totals past u64::MAX still normalize correctly.
    let total: f64 = merged.iter().map(|(_, bytes)| *bytes as f64).sum();
    if total == 0.0 {
        return Vec::new();
    }

    merged
        .into_iter()
        .map(|(name, bytes)| {
            let percentage = (bytes as f64 / total * 1000.0).round() / 10.0;
            let color = language_color(&name);
            LanguageEntry {
                name,
                bytes,
                percentage,
                color,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::colors::FALLBACK_COLOR;
    use crate::github::fake::{repo, FakeApi};
    use serde_json::json;

    fn map(pairs: &[(&str, u64)]) -> LanguageMap {
        pairs.iter().map(|(n, b)| (n.to_string(), *b)).collect()
    }

    #[test]
    fn test_merge_two_repositories() {
        let entries = merge_language_maps(
            vec![Ok(map(&[("JS", 300), ("TS", 100)])), Ok(map(&[("JS", 100)]))],
            8,
        );
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "JS");
        assert_eq!(entries[0].bytes, 400);
        assert_eq!(entries[0].percentage_label(), "80.0");
        assert_eq!(entries[1].name, "TS");
        assert_eq!(entries[1].bytes, 100);
        assert_eq!(entries[1].percentage_label(), "20.0");
    }

    #[test]
    fn test_empty_input_returns_empty() {
        assert!(merge_language_maps(Vec::new(), 8).is_empty());
        assert!(merge_language_maps(vec![Ok(LanguageMap::new())], 8).is_empty());
        assert!(merge_language_maps(vec![Ok(map(&[("Rust", 0)]))], 8).is_empty());
    }

    #[test]
    fn test_errors_count_as_empty() {
        let with_failure = merge_language_maps(
            vec![
                Ok(map(&[("Rust", 700)])),
                Err(ApiError::RequestFailed { status: 500 }),
                Ok(map(&[("Go", 300)])),
            ],
            8,
        );
        let without = merge_language_maps(vec![Ok(map(&[("Rust", 700)])), Ok(map(&[("Go", 300)]))], 8);
        assert_eq!(with_failure, without);
    }

    #[test]
    fn test_truncates_and_normalizes_over_retained_subset() {
        let langs: Vec<(String, u64)> = (0..12).map(|i| (format!("Lang{:02}", i), 1000 - i * 10)).collect();
        let input: LanguageMap = langs.into_iter().collect();
        let entries = merge_language_maps(vec![Ok(input)], 8);

        assert_eq!(entries.len(), 8);
        assert_eq!(entries[0].name, "Lang00");
        assert!(entries.windows(2).all(|w| w[0].bytes >= w[1].bytes));
        let sum: f64 = entries.iter().map(|e| e.percentage).sum();
        assert!((sum - 100.0).abs() <= 0.1 * entries.len() as f64, "sum was {}", sum);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let entries = merge_language_maps(
            vec![Ok(map(&[("Zig", 50)])), Ok(map(&[("Ada", 50)]))],
            8,
        );
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Zig", "Ada"]);
        let again = merge_language_maps(
            vec![Ok(map(&[("Zig", 50)])), Ok(map(&[("Ada", 50)]))],
            8,
        );
        assert_eq!(entries, again);
    }

    #[test]
    fn test_huge_byte_counts_saturate() {
        let entries = merge_language_maps(
            vec![
                Ok(map(&[("Assembly", u64::MAX)])),
                Ok(map(&[("Assembly", 1), ("C", u64::MAX)])),
            ],
            8,
        );
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].bytes, u64::MAX);
        assert_eq!(entries[1].bytes, u64::MAX);
        assert_eq!(entries[0].percentage, 50.0);
        assert_eq!(entries[1].percentage, 50.0);
    }

    #[test]
    fn test_colors_attached() {
        let entries = merge_language_maps(vec![Ok(map(&[("Rust", 2), ("Mystery", 1)]))], 8);
        assert_eq!(entries[0].color, "#dea584");
        assert_eq!(entries[1].color, FALLBACK_COLOR);
    }

    #[tokio::test]
    async fn test_aggregate_only_samples_first_repos_and_survives_failures() {
        let repos: Vec<Repository> = (0..12).map(|i| repo(&format!("r{}", i), 100 - i)).collect();
        let mut api = FakeApi::new()
            .with_ok("/repos/octocat/r0/languages", json!({ "Rust": 600 }))
            .with_status("/repos/octocat/r1/languages", 500)
            .with_rate_limit("/repos/octocat/r2/languages", None)
            .with_ok("/repos/octocat/r3/languages", json!({ "Go": 400 }))
            .with_ok("/repos/octocat/r11/languages", json!({ "Cobol": 99999 }));
        for i in 4..10 {
            api = api.with_ok(&format!("/repos/octocat/r{}/languages", i), json!({}));
        }

        let entries = aggregate_languages(&api, &repos, "octocat", &Limits::default(), None).await;

        let requested = api.requested();
        assert_eq!(requested.len(), 10);
        assert!(!requested.iter().any(|p| p.contains("/r10/") || p.contains("/r11/")));

        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Rust", "Go"]);
        assert_eq!(entries[0].percentage, 60.0);
        assert_eq!(entries[1].percentage, 40.0);
    }

    #[tokio::test]
    async fn test_aggregate_order_independent_of_completion_order() {
        let repos = vec![repo("slow", 2), repo("fast", 1)];
        let api = FakeApi::new()
            .with_delayed(
                "/repos/octocat/slow/languages",
                Duration::from_millis(30),
                json!({ "C": 10 }),
            )
            .with_ok("/repos/octocat/fast/languages", json!({ "Python": 30 }));

        let entries = aggregate_languages(&api, &repos, "octocat", &Limits::default(), None).await;
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Python", "C"]);
    }

    #[tokio::test]
    async fn test_aggregate_stalled_repo_degrades_to_empty() {
        let repos = vec![repo("stuck", 5), repo("ok", 1)];
        let api = FakeApi::new()
            .with_hang("/repos/octocat/stuck/languages")
            .with_ok("/repos/octocat/ok/languages", json!({ "Rust": 1 }));

        let entries = aggregate_languages(
            &api,
            &repos,
            "octocat",
            &Limits::default(),
            Some(Duration::from_millis(30)),
        )
        .await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Rust");
        assert_eq!(entries[0].percentage, 100.0);
    }
}
