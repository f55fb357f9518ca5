use crate::aggregate::{CommitHourHistogram, LanguageEntry};
use crate::github::{Profile, Repository};

/// Where a query currently stands.
///
/// `Idle -> FetchingProfile -> FetchingRepos -> ProfileReady -> AggregatingDerived -> Complete`,
/// with `Errored` reachable from the two fetch phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPhase {
    Idle,
    FetchingProfile,
    FetchingRepos,
    ProfileReady,
    AggregatingDerived,
    Complete,
    Errored,
}

impl std::fmt::Display for QueryPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            QueryPhase::Idle => "idle",
            QueryPhase::FetchingProfile => "fetching profile",
            QueryPhase::FetchingRepos => "fetching repositories",
            QueryPhase::ProfileReady => "profile ready",
            QueryPhase::AggregatingDerived => "aggregating languages and commit hours",
            QueryPhase::Complete => "complete",
            QueryPhase::Errored => "errored",
        };
        f.write_str(label)
    }
}

/// Everything available once the profile and repository list are in.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSummary {
    pub profile: Profile,
    /// Stars across every fetched repository, forks included
    pub total_stars: u64,
    pub total_forks: u64,
    /// Number of repositories in the fetched page
    pub repo_count: usize,
    /// Highest-starred non-fork repositories, for display
    pub top_repositories: Vec<Repository>,
}

/// Aggregates that need the per-repository fan-out.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedStats {
    pub languages: Vec<LanguageEntry>,
    pub commit_hours: CommitHourHistogram,
}

/// Immutable result of one successful query.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub summary: ProfileSummary,
    pub derived: DerivedStats,
}
