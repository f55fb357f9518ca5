use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

/// Language name -> bytes of code, as returned by `/repos/{owner}/{repo}/languages`.
pub type LanguageMap = BTreeMap<String, u64>;

/// Public profile of a GitHub user from `/users/{username}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Profile {
    /// Login handle (e.g., "torvalds")
    pub login: String,
    /// Display name, if the user set one
    pub name: Option<String>,
    /// Avatar image URL
    pub avatar_url: String,
    /// Profile page URL
    #[serde(default)]
    pub html_url: String,
    /// Free-form bio
    pub bio: Option<String>,
    #[serde(default)]
    pub public_repos: u32,
    #[serde(default)]
    pub followers: u32,
    #[serde(default)]
    pub following: u32,
}

impl Profile {
    /// Display name when set, otherwise the login.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.login)
    }
}

/// A repository entry from `/users/{username}/repos`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Repository {
    pub name: String,
    /// Owner login, flattened from `owner.login`
    #[serde(deserialize_with = "owner_login")]
    pub owner: String,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    pub description: Option<String>,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub html_url: String,
}

fn owner_login<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Owner {
        login: String,
    }

    Ok(Owner::deserialize(deserializer)?.login)
}

/// One element of `/repos/{owner}/{repo}/commits`.
///
/// Every level is optional: a commit without an author date is skipped
/// by the hour histogram rather than failing the whole page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CommitRecord {
    #[serde(default)]
    pub commit: Option<CommitDetail>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CommitDetail {
    #[serde(default)]
    pub author: Option<CommitAuthor>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CommitAuthor {
    #[serde(default)]
    pub date: Option<String>,
}

impl CommitRecord {
    /// Build a record carrying only an author date (used by fixtures).
    #[cfg(test)]
    pub fn with_date(date: &str) -> Self {
        Self {
            commit: Some(CommitDetail {
                author: Some(CommitAuthor {
                    date: Some(date.to_string()),
                }),
            }),
        }
    }

    /// Author timestamp, if present and RFC 3339.
    pub fn authored_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.commit.as_ref()?.author.as_ref()?.date.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Rate-limit reset extracted from a rejected response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    pub reset_at: DateTime<Utc>,
}

impl RateLimitInfo {
    /// Parse an `x-ratelimit-reset` header value (epoch seconds).
    pub fn from_reset_header(value: &str) -> Option<Self> {
        let secs = value.trim().parse::<i64>().ok()?;
        let reset_at = DateTime::from_timestamp(secs, 0)?;
        Some(Self { reset_at })
    }

    /// Whole minutes until the quota resets, rounded up, never less than 1.
    pub fn wait_minutes(&self, now: DateTime<Utc>) -> i64 {
        let secs = (self.reset_at - now).num_seconds();
        ((secs + 59) / 60).max(1)
    }

    pub fn wait_message(&self, now: DateTime<Utc>) -> String {
        let minutes = self.wait_minutes(now);
        let unit = if minutes == 1 { "minute" } else { "minutes" };
        format!(
            "GitHub API rate limit exceeded. Try again in {} {}.",
            minutes, unit
        )
    }
}
