pub mod types;

pub use types::{DashboardView, ErrorNotice};

use crate::aggregate::{CommitHourHistogram, LanguageEntry};
use crate::pipeline::{DashboardSink, DerivedStats, ProfileSummary, QueryError, QueryPhase};
use chrono::Utc;
use colored::Colorize;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, instrument};

const BAR_WIDTH: usize = 40;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report file: {0}")]
    FileWrite(#[from] std::io::Error),
}

/// Prints each query checkpoint to the terminal as soon as it arrives.
#[derive(Debug, Default)]
pub struct TerminalRenderer {
    view: DashboardView,
    quiet: bool,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track state without printing.
    #[cfg(test)]
    pub fn quiet() -> Self {
        Self {
            view: DashboardView::default(),
            quiet: true,
        }
    }

    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    fn print(&self, text: &str) {
        if !self.quiet {
            print!("{}", text);
        }
    }
}

impl DashboardSink for TerminalRenderer {
    fn query_started(&mut self, username: &str) {
        self.view.reset(username);
    }

    fn phase_changed(&mut self, phase: QueryPhase) {
        debug!(%phase, "phase changed");
        self.view.phase = phase;
    }

    fn profile_ready(&mut self, summary: &ProfileSummary) {
        self.print(&render_summary(summary));
        self.view.summary = Some(summary.clone());
    }

    fn derived_ready(&mut self, derived: &DerivedStats) {
        self.print(&render_derived(derived));
        self.view.derived = Some(derived.clone());
    }

    fn failed(&mut self, error: &QueryError) {
        let notice = ErrorNotice {
            kind: error.kind(),
            message: error.user_message(Utc::now()),
        };
        if !self.quiet {
            eprintln!();
            eprintln!("{} {}", format!("[{}]", notice.kind).red().bold(), notice.message);
        }
        self.view.fail(notice);
    }
}

fn render_summary(summary: &ProfileSummary) -> String {
    let profile = &summary.profile;
    let mut out = String::new();
    out.push('\n');
    out.push_str(&format!(
        "{} (@{})\n",
        profile.display_name().bold(),
        profile.login
    ));
    if let Some(bio) = profile.bio.as_deref().filter(|b| !b.trim().is_empty()) {
        out.push_str(&format!("{}\n", bio.trim().italic()));
    }
    out.push_str(&format!(
        "Repos: {} | Followers: {} | Following: {} | ★ {} | Forks: {}\n\n",
        profile.public_repos, profile.followers, profile.following, summary.total_stars, summary.total_forks
    ));

    out.push_str(&format!("═══ {} ═══\n", "Top Repositories".bold()));
    if summary.top_repositories.is_empty() {
        out.push_str("  No public non-fork repositories.\n");
    }
    for repo in &summary.top_repositories {
        out.push_str(&format!(
            "  • {} ★ {} ⑂ {}\n",
            repo.name.cyan(),
            repo.stargazers_count,
            repo.forks_count
        ));
        if let Some(description) = repo.description.as_deref().filter(|d| !d.trim().is_empty()) {
            out.push_str(&format!("    {}\n", description.trim().dimmed()));
        }
    }
    out.push('\n');
    out
}

fn render_derived(derived: &DerivedStats) -> String {
    let mut out = String::new();
    out.push_str(&format!("═══ {} ═══\n", "Languages".bold()));
    if derived.languages.is_empty() {
        out.push_str("  No language data.\n");
    }
    for entry in &derived.languages {
        out.push_str(&format!(
            "  {:<16} {} {:>5}%\n",
            entry.name,
            language_bar(entry),
            entry.percentage_label()
        ));
    }
    out.push('\n');

    out.push_str(&format!("═══ {} ═══\n", "Commit Hours".bold()));
    out.push_str(&hour_rows(&derived.commit_hours));
    match derived.commit_hours.peak_hour() {
        Some(hour) => out.push_str(&format!("  Most active around {:02}:00\n", hour)),
        None => out.push_str("  No recent commits.\n"),
    }
    out.push('\n');
    out
}

fn language_bar(entry: &LanguageEntry) -> colored::ColoredString {
    let width = ((entry.percentage / 100.0) * BAR_WIDTH as f64).round() as usize;
    let bar = "█".repeat(width.max(1));
    match hex_rgb(entry.color) {
        Some((r, g, b)) => bar.truecolor(r, g, b),
        None => bar.normal(),
    }
}

fn hour_rows(hist: &CommitHourHistogram) -> String {
    let max = hist.max();
    let mut out = String::new();
    for (hour, &count) in hist.counts().iter().enumerate() {
        let width = if max == 0 {
            0
        } else {
            (count as usize * BAR_WIDTH).div_ceil(max as usize)
        };
        out.push_str(&format!("  {:02} {} {}\n", hour, "▇".repeat(width).green(), count));
    }
    out
}

/// Parse "#rrggbb" into its channels.
fn hex_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Write the final view as a markdown file.
#[instrument(skip(view), fields(username = %view.username))]
pub fn write_markdown_report(view: &DashboardView, path: &Path) -> Result<(), ReportError> {
    debug!(path = %path.display(), "writing report to file");
    std::fs::write(path, render_markdown(view))?;
    Ok(())
}

fn render_markdown(view: &DashboardView) -> String {
    let mut md = String::new();

    if let Some(notice) = &view.error {
        md.push_str(&format!("# @{}\n\n", view.username));
        md.push_str(&format!("**Error ({}):** {}\n", notice.kind, notice.message));
        return md;
    }

    if let Some(summary) = &view.summary {
        let profile = &summary.profile;
        md.push_str(&format!(
            "# {} ([@{}]({}))\n\n![avatar]({})\n\n",
            profile.display_name(),
            profile.login,
            profile.html_url,
            profile.avatar_url
        ));
        if let Some(bio) = profile.bio.as_deref().filter(|b| !b.trim().is_empty()) {
            md.push_str(&format!("> {}\n\n", bio.trim()));
        }
        md.push_str(&format!(
            "**Repos:** {} | **Followers:** {} | **Following:** {} | **Stars:** {} | **Forks:** {}\n\n",
            profile.public_repos, profile.followers, profile.following, summary.total_stars, summary.total_forks
        ));

        md.push_str("## Top Repositories\n\n");
        for repo in &summary.top_repositories {
            md.push_str(&format!(
                "- [{}]({}) ★ {} ⑂ {}",
                repo.name, repo.html_url, repo.stargazers_count, repo.forks_count
            ));
            if let Some(description) = repo.description.as_deref().filter(|d| !d.trim().is_empty()) {
                md.push_str(&format!(" - {}", description.trim()));
            }
            md.push('\n');
        }
        md.push('\n');
    }

    if let Some(derived) = &view.derived {
        md.push_str("## Languages\n\n");
        if derived.languages.is_empty() {
            md.push_str("No language data.\n\n");
        } else {
            md.push_str("| Language | Bytes | Share |\n|---|---:|---:|\n");
            for entry in &derived.languages {
                md.push_str(&format!(
                    "| {} | {} | {}% |\n",
                    entry.name,
                    entry.bytes,
                    entry.percentage_label()
                ));
            }
            md.push('\n');
        }

        md.push_str("## Commit Hours\n\n| Hour | Commits |\n|---|---:|\n");
        for (hour, count) in derived.commit_hours.counts().iter().enumerate() {
            md.push_str(&format!("| {:02} | {} |\n", hour, count));
        }
    }

    md
}
