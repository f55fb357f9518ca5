use crate::pipeline::{DerivedStats, ErrorKind, ProfileSummary, QueryPhase};

/// The single error shown in place of a dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorNotice {
    pub kind: ErrorKind,
    pub message: String,
}

/// Everything the renderer knows about the current query.
///
/// Owned per query: `reset` drops the previous query's data and error.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub username: String,
    pub phase: QueryPhase,
    pub summary: Option<ProfileSummary>,
    pub derived: Option<DerivedStats>,
    pub error: Option<ErrorNotice>,
}

impl Default for DashboardView {
    fn default() -> Self {
        Self {
            username: String::new(),
            phase: QueryPhase::Idle,
            summary: None,
            derived: None,
            error: None,
        }
    }
}

impl DashboardView {
    pub fn reset(&mut self, username: &str) {
        *self = Self {
            username: username.to_string(),
            ..Self::default()
        };
    }

    /// Replace whatever was shown with `notice`.
    pub fn fail(&mut self, notice: ErrorNotice) {
        self.summary = None;
        self.derived = None;
        self.error = Some(notice);
    }

    pub fn is_complete(&self) -> bool {
        self.phase == QueryPhase::Complete && self.error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_clears_error() {
        let mut view = DashboardView::default();
        view.fail(ErrorNotice {
            kind: ErrorKind::NotFound,
            message: "GitHub user not found.".to_string(),
        });
        assert!(view.error.is_some());

        view.reset("octocat");
        assert!(view.error.is_none());
        assert_eq!(view.username, "octocat");
        assert_eq!(view.phase, QueryPhase::Idle);
    }
}
