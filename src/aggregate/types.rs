/// One row of the language distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageEntry {
    /// Language name as GitHub reports it (e.g., "Rust")
    pub name: String,
    /// Bytes summed across the sampled repositories
    pub bytes: u64,
    /// Share of the retained entries' bytes, 0-100, one decimal place
    pub percentage: f64,
    /// Hex display color
    pub color: &'static str,
}

impl LanguageEntry {
    pub fn percentage_label(&self) -> String {
        format!("{:.1}", self.percentage)
    }
}

/// Commit counts per hour of day, index 0 = midnight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitHourHistogram([u32; CommitHourHistogram::HOURS]);

impl CommitHourHistogram {
    pub const HOURS: usize = 24;

    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn from_counts(counts: [u32; Self::HOURS]) -> Self {
        Self(counts)
    }

    /// Count one commit at `hour`. Hours outside 0-23 are ignored.
    pub fn record(&mut self, hour: u32) {
        if let Some(bucket) = self.0.get_mut(hour as usize) {
            *bucket += 1;
        }
    }

    pub fn counts(&self) -> &[u32; Self::HOURS] {
        &self.0
    }

    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    pub fn max(&self) -> u32 {
        self.0.iter().copied().max().unwrap_or(0)
    }

    /// Busiest hour; the earliest one wins ties. `None` when nothing was counted.
    pub fn peak_hour(&self) -> Option<usize> {
        let max = self.max();
        if max == 0 {
            return None;
        }
        self.0.iter().position(|&count| count == max)
    }
}
