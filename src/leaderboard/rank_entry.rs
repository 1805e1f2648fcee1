use std::cmp::Ordering;

use serde::Deserialize;

/// Which ranking source feeds a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Points,
    Currency,
}

impl Metric {
    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Points => "points",
            Metric::Currency => "currency",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a ranked result.
#[derive(Debug, Clone, PartialEq)]
pub struct RankEntry {
    pub subject: String,
    pub value: f64,
    pub decimals: u8,
}

impl RankEntry {
    pub fn new(subject: impl Into<String>, value: f64, decimals: u8) -> Self {
        Self {
            subject: subject.into(),
            value,
            decimals,
        }
    }

    /// Descending by value, ties by ascending subject.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .value
            .total_cmp(&self.value)
            .then_with(|| self.subject.cmp(&other.subject))
    }
}

pub fn sort_ranked(entries: &mut [RankEntry]) {
    entries.sort_by(RankEntry::rank_cmp);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn higher_values_rank_first() {
        let mut entries = vec![
            RankEntry::new("low", 1.0, 2),
            RankEntry::new("high", 9.0, 2),
            RankEntry::new("mid", 5.0, 2),
        ];
        sort_ranked(&mut entries);
        let order: Vec<_> = entries.iter().map(|e| e.subject.as_str()).collect();
        assert_eq!(order, ["high", "mid", "low"]);
    }

    #[test]
    fn ties_break_by_subject() {
        let mut entries = vec![
            RankEntry::new("B", 50.0, 0),
            RankEntry::new("A", 50.0, 0),
            RankEntry::new("C", 70.0, 0),
        ];
        sort_ranked(&mut entries);
        let order: Vec<_> = entries.iter().map(|e| e.subject.as_str()).collect();
        assert_eq!(order, ["C", "A", "B"]);
    }

    #[test]
    fn metric_parses_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            metric: Metric,
        }
        let parsed: Wrapper = toml::from_str(r#"metric = "currency""#).unwrap();
        assert_eq!(parsed.metric, Metric::Currency);
        assert_eq!(Metric::Points.to_string(), "points");
    }
}
