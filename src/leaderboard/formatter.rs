use super::rank_entry::{sort_ranked, Metric, RankEntry};
use super::section::BoardSection;
use crate::{fmt, str};
use crate::util::numbers::format_grouped;

pub const MAX_RANKED_LINES: usize = 10;
pub const NO_DATA_LINE: &str = "§7No data available yet";
pub const NO_SOURCE_LINE: &str = "§cNo data source available";

const GOLD: &str = "§6";
const SILVER: &str = "§7";
const BRONZE: &str = "§c";
const RANK_DEFAULT: &str = "§b";

fn rank_marker(rank: usize) -> &'static str {
    match rank {
        1 => GOLD,
        2 => SILVER,
        3 => BRONZE,
        _ => RANK_DEFAULT,
    }
}

/// Turns ranked entries into board text. Pure; the only state is how values
/// of the board's metric are decorated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatter {
    value_prefix: String,
    value_suffix: String,
}

impl Formatter {
    pub fn points() -> Self {
        Self {
            value_prefix: String::new(),
            value_suffix: str!(" Points"),
        }
    }

    pub fn currency(symbol: impl Into<String>) -> Self {
        Self {
            value_prefix: symbol.into(),
            value_suffix: String::new(),
        }
    }

    pub fn for_metric(metric: Metric, currency_symbol: &str) -> Self {
        match metric {
            Metric::Points => Self::points(),
            Metric::Currency => Self::currency(currency_symbol),
        }
    }

    pub fn render(&self, header: &str, entries: &[RankEntry]) -> String {
        let mut section = BoardSection::new(header);

        if entries.is_empty() {
            section.add_line(NO_DATA_LINE);
            return section.to_display_text();
        }

        let mut ranked = entries.to_vec();
        sort_ranked(&mut ranked);

        for (i, entry) in ranked.iter().take(MAX_RANKED_LINES).enumerate() {
            let rank = i + 1;
            section.add_line(fmt!(
                "{}[{}] §r§a{} §r- §e{}{}{}",
                rank_marker(rank),
                rank,
                entry.subject,
                self.value_prefix,
                format_grouped(entry.value, entry.decimals),
                self.value_suffix
            ));
        }

        section.to_display_text()
    }

    pub fn render_unavailable(header: &str) -> String {
        let mut section = BoardSection::new(header);
        section.add_line(NO_SOURCE_LINE);
        section.to_display_text()
    }
}
