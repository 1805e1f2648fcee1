/// A scored action reported by the host, one per line on the event feed:
///
/// ```text
/// points <player> <amount>
/// block <player> <block>
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ScoredEvent {
    Points { player: String, amount: f64 },
    BlockPlaced { player: String, block: String },
}

impl ScoredEvent {
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let kind = parts.next()?;
        let player = parts.next()?.to_string();
        let arg = parts.next()?;
        if parts.next().is_some() {
            return None;
        }

        match kind {
            "points" => Some(Self::Points {
                player,
                amount: arg.parse().ok()?,
            }),
            "block" => Some(Self::BlockPlaced {
                player,
                block: arg.to_string(),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_event_kinds() {
        assert_eq!(
            ScoredEvent::parse("points steve 2.5"),
            Some(ScoredEvent::Points { player: "steve".into(), amount: 2.5 })
        );
        assert_eq!(
            ScoredEvent::parse("  block alex diamond_block "),
            Some(ScoredEvent::BlockPlaced { player: "alex".into(), block: "diamond_block".into() })
        );
    }

    #[test]
    fn rejects_malformed_lines() {
        assert_eq!(ScoredEvent::parse(""), None);
        assert_eq!(ScoredEvent::parse("points steve"), None);
        assert_eq!(ScoredEvent::parse("points steve lots"), None);
        assert_eq!(ScoredEvent::parse("jump steve 3"), None);
        assert_eq!(ScoredEvent::parse("points steve 1 extra"), None);
    }
}
