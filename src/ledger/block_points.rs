use std::collections::BTreeMap;

/// Points awarded for placing each kind of block. Blocks not listed are
/// worth nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockPoints {
    points: BTreeMap<String, f64>,
}

impl BlockPoints {
    pub fn new(points: BTreeMap<String, f64>) -> Self {
        Self { points }
    }

    pub fn points_for(&self, block: &str) -> f64 {
        self.points.get(block).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_blocks_are_worth_nothing() {
        let table = BlockPoints::new(BTreeMap::from([
            ("diamond_block".to_string(), 0.7),
            ("emerald_block".to_string(), 1.0),
        ]));
        assert_eq!(table.points_for("diamond_block"), 0.7);
        assert_eq!(table.points_for("emerald_block"), 1.0);
        assert_eq!(table.points_for("dirt"), 0.0);
    }
}
