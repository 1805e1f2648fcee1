mod log_display;

use serde::Deserialize;

pub use log_display::{LogDisplay, LogHandle};

/// World coordinates of a board's visual handle.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "[f64; 3]")]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<[f64; 3]> for Position {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    #[error("world '{0}' is not loaded")]
    WorldNotLoaded(String),
    #[error("display backend failed: {0}")]
    Backend(String),
}

/// A live, world-positioned text object owned by exactly one board.
///
/// `close` must be idempotent: closing an already closed handle is a no-op.
/// `is_closed` also reports handles the host despawned on its own.
pub trait DisplayHandle: Send + std::fmt::Debug {
    fn set_text(&mut self, text: &str);
    fn close(&mut self);
    fn is_closed(&self) -> bool;
}

/// The host side that knows which worlds are loaded and how to spawn handles.
pub trait DisplayBackend: Send + Sync {
    fn is_world_loaded(&self, world: &str) -> bool;

    fn create(
        &self,
        position: Position,
        world: &str,
        initial_text: &str,
    ) -> Result<Box<dyn DisplayHandle>, DisplayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_reads_from_coordinate_array() {
        #[derive(Deserialize)]
        struct Wrapper {
            position: Position,
        }
        let parsed: Wrapper = toml::from_str("position = [1.5, 64.0, -3.25]").unwrap();
        assert_eq!(parsed.position, Position::new(1.5, 64.0, -3.25));
        assert_eq!(parsed.position.to_string(), "(1.50, 64.00, -3.25)");
    }
}
