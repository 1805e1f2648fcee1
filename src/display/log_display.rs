use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info};

use super::{DisplayBackend, DisplayError, DisplayHandle, Position};

/// Headless backend: every handle writes its text to the log instead of a
/// rendered world. Used by the standalone binary.
#[derive(Debug)]
pub struct LogDisplay {
    loaded_worlds: HashSet<String>,
    next_id: AtomicU64,
}

impl LogDisplay {
    pub fn new<I, S>(loaded_worlds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            loaded_worlds: loaded_worlds.into_iter().map(Into::into).collect(),
            next_id: AtomicU64::new(1),
        }
    }
}

impl DisplayBackend for LogDisplay {
    fn is_world_loaded(&self, world: &str) -> bool {
        self.loaded_worlds.contains(world)
    }

    fn create(
        &self,
        position: Position,
        world: &str,
        initial_text: &str,
    ) -> Result<Box<dyn DisplayHandle>, DisplayError> {
        if !self.is_world_loaded(world) {
            return Err(DisplayError::WorldNotLoaded(world.to_string()));
        }

        let handle_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        info!(handle_id, world, %position, text = initial_text, "Spawned display handle");

        Ok(Box::new(LogHandle {
            handle_id,
            world: world.to_string(),
            position,
            text: initial_text.to_string(),
            closed: false,
        }))
    }
}

#[derive(Debug)]
pub struct LogHandle {
    handle_id: u64,
    world: String,
    position: Position,
    text: String,
    closed: bool,
}

impl LogHandle {
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl DisplayHandle for LogHandle {
    fn set_text(&mut self, text: &str) {
        if self.closed {
            debug!(handle_id = self.handle_id, "Ignoring text update on closed handle");
            return;
        }
        self.text = text.to_string();
        info!(
            handle_id = self.handle_id,
            world = %self.world,
            position = %self.position,
            "Display text updated:\n{}",
            self.text
        );
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        info!(handle_id = self.handle_id, world = %self.world, "Closed display handle");
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}
