mod signal;

pub use signal::{GameEvent, GameState, SpawnEvent};

use chrono::NaiveDateTime;

use crate::context::GameContext;
use crate::error::Result;

/// Something that reacts to host events.
pub trait EventHandler {
    fn handle_event(
        &mut self,
        event: &GameEvent,
        ctx: &dyn GameContext,
        now: NaiveDateTime,
    ) -> Result<()>;
}
