pub mod context;
pub mod coords;
pub mod error;
pub mod events;
pub mod filter;
pub mod game_data;
pub mod marker;
pub mod overlay;
pub mod service;
pub mod storage;

// Re-exports for convenience
pub use context::{GameContext, WorldSnapshot};
pub use coords::{RegionId, WorldPoint};
pub use error::{MarkerError, Result};
pub use events::{EventHandler, GameEvent, GameState, SpawnEvent};
pub use marker::{PositionRecord, WorldMarker};
pub use service::{MarkerService, SpawnOutcome};
pub use storage::{ConfigStore, FileConfigStore, MemoryConfigStore, RegionStore};
