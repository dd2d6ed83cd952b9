use serde::{Deserialize, Serialize};

use crate::coords::WorldPoint;

/// Host connection state, as reported on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    LoginScreen,
    LoggingIn,
    Loading,
    LoggedIn,
    ConnectionLost,
    Hopping,
}

/// A creature that just appeared in the loaded scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnEvent {
    pub npc_id: i32,
    pub name: Option<String>,
    pub combat_level: i32,
    /// Where it appeared, in scene coordinates (instanced when the scene is).
    pub position: WorldPoint,
}

/// Events delivered by the host, one at a time on its event thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    PluginStarted,
    PluginStopped,
    GameStateChanged { state: GameState },
    NpcSpawned(SpawnEvent),
}
