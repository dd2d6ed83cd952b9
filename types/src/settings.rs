use serde::{Deserialize, Serialize};

use crate::Color;

/// Default marker color, a bright orange.
pub const DEFAULT_MARKER_COLOR: Color = Color::rgb(255, 108, 0);

/// Config group every region key lives under.
pub const DEFAULT_CONFIG_GROUP: &str = "spawnMarker";

/// Tunables for spawn recording and marker drawing.
///
/// Every field has a default, so a partial settings file only overrides what
/// it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerSettings {
    /// Seconds after start or a world change during which spawns are ignored.
    pub grace_secs: i64,
    /// Spawns farther than this many tiles from the player are not recorded.
    pub max_save_distance: i32,
    /// Markers this many tiles or more from the player are not drawn.
    pub max_draw_distance: i32,
    pub default_color: Color,
    pub config_group: String,
}

impl Default for MarkerSettings {
    fn default() -> Self {
        Self {
            grace_secs: 5,
            max_save_distance: 12,
            max_draw_distance: 32,
            default_color: DEFAULT_MARKER_COLOR,
            config_group: DEFAULT_CONFIG_GROUP.to_string(),
        }
    }
}
