//! What the marker logic needs to know about the host client.

use serde::{Deserialize, Serialize};

use crate::coords::{RegionId, SceneView, WorldPoint};

/// Read-only view of the host client's current world state.
pub trait GameContext {
    /// Plane the player is on.
    fn plane(&self) -> i32;

    /// Player position in scene coordinates, if logged in.
    fn player_position(&self) -> Option<WorldPoint>;

    /// Regions of the loaded scene. For instances these are the template
    /// regions.
    fn map_regions(&self) -> &[RegionId];

    fn scene(&self) -> &SceneView;
}

/// A plain-data [`GameContext`], used by the replay tool and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    #[serde(default)]
    pub player: Option<WorldPoint>,
    #[serde(default)]
    pub regions: Vec<RegionId>,
    #[serde(default)]
    pub scene: SceneView,
}

impl WorldSnapshot {
    /// A non-instanced snapshot with the player at `player`; the scene and
    /// region list are derived from the position.
    pub fn around(player: WorldPoint) -> Self {
        let scene = SceneView::new(player.x - 52, player.y - 52);
        let mut regions = Vec::new();
        for x in [scene.base_x, scene.base_x + 103] {
            for y in [scene.base_y, scene.base_y + 103] {
                let id = WorldPoint::new(x, y, 0).region_id();
                if !regions.contains(&id) {
                    regions.push(id);
                }
            }
        }

        Self {
            player: Some(player),
            regions,
            scene,
        }
    }
}

impl GameContext for WorldSnapshot {
    fn plane(&self) -> i32 {
        self.player.map(|p| p.plane).unwrap_or(0)
    }

    fn player_position(&self) -> Option<WorldPoint> {
        self.player
    }

    fn map_regions(&self) -> &[RegionId] {
        &self.regions
    }

    fn scene(&self) -> &SceneView {
        &self.scene
    }
}
