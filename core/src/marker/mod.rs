//! Marker records
//!
//! [`PositionRecord`] is what gets persisted, one JSON object per marked tile.
//! [`WorldMarker`] is the render-facing form, rebuilt from records on every
//! reload and never patched in place.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use spawn_marker_types::Color;

use crate::coords::{RegionId, RegionPoint, WorldPoint, from_region_relative, to_region_relative};

/// A marked tile in region-relative form.
///
/// Equality and hashing only look at the position; color and label ride along.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionRecord {
    pub region_id: RegionId,
    pub region_x: i32,
    pub region_y: i32,
    #[serde(rename = "z")]
    pub plane: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl PositionRecord {
    pub fn from_world(point: WorldPoint, color: Option<Color>, label: Option<String>) -> Self {
        let rel = to_region_relative(point);
        Self {
            region_id: rel.region_id,
            region_x: rel.region_x,
            region_y: rel.region_y,
            plane: rel.plane,
            color,
            label,
        }
    }

    pub fn position(&self) -> RegionPoint {
        RegionPoint {
            region_id: self.region_id,
            region_x: self.region_x,
            region_y: self.region_y,
            plane: self.plane,
        }
    }

    pub fn world_point(&self) -> WorldPoint {
        from_region_relative(self.region_id, self.region_x, self.region_y, self.plane)
    }

    /// Same tile, regardless of color or label.
    pub fn same_position(&self, other: &PositionRecord) -> bool {
        self.position() == other.position()
    }
}

impl PartialEq for PositionRecord {
    fn eq(&self, other: &Self) -> bool {
        self.same_position(other)
    }
}

impl Eq for PositionRecord {}

impl Hash for PositionRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.position().hash(state);
    }
}

/// A marker at an absolute (possibly instanced) world tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldMarker {
    pub world_point: WorldPoint,
    pub color: Option<Color>,
    pub label: Option<String>,
}

impl WorldMarker {
    pub fn at(world_point: WorldPoint, record: &PositionRecord) -> Self {
        Self {
            world_point,
            color: record.color,
            label: record.label.clone(),
        }
    }
}
