use std::fmt;

use serde::{Deserialize, Serialize};

use super::{PLANE_COUNT, REGION_SIZE, RegionId, WORLD_SIZE};

/// An absolute tile position in the (non-instanced) world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct WorldPoint {
    pub x: i32,
    pub y: i32,
    pub plane: i32,
}

impl WorldPoint {
    pub const fn new(x: i32, y: i32, plane: i32) -> Self {
        Self { x, y, plane }
    }

    /// Whether the point lies inside the addressable region grid.
    pub fn is_valid(&self) -> bool {
        (0..WORLD_SIZE).contains(&self.x)
            && (0..WORLD_SIZE).contains(&self.y)
            && (0..PLANE_COUNT).contains(&self.plane)
    }

    /// Chebyshev distance in tiles. Points on different planes are
    /// `i32::MAX` apart.
    pub fn distance_to(&self, other: &WorldPoint) -> i32 {
        if self.plane != other.plane {
            return i32::MAX;
        }
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    pub fn region_id(&self) -> RegionId {
        ((self.x >> 6) << 8) | (self.y >> 6)
    }

    pub fn region_x(&self) -> i32 {
        self.x & (REGION_SIZE - 1)
    }

    pub fn region_y(&self) -> i32 {
        self.y & (REGION_SIZE - 1)
    }
}

impl fmt::Display for WorldPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.plane)
    }
}

/// A tile addressed relative to the region that contains it.
///
/// `region_x` / `region_y` are only meaningful together with `region_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionPoint {
    pub region_id: RegionId,
    pub region_x: i32,
    pub region_y: i32,
    pub plane: i32,
}

/// Split a world point into its region id and in-region offset.
pub fn to_region_relative(point: WorldPoint) -> RegionPoint {
    RegionPoint {
        region_id: point.region_id(),
        region_x: point.region_x(),
        region_y: point.region_y(),
        plane: point.plane,
    }
}

/// Rebuild the world point for a region-relative position.
pub fn from_region_relative(region_id: RegionId, region_x: i32, region_y: i32, plane: i32) -> WorldPoint {
    WorldPoint {
        x: ((region_id >> 8) << 6) + region_x,
        y: ((region_id & 0xff) << 6) + region_y,
        plane,
    }
}

impl From<RegionPoint> for WorldPoint {
    fn from(p: RegionPoint) -> Self {
        from_region_relative(p.region_id, p.region_x, p.region_y, p.plane)
    }
}

impl From<WorldPoint> for RegionPoint {
    fn from(p: WorldPoint) -> Self {
        to_region_relative(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lumbridge_region_is_known_id() {
        let p = WorldPoint::new(3222, 3218, 0);
        let rel = to_region_relative(p);
        assert_eq!(rel.region_id, 12850);
        assert_eq!(rel.region_x, 22);
        assert_eq!(rel.region_y, 18);
    }

    #[test]
    fn region_round_trip_holds_across_grid() {
        for x in (0..WORLD_SIZE).step_by(97) {
            for y in (0..WORLD_SIZE).step_by(89) {
                for plane in 0..PLANE_COUNT {
                    let p = WorldPoint::new(x, y, plane);
                    assert_eq!(WorldPoint::from(to_region_relative(p)), p, "{p}");
                }
            }
        }
    }

    #[test]
    fn region_edges_round_trip() {
        for p in [
            WorldPoint::new(0, 0, 0),
            WorldPoint::new(63, 63, 1),
            WorldPoint::new(64, 64, 2),
            WorldPoint::new(WORLD_SIZE - 1, WORLD_SIZE - 1, 3),
        ] {
            assert!(p.is_valid());
            assert_eq!(WorldPoint::from(RegionPoint::from(p)), p);
        }
    }

    #[test]
    fn distance_is_chebyshev_and_plane_aware() {
        let a = WorldPoint::new(3200, 3200, 0);
        assert_eq!(a.distance_to(&WorldPoint::new(3195, 3203, 0)), 5);
        assert_eq!(a.distance_to(&WorldPoint::new(3212, 3188, 0)), 12);
        assert_eq!(a.distance_to(&WorldPoint::new(3200, 3200, 1)), i32::MAX);
    }

    #[test]
    fn out_of_grid_points_are_invalid() {
        assert!(!WorldPoint::new(-1, 0, 0).is_valid());
        assert!(!WorldPoint::new(0, WORLD_SIZE, 0).is_valid());
        assert!(!WorldPoint::new(0, 0, PLANE_COUNT).is_valid());
    }
}
