//! Coordinate spaces
//!
//! - **World**: absolute tile coordinates plus a plane (0..=3)
//! - **Region-relative**: a 64×64 region id plus the offset inside it; the
//!   form markers are persisted in
//! - **Instanced**: scene copies of template chunks, see [`instance`]
//!
//! Everything here is pure; nothing reads persisted state.

mod instance;
mod world_point;

pub use instance::{
    InstanceTemplates, LocalPoint, SceneView, TemplateChunk, collapse_from_instance,
    expand_to_instances,
};
pub use world_point::{RegionPoint, WorldPoint, from_region_relative, to_region_relative};

/// Identifier of a 64×64 tile region: `(x / 64) << 8 | (y / 64)`.
pub type RegionId = i32;

/// Region edge length in tiles.
pub const REGION_SIZE: i32 = 64;

/// Instance chunk edge length in tiles.
pub const CHUNK_SIZE: i32 = 8;

/// Loaded scene edge length in chunks.
pub const SCENE_CHUNKS: i32 = 13;

/// Loaded scene edge length in tiles.
pub const SCENE_SIZE: i32 = SCENE_CHUNKS * CHUNK_SIZE;

pub const PLANE_COUNT: i32 = 4;

/// World edge length in tiles covered by the region grid (256 regions).
pub const WORLD_SIZE: i32 = 256 * REGION_SIZE;
