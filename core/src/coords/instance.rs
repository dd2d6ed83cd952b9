//! Instanced scenes
//!
//! An instance is a private copy of template world geometry, assembled from
//! 8×8 tile chunks. The loaded scene is 13×13 chunks per plane; each scene
//! chunk either points at a template chunk (possibly on another plane and
//! rotated in quarter turns) or is empty.
//!
//! Markers are stored in template coordinates. [`expand_to_instances`] maps
//! a template point to every scene copy currently loaded, and
//! [`collapse_from_instance`] maps a scene tile back to its template.

use serde::{Deserialize, Serialize};

use super::{CHUNK_SIZE, PLANE_COUNT, SCENE_CHUNKS, SCENE_SIZE, WorldPoint};

/// One decoded entry of the host's instance template table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateChunk {
    pub plane: i32,
    /// Template chunk coordinates (world tile / 8).
    pub chunk_x: i32,
    pub chunk_y: i32,
    /// Quarter turns clockwise, 0..=3.
    pub rotation: i32,
}

impl TemplateChunk {
    /// Decode the host's packed form. `-1` marks an empty scene chunk.
    pub fn from_packed(data: i32) -> Option<Self> {
        if data == -1 {
            return None;
        }
        Some(Self {
            plane: (data >> 24) & 0x3,
            chunk_x: (data >> 14) & 0x3FF,
            chunk_y: (data >> 3) & 0x7FF,
            rotation: (data >> 1) & 0x3,
        })
    }

    pub fn to_packed(self) -> i32 {
        ((self.plane & 0x3) << 24)
            | ((self.chunk_x & 0x3FF) << 14)
            | ((self.chunk_y & 0x7FF) << 3)
            | ((self.rotation & 0x3) << 1)
    }

    /// Whether the template chunk covers `point`.
    pub fn contains(&self, point: &WorldPoint) -> bool {
        let origin_x = self.chunk_x * CHUNK_SIZE;
        let origin_y = self.chunk_y * CHUNK_SIZE;
        self.plane == point.plane
            && (origin_x..origin_x + CHUNK_SIZE).contains(&point.x)
            && (origin_y..origin_y + CHUNK_SIZE).contains(&point.y)
    }
}

/// Packed template chunks indexed `[plane][chunk_x][chunk_y]`, as the host
/// reports them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceTemplates(Vec<Vec<Vec<i32>>>);

impl InstanceTemplates {
    /// A table with every scene chunk empty.
    pub fn empty() -> Self {
        Self(vec![
            vec![vec![-1; SCENE_CHUNKS as usize]; SCENE_CHUNKS as usize];
            PLANE_COUNT as usize
        ])
    }

    pub fn from_packed(chunks: Vec<Vec<Vec<i32>>>) -> Self {
        Self(chunks)
    }

    /// Place `template` at scene chunk `(chunk_x, chunk_y)` on `plane`.
    /// Positions outside the table are ignored.
    pub fn set(&mut self, plane: i32, chunk_x: i32, chunk_y: i32, template: TemplateChunk) {
        if let Some(slot) = self.slot_mut(plane, chunk_x, chunk_y) {
            *slot = template.to_packed();
        }
    }

    pub fn chunk(&self, plane: i32, chunk_x: i32, chunk_y: i32) -> Option<TemplateChunk> {
        let plane = usize::try_from(plane).ok()?;
        let x = usize::try_from(chunk_x).ok()?;
        let y = usize::try_from(chunk_y).ok()?;
        let data = *self.0.get(plane)?.get(x)?.get(y)?;
        TemplateChunk::from_packed(data)
    }

    /// Every non-empty scene chunk as `(plane, chunk_x, chunk_y, template)`.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, i32, TemplateChunk)> + '_ {
        self.0.iter().enumerate().flat_map(|(z, column)| {
            column.iter().enumerate().flat_map(move |(x, row)| {
                row.iter().enumerate().filter_map(move |(y, &data)| {
                    TemplateChunk::from_packed(data).map(|t| (z as i32, x as i32, y as i32, t))
                })
            })
        })
    }

    fn slot_mut(&mut self, plane: i32, chunk_x: i32, chunk_y: i32) -> Option<&mut i32> {
        let plane = usize::try_from(plane).ok()?;
        let x = usize::try_from(chunk_x).ok()?;
        let y = usize::try_from(chunk_y).ok()?;
        self.0.get_mut(plane)?.get_mut(x)?.get_mut(y)
    }
}

/// A tile inside the loaded scene, relative to the scene base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalPoint {
    pub x: i32,
    pub y: i32,
    pub plane: i32,
}

impl LocalPoint {
    pub fn in_scene(&self) -> bool {
        (0..SCENE_SIZE).contains(&self.x)
            && (0..SCENE_SIZE).contains(&self.y)
            && (0..PLANE_COUNT).contains(&self.plane)
    }
}

/// The part of the world the host currently has loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneView {
    /// World coordinates of the scene's south-west corner.
    pub base_x: i32,
    pub base_y: i32,
    /// Present while the player is inside an instance.
    #[serde(default)]
    pub instance: Option<InstanceTemplates>,
}

impl SceneView {
    pub fn new(base_x: i32, base_y: i32) -> Self {
        Self {
            base_x,
            base_y,
            instance: None,
        }
    }

    pub fn instanced(base_x: i32, base_y: i32, templates: InstanceTemplates) -> Self {
        Self {
            base_x,
            base_y,
            instance: Some(templates),
        }
    }

    pub fn is_instance(&self) -> bool {
        self.instance.is_some()
    }

    /// Scene-local position of a point in scene (possibly instanced) world
    /// coordinates, if it is inside the scene.
    pub fn to_local(&self, point: WorldPoint) -> Option<LocalPoint> {
        let local = LocalPoint {
            x: point.x - self.base_x,
            y: point.y - self.base_y,
            plane: point.plane,
        };
        local.in_scene().then_some(local)
    }
}

/// Rotate an in-chunk offset by `rotation` quarter turns.
fn rotate(x: i32, y: i32, rotation: i32) -> (i32, i32) {
    let max = CHUNK_SIZE - 1;
    match rotation & 0x3 {
        1 => (y, max - x),
        2 => (max - x, max - y),
        3 => (max - y, x),
        _ => (x, y),
    }
}

/// Every loaded copy of the template tile `point`.
///
/// Outside an instance this is just `point`. Inside one it may be empty when
/// no loaded chunk uses the point's template.
pub fn expand_to_instances(point: WorldPoint, scene: &SceneView) -> Vec<WorldPoint> {
    let Some(templates) = &scene.instance else {
        return vec![point];
    };

    let offset_x = point.x & (CHUNK_SIZE - 1);
    let offset_y = point.y & (CHUNK_SIZE - 1);

    templates
        .iter()
        .filter(|(_, _, _, template)| template.contains(&point))
        .map(|(plane, chunk_x, chunk_y, template)| {
            let (dx, dy) = rotate(offset_x, offset_y, template.rotation);
            WorldPoint::new(
                scene.base_x + chunk_x * CHUNK_SIZE + dx,
                scene.base_y + chunk_y * CHUNK_SIZE + dy,
                plane,
            )
        })
        .collect()
}

/// Canonical (template) world position of a scene tile.
///
/// `None` when the tile is outside the scene or on an empty instance chunk.
pub fn collapse_from_instance(local: LocalPoint, scene: &SceneView) -> Option<WorldPoint> {
    if !local.in_scene() {
        return None;
    }

    let Some(templates) = &scene.instance else {
        return Some(WorldPoint::new(
            scene.base_x + local.x,
            scene.base_y + local.y,
            local.plane,
        ));
    };

    let template = templates.chunk(local.plane, local.x / CHUNK_SIZE, local.y / CHUNK_SIZE)?;
    let (dx, dy) = rotate(
        local.x & (CHUNK_SIZE - 1),
        local.y & (CHUNK_SIZE - 1),
        4 - template.rotation,
    );
    Some(WorldPoint::new(
        template.chunk_x * CHUNK_SIZE + dx,
        template.chunk_y * CHUNK_SIZE + dy,
        template.plane,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template_for(point: WorldPoint, rotation: i32) -> TemplateChunk {
        TemplateChunk {
            plane: point.plane,
            chunk_x: point.x / CHUNK_SIZE,
            chunk_y: point.y / CHUNK_SIZE,
            rotation,
        }
    }

    #[test]
    fn packed_template_round_trips() {
        let t = TemplateChunk {
            plane: 2,
            chunk_x: 400,
            chunk_y: 1200,
            rotation: 3,
        };
        assert_eq!(TemplateChunk::from_packed(t.to_packed()), Some(t));
        assert_eq!(TemplateChunk::from_packed(-1), None);
    }

    #[test]
    fn plain_scene_expands_to_the_point_itself() {
        let p = WorldPoint::new(3200, 3200, 0);
        assert_eq!(expand_to_instances(p, &SceneView::new(3160, 3160)), vec![p]);
    }

    #[test]
    fn plain_scene_collapse_adds_base() {
        let scene = SceneView::new(3160, 3152);
        let local = LocalPoint { x: 40, y: 48, plane: 1 };
        assert_eq!(
            collapse_from_instance(local, &scene),
            Some(WorldPoint::new(3200, 3200, 1))
        );
        assert_eq!(scene.to_local(WorldPoint::new(3200, 3200, 1)), Some(local));
    }

    #[test]
    fn collapse_outside_scene_is_none() {
        let scene = SceneView::new(0, 0);
        let local = LocalPoint { x: SCENE_SIZE, y: 0, plane: 0 };
        assert_eq!(collapse_from_instance(local, &scene), None);
        assert_eq!(scene.to_local(WorldPoint::new(-1, 5, 0)), None);
    }

    #[test]
    fn two_instance_copies_yield_two_points() {
        let template_point = WorldPoint::new(3203, 3205, 0);
        let mut templates = InstanceTemplates::empty();
        templates.set(0, 2, 3, template_for(template_point, 0));
        templates.set(1, 7, 7, template_for(template_point, 0));
        let scene = SceneView::instanced(8000, 4000, templates);

        let points = expand_to_instances(template_point, &scene);
        assert_eq!(
            points,
            vec![
                WorldPoint::new(8000 + 16 + 3, 4000 + 24 + 5, 0),
                WorldPoint::new(8000 + 56 + 3, 4000 + 56 + 5, 1),
            ]
        );
    }

    #[test]
    fn unloaded_template_expands_to_nothing() {
        let mut templates = InstanceTemplates::empty();
        templates.set(0, 0, 0, template_for(WorldPoint::new(100, 100, 0), 0));
        let scene = SceneView::instanced(8000, 4000, templates);
        assert!(expand_to_instances(WorldPoint::new(3200, 3200, 0), &scene).is_empty());
    }

    #[test]
    fn rotated_chunks_collapse_back_to_template() {
        let template_point = WorldPoint::new(3202, 3207, 0);
        for rotation in 0..4 {
            let mut templates = InstanceTemplates::empty();
            templates.set(2, 5, 6, template_for(template_point, rotation));
            let scene = SceneView::instanced(6400, 6400, templates);

            let copies = expand_to_instances(template_point, &scene);
            assert_eq!(copies.len(), 1, "rotation {rotation}");
            let local = scene.to_local(copies[0]).unwrap();
            assert_eq!(
                collapse_from_instance(local, &scene),
                Some(template_point),
                "rotation {rotation}"
            );
        }
    }

    #[test]
    fn quarter_turn_moves_offset() {
        // (2, 7) turned once becomes (7, 5) inside the chunk
        let template_point = WorldPoint::new(3202, 3207, 0);
        let mut templates = InstanceTemplates::empty();
        templates.set(0, 0, 0, template_for(template_point, 1));
        let scene = SceneView::instanced(6400, 6400, templates);
        assert_eq!(
            expand_to_instances(template_point, &scene),
            vec![WorldPoint::new(6407, 6405, 0)]
        );
    }

    #[test]
    fn empty_instance_chunk_collapses_to_none() {
        let scene = SceneView::instanced(6400, 6400, InstanceTemplates::empty());
        assert_eq!(
            collapse_from_instance(LocalPoint { x: 3, y: 3, plane: 0 }, &scene),
            None
        );
    }
}
