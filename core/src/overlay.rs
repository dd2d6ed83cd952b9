//! Overlay draw selection
//!
//! The marker snapshot is not pre-filtered. The overlay draws only markers on
//! the player's plane that are closer than the draw distance, falling back to
//! the default color and skipping empty labels.

use spawn_marker_types::{Color, MarkerSettings};

use crate::coords::WorldPoint;
use crate::marker::WorldMarker;

/// One tile the overlay should outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileDraw<'a> {
    pub world_point: WorldPoint,
    pub color: Color,
    /// Text drawn above the tile, if any.
    pub label: Option<&'a str>,
}

/// Markers to draw this frame.
pub fn drawable<'a>(
    markers: &'a [WorldMarker],
    plane: i32,
    player: WorldPoint,
    settings: &MarkerSettings,
) -> Vec<TileDraw<'a>> {
    markers
        .iter()
        .filter(|m| m.world_point.plane == plane)
        .filter(|m| m.world_point.distance_to(&player) < settings.max_draw_distance)
        .map(|m| TileDraw {
            world_point: m.world_point,
            color: m.color.unwrap_or(settings.default_color),
            label: m.label.as_deref().filter(|l| !l.is_empty()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(x: i32, plane: i32, label: Option<&str>) -> WorldMarker {
        WorldMarker {
            world_point: WorldPoint::new(x, 3200, plane),
            color: None,
            label: label.map(str::to_string),
        }
    }

    #[test]
    fn skips_other_planes_and_far_markers() {
        let settings = MarkerSettings::default();
        let player = WorldPoint::new(3200, 3200, 0);
        let markers = vec![
            marker(3210, 0, Some("Goblin")),
            marker(3210, 1, Some("Upstairs")),
            marker(3231, 0, Some("Edge")),
            marker(3232, 0, Some("Too far")),
        ];

        let draws = drawable(&markers, 0, player, &settings);
        let labels: Vec<_> = draws.iter().map(|d| d.label).collect();
        assert_eq!(labels, vec![Some("Goblin"), Some("Edge")]);
    }

    #[test]
    fn falls_back_to_default_color_and_drops_empty_labels() {
        let settings = MarkerSettings::default();
        let markers = vec![marker(3200, 0, Some(""))];
        let draws = drawable(&markers, 0, WorldPoint::new(3200, 3200, 0), &settings);
        assert_eq!(draws[0].color, settings.default_color);
        assert_eq!(draws[0].label, None);
    }

    #[test]
    fn whitespace_label_is_still_drawn() {
        let settings = MarkerSettings::default();
        let markers = vec![marker(3200, 0, Some(" "))];
        let draws = drawable(&markers, 0, WorldPoint::new(3200, 3200, 0), &settings);
        assert_eq!(draws[0].label, Some(" "));
    }
}
