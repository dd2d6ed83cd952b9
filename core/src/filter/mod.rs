//! Spawn event filter
//!
//! Decides whether a creature appearance is a genuine spawn worth marking.
//! Rules run in order and the first failing one wins:
//!
//! 1. Grace window after start / world change (creatures already standing
//!    around at login are not spawns)
//! 2. Non-blank name
//! 3. Not a random-event or scripted NPC
//! 4. Combat level above zero
//! 5. Within the save radius of the player

use std::fmt;

use chrono::{Duration, NaiveDateTime};
use spawn_marker_types::MarkerSettings;

use crate::coords::WorldPoint;
use crate::events::SpawnEvent;
use crate::game_data::EVENT_NPC_IDS;

/// Why an event did not produce a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterReason {
    InGraceWindow,
    BlankName,
    EventNpc,
    NotCombatant,
    NoPlayer,
    TooFar { distance: i32 },
}

impl fmt::Display for FilterReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InGraceWindow => write!(f, "within grace window"),
            Self::BlankName => write!(f, "blank name"),
            Self::EventNpc => write!(f, "random event NPC"),
            Self::NotCombatant => write!(f, "combat level 0"),
            Self::NoPlayer => write!(f, "no player position"),
            Self::TooFar { distance } if *distance == i32::MAX => write!(f, "different plane"),
            Self::TooFar { distance } => write!(f, "{distance} tiles away"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpawnFilter {
    grace: Duration,
    max_save_distance: i32,
    excluded: &'static phf::Set<i32>,
}

impl Default for SpawnFilter {
    fn default() -> Self {
        Self::new(&MarkerSettings::default())
    }
}

impl SpawnFilter {
    /// Grace windows too long for a `Duration` are clamped to its range.
    pub fn new(settings: &MarkerSettings) -> Self {
        let clamped = if settings.grace_secs < 0 {
            Duration::MIN
        } else {
            Duration::MAX
        };
        let grace = Duration::try_seconds(settings.grace_secs).unwrap_or(clamped);
        Self {
            grace,
            max_save_distance: settings.max_save_distance,
            excluded: &EVENT_NPC_IDS,
        }
    }

    /// Use a different exclusion set.
    pub fn with_excluded(mut self, excluded: &'static phf::Set<i32>) -> Self {
        self.excluded = excluded;
        self
    }

    /// Whether the grace window that began at `started_at` is still open.
    pub fn in_grace_window(&self, started_at: NaiveDateTime, now: NaiveDateTime) -> bool {
        now.signed_duration_since(started_at) <= self.grace
    }

    /// Check `event` against every rule. `Ok` means record it.
    pub fn evaluate(
        &self,
        event: &SpawnEvent,
        player: Option<WorldPoint>,
        started_at: NaiveDateTime,
        now: NaiveDateTime,
    ) -> Result<(), FilterReason> {
        if self.in_grace_window(started_at, now) {
            return Err(FilterReason::InGraceWindow);
        }

        if event.name.as_deref().is_none_or(|n| n.trim().is_empty()) {
            return Err(FilterReason::BlankName);
        }

        if self.excluded.contains(&event.npc_id) {
            return Err(FilterReason::EventNpc);
        }

        if event.combat_level <= 0 {
            return Err(FilterReason::NotCombatant);
        }

        let player = player.ok_or(FilterReason::NoPlayer)?;
        let distance = event.position.distance_to(&player);
        if distance > self.max_save_distance {
            return Err(FilterReason::TooFar { distance });
        }

        Ok(())
    }
}
