use std::sync::Arc;

use chrono::NaiveDateTime;
use spawn_marker_types::{Color, MarkerSettings};

use crate::context::GameContext;
use crate::coords::{RegionId, SceneView, collapse_from_instance, expand_to_instances};
use crate::error::Result;
use crate::events::{EventHandler, GameEvent, GameState, SpawnEvent};
use crate::filter::{FilterReason, SpawnFilter};
use crate::marker::{PositionRecord, WorldMarker};
use crate::storage::{ConfigStore, RegionStore};

/// What [`MarkerService::observe_spawn`] did with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpawnOutcome {
    /// A new marker was stored.
    Recorded(PositionRecord),
    /// The tile already had a marker; the stored one is unchanged.
    AlreadyMarked(PositionRecord),
    Filtered(FilterReason),
    /// The spawn tile does not map to a template tile (outside the scene or
    /// on an empty instance chunk).
    Unmapped,
}

/// Records spawn locations and serves the markers for the loaded regions.
#[derive(Debug)]
pub struct MarkerService<S> {
    store: RegionStore<S>,
    filter: SpawnFilter,
    default_color: Color,
    markers: Arc<[WorldMarker]>,
    /// Start of the current grace window.
    started_at: NaiveDateTime,
}

impl<S: ConfigStore> MarkerService<S> {
    /// Create a service and open its first grace window at `now`.
    pub fn new(store: S, settings: &MarkerSettings, now: NaiveDateTime) -> Self {
        Self {
            store: RegionStore::with_group(store, settings.config_group.clone()),
            filter: SpawnFilter::new(settings),
            default_color: settings.default_color,
            markers: Arc::from(Vec::new()),
            started_at: now,
        }
    }

    pub fn with_filter(mut self, filter: SpawnFilter) -> Self {
        self.filter = filter;
        self
    }

    /// (Re)start: spawns are ignored for the grace window after `now`.
    pub fn start(&mut self, now: NaiveDateTime) {
        tracing::info!(%now, "Spawn marker started");
        self.started_at = now;
    }

    pub fn started_at(&self) -> NaiveDateTime {
        self.started_at
    }

    /// Current marker snapshot. Not filtered by plane or distance.
    pub fn markers(&self) -> Arc<[WorldMarker]> {
        Arc::clone(&self.markers)
    }

    /// Every state transition restarts the grace window; logging in also
    /// reloads the markers for the new scene.
    pub fn on_game_state_changed(
        &mut self,
        state: GameState,
        ctx: &dyn GameContext,
        now: NaiveDateTime,
    ) -> Arc<[WorldMarker]> {
        self.started_at = now;
        if state != GameState::LoggedIn {
            return self.markers();
        }
        self.reload_all(ctx)
    }

    /// Rebuild the snapshot from the stored records of every loaded region.
    ///
    /// A region whose data cannot be read is logged and skipped.
    pub fn reload_all(&mut self, ctx: &dyn GameContext) -> Arc<[WorldMarker]> {
        let markers = build_markers(&self.store, ctx.map_regions(), ctx.scene());
        tracing::debug!(
            regions = ctx.map_regions().len(),
            markers = markers.len(),
            "Reloaded markers"
        );
        self.markers = Arc::from(markers);
        self.markers()
    }

    /// Record `event` if it passes the filter, then reload.
    pub fn observe_spawn(
        &mut self,
        event: &SpawnEvent,
        ctx: &dyn GameContext,
        now: NaiveDateTime,
    ) -> Result<SpawnOutcome> {
        if let Err(reason) = self
            .filter
            .evaluate(event, ctx.player_position(), self.started_at, now)
        {
            tracing::trace!(npc_id = event.npc_id, name = ?event.name, %reason, "Spawn ignored");
            return Ok(SpawnOutcome::Filtered(reason));
        }

        let scene = ctx.scene();
        let Some(template_point) = scene
            .to_local(event.position)
            .and_then(|local| collapse_from_instance(local, scene))
        else {
            tracing::debug!(position = %event.position, "Spawn outside the loaded scene");
            return Ok(SpawnOutcome::Unmapped);
        };

        let record = PositionRecord::from_world(
            template_point,
            Some(self.default_color),
            event.name.clone(),
        );
        tracing::debug!(?record, %template_point, "Updating point");

        let added = self.store.record_if_new(record.region_id, record.clone())?;
        self.reload_all(ctx);

        Ok(if added {
            SpawnOutcome::Recorded(record)
        } else {
            SpawnOutcome::AlreadyMarked(record)
        })
    }

    /// Drop every stored marker of the loaded regions and empty the snapshot.
    ///
    /// Markers only live for a session; disabling the plugin forgets them.
    pub fn shutdown(&mut self, ctx: &dyn GameContext) -> Result<()> {
        self.markers = Arc::from(Vec::new());
        for &region_id in ctx.map_regions() {
            self.store.clear(region_id)?;
        }
        tracing::info!(regions = ctx.map_regions().len(), "Spawn marker stopped, markers cleared");
        Ok(())
    }

    pub fn region_store(&self) -> &RegionStore<S> {
        &self.store
    }

    pub fn region_store_mut(&mut self) -> &mut RegionStore<S> {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store.into_inner()
    }
}

impl<S: ConfigStore> EventHandler for MarkerService<S> {
    fn handle_event(
        &mut self,
        event: &GameEvent,
        ctx: &dyn GameContext,
        now: NaiveDateTime,
    ) -> Result<()> {
        match event {
            GameEvent::PluginStarted => self.start(now),
            GameEvent::PluginStopped => self.shutdown(ctx)?,
            GameEvent::GameStateChanged { state } => {
                self.on_game_state_changed(*state, ctx, now);
            }
            GameEvent::NpcSpawned(spawn) => {
                self.observe_spawn(spawn, ctx, now)?;
            }
        }
        Ok(())
    }
}

/// Expand the records of `regions` into world markers for `scene`.
fn build_markers<S: ConfigStore>(
    store: &RegionStore<S>,
    regions: &[RegionId],
    scene: &SceneView,
) -> Vec<WorldMarker> {
    let mut markers = Vec::new();

    for &region_id in regions {
        let records = match store.load(region_id) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(region_id, error = %e, "Skipping region with unreadable markers");
                continue;
            }
        };

        for record in &records {
            markers.extend(
                expand_to_instances(record.world_point(), scene)
                    .into_iter()
                    .map(|point| WorldMarker::at(point, record)),
            );
        }
    }

    markers
}
