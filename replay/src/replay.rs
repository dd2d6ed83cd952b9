use std::io::{self, BufRead, Write};

use chrono::{Duration, NaiveDateTime, Utc};
use serde::Deserialize;
use spawn_marker_core::overlay::drawable;
use spawn_marker_core::{
    ConfigStore, EventHandler, GameContext, GameEvent, MarkerError, MarkerService, SpawnOutcome,
    WorldMarker, WorldSnapshot,
};
use spawn_marker_types::MarkerSettings;

/// One line of replay input.
#[derive(Debug, Deserialize)]
pub struct ReplayStep {
    /// Seconds since the replay started.
    pub at: f64,
    /// World state from this step on; the previous one is kept when absent.
    #[serde(default)]
    pub context: Option<WorldSnapshot>,
    pub event: GameEvent,
}

pub struct Replay<S> {
    service: MarkerService<S>,
    settings: MarkerSettings,
    context: WorldSnapshot,
    epoch: NaiveDateTime,
}

impl<S: ConfigStore> Replay<S> {
    pub fn new(store: S, settings: MarkerSettings) -> Self {
        let epoch = Utc::now().naive_utc();
        Self {
            service: MarkerService::new(store, &settings, epoch),
            settings,
            context: WorldSnapshot::default(),
            epoch,
        }
    }

    pub fn service(&self) -> &MarkerService<S> {
        &self.service
    }

    /// Wall-clock time of a step `at` seconds into the replay. `None` when the
    /// offset is not representable.
    pub fn timestamp(&self, at: f64) -> Option<NaiveDateTime> {
        let millis = (at * 1000.0).round();
        if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
            return None;
        }
        let offset = Duration::try_milliseconds(millis as i64)?;
        self.epoch.checked_add_signed(offset)
    }

    /// Apply one step at `now`. Returns the spawn outcome for spawn events.
    pub fn apply(
        &mut self,
        step: &ReplayStep,
        now: NaiveDateTime,
    ) -> Result<Option<SpawnOutcome>, MarkerError> {
        if let Some(context) = &step.context {
            self.context = context.clone();
        }

        match &step.event {
            GameEvent::NpcSpawned(spawn) => {
                let outcome = self.service.observe_spawn(spawn, &self.context, now)?;
                Ok(Some(outcome))
            }
            event => {
                self.service.handle_event(event, &self.context, now)?;
                Ok(None)
            }
        }
    }

    /// Run every step in `input`, reporting to `out`. Blank lines and lines
    /// starting with `#` are skipped. Returns the number of steps applied.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        input: R,
        out: &mut W,
        all: bool,
    ) -> Result<usize, ReplayError> {
        let mut applied = 0;

        for (idx, line) in input.lines().enumerate() {
            let line = line.map_err(ReplayError::Io)?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let step: ReplayStep = serde_json::from_str(line).map_err(|source| {
                ReplayError::Parse {
                    line: idx + 1,
                    source,
                }
            })?;
            let now = self
                .timestamp(step.at)
                .ok_or(ReplayError::BadTimestamp { line: idx + 1 })?;
            let outcome = self.apply(&step, now).map_err(ReplayError::Store)?;
            applied += 1;

            writeln!(out, "[{:>7.1}s] {}", step.at, describe(&step.event, outcome.as_ref()))
                .map_err(ReplayError::Io)?;
            self.print_markers(out, all).map_err(ReplayError::Io)?;
        }

        tracing::info!(steps = applied, "Replay finished");
        Ok(applied)
    }

    /// End the session. Unless `keep` is set the loaded regions are cleared,
    /// as when the plugin is disabled.
    pub fn finish(mut self, keep: bool) -> Result<S, MarkerError> {
        if !keep {
            self.service.shutdown(&self.context)?;
        }
        Ok(self.service.into_store())
    }

    fn print_markers<W: Write>(&self, out: &mut W, all: bool) -> io::Result<()> {
        let markers = self.service.markers();
        if all {
            for marker in markers.iter() {
                writeln!(out, "    {}", format_marker(marker))?;
            }
            return Ok(());
        }

        let Some(player) = self.context.player_position() else {
            return Ok(());
        };
        for draw in drawable(&markers, self.context.plane(), player, &self.settings) {
            writeln!(
                out,
                "    draw {} {} {}",
                draw.world_point,
                draw.color,
                draw.label.unwrap_or("")
            )?;
        }
        Ok(())
    }
}

fn format_marker(marker: &WorldMarker) -> String {
    let color = marker
        .color
        .map(|c| c.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "marker {} {} {}",
        marker.world_point,
        color,
        marker.label.as_deref().unwrap_or("")
    )
}

fn describe(event: &GameEvent, outcome: Option<&SpawnOutcome>) -> String {
    match (event, outcome) {
        (GameEvent::NpcSpawned(spawn), Some(outcome)) => {
            let name = spawn.name.as_deref().unwrap_or("<unnamed>");
            let result = match outcome {
                SpawnOutcome::Recorded(record) => format!("recorded at {}", record.world_point()),
                SpawnOutcome::AlreadyMarked(record) => {
                    format!("already marked at {}", record.world_point())
                }
                SpawnOutcome::Filtered(reason) => format!("ignored ({reason})"),
                SpawnOutcome::Unmapped => "ignored (outside scene)".to_string(),
            };
            format!("spawn {name} #{} -> {result}", spawn.npc_id)
        }
        (GameEvent::NpcSpawned(spawn), None) => format!("spawn #{}", spawn.npc_id),
        (GameEvent::PluginStarted, _) => "plugin started".to_string(),
        (GameEvent::PluginStopped, _) => "plugin stopped".to_string(),
        (GameEvent::GameStateChanged { state }, _) => format!("game state {state:?}"),
    }
}

/// Errors that can occur while replaying
#[derive(Debug)]
pub enum ReplayError {
    Io(io::Error),
    Parse {
        line: usize,
        source: serde_json::Error,
    },
    BadTimestamp {
        line: usize,
    },
    Store(MarkerError),
}

impl std::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(source) => write!(f, "IO error: {}", source),
            Self::Parse { line, source } => write!(f, "Parse error on line {}: {}", line, source),
            Self::BadTimestamp { line } => write!(f, "Step time out of range on line {}", line),
            Self::Store(source) => write!(f, "Store error: {}", source),
        }
    }
}

impl std::error::Error for ReplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(source) => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::BadTimestamp { .. } => None,
            Self::Store(source) => Some(source),
        }
    }
}
