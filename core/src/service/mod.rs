//! Marker service
//!
//! Owns the in-memory marker list and keeps it in step with the store.
//!
//! ```text
//!   GameEvent::NpcSpawned ──► SpawnFilter ──► collapse to template point
//!                                                   │
//!                                                   ▼
//!                                  RegionStore::record_if_new (region_<id>)
//!                                                   │
//!   GameEvent::GameStateChanged(LoggedIn) ──► reload_all ◄┘
//!                                                   │
//!                                                   ▼
//!                                   Arc<[WorldMarker]> snapshot ──► overlay
//! ```
//!
//! The snapshot is swapped wholesale on every reload, so a renderer holding
//! the previous `Arc` keeps a complete (if stale) list.

mod tracker;


pub use tracker::{MarkerService, SpawnOutcome};
