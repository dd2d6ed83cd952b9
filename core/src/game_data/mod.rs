//! Static game data
//!
//! NPC ids of random events and other scripted encounters. Their appearance
//! is tied to the player rather than to the tile, so they never produce
//! markers. Generated at build time from `data/event_npcs.json`.

include!(concat!(env!("OUT_DIR"), "/event_npcs.rs"));

/// Whether `npc_id` belongs to a random event or scripted encounter.
#[inline]
pub fn is_event_npc(npc_id: i32) -> bool {
    EVENT_NPC_IDS.contains(&npc_id)
}
