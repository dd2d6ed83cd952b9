use spawn_marker_types::settings::DEFAULT_CONFIG_GROUP;

use super::ConfigStore;
use crate::coords::RegionId;
use crate::error::{MarkerError, Result};
use crate::marker::PositionRecord;

const REGION_PREFIX: &str = "region_";

/// Config key holding a region's records.
pub fn region_key(region_id: RegionId) -> String {
    format!("{REGION_PREFIX}{region_id}")
}

/// Per-region marker collections on top of a [`ConfigStore`].
///
/// Each region is one JSON array under `region_<id>` in a single config group.
/// An empty collection is never written; the key is removed instead.
#[derive(Debug, Clone)]
pub struct RegionStore<S> {
    store: S,
    group: String,
}

impl<S: ConfigStore> RegionStore<S> {
    pub fn new(store: S) -> Self {
        Self::with_group(store, DEFAULT_CONFIG_GROUP)
    }

    pub fn with_group(store: S, group: impl Into<String>) -> Self {
        Self {
            store,
            group: group.into(),
        }
    }

    /// Records stored for `region_id`; empty when nothing is stored.
    pub fn load(&self, region_id: RegionId) -> Result<Vec<PositionRecord>> {
        let Some(json) = self.store.get(&self.group, &region_key(region_id)) else {
            return Ok(Vec::new());
        };
        if json.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&json).map_err(|source| MarkerError::MalformedRegion { region_id, source })
    }

    /// Replace the region's records. An empty slice removes the key.
    pub fn save(&mut self, region_id: RegionId, records: &[PositionRecord]) -> Result<()> {
        let key = region_key(region_id);
        if records.is_empty() {
            self.store.unset(&self.group, &key);
            return Ok(());
        }

        let json = serde_json::to_string(records)
            .map_err(|source| MarkerError::Serialize { region_id, source })?;
        self.store.set(&self.group, &key, json);
        Ok(())
    }

    /// Append `record` unless a record for the same tile exists.
    /// Returns whether it was added.
    pub fn record_if_new(&mut self, region_id: RegionId, record: PositionRecord) -> Result<bool> {
        let mut records = self.load(region_id)?;
        if records.contains(&record) {
            return Ok(false);
        }

        records.push(record);
        self.save(region_id, &records)?;
        Ok(true)
    }

    pub fn clear(&mut self, region_id: RegionId) -> Result<()> {
        self.save(region_id, &[])
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::WorldPoint;
    use crate::storage::MemoryConfigStore;
    use spawn_marker_types::Color;

    const REGION: RegionId = 12850;

    fn goblin_at(x: i32, y: i32) -> PositionRecord {
        PositionRecord::from_world(
            WorldPoint::new(x, y, 0),
            Some(Color::rgb(255, 108, 0)),
            Some("Goblin".to_string()),
        )
    }

    #[test]
    fn absent_region_loads_empty() {
        let store = RegionStore::new(MemoryConfigStore::new());
        assert!(store.load(REGION).unwrap().is_empty());
    }

    #[test]
    fn blank_value_loads_empty() {
        let mut mem = MemoryConfigStore::new();
        mem.set("spawnMarker", "region_12850", "".to_string());
        let store = RegionStore::new(mem);
        assert!(store.load(REGION).unwrap().is_empty());
    }

    #[test]
    fn malformed_value_is_an_error() {
        let mut mem = MemoryConfigStore::new();
        mem.set("spawnMarker", "region_12850", "[{\"regionId\":".to_string());
        let store = RegionStore::new(mem);

        let err = store.load(REGION).unwrap_err();
        assert!(matches!(
            err,
            MarkerError::MalformedRegion { region_id: REGION, .. }
        ));
    }

    #[test]
    fn save_then_load_returns_records() {
        let mut store = RegionStore::new(MemoryConfigStore::new());
        let records = vec![goblin_at(3200, 3200), goblin_at(3201, 3200)];
        store.save(REGION, &records).unwrap();

        let loaded = store.load(REGION).unwrap();
        assert_eq!(loaded, records);
        assert_eq!(loaded[0].label.as_deref(), Some("Goblin"));
    }

    #[test]
    fn saving_empty_removes_key() {
        let mut store = RegionStore::new(MemoryConfigStore::new());
        store.save(REGION, &[goblin_at(3200, 3200)]).unwrap();
        assert!(store.store().contains("spawnMarker", "region_12850"));

        store.save(REGION, &[]).unwrap();
        assert!(!store.store().contains("spawnMarker", "region_12850"));
        assert!(store.load(REGION).unwrap().is_empty());
    }

    #[test]
    fn record_if_new_keeps_first_label_and_color() {
        let mut store = RegionStore::new(MemoryConfigStore::new());
        let first = goblin_at(3200, 3200);
        let second = PositionRecord::from_world(
            WorldPoint::new(3200, 3200, 0),
            Some(Color::rgb(0, 0, 255)),
            Some("Imp".to_string()),
        );

        assert!(store.record_if_new(REGION, first).unwrap());
        assert!(!store.record_if_new(REGION, second).unwrap());

        let loaded = store.load(REGION).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].label.as_deref(), Some("Goblin"));
        assert_eq!(loaded[0].color, Some(Color::rgb(255, 108, 0)));
    }

    #[test]
    fn record_if_new_propagates_corruption() {
        let mut mem = MemoryConfigStore::new();
        mem.set("spawnMarker", "region_12850", "not json".to_string());
        let mut store = RegionStore::new(mem);

        assert!(store.record_if_new(REGION, goblin_at(3200, 3200)).is_err());
        // The corrupt value is left alone
        assert_eq!(
            store.store().get("spawnMarker", "region_12850").as_deref(),
            Some("not json")
        );
    }

    #[test]
    fn duplicate_record_leaves_file_store_clean() {
        let path = std::env::temp_dir()
            .join(format!("spawn-marker-dup-{}", std::process::id()))
            .join("store.json");
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
        let file = crate::storage::FileConfigStore::load_from_disk(&path).unwrap();
        let mut store = RegionStore::new(file);

        assert!(store.record_if_new(REGION, goblin_at(3200, 3200)).unwrap());
        store.store_mut().save_to_disk().unwrap();
        assert!(!store.store().is_dirty());

        assert!(!store.record_if_new(REGION, goblin_at(3200, 3200)).unwrap());
        assert!(!store.store().is_dirty());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn clear_removes_only_that_region() {
        let mut store = RegionStore::new(MemoryConfigStore::new());
        store.save(REGION, &[goblin_at(3200, 3200)]).unwrap();
        store.save(12851, &[goblin_at(3200, 3264)]).unwrap();

        store.clear(REGION).unwrap();
        assert!(store.load(REGION).unwrap().is_empty());
        assert_eq!(store.load(12851).unwrap().len(), 1);
    }

    #[test]
    fn reads_legacy_color_objects() {
        let mut mem = MemoryConfigStore::new();
        mem.set(
            "spawnMarker",
            "region_12850",
            r#"[{"regionId":12850,"regionX":5,"regionY":6,"z":0,"color":{"value":-37888,"falpha":0.0},"label":"Goblin"}]"#
                .to_string(),
        );
        let store = RegionStore::new(mem);

        let loaded = store.load(REGION).unwrap();
        assert_eq!(loaded[0].color, Some(Color::rgb(255, 108, 0)));
        assert_eq!(loaded[0].world_point(), WorldPoint::new(3205, 3206, 0));
    }

    #[test]
    fn custom_group_is_respected() {
        let mut store = RegionStore::with_group(MemoryConfigStore::new(), "other");
        store.save(REGION, &[goblin_at(3200, 3200)]).unwrap();
        assert!(store.store().contains("other", "region_12850"));
        assert!(!store.store().contains("spawnMarker", "region_12850"));
    }
}
