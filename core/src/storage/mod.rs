//! Marker persistence
//!
//! Markers are partitioned by region. Each region's records live under their
//! own key of the host config store, so loading a scene only touches the
//! regions it contains.

mod config_store;
mod region_store;

pub use config_store::{ConfigStore, FileConfigStore, MemoryConfigStore, default_store_path};
pub use region_store::{RegionStore, region_key};
