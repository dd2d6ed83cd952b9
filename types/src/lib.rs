//! Shared types for spawn-marker.
//!
//! Kept dependency-light so the replay binary and any future overlay front end
//! can share settings without pulling in the core crate.

pub mod color;
pub mod settings;

pub use color::Color;
pub use settings::MarkerSettings;
