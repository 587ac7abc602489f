pub mod heightmap;

pub use heightmap::{TerrainHeightmap, FALLBACK_HEIGHT, INITIAL_LAST_HEIGHT};
