pub mod config;
pub mod terrain;

pub use config::{
    ConfigError, ConfigSource, MemoryConfigSource, SimulationParameters, YamlConfigSource,
};
pub use terrain::{TerrainHeightmap, FALLBACK_HEIGHT, INITIAL_LAST_HEIGHT};
