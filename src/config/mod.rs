pub mod parameters;
pub mod source;

pub use parameters::SimulationParameters;
pub use source::{ConfigError, ConfigSource, ConfigValue, MemoryConfigSource, YamlConfigSource};
