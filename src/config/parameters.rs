use serde::{Deserialize, Serialize};

use crate::config::source::ConfigSource;

/// Configuration keys read by [`SimulationParameters::initialize`].
///
/// Several keys are spelled differently from the field they set
/// ("PrimFriction" sets `default_friction`, "AvatarCapsuleWidth" sets
/// `avatar_shape_width`, and so on). Existing region configuration files
/// depend on these exact spellings.
pub mod keys {
    pub const GPU_ENABLED: &str = "GPUEnabled";
    pub const CPU_MAX_THREADS: &str = "CPUMaxThreads";
    pub const MAX_UPDATES: &str = "MaxUpdates";
    pub const MAX_COLLISIONS: &str = "MaxCollisions";
    pub const PRIM_FRICTION: &str = "PrimFriction";
    pub const PRIM_DENSITY: &str = "PrimDensity";
    pub const PRIM_RESTITUTION: &str = "PrimRestitution";
    pub const AVATAR_CAPSULE_WIDTH: &str = "AvatarCapsuleWidth";
    pub const AVATAR_CAPSULE_DEPTH: &str = "AvatarCapsuleDepth";
    pub const AVATAR_STANDING_FRICTION: &str = "AvatarStandingFriction";
    pub const AVATAR_DENSITY: &str = "AvatarDensity";
    pub const RUN_FACTOR: &str = "RunFactor";
    pub const BUOYANCY_DENSITY: &str = "BuoyancyDensity";
    pub const HEIGHT_FIELD_SCALE_FACTOR: &str = "HeightFieldScaleFactor";
}

/// Simulation tuning values consumed by the engine wrapper when it builds
/// physics-world settings, avatar shapes, and terrain collision geometry.
///
/// Constructed with hard-coded defaults, optionally overridden once from a
/// configuration source at startup, then treated as read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationParameters {
    // Engine dispatch
    pub gpu_enabled: bool,
    pub cpu_max_threads: i32,
    pub max_updates_per_frame: i32,
    pub max_collisions_per_frame: i32,

    // World integration
    pub physics_time_step: f32,
    pub gravity: f32,

    // Generic object defaults
    pub default_friction: f32,
    pub default_density: f32,
    pub default_restitution: f32,

    // Avatar shape and material
    pub avatar_shape_height: f32,
    pub avatar_shape_width: f32,
    pub avatar_shape_depth: f32,
    pub avatar_static_friction: f32,
    pub avatar_kinetic_friction: f32,
    pub avatar_density: f32,
    pub avatar_restitution: f32,
    pub run_factor: f32,

    // Collision geometry
    pub collision_margin: f32,
    pub ground_plane_height: f32,
    pub terrain_friction: f32,
    pub terrain_restitution: f32,
    pub terrain_collision_margin: f32,

    // Region boundaries and fluids
    pub crossing_failures_before_out_of_bounds: i32,
    /// Fluid density used in buoyancy calculations, in kg/m^3.
    pub buoyancy_density: f32,
    /// Scale factor applied to height-field samples stored as integers by
    /// the native engine. Must be greater than 0; a value greater than 1
    /// loses precision.
    pub height_field_scale_factor: f32,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            gpu_enabled: false,
            cpu_max_threads: 1,
            max_updates_per_frame: 8192,
            max_collisions_per_frame: 8192,
            physics_time_step: 0.89,
            gravity: -9.80665,
            default_friction: 0.2,
            default_density: 1000.000_683_6,
            default_restitution: 0.0,
            avatar_shape_height: 1.5,
            avatar_shape_width: 0.6,
            avatar_shape_depth: 0.45,
            avatar_static_friction: 0.95,
            avatar_kinetic_friction: 0.2,
            avatar_density: 3500.0,
            avatar_restitution: 0.0,
            run_factor: 1.3,
            collision_margin: 0.04,
            ground_plane_height: -10.0,
            terrain_friction: 0.2,
            terrain_restitution: 0.0,
            terrain_collision_margin: 0.04,
            crossing_failures_before_out_of_bounds: 5,
            buoyancy_density: 1000.0,
            height_field_scale_factor: 0.01,
        }
    }
}

impl SimulationParameters {
    /// Overwrites parameters with values from `source`; a key that is
    /// absent (or unparsable) leaves the constructor default standing.
    ///
    /// Only the keys in [`keys`] are consulted; the remaining parameters
    /// are tuned at compile time only. No range validation is performed —
    /// sane configuration is the operator's responsibility. Idempotent,
    /// but intended to run exactly once before the parameters are handed
    /// out read-only.
    pub fn initialize(&mut self, source: &dyn ConfigSource) {
        self.gpu_enabled = source.get_bool(keys::GPU_ENABLED, self.gpu_enabled);
        self.cpu_max_threads = source.get_int(keys::CPU_MAX_THREADS, self.cpu_max_threads);
        self.max_updates_per_frame = source.get_int(keys::MAX_UPDATES, self.max_updates_per_frame);
        self.max_collisions_per_frame =
            source.get_int(keys::MAX_COLLISIONS, self.max_collisions_per_frame);
        self.default_friction = source.get_float(keys::PRIM_FRICTION, self.default_friction);
        self.default_density = source.get_float(keys::PRIM_DENSITY, self.default_density);
        self.default_restitution =
            source.get_float(keys::PRIM_RESTITUTION, self.default_restitution);
        self.avatar_shape_width =
            source.get_float(keys::AVATAR_CAPSULE_WIDTH, self.avatar_shape_width);
        self.avatar_shape_depth =
            source.get_float(keys::AVATAR_CAPSULE_DEPTH, self.avatar_shape_depth);
        self.avatar_static_friction =
            source.get_float(keys::AVATAR_STANDING_FRICTION, self.avatar_static_friction);
        self.avatar_density = source.get_float(keys::AVATAR_DENSITY, self.avatar_density);
        self.run_factor = source.get_float(keys::RUN_FACTOR, self.run_factor);
        self.buoyancy_density = source.get_float(keys::BUOYANCY_DENSITY, self.buoyancy_density);
        self.height_field_scale_factor = source.get_float(
            keys::HEIGHT_FIELD_SCALE_FACTOR,
            self.height_field_scale_factor,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::source::MemoryConfigSource;

    #[test]
    fn test_constructor_defaults() {
        let params = SimulationParameters::default();

        assert!(!params.gpu_enabled);
        assert_eq!(params.cpu_max_threads, 1);
        assert_eq!(params.max_updates_per_frame, 8192);
        assert_eq!(params.default_friction, 0.2);
        assert_eq!(params.gravity, -9.80665);
        assert_eq!(params.avatar_shape_width, 0.6);
        assert_eq!(params.crossing_failures_before_out_of_bounds, 5);
        assert_eq!(params.height_field_scale_factor, 0.01);
    }

    #[test]
    fn test_initialize_overrides_present_keys_only() {
        let mut params = SimulationParameters::default();
        let mut source = MemoryConfigSource::new();
        source.set("PrimFriction", 0.5_f32);

        params.initialize(&source);

        assert_eq!(params.default_friction, 0.5);
        // Everything else keeps the constructor default
        assert_eq!(params.default_density, 1000.000_683_6);
        assert_eq!(params.default_restitution, 0.0);
        assert_eq!(params.run_factor, 1.3);
        assert_eq!(params.height_field_scale_factor, 0.01);
    }

    #[test]
    fn test_initialize_reads_aliased_keys() {
        let mut params = SimulationParameters::default();
        let mut source = MemoryConfigSource::new();
        source.set("AvatarCapsuleWidth", 0.8_f32);
        source.set("AvatarStandingFriction", 0.7_f32);
        source.set("MaxUpdates", 4096);

        params.initialize(&source);

        assert_eq!(params.avatar_shape_width, 0.8);
        assert_eq!(params.avatar_static_friction, 0.7);
        assert_eq!(params.max_updates_per_frame, 4096);
    }

    #[test]
    fn test_initialize_ignores_keys_outside_the_table() {
        let mut params = SimulationParameters::default();
        let mut source = MemoryConfigSource::new();
        // Gravity is compile-time tuned; a config entry for it is inert.
        source.set("Gravity", -3.711_f32);

        params.initialize(&source);

        assert_eq!(params.gravity, -9.80665);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let mut params = SimulationParameters::default();
        let mut source = MemoryConfigSource::new();
        source.set("CPUMaxThreads", 4);
        source.set("BuoyancyDensity", 1025.0_f32);

        params.initialize(&source);
        let first = params.clone();
        params.initialize(&source);

        assert_eq!(params.cpu_max_threads, first.cpu_max_threads);
        assert_eq!(params.buoyancy_density, first.buoyancy_density);
    }

    #[test]
    fn test_out_of_range_values_accepted_as_is() {
        let mut params = SimulationParameters::default();
        let mut source = MemoryConfigSource::new();
        source.set("HeightFieldScaleFactor", -1.0_f32);

        params.initialize(&source);

        assert_eq!(params.height_field_scale_factor, -1.0);
    }
}
