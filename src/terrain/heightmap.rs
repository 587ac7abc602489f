use glam::Vec2;
use log::debug;

/// Height pre-seeded into the query cache at construction. Never returned
/// as a query result: the cache starts invalid, so the first call always
/// derives a real sample.
pub const INITIAL_LAST_HEIGHT: f32 = 24.876;

/// Height substituted when a query cannot be resolved to a grid sample:
/// negative or non-finite coordinates, positions beyond the region
/// extents, or a grid shorter than the extents imply.
pub const FALLBACK_HEIGHT: f32 = 24.765;

// Cache seed position, unreachable in any real region.
const LAST_QUERY_SENTINEL: Vec2 = Vec2::new(999_999.0, 999_999.0);

/// Single-slot memo of the most recent height query.
///
/// Reusable iff `valid` is set and the incoming position is exactly equal
/// to `last_query`. Physics engines re-query a settled body's position
/// many times per second, so the exact-equality fast path hits often.
#[derive(Debug, Clone, Copy)]
struct QueryCache {
    last_query: Vec2,
    last_height: f32,
    valid: bool,
}

/// Marker for a query that falls outside the known grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SampleOutOfRange;

/// Answers terrain height queries against a flat height-field grid.
///
/// One instance serves one terrain snapshot. Editing the terrain means
/// constructing a new heightmap from the new grid and swapping it into
/// the owning slot, so the cache never needs in-place invalidation.
pub struct TerrainHeightmap {
    height_map: Vec<f32>,
    region_size_x: f32,
    region_size_y: f32,
    cache: QueryCache,
    computed_samples: u64,
    fallback_samples: u64,
}

impl TerrainHeightmap {
    /// `height_map` is row-major with a `region_size_y` stride; the
    /// extents are world units and always whole numbers in practice. The
    /// grid length is not validated against the extents — a short grid
    /// resolves the missing positions to [`FALLBACK_HEIGHT`] instead.
    pub fn new(height_map: Vec<f32>, region_size_x: f32, region_size_y: f32) -> Self {
        Self {
            height_map,
            region_size_x,
            region_size_y,
            cache: QueryCache {
                last_query: LAST_QUERY_SENTINEL,
                last_height: INITIAL_LAST_HEIGHT,
                valid: false,
            },
            computed_samples: 0,
            fallback_samples: 0,
        }
    }

    /// Terrain height at world position `(x, y)`.
    ///
    /// Called up to once per dynamic body per physics step. A repeat of
    /// the previous query returns the memoized height without touching
    /// the grid. A position that cannot be resolved to a sample yields
    /// [`FALLBACK_HEIGHT`] rather than an error, so a transient
    /// out-of-range query (e.g. mid region crossing) never halts a step.
    pub fn height_at(&mut self, position: Vec2) -> f32 {
        if self.cache.valid
            && position.x == self.cache.last_query.x
            && position.y == self.cache.last_query.y
        {
            return self.cache.last_height;
        }

        self.cache.valid = true;
        self.cache.last_query = position;
        self.computed_samples += 1;

        let height = match self.sample(position) {
            Ok(height) => height,
            Err(SampleOutOfRange) => {
                self.fallback_samples += 1;
                debug!(
                    "terrain height query at ({}, {}) outside known grid, substituting {}",
                    position.x, position.y, FALLBACK_HEIGHT
                );
                FALLBACK_HEIGHT
            }
        };

        self.cache.last_height = height;
        height
    }

    /// Resolves a position to a grid sample, or reports it out of range.
    fn sample(&self, position: Vec2) -> Result<f32, SampleOutOfRange> {
        if !position.x.is_finite() || !position.y.is_finite() {
            return Err(SampleOutOfRange);
        }

        // Negative coordinates are never wrapped or clamped into a
        // neighboring tile; a single-region deployment has no negative
        // local coordinates, so these take the fallback.
        if position.x < 0.0 || position.y < 0.0 {
            return Err(SampleOutOfRange);
        }

        // Origin of the region tile containing the position, located by
        // truncating division. This instance only knows the tile at the
        // world origin; a position in any other tile belongs to a
        // neighboring region's heightmap.
        let origin = Vec2::new(
            (position.x / self.region_size_x).trunc() * self.region_size_x,
            (position.y / self.region_size_y).trunc() * self.region_size_y,
        );
        if origin != Vec2::ZERO {
            return Err(SampleOutOfRange);
        }

        // Row-major flat index with a region_size_y stride. Arithmetic
        // truncates toward zero, matching integer-cast semantics; an
        // index too large for i64 is out of range like any other.
        let row = (position.y - origin.y).trunc() as i64;
        let col = (position.x - origin.x).trunc() as i64;

        row.checked_mul(self.region_size_y as i64)
            .and_then(|base| base.checked_add(col))
            .and_then(|index| usize::try_from(index).ok())
            .and_then(|index| self.height_map.get(index))
            .copied()
            .ok_or(SampleOutOfRange)
    }

    /// Whether `(x, y)` lies inside this region's extents, inclusive of
    /// the upper edges. Used by callers to decide whether a neighboring
    /// region should answer the query instead. No cache involvement.
    pub fn is_within_region(&self, position: Vec2) -> bool {
        (0.0..=self.region_size_x).contains(&position.x)
            && (0.0..=self.region_size_y).contains(&position.y)
    }

    pub fn region_size_x(&self) -> f32 {
        self.region_size_x
    }

    pub fn region_size_y(&self) -> f32 {
        self.region_size_y
    }

    /// Number of queries that missed the cache and derived a sample.
    pub fn computed_samples(&self) -> u64 {
        self.computed_samples
    }

    /// Number of queries that resolved to [`FALLBACK_HEIGHT`].
    pub fn fallback_samples(&self) -> u64 {
        self.fallback_samples
    }
}
