//! Per-chunk cache of border samples from an old-generation chunk.
//!
//! A chunk keeps 16 sample columns on a quart grid: seven along its own
//! minimum x and z edges ("inside") and nine along its maximum edges
//! ("outside"), which are shared with the neighbouring chunks. Each column
//! stores a surface height, a density per 8-block cell and a biome per quart.

use std::sync::{Arc, OnceLock};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use strata_utils::math::{floor, floor_div, positive_modulo};
use strata_utils::{BlockPos, QuartPos, SectionPos};

use crate::chunk::{BiomeId, ChunkAccess, ChunkStatus, WorldGenRegion};
use crate::worldgen::blending::{Direction8, Direction8Set};

/// Number of sample columns per chunk.
pub const CELL_COLUMN_COUNT: usize = 16;

/// Marks a column without a sample.
pub const NO_VALUE: f64 = f64::MAX;

const CELLS_PER_SECTION_Y: i32 = 2;
const CELL_HEIGHT: i32 = 8;
const QUARTS_PER_SECTION: i32 = 4;
const CELL_HORIZONTAL_MAX_INDEX_INSIDE: i32 = 3;
const CELL_HORIZONTAL_MAX_INDEX_OUTSIDE: i32 = 4;
const CELL_COLUMN_INSIDE_COUNT: i32 = 7;
const DENSITY_FACTOR: f64 = 0.1;
const SOLID_DENSITY: f64 = 0.1;

#[allow(clippy::float_cmp)]
pub(crate) fn has_value(value: f64) -> bool {
    value != NO_VALUE
}

/// Column index of an inside cell (`x == 0 || z == 0`, both `0..=3`).
const fn inside_index(x: i32, z: i32) -> usize {
    (CELL_HORIZONTAL_MAX_INDEX_INSIDE - x + z) as usize
}

/// Column index of an outside cell (`x == 4 || z == 4`, both `0..=4`).
const fn outside_index(x: i32, z: i32) -> usize {
    (CELL_COLUMN_INSIDE_COUNT + CELL_HORIZONTAL_MAX_INDEX_OUTSIDE + x - z) as usize
}

/// Local cell x of a column index.
const fn cell_x(index: usize) -> i32 {
    let i = index as i32;
    if i < CELL_COLUMN_INSIDE_COUNT {
        zero_if_negative(CELL_HORIZONTAL_MAX_INDEX_INSIDE - i)
    } else {
        let offset = i - CELL_COLUMN_INSIDE_COUNT;
        CELL_HORIZONTAL_MAX_INDEX_OUTSIDE
            - zero_if_negative(CELL_HORIZONTAL_MAX_INDEX_OUTSIDE - offset)
    }
}

/// Local cell z of a column index.
const fn cell_z(index: usize) -> i32 {
    let i = index as i32;
    if i < CELL_COLUMN_INSIDE_COUNT {
        zero_if_negative(i - CELL_HORIZONTAL_MAX_INDEX_INSIDE)
    } else {
        let offset = i - CELL_COLUMN_INSIDE_COUNT;
        CELL_HORIZONTAL_MAX_INDEX_OUTSIDE
            - zero_if_negative(offset - CELL_HORIZONTAL_MAX_INDEX_OUTSIDE)
    }
}

const fn zero_if_negative(value: i32) -> i32 {
    if value < 0 { 0 } else { value }
}

/// Column index of a local cell, or `None` for cells off the two rings.
const fn column_index(x: i32, z: i32) -> Option<usize> {
    if x < 0
        || z < 0
        || x > CELL_HORIZONTAL_MAX_INDEX_OUTSIDE
        || z > CELL_HORIZONTAL_MAX_INDEX_OUTSIDE
    {
        None
    } else if x == CELL_HORIZONTAL_MAX_INDEX_OUTSIDE || z == CELL_HORIZONTAL_MAX_INDEX_OUTSIDE {
        Some(outside_index(x, z))
    } else if x == 0 || z == 0 {
        Some(inside_index(x, z))
    } else {
        None
    }
}

/// Columns filled by [`BlendingData::calculate_data`].
#[derive(Debug)]
struct BlendingColumns {
    heights: [f64; CELL_COLUMN_COUNT],
    densities: [Option<Box<[f64]>>; CELL_COLUMN_COUNT],
    biomes: [Option<Box<[BiomeId]>>; CELL_COLUMN_COUNT],
}

/// Border samples of one old-generation chunk.
///
/// The vertical extent is the section range the chunk was generated with,
/// which may differ from the current world height. Heights may be loaded
/// from a save; densities and biomes are always recomputed by
/// [`calculate_data`](Self::calculate_data), which runs at most once.
#[doc(alias = "BlendCache")]
#[derive(Debug)]
pub struct BlendingData {
    min_section: i32,
    max_section: i32,
    stored_heights: [f64; CELL_COLUMN_COUNT],
    columns: OnceLock<BlendingColumns>,
}

impl BlendingData {
    /// Create a cache with no stored heights over sections
    /// `min_section..max_section`.
    #[must_use]
    pub fn new(min_section: i32, max_section: i32) -> Self {
        Self::with_heights(min_section, max_section, [NO_VALUE; CELL_COLUMN_COUNT])
    }

    fn with_heights(
        min_section: i32,
        max_section: i32,
        stored_heights: [f64; CELL_COLUMN_COUNT],
    ) -> Self {
        Self {
            min_section,
            max_section,
            stored_heights,
            columns: OnceLock::new(),
        }
    }

    /// Lowest section of the old generation area.
    #[must_use]
    pub const fn min_section(&self) -> i32 {
        self.min_section
    }

    /// One above the highest section of the old generation area.
    #[must_use]
    pub const fn max_section(&self) -> i32 {
        self.max_section
    }

    /// Lowest block y of the old generation area.
    #[must_use]
    pub const fn min_y(&self) -> i32 {
        SectionPos::section_to_block(self.min_section)
    }

    /// One above the highest block y of the old generation area.
    #[must_use]
    pub const fn max_y(&self) -> i32 {
        SectionPos::section_to_block(self.max_section)
    }

    /// Height of the old generation area in blocks.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.max_y() - self.min_y()
    }

    const fn min_cell_y(&self) -> i32 {
        self.min_section * CELLS_PER_SECTION_Y
    }

    const fn cell_count(&self) -> usize {
        zero_if_negative((self.max_section - self.min_section) * CELLS_PER_SECTION_Y) as usize
    }

    const fn min_quart_y(&self) -> i32 {
        self.min_section * QUARTS_PER_SECTION
    }

    const fn quart_count(&self) -> usize {
        zero_if_negative((self.max_section - self.min_section) * QUARTS_PER_SECTION) as usize
    }

    /// Whether [`calculate_data`](Self::calculate_data) has run.
    #[must_use]
    pub fn has_calculated_data(&self) -> bool {
        self.columns.get().is_some()
    }

    fn heights(&self) -> &[f64; CELL_COLUMN_COUNT] {
        self.columns
            .get()
            .map_or(&self.stored_heights, |columns| &columns.heights)
    }

    /// Sample the border columns facing `new_sides`, the neighbours that
    /// are generated fresh.
    ///
    /// Only the first call on an instance samples; later calls return
    /// without looking at `chunk`.
    pub fn calculate_data<C: ChunkAccess + ?Sized>(&self, chunk: &C, new_sides: Direction8Set) {
        self.columns.get_or_init(|| {
            debug!(
                "Calculating blending data for chunk {} with new sides {new_sides:?}",
                chunk.pos()
            );
            self.sample_columns(chunk, new_sides)
        });
    }

    fn sample_columns<C: ChunkAccess + ?Sized>(
        &self,
        chunk: &C,
        new_sides: Direction8Set,
    ) -> BlendingColumns {
        use Direction8::{East, North, NorthEast, NorthWest, South, SouthEast, West};

        let mut columns = BlendingColumns {
            heights: self.stored_heights,
            densities: Default::default(),
            biomes: Default::default(),
        };
        let pos = chunk.pos();
        let min_x = pos.min_block_x();
        let min_z = pos.min_block_z();
        let mut add = |index: usize, x: i32, z: i32| {
            self.add_values_for_column(&mut columns, index, chunk, min_x + x, min_z + z);
        };

        if new_sides.contains(North) || new_sides.contains(West) || new_sides.contains(NorthWest) {
            add(inside_index(0, 0), 0, 0);
        }
        if new_sides.contains(North) {
            for i in 1..QUARTS_PER_SECTION {
                add(inside_index(i, 0), 4 * i, 0);
            }
        }
        if new_sides.contains(West) {
            for i in 1..QUARTS_PER_SECTION {
                add(inside_index(0, i), 0, 4 * i);
            }
        }
        if new_sides.contains(East) {
            for i in 1..QUARTS_PER_SECTION {
                add(outside_index(CELL_HORIZONTAL_MAX_INDEX_OUTSIDE, i), 15, 4 * i);
            }
        }
        if new_sides.contains(South) {
            for i in 0..QUARTS_PER_SECTION {
                add(outside_index(i, CELL_HORIZONTAL_MAX_INDEX_OUTSIDE), 4 * i, 15);
            }
        }
        if new_sides.contains(East) && new_sides.contains(NorthEast) {
            add(outside_index(CELL_HORIZONTAL_MAX_INDEX_OUTSIDE, 0), 15, 0);
        }
        if new_sides.contains(East) && new_sides.contains(South) && new_sides.contains(SouthEast) {
            let max = CELL_HORIZONTAL_MAX_INDEX_OUTSIDE;
            add(outside_index(max, max), 15, 15);
        }

        columns
    }

    fn add_values_for_column<C: ChunkAccess + ?Sized>(
        &self,
        columns: &mut BlendingColumns,
        index: usize,
        chunk: &C,
        x: i32,
        z: i32,
    ) {
        if !has_value(columns.heights[index]) {
            columns.heights[index] = f64::from(self.height_at(chunk, x, z));
        }
        let height = floor(columns.heights[index]);
        columns.densities[index] = Some(self.density_column(chunk, x, z, height));
        columns.biomes[index] = Some(self.biome_column(chunk, x, z));
    }

    /// Highest ground block of a column, or the bottom of the area if the
    /// column has none.
    fn height_at<C: ChunkAccess + ?Sized>(&self, chunk: &C, x: i32, z: i32) -> i32 {
        let max_y = self.max_y();
        let start = chunk
            .world_surface_height(x, z)
            .map_or(max_y, |surface| (surface + 1).min(max_y));
        (self.min_y()..start)
            .rev()
            .find(|&y| is_ground(chunk, x, y, z))
            .unwrap_or_else(|| self.min_y())
    }

    /// Per-cell density of a column: the share of ground in a 15 block
    /// window, with the two cells around the surface set so the linear
    /// reconstruction is zero at `height + 0.5`.
    fn density_column<C: ChunkAccess + ?Sized>(
        &self,
        chunk: &C,
        x: i32,
        z: i32,
        height: i32,
    ) -> Box<[f64]> {
        let len = self.cell_count();
        let mut densities = vec![-1.0; len].into_boxed_slice();
        if len == 0 {
            return densities;
        }

        for (i, density) in densities.iter_mut().take(len - 1).enumerate() {
            let center = (self.min_cell_y() + i as i32) * CELL_HEIGHT;
            let sum: i32 = (-7..=7)
                .map(|k| if is_ground(chunk, x, center + k - 1, z) { 1 } else { -1 })
                .sum();
            *density = f64::from(sum) / 15.0;
        }

        let surface_cell = floor_div(height, CELL_HEIGHT) - self.min_cell_y();
        if surface_cell >= 0 && (surface_cell as usize) < len - 1 {
            let index = surface_cell as usize;
            let offset = positive_modulo(f64::from(height) + 0.5, 8.0) / 8.0;
            let above = (1.0 - offset) / offset;
            let below = above.max(1.0) * 0.25;
            densities[index + 1] = -above / below;
            densities[index] = 1.0 / below;
        }

        densities
    }

    fn biome_column<C: ChunkAccess + ?Sized>(&self, chunk: &C, x: i32, z: i32) -> Box<[BiomeId]> {
        let quart_x = QuartPos::from_block(x);
        let quart_z = QuartPos::from_block(z);
        (0..self.quart_count() as i32)
            .map(|i| chunk.noise_biome(quart_x, self.min_quart_y() + i, quart_z))
            .collect()
    }

    /// Stored height of a local cell (`0..=4` on both axes), or
    /// [`NO_VALUE`] for cells off the rings or not yet sampled.
    #[must_use]
    pub fn get_height(&self, cell_x: i32, _cell_y: i32, cell_z: i32) -> f64 {
        column_index(cell_x, cell_z).map_or(NO_VALUE, |index| self.heights()[index])
    }

    /// Stored density of a local cell at world cell y, scaled by 0.1, or
    /// [`NO_VALUE`].
    ///
    /// The bottom cell of a sampled column reads as solid.
    #[must_use]
    pub fn get_density(&self, cell_x: i32, cell_y: i32, cell_z: i32) -> f64 {
        let Some(column) = column_index(cell_x, cell_z)
            .and_then(|index| self.columns.get()?.densities[index].as_deref())
        else {
            return NO_VALUE;
        };
        if cell_y == self.min_cell_y() {
            return SOLID_DENSITY;
        }
        usize::try_from(cell_y - self.min_cell_y())
            .ok()
            .and_then(|row| column.get(row))
            .map_or(NO_VALUE, |density| density * DENSITY_FACTOR)
    }

    /// Visit every sampled height as `(quart_x, quart_z, height)`.
    ///
    /// `min_quart_x` and `min_quart_z` are the quart coordinates of the
    /// chunk's minimum corner.
    pub fn iterate_heights(
        &self,
        min_quart_x: i32,
        min_quart_z: i32,
        mut consumer: impl FnMut(i32, i32, f64),
    ) {
        for (index, &height) in self.heights().iter().enumerate() {
            if has_value(height) {
                consumer(
                    min_quart_x + cell_x(index),
                    min_quart_z + cell_z(index),
                    height,
                );
            }
        }
    }

    /// Visit every sampled density in world cell rows
    /// `from_cell_y..to_cell_y` as `(quart_x, cell_y, quart_z, density)`.
    pub fn iterate_densities(
        &self,
        min_quart_x: i32,
        min_quart_z: i32,
        from_cell_y: i32,
        to_cell_y: i32,
        mut consumer: impl FnMut(i32, i32, i32, f64),
    ) {
        let Some(columns) = self.columns.get() else {
            return;
        };
        let min_cell_y = self.min_cell_y();
        let from = (from_cell_y - min_cell_y).max(0);
        let to = (to_cell_y - min_cell_y).min(self.cell_count() as i32);

        for (index, column) in columns.densities.iter().enumerate() {
            let Some(column) = column else {
                continue;
            };
            let x = min_quart_x + cell_x(index);
            let z = min_quart_z + cell_z(index);
            for row in from..to {
                consumer(x, row + min_cell_y, z, column[row as usize] * DENSITY_FACTOR);
            }
        }
    }

    /// Visit every sampled biome at `quart_y` as `(quart_x, quart_z, biome)`.
    pub fn iterate_biomes(
        &self,
        min_quart_x: i32,
        quart_y: i32,
        min_quart_z: i32,
        mut consumer: impl FnMut(i32, i32, BiomeId),
    ) {
        let Some(columns) = self.columns.get() else {
            return;
        };
        let Ok(row) = usize::try_from(quart_y - self.min_quart_y()) else {
            return;
        };
        if row >= self.quart_count() {
            return;
        }

        for (index, column) in columns.biomes.iter().enumerate() {
            if let Some(&biome) = column.as_deref().and_then(|column| column.get(row)) {
                consumer(
                    min_quart_x + cell_x(index),
                    min_quart_z + cell_z(index),
                    biome,
                );
            }
        }
    }

    /// The persisted form. Heights are left out when none is sampled.
    #[must_use]
    pub fn pack(&self) -> Packed {
        let heights = self.heights();
        Packed {
            min_section: self.min_section,
            max_section: self.max_section,
            heights: heights
                .iter()
                .copied()
                .any(has_value)
                .then(|| heights.to_vec()),
        }
    }

    /// Rebuild a cache from its persisted form.
    #[must_use]
    pub fn unpack(packed: &Packed) -> Self {
        let mut heights = [NO_VALUE; CELL_COLUMN_COUNT];
        if let Some(stored) = &packed.heights {
            for (slot, &height) in heights.iter_mut().zip(stored) {
                *slot = height;
            }
        }
        Self::with_heights(packed.min_section, packed.max_section, heights)
    }

    /// The shared cache of a chunk in the region, sampled against its new
    /// neighbours.
    ///
    /// `None` when the chunk is not loaded, has no cache or has not reached
    /// [`ChunkStatus::Biomes`].
    pub fn get_or_update<R: WorldGenRegion + ?Sized>(
        region: &R,
        chunk_x: i32,
        chunk_z: i32,
    ) -> Option<Arc<Self>> {
        let chunk = region.chunk(chunk_x, chunk_z)?;
        let data = chunk.blending_data()?;
        if chunk.status().is_before(ChunkStatus::Biomes) {
            return None;
        }
        data.calculate_data(
            chunk,
            Self::side_by_generation_age(region, chunk_x, chunk_z, false),
        );
        Some(Arc::clone(data))
    }

    /// Directions whose loaded neighbour has `is_old_noise_generation() == old`.
    pub fn side_by_generation_age<R: WorldGenRegion + ?Sized>(
        region: &R,
        chunk_x: i32,
        chunk_z: i32,
        old: bool,
    ) -> Direction8Set {
        Direction8::ALL
            .into_iter()
            .filter(|direction| {
                region
                    .chunk(chunk_x + direction.step_x(), chunk_z + direction.step_z())
                    .is_some_and(|neighbour| neighbour.is_old_noise_generation() == old)
            })
            .collect()
    }
}

fn is_ground<C: ChunkAccess + ?Sized>(chunk: &C, x: i32, y: i32, z: i32) -> bool {
    chunk.block_state(BlockPos::new(x, y, z)).is_ground()
}

/// Errors decoding a persisted [`BlendingData`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlendingDecodeError {
    /// The heights list has the wrong length.
    #[error("expected {expected} blending heights, found {found}")]
    HeightCount {
        /// Required length.
        expected: usize,
        /// Length found.
        found: usize,
    },
    /// The section range is empty.
    #[error("blending area {min_section}..{max_section} is empty")]
    EmptyArea {
        /// Lowest section.
        min_section: i32,
        /// One above the highest section.
        max_section: i32,
    },
}

/// Persisted form of a [`BlendingData`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPacked")]
pub struct Packed {
    /// Lowest section of the old generation area.
    pub min_section: i32,
    /// One above the highest section.
    pub max_section: i32,
    /// Column heights in column index order, absent when none is sampled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heights: Option<Vec<f64>>,
}

/// Unvalidated [`Packed`] as read from storage.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPacked {
    /// Lowest section.
    pub min_section: i32,
    /// One above the highest section.
    pub max_section: i32,
    /// Column heights.
    #[serde(default)]
    pub heights: Option<Vec<f64>>,
}

impl TryFrom<RawPacked> for Packed {
    type Error = BlendingDecodeError;

    fn try_from(raw: RawPacked) -> Result<Self, Self::Error> {
        let result = validate(&raw).map(|()| Self {
            min_section: raw.min_section,
            max_section: raw.max_section,
            heights: raw.heights,
        });
        if let Err(err) = &result {
            warn!("Discarding blending data: {err}");
        }
        result
    }
}

fn validate(raw: &RawPacked) -> Result<(), BlendingDecodeError> {
    if raw.min_section >= raw.max_section {
        return Err(BlendingDecodeError::EmptyArea {
            min_section: raw.min_section,
            max_section: raw.max_section,
        });
    }
    if let Some(heights) = &raw.heights
        && heights.len() != CELL_COLUMN_COUNT
    {
        return Err(BlendingDecodeError::HeightCount {
            expected: CELL_COLUMN_COUNT,
            found: heights.len(),
        });
    }
    Ok(())
}
