//! Blends freshly generated terrain toward neighbouring old chunks.

use std::sync::{Arc, LazyLock};

use log::debug;
use rustc_hash::FxHashMap;
use strata_utils::density::DensityContext;
use strata_utils::math::{clamp, floor_div, length2, length3, lerp, positive_modulo};
use strata_utils::noise::{NoiseParameters, NormalNoise};
use strata_utils::random::xoroshiro::Xoroshiro;
use strata_utils::{BlockPos, ChunkPos, QuartPos};

use crate::chunk::{BiomeId, ChunkAccess, WorldGenRegion};
use crate::worldgen::blending::blending_data::has_value;
use crate::worldgen::blending::{BlendingConfig, BlendingData, Direction8, NO_VALUE};

/// Jitters biome borders and the carving mask around old chunks.
static SHIFT_NOISE: LazyLock<NormalNoise> = LazyLock::new(|| {
    NormalNoise::create(
        &mut Xoroshiro::from_seed(42),
        NoiseParameters::new(-3, [1.0, 1.0, 1.0, 0.0]),
    )
    .expect("shift noise parameters are constant and valid")
});

static EMPTY: LazyLock<Arc<Blender>> = LazyLock::new(|| {
    Arc::new(Blender::new(
        FxHashMap::default(),
        FxHashMap::default(),
        BlendingConfig::default(),
    ))
});

/// Carving mask over local x, world y and local z of a chunk.
pub type CarvingMaskFilter = Box<dyn Fn(i32, i32, i32) -> bool + Send + Sync>;

/// Result of [`Blender::blend_offset_and_factor`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendingOutput {
    /// Weight of the new terrain, 0 on an old sample and 1 out of range.
    pub alpha: f64,
    /// Terrain offset derived from the blended old height.
    pub blending_offset: f64,
}

/// Per-chunk blending facade.
///
/// Holds snapshots of the [`BlendingData`] of nearby old chunks: a wide
/// round map for height and biome blending and a narrow square map for
/// density blending. A blender with empty maps leaves everything unchanged.
#[derive(Debug)]
pub struct Blender {
    height_and_biome: FxHashMap<ChunkPos, Arc<BlendingData>>,
    density: FxHashMap<ChunkPos, Arc<BlendingData>>,
    config: BlendingConfig,
}

impl Blender {
    /// Build a blender from explicit maps.
    #[must_use]
    pub fn new(
        height_and_biome: FxHashMap<ChunkPos, Arc<BlendingData>>,
        density: FxHashMap<ChunkPos, Arc<BlendingData>>,
        config: BlendingConfig,
    ) -> Self {
        Self {
            height_and_biome,
            density,
            config,
        }
    }

    /// The shared blender that changes nothing.
    #[must_use]
    pub fn empty() -> Arc<Self> {
        Arc::clone(&EMPTY)
    }

    /// Whether both maps are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.height_and_biome.is_empty() && self.density.is_empty()
    }

    /// Blending config in effect.
    #[must_use]
    pub const fn config(&self) -> &BlendingConfig {
        &self.config
    }

    /// Build the blender for the center chunk of `region`.
    ///
    /// Returns [`Blender::empty`] unless an old chunk lies within the height
    /// blending radius. Chunks without usable data are left out.
    pub fn of<R: WorldGenRegion + ?Sized>(region: &R, config: BlendingConfig) -> Arc<Self> {
        let center = region.center();
        let height_radius = config.height_chunk_radius();
        if !region.is_old_chunk_around(center, height_radius) {
            return Self::empty();
        }

        let density_radius = config.density_chunk_radius();
        let max_distance_sq = (height_radius + 1) * (height_radius + 1);
        let mut height_and_biome = FxHashMap::default();
        let mut density = FxHashMap::default();

        for dx in -height_radius..=height_radius {
            for dz in -height_radius..=height_radius {
                if dx * dx + dz * dz > max_distance_sq {
                    continue;
                }
                let pos = center.offset(dx, dz);
                let Some(data) = BlendingData::get_or_update(region, pos.x, pos.z) else {
                    continue;
                };
                if dx.abs() <= density_radius && dz.abs() <= density_radius {
                    density.insert(pos, Arc::clone(&data));
                }
                height_and_biome.insert(pos, data);
            }
        }

        if height_and_biome.is_empty() && density.is_empty() {
            return Self::empty();
        }
        debug!(
            "Blender for chunk {center}: {} height/biome and {} density sources",
            height_and_biome.len(),
            density.len()
        );
        Arc::new(Self::new(height_and_biome, density, config))
    }

    /// Height blend at a block column.
    pub fn blend_offset_and_factor(&self, block_x: i32, block_z: i32) -> BlendingOutput {
        let quart_x = QuartPos::from_block(block_x);
        let quart_z = QuartPos::from_block(block_z);
        let exact = self.get_blending_data_value(quart_x, 0, quart_z, BlendingData::get_height);
        if has_value(exact) {
            return BlendingOutput {
                alpha: 0.0,
                blending_offset: height_to_offset(exact),
            };
        }

        let range = self.config.height_range();
        let mut weighted = 0.0;
        let mut total_weight = 0.0;
        let mut closest = f64::INFINITY;
        for (pos, data) in &self.height_and_biome {
            data.iterate_heights(
                QuartPos::from_section(pos.x),
                QuartPos::from_section(pos.z),
                |x, z, height| {
                    let distance = length2(f64::from(quart_x - x), f64::from(quart_z - z));
                    if distance > range {
                        return;
                    }
                    closest = closest.min(distance);
                    let weight = 1.0 / distance.powi(4);
                    weighted += height * weight;
                    total_weight += weight;
                },
            );
        }

        if closest.is_infinite() {
            return BlendingOutput {
                alpha: 1.0,
                blending_offset: 0.0,
            };
        }

        let alpha = clamp(closest / (range + 1.0), 0.0, 1.0);
        BlendingOutput {
            alpha: 3.0 * alpha * alpha - 2.0 * alpha * alpha * alpha,
            blending_offset: height_to_offset(weighted / total_weight),
        }
    }

    /// Pull `density` toward cached old densities near the context position.
    pub fn blend_density(&self, ctx: &DensityContext, density: f64) -> f64 {
        let quart_x = QuartPos::from_block(ctx.x);
        let cell_y = floor_div(ctx.y, 8);
        let quart_z = QuartPos::from_block(ctx.z);
        let exact =
            self.get_blending_data_value(quart_x, cell_y, quart_z, BlendingData::get_density);
        if has_value(exact) {
            return exact;
        }

        let range = self.config.density_range();
        let mut weighted = 0.0;
        let mut total_weight = 0.0;
        let mut closest = f64::INFINITY;
        for (pos, data) in &self.density {
            data.iterate_densities(
                QuartPos::from_section(pos.x),
                QuartPos::from_section(pos.z),
                cell_y - 1,
                cell_y + 2,
                |x, y, z, value| {
                    let distance = length3(
                        f64::from(quart_x - x),
                        f64::from((cell_y - y) * 2),
                        f64::from(quart_z - z),
                    );
                    if distance > range {
                        return;
                    }
                    closest = closest.min(distance);
                    let weight = 1.0 / distance.powi(4);
                    weighted += value * weight;
                    total_weight += weight;
                },
            );
        }

        if closest.is_infinite() {
            return density;
        }

        let alpha = clamp(closest / (range + 1.0), 0.0, 1.0);
        lerp(alpha, weighted / total_weight, density)
    }

    /// Exact cached value at a quart column, also checking the chunks to
    /// the -x, -z and -x -z when the column sits on their shared edge.
    fn get_blending_data_value(
        &self,
        quart_x: i32,
        y: i32,
        quart_z: i32,
        getter: impl Fn(&BlendingData, i32, i32, i32) -> f64,
    ) -> f64 {
        let chunk_x = QuartPos::to_section(quart_x);
        let chunk_z = QuartPos::to_section(quart_z);
        let on_x_edge = QuartPos::local(quart_x) == 0;
        let on_z_edge = QuartPos::local(quart_z) == 0;
        let lookup = |cx: i32, cz: i32| {
            self.height_and_biome
                .get(&ChunkPos::new(cx, cz))
                .map_or(NO_VALUE, |data| {
                    getter(
                        data,
                        quart_x - QuartPos::from_section(cx),
                        y,
                        quart_z - QuartPos::from_section(cz),
                    )
                })
        };

        let mut value = lookup(chunk_x, chunk_z);
        if !has_value(value) && on_x_edge && on_z_edge {
            value = lookup(chunk_x - 1, chunk_z - 1);
        }
        if !has_value(value) && on_x_edge {
            value = lookup(chunk_x - 1, chunk_z);
        }
        if !has_value(value) && on_z_edge {
            value = lookup(chunk_x, chunk_z - 1);
        }
        value
    }

    /// Wrap a biome resolver so quarts close to old chunks take the biome
    /// the old chunks vote for.
    ///
    /// The resolver is called with quart coordinates and a sampler.
    pub fn get_biome_resolver<S, F>(
        &self,
        resolver: F,
    ) -> impl Fn(i32, i32, i32, &S) -> BiomeId
    where
        S: ?Sized,
        F: Fn(i32, i32, i32, &S) -> BiomeId,
    {
        move |quart_x, quart_y, quart_z, sampler: &S| {
            self.blend_biome(quart_x, quart_y, quart_z)
                .unwrap_or_else(|| resolver(quart_x, quart_y, quart_z, sampler))
        }
    }

    fn blend_biome(&self, quart_x: i32, quart_y: i32, quart_z: i32) -> Option<BiomeId> {
        let range = self.config.height_range();
        let mut votes: FxHashMap<BiomeId, f64> = FxHashMap::default();
        let mut exact: Option<BiomeId> = None;
        let mut closest = f64::INFINITY;

        for (pos, data) in &self.height_and_biome {
            data.iterate_biomes(
                QuartPos::from_section(pos.x),
                quart_y,
                QuartPos::from_section(pos.z),
                |x, z, biome| {
                    let distance = length2(f64::from(quart_x - x), f64::from(quart_z - z));
                    if distance > range {
                        return;
                    }
                    closest = closest.min(distance);
                    if distance == 0.0 {
                        exact = Some(exact.map_or(biome, |current| current.min(biome)));
                    } else {
                        *votes.entry(biome).or_default() += 1.0 / (distance * distance);
                    }
                },
            );
        }

        if closest.is_infinite() {
            return None;
        }

        let shift = SHIFT_NOISE.get_value(f64::from(quart_x), 0.0, f64::from(quart_z)) * 12.0;
        if clamp((closest + shift) / (range + 1.0), 0.0, 1.0) > 0.5 {
            return None;
        }

        exact.or_else(|| {
            votes
                .into_iter()
                .max_by(|a, b| a.1.total_cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
                .map(|(biome, _)| biome)
        })
    }

    /// Positions in `chunk` to mark for post-processing: leaves and fluids
    /// at the vertical limits of an old chunk and along horizontal sides
    /// that face a chunk of the other generation age.
    pub fn generate_border_ticks<R: WorldGenRegion + ?Sized>(
        region: &R,
        chunk: &R::Chunk,
    ) -> Vec<BlockPos> {
        let Some(data) = chunk.blending_data() else {
            return Vec::new();
        };
        let pos = chunk.pos();
        let old = chunk.is_old_noise_generation();
        let min_y = data.min_y();
        let max_y = data.max_y() - 1;
        let mut ticks = Vec::new();
        let mut check = |x: i32, y: i32, z: i32| {
            let block = BlockPos::new(pos.min_block_x() + x, y, pos.min_block_z() + z);
            let state = chunk.block_state(block);
            if state.is_leaves || state.has_fluid {
                ticks.push(block);
            }
        };

        if old {
            for x in 0..16 {
                for z in 0..16 {
                    check(x, min_y - 1, z);
                    check(x, min_y, z);
                    check(x, max_y, z);
                    check(x, max_y + 1, z);
                }
            }
        }

        for direction in Direction8::CARDINAL {
            let differs = region
                .chunk(pos.x + direction.step_x(), pos.z + direction.step_z())
                .is_some_and(|neighbour| neighbour.is_old_noise_generation() != old);
            if !differs {
                continue;
            }

            let from_x = if direction == Direction8::East { 15 } else { 0 };
            let to_x = if direction == Direction8::West { 0 } else { 15 };
            let from_z = if direction == Direction8::South { 15 } else { 0 };
            let to_z = if direction == Direction8::North { 0 } else { 15 };
            for x in from_x..=to_x {
                for z in from_z..=to_z {
                    let top = chunk
                        .motion_blocking_height(pos.min_block_x() + x, pos.min_block_z() + z)
                        - 1;
                    for y in min_y..=top.min(max_y) {
                        check(x, y, z);
                    }
                }
            }
        }

        ticks.sort_unstable();
        ticks.dedup();
        ticks
    }

    /// Distance from a local position to the nearest old chunk box.
    ///
    /// `data` is the cache of the chunk itself; each neighbour box is
    /// shifted by 16 blocks along its direction. Boxes span the full
    /// 16x16 column and the vertical extent of their cache.
    pub fn make_old_chunk_distance_getter(
        data: Option<&BlendingData>,
        neighbours: &[(Direction8, Arc<BlendingData>)],
    ) -> impl Fn(f64, f64, f64) -> f64 + Send + Sync + use<> {
        let boxes: Vec<OldChunkBox> = data
            .map(|data| OldChunkBox::new(0, 0, data))
            .into_iter()
            .chain(neighbours.iter().map(|(direction, data)| {
                OldChunkBox::new(direction.step_x() * 16, direction.step_z() * 16, data)
            }))
            .collect();

        move |x, y, z| {
            boxes
                .iter()
                .map(|old| old.distance(x, y, z))
                .fold(f64::INFINITY, f64::min)
        }
    }

    /// Carving mask keeping carvers a few jittered blocks away from old
    /// chunks, or `None` when neither `chunk` nor any neighbour is old.
    pub fn add_around_old_chunks_carving_mask_filter<R: WorldGenRegion + ?Sized>(
        region: &R,
        chunk: &R::Chunk,
    ) -> Option<CarvingMaskFilter> {
        let pos = chunk.pos();
        let neighbours: Vec<(Direction8, Arc<BlendingData>)> = Direction8::ALL
            .into_iter()
            .filter_map(|direction| {
                let neighbour =
                    region.chunk(pos.x + direction.step_x(), pos.z + direction.step_z())?;
                Some((direction, Arc::clone(neighbour.blending_data()?)))
            })
            .collect();

        if !chunk.is_old_noise_generation() && neighbours.is_empty() {
            return None;
        }

        let distance =
            Self::make_old_chunk_distance_getter(chunk.blending_data().map(Arc::as_ref), &neighbours);
        Some(Box::new(move |x, y, z| {
            let (fx, fy, fz) = (f64::from(x), f64::from(y), f64::from(z));
            let jittered_x = fx + 0.5 + SHIFT_NOISE.get_value(fx, fy, fz) * 4.0;
            let jittered_y = fy + 0.5 + SHIFT_NOISE.get_value(fy, fz, fx) * 4.0;
            let jittered_z = fz + 0.5 + SHIFT_NOISE.get_value(fz, fx, fy) * 4.0;
            distance(jittered_x, jittered_y, jittered_z) < 4.0
        }))
    }
}

/// Vertical extent and horizontal offset of one old chunk.
#[derive(Debug, Clone, Copy)]
struct OldChunkBox {
    offset_x: f64,
    offset_z: f64,
    half_height: f64,
    center_y: f64,
}

impl OldChunkBox {
    fn new(offset_x: i32, offset_z: i32, data: &BlendingData) -> Self {
        let half_height = f64::from(data.height()) / 2.0;
        Self {
            offset_x: f64::from(offset_x),
            offset_z: f64::from(offset_z),
            half_height,
            center_y: f64::from(data.min_y()) + half_height,
        }
    }

    fn distance(&self, x: f64, y: f64, z: f64) -> f64 {
        let dx = ((x - 8.0 - self.offset_x).abs() - 8.0).max(0.0);
        let dy = ((y - self.center_y).abs() - self.half_height).max(0.0);
        let dz = ((z - 8.0 - self.offset_z).abs() - 8.0).max(0.0);
        length3(dx, dy, dz)
    }
}

/// Terrain offset for an old surface height.
///
/// Zero at the surface, piecewise so the offset crosses cell boundaries
/// the way the old terrain shape did.
#[must_use]
pub fn height_to_offset(height: f64) -> f64 {
    let t = height + 0.5;
    let m = positive_modulo(t, 8.0);
    (32.0 * (t - 128.0) - 3.0 * (t - 120.0) * m + 3.0 * m * m) / (128.0 * (32.0 - 3.0 * m))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sampled(index: usize, height: f64) -> Arc<BlendingData> {
        let mut heights = vec![NO_VALUE; crate::worldgen::blending::CELL_COLUMN_COUNT];
        heights[index] = height;
        let packed = crate::worldgen::blending::Packed {
            min_section: 0,
            max_section: 8,
            heights: Some(heights),
        };
        Arc::new(BlendingData::unpack(&packed))
    }

    fn single(pos: ChunkPos, data: Arc<BlendingData>) -> Blender {
        let mut map = FxHashMap::default();
        map.insert(pos, data);
        Blender::new(map, FxHashMap::default(), BlendingConfig::default())
    }

    #[test]
    fn test_empty_is_noop() {
        let blender = Blender::empty();
        assert!(blender.is_empty());
        let output = blender.blend_offset_and_factor(17, -40);
        assert!((output.alpha - 1.0).abs() < f64::EPSILON);
        assert!(output.blending_offset.abs() < f64::EPSILON);
        let ctx = DensityContext::new(3, 70, 9);
        assert!((blender.blend_density(&ctx, 0.375) - 0.375).abs() < f64::EPSILON);
    }

    #[test]
    fn test_edge_lookahead() {
        // Column 11 is cell (4, 4) of chunk (0, 0), the corner shared with
        // cell (0, 0) of chunk (1, 1).
        let blender = single(ChunkPos::new(0, 0), sampled(11, 50.0));
        let output = blender.blend_offset_and_factor(16, 16);
        assert!(output.alpha.abs() < f64::EPSILON);
        assert!((output.blending_offset - height_to_offset(50.0)).abs() < 1e-12);
    }

    #[test]
    fn test_alpha_grows_with_distance() {
        let blender = single(ChunkPos::new(0, 0), sampled(3, 64.0));
        let near = blender.blend_offset_and_factor(4, 4);
        let far = blender.blend_offset_and_factor(20, 20);
        assert!(near.alpha > 0.0 && near.alpha < far.alpha && far.alpha <= 1.0);
        assert!((near.blending_offset - height_to_offset(64.0)).abs() < 1e-12);
    }

    #[test]
    fn test_height_to_offset_continuous_at_cell_edges() {
        for base in [-64.0, 0.0, 56.0, 120.0] {
            let below = height_to_offset(base + 7.5 - 1e-9);
            let above = height_to_offset(base + 7.5);
            assert!((below - above).abs() < 1e-6, "{base}: {below} vs {above}");
        }
    }

    #[test]
    fn test_distance_to_box() {
        let data = BlendingData::new(0, 4);
        let distance = Blender::make_old_chunk_distance_getter(Some(&data), &[]);
        assert!(distance(8.0, 32.0, 8.0).abs() < f64::EPSILON);
        assert!((distance(8.0, 67.0, 8.0) - 3.0).abs() < 1e-12);
        assert!((distance(20.0, 32.0, 8.0) - 4.0).abs() < 1e-12);

        let shifted = Blender::make_old_chunk_distance_getter(
            None,
            &[(Direction8::East, Arc::new(BlendingData::new(0, 4)))],
        );
        assert!(shifted(20.0, 32.0, 8.0).abs() < f64::EPSILON);
        assert!((shifted(-3.0, 32.0, 8.0) - 19.0).abs() < 1e-12);
    }
}
