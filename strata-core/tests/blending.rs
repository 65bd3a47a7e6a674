//! Blending against old-generation chunks.
//!
//! Builds a small region with one old chunk at (0, 0) whose flat ground
//! tops out at y 70, surrounded by freshly generated chunks.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use strata_core::chunk::{
    BiomeId, BlockState, ChunkAccess, ChunkRegion, ChunkStatus, ProtoChunk, WorldGenRegion,
};
use strata_core::worldgen::blending::{
    BlendingConfig, BlendingData, BlendingDecodeError, Blender, CELL_COLUMN_COUNT, Direction8Set,
    NO_VALUE, Packed, RawPacked, height_to_offset,
};
use strata_utils::density::DensityContext;
use strata_utils::{BlockPos, ChunkPos};

const GROUND_TOP: i32 = 70;
const OLD_BIOME: BiomeId = BiomeId(5);
const NEW_BIOME: BiomeId = BiomeId(9);

fn chunk(x: i32, z: i32, old: bool) -> ProtoChunk {
    let mut chunk = ProtoChunk::new(ChunkPos::new(x, z), 0, 128);
    chunk.fill_layers(0, GROUND_TOP + 1, BlockState::STONE);
    chunk.fill_biome(if old { OLD_BIOME } else { NEW_BIOME });
    chunk.prime_heightmaps();
    chunk.set_status(ChunkStatus::Full);
    if old {
        chunk.set_old_noise_generation(true);
        chunk.set_blending_data(Some(Arc::new(BlendingData::new(0, 8))));
    }
    chunk
}

/// Chunks -3..=4 on both axes, old only at the listed positions.
fn region(center: ChunkPos, old: &[ChunkPos]) -> ChunkRegion<ProtoChunk> {
    let mut region = ChunkRegion::new(center);
    for x in -3..=4 {
        for z in -3..=4 {
            region.insert(chunk(x, z, old.contains(&ChunkPos::new(x, z))));
        }
    }
    region
}

fn blender() -> Arc<Blender> {
    let region = region(ChunkPos::new(1, 0), &[ChunkPos::new(0, 0)]);
    Blender::of(&region, BlendingConfig::default())
}

#[test]
fn exact_hit_uses_old_height() {
    let blender = blender();
    assert!(!blender.is_empty());

    let output = blender.blend_offset_and_factor(0, 0);
    assert!(output.alpha.abs() < f64::EPSILON);
    assert!((output.blending_offset - height_to_offset(f64::from(GROUND_TOP))).abs() < 1e-12);
}

#[test]
fn out_of_range_is_unblended() {
    // Nearest sampled cell is at quart x 4, ten quarts away.
    let output = blender().blend_offset_and_factor(56, 0);
    assert!((output.alpha - 1.0).abs() < f64::EPSILON);
    assert!(output.blending_offset.abs() < f64::EPSILON);
}

#[test]
fn no_old_chunks_is_noop() {
    let region = region(ChunkPos::new(1, 0), &[]);
    let blender = Blender::of(&region, BlendingConfig::default());
    assert!(Arc::ptr_eq(&blender, &Blender::empty()));

    for (x, z) in [(0, 0), (17, -3), (-100, 250)] {
        let output = blender.blend_offset_and_factor(x, z);
        assert!((output.alpha - 1.0).abs() < f64::EPSILON);
        assert!(output.blending_offset.abs() < f64::EPSILON);

        let ctx = DensityContext::new(x, 64, z);
        assert!((blender.blend_density(&ctx, -0.25) + 0.25).abs() < f64::EPSILON);
    }

    let resolver = blender.get_biome_resolver(|_, _, _, _: &()| NEW_BIOME);
    assert_eq!(resolver(0, 16, 0, &()), NEW_BIOME);
}

#[test]
fn old_chunk_out_of_radius_is_noop() {
    let region = region(ChunkPos::new(4, 4), &[ChunkPos::new(0, 0)]);
    let blender = Blender::of(&region, BlendingConfig::default());
    assert!(blender.is_empty());
}

#[test]
fn calculation_is_idempotent() {
    let region = region(ChunkPos::new(1, 0), &[ChunkPos::new(0, 0)]);
    let first = BlendingData::get_or_update(&region, 0, 0).unwrap();
    let packed = first.pack();
    let second = BlendingData::get_or_update(&region, 0, 0).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.pack(), packed);
    assert!(BlendingData::get_or_update(&region, 1, 0).is_none());
}

fn snapshot(data: &BlendingData) -> (Vec<(i32, i32, i32, f64)>, Vec<(i32, i32, i32, BiomeId)>) {
    let mut densities = Vec::new();
    data.iterate_densities(0, 0, -100, 100, |x, y, z, value| {
        densities.push((x, y, z, value));
    });
    let mut biomes = Vec::new();
    for quart_y in 0..32 {
        data.iterate_biomes(0, quart_y, 0, |x, z, biome| biomes.push((x, quart_y, z, biome)));
    }
    (densities, biomes)
}

#[test]
fn recalculation_keeps_densities_and_biomes() {
    let old = chunk(0, 0, true);
    let data = Arc::clone(old.blending_data().unwrap());
    data.calculate_data(&old, Direction8Set::all());
    let heights = data.pack();
    let (densities, biomes) = snapshot(&data);
    assert!(!densities.is_empty());
    assert!(!biomes.is_empty());

    data.calculate_data(&old, Direction8Set::all());
    assert_eq!(data.pack(), heights);
    assert_eq!(snapshot(&data), (densities, biomes));
}

#[test]
fn off_ring_cells_read_no_value() {
    let mut heights = vec![NO_VALUE; CELL_COLUMN_COUNT];
    heights[8] = 42.0;
    let packed = Packed::try_from(RawPacked {
        min_section: 0,
        max_section: 8,
        heights: Some(heights),
    })
    .unwrap();
    let data = BlendingData::unpack(&packed);

    assert!(data.get_height(4, 0, 7).to_bits() == NO_VALUE.to_bits());
    for (x, z) in [(0, -4), (-1, 0), (5, 5), (2, 2), (-3, 9)] {
        assert!(data.get_height(x, 0, z).to_bits() == NO_VALUE.to_bits());
        assert!(data.get_density(x, 2, z).to_bits() == NO_VALUE.to_bits());
    }
    assert!((data.get_height(1, 0, 4) - 42.0).abs() < f64::EPSILON);
}

#[test]
fn chunk_before_biomes_is_skipped() {
    let mut region = region(ChunkPos::new(1, 0), &[ChunkPos::new(0, 0)]);
    region
        .chunk_mut(ChunkPos::new(0, 0))
        .unwrap()
        .set_status(ChunkStatus::StructureReferences);
    assert!(BlendingData::get_or_update(&region, 0, 0).is_none());
}

#[test]
fn density_crosses_zero_at_surface() {
    let region = region(ChunkPos::new(1, 0), &[ChunkPos::new(0, 0)]);
    let data = BlendingData::get_or_update(&region, 0, 0).unwrap();

    let surface_cell = GROUND_TOP / 8;
    let below = data.get_density(0, surface_cell, 0);
    let above = data.get_density(0, surface_cell + 1, 0);
    let offset = (f64::from(GROUND_TOP) + 0.5).rem_euclid(8.0) / 8.0;
    assert!(below > 0.0 && above < 0.0);
    assert!((below * (1.0 - offset) + above * offset).abs() < 1e-12);

    let blender = blender();
    let ctx = DensityContext::new(0, surface_cell * 8 + 3, 0);
    assert!((blender.blend_density(&ctx, 0.9) - below).abs() < f64::EPSILON);
}

#[test]
fn density_blends_near_old_chunk() {
    let blender = blender();
    let near = DensityContext::new(20, 64, 0);
    let blended = blender.blend_density(&near, 0.9);
    assert!(blended.is_finite());
    assert!(blended < 0.9);

    let far = DensityContext::new(100, 64, 0);
    assert!((blender.blend_density(&far, 0.9) - 0.9).abs() < f64::EPSILON);
}

#[test]
fn biome_resolver_prefers_old_biomes() {
    // Old chunks far enough apart that the border jitter is independent.
    let sites = [(0, 0), (40, 0), (0, 40), (-40, -40), (40, 40), (-40, 40)];
    let mut map = FxHashMap::default();
    for (x, z) in sites {
        let old = chunk(x, z, true);
        let data = Arc::clone(old.blending_data().unwrap());
        data.calculate_data(&old, Direction8Set::all());
        map.insert(ChunkPos::new(x, z), data);
    }
    let blender = Blender::new(map, FxHashMap::default(), BlendingConfig::default());
    let resolver = blender.get_biome_resolver(|_, _, _, _: &()| NEW_BIOME);

    let mut blended = 0;
    for (x, z) in sites {
        let min_quart_x = x * 4;
        let min_quart_z = z * 4;
        for dx in 0..4 {
            let biome = resolver(min_quart_x + dx, 16, min_quart_z, &());
            assert!(biome == OLD_BIOME || biome == NEW_BIOME);
            if biome == OLD_BIOME {
                blended += 1;
            }
        }
        // Far from every cached cell.
        assert_eq!(resolver(min_quart_x + 60, 16, min_quart_z, &()), NEW_BIOME);
        // Above the old generation area.
        assert_eq!(resolver(min_quart_x, 40, min_quart_z, &()), NEW_BIOME);
    }
    assert!(blended > 0);
}

#[test]
fn packed_round_trip() {
    let region = region(ChunkPos::new(1, 0), &[ChunkPos::new(0, 0)]);
    let data = BlendingData::get_or_update(&region, 0, 0).unwrap();
    let packed = data.pack();
    assert!(packed.heights.is_some());

    let json = serde_json::to_string(&packed).unwrap();
    let decoded: Packed = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, packed);

    let restored = BlendingData::unpack(&decoded);
    assert!(!restored.has_calculated_data());
    assert_eq!(restored.pack(), packed);
    assert!((restored.get_height(4, 0, 4) - f64::from(GROUND_TOP)).abs() < f64::EPSILON);
}

#[test]
fn unsampled_heights_are_omitted() {
    let packed = BlendingData::new(-4, 20).pack();
    assert_eq!(packed.heights, None);

    let json = serde_json::to_string(&packed).unwrap();
    assert!(!json.contains("heights"));
    let decoded: Packed = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, packed);
}

#[test]
fn malformed_payloads_are_rejected() {
    let short = serde_json::from_str::<Packed>(
        r#"{"min_section": 0, "max_section": 8, "heights": [64.0, 65.0]}"#,
    );
    assert!(short.is_err());

    let raw = RawPacked {
        min_section: 0,
        max_section: 8,
        heights: Some(vec![64.0; 3]),
    };
    assert_eq!(
        Packed::try_from(raw).unwrap_err(),
        BlendingDecodeError::HeightCount {
            expected: 16,
            found: 3
        }
    );

    let empty = RawPacked {
        min_section: 4,
        max_section: 4,
        heights: None,
    };
    assert!(matches!(
        Packed::try_from(empty),
        Err(BlendingDecodeError::EmptyArea { .. })
    ));
}

#[test]
fn border_ticks_mark_leaves_and_fluids() {
    let mut region = region(ChunkPos::new(0, 0), &[ChunkPos::new(0, 0)]);
    let old = region.chunk_mut(ChunkPos::new(0, 0)).unwrap();
    old.set_block_state(BlockPos::new(3, 127, 3), BlockState::LEAVES);
    old.set_block_state(BlockPos::new(5, 0, 5), BlockState::WATER);
    old.set_block_state(BlockPos::new(0, 100, 8), BlockState::LEAVES);
    old.set_block_state(BlockPos::new(8, 100, 8), BlockState::LEAVES);
    old.set_block_state(BlockPos::new(9, 71, 9), BlockState::SHORT_GRASS);

    let ticks = Blender::generate_border_ticks(&region, region.chunk(0, 0).unwrap());

    let mut expected = vec![
        BlockPos::new(3, 127, 3),
        BlockPos::new(5, 0, 5),
        BlockPos::new(0, 100, 8),
    ];
    expected.sort_unstable();
    assert_eq!(ticks, expected);

    // Interior leaves are only ticked at the vertical limits.
    assert!(!ticks.contains(&BlockPos::new(8, 100, 8)));
    assert!(Blender::generate_border_ticks(&region, region.chunk(1, 0).unwrap()).is_empty());
}

#[test]
fn carving_mask_around_old_chunk() {
    let region = region(ChunkPos::new(1, 0), &[ChunkPos::new(0, 0)]);
    let neighbour = chunk(1, 0, false);
    let mask = Blender::add_around_old_chunks_carving_mask_filter(&region, &neighbour).unwrap();
    assert!(mask(0, 30, 8));
    assert!(!mask(15, 30, 8));

    let old = chunk(0, 0, true);
    let mask = Blender::add_around_old_chunks_carving_mask_filter(&region, &old).unwrap();
    assert!(mask(8, 30, 8));

    let isolated = chunk(3, 3, false);
    assert!(Blender::add_around_old_chunks_carving_mask_filter(&region, &isolated).is_none());
}
