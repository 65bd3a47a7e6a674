//! Blending of new terrain against old-generation chunks.

mod blender;
mod blending_data;
mod config;
mod direction;

pub use blender::{Blender, BlendingOutput, CarvingMaskFilter, height_to_offset};
pub use blending_data::{
    BlendingData, BlendingDecodeError, CELL_COLUMN_COUNT, NO_VALUE, Packed, RawPacked,
};
pub use config::BlendingConfig;
pub use direction::{Direction8, Direction8Set};
