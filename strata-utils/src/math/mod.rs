//! This module contains math related utilities.
pub mod noise_math;

pub use noise_math::{
    clamp, clamped_lerp, floor, floor_div, length2, length3, lerp, lerp2, lerp3, lfloor,
    positive_modulo, smoothstep, smoothstep_derivative,
};
