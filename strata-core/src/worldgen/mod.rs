//! World generation module.

pub mod blending;
