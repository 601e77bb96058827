//! Per-tick resolution systems: rule interpretation, transform
//! materialization, movement, and interaction resolution.
//!
//! Each system is a free function over `&mut Grid`, scanning in
//! row-major order so identical inputs always resolve identically.

pub mod interaction;
pub mod movement;
pub mod rules;
pub mod transform;
