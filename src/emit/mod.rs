//! Lowering decoded instructions onto a [`VectorBuilder`](crate::VectorBuilder).

pub mod helpers;
mod simd;

pub use self::helpers::{extract_scalar, insert_scalar, LaneMode};
pub use self::simd::emit_inst;
