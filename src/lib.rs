//! A32 Advanced SIMD and VFP instruction decoding and lane-wise IR emission.
//!
//! This crate is the front half of a dynamic binary translator for 32-bit ARM
//! guests. It turns raw 32-bit instruction words into decoded [`OpCode`]s and
//! lowers the vector and scalar floating-point forms onto any IR builder that
//! implements [`VectorBuilder`]:
//!
//! - [`decoder`] extracts register numbers, sizes and immediates from an
//!   instruction word. It never validates; it only slices bits.
//! - [`regs`] maps a logical `S`/`D`/`Q` register number onto one of the
//!   sixteen 128-bit physical banks and a lane offset inside it.
//! - [`emit`] holds the elementwise templates which apply a per-lane closure
//!   across all lanes of a register and commit the result once, plus a small
//!   set of instruction emitters built on top of them.
//! - [`translate`] is a table-driven dispatcher tying the two together.
//!
//! Two builders are provided: the reference [`ir`] (evaluated by the
//! [`interpreter`]) and a Cranelift adapter in [`clif`].

#![deny(missing_docs)]
#![warn(unused_import_braces)]

pub use crate::builder::VectorBuilder;
pub use crate::decoder::{decode, Encoding, InstDescriptor, Mnemonic, OpCode};
pub use crate::regs::RegisterSize;
pub use crate::result::{TranslateError, TranslateResult};
pub use crate::translate::Translator;

pub mod builder;
pub mod clif;
pub mod decoder;
pub mod emit;
pub mod interpreter;
pub mod ir;
pub mod regs;
pub mod settings;
pub mod translate;

mod result;

/// Version number of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
