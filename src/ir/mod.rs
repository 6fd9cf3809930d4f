//! Reference intermediate representation.
//!
//! A minimal straight-line IR covering exactly what the lane emitters
//! produce: bank reads and commits, lane extract/insert, constants,
//! extensions and lane arithmetic. It exists so that emission can be
//! inspected as text and evaluated by the [`interpreter`](crate::interpreter)
//! without a code generator in the loop.

mod builder;
mod entities;
mod function;
mod instructions;
pub mod types;
mod write;

pub use self::builder::FunctionBuilder;
pub use self::entities::{Bank, Inst, Value};
pub use self::function::{Function, ValueData};
pub use self::instructions::{InstructionData, Opcode};
pub use self::types::Type;
pub use self::write::write_function;
