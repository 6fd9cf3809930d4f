//! The IR-builder interface the emitters are written against.
//!
//! A translator backend only has to provide whole-register reads and
//! commits, lane extract/insert, constant materialization and a handful of
//! lane arithmetic operations. Everything the emitters do is expressed in
//! those terms, so the same emitter drives both the reference IR and
//! Cranelift.

use crate::ir::{Opcode, Type};
use core::fmt;

/// Builder for straight-line lane code over the guest vector register file.
///
/// Register images are ordinary values of type [`Type::V128`]. Banks are
/// numbered from 0 to 15 and hold the 128-bit physical registers.
pub trait VectorBuilder {
    /// An SSA value in the IR under construction.
    type Value: Copy + fmt::Debug;

    /// Read the current content of physical bank `bank` as a register image.
    fn bank(&mut self, bank: u32) -> Self::Value;

    /// Read lane `lane` of `image`, viewing the image as lanes of `ty`.
    fn extract_lane(&mut self, image: Self::Value, ty: Type, lane: u8) -> Self::Value;

    /// Return a copy of `image` with lane `lane` (of type `ty`) replaced by
    /// `value`. Integer values wider than `ty` are truncated.
    fn insert_lane(&mut self, image: Self::Value, value: Self::Value, ty: Type, lane: u8)
        -> Self::Value;

    /// Commit `image` as the new content of physical bank `bank`.
    ///
    /// This is the only operation that changes guest-visible state.
    fn copy_bank(&mut self, bank: u32, image: Self::Value);

    /// Materialize an integer constant of type `ty`.
    fn iconst(&mut self, ty: Type, imm: i64) -> Self::Value;

    /// Materialize a single-precision constant from its bit pattern.
    fn f32const(&mut self, bits: u32) -> Self::Value;

    /// Materialize a double-precision constant from its bit pattern.
    fn f64const(&mut self, bits: u64) -> Self::Value;

    /// Sign-extend an integer value to `ty`.
    fn sextend(&mut self, ty: Type, value: Self::Value) -> Self::Value;

    /// Zero-extend an integer value to `ty`.
    fn uextend(&mut self, ty: Type, value: Self::Value) -> Self::Value;

    /// The type of `value`.
    fn value_type(&self, value: Self::Value) -> Type;

    /// Emit a one-operand lane operation. `op` must be a unary opcode.
    fn unary(&mut self, op: Opcode, arg: Self::Value) -> Self::Value;

    /// Emit a two-operand lane operation. `op` must be a binary opcode.
    fn binary(&mut self, op: Opcode, lhs: Self::Value, rhs: Self::Value) -> Self::Value;

    /// Wrapping integer addition.
    fn iadd(&mut self, x: Self::Value, y: Self::Value) -> Self::Value {
        self.binary(Opcode::Iadd, x, y)
    }

    /// Wrapping integer subtraction.
    fn isub(&mut self, x: Self::Value, y: Self::Value) -> Self::Value {
        self.binary(Opcode::Isub, x, y)
    }

    /// Wrapping integer multiplication.
    fn imul(&mut self, x: Self::Value, y: Self::Value) -> Self::Value {
        self.binary(Opcode::Imul, x, y)
    }

    /// Signed maximum.
    fn smax(&mut self, x: Self::Value, y: Self::Value) -> Self::Value {
        self.binary(Opcode::Smax, x, y)
    }

    /// Signed minimum.
    fn smin(&mut self, x: Self::Value, y: Self::Value) -> Self::Value {
        self.binary(Opcode::Smin, x, y)
    }

    /// Unsigned maximum.
    fn umax(&mut self, x: Self::Value, y: Self::Value) -> Self::Value {
        self.binary(Opcode::Umax, x, y)
    }

    /// Unsigned minimum.
    fn umin(&mut self, x: Self::Value, y: Self::Value) -> Self::Value {
        self.binary(Opcode::Umin, x, y)
    }

    /// Bitwise and.
    fn band(&mut self, x: Self::Value, y: Self::Value) -> Self::Value {
        self.binary(Opcode::Band, x, y)
    }

    /// Bitwise or.
    fn bor(&mut self, x: Self::Value, y: Self::Value) -> Self::Value {
        self.binary(Opcode::Bor, x, y)
    }

    /// Bitwise exclusive or.
    fn bxor(&mut self, x: Self::Value, y: Self::Value) -> Self::Value {
        self.binary(Opcode::Bxor, x, y)
    }

    /// Wrapping integer negation.
    fn ineg(&mut self, x: Self::Value) -> Self::Value {
        self.unary(Opcode::Ineg, x)
    }

    /// Wrapping integer absolute value.
    fn iabs(&mut self, x: Self::Value) -> Self::Value {
        self.unary(Opcode::Iabs, x)
    }

    /// Bitwise not.
    fn bnot(&mut self, x: Self::Value) -> Self::Value {
        self.unary(Opcode::Bnot, x)
    }

    /// Floating-point addition.
    fn fadd(&mut self, x: Self::Value, y: Self::Value) -> Self::Value {
        self.binary(Opcode::Fadd, x, y)
    }

    /// Floating-point subtraction.
    fn fsub(&mut self, x: Self::Value, y: Self::Value) -> Self::Value {
        self.binary(Opcode::Fsub, x, y)
    }

    /// Floating-point multiplication.
    fn fmul(&mut self, x: Self::Value, y: Self::Value) -> Self::Value {
        self.binary(Opcode::Fmul, x, y)
    }

    /// Floating-point division.
    fn fdiv(&mut self, x: Self::Value, y: Self::Value) -> Self::Value {
        self.binary(Opcode::Fdiv, x, y)
    }

    /// Floating-point negation.
    fn fneg(&mut self, x: Self::Value) -> Self::Value {
        self.unary(Opcode::Fneg, x)
    }

    /// Floating-point absolute value.
    fn fabs(&mut self, x: Self::Value) -> Self::Value {
        self.unary(Opcode::Fabs, x)
    }

    /// Floating-point square root.
    fn sqrt(&mut self, x: Self::Value) -> Self::Value {
        self.unary(Opcode::Sqrt, x)
    }
}
