//! Elementwise emission templates.
//!
//! Every template reads its operand banks once, walks the lanes of the
//! destination register, applies a per-lane closure and commits the working
//! image back to the destination bank exactly once. Lanes of the bank that
//! do not belong to the destination register are carried over untouched.

use crate::builder::VectorBuilder;
use crate::decoder::{Simd, SimdImm, SimdReg, SimdRegS, SimdS};
use crate::ir::Type;
use crate::regs::{quadword_and_subindex, RegisterSize};
use crate::result::TranslateResult;
use log::trace;
use smallvec::SmallVec;

/// How source lanes are presented to the lane closure.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LaneMode {
    /// Reinterpreted as `F32` or `F64`.
    Float,
    /// Sign-extended to `I64`.
    Signed,
    /// Zero-extended to `I64`.
    Unsigned,
}

/// The lane geometry of one emission.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Shape {
    ty: Type,
    elems: u32,
    register_size: RegisterSize,
    mode: LaneMode,
}

impl Shape {
    /// Float lanes; the low bit of `size` selects double precision.
    fn float(size: u32, register_size: RegisterSize) -> Self {
        let size_f = size & 1;
        Self {
            ty: Type::float_with_size(size_f),
            elems: register_size.bytes() >> (size_f + 2),
            register_size,
            mode: LaneMode::Float,
        }
    }

    /// Integer lanes of `1 << size` bytes.
    fn int(size: u32, register_size: RegisterSize, mode: LaneMode) -> Self {
        Self {
            ty: Type::int_with_size(size),
            elems: register_size.bytes() >> size,
            register_size,
            mode,
        }
    }

    /// Lane `index` of a register at sub-index `sub` in its bank.
    fn lane(&self, index: u32, sub: u32) -> u8 {
        let lane = index + sub * self.elems;
        debug_assert!(lane < self.ty.lanes_per_bank());
        lane as u8
    }
}

/// Bank images read so far, keyed by bank number.
type Images<V> = SmallVec<[(u32, V); 3]>;

fn image<B: VectorBuilder>(b: &mut B, images: &mut Images<B::Value>, bank: u32) -> B::Value {
    if let Some(&(_, image)) = images.iter().find(|(q, _)| *q == bank) {
        return image;
    }
    let image = b.bank(bank);
    images.push((bank, image));
    image
}

fn extract<B: VectorBuilder>(b: &mut B, shape: &Shape, image: B::Value, lane: u8) -> B::Value {
    let value = b.extract_lane(image, shape.ty, lane);
    match shape.mode {
        LaneMode::Signed if shape.ty != Type::I64 => b.sextend(Type::I64, value),
        LaneMode::Unsigned if shape.ty != Type::I64 => b.uextend(Type::I64, value),
        _ => value,
    }
}

/// The skeleton shared by all vector templates.
///
/// `sources` are logical register numbers in the class of `shape`. With
/// `read_dest` the destination's own lane is passed to `op` first, read from
/// the bank content as it was before the loop.
fn emit_lanes<B, F>(
    b: &mut B,
    shape: Shape,
    vd: u32,
    sources: &[u32],
    read_dest: bool,
    mut op: F,
) -> TranslateResult<()>
where
    B: VectorBuilder,
    F: FnMut(&mut B, &[B::Value]) -> B::Value,
{
    let (qd, ed) = quadword_and_subindex(vd, shape.register_size)?;
    let mut images = Images::new();
    let dest = image(b, &mut images, qd);

    let mut operands: SmallVec<[(B::Value, u32); 3]> = SmallVec::new();
    if read_dest {
        operands.push((dest, ed));
    }
    for &reg in sources {
        let (q, e) = quadword_and_subindex(reg, shape.register_size)?;
        operands.push((image(b, &mut images, q), e));
    }

    trace!(
        "lanes: {} x {} {:?} into q{qd}[{ed}] from {:?}",
        shape.elems,
        shape.ty,
        shape.mode,
        images.iter().map(|(q, _)| *q).collect::<SmallVec<[u32; 3]>>()
    );

    let mut res = dest;
    for index in 0..shape.elems {
        let args: SmallVec<[B::Value; 3]> = operands
            .iter()
            .map(|&(image, sub)| extract(b, &shape, image, shape.lane(index, sub)))
            .collect();
        let value = op(b, &args);
        res = b.insert_lane(res, value, shape.ty, shape.lane(index, ed));
    }
    b.copy_bank(qd, res);
    Ok(())
}

/// Read the `S` or `D` register `reg` as a float of type `ty`.
pub fn extract_scalar<B: VectorBuilder>(b: &mut B, ty: Type, reg: u32) -> TranslateResult<B::Value> {
    let (q, sub) = quadword_and_subindex(reg, scalar_size(ty))?;
    let image = b.bank(q);
    Ok(b.extract_lane(image, ty, sub as u8))
}

/// Write `value` to the `S` or `D` register `reg`, committing its bank.
pub fn insert_scalar<B: VectorBuilder>(b: &mut B, reg: u32, value: B::Value) -> TranslateResult<()> {
    let ty = b.value_type(value);
    let (q, sub) = quadword_and_subindex(reg, scalar_size(ty))?;
    let image = b.bank(q);
    let image = b.insert_lane(image, value, ty, sub as u8);
    b.copy_bank(q, image);
    Ok(())
}

fn scalar_size(ty: Type) -> RegisterSize {
    if ty == Type::F64 {
        RegisterSize::Simd64
    } else {
        RegisterSize::Simd32
    }
}

/// Float vector operation on one source.
pub fn emit_vector_unary_op_f32<B, F>(b: &mut B, op: &Simd, mut emit: F) -> TranslateResult<()>
where
    B: VectorBuilder,
    F: FnMut(&mut B, B::Value) -> B::Value,
{
    let shape = Shape::float(op.size, op.register_size);
    emit_lanes(b, shape, op.vd, &[op.vm], false, |b, args| emit(b, args[0]))
}

/// Float vector operation on two sources.
pub fn emit_vector_binary_op_f32<B, F>(b: &mut B, op: &SimdReg, mut emit: F) -> TranslateResult<()>
where
    B: VectorBuilder,
    F: FnMut(&mut B, B::Value, B::Value) -> B::Value,
{
    let shape = Shape::float(op.size, op.register_size);
    emit_lanes(b, shape, op.vd, &[op.vn, op.vm], false, |b, args| {
        emit(b, args[0], args[1])
    })
}

/// Float vector operation on the destination and two sources.
pub fn emit_vector_ternary_op_f32<B, F>(b: &mut B, op: &SimdReg, mut emit: F) -> TranslateResult<()>
where
    B: VectorBuilder,
    F: FnMut(&mut B, B::Value, B::Value, B::Value) -> B::Value,
{
    let shape = Shape::float(op.size, op.register_size);
    emit_lanes(b, shape, op.vd, &[op.vn, op.vm], true, |b, args| {
        emit(b, args[0], args[1], args[2])
    })
}

/// Integer vector operation on one source, lanes sign-extended.
pub fn emit_vector_unary_op_sx32<B, F>(b: &mut B, op: &Simd, emit: F) -> TranslateResult<()>
where
    B: VectorBuilder,
    F: FnMut(&mut B, B::Value) -> B::Value,
{
    vector_unary_op_int(b, op, LaneMode::Signed, emit)
}

/// Integer vector operation on one source, lanes zero-extended.
pub fn emit_vector_unary_op_zx32<B, F>(b: &mut B, op: &Simd, emit: F) -> TranslateResult<()>
where
    B: VectorBuilder,
    F: FnMut(&mut B, B::Value) -> B::Value,
{
    vector_unary_op_int(b, op, LaneMode::Unsigned, emit)
}

/// Integer vector operation on two sources, lanes sign-extended.
pub fn emit_vector_binary_op_sx32<B, F>(b: &mut B, op: &SimdReg, emit: F) -> TranslateResult<()>
where
    B: VectorBuilder,
    F: FnMut(&mut B, B::Value, B::Value) -> B::Value,
{
    vector_binary_op_int(b, op, LaneMode::Signed, emit)
}

/// Integer vector operation on two sources, lanes zero-extended.
pub fn emit_vector_binary_op_zx32<B, F>(b: &mut B, op: &SimdReg, emit: F) -> TranslateResult<()>
where
    B: VectorBuilder,
    F: FnMut(&mut B, B::Value, B::Value) -> B::Value,
{
    vector_binary_op_int(b, op, LaneMode::Unsigned, emit)
}

/// Integer vector operation on the destination and two sources, lanes
/// sign-extended.
pub fn emit_vector_ternary_op_sx32<B, F>(b: &mut B, op: &SimdReg, emit: F) -> TranslateResult<()>
where
    B: VectorBuilder,
    F: FnMut(&mut B, B::Value, B::Value, B::Value) -> B::Value,
{
    vector_ternary_op_int(b, op, LaneMode::Signed, emit)
}

/// Integer vector operation on the destination and two sources, lanes
/// zero-extended.
pub fn emit_vector_ternary_op_zx32<B, F>(b: &mut B, op: &SimdReg, emit: F) -> TranslateResult<()>
where
    B: VectorBuilder,
    F: FnMut(&mut B, B::Value, B::Value, B::Value) -> B::Value,
{
    vector_ternary_op_int(b, op, LaneMode::Unsigned, emit)
}

fn vector_unary_op_int<B, F>(b: &mut B, op: &Simd, mode: LaneMode, mut emit: F) -> TranslateResult<()>
where
    B: VectorBuilder,
    F: FnMut(&mut B, B::Value) -> B::Value,
{
    let shape = Shape::int(op.size, op.register_size, mode);
    emit_lanes(b, shape, op.vd, &[op.vm], false, |b, args| emit(b, args[0]))
}

fn vector_binary_op_int<B, F>(
    b: &mut B,
    op: &SimdReg,
    mode: LaneMode,
    mut emit: F,
) -> TranslateResult<()>
where
    B: VectorBuilder,
    F: FnMut(&mut B, B::Value, B::Value) -> B::Value,
{
    let shape = Shape::int(op.size, op.register_size, mode);
    emit_lanes(b, shape, op.vd, &[op.vn, op.vm], false, |b, args| {
        emit(b, args[0], args[1])
    })
}

fn vector_ternary_op_int<B, F>(
    b: &mut B,
    op: &SimdReg,
    mode: LaneMode,
    mut emit: F,
) -> TranslateResult<()>
where
    B: VectorBuilder,
    F: FnMut(&mut B, B::Value, B::Value, B::Value) -> B::Value,
{
    let shape = Shape::int(op.size, op.register_size, mode);
    emit_lanes(b, shape, op.vd, &[op.vn, op.vm], true, |b, args| {
        emit(b, args[0], args[1], args[2])
    })
}

/// Broadcast a modified immediate into every lane of the destination.
///
/// The immediate is materialized once as an `I64` constant; `emit` sees that
/// same value for every lane and its result is truncated to the element
/// size on insertion.
pub fn emit_vector_imm_unary_op32<B, F>(b: &mut B, op: &SimdImm, mut emit: F) -> TranslateResult<()>
where
    B: VectorBuilder,
    F: FnMut(&mut B, B::Value) -> B::Value,
{
    let imm = b.iconst(Type::I64, op.immediate as i64);
    let shape = Shape::int(op.size, op.register_size, LaneMode::Unsigned);
    emit_lanes(b, shape, op.vd, &[], false, |b, _| emit(b, imm))
}

/// Scalar float operation on one source.
pub fn emit_scalar_unary_op_f32<B, F>(b: &mut B, op: &SimdS, mut emit: F) -> TranslateResult<()>
where
    B: VectorBuilder,
    F: FnMut(&mut B, B::Value) -> B::Value,
{
    let ty = Type::float_with_size(op.size);
    let m = extract_scalar(b, ty, op.vm)?;
    trace!("scalar: {ty} s/d{} <- {}", op.vd, op.vm);
    let res = emit(b, m);
    insert_scalar(b, op.vd, res)
}

/// Scalar float operation on two sources.
pub fn emit_scalar_binary_op_f32<B, F>(b: &mut B, op: &SimdRegS, mut emit: F) -> TranslateResult<()>
where
    B: VectorBuilder,
    F: FnMut(&mut B, B::Value, B::Value) -> B::Value,
{
    let ty = Type::float_with_size(op.size);
    let n = extract_scalar(b, ty, op.vn)?;
    let m = extract_scalar(b, ty, op.vm)?;
    trace!("scalar: {ty} s/d{} <- {}, {}", op.vd, op.vn, op.vm);
    let res = emit(b, n, m);
    insert_scalar(b, op.vd, res)
}

/// Scalar float operation on the destination and two sources.
pub fn emit_scalar_ternary_op_f32<B, F>(b: &mut B, op: &SimdRegS, mut emit: F) -> TranslateResult<()>
where
    B: VectorBuilder,
    F: FnMut(&mut B, B::Value, B::Value, B::Value) -> B::Value,
{
    let ty = Type::float_with_size(op.size);
    let d = extract_scalar(b, ty, op.vd)?;
    let n = extract_scalar(b, ty, op.vn)?;
    let m = extract_scalar(b, ty, op.vm)?;
    trace!("scalar: {ty} s/d{} <- {}, {}, {}", op.vd, op.vd, op.vn, op.vm);
    let res = emit(b, d, n, m);
    insert_scalar(b, op.vd, res)
}
