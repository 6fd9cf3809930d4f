//! Emitters for the supported Advanced SIMD and VFP instructions.

use super::helpers::*;
use crate::builder::VectorBuilder;
use crate::decoder::{Mnemonic, OpCode, Simd, SimdImm, SimdReg, SimdRegS, SimdS};
use crate::result::{TranslateError, TranslateResult};

/// Emit IR for one decoded instruction.
///
/// Instructions that decode but have no lowering return
/// [`TranslateError::UnsupportedInstruction`] without emitting anything.
pub fn emit_inst<B: VectorBuilder>(b: &mut B, op: &OpCode) -> TranslateResult<()> {
    match op {
        OpCode::SimdReg(op) => emit_simd_reg(b, op),
        OpCode::Simd(op) => emit_simd(b, op),
        OpCode::SimdImm(op) => emit_simd_imm(b, op),
        OpCode::SimdRegS(op) => emit_simd_reg_s(b, op),
        OpCode::SimdS(op) => emit_simd_s(b, op),
        OpCode::AluBf(_) => Err(unsupported(op)),
    }
}

fn unsupported(op: &OpCode) -> TranslateError {
    TranslateError::UnsupportedInstruction {
        address: op.address(),
        word: op.word(),
        mnemonic: op.mnemonic(),
    }
}

fn emit_simd_reg<B: VectorBuilder>(b: &mut B, op: &SimdReg) -> TranslateResult<()> {
    match op.inst.mnemonic {
        Mnemonic::VaddI => emit_vector_binary_op_zx32(b, op, |b, n, m| b.iadd(n, m)),
        Mnemonic::VsubI => emit_vector_binary_op_zx32(b, op, |b, n, m| b.isub(n, m)),
        Mnemonic::VmulI => emit_vector_binary_op_zx32(b, op, |b, n, m| b.imul(n, m)),
        Mnemonic::VmlaI => emit_vector_ternary_op_zx32(b, op, |b, d, n, m| {
            let product = b.imul(n, m);
            b.iadd(d, product)
        }),
        Mnemonic::VmlsI => emit_vector_ternary_op_zx32(b, op, |b, d, n, m| {
            let product = b.imul(n, m);
            b.isub(d, product)
        }),
        Mnemonic::Vmax if op.u => emit_vector_binary_op_zx32(b, op, |b, n, m| b.umax(n, m)),
        Mnemonic::Vmax => emit_vector_binary_op_sx32(b, op, |b, n, m| b.smax(n, m)),
        Mnemonic::Vmin if op.u => emit_vector_binary_op_zx32(b, op, |b, n, m| b.umin(n, m)),
        Mnemonic::Vmin => emit_vector_binary_op_sx32(b, op, |b, n, m| b.smin(n, m)),
        Mnemonic::Vand => emit_vector_binary_op_zx32(b, op, |b, n, m| b.band(n, m)),
        Mnemonic::Vorr => emit_vector_binary_op_zx32(b, op, |b, n, m| b.bor(n, m)),
        Mnemonic::Veor => emit_vector_binary_op_zx32(b, op, |b, n, m| b.bxor(n, m)),
        Mnemonic::VaddV => emit_vector_binary_op_f32(b, op, |b, n, m| b.fadd(n, m)),
        Mnemonic::VsubV => emit_vector_binary_op_f32(b, op, |b, n, m| b.fsub(n, m)),
        Mnemonic::VmulV => emit_vector_binary_op_f32(b, op, |b, n, m| b.fmul(n, m)),
        Mnemonic::VmlaV => emit_vector_ternary_op_f32(b, op, |b, d, n, m| {
            let product = b.fmul(n, m);
            b.fadd(d, product)
        }),
        Mnemonic::VmlsV => emit_vector_ternary_op_f32(b, op, |b, d, n, m| {
            let product = b.fmul(n, m);
            b.fsub(d, product)
        }),
        _ => Err(unsupported(&OpCode::SimdReg(*op))),
    }
}

fn emit_simd<B: VectorBuilder>(b: &mut B, op: &Simd) -> TranslateResult<()> {
    match op.inst.mnemonic {
        Mnemonic::VabsV if op.f => emit_vector_unary_op_f32(b, op, |b, m| b.fabs(m)),
        Mnemonic::VabsV => emit_vector_unary_op_sx32(b, op, |b, m| b.iabs(m)),
        Mnemonic::VnegV if op.f => emit_vector_unary_op_f32(b, op, |b, m| b.fneg(m)),
        Mnemonic::VnegV => emit_vector_unary_op_sx32(b, op, |b, m| b.ineg(m)),
        _ => Err(unsupported(&OpCode::Simd(*op))),
    }
}

/// VMOV and VMVN (immediate). The odd `cmode` values below `0b1100` are
/// VORR and VBIC, which are not lowered.
fn emit_simd_imm<B: VectorBuilder>(b: &mut B, op: &SimdImm) -> TranslateResult<()> {
    if op.inst.mnemonic != Mnemonic::VmovI || (op.cmode & 1 != 0 && op.cmode < 0b1100) {
        return Err(unsupported(&OpCode::SimdImm(*op)));
    }
    let invert = op.op != 0 && op.cmode < 0b1110;
    emit_vector_imm_unary_op32(b, op, |b, imm| if invert { b.bnot(imm) } else { imm })
}

fn emit_simd_reg_s<B: VectorBuilder>(b: &mut B, op: &SimdRegS) -> TranslateResult<()> {
    match op.inst.mnemonic {
        Mnemonic::VaddS => emit_scalar_binary_op_f32(b, op, |b, n, m| b.fadd(n, m)),
        Mnemonic::VsubS => emit_scalar_binary_op_f32(b, op, |b, n, m| b.fsub(n, m)),
        Mnemonic::VmulS => emit_scalar_binary_op_f32(b, op, |b, n, m| b.fmul(n, m)),
        Mnemonic::VdivS => emit_scalar_binary_op_f32(b, op, |b, n, m| b.fdiv(n, m)),
        Mnemonic::VmlaS => emit_scalar_ternary_op_f32(b, op, |b, d, n, m| {
            let product = b.fmul(n, m);
            b.fadd(d, product)
        }),
        Mnemonic::VmlsS => emit_scalar_ternary_op_f32(b, op, |b, d, n, m| {
            let product = b.fmul(n, m);
            b.fsub(d, product)
        }),
        _ => Err(unsupported(&OpCode::SimdRegS(*op))),
    }
}

fn emit_simd_s<B: VectorBuilder>(b: &mut B, op: &SimdS) -> TranslateResult<()> {
    match op.inst.mnemonic {
        Mnemonic::VabsS => emit_scalar_unary_op_f32(b, op, |b, m| b.fabs(m)),
        Mnemonic::VnegS => emit_scalar_unary_op_f32(b, op, |b, m| b.fneg(m)),
        Mnemonic::VsqrtS => emit_scalar_unary_op_f32(b, op, |b, m| b.sqrt(m)),
        _ => Err(unsupported(&OpCode::SimdS(*op))),
    }
}
