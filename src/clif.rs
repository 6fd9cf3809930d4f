//! Emitting Cranelift IR.
//!
//! Guest registers live in memory: the translated function receives a
//! pointer to the guest state, and bank `n` is the 16 bytes at offset
//! `16 * n`. A bank read is an `i8x16` load and a commit is a store; lane
//! accesses bitcast the image to a vector type with the right lane shape.

use crate::builder::VectorBuilder;
use crate::ir::{Opcode, Type};
use crate::regs::BANK_BYTES;
use crate::result::TranslateError;
use crate::settings::Flags;
use crate::translate::Translator;
use cranelift_codegen::ir::immediates::{Ieee32, Ieee64};
use cranelift_codegen::ir::{self, types, AbiParam, Endianness, InstBuilder, MemFlags};
use cranelift_codegen::isa::CallConv;
use cranelift_codegen::settings as clif_settings;
use cranelift_codegen::verifier::VerifierErrors;
use cranelift_frontend::{FunctionBuilder, FunctionBuilderContext};
use log::debug;
use thiserror::Error;

/// Errors from [`ClifTranslator`].
#[derive(Error, Debug)]
pub enum ClifError {
    /// An instruction could not be translated.
    #[error(transparent)]
    Translate(#[from] TranslateError),
    /// The generated function failed verification.
    #[error("verifier errors:\n{0}")]
    Verifier(#[from] VerifierErrors),
}

/// Result type of [`ClifTranslator`] operations.
pub type ClifResult<T> = Result<T, ClifError>;

fn clif_type(ty: Type) -> ir::Type {
    match ty {
        Type::I8 => types::I8,
        Type::I16 => types::I16,
        Type::I32 => types::I32,
        Type::I64 => types::I64,
        Type::F32 => types::F32,
        Type::F64 => types::F64,
        Type::V128 => types::I8X16,
    }
}

/// The 128-bit vector type whose lanes have type `ty`.
fn vector_view(ty: Type) -> ir::Type {
    match ty {
        Type::V128 => types::I8X16,
        _ => clif_type(ty)
            .by(ty.lanes_per_bank())
            .unwrap_or(types::I8X16),
    }
}

fn from_clif(ty: ir::Type) -> Type {
    match ty {
        types::I8 => Type::I8,
        types::I16 => Type::I16,
        types::I32 => Type::I32,
        types::I64 => Type::I64,
        types::F32 => Type::F32,
        types::F64 => Type::F64,
        _ => Type::V128,
    }
}

/// A [`VectorBuilder`] emitting into a Cranelift function.
pub struct ClifBuilder<'a, 'b> {
    builder: &'a mut FunctionBuilder<'b>,
    state: ir::Value,
}

impl<'a, 'b> ClifBuilder<'a, 'b> {
    /// Emit into the current block of `builder`. `state` is the guest state
    /// pointer.
    pub fn new(builder: &'a mut FunctionBuilder<'b>, state: ir::Value) -> Self {
        Self { builder, state }
    }

    fn offset(bank: u32) -> i32 {
        (bank as usize * BANK_BYTES) as i32
    }

    fn reinterpret(&mut self, ty: ir::Type, value: ir::Value) -> ir::Value {
        if self.builder.func.dfg.value_type(value) == ty {
            return value;
        }
        let flags = MemFlags::new().with_endianness(Endianness::Little);
        self.builder.ins().bitcast(ty, flags, value)
    }

    /// Convert `value` to the scalar lane type `lane`.
    fn lane_value(&mut self, lane: ir::Type, value: ir::Value) -> ir::Value {
        let ty = self.builder.func.dfg.value_type(value);
        if ty == lane {
            value
        } else if ty.is_int() && lane.is_int() && ty.bits() > lane.bits() {
            self.builder.ins().ireduce(lane, value)
        } else if ty.is_int() && lane.is_int() {
            self.builder.ins().uextend(lane, value)
        } else {
            self.reinterpret(lane, value)
        }
    }
}

impl VectorBuilder for ClifBuilder<'_, '_> {
    type Value = ir::Value;

    fn bank(&mut self, bank: u32) -> ir::Value {
        self.builder.ins().load(
            types::I8X16,
            MemFlags::trusted(),
            self.state,
            Self::offset(bank),
        )
    }

    fn extract_lane(&mut self, image: ir::Value, ty: Type, lane: u8) -> ir::Value {
        let vector = self.reinterpret(vector_view(ty), image);
        self.builder.ins().extractlane(vector, lane)
    }

    fn insert_lane(&mut self, image: ir::Value, value: ir::Value, ty: Type, lane: u8) -> ir::Value {
        let value = self.lane_value(clif_type(ty), value);
        let vector = self.reinterpret(vector_view(ty), image);
        let vector = self.builder.ins().insertlane(vector, value, lane);
        self.reinterpret(types::I8X16, vector)
    }

    fn copy_bank(&mut self, bank: u32, image: ir::Value) {
        let image = self.reinterpret(types::I8X16, image);
        self.builder
            .ins()
            .store(MemFlags::trusted(), image, self.state, Self::offset(bank));
    }

    fn iconst(&mut self, ty: Type, imm: i64) -> ir::Value {
        self.builder.ins().iconst(clif_type(ty), imm)
    }

    fn f32const(&mut self, bits: u32) -> ir::Value {
        self.builder.ins().f32const(Ieee32::with_bits(bits))
    }

    fn f64const(&mut self, bits: u64) -> ir::Value {
        self.builder.ins().f64const(Ieee64::with_bits(bits))
    }

    fn sextend(&mut self, ty: Type, value: ir::Value) -> ir::Value {
        self.builder.ins().sextend(clif_type(ty), value)
    }

    fn uextend(&mut self, ty: Type, value: ir::Value) -> ir::Value {
        self.builder.ins().uextend(clif_type(ty), value)
    }

    fn value_type(&self, value: ir::Value) -> Type {
        from_clif(self.builder.func.dfg.value_type(value))
    }

    fn unary(&mut self, op: Opcode, x: ir::Value) -> ir::Value {
        let ins = self.builder.ins();
        match op {
            Opcode::Ineg => ins.ineg(x),
            Opcode::Iabs => ins.iabs(x),
            Opcode::Bnot => ins.bnot(x),
            Opcode::Fneg => ins.fneg(x),
            Opcode::Fabs => ins.fabs(x),
            Opcode::Sqrt => ins.sqrt(x),
            _ => unreachable!("{op} is not a unary lane operation"),
        }
    }

    fn binary(&mut self, op: Opcode, x: ir::Value, y: ir::Value) -> ir::Value {
        let ins = self.builder.ins();
        match op {
            Opcode::Iadd => ins.iadd(x, y),
            Opcode::Isub => ins.isub(x, y),
            Opcode::Imul => ins.imul(x, y),
            Opcode::Smax => ins.smax(x, y),
            Opcode::Smin => ins.smin(x, y),
            Opcode::Umax => ins.umax(x, y),
            Opcode::Umin => ins.umin(x, y),
            Opcode::Band => ins.band(x, y),
            Opcode::Bor => ins.bor(x, y),
            Opcode::Bxor => ins.bxor(x, y),
            Opcode::Fadd => ins.fadd(x, y),
            Opcode::Fsub => ins.fsub(x, y),
            Opcode::Fmul => ins.fmul(x, y),
            Opcode::Fdiv => ins.fdiv(x, y),
            _ => unreachable!("{op} is not a binary lane operation"),
        }
    }
}

/// Translates blocks of guest code into Cranelift functions of signature
/// `fn(state: i64)`.
pub struct ClifTranslator {
    translator: Translator,
    codegen_flags: clif_settings::Flags,
    func_ctx: FunctionBuilderContext,
}

impl ClifTranslator {
    /// Create a translator with the given settings.
    pub fn new(flags: Flags) -> Self {
        Self {
            translator: Translator::new(flags),
            codegen_flags: clif_settings::Flags::new(clif_settings::builder()),
            func_ctx: FunctionBuilderContext::new(),
        }
    }

    /// The settings in effect.
    pub fn flags(&self) -> &Flags {
        self.translator.flags()
    }

    /// Translate `words`, located at `address`, into a new function.
    pub fn translate_block(&mut self, address: u64, words: &[u32]) -> ClifResult<ir::Function> {
        let mut sig = ir::Signature::new(CallConv::SystemV);
        sig.params.push(AbiParam::new(types::I64));
        let name = ir::UserFuncName::user(0, address as u32);
        let mut func = ir::Function::with_name_signature(name, sig);

        let res = {
            let mut builder = FunctionBuilder::new(&mut func, &mut self.func_ctx);
            let block = builder.create_block();
            builder.append_block_params_for_function_params(block);
            builder.switch_to_block(block);
            builder.seal_block(block);
            let state = builder.block_params(block)[0];

            let res = self
                .translator
                .translate_block(&mut ClifBuilder::new(&mut builder, state), address, words);
            builder.ins().return_(&[]);
            builder.finalize();
            res
        };
        let count = res?;
        debug!("{address:#x}: built {} for {count} instructions", func.name);
        self.finish(func)
    }

    /// Verify `func` if the verifier is enabled.
    pub fn finish(&self, func: ir::Function) -> ClifResult<ir::Function> {
        if self.flags().enable_verifier() {
            cranelift_codegen::verify_function(&func, &self.codegen_flags)?;
        }
        Ok(func)
    }
}

impl Default for ClifTranslator {
    fn default() -> Self {
        Self::new(Flags::default())
    }
}
