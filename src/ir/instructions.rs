//! Instruction formats and opcodes.

use super::entities::{Bank, Value};
use super::types::Type;
use core::fmt;
use core::slice;

/// An instruction opcode.
#[allow(missing_docs, reason = "opcodes are documented by their builder methods")]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    GetBank,
    SetBank,
    Extractlane,
    Insertlane,
    Iconst,
    F32const,
    F64const,
    Sextend,
    Uextend,
    Iadd,
    Isub,
    Imul,
    Smax,
    Smin,
    Umax,
    Umin,
    Band,
    Bor,
    Bxor,
    Ineg,
    Iabs,
    Bnot,
    Fadd,
    Fsub,
    Fmul,
    Fdiv,
    Fneg,
    Fabs,
    Sqrt,
}

impl Opcode {
    /// The textual name.
    pub fn name(self) -> &'static str {
        match self {
            Self::GetBank => "get_bank",
            Self::SetBank => "set_bank",
            Self::Extractlane => "extractlane",
            Self::Insertlane => "insertlane",
            Self::Iconst => "iconst",
            Self::F32const => "f32const",
            Self::F64const => "f64const",
            Self::Sextend => "sextend",
            Self::Uextend => "uextend",
            Self::Iadd => "iadd",
            Self::Isub => "isub",
            Self::Imul => "imul",
            Self::Smax => "smax",
            Self::Smin => "smin",
            Self::Umax => "umax",
            Self::Umin => "umin",
            Self::Band => "band",
            Self::Bor => "bor",
            Self::Bxor => "bxor",
            Self::Ineg => "ineg",
            Self::Iabs => "iabs",
            Self::Bnot => "bnot",
            Self::Fadd => "fadd",
            Self::Fsub => "fsub",
            Self::Fmul => "fmul",
            Self::Fdiv => "fdiv",
            Self::Fneg => "fneg",
            Self::Fabs => "fabs",
            Self::Sqrt => "sqrt",
        }
    }

    /// Lane arithmetic taking one operand.
    pub fn is_unary(self) -> bool {
        matches!(
            self,
            Self::Ineg | Self::Iabs | Self::Bnot | Self::Fneg | Self::Fabs | Self::Sqrt
        )
    }

    /// Lane arithmetic taking two operands.
    pub fn is_binary(self) -> bool {
        matches!(
            self,
            Self::Iadd
                | Self::Isub
                | Self::Imul
                | Self::Smax
                | Self::Smin
                | Self::Umax
                | Self::Umin
                | Self::Band
                | Self::Bor
                | Self::Bxor
                | Self::Fadd
                | Self::Fsub
                | Self::Fmul
                | Self::Fdiv
        )
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The contents of an instruction.
#[allow(missing_docs, reason = "fields mirror the textual format")]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InstructionData {
    GetBank {
        bank: Bank,
    },
    SetBank {
        bank: Bank,
        arg: Value,
    },
    ExtractLane {
        ty: Type,
        arg: Value,
        lane: u8,
    },
    InsertLane {
        ty: Type,
        args: [Value; 2],
        lane: u8,
    },
    Iconst {
        ty: Type,
        imm: i64,
    },
    F32const {
        bits: u32,
    },
    F64const {
        bits: u64,
    },
    Extend {
        opcode: Opcode,
        ty: Type,
        arg: Value,
    },
    Unary {
        opcode: Opcode,
        arg: Value,
    },
    Binary {
        opcode: Opcode,
        args: [Value; 2],
    },
}

impl InstructionData {
    /// The opcode of this instruction.
    pub fn opcode(&self) -> Opcode {
        match *self {
            Self::GetBank { .. } => Opcode::GetBank,
            Self::SetBank { .. } => Opcode::SetBank,
            Self::ExtractLane { .. } => Opcode::Extractlane,
            Self::InsertLane { .. } => Opcode::Insertlane,
            Self::Iconst { .. } => Opcode::Iconst,
            Self::F32const { .. } => Opcode::F32const,
            Self::F64const { .. } => Opcode::F64const,
            Self::Extend { opcode, .. } | Self::Unary { opcode, .. } | Self::Binary { opcode, .. } => {
                opcode
            }
        }
    }

    /// The value operands of this instruction.
    pub fn arguments(&self) -> &[Value] {
        match self {
            Self::GetBank { .. }
            | Self::Iconst { .. }
            | Self::F32const { .. }
            | Self::F64const { .. } => &[],
            Self::SetBank { arg, .. }
            | Self::ExtractLane { arg, .. }
            | Self::Extend { arg, .. }
            | Self::Unary { arg, .. } => slice::from_ref(arg),
            Self::InsertLane { args, .. } | Self::Binary { args, .. } => args,
        }
    }
}
