//! Evaluating reference IR against a guest register file.
//!
//! The interpreter gives emitted code a concrete meaning: run a
//! [`Function`] over a [`RegisterFile`] and inspect the banks afterwards.

use crate::ir::{Bank, Function, Inst, InstructionData, Opcode, Type, Value};
use crate::regs::{BANK_BYTES, NUM_BANKS};
use cranelift_entity::{EntityRef, SecondaryMap};
use log::trace;
use thiserror::Error;

/// Errors raised while interpreting a function.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InterpreterError {
    /// A bank number outside the register file.
    #[error("bank {0} is outside the register file")]
    BankOutOfRange(Bank),
    /// A value was used before being defined.
    #[error("{0} is used before it is defined")]
    UndefinedValue(Value),
    /// An operand had a type the instruction cannot accept.
    #[error("{inst}: {opcode} cannot operate on {ty}")]
    InvalidType {
        /// The offending instruction.
        inst: Inst,
        /// Its opcode.
        opcode: Opcode,
        /// The operand type.
        ty: Type,
    },
    /// A lane index past the end of the register image.
    #[error("{inst}: lane {lane} is out of range for {ty}")]
    LaneOutOfRange {
        /// The offending instruction.
        inst: Inst,
        /// The lane type.
        ty: Type,
        /// The lane index.
        lane: u8,
    },
}

/// Result type of interpreter operations.
pub type InterpreterResult<T> = Result<T, InterpreterError>;

/// The guest SIMD register file: 16 little-endian 128-bit banks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterFile {
    banks: [[u8; BANK_BYTES]; NUM_BANKS],
}

impl RegisterFile {
    /// A register file with every bank zeroed.
    pub fn new() -> Self {
        Self::default()
    }

    /// The raw bytes of bank `bank`.
    pub fn bank(&self, bank: usize) -> [u8; BANK_BYTES] {
        self.banks[bank]
    }

    /// Overwrite bank `bank`.
    pub fn set_bank(&mut self, bank: usize, bytes: [u8; BANK_BYTES]) {
        self.banks[bank] = bytes;
    }

    /// Read lane `lane` of bank `bank`, viewed as lanes of `ty`, as raw bits.
    pub fn lane(&self, bank: usize, ty: Type, lane: usize) -> u64 {
        read_lane(&self.banks[bank], ty, lane)
    }

    /// Write the low bits of `bits` into lane `lane` of bank `bank`.
    pub fn set_lane(&mut self, bank: usize, ty: Type, lane: usize, bits: u64) {
        write_lane(&mut self.banks[bank], ty, lane, bits);
    }

    /// All lanes of bank `bank` viewed as `ty`.
    pub fn lanes(&self, bank: usize, ty: Type) -> Vec<u64> {
        (0..ty.lanes_per_bank() as usize)
            .map(|lane| self.lane(bank, ty, lane))
            .collect()
    }

    /// Single-precision register `Sn`.
    pub fn s(&self, n: usize) -> f32 {
        f32::from_bits(self.lane(n >> 2, Type::F32, n & 3) as u32)
    }

    /// Set single-precision register `Sn`.
    pub fn set_s(&mut self, n: usize, value: f32) {
        self.set_lane(n >> 2, Type::F32, n & 3, value.to_bits().into());
    }

    /// Double-precision register `Dn`.
    pub fn d(&self, n: usize) -> f64 {
        f64::from_bits(self.lane(n >> 1, Type::F64, n & 1))
    }

    /// Set double-precision register `Dn`.
    pub fn set_d(&mut self, n: usize, value: f64) {
        self.set_lane(n >> 1, Type::F64, n & 1, value.to_bits());
    }
}

fn read_lane(bytes: &[u8; BANK_BYTES], ty: Type, lane: usize) -> u64 {
    let size = ty.bytes() as usize;
    let mut raw = [0; 8];
    raw[..size].copy_from_slice(&bytes[lane * size..][..size]);
    u64::from_le_bytes(raw)
}

fn write_lane(bytes: &mut [u8; BANK_BYTES], ty: Type, lane: usize, bits: u64) {
    let size = ty.bytes() as usize;
    bytes[lane * size..][..size].copy_from_slice(&bits.to_le_bytes()[..size]);
}

/// A runtime value.
#[allow(missing_docs, reason = "variants are named by their type")]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DataValue {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    V128([u8; BANK_BYTES]),
}

impl DataValue {
    /// The type of this value.
    pub fn ty(&self) -> Type {
        match self {
            Self::I8(_) => Type::I8,
            Self::I16(_) => Type::I16,
            Self::I32(_) => Type::I32,
            Self::I64(_) => Type::I64,
            Self::F32(_) => Type::F32,
            Self::F64(_) => Type::F64,
            Self::V128(_) => Type::V128,
        }
    }

    /// Build a scalar of type `ty` from the low bits of `bits`.
    pub fn from_bits(ty: Type, bits: u64) -> Option<Self> {
        Some(match ty {
            Type::I8 => Self::I8(bits as i8),
            Type::I16 => Self::I16(bits as i16),
            Type::I32 => Self::I32(bits as i32),
            Type::I64 => Self::I64(bits as i64),
            Type::F32 => Self::F32(f32::from_bits(bits as u32)),
            Type::F64 => Self::F64(f64::from_bits(bits)),
            Type::V128 => return None,
        })
    }

    /// The raw bit pattern of a scalar, zero-extended.
    pub fn bits(&self) -> Option<u64> {
        Some(match *self {
            Self::I8(x) => u64::from(x as u8),
            Self::I16(x) => u64::from(x as u16),
            Self::I32(x) => u64::from(x as u32),
            Self::I64(x) => x as u64,
            Self::F32(x) => u64::from(x.to_bits()),
            Self::F64(x) => x.to_bits(),
            Self::V128(_) => return None,
        })
    }

    /// An integer value, sign-extended.
    fn signed(&self) -> Option<i64> {
        Some(match *self {
            Self::I8(x) => x.into(),
            Self::I16(x) => x.into(),
            Self::I32(x) => x.into(),
            Self::I64(x) => x,
            _ => return None,
        })
    }
}

/// Run `func` to completion over `regs`.
pub fn run(func: &Function, regs: &mut RegisterFile) -> InterpreterResult<()> {
    let mut values: SecondaryMap<Value, Option<DataValue>> = SecondaryMap::new();
    for (inst, data) in func.insts() {
        let result = step(inst, data, &values, regs)?;
        trace!("{inst}: {} -> {result:?}", data.opcode());
        if let (Some(value), Some(result)) = (func.inst_result(inst), result) {
            values[value] = Some(result);
        }
    }
    Ok(())
}

fn step(
    inst: Inst,
    data: &InstructionData,
    values: &SecondaryMap<Value, Option<DataValue>>,
    regs: &mut RegisterFile,
) -> InterpreterResult<Option<DataValue>> {
    let arg = |value: Value| values[value].ok_or(InterpreterError::UndefinedValue(value));
    let opcode = data.opcode();
    let invalid = |ty: Type| InterpreterError::InvalidType { inst, opcode, ty };
    let image = |value: DataValue| match value {
        DataValue::V128(bytes) => Ok(bytes),
        other => Err(invalid(other.ty())),
    };

    Ok(Some(match *data {
        InstructionData::GetBank { bank } => {
            let bytes = regs
                .banks
                .get(bank.index())
                .ok_or(InterpreterError::BankOutOfRange(bank))?;
            DataValue::V128(*bytes)
        }
        InstructionData::SetBank { bank, arg: value } => {
            let bytes = image(arg(value)?)?;
            let slot = regs
                .banks
                .get_mut(bank.index())
                .ok_or(InterpreterError::BankOutOfRange(bank))?;
            *slot = bytes;
            return Ok(None);
        }
        InstructionData::ExtractLane { ty, arg: value, lane } => {
            let bytes = image(arg(value)?)?;
            if ty == Type::V128 {
                return Err(invalid(ty));
            }
            if u32::from(lane) >= ty.lanes_per_bank() {
                return Err(InterpreterError::LaneOutOfRange { inst, ty, lane });
            }
            let bits = read_lane(&bytes, ty, lane.into());
            DataValue::from_bits(ty, bits).ok_or_else(|| invalid(ty))?
        }
        InstructionData::InsertLane { ty, args, lane } => {
            let mut bytes = image(arg(args[0])?)?;
            let value = arg(args[1])?;
            if ty == Type::V128 {
                return Err(invalid(ty));
            }
            if u32::from(lane) >= ty.lanes_per_bank() {
                return Err(InterpreterError::LaneOutOfRange { inst, ty, lane });
            }
            let bits = value.bits().ok_or_else(|| invalid(value.ty()))?;
            write_lane(&mut bytes, ty, lane.into(), bits);
            DataValue::V128(bytes)
        }
        InstructionData::Iconst { ty, imm } => {
            DataValue::from_bits(ty, imm as u64).ok_or_else(|| invalid(ty))?
        }
        InstructionData::F32const { bits } => DataValue::F32(f32::from_bits(bits)),
        InstructionData::F64const { bits } => DataValue::F64(f64::from_bits(bits)),
        InstructionData::Extend { opcode, ty, arg: value } => {
            let value = arg(value)?;
            let wide = match opcode {
                Opcode::Sextend => value.signed().map(|x| x as u64),
                _ => value.bits().filter(|_| value.ty().is_int()),
            };
            let wide = wide.ok_or_else(|| invalid(value.ty()))?;
            DataValue::from_bits(ty, wide).ok_or_else(|| invalid(ty))?
        }
        InstructionData::Unary { opcode, arg: value } => {
            let value = arg(value)?;
            unary(opcode, value).ok_or_else(|| invalid(value.ty()))?
        }
        InstructionData::Binary { opcode, args } => {
            let (x, y) = (arg(args[0])?, arg(args[1])?);
            if x.ty() != y.ty() {
                return Err(invalid(y.ty()));
            }
            binary(opcode, x, y).ok_or_else(|| invalid(x.ty()))?
        }
    }))
}

fn unary(opcode: Opcode, x: DataValue) -> Option<DataValue> {
    match x {
        DataValue::F32(x) => Some(DataValue::F32(match opcode {
            Opcode::Fneg => -x,
            Opcode::Fabs => x.abs(),
            Opcode::Sqrt => x.sqrt(),
            _ => return None,
        })),
        DataValue::F64(x) => Some(DataValue::F64(match opcode {
            Opcode::Fneg => -x,
            Opcode::Fabs => x.abs(),
            Opcode::Sqrt => x.sqrt(),
            _ => return None,
        })),
        _ => {
            let ty = x.ty();
            let a = x.signed()?;
            let r = match opcode {
                Opcode::Ineg => a.wrapping_neg(),
                Opcode::Iabs => a.wrapping_abs(),
                Opcode::Bnot => !a,
                _ => return None,
            };
            DataValue::from_bits(ty, r as u64)
        }
    }
}

fn binary(opcode: Opcode, x: DataValue, y: DataValue) -> Option<DataValue> {
    match (x, y) {
        (DataValue::F32(a), DataValue::F32(b)) => Some(DataValue::F32(match opcode {
            Opcode::Fadd => a + b,
            Opcode::Fsub => a - b,
            Opcode::Fmul => a * b,
            Opcode::Fdiv => a / b,
            _ => return None,
        })),
        (DataValue::F64(a), DataValue::F64(b)) => Some(DataValue::F64(match opcode {
            Opcode::Fadd => a + b,
            Opcode::Fsub => a - b,
            Opcode::Fmul => a * b,
            Opcode::Fdiv => a / b,
            _ => return None,
        })),
        _ => {
            let ty = x.ty();
            let (a, b) = (x.signed()?, y.signed()?);
            let (ua, ub) = (x.bits()?, y.bits()?);
            let r = match opcode {
                Opcode::Iadd => a.wrapping_add(b),
                Opcode::Isub => a.wrapping_sub(b),
                Opcode::Imul => a.wrapping_mul(b),
                Opcode::Smax => a.max(b),
                Opcode::Smin => a.min(b),
                Opcode::Umax => ua.max(ub) as i64,
                Opcode::Umin => ua.min(ub) as i64,
                Opcode::Band => a & b,
                Opcode::Bor => a | b,
                Opcode::Bxor => a ^ b,
                _ => return None,
            };
            DataValue::from_bits(ty, r as u64)
        }
    }
}
