//! Converting reference IR to text.
//!
//! The format follows Cranelift's: one instruction per line, results on
//! the left, the controlling type as an opcode suffix.

use super::{Function, InstructionData};
use core::fmt::{self, Write};

/// Write `func` to `w` as text.
pub fn write_function(w: &mut dyn Write, func: &Function) -> fmt::Result {
    writeln!(w, "function %{} {{", func.name)?;
    for (inst, data) in func.insts() {
        write!(w, "    ")?;
        if let Some(result) = func.inst_result(inst) {
            write!(w, "{result} = ")?;
        }
        write_instruction(w, data)?;
        writeln!(w)?;
    }
    writeln!(w, "}}")
}

fn write_instruction(w: &mut dyn Write, data: &InstructionData) -> fmt::Result {
    let opcode = data.opcode();
    match *data {
        InstructionData::GetBank { bank } => write!(w, "{opcode} {bank}"),
        InstructionData::SetBank { bank, arg } => write!(w, "{opcode} {bank}, {arg}"),
        InstructionData::ExtractLane { ty, arg, lane } => {
            write!(w, "{opcode}.{ty} {arg}, {lane}")
        }
        InstructionData::InsertLane { ty, args, lane } => {
            write!(w, "{opcode}.{ty} {}, {}, {lane}", args[0], args[1])
        }
        InstructionData::Iconst { ty, imm } => write!(w, "{opcode}.{ty} {imm}"),
        InstructionData::F32const { bits } => write!(w, "{opcode} {bits:#010x}"),
        InstructionData::F64const { bits } => write!(w, "{opcode} {bits:#018x}"),
        InstructionData::Extend { ty, arg, .. } => write!(w, "{opcode}.{ty} {arg}"),
        InstructionData::Unary { arg, .. } => write!(w, "{opcode} {arg}"),
        InstructionData::Binary { args, .. } => write!(w, "{opcode} {}, {}", args[0], args[1]),
    }
}
