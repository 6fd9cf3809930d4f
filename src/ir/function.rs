//! A translated instruction sequence.

use super::entities::{Inst, Value};
use super::instructions::{InstructionData, Opcode};
use super::types::Type;
use super::write::write_function;
use core::fmt;
use cranelift_entity::packed_option::PackedOption;
use cranelift_entity::{PrimaryMap, SecondaryMap};

/// Where a value comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueData {
    /// The value type.
    pub ty: Type,
    /// The instruction defining the value.
    pub inst: Inst,
}

/// A straight-line function over the guest register banks.
///
/// Instructions are kept in program order; there is a single block and no
/// control flow.
#[derive(Clone, Debug, Default)]
pub struct Function {
    /// Name used when printing.
    pub name: String,
    insts: PrimaryMap<Inst, InstructionData>,
    results: SecondaryMap<Inst, PackedOption<Value>>,
    values: PrimaryMap<Value, ValueData>,
}

impl Function {
    /// Create an empty function named `name`.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Append an instruction, creating a result value when `result` is given.
    pub fn push(&mut self, data: InstructionData, result: Option<Type>) -> (Inst, Option<Value>) {
        let inst = self.insts.push(data);
        let value = result.map(|ty| self.values.push(ValueData { ty, inst }));
        self.results[inst] = value.into();
        (inst, value)
    }

    /// The type of `value`.
    pub fn value_type(&self, value: Value) -> Type {
        self.values[value].ty
    }

    /// The instruction defining `value`.
    pub fn value_def(&self, value: Value) -> Inst {
        self.values[value].inst
    }

    /// The result of `inst`, if it has one.
    pub fn inst_result(&self, inst: Inst) -> Option<Value> {
        self.results[inst].expand()
    }

    /// Instructions in program order.
    pub fn insts(&self) -> impl Iterator<Item = (Inst, &InstructionData)> + '_ {
        self.insts.iter()
    }

    /// The data of `inst`.
    pub fn inst_data(&self, inst: Inst) -> &InstructionData {
        &self.insts[inst]
    }

    /// Number of instructions.
    pub fn num_insts(&self) -> usize {
        self.insts.len()
    }

    /// Number of instructions with opcode `opcode`.
    pub fn count(&self, opcode: Opcode) -> usize {
        self.insts
            .values()
            .filter(|data| data.opcode() == opcode)
            .count()
    }

    /// Forget all instructions, keeping the name.
    pub fn clear(&mut self) {
        self.insts.clear();
        self.results.clear();
        self.values.clear();
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_function(f, self)
    }
}
