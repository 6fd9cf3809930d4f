//! Building reference IR through [`VectorBuilder`].

use super::{Bank, Function, InstructionData, Opcode, Type, Value};
use crate::builder::VectorBuilder;

/// Appends instructions to a [`Function`].
pub struct FunctionBuilder<'a> {
    /// The function being built.
    pub func: &'a mut Function,
}

impl<'a> FunctionBuilder<'a> {
    /// Create a builder appending to `func`.
    pub fn new(func: &'a mut Function) -> Self {
        Self { func }
    }

    fn build(&mut self, data: InstructionData, ty: Type) -> Value {
        match self.func.push(data, Some(ty)) {
            (_, Some(value)) => value,
            (inst, None) => unreachable!("{inst} was created without a result"),
        }
    }
}

impl VectorBuilder for FunctionBuilder<'_> {
    type Value = Value;

    fn bank(&mut self, bank: u32) -> Value {
        let bank = Bank::from_u32(bank);
        self.build(InstructionData::GetBank { bank }, Type::V128)
    }

    fn extract_lane(&mut self, image: Value, ty: Type, lane: u8) -> Value {
        debug_assert_eq!(self.func.value_type(image), Type::V128);
        debug_assert!(u32::from(lane) < ty.lanes_per_bank());
        self.build(
            InstructionData::ExtractLane {
                ty,
                arg: image,
                lane,
            },
            ty,
        )
    }

    fn insert_lane(&mut self, image: Value, value: Value, ty: Type, lane: u8) -> Value {
        debug_assert_eq!(self.func.value_type(image), Type::V128);
        debug_assert!(u32::from(lane) < ty.lanes_per_bank());
        self.build(
            InstructionData::InsertLane {
                ty,
                args: [image, value],
                lane,
            },
            Type::V128,
        )
    }

    fn copy_bank(&mut self, bank: u32, image: Value) {
        debug_assert_eq!(self.func.value_type(image), Type::V128);
        let bank = Bank::from_u32(bank);
        self.func
            .push(InstructionData::SetBank { bank, arg: image }, None);
    }

    fn iconst(&mut self, ty: Type, imm: i64) -> Value {
        debug_assert!(ty.is_int());
        self.build(InstructionData::Iconst { ty, imm }, ty)
    }

    fn f32const(&mut self, bits: u32) -> Value {
        self.build(InstructionData::F32const { bits }, Type::F32)
    }

    fn f64const(&mut self, bits: u64) -> Value {
        self.build(InstructionData::F64const { bits }, Type::F64)
    }

    fn sextend(&mut self, ty: Type, value: Value) -> Value {
        debug_assert!(self.func.value_type(value).bits() < ty.bits());
        self.build(
            InstructionData::Extend {
                opcode: Opcode::Sextend,
                ty,
                arg: value,
            },
            ty,
        )
    }

    fn uextend(&mut self, ty: Type, value: Value) -> Value {
        debug_assert!(self.func.value_type(value).bits() < ty.bits());
        self.build(
            InstructionData::Extend {
                opcode: Opcode::Uextend,
                ty,
                arg: value,
            },
            ty,
        )
    }

    fn value_type(&self, value: Value) -> Type {
        self.func.value_type(value)
    }

    fn unary(&mut self, opcode: Opcode, arg: Value) -> Value {
        debug_assert!(opcode.is_unary(), "{opcode} is not unary");
        let ty = self.func.value_type(arg);
        self.build(InstructionData::Unary { opcode, arg }, ty)
    }

    fn binary(&mut self, opcode: Opcode, lhs: Value, rhs: Value) -> Value {
        debug_assert!(opcode.is_binary(), "{opcode} is not binary");
        let ty = self.func.value_type(lhs);
        debug_assert_eq!(ty, self.func.value_type(rhs));
        self.build(
            InstructionData::Binary {
                opcode,
                args: [lhs, rhs],
            },
            ty,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_types() {
        let mut func = Function::default();
        let mut b = FunctionBuilder::new(&mut func);
        let image = b.bank(1);
        let lane = b.extract_lane(image, Type::I16, 7);
        let wide = b.sextend(Type::I64, lane);
        let sum = b.iadd(wide, wide);
        let image = b.insert_lane(image, sum, Type::I16, 7);
        b.copy_bank(1, image);

        assert_eq!(b.value_type(lane), Type::I16);
        assert_eq!(b.value_type(wide), Type::I64);
        assert_eq!(b.value_type(sum), Type::I64);
        assert_eq!(b.value_type(image), Type::V128);
        assert_eq!(func.num_insts(), 6);
        assert_eq!(func.count(Opcode::SetBank), 1);
    }
}
