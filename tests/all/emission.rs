use a32_translate::emit::{extract_scalar, insert_scalar};
use a32_translate::interpreter::{run, RegisterFile};
use a32_translate::ir::{Function, FunctionBuilder, Opcode, Type};
use a32_translate::VectorBuilder;
use proptest::prelude::*;

/// `vadd.i<8 << size> Dd, Dn, Dm`
fn vadd_int(size: u32, vd: u32, vn: u32, vm: u32) -> u32 {
    0xF200_0800
        | (size << 20)
        | ((vd >> 4) << 22)
        | ((vd & 15) << 12)
        | ((vn >> 4) << 7)
        | ((vn & 15) << 16)
        | ((vm >> 4) << 5)
        | (vm & 15)
}

fn f32_lanes(regs: &RegisterFile, bank: usize) -> Vec<f32> {
    regs.lanes(bank, Type::F32)
        .into_iter()
        .map(|bits| f32::from_bits(bits as u32))
        .collect()
}

#[test]
fn binary_preserves_other_half_of_bank() {
    let mut regs = RegisterFile::new();
    // d1 shares q0 with the destination d0.
    regs.set_lane(0, Type::I32, 2, 0xdead_beef);
    regs.set_lane(0, Type::I32, 3, 0x1234_5678);
    // d2 and d4.
    regs.set_lane(1, Type::I32, 0, 0xffff_ffff);
    regs.set_lane(1, Type::I32, 1, 5);
    regs.set_lane(2, Type::I32, 0, 1);
    regs.set_lane(2, Type::I32, 1, 6);

    let func = super::translate_and_run(&[vadd_int(2, 0, 2, 4)], &mut regs).unwrap();
    assert_eq!(func.count(Opcode::SetBank), 1);
    assert_eq!(regs.lanes(0, Type::I32), [0, 11, 0xdead_beef, 0x1234_5678]);
    assert_eq!(regs.lanes(1, Type::I32), [0xffff_ffff, 5, 0, 0]);
}

#[test]
fn integer_accumulate_reads_destination_before_writing() {
    // vmla.i32 d0, d1, d2: d1 lives in the same bank as d0.
    let mut regs = RegisterFile::new();
    regs.set_lane(0, Type::I32, 0, 100);
    regs.set_lane(0, Type::I32, 1, 200);
    regs.set_lane(0, Type::I32, 2, 2);
    regs.set_lane(0, Type::I32, 3, 3);
    regs.set_lane(1, Type::I32, 0, 4);
    regs.set_lane(1, Type::I32, 1, 5);

    super::translate_and_run(&[0xF221_0902], &mut regs).unwrap();
    assert_eq!(regs.lanes(0, Type::I32), [108, 215, 2, 3]);
}

#[test]
fn float_accumulate() {
    // vmla.f32 d0, d1, d2
    let mut regs = RegisterFile::new();
    regs.set_s(0, 1.0);
    regs.set_s(1, 2.0);
    regs.set_s(2, 2.0);
    regs.set_s(3, 3.0);
    regs.set_s(4, 4.0);
    regs.set_s(5, 5.0);

    let func = super::translate_and_run(&[0xF201_0D12], &mut regs).unwrap();
    assert_eq!(f32_lanes(&regs, 0), [9.0, 17.0, 2.0, 3.0]);
    assert_eq!(func.count(Opcode::Fmul), 2);
    assert_eq!(func.count(Opcode::Fadd), 2);
}

#[test]
fn float_subtract_accumulate_quad() {
    // vmls.f32 q0, q1, q2
    let word = 0xF220_0D10 | (2 << 16) | (1 << 6) | 4;
    let mut regs = RegisterFile::new();
    for lane in 0..4 {
        let x = lane as f32;
        regs.set_lane(0, Type::F32, lane, 10.0f32.to_bits().into());
        regs.set_lane(1, Type::F32, lane, x.to_bits().into());
        regs.set_lane(2, Type::F32, lane, 2.0f32.to_bits().into());
    }
    super::translate_and_run(&[word], &mut regs).unwrap();
    assert_eq!(f32_lanes(&regs, 0), [10.0, 8.0, 6.0, 4.0]);
}

#[test]
fn scalar_insert_leaves_neighbours() {
    let mut func = Function::default();
    let mut b = FunctionBuilder::new(&mut func);
    let x = b.f32const(0x4049_0fdb);
    insert_scalar(&mut b, 6, x).unwrap();

    let mut regs = RegisterFile::new();
    regs.set_s(4, 1.0);
    regs.set_s(5, 2.0);
    regs.set_s(7, 4.0);
    run(&func, &mut regs).unwrap();
    assert_eq!(regs.s(6).to_bits(), 0x4049_0fdb);
    assert_eq!(f32_lanes(&regs, 1), [1.0, 2.0, regs.s(6), 4.0]);
}

proptest! {
    #[test]
    fn scalar_round_trip_f32(bits in any::<u32>(), src in 0u32..32, dst in 0u32..32) {
        let mut func = Function::default();
        let mut b = FunctionBuilder::new(&mut func);
        let x = extract_scalar(&mut b, Type::F32, src).unwrap();
        insert_scalar(&mut b, dst, x).unwrap();

        let mut regs = RegisterFile::new();
        regs.set_lane(src as usize >> 2, Type::I32, src as usize & 3, bits.into());
        run(&func, &mut regs).unwrap();
        prop_assert_eq!(regs.lane(dst as usize >> 2, Type::I32, dst as usize & 3), u64::from(bits));
    }

    #[test]
    fn scalar_round_trip_f64(bits in any::<u64>(), src in 0u32..32, dst in 0u32..32) {
        let mut func = Function::default();
        let mut b = FunctionBuilder::new(&mut func);
        let x = extract_scalar(&mut b, Type::F64, src).unwrap();
        insert_scalar(&mut b, dst, x).unwrap();

        let mut regs = RegisterFile::new();
        regs.set_lane(src as usize >> 1, Type::I64, src as usize & 1, bits);
        run(&func, &mut regs).unwrap();
        prop_assert_eq!(regs.lane(dst as usize >> 1, Type::I64, dst as usize & 1), bits);
    }

    #[test]
    fn vadd_touches_only_destination(
        banks in prop::collection::vec(any::<[u8; 16]>(), 16),
        size in 0u32..4,
        vd in 0u32..32,
        vn in 0u32..32,
        vm in 0u32..32,
    ) {
        let mut regs = RegisterFile::new();
        for (bank, bytes) in banks.into_iter().enumerate() {
            regs.set_bank(bank, bytes);
        }
        let ty = Type::int_with_size(size);
        let elems = 8 >> size;
        let mut expected = regs.clone();
        for i in 0..elems {
            let lane = |reg: u32| (reg as usize >> 1, i + (reg as usize & 1) * elems);
            let (qn, ln) = lane(vn);
            let (qm, lm) = lane(vm);
            let (qd, ld) = lane(vd);
            let sum = regs.lane(qn, ty, ln).wrapping_add(regs.lane(qm, ty, lm));
            expected.set_lane(qd, ty, ld, sum);
        }

        super::translate_and_run(&[vadd_int(size, vd, vn, vm)], &mut regs).unwrap();
        prop_assert_eq!(regs, expected);
    }
}
