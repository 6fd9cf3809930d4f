use a32_translate::decoder::table;
use a32_translate::{Mnemonic, OpCode, RegisterSize, Translator};
use proptest::prelude::*;

#[test]
fn bitfield_insert_end_to_end() {
    // bfi r5, r3, #2, #6
    let word = 0xe7c0_0010 | (7 << 16) | (5 << 12) | (2 << 7) | 3;
    let op = Translator::default().decode(0x8000, word).unwrap();
    let OpCode::AluBf(bf) = op else {
        panic!("decoded as {op:?}");
    };
    assert_eq!(bf.inst.mnemonic, Mnemonic::Bfi);
    assert_eq!((bf.rd, bf.rn, bf.msb, bf.lsb), (5, 3, 7, 2));
    assert_eq!(bf.source_mask(), 0xff);
    assert_eq!(bf.dest_mask(), 0x3fc);
    assert_eq!(bf.width(), 6);
    assert_eq!(bf.width_mask(), 0x3f);
    assert_eq!(op.address(), 0x8000);
}

#[test]
fn quad_registers_use_d_numbering() {
    // vadd.f32 q1, q2, q3
    let op = Translator::default().decode(0, 0xF204_2D46).unwrap();
    let OpCode::SimdReg(op) = op else {
        panic!("decoded as {op:?}");
    };
    assert_eq!((op.vd, op.vn, op.vm), (2, 4, 6));
    assert_eq!(op.register_size, RegisterSize::Simd128);
    assert_eq!(op.bytes_count(), 16);
}

#[test]
fn every_table_entry_decodes_its_own_value() {
    for entry in table::entries() {
        let inst = table::lookup(entry.value).unwrap();
        assert_eq!(inst.encoding, entry.inst.encoding, "{entry:?}");
    }
}

proptest! {
    #[test]
    fn decoding_never_panics(word in any::<u32>()) {
        if let Ok(op) = Translator::default().decode(0, word) {
            prop_assert_eq!(op.word(), word);
        }
    }
}
