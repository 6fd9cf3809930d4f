use a32_translate::interpreter::RegisterFile;
use a32_translate::ir::{Function, FunctionBuilder, Opcode, Type};
use a32_translate::settings::{self, Configurable, Flags};
use a32_translate::{Mnemonic, TranslateError, Translator};

// vmov.i32 q0, #0x4200
const VMOV_Q0: u32 = 0xF284_0252;
// vadd.i32 q1, q0, q0
const VADD_Q1_Q0_Q0: u32 = 0xF220_2840;
// vmul.f64 d4, d2, d3
const VMUL_D4_D2_D3: u32 = 0xEE22_4B03;
// vmul.f64 d4, d6, d7
const VMUL_D4_D6_D7: u32 = 0xEE26_4B07;

#[test]
fn mixed_block() {
    let mut regs = RegisterFile::new();
    regs.set_d(6, 1.5);
    regs.set_d(7, -4.0);
    regs.set_d(5, 7.0);

    let func =
        super::translate_and_run(&[VMOV_Q0, VADD_Q1_Q0_Q0, VMUL_D4_D6_D7], &mut regs).unwrap();
    assert_eq!(regs.lanes(0, Type::I32), [0x4200; 4]);
    assert_eq!(regs.lanes(1, Type::I32), [0x8400; 4]);
    assert_eq!(regs.d(4), -6.0);
    assert_eq!(regs.d(5), 7.0);
    assert_eq!(func.count(Opcode::SetBank), 3);
}

#[test]
fn vmul_sees_earlier_vector_write() {
    // q1 holds d2 and d3.
    let mut regs = RegisterFile::new();
    super::translate_and_run(&[VMOV_Q0, VADD_Q1_Q0_Q0], &mut regs).unwrap();
    let d2 = regs.d(2);
    let d3 = regs.d(3);
    super::translate_and_run(&[VMUL_D4_D2_D3], &mut regs).unwrap();
    assert_eq!(regs.d(4).to_bits(), (d2 * d3).to_bits());
}

#[test]
fn neon_disabled() {
    let mut b = settings::builder();
    b.set("enable_neon", "false").unwrap();
    let t = Translator::new(Flags::new(b));

    let mut func = Function::default();
    let res = t.translate_block(
        &mut FunctionBuilder::new(&mut func),
        0x2000,
        &[VMUL_D4_D2_D3, VMOV_Q0],
    );
    assert_eq!(
        res,
        Err(TranslateError::UnsupportedInstruction {
            address: 0x2004,
            word: VMOV_Q0,
            mnemonic: Mnemonic::VmovI,
        })
    );
    // The scalar multiply before it was emitted.
    assert_eq!(func.count(Opcode::Fmul), 1);
}

#[test]
fn text_output() {
    let mut func = Function::with_name("vneg");
    // vneg.f32 s3, s5
    let word = 0xEEF1_1A62;
    Translator::default()
        .translate_inst(&mut FunctionBuilder::new(&mut func), 0, word)
        .unwrap();
    assert_eq!(
        func.to_string(),
        "function %vneg {\n    \
         v0 = get_bank q1\n    \
         v1 = extractlane.f32 v0, 1\n    \
         v2 = fneg v1\n    \
         v3 = get_bank q0\n    \
         v4 = insertlane.f32 v3, v2, 3\n    \
         set_bank q0, v4\n\
         }\n"
    );
}
