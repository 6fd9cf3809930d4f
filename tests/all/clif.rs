use a32_translate::clif::{ClifError, ClifTranslator};
use a32_translate::settings::{self, Configurable, Flags};
use a32_translate::TranslateError;

const BLOCK: [u32; 8] = [
    0xF284_0252, // vmov.i32 q0, #0x4200
    0xF221_0902, // vmla.i32 d0, d1, d2
    0xF211_0602, // vmax.s16 d0, d1, d2
    0xF3B1_0301, // vabs.s8 d0, d1
    0xF222_0D54, // vmls.f32 q0, q1, q2
    0xEE71_0A21, // vadd.f32 s1, s2, s3
    0xEE32_1B03, // vadd.f64 d1, d2, d3
    0xEEB1_1BC2, // vsqrt.f64 d1, d2
];

#[test]
fn block_verifies() {
    let _ = env_logger::try_init();

    let mut t = ClifTranslator::default();
    assert!(t.flags().enable_verifier());
    let func = t.translate_block(0x1000, &BLOCK).unwrap();
    let text = func.display().to_string();
    assert!(text.contains("iconst.i64"), "{text}");
    assert!(text.contains("ireduce.i32"), "{text}");
    assert!(text.contains("smax"), "{text}");
    assert!(text.contains("sqrt"), "{text}");
    assert_eq!(text.matches("store").count(), BLOCK.len());
}

#[test]
fn bitwise_and_divide_verify() {
    let mut t = ClifTranslator::default();
    let words = [
        0xF201_0112, // vand d0, d1, d2
        0xF221_0112, // vorr d0, d1, d2
        0xF301_0112, // veor d0, d1, d2
        0xEE80_0A81, // vdiv.f32 s0, s1, s2
        0xEE82_1B03, // vdiv.f64 d1, d2, d3
    ];
    let func = t.translate_block(0x2000, &words).unwrap();
    let text = func.display().to_string();
    for op in ["band", "bor", "bxor", "fdiv"] {
        assert!(text.contains(op), "{op} missing:\n{text}");
    }
    assert_eq!(text.matches("fdiv").count(), 2);
}

#[test]
fn translator_is_reusable() {
    let mut t = ClifTranslator::default();
    for (i, &word) in BLOCK.iter().enumerate() {
        let address = 0x1000 + 4 * i as u64;
        t.translate_block(address, &[word]).unwrap();
    }
}

#[test]
fn unsupported_is_reported() {
    let mut b = settings::builder();
    b.set("enable_verifier", "false").unwrap();
    let mut t = ClifTranslator::new(Flags::new(b));

    // bfc r0, #0, #8
    let word = 0xe7c7_001f;
    match t.translate_block(0, &[word]) {
        Err(ClifError::Translate(TranslateError::UnsupportedInstruction { word: w, .. })) => {
            assert_eq!(w, word)
        }
        other => panic!("unexpected {other:?}"),
    }
    t.translate_block(0, &BLOCK).unwrap();
}
