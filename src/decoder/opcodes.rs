//! Field layouts of the supported instruction classes.
//!
//! Register numbers are assembled the way the architecture does: a `D`
//! register is `D:Vd` (the extra bit on top) and an `S` register is `Vd:D`
//! (the extra bit at the bottom).

use super::{field, InstDescriptor};
use crate::regs::RegisterSize;

/// Double-precision register number `X:Vx` from a 4-bit field and a 1-bit
/// extension.
#[inline]
fn dreg(word: u32, low: u32, ext: u32) -> u32 {
    (field(word, ext, 1) << 4) | field(word, low, 4)
}

/// Single-precision register number `Vx:X`.
#[inline]
fn sreg(word: u32, low: u32, ext: u32) -> u32 {
    (field(word, low, 4) << 1) | field(word, ext, 1)
}

/// Bitfield clear / bitfield insert.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AluBf {
    /// Table entry this was decoded with.
    pub inst: &'static InstDescriptor,
    /// Guest address.
    pub address: u64,
    /// Raw word.
    pub word: u32,
    /// Destination register, bits `[15:12]`.
    pub rd: u32,
    /// Source register, bits `[3:0]`.
    pub rn: u32,
    /// Most significant bit of the field, bits `[20:16]`.
    pub msb: u32,
    /// Least significant bit of the field, bits `[11:7]`.
    pub lsb: u32,
}

impl AluBf {
    pub(super) fn new(inst: &'static InstDescriptor, address: u64, word: u32) -> Self {
        Self {
            inst,
            address,
            word,
            rd: field(word, 12, 4),
            rn: field(word, 0, 4),
            msb: field(word, 16, 5),
            lsb: field(word, 7, 5),
        }
    }

    /// Mask over bits `[0, msb]` of the source operand.
    pub fn source_mask(&self) -> u32 {
        u32::MAX >> (31 - self.msb)
    }

    /// `source_mask` moved up to the field position. Bits pushed past bit 31
    /// are dropped.
    pub fn dest_mask(&self) -> u32 {
        self.source_mask() << self.lsb
    }

    /// Number of bits in the field, or 0 when `msb < lsb`.
    pub fn width(&self) -> u32 {
        (self.msb + 1).saturating_sub(self.lsb)
    }

    /// Mask of `width()` low bits.
    pub fn width_mask(&self) -> u32 {
        match self.width() {
            0 => 0,
            w => u32::MAX >> (32 - w),
        }
    }
}

/// Advanced SIMD, two registers, miscellaneous.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Simd {
    /// Table entry this was decoded with.
    pub inst: &'static InstDescriptor,
    /// Guest address.
    pub address: u64,
    /// Raw word.
    pub word: u32,
    /// Destination, `D:Vd`.
    pub vd: u32,
    /// Source, `M:Vm`.
    pub vm: u32,
    /// Element size code, bits `[19:18]`.
    pub size: u32,
    /// Quadword operation, bit 6.
    pub q: bool,
    /// Floating-point operation, bit 10.
    pub f: bool,
    /// `Simd128` when `q` is set, otherwise `Simd64`.
    pub register_size: RegisterSize,
}

impl Simd {
    pub(super) fn new(inst: &'static InstDescriptor, address: u64, word: u32) -> Self {
        let q = field(word, 6, 1) != 0;
        Self {
            inst,
            address,
            word,
            vd: dreg(word, 12, 22),
            vm: dreg(word, 0, 5),
            size: field(word, 18, 2),
            q,
            f: field(word, 10, 1) != 0,
            register_size: if q {
                RegisterSize::Simd128
            } else {
                RegisterSize::Simd64
            },
        }
    }

    /// Bytes covered by one operand.
    pub fn bytes_count(&self) -> u32 {
        self.register_size.bytes()
    }
}

/// Advanced SIMD, three registers of the same length.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SimdReg {
    /// Table entry this was decoded with.
    pub inst: &'static InstDescriptor,
    /// Guest address.
    pub address: u64,
    /// Raw word.
    pub word: u32,
    /// Destination, `D:Vd`.
    pub vd: u32,
    /// First source, `N:Vn`.
    pub vn: u32,
    /// Second source, `M:Vm`.
    pub vm: u32,
    /// Element size code, bits `[21:20]`. Bit 20 alone is `sz` for the
    /// floating-point forms.
    pub size: u32,
    /// Quadword operation, bit 6.
    pub q: bool,
    /// Unsigned operation, bit 24.
    pub u: bool,
    /// `Simd128` when `q` is set, otherwise `Simd64`.
    pub register_size: RegisterSize,
}

impl SimdReg {
    pub(super) fn new(inst: &'static InstDescriptor, address: u64, word: u32) -> Self {
        let q = field(word, 6, 1) != 0;
        Self {
            inst,
            address,
            word,
            vd: dreg(word, 12, 22),
            vn: dreg(word, 16, 7),
            vm: dreg(word, 0, 5),
            size: field(word, 20, 2),
            q,
            u: field(word, 24, 1) != 0,
            register_size: if q {
                RegisterSize::Simd128
            } else {
                RegisterSize::Simd64
            },
        }
    }

    /// Bytes covered by one operand.
    pub fn bytes_count(&self) -> u32 {
        self.register_size.bytes()
    }
}

/// VFP, two registers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SimdS {
    /// Table entry this was decoded with.
    pub inst: &'static InstDescriptor,
    /// Guest address.
    pub address: u64,
    /// Raw word.
    pub word: u32,
    /// Destination, `D:Vd` for double precision, `Vd:D` otherwise.
    pub vd: u32,
    /// Source, `M:Vm` for double precision, `Vm:M` otherwise.
    pub vm: u32,
    /// Size code, bits `[9:8]`; `0b11` is double precision.
    pub size: u32,
    /// `Simd64` for double precision, otherwise `Simd32`.
    pub register_size: RegisterSize,
}

impl SimdS {
    pub(super) fn new(inst: &'static InstDescriptor, address: u64, word: u32) -> Self {
        let size = field(word, 8, 2);
        let (vd, vm, register_size) = if size == 0b11 {
            (dreg(word, 12, 22), dreg(word, 0, 5), RegisterSize::Simd64)
        } else {
            (sreg(word, 12, 22), sreg(word, 0, 5), RegisterSize::Simd32)
        };
        Self {
            inst,
            address,
            word,
            vd,
            vm,
            size,
            register_size,
        }
    }
}

/// VFP, three registers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SimdRegS {
    /// Table entry this was decoded with.
    pub inst: &'static InstDescriptor,
    /// Guest address.
    pub address: u64,
    /// Raw word.
    pub word: u32,
    /// Destination.
    pub vd: u32,
    /// First source, `N:Vn` for double precision, `Vn:N` otherwise.
    pub vn: u32,
    /// Second source.
    pub vm: u32,
    /// Size code, bits `[9:8]`; `0b11` is double precision.
    pub size: u32,
    /// `Simd64` for double precision, otherwise `Simd32`.
    pub register_size: RegisterSize,
}

impl SimdRegS {
    pub(super) fn new(inst: &'static InstDescriptor, address: u64, word: u32) -> Self {
        let size = field(word, 8, 2);
        let (vd, vn, vm, register_size) = if size == 0b11 {
            (
                dreg(word, 12, 22),
                dreg(word, 16, 7),
                dreg(word, 0, 5),
                RegisterSize::Simd64,
            )
        } else {
            (
                sreg(word, 12, 22),
                sreg(word, 16, 7),
                sreg(word, 0, 5),
                RegisterSize::Simd32,
            )
        };
        Self {
            inst,
            address,
            word,
            vd,
            vn,
            vm,
            size,
            register_size,
        }
    }
}

/// Advanced SIMD, one register and a modified immediate.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SimdImm {
    /// Table entry this was decoded with.
    pub inst: &'static InstDescriptor,
    /// Guest address.
    pub address: u64,
    /// Raw word.
    pub word: u32,
    /// Destination, `D:Vd`.
    pub vd: u32,
    /// Quadword operation, bit 6.
    pub q: bool,
    /// The `op` bit, bit 5.
    pub op: u32,
    /// Immediate expansion mode, bits `[11:8]`.
    pub cmode: u32,
    /// `i:imm3:imm4` from bits 24, `[18:16]` and `[3:0]`.
    pub imm8: u32,
    /// One element's worth of the expanded immediate.
    pub immediate: u64,
    /// Element size code of the expanded immediate.
    pub size: u32,
    /// `Simd128` when `q` is set, otherwise `Simd64`.
    pub register_size: RegisterSize,
}

impl SimdImm {
    pub(super) fn new(inst: &'static InstDescriptor, address: u64, word: u32) -> Self {
        let q = field(word, 6, 1) != 0;
        let op = field(word, 5, 1);
        let cmode = field(word, 8, 4);
        let imm8 = (field(word, 24, 1) << 7) | (field(word, 16, 3) << 4) | field(word, 0, 4);
        let (immediate, size) = expand_simd_imm(cmode, op, imm8);
        Self {
            inst,
            address,
            word,
            vd: dreg(word, 12, 22),
            q,
            op,
            cmode,
            imm8,
            immediate,
            size,
            register_size: if q {
                RegisterSize::Simd128
            } else {
                RegisterSize::Simd64
            },
        }
    }

    /// Bytes covered by the destination.
    pub fn bytes_count(&self) -> u32 {
        self.register_size.bytes()
    }

    /// Number of elements the immediate is replicated into.
    pub fn elems(&self) -> u32 {
        self.bytes_count() >> self.size
    }
}

/// Expand an Advanced SIMD modified immediate into one element and the size
/// code of that element.
///
/// The `cmode = 0b1111, op = 1` combination is UNDEFINED; it expands as the
/// floating-point form.
pub fn expand_simd_imm(cmode: u32, op: u32, imm8: u32) -> (u64, u32) {
    let imm = u64::from(imm8 & 0xff);
    match cmode >> 1 {
        shift @ 0b000..=0b011 => (imm << (8 * shift), 2),
        half @ (0b100 | 0b101) => (imm << (8 * (half & 1)), 1),
        0b110 if cmode & 1 == 0 => ((imm << 8) | 0xff, 2),
        0b110 => ((imm << 16) | 0xffff, 2),
        _ => match (cmode & 1, op) {
            (0, 0) => (imm, 0),
            (0, _) => {
                let bytes = (0..8u32)
                    .filter(|&bit| (imm >> bit) & 1 != 0)
                    .fold(0u64, |acc, bit| acc | (0xffu64 << (8 * bit)));
                (bytes, 3)
            }
            _ => (u64::from(vfp_expand_imm32(imm8)), 2),
        },
    }
}

/// `VFPExpandImm` for single precision: `a:NOT(b):bbbbb:cdefgh:Zeros(19)`.
fn vfp_expand_imm32(imm8: u32) -> u32 {
    let a = (imm8 >> 7) & 1;
    let b = (imm8 >> 6) & 1;
    let bbbbb = if b != 0 { 0x7c } else { 0 };
    let exp = ((b ^ 1) << 7) | bbbbb | ((imm8 >> 4) & 3);
    (a << 31) | (exp << 23) | ((imm8 & 0xf) << 19)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::{Encoding, Mnemonic};
    use proptest::prelude::*;

    static BFI: InstDescriptor = InstDescriptor::new(Mnemonic::Bfi, Encoding::AluBf);
    static VADD_V: InstDescriptor = InstDescriptor::new(Mnemonic::VaddV, Encoding::SimdReg);
    static VADD_S: InstDescriptor = InstDescriptor::new(Mnemonic::VaddS, Encoding::SimdRegS);
    static VABS_S: InstDescriptor = InstDescriptor::new(Mnemonic::VabsS, Encoding::SimdS);
    static VABS_V: InstDescriptor = InstDescriptor::new(Mnemonic::VabsV, Encoding::Simd);
    static VMOV_I: InstDescriptor = InstDescriptor::new(Mnemonic::VmovI, Encoding::SimdImm);

    fn bitfield(msb: u32, lsb: u32) -> AluBf {
        AluBf::new(&BFI, 0, 0xE7C0_0010 | (msb << 16) | (lsb << 7))
    }

    #[test]
    fn bitfield_fields_and_masks() {
        // rd = 5, rn = 3, msb = 7, lsb = 2.
        let op = AluBf::new(&BFI, 0, 0x0007_5103);
        assert_eq!((op.rd, op.rn, op.msb, op.lsb), (5, 3, 7, 2));
        assert_eq!(op.source_mask(), 0xFF);
        assert_eq!(op.dest_mask(), 0x3FC);
        assert_eq!(op.width(), 6);
        assert_eq!(op.width_mask(), 0x3F);
    }

    #[test]
    fn bitfield_passes_through_inverted_bounds() {
        let op = bitfield(2, 9);
        assert_eq!((op.msb, op.lsb), (2, 9));
        assert_eq!(op.source_mask(), 0x7);
        assert_eq!(op.dest_mask(), 0x7 << 9);
        assert_eq!(op.width(), 0);
        assert_eq!(op.width_mask(), 0);
    }

    #[test]
    fn bitfield_full_word() {
        let op = bitfield(31, 0);
        assert_eq!(op.source_mask(), u32::MAX);
        assert_eq!(op.dest_mask(), u32::MAX);
        assert_eq!(op.width_mask(), u32::MAX);
    }

    proptest! {
        #[test]
        fn masks_agree(lsb in 0u32..32, msb in 0u32..32) {
            prop_assume!(lsb <= msb && msb + lsb <= 31);
            let op = bitfield(msb, lsb);
            prop_assert_eq!(op.source_mask(), op.dest_mask() >> lsb);
            prop_assert_eq!(op.dest_mask(), op.source_mask() << lsb);
            prop_assert_eq!(op.source_mask().count_ones(), msb + 1);
            prop_assert_eq!(op.width_mask().count_ones(), msb - lsb + 1);
        }
    }

    #[test]
    fn simd_reg_quad_float() {
        // vadd.f32 q1, q2, q3
        let op = SimdReg::new(&VADD_V, 0, 0xF204_2D46);
        assert_eq!((op.vd, op.vn, op.vm), (2, 4, 6));
        assert_eq!(op.size & 1, 0);
        assert!(op.q);
        assert_eq!(op.register_size, RegisterSize::Simd128);
        assert_eq!(op.bytes_count(), 16);
    }

    #[test]
    fn simd_reg_high_registers() {
        // vadd.f32 d16, d17, d18: all three extension bits set.
        let op = SimdReg::new(&VADD_V, 0, 0xF241_0DA2);
        assert_eq!((op.vd, op.vn, op.vm), (16, 17, 18));
        assert_eq!(op.register_size, RegisterSize::Simd64);
    }

    #[test]
    fn vfp_single_register_numbering() {
        // vadd.f32 s1, s2, s3
        let op = SimdRegS::new(&VADD_S, 0, 0xEE71_0A21);
        assert_eq!((op.vd, op.vn, op.vm), (1, 2, 3));
        assert_eq!(op.register_size, RegisterSize::Simd32);
    }

    #[test]
    fn vfp_double_register_numbering() {
        // vadd.f64 d1, d2, d3
        let op = SimdRegS::new(&VADD_S, 0, 0xEE32_1B03);
        assert_eq!((op.vd, op.vn, op.vm), (1, 2, 3));
        assert_eq!(op.size, 0b11);
        assert_eq!(op.register_size, RegisterSize::Simd64);
    }

    #[test]
    fn vfp_two_register() {
        // vabs.f32 s3, s5
        let op = SimdS::new(&VABS_S, 0, 0xEEF0_1AE2);
        assert_eq!((op.vd, op.vm), (3, 5));
    }

    #[test]
    fn simd_misc() {
        // vabs.f32 q0, q1
        let op = Simd::new(&VABS_V, 0, 0xF3B9_0742);
        assert_eq!((op.vd, op.vm, op.size), (0, 2, 0b10));
        assert!(op.f && op.q);
    }

    #[test]
    fn modified_immediate() {
        // vmov.i32 q0, #0x4200 (cmode 0b0010, imm8 0x42)
        let op = SimdImm::new(&VMOV_I, 0, 0xF284_0252);
        assert_eq!(op.imm8, 0x42);
        assert_eq!(op.cmode, 0b0010);
        assert_eq!(op.immediate, 0x4200);
        assert_eq!(op.size, 2);
        assert_eq!(op.elems(), 4);
    }

    #[test]
    fn immediate_expansion() {
        assert_eq!(expand_simd_imm(0b0000, 0, 0xAB), (0xAB, 2));
        assert_eq!(expand_simd_imm(0b0110, 0, 0xAB), (0xAB00_0000, 2));
        assert_eq!(expand_simd_imm(0b1010, 0, 0xAB), (0xAB00, 1));
        assert_eq!(expand_simd_imm(0b1100, 0, 0xAB), (0xABFF, 2));
        assert_eq!(expand_simd_imm(0b1101, 0, 0xAB), (0xAB_FFFF, 2));
        assert_eq!(expand_simd_imm(0b1110, 0, 0xAB), (0xAB, 0));
        assert_eq!(expand_simd_imm(0b1110, 1, 0b1000_0001), (0xFF00_0000_0000_00FF, 3));
        assert_eq!(expand_simd_imm(0b1111, 0, 0x70), (0x3F80_0000, 2));
        assert_eq!(expand_simd_imm(0b1111, 0, 0xF0), (0xBF80_0000, 2));
        assert_eq!(expand_simd_imm(0b1111, 0, 0x00), (0x4000_0000, 2));
    }
}
