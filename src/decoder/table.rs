//! The A32 instruction table.
//!
//! Entries are matched in order; the first one whose fixed bits agree with
//! the word wins. Only unconditional Advanced SIMD encodings and VFP / bitfield
//! encodings with the `AL` condition are listed: condition handling belongs to
//! the block translator driving this crate.

use super::{Encoding, InstDescriptor, Mnemonic};

/// One table row.
#[derive(Debug)]
pub struct TableEntry {
    /// Bits of the word that are fixed by the encoding.
    pub mask: u32,
    /// Required value of the fixed bits.
    pub value: u32,
    /// What a matching word decodes as.
    pub inst: InstDescriptor,
}

impl TableEntry {
    const fn new(mask: u32, value: u32, mnemonic: Mnemonic, encoding: Encoding) -> Self {
        Self {
            mask,
            value,
            inst: InstDescriptor::new(mnemonic, encoding),
        }
    }

    /// Does `word` match this entry?
    pub fn matches(&self, word: u32) -> bool {
        word & self.mask == self.value
    }
}

use self::Encoding::*;
use self::Mnemonic::*;

#[rustfmt::skip]
static TABLE: &[TableEntry] = &[
    // Bitfield. BFC is BFI with `Rn == 0b1111` and must come first.
    TableEntry::new(0xffe0_007f, 0xe7c0_001f, Bfc, AluBf),
    TableEntry::new(0xffe0_0070, 0xe7c0_0010, Bfi, AluBf),

    // Advanced SIMD, three registers of the same length, integer.
    TableEntry::new(0xff80_0f10, 0xf200_0800, VaddI, SimdReg),
    TableEntry::new(0xff80_0f10, 0xf300_0800, VsubI, SimdReg),
    TableEntry::new(0xff80_0f10, 0xf200_0900, VmlaI, SimdReg),
    TableEntry::new(0xff80_0f10, 0xf300_0900, VmlsI, SimdReg),
    TableEntry::new(0xff80_0f10, 0xf200_0910, VmulI, SimdReg),
    TableEntry::new(0xfe80_0f10, 0xf200_0600, Vmax, SimdReg),
    TableEntry::new(0xfe80_0f10, 0xf200_0610, Vmin, SimdReg),
    TableEntry::new(0xffb0_0f10, 0xf200_0110, Vand, SimdReg),
    TableEntry::new(0xffb0_0f10, 0xf220_0110, Vorr, SimdReg),
    TableEntry::new(0xffb0_0f10, 0xf300_0110, Veor, SimdReg),

    // Advanced SIMD, three registers of the same length, floating-point.
    TableEntry::new(0xffa0_0f10, 0xf200_0d00, VaddV, SimdReg),
    TableEntry::new(0xffa0_0f10, 0xf220_0d00, VsubV, SimdReg),
    TableEntry::new(0xffa0_0f10, 0xf300_0d10, VmulV, SimdReg),
    TableEntry::new(0xffa0_0f10, 0xf200_0d10, VmlaV, SimdReg),
    TableEntry::new(0xffa0_0f10, 0xf220_0d10, VmlsV, SimdReg),

    // Advanced SIMD, two registers, miscellaneous.
    TableEntry::new(0xffb3_0b90, 0xf3b1_0300, VabsV, Simd),
    TableEntry::new(0xffb3_0b90, 0xf3b1_0380, VnegV, Simd),

    // Advanced SIMD, one register and a modified immediate.
    TableEntry::new(0xfeb8_0090, 0xf280_0010, VmovI, SimdImm),

    // VFP data processing.
    TableEntry::new(0xffb0_0e50, 0xee30_0a00, VaddS, SimdRegS),
    TableEntry::new(0xffb0_0e50, 0xee30_0a40, VsubS, SimdRegS),
    TableEntry::new(0xffb0_0e50, 0xee20_0a00, VmulS, SimdRegS),
    TableEntry::new(0xffb0_0e50, 0xee00_0a00, VmlaS, SimdRegS),
    TableEntry::new(0xffb0_0e50, 0xee00_0a40, VmlsS, SimdRegS),
    TableEntry::new(0xffb0_0e50, 0xee80_0a00, VdivS, SimdRegS),
    TableEntry::new(0xffbf_0ed0, 0xeeb0_0ac0, VabsS, SimdS),
    TableEntry::new(0xffbf_0ed0, 0xeeb1_0a40, VnegS, SimdS),
    TableEntry::new(0xffbf_0ed0, 0xeeb1_0ac0, VsqrtS, SimdS),
];

/// All entries, in match order.
pub fn entries() -> &'static [TableEntry] {
    TABLE
}

/// Find the descriptor for `word`.
pub fn lookup(word: u32) -> Option<&'static InstDescriptor> {
    TABLE
        .iter()
        .find(|entry| entry.matches(word))
        .map(|entry| &entry.inst)
}
