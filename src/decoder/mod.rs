//! Instruction decoding.
//!
//! Decoding is a pure bit-slicing stage: an instruction word and the static
//! [`InstDescriptor`] of the table entry it matched go in, an [`OpCode`]
//! holding the named fields comes out. Nothing is validated here; field
//! combinations the architecture calls UNDEFINED or UNPREDICTABLE are passed
//! through for the emitter or dispatcher to deal with.

use core::fmt;

mod opcodes;
pub mod table;

pub use self::opcodes::{expand_simd_imm, AluBf, Simd, SimdImm, SimdReg, SimdRegS, SimdS};

/// The operand layout of an instruction class. Selects which decoder runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Bitfield clear/insert on general-purpose registers.
    AluBf,
    /// Advanced SIMD two registers, miscellaneous.
    Simd,
    /// Advanced SIMD three registers of the same length.
    SimdReg,
    /// VFP two-register scalar data processing.
    SimdS,
    /// VFP three-register scalar data processing.
    SimdRegS,
    /// Advanced SIMD one register and a modified immediate.
    SimdImm,
}

/// Instruction classes known to the table.
///
/// Suffix `I` is the integer vector form, `V` the floating-point vector form
/// and `S` the VFP scalar form.
#[allow(missing_docs, reason = "names are the architectural mnemonics")]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    Bfc,
    Bfi,
    VabsS,
    VabsV,
    VaddI,
    VaddS,
    VaddV,
    Vand,
    VdivS,
    Veor,
    Vmax,
    Vmin,
    VmlaI,
    VmlaS,
    VmlaV,
    VmlsI,
    VmlsS,
    VmlsV,
    VmovI,
    VmulI,
    VmulS,
    VmulV,
    VnegS,
    VnegV,
    Vorr,
    VsqrtS,
    VsubI,
    VsubS,
    VsubV,
}

impl Mnemonic {
    /// The assembler spelling of this class, without size qualifiers.
    pub fn name(self) -> &'static str {
        match self {
            Self::Bfc => "bfc",
            Self::Bfi => "bfi",
            Self::VabsS | Self::VabsV => "vabs",
            Self::VaddI | Self::VaddS | Self::VaddV => "vadd",
            Self::Vand => "vand",
            Self::VdivS => "vdiv",
            Self::Veor => "veor",
            Self::Vmax => "vmax",
            Self::Vmin => "vmin",
            Self::VmlaI | Self::VmlaS | Self::VmlaV => "vmla",
            Self::VmlsI | Self::VmlsS | Self::VmlsV => "vmls",
            Self::VmovI => "vmov",
            Self::VmulI | Self::VmulS | Self::VmulV => "vmul",
            Self::VnegS | Self::VnegV => "vneg",
            Self::Vorr => "vorr",
            Self::VsqrtS => "vsqrt",
            Self::VsubI | Self::VsubS | Self::VsubV => "vsub",
        }
    }

    /// Is this a VFP scalar instruction, as opposed to Advanced SIMD?
    pub fn is_vfp(self) -> bool {
        matches!(
            self,
            Self::VabsS
                | Self::VaddS
                | Self::VdivS
                | Self::VmlaS
                | Self::VmlsS
                | Self::VmulS
                | Self::VnegS
                | Self::VsqrtS
                | Self::VsubS
        )
    }

    /// Is this an Advanced SIMD instruction?
    pub fn is_neon(self) -> bool {
        !self.is_vfp() && !matches!(self, Self::Bfc | Self::Bfi)
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Static metadata describing one instruction class.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct InstDescriptor {
    /// The instruction class.
    pub mnemonic: Mnemonic,
    /// How its operands are laid out in the word.
    pub encoding: Encoding,
}

impl InstDescriptor {
    /// Create a descriptor.
    pub const fn new(mnemonic: Mnemonic, encoding: Encoding) -> Self {
        Self { mnemonic, encoding }
    }
}

/// A decoded instruction.
#[allow(missing_docs, reason = "one variant per `Encoding`")]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OpCode {
    AluBf(AluBf),
    Simd(Simd),
    SimdReg(SimdReg),
    SimdS(SimdS),
    SimdRegS(SimdRegS),
    SimdImm(SimdImm),
}

impl OpCode {
    /// The descriptor this instruction was decoded with.
    pub fn inst(&self) -> &'static InstDescriptor {
        match self {
            Self::AluBf(op) => op.inst,
            Self::Simd(op) => op.inst,
            Self::SimdReg(op) => op.inst,
            Self::SimdS(op) => op.inst,
            Self::SimdRegS(op) => op.inst,
            Self::SimdImm(op) => op.inst,
        }
    }

    /// Guest address of the instruction.
    pub fn address(&self) -> u64 {
        match self {
            Self::AluBf(op) => op.address,
            Self::Simd(op) => op.address,
            Self::SimdReg(op) => op.address,
            Self::SimdS(op) => op.address,
            Self::SimdRegS(op) => op.address,
            Self::SimdImm(op) => op.address,
        }
    }

    /// The raw instruction word.
    pub fn word(&self) -> u32 {
        match self {
            Self::AluBf(op) => op.word,
            Self::Simd(op) => op.word,
            Self::SimdReg(op) => op.word,
            Self::SimdS(op) => op.word,
            Self::SimdRegS(op) => op.word,
            Self::SimdImm(op) => op.word,
        }
    }

    /// Shorthand for `self.inst().mnemonic`.
    pub fn mnemonic(&self) -> Mnemonic {
        self.inst().mnemonic
    }
}

/// Decode `word`, found at `address`, using the field layout of `inst`.
pub fn decode(inst: &'static InstDescriptor, address: u64, word: u32) -> OpCode {
    match inst.encoding {
        Encoding::AluBf => OpCode::AluBf(AluBf::new(inst, address, word)),
        Encoding::Simd => OpCode::Simd(Simd::new(inst, address, word)),
        Encoding::SimdReg => OpCode::SimdReg(SimdReg::new(inst, address, word)),
        Encoding::SimdS => OpCode::SimdS(SimdS::new(inst, address, word)),
        Encoding::SimdRegS => OpCode::SimdRegS(SimdRegS::new(inst, address, word)),
        Encoding::SimdImm => OpCode::SimdImm(SimdImm::new(inst, address, word)),
    }
}

/// Extract the `width`-bit field starting at bit `offset`.
#[inline]
pub(crate) const fn field(word: u32, offset: u32, width: u32) -> u32 {
    (word >> offset) & ((1 << width) - 1)
}
