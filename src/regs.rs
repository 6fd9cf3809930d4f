//! Guest vector register file addressing.
//!
//! The A32 floating-point/SIMD register file is sixteen 128-bit physical banks
//! which are visible under three views: thirty-two 32-bit `S` registers over
//! the first eight banks, thirty-two 64-bit `D` registers and sixteen 128-bit
//! `Q` registers. Instruction encodings always number `Q` registers with the
//! `D` number of their low half, so a logical index in the 128-bit class is
//! even and the bank is `index >> 1`, exactly as in the 64-bit class.

use crate::result::{TranslateError, TranslateResult};
#[cfg(feature = "enable-serde")]
use serde_derive::{Deserialize, Serialize};

/// Number of physical 128-bit banks in the guest register file.
pub const NUM_BANKS: usize = 16;

/// Size in bytes of one physical bank.
pub const BANK_BYTES: usize = 16;

/// The width class under which a register operand is accessed.
///
/// The integer classes exist because decoders describe general-purpose
/// operands with the same type; they are not addressable as vector banks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub enum RegisterSize {
    /// A 32-bit general-purpose register.
    Int32,
    /// A 64-bit general-purpose register pair.
    Int64,
    /// A single-precision `S` register.
    Simd32,
    /// A doubleword `D` register.
    Simd64,
    /// A quadword `Q` register.
    Simd128,
}

impl RegisterSize {
    /// Map a raw vector width in bits onto its register class.
    pub fn from_simd_width(bits: u32) -> Option<Self> {
        match bits {
            32 => Some(Self::Simd32),
            64 => Some(Self::Simd64),
            128 => Some(Self::Simd128),
            _ => None,
        }
    }

    /// Number of bytes visible through this view.
    pub fn bytes(self) -> u32 {
        match self {
            Self::Int32 | Self::Simd32 => 4,
            Self::Int64 | Self::Simd64 => 8,
            Self::Simd128 => 16,
        }
    }

    /// Is this one of the vector views?
    pub fn is_simd(self) -> bool {
        matches!(self, Self::Simd32 | Self::Simd64 | Self::Simd128)
    }
}

/// Split the logical register `index` of class `size` into the physical bank
/// that holds it and the sub-register position inside that bank.
///
/// The sub-index counts in units of the register's own width, so a `D`
/// register has sub-index 0 or 1 and an `S` register 0 to 3.
pub fn quadword_and_subindex(index: u32, size: RegisterSize) -> TranslateResult<(u32, u32)> {
    match size {
        RegisterSize::Simd128 => Ok((index >> 1, 0)),
        RegisterSize::Simd64 => Ok((index >> 1, index & 1)),
        RegisterSize::Simd32 => Ok((index >> 2, index & 3)),
        RegisterSize::Int32 | RegisterSize::Int64 => {
            Err(TranslateError::UnsupportedConfiguration(size))
        }
    }
}
