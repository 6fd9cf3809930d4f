//! Value types.

use core::fmt;
#[cfg(feature = "enable-serde")]
use serde_derive::{Deserialize, Serialize};

/// The type of an SSA value: a lane scalar or a whole register image.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub enum Type {
    /// 8-bit integer.
    I8,
    /// 16-bit integer.
    I16,
    /// 32-bit integer.
    I32,
    /// 64-bit integer. Also the working width of integer lane arithmetic.
    I64,
    /// Single-precision float.
    F32,
    /// Double-precision float.
    F64,
    /// A 128-bit register image.
    V128,
}

impl Type {
    /// The integer type of `1 << size` bytes, for an element size code.
    pub fn int_with_size(size: u32) -> Self {
        match size & 3 {
            0 => Self::I8,
            1 => Self::I16,
            2 => Self::I32,
            _ => Self::I64,
        }
    }

    /// The float type selected by a size-class bit.
    pub fn float_with_size(size: u32) -> Self {
        if size & 1 != 0 {
            Self::F64
        } else {
            Self::F32
        }
    }

    /// Width in bits.
    pub fn bits(self) -> u32 {
        match self {
            Self::I8 => 8,
            Self::I16 => 16,
            Self::I32 | Self::F32 => 32,
            Self::I64 | Self::F64 => 64,
            Self::V128 => 128,
        }
    }

    /// Width in bytes.
    pub fn bytes(self) -> u32 {
        self.bits() / 8
    }

    /// Number of lanes of this type in a 128-bit bank.
    pub fn lanes_per_bank(self) -> u32 {
        128 / self.bits()
    }

    /// Is this an integer type?
    pub fn is_int(self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64)
    }

    /// Is this a float type?
    pub fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::V128 => "v128",
        })
    }
}
