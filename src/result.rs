//! Result and error types representing the outcome of translating an instruction.

use crate::decoder::Mnemonic;
use crate::regs::RegisterSize;
use thiserror::Error;

/// A translation error.
///
/// When an instruction cannot be lowered, translation of the enclosing guest
/// block is abandoned and one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    /// A register width class outside of the 32/64/128-bit vector views was
    /// handed to the register addressing scheme.
    ///
    /// This always represents a bug: a decoder declared a width class that the
    /// emitter it was paired with cannot address.
    #[error("unsupported vector register configuration: {0:?}")]
    UnsupportedConfiguration(RegisterSize),

    /// No entry of the instruction table matches the word.
    #[error("unknown instruction {word:#010x} at {address:#x}")]
    UnknownInstruction {
        /// Guest address of the instruction.
        address: u64,
        /// The raw instruction word.
        word: u32,
    },

    /// The instruction decodes, but no emitter is available for it or it was
    /// disabled through the translator settings.
    #[error("unsupported instruction {mnemonic} ({word:#010x}) at {address:#x}")]
    UnsupportedInstruction {
        /// Guest address of the instruction.
        address: u64,
        /// The raw instruction word.
        word: u32,
        /// Mnemonic of the matching table entry.
        mnemonic: Mnemonic,
    },
}

/// A convenient alias for a `Result` that uses `TranslateError` as the error type.
pub type TranslateResult<T> = Result<T, TranslateError>;
