//! Table-driven translation of instruction words.

use crate::builder::VectorBuilder;
use crate::decoder::{decode, table, OpCode};
use crate::emit::emit_inst;
use crate::result::{TranslateError, TranslateResult};
use crate::settings::Flags;
use log::{debug, warn};

/// Translates A32 instruction words through a [`VectorBuilder`].
#[derive(Clone, Debug, Default)]
pub struct Translator {
    flags: Flags,
}

impl Translator {
    /// Create a translator with the given settings.
    pub fn new(flags: Flags) -> Self {
        Self { flags }
    }

    /// The settings in effect.
    pub fn flags(&self) -> &Flags {
        &self.flags
    }

    /// Look up and decode `word` without emitting anything.
    pub fn decode(&self, address: u64, word: u32) -> TranslateResult<OpCode> {
        let inst = table::lookup(word).ok_or(TranslateError::UnknownInstruction { address, word })?;
        Ok(decode(inst, address, word))
    }

    /// Translate the single instruction `word` found at `address`.
    pub fn translate_inst<B: VectorBuilder>(
        &self,
        b: &mut B,
        address: u64,
        word: u32,
    ) -> TranslateResult<()> {
        let op = self.decode(address, word)?;
        let mnemonic = op.mnemonic();
        let enabled = if mnemonic.is_vfp() {
            self.flags.enable_vfp()
        } else if mnemonic.is_neon() {
            self.flags.enable_neon()
        } else {
            true
        };
        if !enabled {
            warn!("{address:#x}: {mnemonic} ({word:#010x}) is disabled by settings");
            return Err(TranslateError::UnsupportedInstruction {
                address,
                word,
                mnemonic,
            });
        }
        debug!("{address:#x}: {mnemonic} ({word:#010x})");
        emit_inst(b, &op)
    }

    /// Translate consecutive instruction words starting at `address`.
    ///
    /// Translation stops at the first error, which is returned; the builder
    /// keeps whatever the preceding instructions emitted. Returns the number
    /// of words translated.
    pub fn translate_block<B: VectorBuilder>(
        &self,
        b: &mut B,
        address: u64,
        words: &[u32],
    ) -> TranslateResult<usize> {
        for (i, &word) in words.iter().enumerate() {
            self.translate_inst(b, address.wrapping_add(4 * i as u64), word)?;
        }
        debug!("{address:#x}: translated {} instructions", words.len());
        Ok(words.len())
    }
}
